//! Domain types shared by every subline crate.
//!
//! - [`srt`] -- the SRT subtitle codec (parse / generate).
//! - [`progress`] -- the progress event pushed to subscribed clients.
//! - [`language`] -- target language code validation.
//! - [`error`] -- the domain error type.

pub mod error;
pub mod language;
pub mod progress;
pub mod srt;
pub mod types;
