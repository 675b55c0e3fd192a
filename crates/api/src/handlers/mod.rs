pub mod progress;
pub mod subtitles;
