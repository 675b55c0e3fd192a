//! SRT subtitle codec.
//!
//! An SRT file is a sequence of blank-line separated blocks, each holding a
//! sequence number, a timing line and one or more lines of text:
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:02,000
//! Hello
//!
//! 2
//! 00:00:03,000 --> 00:00:04,000
//! World
//! ```
//!
//! [`parse`] is lenient: blocks with fewer than [`MIN_BLOCK_LINES`] lines are
//! dropped and an index line without digits yields an entry whose `index` is
//! `None`. [`parse_strict`] reports both cases as [`SrtError::MalformedEntry`].
//! [`generate`] is the near-inverse of [`parse`] and does not re-validate.

use serde::{Deserialize, Serialize};

/// A block needs an index line, a timing line and at least one text line.
pub const MIN_BLOCK_LINES: usize = 3;

/// Rendered in place of an index that could not be read.
const INVALID_INDEX_PLACEHOLDER: i64 = 0;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// One subtitle block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    /// Sequence number as written in the file. Not guaranteed contiguous or
    /// sorted; `None` when the index line carried no leading digits.
    pub index: Option<i64>,
    /// The timing line exactly as it appeared. Its format is not checked.
    pub timestamp: String,
    /// Dialogue lines joined with `\n`.
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(index: i64, timestamp: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            timestamp: timestamp.into(),
            text: text.into(),
        }
    }
}

/// Errors reported by [`parse_strict`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SrtError {
    /// `block` is 1-based, counted over non-empty blocks.
    #[error("Malformed subtitle block {block}: {reason}")]
    MalformedEntry { block: usize, reason: String },
}

/// Parse SRT text into entries, in block order.
///
/// Never fails. Short blocks are skipped and unreadable indexes become
/// `None`; use [`parse_strict`] to surface those as errors instead.
pub fn parse(content: &str) -> Vec<SubtitleEntry> {
    split_blocks(content)
        .into_iter()
        .filter(|lines| lines.len() >= MIN_BLOCK_LINES)
        .map(|lines| entry_from_lines(&lines, parse_index(&lines[0])))
        .collect()
}

/// Parse SRT text, rejecting the first short block or non-numeric index.
pub fn parse_strict(content: &str) -> Result<Vec<SubtitleEntry>, SrtError> {
    let mut entries = Vec::new();

    for (i, lines) in split_blocks(content).into_iter().enumerate() {
        let block = i + 1;

        if lines.len() < MIN_BLOCK_LINES {
            return Err(SrtError::MalformedEntry {
                block,
                reason: format!(
                    "expected at least {MIN_BLOCK_LINES} lines, found {}",
                    lines.len()
                ),
            });
        }

        let raw_index = lines[0].trim().trim_start_matches(BYTE_ORDER_MARK);
        let index = raw_index
            .parse::<i64>()
            .map_err(|_| SrtError::MalformedEntry {
                block,
                reason: format!("index '{raw_index}' is not an integer"),
            })?;

        entries.push(entry_from_lines(&lines, Some(index)));
    }

    Ok(entries)
}

/// Render entries back to SRT text.
///
/// Each entry becomes `index\ntimestamp\ntext\n`; entries are separated by
/// one blank line. The caller is responsible for ordering.
pub fn generate(entries: &[SubtitleEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}\n{}\n{}\n",
                entry.index.unwrap_or(INVALID_INDEX_PLACEHOLDER),
                entry.timestamp,
                entry.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalize line endings, trim, and group lines into blocks. Any run of
/// empty lines ends a block; a line holding only spaces is text.
fn split_blocks(content: &str) -> Vec<Vec<String>> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in normalized.trim().split('\n') {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn entry_from_lines(lines: &[String], index: Option<i64>) -> SubtitleEntry {
    SubtitleEntry {
        index,
        timestamp: lines[1].clone(),
        text: lines[2..].join("\n"),
    }
}

/// Lenient integer read: skips surrounding whitespace and a byte order mark,
/// accepts an optional sign, then takes the leading run of digits. Values
/// beyond the `i64` range saturate.
fn parse_index(line: &str) -> Option<i64> {
    let s = line.trim().trim_start_matches(BYTE_ORDER_MARK).trim_start();

    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return None;
    }

    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    let saturated = if negative { i64::MIN } else { i64::MAX };
    Some(signed.parse::<i64>().unwrap_or(saturated))
}
