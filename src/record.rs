//! Sortable text record.

use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Separator between the numeric and the text part of a serialized record.
pub const DELIMITER: &str = ". ";

/// Reason a line could not be turned into a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The line contains no `". "` delimiter.
    MissingDelimiter,
    /// The part before the delimiter is empty or not made of ASCII digits.
    InvalidNumeric,
    /// The text part contains `\n` or `\r`, so it would not fit on a single line.
    LineBreakInText,
}

/// Record parsing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecordError {
    reason: MalformedReason,
    content: String,
    line: Option<u64>,
}

impl MalformedRecordError {
    pub fn new(reason: MalformedReason, content: impl Into<String>) -> Self {
        MalformedRecordError {
            reason,
            content: content.into(),
            line: None,
        }
    }

    /// Attaches the 1-based line number the content was read from.
    pub fn at_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        return self;
    }

    pub fn reason(&self) -> MalformedReason {
        self.reason
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn line(&self) -> Option<u64> {
        self.line
    }
}

impl Display for MalformedRecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            MalformedReason::MissingDelimiter => "delimiter \". \" not found",
            MalformedReason::InvalidNumeric => "numeric part is not a non-negative integer",
            MalformedReason::LineBreakInText => "text part contains a line break",
        };
        match self.line {
            Some(line) => write!(f, "malformed record at line {}: {} ({:?})", line, reason, self.content),
            None => write!(f, "malformed record: {} ({:?})", reason, self.content),
        }
    }
}

impl Error for MalformedRecordError {}

/// A `<numeric>. <text>` record.
///
/// Records are ordered by `text` first and by `numeric` second. Both fields are compared
/// byte-wise as strings, so `"10"` sorts before `"9"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    numeric: String,
    text: String,
}

impl Record {
    /// Creates a record from its parts. Both parts are trimmed, the numeric part is validated
    /// and the text part must not contain line breaks.
    pub fn new(numeric: impl AsRef<str>, text: impl AsRef<str>) -> Result<Self, MalformedRecordError> {
        let numeric = numeric.as_ref().trim();
        if !is_numeric_token(numeric) {
            return Err(MalformedRecordError::new(MalformedReason::InvalidNumeric, numeric));
        }

        let text = text.as_ref().trim();
        if has_line_break(text) {
            return Err(MalformedRecordError::new(MalformedReason::LineBreakInText, text));
        }

        return Ok(Record {
            numeric: numeric.to_string(),
            text: text.to_string(),
        });
    }

    /// Parses a single line (without line terminator).
    /// The line is split at the first occurrence of [`DELIMITER`].
    pub fn parse(line: &str) -> Result<Self, MalformedRecordError> {
        let (numeric, text) = line
            .split_once(DELIMITER)
            .ok_or_else(|| MalformedRecordError::new(MalformedReason::MissingDelimiter, line))?;

        let numeric = numeric.trim();
        if !is_numeric_token(numeric) {
            return Err(MalformedRecordError::new(MalformedReason::InvalidNumeric, line));
        }

        let text = text.trim();
        if has_line_break(text) {
            return Err(MalformedRecordError::new(MalformedReason::LineBreakInText, line));
        }

        return Ok(Record {
            numeric: numeric.to_string(),
            text: text.to_string(),
        });
    }

    /// Returns the serialized form `numeric + ". " + text`.
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    pub fn numeric(&self) -> &str {
        &self.numeric
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

fn is_numeric_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn has_line_break(text: &str) -> bool {
    text.bytes().any(|b| b == b'\n' || b == b'\r')
}

impl FromStr for Record {
    type Err = MalformedRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Record::parse(s)
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.numeric, DELIMITER, self.text)
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text
            .as_bytes()
            .cmp(other.text.as_bytes())
            .then_with(|| self.numeric.as_bytes().cmp(other.numeric.as_bytes()))
    }
}
