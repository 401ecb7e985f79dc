//! Line lexer for the input format
//!
//! Turns raw input text into the *significant* lines of the file: comments
//! (everything after `#`) are stripped, runs of whitespace collapse to a
//! single space and blank lines disappear. Each surviving line keeps its
//! 1-based line number for diagnostics.

/// Comment introducer
pub const COMMENT: char = '#';

/// One significant line of the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the original text
    pub number: usize,

    /// Simplified content (no comment, single spaces, trimmed)
    pub text: String,
}

impl SourceLine {
    /// Whitespace-separated tokens of the line
    pub fn tokens(&self) -> Vec<&str> {
        self.text.split(' ').filter(|t| !t.is_empty()).collect()
    }

    /// First token, used as the keyword of top-level lines
    pub fn keyword(&self) -> &str {
        self.text.split(' ').next().unwrap_or("")
    }
}

/// Split `source` into significant lines
///
/// # Example
///
/// ```rust
/// use kmc_rs::input::lexer::tokenize;
///
/// let lines = tokenize("# header\n\npressure   101325  # Pa\n");
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0].number, 3);
/// assert_eq!(lines[0].text, "pressure 101325");
/// ```
pub fn tokenize(source: &str) -> Vec<SourceLine> {
    source
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let text = simplified(strip_comment(raw));
            if text.is_empty() {
                None
            } else {
                Some(SourceLine { number: i + 1, text })
            }
        })
        .collect()
}

/// Remove the comment part of a line
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Trim both ends and collapse every whitespace run into one space
///
/// # Example
///
/// ```rust
/// use kmc_rs::input::lexer::simplified;
///
/// assert_eq!(simplified("  A  +\t*  "), "A + *");
/// ```
pub fn simplified(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` on `delimiter`, simplifying every piece and dropping empty ones
///
/// # Example
///
/// ```rust
/// use kmc_rs::input::lexer::split;
///
/// assert_eq!(split("A + * ->  A*", "->"), vec!["A + *", "A*"]);
/// assert_eq!(split("A +  + B", "+"), vec!["A", "B"]);
/// ```
pub fn split(text: &str, delimiter: &str) -> Vec<String> {
    text.split(delimiter)
        .map(simplified)
        .filter(|piece| !piece.is_empty())
        .collect()
}

// =================================================================================================
// Tests
// =================================================================================================
