//! Full-length grammar matching shared by every notation parser.
//!
//! Each notation describes its textual form as a regular expression with
//! named capture groups. [`Grammar::match_full`] accepts the input only when
//! the first match starts at the beginning of the trimmed input and consumes
//! all of it; a valid prefix followed by anything else is a
//! [`ParseError::GrammarMismatch`]. Field extraction helpers turn captures
//! into numbers, reporting [`ParseError::MalformedNumber`] for empty or
//! non-numeric captures.

use regex::{Captures, Regex};

use crate::error::ParseError;
use crate::notation::Notation;

pub struct Grammar {
    notation: Notation,
    regex: Regex,
}

impl Grammar {
    /// Compile a grammar. Patterns are compile-time constants, so an invalid
    /// pattern is a programming error.
    pub fn new(notation: Notation, pattern: &str) -> Self {
        let regex = Regex::new(pattern).expect("grammar pattern must compile");
        Grammar { notation, regex }
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }

    pub fn match_full<'t>(&self, input: &'t str) -> Result<GrammarMatch<'t>, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::mismatch(self.notation, input));
        }

        let captures = self
            .regex
            .captures(trimmed)
            .ok_or_else(|| ParseError::mismatch(self.notation, trimmed))?;

        // Group 0 always participates in a successful match.
        let whole = captures.get(0).map(|m| (m.start(), m.end()));
        if whole != Some((0, trimmed.len())) {
            return Err(ParseError::mismatch(self.notation, trimmed));
        }

        Ok(GrammarMatch {
            notation: self.notation,
            input: trimmed,
            captures,
        })
    }
}

pub struct GrammarMatch<'t> {
    notation: Notation,
    input: &'t str,
    captures: Captures<'t>,
}

impl<'t> GrammarMatch<'t> {
    /// Captured text of a group, `None` when the group did not participate or is empty.
    pub fn text(&self, group: &str) -> Option<&'t str> {
        self.captures
            .name(group)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn number(&self, group: &str, field: &'static str) -> Result<f64, ParseError> {
        parse_number(field, self.text(group).unwrap_or_default())
    }

    /// An unsigned whole number; a sign or fraction is a malformed number.
    pub fn whole(&self, group: &str, field: &'static str) -> Result<u32, ParseError> {
        let text = self.text(group).unwrap_or_default();
        text.parse::<u32>()
            .map_err(|_| ParseError::malformed(field, text))
    }

    /// A single upper-cased letter.
    pub fn letter(&self, group: &str) -> Option<char> {
        self.text(group)
            .and_then(|s| s.chars().next())
            .map(|c| c.to_ascii_uppercase())
    }

    /// A hemisphere letter that may appear before or after a value, but not both.
    pub fn hemisphere(&self, before: &str, after: &str) -> Result<Option<char>, ParseError> {
        match (self.letter(before), self.letter(after)) {
            (Some(_), Some(_)) => Err(ParseError::mismatch(self.notation, self.input)),
            (pre, post) => Ok(pre.or(post)),
        }
    }

    pub fn mismatch(&self) -> ParseError {
        ParseError::mismatch(self.notation, self.input)
    }
}

/// Parse a signed decimal, rejecting empty text and non-finite values.
pub fn parse_number(field: &'static str, text: &str) -> Result<f64, ParseError> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::malformed(field, text)),
    }
}
