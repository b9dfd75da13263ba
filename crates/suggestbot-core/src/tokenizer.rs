//! Cursor over a line of command text.
//!
//! The tokenizer owns a mutable buffer of the text that has not been consumed
//! yet. Each [`Tokenizer::advance`] scans the front of the buffer, resolving
//! backslash escapes in place, and cuts off one text unit:
//!
//! - outside quotes, whitespace or the end of the buffer ends the unit;
//! - a `"` at the very start of the scan opens a quoted span that runs to the
//!   next unescaped `"`;
//! - a `"` anywhere later ends the unit *before* the quote, leaving the quote
//!   to open the next unit.
//!
//! Supported escapes are `\t`, `\n`, `\\`, `\"` and `\uXXXX`. Anything else
//! after a backslash is kept literally.

use tracing::warn;

use crate::token::{DEFAULT_PREFIX, Token, classify};

/// Errors from advancing a [`Tokenizer`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    #[error("exhausted iterator: no tokens remain")]
    Exhausted,
}

/// Stateful cursor producing classified [`Token`]s.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    remaining: String,
    prefix: String,
}

impl Tokenizer {
    /// Create a tokenizer over `text`, classifying commands with `prefix`
    /// (the guild's configured prefix) in addition to [`DEFAULT_PREFIX`].
    pub fn new(text: &str, prefix: &str) -> Self {
        Self {
            remaining: text.trim().to_string(),
            prefix: prefix.to_string(),
        }
    }

    /// The prefix this tokenizer classifies commands with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The text that has not been consumed yet.
    pub fn remaining(&self) -> &str {
        &self.remaining
    }

    /// Whether any non-blank text remains.
    pub fn has_more(&self) -> bool {
        !self.remaining.trim().is_empty()
    }

    /// Consume and classify the next text unit.
    pub fn advance(&mut self) -> Result<Token, TokenizeError> {
        let mut index = 0;
        let mut quoted = false;

        while self.has_more() {
            let Some(c) = self.remaining[index..].chars().next() else {
                if quoted {
                    warn!(text = %self.remaining, "Improperly matched quotations");
                    let text = std::mem::take(&mut self.remaining);
                    return Ok(self.classify(&text));
                }
                return Ok(self.split_at(index));
            };

            if c == '\\' {
                index += resolve_escape(&mut self.remaining, index);
            } else if !quoted && c.is_whitespace() {
                return Ok(self.split_at(index));
            } else if c == '"' {
                if quoted {
                    // Closing quote: the unit is everything between the quotes.
                    let token = self.classify(&self.remaining[1..index]);
                    self.remaining = self.remaining[index + 1..].trim_start().to_string();
                    return Ok(token);
                }
                if index == 0 {
                    quoted = true;
                    index += 1;
                } else {
                    let token = self.classify(&self.remaining[..index]);
                    self.remaining.replace_range(..index, "");
                    return Ok(token);
                }
            } else {
                index += c.len_utf8();
            }
        }

        // Escape resolution can leave only whitespace behind (e.g. `\t`).
        if index > 0 {
            let text = std::mem::take(&mut self.remaining);
            return Ok(self.classify(&text[..index.min(text.len())]));
        }
        Err(TokenizeError::Exhausted)
    }

    /// Take everything that remains as a single token.
    ///
    /// One layer of surrounding double quotes is stripped, every escape is
    /// resolved, and the result is classified. The buffer is left empty.
    pub fn remaining_as_token(&mut self) -> Token {
        let mut text = std::mem::take(&mut self.remaining);
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            text = text[1..text.len() - 1].to_string();
        }

        let mut index = 0;
        while let Some(c) = text[index..].chars().next() {
            index += if c == '\\' {
                resolve_escape(&mut text, index)
            } else {
                c.len_utf8()
            };
        }

        self.classify(&text)
    }

    fn classify(&self, text: &str) -> Token {
        classify(&self.prefix, DEFAULT_PREFIX, text)
    }

    /// Classify `remaining[..end]` and keep the rest, left-trimmed.
    fn split_at(&mut self, end: usize) -> Token {
        let token = self.classify(&self.remaining[..end]);
        self.remaining = self.remaining[end..].trim_start().to_string();
        token
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.advance().ok()
    }
}

/// Resolve the escape sequence starting with the backslash at `index`,
/// rewriting `text` in place.
///
/// Returns the byte length of the character now at `index`, so the caller
/// continues scanning *after* it: a resolved `\\` or `\"` is never
/// re-interpreted. Unrecognised or incomplete escapes leave the backslash in
/// place and skip only the backslash.
fn resolve_escape(text: &mut String, index: usize) -> usize {
    let Some(next) = text[index + 1..].chars().next() else {
        return 1;
    };

    let (replacement, consumed) = match next {
        't' => ('\t', 2),
        'n' => ('\n', 2),
        '\\' => ('\\', 2),
        '"' => ('"', 2),
        'u' => match unicode_escape(&text[index + 2..]) {
            Some(c) => (c, 6),
            None => return 1,
        },
        _ => return 1,
    };

    let mut buf = [0u8; 4];
    text.replace_range(index..index + consumed, replacement.encode_utf8(&mut buf));
    replacement.len_utf8()
}

/// Four hex digits naming a Unicode scalar value.
fn unicode_escape(s: &str) -> Option<char> {
    let hex = s.get(..4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}
