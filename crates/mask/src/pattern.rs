//! Mask pattern grammar.
//!
//! - `0` digit placeholder
//! - `a` letter placeholder
//! - `*` any non-whitespace character
//! - `\x` escapes `x` as a fixed literal
//! - `[...]` literal display prefix, copied verbatim (placeholders inside are literal)
//! - everything else is a fixed literal
//!
//! Display is lazy: literals are only emitted once the placeholder after them
//! receives a character, except trailing literals, which appear when the last
//! placeholder is filled.

use std::fmt;

/// A fillable position in a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Digit,
    Letter,
    Any,
}

impl Slot {
    pub fn accepts(self, ch: char) -> bool {
        match self {
            Slot::Digit => ch.is_ascii_digit(),
            Slot::Letter => ch.is_alphabetic(),
            Slot::Any => !ch.is_whitespace(),
        }
    }
}

/// One display position of a compiled mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Literal(char),
    Slot(Slot),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// Pattern is the empty string.
    Empty,
    /// `[` without a matching `]`.
    UnclosedPrefix { open_at: usize },
    /// Pattern ends with a lone `\`.
    DanglingEscape,
    /// Pattern contains only literals, so nothing could ever be typed.
    NoPlaceholders,
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty mask pattern"),
            Self::UnclosedPrefix { open_at } => {
                write!(f, "unclosed '[' at byte {open_at}")
            }
            Self::DanglingEscape => write!(f, "pattern ends with an escape character"),
            Self::NoPlaceholders => write!(f, "pattern has no placeholders"),
        }
    }
}

impl std::error::Error for MaskError {}

/// A compiled mask pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskPattern {
    tokens: Vec<Token>,
}

impl MaskPattern {
    pub fn parse(pattern: &str) -> Result<Self, MaskError> {
        if pattern.is_empty() {
            return Err(MaskError::Empty);
        }

        let mut tokens = Vec::with_capacity(pattern.len());
        let mut chars = pattern.char_indices();
        while let Some((at, ch)) = chars.next() {
            match ch {
                '0' => tokens.push(Token::Slot(Slot::Digit)),
                'a' => tokens.push(Token::Slot(Slot::Letter)),
                '*' => tokens.push(Token::Slot(Slot::Any)),
                '\\' => match chars.next() {
                    Some((_, escaped)) => tokens.push(Token::Literal(escaped)),
                    None => return Err(MaskError::DanglingEscape),
                },
                '[' => {
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        if inner == ']' {
                            closed = true;
                            break;
                        }
                        tokens.push(Token::Literal(inner));
                    }
                    if !closed {
                        return Err(MaskError::UnclosedPrefix { open_at: at });
                    }
                }
                other => tokens.push(Token::Literal(other)),
            }
        }

        if !tokens.iter().any(|t| matches!(t, Token::Slot(_))) {
            return Err(MaskError::NoPlaceholders);
        }
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of fillable positions.
    pub fn placeholder_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| matches!(t, Token::Slot(_)))
            .count()
    }

    /// Format raw input. Characters a placeholder rejects are skipped; input
    /// punctuation that matches the next literal is absorbed so already-masked
    /// text formats to itself. A literal the following placeholder accepts is
    /// never absorbed: for `*-*` the raw `a-` fills both slots.
    pub fn apply(&self, raw: &str) -> String {
        let mut out = String::with_capacity(self.tokens.len());
        let mut pending = String::new();
        let mut input = raw.chars().peekable();

        for (i, token) in self.tokens.iter().enumerate() {
            match *token {
                Token::Literal(lit) => {
                    pending.push(lit);
                    // Alphanumeric literals never absorb input, or a raw digit
                    // could be swallowed by a literal digit in a prefix.
                    if !lit.is_alphanumeric()
                        && !self.next_slot_accepts(i, lit)
                        && input.peek() == Some(&lit)
                    {
                        input.next();
                    }
                }
                Token::Slot(slot) => {
                    let Some(ch) = input.by_ref().find(|&c| slot.accepts(c)) else {
                        return out;
                    };
                    out.push_str(&pending);
                    pending.clear();
                    out.push(ch);
                }
            }
        }

        out.push_str(&pending);
        out
    }

    fn next_slot_accepts(&self, after: usize, ch: char) -> bool {
        self.tokens[after + 1..]
            .iter()
            .find_map(|t| match *t {
                Token::Slot(slot) => Some(slot),
                Token::Literal(_) => None,
            })
            .is_some_and(|slot| slot.accepts(ch))
    }

    /// Recover the raw value from masked text.
    pub fn extract(&self, masked: &str) -> String {
        let mut raw = String::new();
        let mut input = masked.chars().peekable();

        for token in &self.tokens {
            match *token {
                Token::Literal(lit) => {
                    if input.peek() == Some(&lit) {
                        input.next();
                    }
                }
                Token::Slot(slot) => match input.by_ref().find(|&c| slot.accepts(c)) {
                    Some(ch) => raw.push(ch),
                    None => break,
                },
            }
        }

        raw
    }

    pub fn is_complete(&self, value: &str) -> bool {
        self.extract(value).chars().count() == self.placeholder_count()
    }

    pub fn next_placeholder_after(&self, current: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(current.saturating_add(1))
            .find(|(_, t)| matches!(t, Token::Slot(_)))
            .map(|(i, _)| i)
    }

    pub fn placeholder_template(&self, fill: char) -> String {
        self.tokens
            .iter()
            .map(|t| match *t {
                Token::Literal(c) => c,
                Token::Slot(_) => fill,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        let mask = MaskPattern::parse("0a*-").unwrap();
        assert_eq!(
            mask.tokens(),
            &[
                Token::Slot(Slot::Digit),
                Token::Slot(Slot::Letter),
                Token::Slot(Slot::Any),
                Token::Literal('-'),
            ]
        );
        assert_eq!(mask.placeholder_count(), 3);
    }

    #[test]
    fn test_parse_escape() {
        let mask = MaskPattern::parse("\\00").unwrap();
        assert_eq!(mask.tokens(), &[Token::Literal('0'), Token::Slot(Slot::Digit)]);
        assert_eq!(mask.apply("7"), "07");
        assert_eq!(mask.extract("07"), "7");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(MaskPattern::parse(""), Err(MaskError::Empty));
        assert_eq!(MaskPattern::parse("ab\\"), Err(MaskError::DanglingEscape));
        assert_eq!(
            MaskPattern::parse("00[x"),
            Err(MaskError::UnclosedPrefix { open_at: 2 })
        );
        assert_eq!(MaskPattern::parse("(-)"), Err(MaskError::NoPlaceholders));
        assert_eq!(MaskPattern::parse("[000]"), Err(MaskError::NoPlaceholders));
    }

    #[test]
    fn test_letter_and_any_slots() {
        let mask = MaskPattern::parse("aa-**").unwrap();
        assert_eq!(mask.apply("abx9"), "ab-x9");
        assert_eq!(mask.apply("ab1x9"), "ab-1x");
        assert_eq!(mask.apply("1ab"), "ab");
        assert_eq!(mask.extract("ab-x9"), "abx9");
    }

    #[test]
    fn test_any_slot_keeps_literal_characters() {
        let mask = MaskPattern::parse("*-*").unwrap();
        assert_eq!(mask.apply("a-"), "a--");
        assert_eq!(mask.extract("a--"), "a-");
        assert!(mask.is_complete("a--"));

        // Digits never take '-', so the typed separator is still absorbed.
        let mask = MaskPattern::parse("*-0").unwrap();
        assert_eq!(mask.apply("--3"), "--3");
        assert_eq!(mask.extract("--3"), "-3");
    }

    #[test]
    fn test_is_complete_counts_slots() {
        let mask = MaskPattern::parse("000-00-0000").unwrap();
        assert!(mask.is_complete("123-45-6789"));
        assert!(mask.is_complete("123456789"));
        assert!(!mask.is_complete("123-45-678"));
    }
}
