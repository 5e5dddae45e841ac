//! Word tokenization
//!
//! Splits text into word tokens while remembering their byte ranges, so
//! corrections can be spliced back without disturbing punctuation or spacing.

/// A word token and its position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

impl Token<'_> {
    /// Tokens with digits ("2nd", "covid19") are never spell checked
    pub fn has_digit(&self) -> bool {
        self.text.chars().any(|c| c.is_numeric())
    }
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Split text into maximal runs of alphanumeric characters.
///
/// An apostrophe joins two runs only when it sits between them ("don't"),
/// so quoting apostrophes stay outside the token.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if !c.is_alphanumeric() {
            continue;
        }

        let mut end = start + c.len_utf8();
        loop {
            let mut ahead = text[end..].chars();
            match ahead.next() {
                Some(next) if next.is_alphanumeric() => end += next.len_utf8(),
                Some(next) if is_apostrophe(next) && ahead.next().is_some_and(char::is_alphanumeric) => {
                    end += next.len_utf8();
                }
                _ => break,
            }
        }

        while chars.peek().is_some_and(|&(i, _)| i < end) {
            chars.next();
        }

        tokens.push(Token {
            start,
            end,
            text: &text[start..end],
        });
    }

    tokens
}
