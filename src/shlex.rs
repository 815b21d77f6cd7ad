//! POSIX-style shell lexer (`shlex`).
//!
//! Splits a command string the way a POSIX shell would for word boundaries and quoting, with one twist
//! that the command templates depend on: **shell punctuation is tokenised on its own**. A run of
//! `( ) ; < > | &` is always a separate token, so `a|b>out` yields `a`, `|`, `b`, `>`, `out`.
//!
//! Rules:
//! - word characters are ASCII alphanumerics, `_`, Latin-1 letters and `~ - . / * ? =`
//! - any other unquoted character ends the current word and is returned as a one-character token
//! - `'...'` is literal; inside `"..."` only `\"` and `\\` are escapes; outside quotes `\x` is `x`
//! - `#` starts a comment that runs to the end of the line
//!
//! ### Example
//! ```text
//! samtools view -H in.bam | awk '{print $2}' > rgs.txt
//! => [samtools] [view] [-H] [in.bam] [|] [awk] [{print $2}] [>] [rgs.txt]
//! ```

use std::str::Chars;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no closing quotation")]
    NoClosingQuotation,
    #[error("no escaped character")]
    NoEscapedCharacter,
}

const PUNCTUATION: &str = "();<>|&";
const EXTRA_WORD_CHARS: &str = "~-./*?=";

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(c)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || EXTRA_WORD_CHARS.contains(c)
        || (('\u{c0}'..='\u{ff}').contains(&c) && c != '\u{d7}' && c != '\u{f7}')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Whitespace,
    Word,
    Punctuation,
    Quote(char),
    /// After a backslash; remembers the quote (if any) it appeared in.
    Escape(Option<char>),
}

/// Lazy token stream over one command string. Not restartable: once it has
/// yielded `None` or an error it stays exhausted.
pub struct Lexer<'a> {
    chars: Chars<'a>,
    pushback: Option<char>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { chars: input.chars(), pushback: None, done: false }
    }

    fn next_char(&mut self) -> Option<char> {
        self.pushback.take().or_else(|| self.chars.next())
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.next_char() {
            if c == '\n' { break; }
        }
    }

    fn read_token(&mut self) -> Result<Option<String>, ParseError> {
        let mut state = State::Whitespace;
        let mut token = String::new();
        let mut quoted = false;

        loop {
            let next = self.next_char();
            match state {
                State::Whitespace => match next {
                    None => break,
                    Some(c) if is_whitespace(c) => continue,
                    Some('#') => self.skip_comment(),
                    Some('\\') => state = State::Escape(None),
                    Some(c) if is_word_char(c) => {
                        token.push(c);
                        state = State::Word;
                    }
                    Some(c) if is_punctuation(c) => {
                        token.push(c);
                        state = State::Punctuation;
                    }
                    Some(c @ ('\'' | '"')) => state = State::Quote(c),
                    Some(c) => {
                        token.push(c);
                        break;
                    }
                },
                State::Quote(q) => {
                    quoted = true;
                    match next {
                        None => return Err(ParseError::NoClosingQuotation),
                        Some(c) if c == q => state = State::Word,
                        Some('\\') if q == '"' => state = State::Escape(Some(q)),
                        Some(c) => token.push(c),
                    }
                }
                State::Escape(within) => {
                    let c = next.ok_or(ParseError::NoEscapedCharacter)?;
                    // Inside double quotes a backslash only escapes the quote or itself.
                    if let Some(q) = within {
                        if c != '\\' && c != q {
                            token.push('\\');
                        }
                    }
                    token.push(c);
                    state = within.map_or(State::Word, State::Quote);
                }
                State::Word | State::Punctuation => match next {
                    None => break,
                    Some(c) if is_whitespace(c) => break,
                    Some('#') => {
                        self.skip_comment();
                        break;
                    }
                    Some(c) if state == State::Punctuation => {
                        if is_punctuation(c) {
                            token.push(c);
                        } else {
                            self.pushback = Some(c);
                            break;
                        }
                    }
                    Some(c @ ('\'' | '"')) => state = State::Quote(c),
                    Some('\\') => state = State::Escape(None),
                    Some(c) if is_word_char(c) => token.push(c),
                    Some(c) => {
                        self.pushback = Some(c);
                        break;
                    }
                },
            }
        }

        if token.is_empty() && !quoted {
            Ok(None)
        } else {
            Ok(Some(token))
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<String, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Tokenise a whole command string.
pub fn split(input: &str) -> Result<Vec<String>, ParseError> {
    Lexer::new(input).collect()
}
