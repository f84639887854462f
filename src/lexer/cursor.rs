// Heavily inspired by `rustc_lexer` and adapted to suit the project.
// See https://doc.rust-lang.org/beta/nightly-rustc/src/rustc_lexer/cursor.rs.html

use std::str::Chars;

/// Peekable iterator over a char sequence.
pub struct Cursor<'a> {
    /// Full input, used to compute byte offsets
    input: &'a str,
    /// Remaining characters
    chars: Chars<'a>,
    /// Byte offset where the current token started
    token_start: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Cursor<'a> {
        Cursor {
            input,
            chars: input.chars(),
            token_start: 0,
        }
    }

    /// Peek the next character without consuming it.
    pub fn first(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Move to the next character.
    pub fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Eat characters while predicate returns true or until the end of input.
    pub fn take_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while self.first().is_some_and(&mut predicate) {
            self.bump();
        }
    }

    /// Byte offset of the cursor from the start of input.
    pub fn pos(&self) -> usize {
        self.input.len() - self.chars.as_str().len()
    }

    /// Byte offset where the current token started.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Length in bytes of the token consumed so far.
    pub fn pos_in_token(&self) -> usize {
        self.pos() - self.token_start
    }

    /// Start a new token at the current position.
    pub fn reset_pos(&mut self) {
        self.token_start = self.pos();
    }
}
