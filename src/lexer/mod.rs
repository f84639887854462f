use std::str::FromStr;

use crate::lexer::cursor::Cursor;
use crate::span::{Idx, Span};
use crate::symbol::{is_int_literal, strip_colon, Mnemonic};

pub mod cursor;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// Any run of characters that is not whitespace or a comment
    Word,
    /// From `;` to the end of the line
    Comment,
    Whitespace,
    Newline,
    Eof,
}

/// Test if a character separates words on a line.
pub(crate) fn is_whitespace(c: char) -> bool {
    c != '\n' && c.is_whitespace()
}

impl Cursor<'_> {
    pub fn advance_token(&mut self) -> Token {
        self.reset_pos();
        let first_char = match self.bump() {
            Some(c) => c,
            None => return self.token(TokenKind::Eof),
        };
        let kind = match first_char {
            ';' => {
                self.take_while(|c| c != '\n');
                TokenKind::Comment
            }
            '\n' => TokenKind::Newline,
            c if is_whitespace(c) => {
                self.take_while(is_whitespace);
                TokenKind::Whitespace
            }
            _ => {
                self.take_while(|c| !c.is_whitespace() && c != ';');
                TokenKind::Word
            }
        };
        self.token(kind)
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            span: Span::new(Idx(self.token_start()), self.pos_in_token()),
        }
    }
}

pub fn tokenize(input: &str) -> impl Iterator<Item = Token> + '_ {
    let mut cursor = Cursor::new(input);
    std::iter::from_fn(move || {
        let token = cursor.advance_token();
        if token.kind != TokenKind::Eof {
            Some(token)
        } else {
            None
        }
    })
}

/// A source line that carries at least one word once comments are removed.
///
/// Each of these occupies exactly one memory address.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct SourceLine {
    pub words: Vec<Span>,
}

impl SourceLine {
    /// Span from the start of the first word to the end of the last.
    pub fn span(&self) -> Span {
        let first = self.words[0];
        let last = self.words[self.words.len() - 1];
        first.join(last)
    }

    /// Split into `[LABEL] MNEMONIC [OPERAND]`. Words past the operand are ignored.
    pub fn fields<'a>(&self, src: &'a str) -> Fields<'a> {
        let mut words = self
            .words
            .iter()
            .map(|span| Field::new(&src[span.as_range()], *span))
            .peekable();

        let label = words
            .next_if(|word| is_label(word.text))
            .map(|word| Field::new(strip_colon(word.text), word.span));
        Fields {
            label,
            mnemonic: words.next(),
            operand: words.next(),
        }
    }
}

/// Split source into lines which occupy an address, dropping comments and blank lines.
pub fn lines(src: &str) -> Vec<SourceLine> {
    let mut res = Vec::new();
    let mut current = SourceLine { words: Vec::new() };
    for token in tokenize(src) {
        match token.kind {
            TokenKind::Word => current.words.push(token.span),
            TokenKind::Newline => {
                let done = std::mem::take(&mut current);
                if !done.words.is_empty() {
                    res.push(done);
                }
            }
            TokenKind::Comment | TokenKind::Whitespace | TokenKind::Eof => (),
        }
    }
    if !current.words.is_empty() {
        res.push(current);
    }
    res
}

/// A word on a line, with its location in source.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Field<'a> {
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Field<'a> {
    pub fn new(text: &'a str, span: Span) -> Self {
        Field { text, span }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Fields<'a> {
    /// Trailing colon already removed
    pub label: Option<Field<'a>>,
    pub mnemonic: Option<Field<'a>>,
    pub operand: Option<Field<'a>>,
}

/// First word of a line is a label unless it is an integer literal or a mnemonic.
///
/// `DAT` is a mnemonic like any other, so it can never name a label.
pub fn is_label(token: &str) -> bool {
    !is_int_literal(token) && Mnemonic::from_str(token).is_err()
}
