use std::fmt;

use crate::{
    error::{AsmError, ProgramError},
    ops::Op,
    parser::AsmParser,
    span::{Idx, Span},
    symbol::SymbolTable,
    word::{normalize, MEMORY_SIZE},
};

/// Assembled machine words, ready to be loaded at address 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    words: Vec<u16>,
    symbols: SymbolTable,
    /// Source line of each word, when assembled from source
    spans: Vec<Span>,
}

/// Assemble source text into a program of at most 100 words.
///
/// Runs both passes: labels are collected first, so operands may refer to labels defined further
/// down.
pub fn assemble(src: &str) -> Result<Program, AsmError> {
    let air = AsmParser::new(src).parse()?;
    let words = air.emit()?;
    let spans = air.spans();
    Ok(Program {
        words,
        symbols: air.into_symbols(),
        spans,
    })
}

impl Program {
    /// Program from raw words, normalizing each. Anything past memory size is dropped.
    pub fn from_words(words: &[i64]) -> Self {
        Program {
            words: words
                .iter()
                .take(MEMORY_SIZE)
                .map(|word| normalize(*word))
                .collect(),
            ..Default::default()
        }
    }

    /// Read a flat word list: one decimal integer per line, blank lines ignored.
    pub fn from_words_text(text: &str) -> Result<Self, ProgramError> {
        let mut words = Vec::new();
        let mut offs = 0;
        for (i, line) in text.split_inclusive('\n').enumerate() {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                let word = trimmed.parse::<i64>().map_err(|_| {
                    let start = offs + (line.len() - line.trim_start().len());
                    ProgramError::InvalidWord {
                        word: trimmed.to_string(),
                        line: i + 1,
                        span: Span::new(Idx(start), trimmed.len()).into(),
                    }
                })?;
                words.push(word);
            }
            offs += line.len();
        }
        if words.len() > MEMORY_SIZE {
            return Err(ProgramError::TooLong { len: words.len() });
        }
        Ok(Program::from_words(&words))
    }

    /// Flat word list, one zero-padded word per line.
    pub fn to_words_text(&self) -> String {
        self.words.iter().map(|word| format!("{word:03}\n")).collect()
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Source span of the line assembled into `address`.
    pub fn span(&self, address: u8) -> Option<Span> {
        self.spans.get(address as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Address/word listing with disassembly, for display.
    pub fn listing(&self) -> Listing<'_> {
        Listing(self)
    }
}

pub struct Listing<'a>(&'a Program);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let program = self.0;
        for (address, word) in program.words.iter().enumerate() {
            let label = program.symbols.label_at(address as u8).unwrap_or("");
            writeln!(
                f,
                "{:02}  {:03}  {:<10} {}",
                address,
                word,
                label,
                Op::decode(*word)
            )?;
        }
        Ok(())
    }
}
