use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::word::MEMORY_SIZE;

/// Failure to assemble a program. Assembly never produces a partial program.
#[derive(Debug, Diagnostic, Error)]
pub enum AsmError {
    #[error("Duplicate label `{label}`")]
    #[diagnostic(
        code(asm::duplicate_label),
        help("labels may only be defined once per program")
    )]
    DuplicateLabel {
        label: String,
        #[label("first defined here")]
        first: Option<SourceSpan>,
        #[label("defined again here")]
        span: SourceSpan,
    },

    #[error("Program is too long: more than {} instructions", MEMORY_SIZE)]
    #[diagnostic(
        code(asm::too_long),
        help("every line which is not blank or a comment occupies one memory cell")
    )]
    ProgramTooLong {
        #[label("this line does not fit in memory")]
        span: SourceSpan,
    },

    #[error("Unknown mnemonic `{mnemonic}`")]
    #[diagnostic(
        code(asm::unknown_mnemonic),
        help("available mnemonics are ADD, SUB, STA, LDA, BRA, BRZ, BRP, IN, OUT, HLT and DAT")
    )]
    UnknownMnemonic {
        mnemonic: String,
        #[label("unknown mnemonic")]
        span: SourceSpan,
    },

    #[error("Address {value} is out of range")]
    #[diagnostic(
        code(asm::address_range),
        help("addresses must be within 0 to 99")
    )]
    AddressOutOfRange {
        value: i64,
        #[label("not a memory address")]
        span: SourceSpan,
    },

    #[error("Undefined label `{label}`")]
    #[diagnostic(
        code(asm::undefined_label),
        help("operands must be a decimal literal or a label defined in this program")
    )]
    UndefinedLabel {
        label: String,
        #[label("label not found")]
        span: SourceSpan,
    },
}

/// Failure to read a flat word list.
#[derive(Debug, Diagnostic, Error)]
pub enum ProgramError {
    #[error("Invalid word `{word}` on line {line}")]
    #[diagnostic(
        code(program::invalid_word),
        help("word lists contain one decimal integer per line")
    )]
    InvalidWord {
        word: String,
        line: usize,
        #[label("not an integer")]
        span: SourceSpan,
    },

    #[error("Word list is too long: {len} words, at most {} fit in memory", MEMORY_SIZE)]
    #[diagnostic(code(program::too_long))]
    TooLong { len: usize },
}
