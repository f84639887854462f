// Assembling
mod lexer;
mod parser;
pub use parser::AsmParser;
mod air;
pub use air::Air;
mod program;
pub use program::{assemble, Listing, Program};

mod error;
pub use error::{AsmError, ProgramError};
mod span;
pub use span::Span;
mod symbol;
pub use symbol::{Mnemonic, SymbolTable};
mod word;
pub use word::{normalize, wrap_signed, MEMORY_SIZE, WORD_MAX};

// Running
mod ops;
pub use ops::Op;
mod runtime;
pub use runtime::{
    Inbox, Outbox, RunEnvironment, RunState, RunStop, RunSummary, Snapshot, Status, StepResult,
    StepStatus,
};
#[macro_use]
mod output;
mod debugger;
pub use debugger::{Breakpoints, DebuggerOptions};

pub mod env;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 4;
