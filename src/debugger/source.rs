use std::io::{self, IsTerminal, Read, Write};

use console::Term;

use crate::dprintln;

/// Where debugger commands come from.
#[derive(Debug)]
pub enum Source {
    Argument(Argument),
    Stdin(Stdin),
    Terminal(Terminal),
}

/// Stdin which is not attached to a terminal, i.e. piped.
#[derive(Debug)]
pub struct Stdin {
    stdin: io::Stdin,
    /// Command must be stored somewhere to be referenced
    buffer: String,
}

/// Command-line argument
#[derive(Debug)]
pub struct Argument {
    buffer: String,
    /// Byte index
    cursor: usize,
}

/// Interactive terminal, read a line at a time
#[derive(Debug)]
pub struct Terminal {
    term: Term,
    buffer: String,
    /// Byte index into `buffer`. Zero when a new line must be read.
    cursor: usize,
}

pub trait SourceRead {
    /// `None` indicates EOF.
    /// Returned string slice MAY include leading or trailing whitespace.
    fn read(&mut self) -> Option<&str>;
}

impl From<Option<String>> for Source {
    fn from(argument: Option<String>) -> Self {
        if let Some(argument) = argument {
            return Source::Argument(Argument::from(argument));
        }
        let stdin = io::stdin();
        if stdin.is_terminal() {
            return Source::Terminal(Terminal::new());
        }
        Source::Stdin(Stdin::from(stdin))
    }
}

impl SourceRead for Source {
    fn read(&mut self) -> Option<&str> {
        let command = match self {
            Self::Argument(argument) => argument.read(),
            Self::Stdin(stdin) => stdin.read(),
            Self::Terminal(terminal) => return terminal.read(),
        };
        // Echo prompt and command for non-terminal source
        if let Some(command) = &command {
            dprintln!(Sometimes, "\x1b[1mCommand:\x1b[0m {}", command.trim());
        }
        command
    }
}

impl From<String> for Argument {
    fn from(buffer: String) -> Self {
        Self { buffer, cursor: 0 }
    }
}

impl SourceRead for Argument {
    fn read(&mut self) -> Option<&str> {
        // EOF
        if self.cursor >= self.buffer.len() {
            return None;
        }

        // Take characters until delimiter
        let rest = &self.buffer[self.cursor..];
        let len = rest.find(['\n', ';']).unwrap_or(rest.len());
        let start = self.cursor;
        // Skip delimiter as well
        self.cursor += len + 1;

        self.buffer.get(start..start + len)
    }
}

impl From<io::Stdin> for Stdin {
    fn from(stdin: io::Stdin) -> Self {
        Self {
            stdin,
            buffer: String::new(),
        }
    }
}

impl Stdin {
    /// `None` indicates EOF. Read errors are treated as EOF.
    fn read_char(&mut self) -> Option<char> {
        let mut buffer = [0; 1];
        match self.stdin.read(&mut buffer) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(buffer[0] as char),
        }
    }
}

impl SourceRead for Stdin {
    fn read(&mut self) -> Option<&str> {
        self.buffer.clear();

        // Take characters until delimiter
        loop {
            let Some(ch) = self.read_char() else {
                if self.buffer.is_empty() {
                    // First character is EOF
                    return None;
                }
                break;
            };
            if ch == '\n' || ch == ';' {
                break;
            }
            self.buffer.push(ch);
        }

        Some(&self.buffer)
    }
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            buffer: String::new(),
            cursor: 0,
        }
    }

    /// Read entire (multi-command) line from terminal. `false` on EOF.
    fn read_line(&mut self) -> bool {
        loop {
            let _ = write!(self.term, "\x1b[1;34mCommand:\x1b[0m ");
            let _ = self.term.flush();
            match self.term.read_line() {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    self.buffer = line;
                    return true;
                }
                Err(_) => return false,
            }
        }
    }

    /// Returns next command from line buffer.
    fn get_next_command(&mut self) -> &str {
        let rest = &self.buffer[self.cursor..];
        match rest.find(';') {
            // Multiple commands in buffer
            // Take first command and update head index
            Some(index) => {
                self.cursor += index + 1;
                &rest[..index]
            }
            // Rest of buffer is 1 command
            // Take rest of buffer and reset head index
            None => {
                self.cursor = 0;
                rest
            }
        }
    }
}

impl SourceRead for Terminal {
    fn read(&mut self) -> Option<&str> {
        // Reached end of line buffer: read new line
        if self.cursor == 0 && !self.read_line() {
            return None;
        }
        Some(self.get_next_command())
    }
}
