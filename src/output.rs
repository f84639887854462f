use std::cell::RefCell;
use std::str::Chars;

use colored::{ColoredString, Colorize};

use crate::ops::Op;
use crate::runtime::Snapshot;
use crate::word::{format_word, MEMORY_SIZE};

#[macro_export]
macro_rules! dprint {
    ( $cond:expr, $fmt:literal $($tt:tt)* ) => {{
        #[allow(unused_imports)]
        use $crate::output::Condition::*;
        let s = format!(
            $fmt
            $($tt)*
        );
        $crate::output::Output::Debugger($cond).print_str(&s);
    }};
}

#[macro_export]
macro_rules! dprintln {
    ( $cond:expr ) => {{
        #[allow(unused_imports)]
        use $crate::output::Condition::*;
        $crate::output::Output::Debugger($cond).print_str("\n");
    }};
    ( $cond:expr, $fmt:literal $($tt:tt)* ) => {{
        #[allow(unused_imports)]
        use $crate::output::Condition::*;
        let s = format!(
            concat!($fmt, "\n")
            $($tt)*
        );
        $crate::output::Output::Debugger($cond).print_str(&s);
    }};
}

#[derive(Clone, Copy, Debug)]
pub enum Output {
    /// Program output, on stdout
    Normal,
    /// Debugger chatter, on stderr
    Debugger(Condition),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Printed even with `--minimal`
    Always,
    /// Dropped with `--minimal`
    Sometimes,
}

struct Decolored<'a> {
    chars: Chars<'a>,
}

impl Output {
    thread_local! {
        static IS_LINE_START: RefCell<bool> = const { RefCell::new(true) };
        static IS_MINIMAL: RefCell<bool> = const { RefCell::new(false) };
    }

    pub fn set_line_start(new_value: bool) -> bool {
        Self::IS_LINE_START.with(|value| value.replace(new_value))
    }
    /// Private. Use [`Output::start_new_line`].
    fn is_line_start() -> bool {
        Self::IS_LINE_START.with(|value| *value.borrow())
    }
    pub fn set_minimal(new_value: bool) -> bool {
        Self::IS_MINIMAL.with(|value| value.replace(new_value))
    }
    pub fn is_minimal() -> bool {
        Self::IS_MINIMAL.with(|value| *value.borrow())
    }

    fn set_line_start_from_str(string: &str) {
        let last = Decolored::new(string).last();
        if let Some(ch) = last {
            Output::set_line_start(ch == '\n');
        }
    }

    pub fn print_str(&self, string: &str) {
        match self {
            Self::Normal => {
                if Self::is_minimal() {
                    print!("{}", Decolored::new(string).collect::<String>());
                } else {
                    print!("{}", string);
                }
                Self::set_line_start_from_str(string);
            }

            Self::Debugger(condition) => match (Self::is_minimal(), *condition) {
                (false, _) => {
                    eprint!("{}", ColoredString::from(string).blue());
                    Self::set_line_start_from_str(string);
                }
                // Always remove color if `--minimal`
                (true, Condition::Always) => {
                    eprint!("{}", Decolored::new(string).collect::<String>());
                    Self::set_line_start_from_str(string);
                }
                (true, Condition::Sometimes) => (),
            },
        }
    }

    pub fn start_new_line(&self) {
        if !Self::is_line_start() {
            self.print_str("\n");
        }
    }

    pub fn print_registers(&self, state: &Snapshot) {
        let status = if state.halted {
            "halted"
        } else if state.waiting_for_input {
            "waiting for input"
        } else {
            "ready"
        };

        if Self::is_minimal() {
            self.print_str(&format!("ACC {}\n", state.accumulator));
            self.print_str(&format!("PC {}\n", state.program_counter));
            self.print_str(&format!("IR {}\n", state.instruction_register));
            self.print_str(&format!("STATUS {}\n", status));
            return;
        }

        self.print_str("\x1b[2m┌──────────────────────────────┐\x1b[0m\n");
        self.print_str(&format!(
            "\x1b[2m│\x1b[0m \x1b[1mACC\x1b[0m  {:>4}   ({})             \x1b[2m│\x1b[0m\n",
            state.accumulator,
            format_word(state.accumulator as i64),
        ));
        self.print_str(&format!(
            "\x1b[2m│\x1b[0m \x1b[1mPC\x1b[0m   {:02}                      \x1b[2m│\x1b[0m\n",
            state.program_counter,
        ));
        self.print_str(&format!(
            "\x1b[2m│\x1b[0m \x1b[1mIR\x1b[0m   {:03}  {:<18}\x1b[2m│\x1b[0m\n",
            state.instruction_register,
            Op::decode(state.instruction_register).to_string(),
        ));
        self.print_str(&format!(
            "\x1b[2m│\x1b[0m \x1b[1mADR\x1b[0m  {:02}                      \x1b[2m│\x1b[0m\n",
            state.address_register(),
        ));
        self.print_str(&format!(
            "\x1b[2m│\x1b[0m \x1b[3m{:<28}\x1b[0m \x1b[2m│\x1b[0m\n",
            status,
        ));
        self.print_str("\x1b[2m└──────────────────────────────┘\x1b[0m\n");
    }

    /// Ten rows of ten cells, with the program counter highlighted.
    pub fn print_memory(&self, state: &Snapshot) {
        if !Self::is_minimal() {
            self.print_str("\x1b[2m    ");
            for col in 0..10 {
                self.print_str(&format!("  {col} "));
            }
            self.print_str("\x1b[0m\n");
        }
        for row in 0..MEMORY_SIZE / 10 {
            if !Self::is_minimal() {
                self.print_str(&format!("\x1b[2m{:02}\x1b[0m  ", row * 10));
            }
            for col in 0..10 {
                let address = row * 10 + col;
                let word = format!("{:03}", state.memory[address]);
                if address == state.program_counter as usize && !Self::is_minimal() {
                    self.print_str(&format!("\x1b[7m{}\x1b[0m ", word));
                } else {
                    self.print_str(&format!("{} ", word));
                }
            }
            self.print_str("\n");
        }
    }

    /// Value as signed decimal, followed by its memory form and disassembly.
    pub fn print_integer(&self, value: i64) {
        if Self::is_minimal() {
            self.print_str(&format!("{}\n", value));
            return;
        }
        let word = format_word(value);
        let op = word.parse().map(Op::decode).map(|op| op.to_string());
        self.print_str(&format!(
            "{:>5}  \x1b[2m{}  {}\x1b[0m\n",
            value,
            word,
            op.unwrap_or_default()
        ));
    }
}

impl<'a> Decolored<'a> {
    pub fn new(string: &'a str) -> Self {
        Self {
            chars: string.chars(),
        }
    }
}

impl Iterator for Decolored<'_> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ch) = self.chars.next() {
            // Skip everything between '\x1b' and 'm' (inclusive)
            if ch == '\x1b' {
                while self.chars.next().is_some_and(|ch| ch != 'm') {}
                continue;
            }
            return Some(ch);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decolored() {
        assert_eq!(Decolored::new("abcdef").collect::<String>(), "abcdef");
        assert_eq!(
            Decolored::new("abc\x1b[0;2mdef\x1b[0m").collect::<String>(),
            "abcdef"
        );
        assert_eq!(Decolored::new("abc\x1b[0xyz").collect::<String>(), "abc");
        assert_eq!(
            Decolored::new("abc\x1bw[0bxyzmdef").collect::<String>(),
            "abcdef"
        );
    }

    #[test]
    fn tracks_line_start() {
        Output::set_minimal(true);
        Output::set_line_start(true);
        Output::Debugger(Condition::Always).print_str("partial");
        assert!(!Output::is_line_start());
        Output::Debugger(Condition::Always).print_str("\x1b[1mdone\n\x1b[0m");
        assert!(Output::is_line_start());
        Output::set_minimal(false);
    }
}
