use std::str::SplitWhitespace;

use super::command::{CommandName, Location};
use super::error::{ArgumentError, CommandError, ValueError};
use crate::symbol::{is_int_literal, parse_int_literal, strip_colon};
use crate::word::MEMORY_SIZE;

#[derive(Debug, PartialEq)]
enum Argument {
    Integer(i64),
    Label(String),
}

impl Argument {
    pub fn kind(&self) -> &'static str {
        match self {
            Argument::Integer(_) => "integer",
            Argument::Label(_) => "label",
        }
    }
}

/// Returns `true` if `name` matchs any item of `candidates` (case insensitive).
fn matches(name: &str, candidates: &[&str]) -> bool {
    candidates
        .iter()
        .any(|candidate| name.eq_ignore_ascii_case(candidate))
}

/// Returns the first [`CommandName`] with a candidate matching `name` (case insensitive).
fn find_match(name: &str, commands: &[(CommandName, &[&str])]) -> Option<CommandName> {
    commands
        .iter()
        .find(|(_, candidates)| matches(name, candidates))
        .map(|(command, _)| *command)
}

pub struct ArgIter<'a> {
    words: SplitWhitespace<'a>,
    /// Amount of arguments successfully taken.
    arg_count: u8,
}

impl<'a> From<&'a str> for ArgIter<'a> {
    fn from(line: &'a str) -> Self {
        Self {
            words: line.split_whitespace(),
            arg_count: 0,
        }
    }
}

impl ArgIter<'_> {
    /// Parse and consume command name.
    ///
    /// Considers multi-word command names (i.e. subcommands) as one name. Eg. `break add`.
    pub fn get_command_name(&mut self) -> Result<CommandName, CommandError> {
        let command_name = self.words.next().unwrap_or("");

        #[rustfmt::skip]
        let commands: &[(_, &[_])] = &[
            (CommandName::Help,        &["help", "--help", "h", "-h", "?"]),
            (CommandName::Step,        &["step", "s"]),
            (CommandName::Continue,    &["continue", "cont", "c"]),
            (CommandName::Quit,        &["quit", "q"]),
            (CommandName::Exit,        &["exit"]),
            (CommandName::Registers,   &["registers", "reg", "r"]),
            (CommandName::Memory,      &["memory", "mem", "m"]),
            (CommandName::Outputs,     &["outputs", "out", "o"]),
            (CommandName::Get,         &["get", "g"]),
            (CommandName::Set,         &["set"]),
            (CommandName::Jump,        &["jump", "j"]),
            (CommandName::Input,       &["input", "in", "i"]),
            (CommandName::Reset,       &["reset"]),
            (CommandName::Source,      &["source", "src", "asm"]),
            (CommandName::BreakList,   &["breaklist", "bl"]),
            (CommandName::BreakAdd,    &["breakadd", "ba"]),
            (CommandName::BreakRemove, &["breakremove", "br"]),
        ];
        let break_command = &["break", "b"];
        #[rustfmt::skip]
        let break_subcommands: &[(_, &[_])] = &[
            (CommandName::BreakList,   &["list", "l"]),
            (CommandName::BreakAdd,    &["add", "a"]),
            (CommandName::BreakRemove, &["remove", "r"]),
        ];

        if let Some(command) = find_match(command_name, commands) {
            return Ok(command);
        }

        if matches(command_name, break_command) {
            // Normalize name and get as `'static`
            let command_name = break_command[0];

            let Some(subname) = self.words.next() else {
                return Err(CommandError::MissingSubcommand { command_name });
            };
            if let Some(command) = find_match(subname, break_subcommands) {
                return Ok(command);
            }
            return Err(CommandError::InvalidSubcommand {
                command_name,
                subcommand_name: subname.to_string(),
            });
        }

        Err(CommandError::InvalidCommand {
            command_name: command_name.to_string(),
        })
    }

    /// Parse and consume next positive integer argument, defaulting to `1`.
    ///
    /// Non-positive values will also be converted to `1`.
    pub fn next_positive_integer_or_default(
        &mut self,
        argument_name: &'static str,
    ) -> Result<u32, ArgumentError> {
        match self.next_argument(argument_name)? {
            Some(Argument::Integer(count)) => Ok(count.clamp(1, u32::MAX as i64) as u32),
            Some(value) => Err(mismatched(argument_name, "integer", &value)),
            None => Ok(1),
        }
    }

    /// Parse and consume next integer argument, which must fit in a signed word.
    pub fn next_word_value(
        &mut self,
        argument_name: &'static str,
        expected_count: u8,
    ) -> Result<i32, ArgumentError> {
        let actual_count = self.arg_count;
        match self.next_argument(argument_name)? {
            Some(Argument::Integer(value)) => {
                if (-999..=999).contains(&value) {
                    Ok(value as i32)
                } else {
                    Err(ArgumentError::InvalidValue {
                        argument_name,
                        error: ValueError::OutOfRange {
                            min: -999,
                            max: 999,
                        },
                    })
                }
            }
            Some(value) => Err(mismatched(argument_name, "integer", &value)),
            None => Err(ArgumentError::MissingArgument {
                argument_name,
                expected_count,
                actual_count,
            }),
        }
    }

    /// Parse and consume next [`Location`] argument: an address or a label.
    pub fn next_location(
        &mut self,
        argument_name: &'static str,
        expected_count: u8,
    ) -> Result<Location, ArgumentError> {
        let actual_count = self.arg_count;
        self.next_location_inner(
            argument_name,
            Err(ArgumentError::MissingArgument {
                argument_name,
                expected_count,
                actual_count,
            }),
        )
    }

    /// Parse and consume next [`Location`] argument, defaulting to the program counter.
    pub fn next_location_or_default(
        &mut self,
        argument_name: &'static str,
    ) -> Result<Location, ArgumentError> {
        self.next_location_inner(argument_name, Ok(Location::ProgramCounter))
    }

    fn next_location_inner(
        &mut self,
        argument_name: &'static str,
        default: Result<Location, ArgumentError>,
    ) -> Result<Location, ArgumentError> {
        match self.next_argument(argument_name)? {
            Some(Argument::Integer(address)) => {
                if (0..MEMORY_SIZE as i64).contains(&address) {
                    Ok(Location::Address(address as u8))
                } else {
                    Err(ArgumentError::InvalidValue {
                        argument_name,
                        error: ValueError::OutOfRange {
                            min: 0,
                            max: MEMORY_SIZE as i32 - 1,
                        },
                    })
                }
            }
            Some(Argument::Label(label)) => Ok(Location::Label(label)),
            None => default,
        }
    }

    /// Check that there are no more arguments.
    pub fn expect_end(&mut self, expected_count: u8) -> Result<(), ArgumentError> {
        let extra = self.words.by_ref().count();
        if extra == 0 {
            return Ok(());
        }
        Err(ArgumentError::TooManyArguments {
            expected_count,
            actual_count: self.arg_count.saturating_add(extra as u8),
        })
    }

    /// `Ok(None)` when there are no arguments left.
    fn next_argument(
        &mut self,
        argument_name: &'static str,
    ) -> Result<Option<Argument>, ArgumentError> {
        let Some(word) = self.words.next() else {
            return Ok(None);
        };
        let argument = if is_int_literal(word) {
            Argument::Integer(parse_int_literal(word))
        } else if !strip_colon(word).is_empty() {
            // Any other word may name a label; the symbol table decides
            Argument::Label(strip_colon(word).to_string())
        } else {
            return Err(ArgumentError::InvalidValue {
                argument_name,
                error: ValueError::MalformedValue,
            });
        };
        self.arg_count += 1;
        Ok(Some(argument))
    }
}

fn mismatched(argument_name: &'static str, expected_type: &'static str, value: &Argument) -> ArgumentError {
    ArgumentError::InvalidValue {
        argument_name,
        error: ValueError::MismatchedType {
            expected_type,
            actual_type: value.kind(),
        },
    }
}
