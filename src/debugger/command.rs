use std::fmt;

use super::{
    error::{ArgumentError, CommandError},
    parse::ArgIter,
};

#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    Step { count: u32 },
    Continue,
    Quit,
    Exit,
    Registers,
    Memory,
    Outputs,
    BreakList,
    BreakAdd { location: Location },
    BreakRemove { location: Location },
    Get { location: Location },
    Set { location: Location, value: i32 },
    Jump { location: Location },
    Input { value: i32 },
    Reset,
    Source { location: Location },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CommandName {
    Help,
    Step,
    Continue,
    Quit,
    Exit,
    Registers,
    Memory,
    Outputs,
    BreakList,
    BreakAdd,
    BreakRemove,
    Get,
    Set,
    Jump,
    Input,
    Reset,
    Source,
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Help => write!(f, "help"),
            Self::Step => write!(f, "step"),
            Self::Continue => write!(f, "continue"),
            Self::Quit => write!(f, "quit"),
            Self::Exit => write!(f, "exit"),
            Self::Registers => write!(f, "registers"),
            Self::Memory => write!(f, "memory"),
            Self::Outputs => write!(f, "outputs"),
            Self::BreakList => write!(f, "break list"),
            Self::BreakAdd => write!(f, "break add"),
            Self::BreakRemove => write!(f, "break remove"),
            Self::Get => write!(f, "get"),
            Self::Set => write!(f, "set"),
            Self::Jump => write!(f, "jump"),
            Self::Input => write!(f, "input"),
            Self::Reset => write!(f, "reset"),
            Self::Source => write!(f, "source"),
        }
    }
}

/// Memory address, as given by the user.
#[derive(Clone, Debug, PartialEq)]
pub enum Location {
    Address(u8),
    /// Resolved against the program's symbol table when the command runs
    Label(String),
    ProgramCounter,
}

impl TryFrom<&str> for Command {
    type Error = CommandError;

    /// Assumes line is non-empty.
    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let mut iter = ArgIter::from(line);

        let command_name = iter.get_command_name()?;
        Command::parse_arguments(command_name, &mut iter).map_err(|error| {
            CommandError::InvalidArgument {
                command_name,
                error,
            }
        })
    }
}

impl Command {
    fn parse_arguments(name: CommandName, iter: &mut ArgIter) -> Result<Self, ArgumentError> {
        let mut expected_args = 0;

        let command = match name {
            // Allow trailing arguments
            CommandName::Help => return Ok(Self::Help),

            CommandName::Continue => Self::Continue,
            CommandName::Quit => Self::Quit,
            CommandName::Exit => Self::Exit,
            CommandName::Registers => Self::Registers,
            CommandName::Memory => Self::Memory,
            CommandName::Outputs => Self::Outputs,
            CommandName::Reset => Self::Reset,
            CommandName::BreakList => Self::BreakList,

            CommandName::Step => {
                expected_args = 1;
                let count = iter.next_positive_integer_or_default("count")?;
                Self::Step { count }
            }

            CommandName::Get => {
                expected_args = 1;
                let location = iter.next_location("location", expected_args)?;
                Self::Get { location }
            }
            CommandName::Set => {
                expected_args = 2;
                let location = iter.next_location("location", expected_args)?;
                let value = iter.next_word_value("value", expected_args)?;
                Self::Set { location, value }
            }
            CommandName::Jump => {
                expected_args = 1;
                let location = iter.next_location("location", expected_args)?;
                Self::Jump { location }
            }
            CommandName::Input => {
                expected_args = 1;
                let value = iter.next_word_value("value", expected_args)?;
                Self::Input { value }
            }

            CommandName::BreakAdd => {
                expected_args = 1;
                let location = iter.next_location_or_default("location")?;
                Self::BreakAdd { location }
            }
            CommandName::BreakRemove => {
                expected_args = 1;
                let location = iter.next_location_or_default("location")?;
                Self::BreakRemove { location }
            }
            CommandName::Source => {
                expected_args = 1;
                let location = iter.next_location_or_default("location")?;
                Self::Source { location }
            }
        };

        iter.expect_end(expected_args)?;

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debugger::error::ValueError;

    fn parse(line: &str) -> Result<Command, CommandError> {
        Command::try_from(line)
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("help"), Ok(Command::Help));
        assert_eq!(parse("h me please"), Ok(Command::Help));
        assert_eq!(parse("c"), Ok(Command::Continue));
        assert_eq!(parse("  REGISTERS  "), Ok(Command::Registers));
        assert_eq!(parse("mem"), Ok(Command::Memory));
        assert_eq!(parse("out"), Ok(Command::Outputs));
        assert_eq!(parse("q"), Ok(Command::Quit));
        assert_eq!(parse("exit"), Ok(Command::Exit));
        assert_eq!(parse("reset"), Ok(Command::Reset));
    }

    #[test]
    fn step_count() {
        assert_eq!(parse("step"), Ok(Command::Step { count: 1 }));
        assert_eq!(parse("s 5"), Ok(Command::Step { count: 5 }));
        assert_eq!(parse("step 0"), Ok(Command::Step { count: 1 }));
        assert!(matches!(
            parse("step abc"),
            Err(CommandError::InvalidArgument {
                command_name: CommandName::Step,
                error: ArgumentError::InvalidValue {
                    error: ValueError::MismatchedType { .. },
                    ..
                },
            })
        ));
    }

    #[test]
    fn locations() {
        assert_eq!(
            parse("get 42"),
            Ok(Command::Get {
                location: Location::Address(42)
            })
        );
        assert_eq!(
            parse("get SUM"),
            Ok(Command::Get {
                location: Location::Label("SUM".into())
            })
        );
        assert_eq!(
            parse("jump start:"),
            Ok(Command::Jump {
                location: Location::Label("start".into())
            })
        );
        assert_eq!(
            parse("break add"),
            Ok(Command::BreakAdd {
                location: Location::ProgramCounter
            })
        );
        assert_eq!(
            parse("b r 7"),
            Ok(Command::BreakRemove {
                location: Location::Address(7)
            })
        );
        assert_eq!(parse("bl"), Ok(Command::BreakList));
    }

    #[test]
    fn values() {
        assert_eq!(
            parse("set X -12"),
            Ok(Command::Set {
                location: Location::Label("X".into()),
                value: -12,
            })
        );
        assert_eq!(parse("input +999"), Ok(Command::Input { value: 999 }));
        assert!(matches!(
            parse("input 1000"),
            Err(CommandError::InvalidArgument {
                error: ArgumentError::InvalidValue {
                    error: ValueError::OutOfRange { .. },
                    ..
                },
                ..
            })
        ));
        assert!(matches!(
            parse("get 100"),
            Err(CommandError::InvalidArgument {
                error: ArgumentError::InvalidValue {
                    error: ValueError::OutOfRange { min: 0, max: 99 },
                    ..
                },
                ..
            })
        ));
    }

    #[test]
    fn argument_counts() {
        assert_eq!(
            parse("set 4"),
            Err(CommandError::InvalidArgument {
                command_name: CommandName::Set,
                error: ArgumentError::MissingArgument {
                    argument_name: "value",
                    expected_count: 2,
                    actual_count: 1,
                },
            })
        );
        assert_eq!(
            parse("registers now"),
            Err(CommandError::InvalidArgument {
                command_name: CommandName::Registers,
                error: ArgumentError::TooManyArguments {
                    expected_count: 0,
                    actual_count: 1,
                },
            })
        );
        assert_eq!(
            parse("get"),
            Err(CommandError::InvalidArgument {
                command_name: CommandName::Get,
                error: ArgumentError::MissingArgument {
                    argument_name: "location",
                    expected_count: 1,
                    actual_count: 0,
                },
            })
        );
    }

    #[test]
    fn bad_names() {
        assert_eq!(
            parse("launch"),
            Err(CommandError::InvalidCommand {
                command_name: "launch".into()
            })
        );
        assert_eq!(
            parse("break"),
            Err(CommandError::MissingSubcommand {
                command_name: "break"
            })
        );
        assert_eq!(
            parse("break nothing"),
            Err(CommandError::InvalidSubcommand {
                command_name: "break",
                subcommand_name: "nothing".into(),
            })
        );
        assert!(matches!(
            parse("get :"),
            Err(CommandError::InvalidArgument {
                error: ArgumentError::InvalidValue {
                    error: ValueError::MalformedValue,
                    ..
                },
                ..
            })
        ));
    }
}
