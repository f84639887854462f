mod breakpoint;
mod command;
mod error;
mod parse;
mod source;

pub use self::breakpoint::Breakpoints;
use self::command::{Command, Location};
use self::source::{Source, SourceRead};
use crate::output::{Condition, Output};
use crate::program::Program;
use crate::runtime::{print_outputs, Inbox, Outbox, RunState, RunStop, RunSummary};
use crate::{dprint, dprintln, env};

/// Leave this as a struct, in case more options are added in the future. Plus it is more explicit.
#[derive(Debug, Default)]
pub struct DebuggerOptions {
    /// Commands to run instead of reading stdin
    pub command: Option<String>,
}

/// Interactive front-end driving a [`RunState`] one command at a time.
pub struct Debugger {
    /// Reloaded by `reset`
    program: Program,
    /// Assembly source, if the program was assembled from one
    src: Option<String>,
    /// Inputs queued before the debugger took over, restored by `reset`
    initial_inputs: Inbox,

    command_source: Source,
    breakpoints: Breakpoints,
    /// Whether PC should be displayed on next command prompt.
    should_echo_pc: bool,
}

/// An action, which the debugger passes to the runtime loop.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Disable the debugger, keep executing.
    StopDebugger,
    /// Exit the entire program, as if it had halted.
    ExitProgram,
}

impl Debugger {
    pub fn new(opts: DebuggerOptions, program: Program, src: Option<String>) -> Self {
        Self {
            program,
            src,
            initial_inputs: Inbox::new(),
            command_source: Source::from(opts.command),
            breakpoints: Breakpoints::default(),
            should_echo_pc: true,
        }
    }

    /// Read and execute commands until one hands control back to the runtime.
    pub fn run(&mut self, state: &mut RunState, inbox: &mut Inbox, outbox: &mut Outbox) -> Action {
        self.initial_inputs = inbox.clone();
        loop {
            Output::Debugger(Condition::Always).start_new_line();
            if self.should_echo_pc {
                dprintln!(Sometimes, "Program counter at: {:02}.", state.pc());
                self.should_echo_pc = false;
            }

            // Convert `EOF` to `quit` command
            let command = self.next_command().unwrap_or(Command::Quit);
            if let Some(action) = self.execute(command, state, inbox, outbox) {
                return action;
            }
        }
    }

    fn execute(
        &mut self,
        command: Command,
        state: &mut RunState,
        inbox: &mut Inbox,
        outbox: &mut Outbox,
    ) -> Option<Action> {
        match command {
            Command::Quit => return Some(Action::StopDebugger),
            Command::Exit => return Some(Action::ExitProgram),

            Command::Help => {
                dprintln!(Always, "\n{}", include_str!("./help.txt"));
            }

            Command::Step { count } => {
                let summary = self.execute_cycles(state, inbox, outbox, count as usize);
                if summary.stop == RunStop::StepLimit {
                    self.should_echo_pc = true;
                }
            }
            Command::Continue => {
                dprintln!(Sometimes, "Continuing...");
                let limit = env::step_limit();
                let summary = self.execute_cycles(state, inbox, outbox, limit);
                if summary.stop == RunStop::StepLimit {
                    dprintln!(
                        Always,
                        "Step limit of {} reached. Pausing execution.",
                        limit
                    );
                    self.should_echo_pc = true;
                }
            }

            Command::Registers => {
                dprintln!(Sometimes, "Registers:");
                Output::Debugger(Condition::Always).print_registers(&state.snapshot());
            }
            Command::Memory => {
                dprintln!(Sometimes, "Memory:");
                Output::Debugger(Condition::Always).print_memory(&state.snapshot());
            }
            Command::Outputs => {
                if outbox.is_empty() {
                    dprintln!(Always, "No output yet.");
                } else {
                    dprintln!(Sometimes, "Outputs:");
                    for value in outbox.as_slice() {
                        dprintln!(Always, "{}", value);
                    }
                }
            }

            Command::Get { location } => {
                let address = self.resolve_location(state, &location)?;
                dprintln!(Sometimes, "Memory at address {:02}:", address);
                Output::Debugger(Condition::Always).print_integer(state.read(address as usize) as i64);
            }
            Command::Set { location, value } => {
                let address = self.resolve_location(state, &location)?;
                state.write(address as usize, value as i64);
                dprintln!(Always, "Updated memory at address {:02}.", address);
            }
            Command::Jump { location } => {
                let address = self.resolve_location(state, &location)?;
                state.set_program_counter(address as usize);
                dprintln!(Always, "Set program counter to {:02}.", address);
            }
            Command::Input { value } => {
                inbox.push(value);
                dprintln!(
                    Always,
                    "Queued input {} ({} pending).",
                    value,
                    inbox.len()
                );
            }

            Command::Reset => {
                state.load(self.program.words());
                *inbox = self.initial_inputs.clone();
                outbox.clear();
                self.should_echo_pc = true;
                dprintln!(Always, "Reset program to initial state.");
            }

            Command::Source { location } => {
                let address = self.resolve_location(state, &location)?;
                self.show_line_context(address);
            }

            Command::BreakAdd { location } => {
                let address = self.resolve_location(state, &location)?;
                if self.breakpoints.insert(address) {
                    dprintln!(Always, "Added breakpoint at {:02}.", address);
                } else {
                    dprintln!(Always, "Breakpoint already exists at {:02}.", address);
                }
            }
            Command::BreakRemove { location } => {
                let address = self.resolve_location(state, &location)?;
                if self.breakpoints.remove(address) {
                    dprintln!(Always, "Removed breakpoint at {:02}.", address);
                } else {
                    dprintln!(Always, "No breakpoint exists at {:02}.", address);
                }
            }
            Command::BreakList => {
                if self.breakpoints.is_empty() {
                    dprintln!(Always, "No breakpoints exist.");
                } else {
                    dprintln!(Always, "Breakpoints:");
                    for (i, address) in self.breakpoints.iter().enumerate() {
                        if Output::is_minimal() {
                            dprintln!(Always, "{:02}", address);
                            continue;
                        }
                        dprint!(
                            Always,
                            "{} {:02}  ──  ",
                            if i + 1 == self.breakpoints.len() {
                                "╰─"
                            } else {
                                "├─"
                            },
                            address
                        );
                        self.show_single_line(address);
                        dprintln!(Always);
                    }
                }
            }
        }

        None
    }

    /// Run up to `limit` cycles, printing output as it is produced, and report why it stopped.
    fn execute_cycles(
        &mut self,
        state: &mut RunState,
        inbox: &mut Inbox,
        outbox: &mut Outbox,
        limit: usize,
    ) -> RunSummary {
        let printed = outbox.len();
        let summary = state.run_until(inbox, outbox, &self.breakpoints, limit);
        print_outputs(&outbox.as_slice()[printed..]);

        Output::Debugger(Condition::Always).start_new_line();
        if summary.steps > 0 {
            dprintln!(
                Always,
                "Executed {} instruction{}.",
                summary.steps,
                if summary.steps == 1 { "" } else { "s" },
            );
        }
        match summary.stop {
            RunStop::Halted => {
                dprintln!(Always, "Program halted. Use `reset` to run it again.");
            }
            RunStop::Waiting => {
                dprintln!(
                    Always,
                    "Waiting for input at {:02}. Use `input <value>` to provide one.",
                    state.pc()
                );
            }
            RunStop::Breakpoint(address) => {
                dprintln!(Always, "Reached breakpoint at {:02}. Pausing execution.", address);
            }
            RunStop::StepLimit => (),
        }
        summary
    }

    /// Returns `None` on EOF.
    fn next_command(&mut self) -> Option<Command> {
        // Loop until valid command or EOF
        loop {
            let line = self.command_source.read()?.trim();
            // Necessary, since `Command::try_from` assumes non-empty line
            if line.is_empty() {
                continue;
            }

            match Command::try_from(line) {
                Ok(command) => return Some(command),
                Err(error) => {
                    dprintln!(Always, "{}", error);
                    dprintln!(Always, "Type `help` for a list of commands.");
                }
            }
        }
    }

    fn resolve_location(&self, state: &RunState, location: &Location) -> Option<u8> {
        match location {
            Location::Address(address) => Some(*address),
            Location::ProgramCounter => Some(state.pc()),
            Location::Label(name) => {
                let Some(address) = self.program.symbols().get(name) else {
                    dprintln!(Always, "Label not found named `{}`.", name);
                    return None;
                };
                dprintln!(Sometimes, "Label `{}` is at address {:02}.", name, address);
                Some(address)
            }
        }
    }

    fn show_line_context(&self, address: u8) {
        let (Some(src), Some(span)) = (&self.src, self.program.span(address)) else {
            dprintln!(
                Always,
                "Address {:02} does not correspond to a source line.",
                address
            );
            return;
        };
        let report = miette::miette!(
            severity = miette::Severity::Advice,
            labels = vec![miette::LabeledSpan::at(
                span,
                format!("At address {:02}", address),
            )],
            "",
        )
        .with_source_code(src.clone());
        eprintln!("{:?}", report);
    }

    fn show_single_line(&self, address: u8) {
        let line = self
            .src
            .as_deref()
            .zip(self.program.span(address))
            .and_then(|(src, span)| src.get(span.as_range()));
        match line {
            Some(line) => dprint!(Always, "{}", line.trim()),
            None => dprint!(Always, "(no source)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::assemble;

    fn debugger(src: &str, commands: &str) -> (Debugger, RunState) {
        let program = assemble(src).unwrap();
        let state = RunState::from_program(&program);
        let opts = DebuggerOptions {
            command: Some(commands.to_string()),
        };
        (Debugger::new(opts, program, Some(src.to_string())), state)
    }

    #[test]
    fn steps_and_edits_memory() {
        let (mut debugger, mut state) = debugger(
            "LDA NUM\nOUT\nHLT\nNUM DAT 42",
            "step; set NUM 7; jump 0; step 2",
        );
        let mut inbox = Inbox::new();
        let mut outbox = Outbox::new();
        let action = debugger.run(&mut state, &mut inbox, &mut outbox);
        // End of commands acts as `quit`
        assert_eq!(action, Action::StopDebugger);
        assert_eq!(state.read(3), 7);
        assert_eq!(outbox.as_slice(), &[7]);
        assert_eq!(state.pc(), 2);
    }

    #[test]
    fn input_command_unblocks() {
        let (mut debugger, mut state) = debugger("IN\nOUT\nHLT", "continue; input 5; continue");
        let mut inbox = Inbox::new();
        let mut outbox = Outbox::new();
        debugger.run(&mut state, &mut inbox, &mut outbox);
        assert_eq!(outbox.as_slice(), &[5]);
        assert!(state.snapshot().halted);
    }

    #[test]
    fn breakpoints_pause_continue() {
        let (mut debugger, mut state) = debugger(
            "LOOP OUT\nBRA LOOP",
            "break add LOOP; continue; continue; break remove 0; exit",
        );
        let mut inbox = Inbox::new();
        let mut outbox = Outbox::new();
        let action = debugger.run(&mut state, &mut inbox, &mut outbox);
        assert_eq!(action, Action::ExitProgram);
        assert_eq!(outbox.len(), 2);
        assert_eq!(state.pc(), 0);
        assert!(debugger.breakpoints.is_empty());
    }

    #[test]
    fn reset_restores_program_and_inputs() {
        let (mut debugger, mut state) = debugger("IN\nOUT\nHLT", "continue; set 0 0; reset");
        let mut inbox: Inbox = [3].into_iter().collect();
        let mut outbox = Outbox::new();
        debugger.run(&mut state, &mut inbox, &mut outbox);
        assert_eq!(state.read(0), 901);
        assert_eq!(state.pc(), 0);
        assert_eq!(inbox.len(), 1);
        assert!(outbox.is_empty());
    }

    #[test]
    fn locations_accept_any_assembler_label() {
        let (mut debugger, mut state) = debugger(
            "loop-1 OUT\n1st BRA loop-1",
            "break add 1st; get loop-1; continue; jump loop-1; exit",
        );
        let mut inbox = Inbox::new();
        let mut outbox = Outbox::new();
        let action = debugger.run(&mut state, &mut inbox, &mut outbox);
        assert_eq!(action, Action::ExitProgram);
        assert!(debugger.breakpoints.contains(1));
        assert_eq!(outbox.as_slice(), &[0]);
        assert_eq!(state.pc(), 0);
    }

    #[test]
    fn bad_commands_are_skipped() {
        let (mut debugger, mut state) = debugger("OUT\nHLT", "fly; get NOWHERE; step 1 2; step");
        let mut inbox = Inbox::new();
        let mut outbox = Outbox::new();
        debugger.run(&mut state, &mut inbox, &mut outbox);
        assert_eq!(outbox.as_slice(), &[0]);
        assert_eq!(state.pc(), 1);
    }
}
