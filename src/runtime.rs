use std::{
    collections::VecDeque,
    io::{stdin, stdout, IsTerminal, Write},
    thread::sleep,
};

use colored::Colorize;
use console::Term;

use crate::{
    debugger::{Action, Breakpoints, Debugger, DebuggerOptions},
    env,
    ops::Op,
    output::Output,
    program::Program,
    word::{normalize, wrap_address, wrap_signed, MEMORY_SIZE},
};

/// Complete machine state: memory and registers.
///
/// The engine never blocks and never fails. Each call to [`RunState::step`] performs at most one
/// fetch-execute cycle and reports what happened.
#[derive(Clone, Debug)]
pub struct RunState {
    /// 100 cells, each always within `[0, 999]`
    mem: [u16; MEMORY_SIZE],
    /// Accumulator, always within `[-999, 999]`
    acc: i16,
    /// Program counter
    pc: u8,
    /// Instruction register
    ir: u16,
    flag: RunFlag,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum RunFlag {
    Running,
    /// Blocked on `IN`. The program counter points at the `IN` instruction; `resume` is where
    /// execution continues once a value arrives.
    WaitingForInput { resume: u8 },
    Halted,
}

/// Coarse machine status.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Running,
    WaitingForInput,
    Halted,
}

/// Immutable copy of the machine state.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    pub memory: [u16; MEMORY_SIZE],
    pub accumulator: i16,
    pub program_counter: u8,
    pub instruction_register: u16,
    pub halted: bool,
    pub waiting_for_input: bool,
}

impl Snapshot {
    /// Address field of the instruction register.
    pub fn address_register(&self) -> u8 {
        (self.instruction_register % 100) as u8
    }
}

/// Outcome of a single [`RunState::step`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum StepResult {
    /// A cycle completed.
    Ok(Snapshot),
    /// A cycle completed by executing `OUT`, emitting the accumulator.
    Output(i16, Snapshot),
    /// Blocked on `IN` with no input available. Nothing else changed.
    Waiting,
    /// The machine is halted, either by this cycle or already before it.
    Halted(Snapshot),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepStatus {
    Ok,
    Waiting,
    Halted,
}

impl StepResult {
    pub fn status(&self) -> StepStatus {
        match self {
            StepResult::Ok(_) | StepResult::Output(..) => StepStatus::Ok,
            StepResult::Waiting => StepStatus::Waiting,
            StepResult::Halted(_) => StepStatus::Halted,
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            StepResult::Ok(snapshot)
            | StepResult::Output(_, snapshot)
            | StepResult::Halted(snapshot) => Some(snapshot),
            StepResult::Waiting => None,
        }
    }

    pub fn output(&self) -> Option<i16> {
        match self {
            StepResult::Output(value, _) => Some(*value),
            _ => None,
        }
    }
}

/// Pending input values. The caller adds to the back; only the engine takes from the front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inbox(VecDeque<i32>);

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: i32) {
        self.0.push_back(value);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &i32> {
        self.0.iter()
    }

    fn take(&mut self) -> Option<i32> {
        self.0.pop_front()
    }
}

impl Extend<i32> for Inbox {
    fn extend<T: IntoIterator<Item = i32>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl FromIterator<i32> for Inbox {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        Inbox(iter.into_iter().collect())
    }
}

/// Emitted output values, in order. Only ever appended to while running.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outbox(Vec<i16>);

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: i16) {
        self.0.push(value);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &i16> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Why [`RunState::run_until`] stopped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunStop {
    Halted,
    Waiting,
    /// Program counter reached a breakpoint, which has not been executed yet.
    Breakpoint(u8),
    StepLimit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RunSummary {
    pub stop: RunStop,
    /// Completed cycles, not counting a blocked `IN`
    pub steps: usize,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    pub fn new() -> Self {
        RunState {
            mem: [0; MEMORY_SIZE],
            acc: 0,
            pc: 0,
            ir: 0,
            flag: RunFlag::Running,
        }
    }

    /// Fresh machine with `program` loaded.
    pub fn from_program(program: &Program) -> Self {
        let mut state = RunState::new();
        state.load(program.words());
        state
    }

    /// Zero memory and every register, and clear both flags.
    pub fn reset(&mut self) -> Snapshot {
        *self = RunState::new();
        self.snapshot()
    }

    /// Reset, then copy up to 100 words into memory from address 0.
    pub fn load(&mut self, words: &[u16]) -> Snapshot {
        *self = RunState::new();
        for (cell, word) in self.mem.iter_mut().zip(words) {
            *cell = normalize(*word as i64);
        }
        self.snapshot()
    }

    /// Read memory. Address wraps around.
    pub fn read(&self, address: usize) -> u16 {
        self.mem[wrap_address(address) as usize]
    }

    /// Write memory, normalizing the value. Address wraps around.
    pub fn write(&mut self, address: usize, value: i64) {
        self.mem[wrap_address(address) as usize] = normalize(value);
    }

    pub fn accumulator(&self) -> i16 {
        self.acc
    }

    pub fn pc(&self) -> u8 {
        self.pc
    }

    pub fn ir(&self) -> u16 {
        self.ir
    }

    /// Move the program counter, abandoning any pending `IN`. Address wraps around.
    pub fn set_program_counter(&mut self, address: usize) {
        self.pc = wrap_address(address);
        if let RunFlag::WaitingForInput { .. } = self.flag {
            self.flag = RunFlag::Running;
        }
    }

    pub fn status(&self) -> Status {
        match self.flag {
            RunFlag::Running => Status::Running,
            RunFlag::WaitingForInput { .. } => Status::WaitingForInput,
            RunFlag::Halted => Status::Halted,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            memory: self.mem,
            accumulator: self.acc,
            program_counter: self.pc,
            instruction_register: self.ir,
            halted: self.flag == RunFlag::Halted,
            waiting_for_input: matches!(self.flag, RunFlag::WaitingForInput { .. }),
        }
    }

    /// Perform one fetch-execute cycle, taking input from `inbox` if needed.
    pub fn step(&mut self, inbox: &mut Inbox) -> StepResult {
        match self.flag {
            RunFlag::Halted => return StepResult::Halted(self.snapshot()),
            // Finish the blocked `IN`
            RunFlag::WaitingForInput { resume } => {
                let Some(value) = inbox.take() else {
                    return StepResult::Waiting;
                };
                self.acc = wrap_signed(value as i64);
                self.pc = resume;
                self.flag = RunFlag::Running;
                return StepResult::Ok(self.snapshot());
            }
            RunFlag::Running => (),
        }

        let instr_addr = self.pc;
        self.ir = self.mem[instr_addr as usize];
        // PC incremented before instruction is performed
        self.pc = wrap_address(instr_addr as usize + 1);

        let mut output = None;
        match Op::decode(self.ir) {
            // Covers data words executed as code
            Op::Hlt | Op::Invalid(_) => self.flag = RunFlag::Halted,
            Op::Add(addr) => self.add(addr),
            Op::Sub(addr) => self.sub(addr),
            Op::Sta(addr) => self.sta(addr),
            Op::Lda(addr) => self.lda(addr),
            Op::Bra(addr) => self.pc = addr,
            Op::Brz(addr) => {
                if self.acc == 0 {
                    self.pc = addr
                }
            }
            Op::Brp(addr) => {
                if self.acc >= 0 {
                    self.pc = addr
                }
            }
            Op::In => match inbox.take() {
                Some(value) => self.acc = wrap_signed(value as i64),
                None => {
                    self.flag = RunFlag::WaitingForInput { resume: self.pc };
                    self.pc = instr_addr;
                    return StepResult::Waiting;
                }
            },
            Op::Out => output = Some(self.acc),
            Op::ReservedIo(_) => (),
        }

        let snapshot = self.snapshot();
        if snapshot.halted {
            StepResult::Halted(snapshot)
        } else if let Some(value) = output {
            StepResult::Output(value, snapshot)
        } else {
            StepResult::Ok(snapshot)
        }
    }

    /// Step repeatedly until halted, blocked on input, at a breakpoint, or after `limit` cycles.
    ///
    /// A breakpoint at the starting address is passed over, so that execution can resume from
    /// one. Output values are appended to `outbox`.
    pub fn run_until(
        &mut self,
        inbox: &mut Inbox,
        outbox: &mut Outbox,
        breakpoints: &Breakpoints,
        limit: usize,
    ) -> RunSummary {
        let mut steps = 0;
        let stop = loop {
            if self.flag == RunFlag::Halted {
                break RunStop::Halted;
            }
            if steps >= limit {
                break RunStop::StepLimit;
            }
            if steps > 0 && breakpoints.contains(self.pc) {
                break RunStop::Breakpoint(self.pc);
            }
            match self.step(inbox) {
                StepResult::Ok(_) => (),
                StepResult::Output(value, _) => outbox.push(value),
                StepResult::Waiting => break RunStop::Waiting,
                StepResult::Halted(_) => {
                    steps += 1;
                    break RunStop::Halted;
                }
            }
            steps += 1;
        };
        RunSummary { stop, steps }
    }

    fn add(&mut self, addr: u8) {
        let val = self.mem[addr as usize] as i64;
        self.acc = wrap_signed(self.acc as i64 + val);
    }

    fn sub(&mut self, addr: u8) {
        let val = self.mem[addr as usize] as i64;
        self.acc = wrap_signed(self.acc as i64 - val);
    }

    fn sta(&mut self, addr: u8) {
        self.mem[addr as usize] = normalize(self.acc as i64);
    }

    fn lda(&mut self, addr: u8) {
        self.acc = self.mem[addr as usize] as i16;
    }
}

/// A loaded program, its input and output queues, and optionally a debugger driving it.
///
/// This is the caller side of the engine: it feeds input, collects output, and decides when to
/// keep stepping.
pub struct RunEnvironment {
    state: RunState,
    inbox: Inbox,
    outbox: Outbox,
    debugger: Option<Debugger>,
}

impl RunEnvironment {
    /// `src` is the assembly source, if the program was assembled, and is used by the debugger to
    /// show source lines.
    pub fn new(program: Program, src: Option<String>, debugger_opts: Option<DebuggerOptions>) -> Self {
        let state = RunState::from_program(&program);
        RunEnvironment {
            state,
            inbox: Inbox::new(),
            outbox: Outbox::new(),
            debugger: debugger_opts.map(|opts| Debugger::new(opts, program, src)),
        }
    }

    /// Queue input values ahead of any read from stdin.
    pub fn push_inputs(&mut self, inputs: &[i32]) {
        self.inbox.extend(inputs.iter().copied());
    }

    pub fn set_minimal(&mut self, minimal: bool) {
        Output::set_minimal(minimal);
    }

    /// Run until halted, out of input, or past the configured step limit.
    pub fn run(&mut self) {
        if let Some(mut debugger) = self.debugger.take() {
            match debugger.run(&mut self.state, &mut self.inbox, &mut self.outbox) {
                Action::ExitProgram => return,
                Action::StopDebugger => (),
            }
        }

        let limit = env::step_limit();
        let delay = env::step_delay();
        let no_breakpoints = Breakpoints::default();
        let mut executed = 0;
        loop {
            // Step one at a time when slowed down, so output appears as it happens
            let chunk = if delay.is_zero() { limit - executed } else { 1 };
            let printed = self.outbox.len();
            let summary =
                self.state
                    .run_until(&mut self.inbox, &mut self.outbox, &no_breakpoints, chunk);
            executed += summary.steps;
            print_outputs(&self.outbox.as_slice()[printed..]);

            match summary.stop {
                RunStop::Halted => {
                    halt_message("Halted".cyan(), "");
                    return;
                }
                RunStop::Waiting => match read_input() {
                    Some(value) => self.inbox.push(value),
                    None => {
                        halt_message("Stopped".yellow(), "waiting for input, none left");
                        return;
                    }
                },
                RunStop::Breakpoint(_) | RunStop::StepLimit => {
                    if executed >= limit {
                        halt_message(
                            "Stopped".yellow(),
                            &format!("step limit of {} reached", limit),
                        );
                        return;
                    }
                    sleep(delay);
                }
            }
        }
    }
}

pub(crate) fn print_outputs(values: &[i16]) {
    for value in values {
        Output::Normal.print_str(&format!("{}\n", value));
    }
    let _ = stdout().flush();
}

fn halt_message(left: colored::ColoredString, right: &str) {
    Output::Normal.start_new_line();
    Output::Normal.print_str(&format!("{:>12} {}\n", left, right));
}

/// Read one input value from the terminal or piped stdin. `None` on EOF.
fn read_input() -> Option<i32> {
    loop {
        let line = if stdin().is_terminal() {
            Output::Normal.start_new_line();
            print!("{} ", "Input:".cyan().bold());
            stdout().flush().ok()?;
            Term::stdout().read_line().ok()?
        } else {
            let mut buf = String::new();
            match stdin().read_line(&mut buf) {
                Ok(0) | Err(_) => return None,
                Ok(_) => buf,
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_input(&line) {
            Some(value) => return Some(value),
            None => eprintln!(
                "{} `{}`: inputs must be integers from -999 to 999",
                "Invalid input".red(),
                line.trim()
            ),
        }
    }
}

/// Input values are validated here, before they reach the engine.
pub(crate) fn parse_input(text: &str) -> Option<i32> {
    text.trim()
        .parse::<i32>()
        .ok()
        .filter(|value| (-999..=999).contains(value))
}
