//! The UVSim control unit.
//!
//! Implements the fetch-decode-execute cycle over the register file and
//! accumulator, the run-state machine (idle, running, awaiting input,
//! halted, error), and the suspend/resume protocol for console READs.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::machine::console::Console;
use crate::machine::decode::{self, Instruction, Opcode};
use crate::machine::memory::{Memory, MemoryError, LAST_ADDRESS, MEMORY_SIZE};
use crate::word::{ArithOp, Word, WordError};

/// Machine execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// No program is running; registers may be loaded or edited.
    Idle,
    /// Actively fetching and executing.
    Running,
    /// Suspended by a READ, waiting for a word from the host.
    AwaitingInput,
    /// A HALT instruction finished the run. Rerunning is permitted.
    Halted,
    /// The run stopped on an invalid instruction, invalid address, or
    /// arithmetic failure.
    Error,
}

/// What a single cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The instruction ran to completion; the run continues.
    Executed(Instruction),
    /// A READ suspended the run until input arrives for this register.
    AwaitingInput(u16),
    /// A HALT ended the run.
    Halted,
}

/// The UVSim machine: register file, accumulator, and control unit.
#[derive(Clone, Serialize, Deserialize)]
pub struct Machine {
    /// The 250-register file.
    pub mem: Memory,
    /// The accumulator.
    pub acc: Word,
    /// Address of the next instruction to fetch.
    pub pc: u16,
    /// Current run state.
    pub state: RunState,
    /// Instruction count for the current program (for tracing).
    pub cycles: u64,
    /// Target register remembered while suspended on a READ.
    pending_read: Option<u16>,
    /// The error that ended the last run, if any.
    #[serde(skip)]
    last_error: Option<MachineError>,
}

impl Machine {
    /// Create a machine in the power-on state.
    pub fn new() -> Self {
        Self {
            mem: Memory::new(),
            acc: Word::ZERO,
            pc: 0,
            state: RunState::Idle,
            cycles: 0,
            pending_read: None,
            last_error: None,
        }
    }

    /// Clear registers, accumulator, and counters back to the power-on
    /// state. Not permitted while a program is running.
    pub fn reset(&mut self) -> Result<(), MachineError> {
        if self.is_busy() {
            return Err(MachineError::Busy);
        }
        self.mem.clear();
        self.acc = Word::ZERO;
        self.pc = 0;
        self.state = RunState::Idle;
        self.cycles = 0;
        self.pending_read = None;
        self.last_error = None;
        Ok(())
    }

    /// Install a program into registers `0..program.len()`, clearing
    /// everything else. Only permitted while idle.
    pub fn load_program(&mut self, program: &[Word]) -> Result<(), MachineError> {
        if self.state != RunState::Idle {
            return Err(MachineError::NotIdle);
        }
        self.mem.clear();
        self.acc = Word::ZERO;
        self.pc = 0;
        self.cycles = 0;
        self.last_error = None;
        self.mem.install(program)?;
        Ok(())
    }

    /// Set a single register from console-style text. Not permitted while a
    /// program is running.
    pub fn set_register(&mut self, addr: u16, text: &str) -> Result<(), MachineError> {
        if self.is_busy() {
            return Err(MachineError::Busy);
        }
        let word = Word::parse(text)?;
        self.mem.write(addr, word)?;
        Ok(())
    }

    /// Transition into `Running` without executing anything.
    ///
    /// From `Idle` the run continues at the current address (0 after a fresh
    /// load); from `Halted` or `Error` the program reruns from address 0.
    pub fn begin(&mut self) -> Result<(), MachineError> {
        match self.state {
            RunState::Idle => {}
            RunState::Halted | RunState::Error => {
                self.pc = 0;
                self.cycles = 0;
                self.last_error = None;
            }
            RunState::Running | RunState::AwaitingInput => {
                return Err(MachineError::NotRunnable(self.state));
            }
        }
        self.pending_read = None;
        self.state = RunState::Running;
        Ok(())
    }

    /// Begin a run and execute until it halts, suspends, or errors.
    pub fn start(&mut self, console: &mut dyn Console) -> Result<RunState, MachineError> {
        self.begin()?;
        Ok(self.run(console))
    }

    /// Execute cycles while running. Returns the state the loop stopped in:
    /// `AwaitingInput` (resume via [`supply_input`](Self::supply_input) and
    /// `run` again), `Halted`, or `Error`.
    pub fn run(&mut self, console: &mut dyn Console) -> RunState {
        while self.state == RunState::Running {
            if self.step(console).is_err() {
                break; // step already transitioned to Error
            }
        }
        self.state
    }

    /// Execute a single cycle.
    ///
    /// On failure the machine transitions to `Error`, raises `on_error` and
    /// `on_halt(false, ..)` toward the host, and returns the error.
    pub fn step(&mut self, console: &mut dyn Console) -> Result<Step, MachineError> {
        if self.state != RunState::Running {
            return Err(MachineError::NotRunning(self.state));
        }

        match self.cycle(console) {
            Ok(step) => Ok(step),
            Err(err) => {
                self.state = RunState::Error;
                let message = err.to_string();
                console.on_error(&message);
                console.on_halt(false, &message);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// One fetch-decode-execute cycle. Commits atomically: a failure leaves
    /// accumulator and registers untouched.
    fn cycle(&mut self, console: &mut dyn Console) -> Result<Step, MachineError> {
        let pc = self.pc;

        // Runaway guards: walking past the last register, or reaching it
        // while it still holds the blank word, means the program never
        // halted explicitly.
        if pc > LAST_ADDRESS {
            return Err(MachineError::Runaway { addr: pc });
        }
        let raw = self.mem.read(pc)?;
        if pc == LAST_ADDRESS && raw.is_zero() {
            return Err(MachineError::Runaway { addr: pc });
        }

        let instr = decode::decode(raw)
            .map_err(|_| MachineError::InvalidInstruction { addr: pc, word: raw })?;

        // Advance before executing; branches overwrite the advanced counter
        // so the target runs on the next cycle.
        self.pc = pc + 1;
        self.cycles += 1;

        self.execute(instr, console)
    }

    fn execute(&mut self, instr: Instruction, console: &mut dyn Console) -> Result<Step, MachineError> {
        let Instruction { opcode, operand } = instr;

        match opcode {
            Opcode::Nop => {}

            Opcode::Read => {
                Self::check_addr(operand)?;
                self.pending_read = Some(operand);
                self.state = RunState::AwaitingInput;
                console.on_prompt_for_input(operand);
                return Ok(Step::AwaitingInput(operand));
            }

            Opcode::Write => {
                let word = self.mem.read(operand)?;
                console.on_output(operand, word);
            }

            Opcode::Load => {
                self.acc = self.mem.read(operand)?;
            }

            Opcode::Store => {
                self.mem.write(operand, self.acc)?;
            }

            Opcode::Add => self.arith(operand, ArithOp::Add)?,
            Opcode::Subtract => self.arith(operand, ArithOp::Sub)?,
            Opcode::Divide => self.arith(operand, ArithOp::Div)?,
            Opcode::Multiply => self.arith(operand, ArithOp::Mul)?,

            Opcode::Branch => {
                Self::check_addr(operand)?;
                self.pc = operand;
            }

            Opcode::BranchNeg => {
                Self::check_addr(operand)?;
                if self.acc.is_negative() {
                    self.pc = operand;
                }
            }

            Opcode::BranchZero => {
                Self::check_addr(operand)?;
                if self.acc.is_zero() {
                    self.pc = operand;
                }
            }

            Opcode::Halt => {
                self.state = RunState::Halted;
                console.on_halt(true, "Program executed successfully.");
                return Ok(Step::Halted);
            }
        }

        Ok(Step::Executed(instr))
    }

    fn arith(&mut self, operand: u16, op: ArithOp) -> Result<(), MachineError> {
        let word = self.mem.read(operand)?;
        self.acc = self.acc.checked_op(word, op)?;
        Ok(())
    }

    fn check_addr(operand: u16) -> Result<(), MachineError> {
        if operand as usize >= MEMORY_SIZE {
            return Err(MemoryError::AddressOutOfRange(operand).into());
        }
        Ok(())
    }

    /// Supply the word a suspended READ is waiting for.
    ///
    /// On success the word is written into the remembered register and the
    /// machine returns to `Running` (resume with [`run`](Self::run)). An
    /// invalid word leaves the machine suspended so the host can re-prompt.
    pub fn supply_input(&mut self, text: &str) -> Result<(), MachineError> {
        if self.state != RunState::AwaitingInput {
            return Err(MachineError::NotAwaitingInput(self.state));
        }

        let word = Word::parse(text)?;

        let addr = match self.pending_read.take() {
            Some(addr) => addr,
            None => return Err(MachineError::NotAwaitingInput(self.state)),
        };

        // The target address was validated when the READ suspended.
        self.mem.write(addr, word)?;
        self.state = RunState::Running;
        Ok(())
    }

    /// Cooperatively cancel the current run, returning to `Idle`. Registers
    /// and accumulator keep whatever the program left in them.
    pub fn cancel(&mut self) {
        self.state = RunState::Idle;
        self.pending_read = None;
    }

    /// The error that ended the last run, if it ended in `Error`.
    pub fn last_error(&self) -> Option<&MachineError> {
        self.last_error.as_ref()
    }

    /// Check if a run is in flight (running or suspended on input).
    pub fn is_busy(&self) -> bool {
        matches!(self.state, RunState::Running | RunState::AwaitingInput)
    }

    /// Check if the machine halted normally.
    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    /// Check if the machine is suspended waiting for console input.
    pub fn is_awaiting_input(&self) -> bool {
        self.state == RunState::AwaitingInput
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("state", &self.state)
            .field("pc", &self.pc)
            .field("acc", &self.acc)
            .field("cycles", &self.cycles)
            .field("mem", &self.mem)
            .finish()
    }
}

/// Errors that can occur while driving the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("machine is not running (state: {0:?})")]
    NotRunning(RunState),

    #[error("cannot start a run from state {0:?}")]
    NotRunnable(RunState),

    #[error("machine is not awaiting console input (state: {0:?})")]
    NotAwaitingInput(RunState),

    #[error("a program can only be loaded while the machine is idle")]
    NotIdle,

    #[error("operation not permitted while a program is running")]
    Busy,

    #[error("instruction {word} at address {addr} is invalid")]
    InvalidInstruction { addr: u16, word: Word },

    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("arithmetic error: {0}")]
    Word(#[from] WordError),

    #[error("the entire register file was executed without a halt (stopped at register {addr})")]
    Runaway { addr: u16 },
}
