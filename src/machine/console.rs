//! The console seam between the machine and its host.
//!
//! The machine never renders anything itself. A host hands the run loop a
//! `&mut dyn Console`, receives the events below, and is responsible for
//! collecting user-supplied words and forwarding them back through
//! [`Machine::supply_input`](crate::machine::Machine::supply_input).

use crate::word::Word;

/// Events the control unit raises toward its host.
pub trait Console {
    /// A READ instruction suspended the run; the host should collect a word
    /// destined for register `addr` and pass it to `supply_input`.
    fn on_prompt_for_input(&mut self, addr: u16);

    /// A WRITE instruction emitted the word held in register `addr`.
    fn on_output(&mut self, addr: u16, word: Word);

    /// The run finished: `success` is true for an explicit HALT, false when
    /// execution stopped on an error.
    fn on_halt(&mut self, success: bool, message: &str);

    /// The run transitioned to the error state.
    fn on_error(&mut self, message: &str);
}

/// A console that buffers every event it receives.
///
/// Useful for embedders that poll rather than react, and for tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingConsole {
    pub prompts: Vec<u16>,
    pub outputs: Vec<(u16, Word)>,
    pub halts: Vec<(bool, String)>,
    pub errors: Vec<String>,
}

impl Console for RecordingConsole {
    fn on_prompt_for_input(&mut self, addr: u16) {
        self.prompts.push(addr);
    }

    fn on_output(&mut self, addr: u16, word: Word) {
        self.outputs.push((addr, word));
    }

    fn on_halt(&mut self, success: bool, message: &str) {
        self.halts.push((success, message.to_string()));
    }

    fn on_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
