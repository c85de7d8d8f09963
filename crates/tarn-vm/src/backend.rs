//! The code-emission backend interface.

use tarn_bytecode::{DfaId, Module, ModuleError, RoutineKind, StepId, StringId};

/// Turns a loaded artifact into something that can match input.
pub trait Backend {
    /// The invocable unit produced for one artifact.
    type Unit;

    fn emit(&self, module: &Module) -> Result<Self::Unit, EmitError>;
}

/// Errors raised while emitting a unit from an artifact.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    /// The artifact bytes did not load.
    #[error(transparent)]
    Module(#[from] ModuleError),

    #[error("step {0:?} does not decode to an instruction")]
    MalformedStep(StepId),

    #[error("step {step:?} jumps to {target:?}, past the last step")]
    TargetOutOfRange { step: StepId, target: StepId },

    #[error("step {0:?} is the last step and does not halt or jump")]
    FallsThrough(StepId),

    #[error("step {step:?} references missing DFA D{}", dfa.get())]
    UnknownDfa { step: StepId, dfa: DfaId },

    #[error("step {step:?} references missing string S{}", lit.get())]
    UnknownString { step: StepId, lit: StringId },

    #[error("DFA D{} maps state {state} to {target}, beyond its {states} states", dfa.get())]
    StateOutOfRange {
        dfa: DfaId,
        state: usize,
        target: u16,
        states: usize,
    },

    #[error("no {} routine", .0.name())]
    MissingRoutine(RoutineKind),
}
