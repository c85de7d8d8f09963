//! Linear step layout.
//!
//! Routines are placed back to back in table order. A label resolves to
//! its routine's base step plus the position it was bound to.

use tarn_bytecode::{Instruction, RoutineKind, StepId};

use super::builder::Routine;

/// Resolved instruction stream plus routine entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing {
    pub steps: Vec<Instruction>,
    pub entries: Vec<(RoutineKind, StepId)>,
}

impl Listing {
    pub fn entry(&self, kind: RoutineKind) -> Option<StepId> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|&(_, step)| step)
    }
}

pub fn layout(routines: &[Routine]) -> Listing {
    let total: usize = routines.iter().map(|r| r.code.len()).sum();
    debug_assert!(total <= u16::MAX as usize);

    let mut steps = Vec::with_capacity(total);
    let mut entries = Vec::with_capacity(routines.len());
    for routine in routines {
        let base = steps.len();
        entries.push((routine.kind, StepId::new(base as u16)));
        let step_of = |label| StepId::new((base + routine.position(label)) as u16);
        steps.extend(routine.code.iter().map(|instr| instr.resolve(step_of)));
    }

    Listing { steps, entries }
}
