//! Instruction IR with symbolic labels.
//!
//! Routines are written against [`Label`]s; layout assigns step ids and
//! resolves every label to the step of the instruction it was bound to.

use tarn_bytecode::{DfaId, Instruction, Outcome, Reg, RoutineKind, StepId, StringId};

/// Symbolic jump target, local to one routine.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Label(pub u32);

/// Pre-layout instruction. Mirrors [`Instruction`] with labels in place of
/// step ids.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InstructionIR {
    MinLength { min: u32, fail: Label },
    MaxLength { max: u32, fail: Label },
    Literal { lit: StringId, fail: Label },
    Seek { reg: Reg },
    Begin { dfa: DfaId },
    Mark { dfa: DfaId },
    Step { dfa: DfaId },
    StepBack { dfa: DfaId },
    JumpIfEnd { target: Label },
    JumpIfOrigin { target: Label },
    JumpIfDead { target: Label },
    JumpIfAccept { dfa: DfaId, target: Label },
    JumpIfMarked { target: Label },
    Capture { reg: Reg, fail: Label },
    Jump { target: Label },
    Halt { outcome: Outcome },
}

impl InstructionIR {
    /// Resolve labels through `step_of`.
    pub fn resolve(self, step_of: impl Fn(Label) -> StepId) -> Instruction {
        match self {
            Self::MinLength { min, fail } => Instruction::MinLength {
                min,
                fail: step_of(fail),
            },
            Self::MaxLength { max, fail } => Instruction::MaxLength {
                max,
                fail: step_of(fail),
            },
            Self::Literal { lit, fail } => Instruction::Literal {
                lit,
                fail: step_of(fail),
            },
            Self::Seek { reg } => Instruction::Seek { reg },
            Self::Begin { dfa } => Instruction::Begin { dfa },
            Self::Mark { dfa } => Instruction::Mark { dfa },
            Self::Step { dfa } => Instruction::Step { dfa },
            Self::StepBack { dfa } => Instruction::StepBack { dfa },
            Self::JumpIfEnd { target } => Instruction::JumpIfEnd {
                target: step_of(target),
            },
            Self::JumpIfOrigin { target } => Instruction::JumpIfOrigin {
                target: step_of(target),
            },
            Self::JumpIfDead { target } => Instruction::JumpIfDead {
                target: step_of(target),
            },
            Self::JumpIfAccept { dfa, target } => Instruction::JumpIfAccept {
                dfa,
                target: step_of(target),
            },
            Self::JumpIfMarked { target } => Instruction::JumpIfMarked {
                target: step_of(target),
            },
            Self::Capture { reg, fail } => Instruction::Capture {
                reg,
                fail: step_of(fail),
            },
            Self::Jump { target } => Instruction::Jump {
                target: step_of(target),
            },
            Self::Halt { outcome } => Instruction::Halt { outcome },
        }
    }
}

/// A finished routine: instructions plus the position each label names.
#[derive(Clone, Debug)]
pub struct Routine {
    pub kind: RoutineKind,
    pub code: Vec<InstructionIR>,
    /// `bound[label]` is the index of the instruction the label names.
    pub bound: Vec<Option<usize>>,
}

impl Routine {
    /// Position of `label` within this routine.
    pub fn position(&self, label: Label) -> usize {
        self.bound
            .get(label.0 as usize)
            .copied()
            .flatten()
            .expect("label bound before layout")
    }
}

/// Writes one routine. Every emitter returns `&mut Self` so listings read
/// top to bottom.
pub struct RoutineBuilder {
    kind: RoutineKind,
    code: Vec<InstructionIR>,
    bound: Vec<Option<usize>>,
}

impl RoutineBuilder {
    pub fn new(kind: RoutineKind) -> Self {
        Self {
            kind,
            code: Vec::new(),
            bound: Vec::new(),
        }
    }

    pub fn fresh_label(&mut self) -> Label {
        let l = Label(self.bound.len() as u32);
        self.bound.push(None);
        l
    }

    /// Attach `label` to the next emitted instruction.
    pub fn bind(&mut self, label: Label) -> &mut Self {
        debug_assert!(self.bound[label.0 as usize].is_none(), "label bound twice");
        self.bound[label.0 as usize] = Some(self.code.len());
        self
    }

    fn push(&mut self, instr: InstructionIR) -> &mut Self {
        self.code.push(instr);
        self
    }

    pub fn min_length(&mut self, min: u32, fail: Label) -> &mut Self {
        self.push(InstructionIR::MinLength { min, fail })
    }

    pub fn max_length(&mut self, max: u32, fail: Label) -> &mut Self {
        self.push(InstructionIR::MaxLength { max, fail })
    }

    pub fn literal(&mut self, lit: StringId, fail: Label) -> &mut Self {
        self.push(InstructionIR::Literal { lit, fail })
    }

    pub fn seek(&mut self, reg: Reg) -> &mut Self {
        self.push(InstructionIR::Seek { reg })
    }

    pub fn begin(&mut self, dfa: DfaId) -> &mut Self {
        self.push(InstructionIR::Begin { dfa })
    }

    pub fn mark(&mut self, dfa: DfaId) -> &mut Self {
        self.push(InstructionIR::Mark { dfa })
    }

    pub fn step(&mut self, dfa: DfaId) -> &mut Self {
        self.push(InstructionIR::Step { dfa })
    }

    pub fn step_back(&mut self, dfa: DfaId) -> &mut Self {
        self.push(InstructionIR::StepBack { dfa })
    }

    pub fn jump_if_end(&mut self, target: Label) -> &mut Self {
        self.push(InstructionIR::JumpIfEnd { target })
    }

    pub fn jump_if_origin(&mut self, target: Label) -> &mut Self {
        self.push(InstructionIR::JumpIfOrigin { target })
    }

    pub fn jump_if_dead(&mut self, target: Label) -> &mut Self {
        self.push(InstructionIR::JumpIfDead { target })
    }

    pub fn jump_if_accept(&mut self, dfa: DfaId, target: Label) -> &mut Self {
        self.push(InstructionIR::JumpIfAccept { dfa, target })
    }

    pub fn jump_if_marked(&mut self, target: Label) -> &mut Self {
        self.push(InstructionIR::JumpIfMarked { target })
    }

    pub fn capture(&mut self, reg: Reg, fail: Label) -> &mut Self {
        self.push(InstructionIR::Capture { reg, fail })
    }

    pub fn jump(&mut self, target: Label) -> &mut Self {
        self.push(InstructionIR::Jump { target })
    }

    pub fn halt(&mut self, outcome: Outcome) -> &mut Self {
        self.push(InstructionIR::Halt { outcome })
    }

    pub fn finish(self) -> Routine {
        Routine {
            kind: self.kind,
            code: self.code,
            bound: self.bound,
        }
    }
}
