//! The interpreter backend.
//!
//! Emission validates everything the dispatch loop relies on (jump targets,
//! DFA and string references, table cells) so matching itself never checks
//! the artifact again and never fails.

use memchr::memmem::Finder;
use tarn_bytecode::{DfaId, Instruction, Module, RoutineKind, StepId};
use tarn_core::StateId;

use crate::backend::{Backend, EmitError};
use crate::matcher::Matcher;

/// Backend that runs the routines in a fixed dispatch loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    /// Load artifact bytes and emit a program from them.
    pub fn load(&self, bytes: &[u8]) -> Result<Program, EmitError> {
        let module = Module::load(bytes)?;
        self.emit(&module)
    }
}

impl Backend for Interpreter {
    type Unit = Program;

    fn emit(&self, module: &Module) -> Result<Program, EmitError> {
        Program::new(module.clone())
    }
}

/// A validated, immutable matcher program.
///
/// Shared freely between threads; every scan state lives in a [`Matcher`].
#[derive(Debug)]
pub struct Program {
    module: Module,
    steps: Vec<Instruction>,
    entries: [StepId; 3],
    /// Substring searchers for `Literal` prefilters, indexed by string id.
    finders: Vec<Option<Finder<'static>>>,
}

impl Program {
    fn new(module: Module) -> Result<Self, EmitError> {
        let steps = decode_steps(&module)?;
        validate_tables(&module)?;

        let mut entries = [StepId(0); 3];
        for kind in RoutineKind::ALL {
            entries[kind as usize] = module
                .routines()
                .entry(kind)
                .ok_or(EmitError::MissingRoutine(kind))?;
        }

        let strings = module.strings();
        let mut finders: Vec<Option<Finder<'static>>> = vec![None; strings.len()];
        for instr in &steps {
            if let Instruction::Literal { lit, .. } = *instr {
                let idx = lit.get() as usize;
                if finders[idx].is_none() {
                    finders[idx] = Some(Finder::new(strings.get(lit)).into_owned());
                }
            }
        }

        Ok(Self {
            module,
            steps,
            entries,
            finders,
        })
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn steps(&self) -> &[Instruction] {
        &self.steps
    }

    pub fn entry(&self, kind: RoutineKind) -> StepId {
        self.entries[kind as usize]
    }

    pub(crate) fn finder(&self, idx: usize) -> Option<&Finder<'static>> {
        self.finders.get(idx).and_then(Option::as_ref)
    }

    /// A matcher over `input` with its cursor at the beginning.
    pub fn matcher<'i>(&self, input: &'i str) -> Matcher<'_, 'i> {
        Matcher::new(self, input)
    }
}

fn decode_steps(module: &Module) -> Result<Vec<Instruction>, EmitError> {
    let count = module.steps_count();
    let steps = (0..count)
        .map(|i| {
            let step = StepId(i as u16);
            module.decode_step(step).ok_or(EmitError::MalformedStep(step))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let dfa_count = module.dfas().len();
    let string_count = module.strings().len();
    for (i, instr) in steps.iter().enumerate() {
        let step = StepId(i as u16);
        if let Some(target) = instr.target()
            && target.get() as usize >= count
        {
            return Err(EmitError::TargetOutOfRange { step, target });
        }
        if let Some(dfa) = instr.dfa()
            && dfa.index() >= dfa_count
        {
            return Err(EmitError::UnknownDfa { step, dfa });
        }
        if let Instruction::Literal { lit, .. } = *instr
            && lit.get() as usize >= string_count
        {
            return Err(EmitError::UnknownString { step, lit });
        }
        if i + 1 == count && !instr.is_terminal() {
            return Err(EmitError::FallsThrough(step));
        }
    }
    Ok(steps)
}

/// Every cell must name a live state of its own DFA or `DEAD`.
fn validate_tables(module: &Module) -> Result<(), EmitError> {
    let dfas = module.dfas();
    for i in 0..dfas.len() {
        let id = DfaId(i as u8);
        let Some(dfa) = dfas.get(id) else {
            continue;
        };
        let states = dfa.state_count();
        for state in 0..states {
            for class in 0..dfa.stride() {
                let target = dfa.next(StateId(state as u16), class as u8);
                if !target.is_dead() && target.index() >= states {
                    return Err(EmitError::StateOutOfRange {
                        dfa: id,
                        state,
                        target: target.get(),
                        states,
                    });
                }
            }
        }
    }
    Ok(())
}
