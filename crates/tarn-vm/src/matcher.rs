//! Scan state and the dispatch loop.

use tarn_bytecode::{DfaId, DfaView, Instruction, Outcome, Reg, RoutineKind, StepId};
use tarn_core::{ByteClasses, MatchSpan, StateId};

use crate::interpreter::Program;
use crate::trace::{NoopTracer, Tracer};

/// Matching state for one input.
///
/// `matches` and `contained_in` look at the whole input. `find` starts at the
/// cursor and moves it past each match it reports.
pub struct Matcher<'p, 'i> {
    program: &'p Program,
    classes: &'p ByteClasses,
    dfas: Vec<DfaView<'p>>,
    input: &'i str,
    cursor: usize,
    done: bool,
}

/// How a routine halted.
enum Halted {
    Reject,
    Accept,
    Span(MatchSpan),
}

/// Registers of one routine run.
struct Frame {
    ip: StepId,
    pos: usize,
    regs: [usize; 3],
    state: StateId,
    mark: Option<usize>,
}

impl<'p, 'i> Matcher<'p, 'i> {
    pub(crate) fn new(program: &'p Program, input: &'i str) -> Self {
        let module = program.module();
        let dfas = module.dfas();
        // ids were checked when the program was emitted
        let dfas = (0..dfas.len())
            .filter_map(|i| dfas.get(DfaId(i as u8)))
            .collect();
        Self {
            program,
            classes: module.classes(),
            dfas,
            input,
            cursor: 0,
            done: false,
        }
    }

    pub fn input(&self) -> &'i str {
        self.input
    }

    /// Where the next `find` starts.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Rewind `find` to the beginning of the input.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.done = false;
    }

    /// True iff the whole input belongs to the pattern's language.
    pub fn matches(&self) -> bool {
        self.matches_with(&mut NoopTracer)
    }

    pub fn matches_with<T: Tracer>(&self, tracer: &mut T) -> bool {
        matches!(self.run(RoutineKind::Matches, 0, tracer), Halted::Accept)
    }

    /// True iff some substring of the input belongs to the language.
    pub fn contained_in(&self) -> bool {
        self.contained_in_with(&mut NoopTracer)
    }

    pub fn contained_in_with<T: Tracer>(&self, tracer: &mut T) -> bool {
        matches!(self.run(RoutineKind::ContainedIn, 0, tracer), Halted::Accept)
    }

    /// The leftmost-longest match at or after the cursor.
    ///
    /// The cursor moves to the end of the match. After an empty match it
    /// moves one character further so repeated calls always progress.
    pub fn find(&mut self) -> Option<MatchSpan> {
        self.find_with(&mut NoopTracer)
    }

    pub fn find_with<T: Tracer>(&mut self, tracer: &mut T) -> Option<MatchSpan> {
        if self.done {
            return None;
        }
        let Halted::Span(span) = self.run(RoutineKind::Find, self.cursor, tracer) else {
            self.done = true;
            return None;
        };

        if !span.is_empty() {
            self.cursor = span.end;
        } else {
            let rest = self.input.get(span.end..).unwrap_or_default();
            match rest.chars().next() {
                Some(c) => self.cursor = span.end + c.len_utf8(),
                None => self.done = true,
            }
        }
        Some(span)
    }

    fn run<T: Tracer>(&self, kind: RoutineKind, origin: usize, tracer: &mut T) -> Halted {
        let steps = self.program.steps();
        let input = self.input.as_bytes();
        let mut f = Frame {
            ip: self.program.entry(kind),
            pos: origin,
            regs: [origin; 3],
            state: StateId::DEAD,
            mark: None,
        };
        tracer.trace_enter(kind, origin);

        loop {
            let instr = steps[f.ip.get() as usize];
            tracer.trace_instruction(f.ip, &instr, f.pos, f.state);
            f.ip = StepId(f.ip.get() + 1);

            match instr {
                Instruction::MinLength { min, fail } => {
                    if input.len() - f.regs[Reg::Origin.index()] < min as usize {
                        f.ip = fail;
                    }
                }
                Instruction::MaxLength { max, fail } => {
                    if input.len() - f.regs[Reg::Origin.index()] > max as usize {
                        f.ip = fail;
                    }
                }
                Instruction::Literal { lit, fail } => {
                    let haystack = &input[f.regs[Reg::Origin.index()]..];
                    let found = self
                        .program
                        .finder(lit.get() as usize)
                        .is_some_and(|finder| finder.find(haystack).is_some());
                    if !found {
                        f.ip = fail;
                    }
                }
                Instruction::Seek { reg } => f.pos = f.regs[reg.index()],
                Instruction::Begin { dfa } => {
                    f.state = self.dfas[dfa.index()].start();
                    f.mark = None;
                }
                Instruction::Mark { dfa } => {
                    if self.dfas[dfa.index()].is_accepting(f.state) {
                        f.mark = Some(f.pos);
                    }
                }
                Instruction::Step { dfa } => match input.get(f.pos) {
                    Some(&byte) => {
                        f.state = self.transition(dfa.index(), f.state, byte);
                        f.pos += 1;
                    }
                    None => f.state = StateId::DEAD,
                },
                Instruction::StepBack { dfa } => {
                    if f.pos == 0 {
                        f.state = StateId::DEAD;
                    } else {
                        f.pos -= 1;
                        f.state = self.transition(dfa.index(), f.state, input[f.pos]);
                    }
                }
                Instruction::JumpIfEnd { target } => {
                    if f.pos == input.len() {
                        f.ip = target;
                    }
                }
                Instruction::JumpIfOrigin { target } => {
                    if f.pos == f.regs[Reg::Origin.index()] {
                        f.ip = target;
                    }
                }
                Instruction::JumpIfDead { target } => {
                    if f.state.is_dead() {
                        f.ip = target;
                    }
                }
                Instruction::JumpIfAccept { dfa, target } => {
                    if self.dfas[dfa.index()].is_accepting(f.state) {
                        f.ip = target;
                    }
                }
                Instruction::JumpIfMarked { target } => {
                    if f.mark.is_some() {
                        f.ip = target;
                    }
                }
                Instruction::Capture { reg, fail } => match f.mark {
                    Some(at) => f.regs[reg.index()] = at,
                    None => f.ip = fail,
                },
                Instruction::Jump { target } => f.ip = target,
                Instruction::Halt { outcome } => {
                    let start = f.regs[Reg::Start.index()];
                    let end = f.regs[Reg::End.index()];
                    tracer.trace_halt(outcome, start, end);
                    return match outcome {
                        Outcome::Reject => Halted::Reject,
                        Outcome::Accept => Halted::Accept,
                        Outcome::Span => Halted::Span(MatchSpan::new(start, end)),
                    };
                }
            }
        }
    }

    /// DEAD absorbs every byte.
    #[inline]
    fn transition(&self, dfa: usize, state: StateId, byte: u8) -> StateId {
        if state.is_dead() {
            return state;
        }
        self.dfas[dfa].next(state, self.classes.get(byte))
    }
}

impl Iterator for Matcher<'_, '_> {
    type Item = MatchSpan;

    fn next(&mut self) -> Option<MatchSpan> {
        self.find()
    }
}
