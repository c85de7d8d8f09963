//! Tracing of dispatch execution.
//!
//! The dispatch loop is generic over [`Tracer`]. With [`NoopTracer`] every
//! hook is an empty inline function and disappears from the compiled loop;
//! [`PrintTracer`] collects one line per executed instruction.

use tarn_bytecode::{Instruction, Outcome, RoutineKind, StepId, format_instruction, width_for_count};
use tarn_core::{Colors, StateId};

use crate::interpreter::Program;

/// Hooks called by the dispatch loop.
///
/// - `trace_enter` - a routine starts at `origin`
/// - `trace_instruction` - before executing a step, with the cursor and state
/// - `trace_halt` - the routine halts; `start..end` is meaningful for spans
pub trait Tracer {
    fn trace_enter(&mut self, kind: RoutineKind, origin: usize);

    fn trace_instruction(&mut self, step: StepId, instr: &Instruction, pos: usize, state: StateId);

    fn trace_halt(&mut self, outcome: Outcome, start: usize, end: usize);
}

/// Tracer that does nothing.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _kind: RoutineKind, _origin: usize) {}

    #[inline(always)]
    fn trace_instruction(
        &mut self,
        _step: StepId,
        _instr: &Instruction,
        _pos: usize,
        _state: StateId,
    ) {
    }

    #[inline(always)]
    fn trace_halt(&mut self, _outcome: Outcome, _start: usize, _end: usize) {}
}

/// Collects a readable execution trace.
pub struct PrintTracer {
    lines: Vec<String>,
    /// Digits in a step number.
    width: usize,
    colors: Colors,
}

impl PrintTracer {
    pub fn new(program: &Program, colors: Colors) -> Self {
        Self {
            lines: Vec::new(),
            width: width_for_count(program.steps().len()),
            colors,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The trace so far, one line per event.
    pub fn output(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Tracer for PrintTracer {
    fn trace_enter(&mut self, kind: RoutineKind, origin: usize) {
        let c = self.colors;
        self.lines.push(format!(
            "{}{}:{} {}origin={origin}{}",
            c.label,
            kind.name(),
            c.reset,
            c.dim,
            c.reset
        ));
    }

    fn trace_instruction(&mut self, step: StepId, instr: &Instruction, pos: usize, state: StateId) {
        let c = self.colors;
        let text = format_instruction(instr, self.width);
        self.lines.push(format!(
            "  {:0w$}  {text:<22} {}pos={pos} state={state}{}",
            step.get(),
            c.dim,
            c.reset,
            w = self.width,
        ));
    }

    fn trace_halt(&mut self, outcome: Outcome, start: usize, end: usize) {
        let c = self.colors;
        let line = match outcome {
            Outcome::Reject => "  => reject".to_string(),
            Outcome::Accept => format!("  => {}accept{}", c.accept, c.reset),
            Outcome::Span => format!("  => {}span {start}..{end}{}", c.accept, c.reset),
        };
        self.lines.push(line);
    }
}
