//! Human-readable artifact dump for debugging and snapshot tests.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tarn_core::{Colors, StateId};

use super::constants::{FLAG_BYTE_CLASSES, FLAG_LITERAL_FACTORING};
use super::instructions::{DfaId, Instruction, StepId};
use super::module::Module;

/// Generate a human-readable dump of the module.
pub fn dump(module: &Module, colors: Colors) -> String {
    let mut out = String::new();

    dump_header(&mut out, module, colors);
    dump_strings(&mut out, module, colors);
    dump_classes(&mut out, module, colors);
    dump_dfas(&mut out, module, colors);
    dump_code(&mut out, module, colors);

    out
}

fn dump_header(out: &mut String, module: &Module, c: Colors) {
    let header = module.header();
    writeln!(out, "{}[matcher]{}", c.section, c.reset).unwrap();
    writeln!(out, "name = {}", module.name()).unwrap();
    writeln!(out, "pattern = {}", module.pattern()).unwrap();
    match header.max_len() {
        Some(max) => writeln!(out, "length = {}..={}", header.min_len, max).unwrap(),
        None => writeln!(out, "length = {}..", header.min_len).unwrap(),
    }
    let mut flags = Vec::new();
    if header.has_flag(FLAG_BYTE_CLASSES) {
        flags.push("byte_classes");
    }
    if header.has_flag(FLAG_LITERAL_FACTORING) {
        flags.push("literal_factoring");
    }
    writeln!(out, "flags = [{}]", flags.join(", ")).unwrap();
    out.push('\n');
}

fn dump_strings(out: &mut String, module: &Module, c: Colors) {
    let strings = module.strings();
    let width = width_for_count(strings.len());
    writeln!(out, "{}[strings]{}", c.section, c.reset).unwrap();
    for i in 0..strings.len() {
        let s = strings.get_by_index(i);
        writeln!(out, "S{i:0width$} {s:?}").unwrap();
    }
    out.push('\n');
}

fn dump_classes(out: &mut String, module: &Module, c: Colors) {
    let classes = module.classes();
    writeln!(out, "{}[classes]{} count={}", c.section, c.reset, classes.len()).unwrap();
    if classes.is_singleton() {
        writeln!(out, "{}(one class per byte){}", c.dim, c.reset).unwrap();
        out.push('\n');
        return;
    }
    let width = width_for_count(classes.len());
    for class in 0..classes.len() {
        let ranges: Vec<String> = classes
            .ranges(class as u8)
            .into_iter()
            .map(|(lo, hi)| {
                if lo == hi {
                    format!("{lo:02x}")
                } else {
                    format!("{lo:02x}-{hi:02x}")
                }
            })
            .collect();
        writeln!(out, "C{class:0width$} {}{}{}", c.dim, ranges.join(" "), c.reset).unwrap();
    }
    out.push('\n');
}

fn dump_dfas(out: &mut String, module: &Module, c: Colors) {
    let dfas = module.dfas();
    for i in 0..dfas.len() {
        let Some(dfa) = dfas.get(DfaId(i as u8)) else {
            continue;
        };
        writeln!(
            out,
            "{}[dfa D{i} {}]{} start={} states={}",
            c.section,
            dfa.role().name(),
            c.reset,
            dfa.start(),
            dfa.state_count()
        )
        .unwrap();

        for s in 0..dfa.state_count() {
            let state = StateId(s as u16);
            let mark = if dfa.is_accepting(state) {
                format!("{}*{}", c.accept, c.reset)
            } else {
                " ".to_string()
            };
            let edges = group_edges(|class| dfa.next(state, class), dfa.stride());
            let name = state.to_string();
            writeln!(out, "{mark}{name:<6} {edges}").unwrap();
        }
        out.push('\n');
    }
}

/// Render a row as `C0-C3→s1 C4→s2`, omitting edges into `DEAD`.
fn group_edges(next: impl Fn(u8) -> StateId, stride: usize) -> String {
    let mut parts = Vec::new();
    let mut class = 0;
    while class < stride {
        let target = next(class as u8);
        let mut end = class;
        while end + 1 < stride && next((end + 1) as u8) == target {
            end += 1;
        }
        if !target.is_dead() {
            if class == end {
                parts.push(format!("C{class}→{target}"));
            } else {
                parts.push(format!("C{class}-C{end}→{target}"));
            }
        }
        class = end + 1;
    }
    if parts.is_empty() {
        "(dead)".to_string()
    } else {
        parts.join(" ")
    }
}

fn dump_code(out: &mut String, module: &Module, c: Colors) {
    let routines = module.routines();
    let mut labels: BTreeMap<u16, &str> = BTreeMap::new();
    for i in 0..routines.len() {
        if let Some((kind, entry)) = routines.get(i) {
            labels.insert(entry.get(), kind.name());
        }
    }

    let width = width_for_count(module.steps_count());
    writeln!(out, "{}[code]{}", c.section, c.reset).unwrap();
    for step in 0..module.steps_count() {
        let id = StepId(step as u16);
        if let Some(label) = labels.get(&id.get()) {
            writeln!(out, "{}{label}:{}", c.label, c.reset).unwrap();
        }
        let text = match module.decode_step(id) {
            Some(instr) => format_instruction(&instr, width),
            None => "<invalid>".to_string(),
        };
        writeln!(out, "  {step:0width$}  {text}").unwrap();
    }
}

/// One-line rendering of an instruction, jump targets padded to `width`.
pub fn format_instruction(instr: &Instruction, width: usize) -> String {
    let m = instr.opcode().mnemonic();
    let t = |s: StepId| format!("{:0width$}", s.get());
    match *instr {
        Instruction::MinLength { min, fail } => format!("{m} {min} else {}", t(fail)),
        Instruction::MaxLength { max, fail } => format!("{m} {max} else {}", t(fail)),
        Instruction::Literal { lit, fail } => format!("{m} S{} else {}", lit.get(), t(fail)),
        Instruction::Seek { reg } => format!("{m} {}", reg.name()),
        Instruction::Begin { dfa }
        | Instruction::Mark { dfa }
        | Instruction::Step { dfa }
        | Instruction::StepBack { dfa } => format!("{m} D{}", dfa.get()),
        Instruction::JumpIfAccept { dfa, target } => format!("{m} D{} {}", dfa.get(), t(target)),
        Instruction::JumpIfEnd { target }
        | Instruction::JumpIfOrigin { target }
        | Instruction::JumpIfDead { target }
        | Instruction::JumpIfMarked { target }
        | Instruction::Jump { target } => format!("{m} {}", t(target)),
        Instruction::Capture { reg, fail } => format!("{m} {} else {}", reg.name(), t(fail)),
        Instruction::Halt { outcome } => format!("{m} {}", outcome.name()),
    }
}

/// Digits needed to print indices `0..count`.
pub fn width_for_count(count: usize) -> usize {
    let mut width = 1;
    let mut n = count.saturating_sub(1);
    while n >= 10 {
        width += 1;
        n /= 10;
    }
    width
}
