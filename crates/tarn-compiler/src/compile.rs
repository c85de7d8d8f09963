//! The compilation pipeline.
//!
//! parse → factorize → forward/reverse NFA → four DFAs → class
//! compression → routines → artifact.

use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;
use tarn_bytecode::{DfaRole, Module, dump};
use tarn_core::Colors;

use crate::ast::Factorization;
use crate::codegen::{self, Prefilters};
use crate::dfa::{self, Dfa, Mode};
use crate::emit::{self, ArtifactParts, StringTableBuilder};
use crate::nfa::{Direction, Nfa, NfaBuilder, byte_classes};
use crate::optimize::{self, Alphabet};
use crate::parser::parse;
use crate::{CompilationPolicy, Result};

/// Sizes observed along the pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CompileStats {
    pub nfa_states: usize,
    pub reverse_nfa_states: usize,
    /// Classes before compression.
    pub nfa_classes: usize,
    pub classes: usize,
    /// Live states per DFA, indexed by role.
    pub dfa_states: [usize; 4],
    pub steps: usize,
    pub artifact_size: usize,
}

impl fmt::Display for CompileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nfa_states = {} forward, {} reverse", self.nfa_states, self.reverse_nfa_states)?;
        writeln!(f, "classes = {} (from {})", self.classes, self.nfa_classes)?;
        for role in DfaRole::ALL {
            writeln!(f, "dfa {} = {} states", role.name(), self.dfa_states[role as usize])?;
        }
        writeln!(f, "steps = {}", self.steps)?;
        write!(f, "artifact = {} bytes", self.artifact_size)
    }
}

/// A compiled, not yet loaded, matcher.
#[derive(Clone, Debug)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub factorization: Factorization,
    pub stats: CompileStats,
    /// Statistics, literal factors and artifact dump, when requested by
    /// the policy.
    pub diagnostics: Option<String>,
}

/// Compile `pattern` into an artifact named `name`.
pub fn compile(pattern: &str, name: &str, policy: &CompilationPolicy) -> Result<Artifact> {
    let node = parse(pattern)?;
    let factorization = node.factors();

    let forward = NfaBuilder::new(Direction::Forward).build(&node)?;
    let reverse = NfaBuilder::new(Direction::Reverse).build(&node.reversed())?;
    let nfa_classes = byte_classes(&[&forward, &reverse]);

    let cap = policy.effective_state_limit();
    let build = |nfa: &Nfa, mode, role| dfa::build(nfa, &nfa_classes, mode, role, cap, pattern);
    let dfas: Vec<Dfa> = vec![
        build(&forward, Mode::Anchored, DfaRole::ForwardExact)?,
        build(&forward, Mode::Leftmost, DfaRole::ForwardSearch)?,
        build(&reverse, Mode::Anchored, DfaRole::Reverse)?,
        build(&forward, Mode::Membership, DfaRole::Membership)?,
    ];

    let Alphabet { classes, dfas } = if policy.enable_byte_class_compression {
        optimize::compress_classes(&nfa_classes, &dfas)
    } else {
        optimize::singleton_classes(&nfa_classes, &dfas)
    };

    let mut strings = StringTableBuilder::new(name, pattern);
    let prefilters = if policy.enable_literal_factoring {
        Prefilters {
            min_len: u32::try_from(factorization.min_len).unwrap_or(u32::MAX),
            max_len: factorization.max_len.and_then(|max| u32::try_from(max).ok()),
            literal: (!factorization.is_trivial()).then(|| strings.intern(&factorization.factor)),
        }
    } else {
        Prefilters::default()
    };
    let listing = codegen::generate(&prefilters);

    let bytes = emit::emit(&ArtifactParts {
        strings: &strings,
        classes: &classes,
        dfas: &dfas,
        listing: &listing,
        min_len: factorization.min_len,
        max_len: factorization.max_len,
        byte_classes: policy.enable_byte_class_compression,
        literal_factoring: policy.enable_literal_factoring,
    })?;

    let mut dfa_states = [0; 4];
    for dfa in &dfas {
        dfa_states[dfa.role() as usize] = dfa.state_count();
    }
    let stats = CompileStats {
        nfa_states: forward.len(),
        reverse_nfa_states: reverse.len(),
        nfa_classes: nfa_classes.len(),
        classes: classes.len(),
        dfa_states,
        steps: listing.steps.len(),
        artifact_size: bytes.len(),
    };

    let diagnostics = if policy.emit_diagnostics {
        Some(report(&bytes, &stats, &factorization)?)
    } else {
        None
    };

    Ok(Artifact {
        bytes,
        factorization,
        stats,
        diagnostics,
    })
}

fn report(bytes: &[u8], stats: &CompileStats, factorization: &Factorization) -> Result<String> {
    let module = Module::load(bytes)?;
    let mut out = String::new();
    writeln!(out, "[stats]\n{stats}\n").unwrap();
    writeln!(out, "[factors]").unwrap();
    writeln!(out, "prefix = {:?}", factorization.prefix).unwrap();
    writeln!(out, "suffix = {:?}", factorization.suffix).unwrap();
    writeln!(out, "factor = {:?}\n", factorization.factor).unwrap();
    out.push_str(&dump(&module, Colors::OFF));
    Ok(out)
}
