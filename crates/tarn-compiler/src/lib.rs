//! tarn compiler: pattern text to matcher artifact.
//!
//! This crate provides the compilation pipeline for tarn patterns:
//! - `parser` - recursive-descent pattern parser
//! - `ast` - syntax tree, printer and literal factorization
//! - `nfa` - Thompson construction over UTF-8 bytes
//! - `dfa` - subset construction and dead-state pruning
//! - `optimize` - byte-class compression
//! - `codegen` - dispatch routines with symbolic labels
//! - `emit` - artifact serialization

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod ast;
pub mod codegen;
mod compile;
pub mod dfa;
pub mod emit;
pub mod nfa;
pub mod optimize;
pub mod parser;
mod policy;

#[cfg(test)]
pub mod test_utils;

pub use compile::{Artifact, CompileStats, compile};
pub use policy::CompilationPolicy;

/// Errors that can occur while compiling a pattern.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] parser::ParseError),

    #[error(transparent)]
    NfaTooLarge(#[from] nfa::NfaTooLarge),

    #[error(transparent)]
    StateLimitExceeded(#[from] dfa::StateLimitExceeded),

    #[error(transparent)]
    Artifact(#[from] emit::ArtifactError),

    /// The emitted artifact failed to load back.
    #[error("emitted artifact is invalid: {0}")]
    Module(#[from] tarn_bytecode::ModuleError),
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, Error>;
