//! tarn: ahead-of-time regular expression compiler.
//!
//! A pattern is compiled once into four DFAs and a small dispatch program.
//! Matching runs the program over the tables; nothing is interpreted from
//! pattern text at match time and no input can trigger backtracking.
//!
//! # Example
//!
//! ```
//! let pattern = tarn::compile("ab+c", "abc_run").unwrap();
//!
//! assert!(pattern.new_matcher("abbbc").matches());
//! assert!(pattern.new_matcher("xxabcyy").contained_in());
//!
//! let mut matcher = pattern.new_matcher("xxabbcyy");
//! let span = matcher.find().unwrap();
//! assert_eq!(span.range(), 2..6);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod pattern;

#[cfg(test)]
mod pattern_tests;

pub use pattern::{CompiledPattern, Pattern, compile};
pub use tarn_compiler::ast::Factorization;
pub use tarn_compiler::parser::{ParseError, ParseErrorKind};
pub use tarn_compiler::{CompilationPolicy, CompileStats};
pub use tarn_core::{Colors, MatchSpan};
pub use tarn_vm::{
    Backend, EmitError, Interpreter, Matcher, NoopTracer, PrintTracer, Program, Tracer,
};

/// Errors that can occur while building a matcher.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The pattern did not compile.
    #[error(transparent)]
    Compile(#[from] tarn_compiler::Error),

    /// The backend refused the artifact.
    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Compile(err.into())
    }
}

impl Error {
    /// The parse error, if that is what went wrong.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Compile(tarn_compiler::Error::Parse(err)) => Some(err),
            _ => None,
        }
    }
}

/// Result type for building matchers.
pub type Result<T> = std::result::Result<T, Error>;
