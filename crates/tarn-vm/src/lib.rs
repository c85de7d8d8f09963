//! Backends for compiled tarn matchers.
//!
//! A backend turns a loaded artifact [`Module`](tarn_bytecode::Module) into
//! an invocable unit. This crate ships the interpreter backend: a fixed
//! dispatch loop that walks the DFA tables as plain data.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod backend;
mod interpreter;
mod matcher;
mod trace;


pub use backend::{Backend, EmitError};
pub use interpreter::{Interpreter, Program};
pub use matcher::Matcher;
pub use trace::{NoopTracer, PrintTracer, Tracer};
