//! Compiling patterns into ready-to-run matchers.

use tarn_compiler::ast::Factorization;
use tarn_compiler::{Artifact, CompilationPolicy, CompileStats};
use tarn_vm::{Interpreter, Matcher, Program};

use crate::Result;

/// Name given to matchers built without one.
const DEFAULT_NAME: &str = "matcher";

/// Compile `pattern` with the default policy.
pub fn compile(pattern: &str, generated_name: &str) -> Result<CompiledPattern> {
    Pattern::builder(pattern).name(generated_name).build()
}

/// Pattern text plus the options to compile it with.
#[derive(Clone, Debug)]
pub struct Pattern<'a> {
    text: &'a str,
    name: &'a str,
    policy: CompilationPolicy,
}

impl<'a> Pattern<'a> {
    pub fn builder(text: &'a str) -> Self {
        Self {
            text,
            name: DEFAULT_NAME,
            policy: CompilationPolicy::default(),
        }
    }

    /// Name recorded in the artifact.
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = name;
        self
    }

    pub fn policy(mut self, policy: CompilationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Compile, then hand the artifact to the interpreter backend.
    pub fn build(&self) -> Result<CompiledPattern> {
        let artifact = tarn_compiler::compile(self.text, self.name, &self.policy)?;
        let program = Interpreter::new().load(&artifact.bytes)?;
        Ok(CompiledPattern { artifact, program })
    }
}

/// An immutable compiled pattern. Share it across threads and create one
/// [`Matcher`] per input.
#[derive(Debug)]
pub struct CompiledPattern {
    artifact: Artifact,
    program: Program,
}

impl CompiledPattern {
    pub fn new_matcher<'i>(&self, input: &'i str) -> Matcher<'_, 'i> {
        self.program.matcher(input)
    }

    pub fn name(&self) -> &str {
        self.program.module().name()
    }

    pub fn pattern(&self) -> &str {
        self.program.module().pattern()
    }

    pub fn factorization(&self) -> &Factorization {
        &self.artifact.factorization
    }

    /// The serialized artifact.
    pub fn artifact(&self) -> &[u8] {
        &self.artifact.bytes
    }

    pub fn stats(&self) -> &CompileStats {
        &self.artifact.stats
    }

    /// Statistics and artifact dump, present when the policy asked for them.
    pub fn diagnostics(&self) -> Option<&str> {
        self.artifact.diagnostics.as_deref()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }
}
