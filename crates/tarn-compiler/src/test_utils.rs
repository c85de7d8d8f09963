//! Test utilities.

use tarn_bytecode::{Module, dump};
use tarn_core::Colors;

use crate::{Artifact, CompilationPolicy, compile};

/// Compile with the default policy, panicking on error.
pub fn compile_ok(pattern: &str) -> Artifact {
    compile_with(pattern, &CompilationPolicy::default())
}

pub fn compile_with(pattern: &str, policy: &CompilationPolicy) -> Artifact {
    compile(pattern, "test", policy)
        .unwrap_or_else(|e| panic!("pattern {pattern:?} failed to compile: {e}"))
}

/// Load an artifact back and render its dump.
pub fn dump_artifact(artifact: &Artifact) -> String {
    let module = Module::load(&artifact.bytes).expect("artifact must load");
    dump(&module, Colors::OFF)
}
