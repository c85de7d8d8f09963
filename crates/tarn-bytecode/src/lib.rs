//! Compiled matcher artifact format for tarn.
//!
//! This crate contains:
//! - Artifact layout (Header, section offsets, constants)
//! - Dispatch instructions and their 8-byte encoding
//! - Module loading with lazy views over the constant tables
//! - Human-readable dump

#![allow(clippy::comparison_chain)]

mod constants;
mod dump;
mod header;
mod instructions;
mod module;

#[cfg(test)]
mod module_tests;

pub use constants::{
    FLAG_BYTE_CLASSES, FLAG_LITERAL_FACTORING, MAGIC, SECTION_ALIGN, STEP_SIZE, UNBOUNDED,
    VERSION, align_to_section,
};
pub use dump::{dump, format_instruction, width_for_count};
pub use header::{Header, SectionOffsets};
pub use instructions::{
    DfaId, DfaRole, Instruction, Opcode, Outcome, Reg, RoutineKind, StepId, StringId,
};
pub use module::{ByteStorage, DfaView, DfasView, Module, ModuleError, RoutinesView, StringsView};
