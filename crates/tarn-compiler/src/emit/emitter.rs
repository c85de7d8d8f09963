//! Artifact assembly.

use tarn_bytecode::{
    FLAG_BYTE_CLASSES, FLAG_LITERAL_FACTORING, Header, RoutineKind, SECTION_ALIGN, StepId,
    UNBOUNDED,
};
use tarn_core::{ByteClasses, StateId};

use super::ArtifactError;
use super::strings::StringTableBuilder;
use crate::codegen::Listing;
use crate::dfa::Dfa;

/// Everything that goes into one artifact.
pub struct ArtifactParts<'a> {
    pub strings: &'a StringTableBuilder,
    pub classes: &'a ByteClasses,
    /// Indexed by role.
    pub dfas: &'a [Dfa],
    pub listing: &'a Listing,
    pub min_len: usize,
    pub max_len: Option<usize>,
    pub byte_classes: bool,
    pub literal_factoring: bool,
}

/// Serialize `parts` into artifact bytes.
pub fn emit(parts: &ArtifactParts<'_>) -> Result<Vec<u8>, ArtifactError> {
    parts.strings.validate()?;
    if parts.listing.steps.len() > u16::MAX as usize {
        return Err(ArtifactError::TooManySteps(parts.listing.steps.len()));
    }

    let (str_blob, str_table) = parts.strings.emit();
    let directory = emit_directory(parts.dfas);
    let transitions = emit_transitions(parts.dfas);
    let accepts = emit_accepts(parts.dfas);
    let routines = emit_routines(&parts.listing.entries);
    let steps: Vec<u8> = parts
        .listing
        .steps
        .iter()
        .flat_map(|instr| instr.to_bytes())
        .collect();

    // Header → StringBlob → StringTable → ClassMap → DfaDirectory →
    // Transitions → Accepts → Routines → Steps
    let mut output = vec![0u8; 64];
    emit_section(&mut output, &str_blob);
    emit_section(&mut output, &str_table);
    emit_section(&mut output, parts.classes.as_bytes());
    emit_section(&mut output, &directory);
    emit_section(&mut output, &transitions);
    emit_section(&mut output, &accepts);
    emit_section(&mut output, &routines);
    emit_section(&mut output, &steps);
    pad_to_section(&mut output);

    let total_size =
        u32::try_from(output.len()).map_err(|_| ArtifactError::TooLarge(output.len()))?;

    let mut flags = 0;
    if parts.byte_classes {
        flags |= FLAG_BYTE_CLASSES;
    }
    if parts.literal_factoring {
        flags |= FLAG_LITERAL_FACTORING;
    }

    let mut header = Header {
        total_size,
        str_blob_size: str_blob.len() as u32,
        transitions_count: (transitions.len() / 2) as u32,
        accepts_size: accepts.len() as u32,
        min_len: clamp_len(parts.min_len),
        max_len: parts.max_len.map_or(UNBOUNDED, clamp_len),
        str_table_count: parts.strings.len() as u16,
        class_count: parts.classes.len() as u16,
        dfa_count: parts.dfas.len() as u16,
        routine_count: parts.listing.entries.len() as u16,
        steps_count: parts.listing.steps.len() as u16,
        flags,
        ..Default::default()
    };
    header.checksum = crc32fast::hash(&output[64..]);
    output[..64].copy_from_slice(&header.to_bytes());

    Ok(output)
}

/// Lengths past the header's range saturate; `UNBOUNDED` stays reserved.
fn clamp_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(UNBOUNDED).min(UNBOUNDED - 1)
}

/// Pad a buffer to the section alignment boundary.
fn pad_to_section(buf: &mut Vec<u8>) {
    let rem = buf.len() % SECTION_ALIGN;
    if rem != 0 {
        let padding = SECTION_ALIGN - rem;
        buf.resize(buf.len() + padding, 0);
    }
}

fn emit_section(output: &mut Vec<u8>, data: &[u8]) {
    pad_to_section(output);
    output.extend_from_slice(data);
}

fn emit_directory(dfas: &[Dfa]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(dfas.len() * 8);
    for dfa in dfas {
        bytes.push(dfa.role() as u8);
        bytes.push(0);
        bytes.extend_from_slice(&(dfa.state_count() as u16).to_le_bytes());
        bytes.extend_from_slice(&dfa.start().get().to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
    }
    bytes
}

fn emit_transitions(dfas: &[Dfa]) -> Vec<u8> {
    dfas.iter()
        .flat_map(|dfa| dfa.transitions())
        .flat_map(|state| state.get().to_le_bytes())
        .collect()
}

/// One bitset per DFA, least significant bit first, padded to whole bytes.
fn emit_accepts(dfas: &[Dfa]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for dfa in dfas {
        let base = bytes.len();
        bytes.resize(base + dfa.state_count().div_ceil(8), 0);
        for s in 0..dfa.state_count() {
            if dfa.is_accepting(StateId::new(s)) {
                bytes[base + s / 8] |= 1 << (s % 8);
            }
        }
    }
    bytes
}

fn emit_routines(entries: &[(RoutineKind, StepId)]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(entries.len() * 4);
    for (kind, entry) in entries {
        bytes.push(*kind as u8);
        bytes.push(0);
        bytes.extend_from_slice(&entry.get().to_le_bytes());
    }
    bytes
}
