//! Artifact header (64 bytes).
//!
//! Offsets are computed from counts + SECTION_ALIGN (64 bytes).
//! Section order: Header → StringBlob → StringTable → ClassMap →
//! DfaDirectory → Transitions → Accepts → Routines → Steps

use super::constants::{MAGIC, SECTION_ALIGN, STEP_SIZE, UNBOUNDED, VERSION};

/// Size of one DFA directory entry: `role u8 | pad u8 | states u16 | start u16 | pad u16`.
pub(crate) const DFA_ENTRY_SIZE: usize = 8;

/// Size of one routine table entry: `kind u8 | pad u8 | entry u16`.
pub(crate) const ROUTINE_ENTRY_SIZE: usize = 4;

/// Size of the class map section.
pub(crate) const CLASS_MAP_SIZE: usize = 256;

/// File header - first 64 bytes of the artifact.
///
/// - 0-35: identity, sizes and length bounds (9 × u32)
/// - 36-47: counts and flags (6 × u16), in section order
/// - 48-63: reserved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, align(64))]
pub struct Header {
    /// Magic bytes: b"TARN"
    pub magic: [u8; 4],
    pub version: u32,
    /// CRC32 of everything after the header.
    pub checksum: u32,
    pub total_size: u32,
    pub str_blob_size: u32,
    /// Number of u16 transition cells across all DFAs.
    pub transitions_count: u32,
    /// Bytes of accept bitsets across all DFAs.
    pub accepts_size: u32,
    /// Minimum match length in bytes.
    pub min_len: u32,
    /// Maximum match length in bytes, `UNBOUNDED` if none.
    pub max_len: u32,

    pub str_table_count: u16,
    pub class_count: u16,
    pub dfa_count: u16,
    pub routine_count: u16,
    pub steps_count: u16,
    pub flags: u16,

    pub _reserved: [u8; 16],
}

const _: () = assert!(std::mem::size_of::<Header>() == 64);

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            checksum: 0,
            total_size: 0,
            str_blob_size: 0,
            transitions_count: 0,
            accepts_size: 0,
            min_len: 0,
            max_len: UNBOUNDED,
            str_table_count: 0,
            class_count: 0,
            dfa_count: 0,
            routine_count: 0,
            steps_count: 0,
            flags: 0,
            _reserved: [0; 16],
        }
    }
}

/// Section offsets derived from header counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionOffsets {
    pub str_blob: u32,
    pub str_table: u32,
    pub class_map: u32,
    pub dfa_directory: u32,
    pub transitions: u32,
    pub accepts: u32,
    pub routines: u32,
    pub steps: u32,
    /// One past the last byte of the steps section.
    pub end: u32,
}

impl Header {
    /// Decode header from the first 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= 64, "header too short");

        let u32_at = |o: usize| u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);
        let u16_at = |o: usize| u16::from_le_bytes([bytes[o], bytes[o + 1]]);

        let mut reserved = [0u8; 16];
        reserved.copy_from_slice(&bytes[48..64]);

        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u32_at(4),
            checksum: u32_at(8),
            total_size: u32_at(12),
            str_blob_size: u32_at(16),
            transitions_count: u32_at(20),
            accepts_size: u32_at(24),
            min_len: u32_at(28),
            max_len: u32_at(32),
            str_table_count: u16_at(36),
            class_count: u16_at(38),
            dfa_count: u16_at(40),
            routine_count: u16_at(42),
            steps_count: u16_at(44),
            flags: u16_at(46),
            _reserved: reserved,
        }
    }

    /// Encode header to 64 bytes.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.str_blob_size.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.transitions_count.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.accepts_size.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.min_len.to_le_bytes());
        bytes[32..36].copy_from_slice(&self.max_len.to_le_bytes());
        bytes[36..38].copy_from_slice(&self.str_table_count.to_le_bytes());
        bytes[38..40].copy_from_slice(&self.class_count.to_le_bytes());
        bytes[40..42].copy_from_slice(&self.dfa_count.to_le_bytes());
        bytes[42..44].copy_from_slice(&self.routine_count.to_le_bytes());
        bytes[44..46].copy_from_slice(&self.steps_count.to_le_bytes());
        bytes[46..48].copy_from_slice(&self.flags.to_le_bytes());
        bytes[48..64].copy_from_slice(&self._reserved);
        bytes
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        self.version == VERSION
    }

    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    /// `None` when the pattern has no upper length bound.
    pub fn max_len(&self) -> Option<u32> {
        (self.max_len != UNBOUNDED).then_some(self.max_len)
    }

    /// Compute section offsets from counts and blob sizes.
    ///
    /// Arithmetic is done in u64 so a corrupted header cannot wrap around;
    /// offsets past `u32::MAX` saturate and fail the size check on load.
    pub fn compute_offsets(&self) -> SectionOffsets {
        let align = SECTION_ALIGN as u64;

        let str_blob = align;
        let str_table = align_up(str_blob + self.str_blob_size as u64, align);
        let str_table_size = (self.str_table_count as u64 + 1) * 4;

        let class_map = align_up(str_table + str_table_size, align);

        let dfa_directory = align_up(class_map + CLASS_MAP_SIZE as u64, align);
        let dfa_directory_size = self.dfa_count as u64 * DFA_ENTRY_SIZE as u64;

        let transitions = align_up(dfa_directory + dfa_directory_size, align);
        let transitions_size = self.transitions_count as u64 * 2;

        let accepts = align_up(transitions + transitions_size, align);

        let routines = align_up(accepts + self.accepts_size as u64, align);
        let routines_size = self.routine_count as u64 * ROUTINE_ENTRY_SIZE as u64;

        let steps = align_up(routines + routines_size, align);
        let end = steps + self.steps_count as u64 * STEP_SIZE as u64;

        let clamp = |v: u64| v.min(u32::MAX as u64) as u32;
        SectionOffsets {
            str_blob: clamp(str_blob),
            str_table: clamp(str_table),
            class_map: clamp(class_map),
            dfa_directory: clamp(dfa_directory),
            transitions: clamp(transitions),
            accepts: clamp(accepts),
            routines: clamp(routines),
            steps: clamp(steps),
            end: clamp(end),
        }
    }
}

/// Round up to the next multiple of `align`.
fn align_up(value: u64, align: u64) -> u64 {
    (value + align - 1) & !(align - 1)
}
