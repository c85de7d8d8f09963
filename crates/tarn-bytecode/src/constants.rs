//! Artifact format constants.

/// Magic bytes identifying a tarn artifact.
pub const MAGIC: [u8; 4] = *b"TARN";

/// Current artifact format version.
pub const VERSION: u32 = 1;

/// Section alignment in bytes.
pub const SECTION_ALIGN: usize = 64;

/// Every instruction occupies one 8-byte step.
pub const STEP_SIZE: usize = 8;

/// `max_len` value meaning "no upper bound".
pub const UNBOUNDED: u32 = u32::MAX;

/// Header flag: the class map is compressed (not 256 singletons).
pub const FLAG_BYTE_CLASSES: u16 = 1 << 0;

/// Header flag: routines carry length and literal prefilters.
pub const FLAG_LITERAL_FACTORING: u16 = 1 << 1;

/// Round `offset` up to the next section boundary.
pub fn align_to_section(offset: usize) -> usize {
    (offset + SECTION_ALIGN - 1) & !(SECTION_ALIGN - 1)
}
