//! Artifact module with unified storage.
//!
//! [`Module`] owns the artifact bytes. Loading checks the header, checksum
//! and section structure once; afterwards tables are read through views and
//! instructions are decoded on demand.

use std::ops::Deref;

use super::constants::{STEP_SIZE, VERSION};
use super::header::{CLASS_MAP_SIZE, DFA_ENTRY_SIZE, Header, ROUTINE_ENTRY_SIZE, SectionOffsets};
use super::instructions::{DfaId, DfaRole, Instruction, RoutineKind, StepId, StringId};
use tarn_core::{ByteClasses, StateId};

#[inline]
fn read_u16_le(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[inline]
fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Storage for artifact bytes.
#[derive(Debug, Clone)]
pub struct ByteStorage(Vec<u8>);

impl Deref for ByteStorage {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ByteStorage {
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Module load error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    #[error("invalid magic: expected TARN")]
    InvalidMagic,
    #[error("unsupported version: {0} (expected {VERSION})")]
    UnsupportedVersion(u32),
    #[error("file too small: {0} bytes (minimum 64)")]
    FileTooSmall(usize),
    #[error("size mismatch: header says {header} bytes, got {actual}")]
    SizeMismatch { header: u32, actual: usize },
    #[error("checksum mismatch: header says {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("section layout ends at {end} bytes, beyond total size {total}")]
    Truncated { end: u32, total: u32 },
    #[error("malformed string table")]
    InvalidStrings,
    #[error("class map is not contiguous or disagrees with class count {0}")]
    InvalidClassMap(u16),
    #[error("malformed DFA directory: {0}")]
    InvalidDfaDirectory(&'static str),
    #[error("malformed routine table: {0}")]
    InvalidRoutines(&'static str),
}

/// A loaded artifact.
#[derive(Debug, Clone)]
pub struct Module {
    storage: ByteStorage,
    header: Header,
    offsets: SectionOffsets,
    classes: ByteClasses,
    /// Byte offset of each DFA's first transition cell and accept byte,
    /// relative to its section.
    dfa_bases: Vec<(usize, usize)>,
}

impl Module {
    /// Load a module from owned bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ModuleError> {
        Self::from_storage(ByteStorage::from_vec(bytes))
    }

    /// Load a module from borrowed bytes (copied).
    pub fn load(bytes: &[u8]) -> Result<Self, ModuleError> {
        Self::from_storage(ByteStorage::copy_from_slice(bytes))
    }

    fn from_storage(storage: ByteStorage) -> Result<Self, ModuleError> {
        if storage.len() < 64 {
            return Err(ModuleError::FileTooSmall(storage.len()));
        }

        let header = Header::from_bytes(&storage[..64]);

        if !header.validate_magic() {
            return Err(ModuleError::InvalidMagic);
        }
        if !header.validate_version() {
            return Err(ModuleError::UnsupportedVersion(header.version));
        }
        if header.total_size as usize != storage.len() {
            return Err(ModuleError::SizeMismatch {
                header: header.total_size,
                actual: storage.len(),
            });
        }

        let actual = crc32fast::hash(&storage[64..]);
        if actual != header.checksum {
            return Err(ModuleError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        let offsets = header.compute_offsets();
        if offsets.end > header.total_size {
            return Err(ModuleError::Truncated {
                end: offsets.end,
                total: header.total_size,
            });
        }

        validate_strings(&storage, &header, &offsets)?;

        let mut map = [0u8; CLASS_MAP_SIZE];
        let class_map = offsets.class_map as usize;
        map.copy_from_slice(&storage[class_map..class_map + CLASS_MAP_SIZE]);
        let classes = ByteClasses::from_map(map)
            .filter(|c| c.len() == header.class_count as usize)
            .ok_or(ModuleError::InvalidClassMap(header.class_count))?;

        let dfa_bases = validate_dfas(&storage, &header, &offsets)?;
        validate_routines(&storage, &header, &offsets)?;

        Ok(Self {
            storage,
            header,
            offsets,
            classes,
            dfa_bases,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn offsets(&self) -> &SectionOffsets {
        &self.offsets
    }

    pub fn bytes(&self) -> &[u8] {
        &self.storage
    }

    pub fn classes(&self) -> &ByteClasses {
        &self.classes
    }

    /// Decode the instruction at `step`. `None` if out of range or malformed.
    pub fn decode_step(&self, step: StepId) -> Option<Instruction> {
        if step.get() >= self.header.steps_count {
            return None;
        }
        let offset = self.offsets.steps as usize + step.get() as usize * STEP_SIZE;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.storage[offset..offset + STEP_SIZE]);
        Instruction::from_bytes(raw)
    }

    pub fn steps_count(&self) -> usize {
        self.header.steps_count as usize
    }

    pub fn strings(&self) -> StringsView<'_> {
        let table = self.offsets.str_table as usize;
        let count = self.header.str_table_count as usize;
        StringsView {
            blob: &self.storage[self.offsets.str_blob as usize..],
            table: &self.storage[table..table + (count + 1) * 4],
            count,
        }
    }

    pub fn dfas(&self) -> DfasView<'_> {
        DfasView { module: self }
    }

    pub fn routines(&self) -> RoutinesView<'_> {
        let offset = self.offsets.routines as usize;
        let count = self.header.routine_count as usize;
        RoutinesView {
            bytes: &self.storage[offset..offset + count * ROUTINE_ENTRY_SIZE],
            count,
        }
    }

    /// Generated matcher name.
    pub fn name(&self) -> &str {
        self.strings().get(StringId::NAME)
    }

    /// Source pattern text.
    pub fn pattern(&self) -> &str {
        self.strings().get(StringId::PATTERN)
    }
}

fn validate_strings(
    storage: &[u8],
    header: &Header,
    offsets: &SectionOffsets,
) -> Result<(), ModuleError> {
    let count = header.str_table_count as usize;
    // name and pattern are always present
    if count < 2 {
        return Err(ModuleError::InvalidStrings);
    }
    let table = offsets.str_table as usize;
    let blob = &storage[offsets.str_blob as usize..][..header.str_blob_size as usize];

    let mut prev = read_u32_le(storage, table) as usize;
    if prev != 0 {
        return Err(ModuleError::InvalidStrings);
    }
    for i in 1..=count {
        let next = read_u32_le(storage, table + i * 4) as usize;
        if next < prev || next > blob.len() {
            return Err(ModuleError::InvalidStrings);
        }
        if std::str::from_utf8(&blob[prev..next]).is_err() {
            return Err(ModuleError::InvalidStrings);
        }
        prev = next;
    }
    Ok(())
}

fn validate_dfas(
    storage: &[u8],
    header: &Header,
    offsets: &SectionOffsets,
) -> Result<Vec<(usize, usize)>, ModuleError> {
    let stride = header.class_count as usize;
    let directory = offsets.dfa_directory as usize;
    let mut bases = Vec::with_capacity(header.dfa_count as usize);
    let mut cells = 0usize;
    let mut accepts = 0usize;

    for i in 0..header.dfa_count as usize {
        let entry = directory + i * DFA_ENTRY_SIZE;
        if DfaRole::from_u8(storage[entry]).is_none() {
            return Err(ModuleError::InvalidDfaDirectory("unknown role"));
        }
        let states = read_u16_le(storage, entry + 2) as usize;
        let start = StateId(read_u16_le(storage, entry + 4));
        if !start.is_dead() && start.index() >= states {
            return Err(ModuleError::InvalidDfaDirectory("start state out of range"));
        }
        bases.push((cells * 2, accepts));
        cells += states * stride;
        accepts += states.div_ceil(8);
    }

    if cells != header.transitions_count as usize {
        return Err(ModuleError::InvalidDfaDirectory("transition count mismatch"));
    }
    if accepts != header.accepts_size as usize {
        return Err(ModuleError::InvalidDfaDirectory("accept bitset size mismatch"));
    }
    Ok(bases)
}

fn validate_routines(
    storage: &[u8],
    header: &Header,
    offsets: &SectionOffsets,
) -> Result<(), ModuleError> {
    let base = offsets.routines as usize;
    for i in 0..header.routine_count as usize {
        let entry = base + i * ROUTINE_ENTRY_SIZE;
        if RoutineKind::from_u8(storage[entry]).is_none() {
            return Err(ModuleError::InvalidRoutines("unknown routine kind"));
        }
        if read_u16_le(storage, entry + 2) >= header.steps_count {
            return Err(ModuleError::InvalidRoutines("entry step out of range"));
        }
    }
    Ok(())
}

/// View into the string table.
pub struct StringsView<'a> {
    blob: &'a [u8],
    table: &'a [u8],
    count: usize,
}

impl<'a> StringsView<'a> {
    pub fn get(&self, id: StringId) -> &'a str {
        self.get_by_index(id.get() as usize)
    }

    /// String `i` spans `table[i]..table[i + 1]` in the blob.
    pub fn get_by_index(&self, idx: usize) -> &'a str {
        let start = read_u32_le(self.table, idx * 4) as usize;
        let end = read_u32_le(self.table, (idx + 1) * 4) as usize;
        // validated on load
        std::str::from_utf8(&self.blob[start..end]).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// View into the DFA directory.
pub struct DfasView<'a> {
    module: &'a Module,
}

impl<'a> DfasView<'a> {
    pub fn len(&self) -> usize {
        self.module.header.dfa_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: DfaId) -> Option<DfaView<'a>> {
        let module = self.module;
        let (cell_base, accept_base) = *module.dfa_bases.get(id.index())?;
        let entry = module.offsets.dfa_directory as usize + id.index() * DFA_ENTRY_SIZE;
        let bytes = &module.storage[..];

        let role = DfaRole::from_u8(bytes[entry])?;
        let state_count = read_u16_le(bytes, entry + 2) as usize;
        let start = StateId(read_u16_le(bytes, entry + 4));
        let stride = module.header.class_count as usize;

        let transitions = module.offsets.transitions as usize + cell_base;
        let accepts = module.offsets.accepts as usize + accept_base;

        Some(DfaView {
            role,
            state_count,
            start,
            stride,
            transitions: &bytes[transitions..transitions + state_count * stride * 2],
            accepts: &bytes[accepts..accepts + state_count.div_ceil(8)],
        })
    }
}

/// One DFA's tables.
#[derive(Clone, Copy)]
pub struct DfaView<'a> {
    role: DfaRole,
    state_count: usize,
    start: StateId,
    stride: usize,
    transitions: &'a [u8],
    accepts: &'a [u8],
}

impl<'a> DfaView<'a> {
    pub fn role(&self) -> DfaRole {
        self.role
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    /// Number of classes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Transition of a live state on a class.
    pub fn next(&self, state: StateId, class: u8) -> StateId {
        debug_assert!(!state.is_dead());
        let cell = state.index() * self.stride + class as usize;
        StateId(read_u16_le(self.transitions, cell * 2))
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        if state.is_dead() || state.index() >= self.state_count {
            return false;
        }
        self.accepts[state.index() / 8] & (1 << (state.index() % 8)) != 0
    }
}

/// View into the routine table.
pub struct RoutinesView<'a> {
    bytes: &'a [u8],
    count: usize,
}

impl RoutinesView<'_> {
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Kind and entry step of routine `idx`.
    pub fn get(&self, idx: usize) -> Option<(RoutineKind, StepId)> {
        if idx >= self.count {
            return None;
        }
        let offset = idx * ROUTINE_ENTRY_SIZE;
        let kind = RoutineKind::from_u8(self.bytes[offset])?;
        Some((kind, StepId(read_u16_le(self.bytes, offset + 2))))
    }

    pub fn entry(&self, kind: RoutineKind) -> Option<StepId> {
        (0..self.count)
            .filter_map(|i| self.get(i))
            .find(|(k, _)| *k == kind)
            .map(|(_, step)| step)
    }
}
