//! String table construction.

use indexmap::IndexSet;
use tarn_bytecode::StringId;

use super::ArtifactError;

/// Builds the string blob and offset table.
///
/// Slots 0 and 1 always hold the matcher name and the pattern, even when
/// they are equal. Literals after that are interned.
#[derive(Clone, Debug)]
pub struct StringTableBuilder {
    name: String,
    pattern: String,
    literals: IndexSet<String>,
}

impl StringTableBuilder {
    pub fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            literals: IndexSet::new(),
        }
    }

    /// Intern a literal, returning its id.
    pub fn intern(&mut self, literal: &str) -> StringId {
        let (idx, _) = self.literals.insert_full(literal.to_string());
        StringId(StringId::FIRST_LITERAL.get() + idx as u16)
    }

    pub(crate) fn len(&self) -> usize {
        2 + self.literals.len()
    }

    pub fn get(&self, id: StringId) -> Option<&str> {
        match id.get() {
            0 => Some(&self.name),
            1 => Some(&self.pattern),
            n => self
                .literals
                .get_index((n - StringId::FIRST_LITERAL.get()) as usize)
                .map(String::as_str),
        }
    }

    fn iter(&self) -> impl Iterator<Item = &str> {
        [self.name.as_str(), self.pattern.as_str()]
            .into_iter()
            .chain(self.literals.iter().map(String::as_str))
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.len() > u16::MAX as usize {
            return Err(ArtifactError::TooManyStrings(self.len()));
        }
        let blob: usize = self.iter().map(str::len).sum();
        if blob > u32::MAX as usize {
            return Err(ArtifactError::StringsTooLarge(blob));
        }
        Ok(())
    }

    /// Emit `(blob, table)`. The table holds `len() + 1` offsets; string
    /// `i` spans `table[i]..table[i + 1]`.
    pub fn emit(&self) -> (Vec<u8>, Vec<u8>) {
        let mut blob = Vec::new();
        let mut table = Vec::with_capacity((self.len() + 1) * 4);
        table.extend_from_slice(&0u32.to_le_bytes());
        for s in self.iter() {
            blob.extend_from_slice(s.as_bytes());
            table.extend_from_slice(&(blob.len() as u32).to_le_bytes());
        }
        (blob, table)
    }
}
