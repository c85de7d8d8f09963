//! Byte equivalence classes.
//!
//! The input alphabet is the 256 byte values. Automata only ever distinguish
//! bytes at the boundaries of the ranges they test, so bytes between two
//! boundaries can share a single transition column.

/// Boundary set used to derive byte classes from a collection of ranges.
///
/// `boundary[b]` is set when byte `b` ends a class, i.e. `b` and `b + 1`
/// must not share a class.
#[derive(Clone, Debug)]
pub struct ByteClassSet {
    boundary: [bool; 256],
}

impl Default for ByteClassSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteClassSet {
    pub fn new() -> Self {
        Self {
            boundary: [false; 256],
        }
    }

    /// Record that `lo..=hi` is tested as a unit.
    pub fn set_range(&mut self, lo: u8, hi: u8) {
        debug_assert!(lo <= hi);
        if lo > 0 {
            self.boundary[lo as usize - 1] = true;
        }
        self.boundary[hi as usize] = true;
    }

    /// Collapse the boundaries into a class map.
    pub fn byte_classes(&self) -> ByteClasses {
        let mut map = [0u8; 256];
        let mut class = 0u16;
        for b in 0..256 {
            map[b] = class as u8;
            if self.boundary[b] && b < 255 {
                class += 1;
            }
        }
        ByteClasses {
            map,
            count: class + 1,
        }
    }
}

/// Mapping from input byte to class index.
///
/// Class ids are contiguous and ordered by their smallest member byte.
#[derive(Clone, PartialEq, Eq)]
pub struct ByteClasses {
    map: [u8; 256],
    count: u16,
}

impl ByteClasses {
    /// One class per byte value (compression disabled).
    pub fn singletons() -> Self {
        let mut map = [0u8; 256];
        for (b, slot) in map.iter_mut().enumerate() {
            *slot = b as u8;
        }
        Self { map, count: 256 }
    }

    /// Build from a raw map. Returns `None` if class ids are not contiguous
    /// in first-occurrence order.
    pub fn from_map(map: [u8; 256]) -> Option<Self> {
        let mut next = 0u16;
        for &class in &map {
            let class = class as u16;
            if class > next {
                return None;
            }
            if class == next {
                next += 1;
            }
        }
        Some(Self { map, count: next })
    }

    #[inline]
    pub fn get(&self, byte: u8) -> u8 {
        self.map[byte as usize]
    }

    /// Number of classes (1..=256).
    #[inline]
    pub fn len(&self) -> usize {
        self.count as usize
    }

    /// Never true: every byte belongs to some class.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_singleton(&self) -> bool {
        self.count == 256
    }

    pub fn as_bytes(&self) -> &[u8; 256] {
        &self.map
    }

    /// Smallest member byte of each class, indexed by class.
    pub fn representatives(&self) -> Vec<u8> {
        let mut reps = Vec::with_capacity(self.len());
        for b in 0..=255u8 {
            if self.map[b as usize] as usize == reps.len() {
                reps.push(b);
            }
        }
        reps
    }

    /// Member bytes of `class` as inclusive ranges.
    pub fn ranges(&self, class: u8) -> Vec<(u8, u8)> {
        let mut out: Vec<(u8, u8)> = Vec::new();
        for b in 0..=255u8 {
            if self.map[b as usize] != class {
                continue;
            }
            match out.last_mut() {
                Some((_, hi)) if *hi as u16 + 1 == b as u16 => *hi = b,
                _ => out.push((b, b)),
            }
        }
        out
    }
}

impl std::fmt::Debug for ByteClasses {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_singleton() {
            return write!(f, "ByteClasses(singletons)");
        }
        let mut list = f.debug_list();
        for class in 0..self.len() {
            list.entry(&self.ranges(class as u8));
        }
        list.finish()
    }
}
