//! Alphabet compression across the DFA set.
//!
//! The determinizer works over the NFA byte classes, which only separate
//! bytes at range boundaries. Many of those classes end up with identical
//! columns in every table; merging them shrinks the stride of all four DFAs.


use indexmap::IndexMap;
use tarn_core::{ByteClasses, StateId};

use crate::dfa::Dfa;

/// Tables rewritten over a new alphabet.
#[derive(Clone, Debug)]
pub struct Alphabet {
    pub classes: ByteClasses,
    pub dfas: Vec<Dfa>,
}

/// Merge classes whose columns agree in every DFA.
///
/// New class ids follow first occurrence in byte order, so the result is
/// a valid class map and two bytes share a class iff every DFA moves them
/// to the same state from every state.
pub fn compress_classes(classes: &ByteClasses, dfas: &[Dfa]) -> Alphabet {
    let mut signatures: IndexMap<Vec<StateId>, usize> = IndexMap::new();
    let mut renumber = Vec::with_capacity(classes.len());
    for class in 0..classes.len() {
        let signature = column_signature(dfas, class);
        let next = signatures.len();
        let id = *signatures.entry(signature).or_insert(next);
        renumber.push(id);
    }

    // representative old class for each new class
    let mut columns = vec![0; signatures.len()];
    for (old, &new) in renumber.iter().enumerate().rev() {
        columns[new] = old;
    }

    let mut map = [0u8; 256];
    for (b, slot) in map.iter_mut().enumerate() {
        *slot = renumber[classes.get(b as u8) as usize] as u8;
    }
    let classes = ByteClasses::from_map(map).expect("class ids follow byte order");

    Alphabet {
        classes,
        dfas: dfas.iter().map(|dfa| dfa.remap_columns(&columns)).collect(),
    }
}

/// Spread the tables over one class per byte.
pub fn singleton_classes(classes: &ByteClasses, dfas: &[Dfa]) -> Alphabet {
    let columns: Vec<usize> = (0..=255u8).map(|b| classes.get(b) as usize).collect();
    Alphabet {
        classes: ByteClasses::singletons(),
        dfas: dfas.iter().map(|dfa| dfa.remap_columns(&columns)).collect(),
    }
}

fn column_signature(dfas: &[Dfa], class: usize) -> Vec<StateId> {
    let mut signature = Vec::new();
    for dfa in dfas {
        for s in 0..dfa.state_count() {
            signature.push(dfa.next(StateId::new(s), class));
        }
    }
    signature
}
