use tarn_bytecode::{DfaId, DfaRole, Module, ModuleError, RoutineKind, StepId, StringId};
use tarn_core::{ByteClasses, StateId};

use super::{ArtifactParts, StringTableBuilder, emit};
use crate::codegen::{Prefilters, generate};
use crate::dfa::Dfa;

#[test]
fn name_and_pattern_keep_their_slots() {
    let mut strings = StringTableBuilder::new("x", "x");
    assert_eq!(strings.intern("lit"), StringId::FIRST_LITERAL);
    assert_eq!(strings.intern("other"), StringId(3));
    assert_eq!(strings.intern("lit"), StringId::FIRST_LITERAL);
    assert_eq!(strings.get(StringId::NAME), Some("x"));
    assert_eq!(strings.get(StringId::PATTERN), Some("x"));
    assert_eq!(strings.get(StringId(3)), Some("other"));
    assert_eq!(strings.get(StringId(4)), None);

    let (blob, table) = strings.emit();
    assert_eq!(blob, b"xxlitother");
    let offsets: Vec<u32> = table
        .chunks(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    assert_eq!(offsets, vec![0, 1, 2, 5, 10]);
}

/// Hand-built tables for the pattern `a` over classes {not a, a}.
fn dfas_for_a() -> Vec<Dfa> {
    let d = StateId::DEAD;
    let s0 = StateId::new(0);
    let s1 = StateId::new(1);
    vec![
        Dfa::new(DfaRole::ForwardExact, s0, 2, vec![d, s1, d, d], vec![false, true]),
        Dfa::new(DfaRole::ForwardSearch, s0, 2, vec![s0, s1, d, d], vec![false, true]),
        Dfa::new(DfaRole::Reverse, s0, 2, vec![d, s1, d, d], vec![false, true]),
        Dfa::new(DfaRole::Membership, s0, 2, vec![s0, s1, s1, s1], vec![false, true]),
    ]
}

fn classes_for_a() -> ByteClasses {
    let mut map = [0u8; 256];
    map[b'a' as usize] = 1;
    ByteClasses::from_map(map).unwrap()
}

fn emit_a() -> Vec<u8> {
    let mut strings = StringTableBuilder::new("one", "a");
    let lit = strings.intern("a");
    let listing = generate(&Prefilters {
        min_len: 1,
        max_len: Some(1),
        literal: Some(lit),
    });
    emit(&ArtifactParts {
        strings: &strings,
        classes: &classes_for_a(),
        dfas: &dfas_for_a(),
        listing: &listing,
        min_len: 1,
        max_len: Some(1),
        byte_classes: true,
        literal_factoring: true,
    })
    .unwrap()
}

#[test]
fn emitted_artifact_loads() {
    let bytes = emit_a();
    assert_eq!(bytes.len() % 64, 0);

    let module = Module::load(&bytes).unwrap();
    assert_eq!(module.name(), "one");
    assert_eq!(module.pattern(), "a");
    assert_eq!(module.classes().len(), 2);
    assert_eq!(module.header().class_count, 2);
    assert_eq!(module.header().transitions_count, 16);
    assert_eq!(module.header().accepts_size, 4);

    let member = module.dfas().get(DfaId(DfaRole::Membership as u8)).unwrap();
    let s1 = StateId::new(1);
    assert_eq!(member.next(StateId::new(0), 0), StateId::new(0));
    assert_eq!(member.next(StateId::new(0), 1), s1);
    assert_eq!(member.next(s1, 0), s1);
    assert!(member.is_accepting(s1));
    assert!(!member.is_accepting(StateId::new(0)));

    let exact = module.dfas().get(DfaId(DfaRole::ForwardExact as u8)).unwrap();
    assert_eq!(exact.next(StateId::new(0), 0), StateId::DEAD);

    assert_eq!(
        module.routines().entry(RoutineKind::Find),
        Some(StepId::new(12))
    );
}

#[test]
fn checksum_covers_every_section() {
    let mut bytes = emit_a();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    assert!(matches!(
        Module::load(&bytes),
        Err(ModuleError::ChecksumMismatch { .. })
    ));
}

#[test]
fn empty_language_has_stateless_tables() {
    let strings = StringTableBuilder::new("never", "[^\\u{0}-\\u{10ffff}]");
    let dfas: Vec<Dfa> = DfaRole::ALL
        .into_iter()
        .map(|role| Dfa::new(role, StateId::DEAD, 1, vec![], vec![]))
        .collect();
    let listing = generate(&Prefilters::default());
    let bytes = emit(&ArtifactParts {
        strings: &strings,
        classes: &ByteClasses::from_map([0; 256]).unwrap(),
        dfas: &dfas,
        listing: &listing,
        min_len: 0,
        max_len: Some(0),
        byte_classes: true,
        literal_factoring: false,
    })
    .unwrap();

    let module = Module::load(&bytes).unwrap();
    assert_eq!(module.header().transitions_count, 0);
    assert_eq!(module.header().max_len(), Some(0));
    for role in DfaRole::ALL {
        let dfa = module.dfas().get(DfaId(role as u8)).unwrap();
        assert_eq!(dfa.role(), role);
        assert_eq!(dfa.state_count(), 0);
        assert!(dfa.start().is_dead());
    }
}
