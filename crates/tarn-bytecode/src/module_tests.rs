use tarn_core::{Colors, StateId};

use super::dump::dump;
use super::header::Header;
use super::instructions::{
    DfaId, DfaRole, Instruction, Outcome, Reg, RoutineKind, StepId, StringId,
};
use super::module::{ByteStorage, Module, ModuleError};

/// Hand-assembled artifact for the pattern `a`: one ForwardExact DFA over
/// three classes and a `matches` routine.
fn tiny_artifact() -> Vec<u8> {
    let strings = ["tiny", "a"];
    let blob: String = strings.concat();

    let mut map = [2u8; 256];
    for b in 0..0x61 {
        map[b] = 0;
    }
    map[0x61] = 1;

    // s0 -a-> s1, s1 accepts
    let dead = StateId::DEAD.get();
    let transitions: [u16; 6] = [dead, 1, dead, dead, dead, dead];
    let accepts = [0b10u8];

    let steps = [
        Instruction::Seek { reg: Reg::Origin },
        Instruction::Begin { dfa: DfaId(0) },
        Instruction::JumpIfDead { target: StepId(7) },
        Instruction::JumpIfEnd { target: StepId(6) },
        Instruction::Step { dfa: DfaId(0) },
        Instruction::Jump { target: StepId(2) },
        Instruction::JumpIfAccept { dfa: DfaId(0), target: StepId(8) },
        Instruction::Halt { outcome: Outcome::Reject },
        Instruction::Halt { outcome: Outcome::Accept },
    ];

    let mut header = Header {
        str_blob_size: blob.len() as u32,
        str_table_count: strings.len() as u16,
        class_count: 3,
        dfa_count: 1,
        transitions_count: transitions.len() as u32,
        accepts_size: accepts.len() as u32,
        routine_count: 1,
        steps_count: steps.len() as u16,
        min_len: 1,
        max_len: 1,
        ..Default::default()
    };
    let o = header.compute_offsets();
    header.total_size = o.end;

    let mut out = vec![0u8; o.end as usize];
    let put = |out: &mut Vec<u8>, at: u32, bytes: &[u8]| {
        out[at as usize..at as usize + bytes.len()].copy_from_slice(bytes);
    };

    put(&mut out, o.str_blob, blob.as_bytes());
    let mut offset = 0u32;
    put(&mut out, o.str_table, &offset.to_le_bytes());
    for (i, s) in strings.iter().enumerate() {
        offset += s.len() as u32;
        put(&mut out, o.str_table + (i as u32 + 1) * 4, &offset.to_le_bytes());
    }
    put(&mut out, o.class_map, &map);
    put(&mut out, o.dfa_directory, &[DfaRole::ForwardExact as u8, 0, 2, 0, 0, 0, 0, 0]);
    for (i, t) in transitions.iter().enumerate() {
        put(&mut out, o.transitions + i as u32 * 2, &t.to_le_bytes());
    }
    put(&mut out, o.accepts, &accepts);
    put(&mut out, o.routines, &[RoutineKind::Matches as u8, 0, 0, 0]);
    for (i, s) in steps.iter().enumerate() {
        put(&mut out, o.steps + i as u32 * 8, &s.to_bytes());
    }

    header.checksum = crc32fast::hash(&out[64..]);
    out[..64].copy_from_slice(&header.to_bytes());
    out
}

/// Rewrite the checksum after a deliberate edit past the header.
fn reseal(bytes: &mut [u8]) {
    let sum = crc32fast::hash(&bytes[64..]);
    bytes[8..12].copy_from_slice(&sum.to_le_bytes());
}

#[test]
fn byte_storage_copy_from_slice() {
    let data = [1u8, 2, 3, 4, 5];
    let storage = ByteStorage::copy_from_slice(&data);

    assert_eq!(&*storage, &data[..]);
    assert_eq!(storage.len(), 5);
    assert_eq!(storage[2], 3);
}

#[test]
fn module_error_display() {
    assert_eq!(ModuleError::InvalidMagic.to_string(), "invalid magic: expected TARN");
    assert!(ModuleError::UnsupportedVersion(99).to_string().contains("99"));
    assert!(ModuleError::FileTooSmall(32).to_string().contains("32"));

    let err = ModuleError::SizeMismatch {
        header: 100,
        actual: 50,
    };
    assert!(err.to_string().contains("100"));
    assert!(err.to_string().contains("50"));
}

#[test]
fn loads_tiny_artifact() {
    let module = Module::from_bytes(tiny_artifact()).unwrap();

    assert_eq!(module.name(), "tiny");
    assert_eq!(module.pattern(), "a");
    assert_eq!(module.strings().get(StringId::PATTERN), "a");
    assert_eq!(module.classes().len(), 3);
    assert_eq!(module.classes().get(b'a'), 1);
    assert_eq!(module.header().max_len(), Some(1));

    let dfa = module.dfas().get(DfaId(0)).unwrap();
    assert_eq!(dfa.role(), DfaRole::ForwardExact);
    assert_eq!(dfa.start(), StateId(0));
    assert_eq!(dfa.next(StateId(0), 1), StateId(1));
    assert!(dfa.next(StateId(0), 0).is_dead());
    assert!(dfa.is_accepting(StateId(1)));
    assert!(!dfa.is_accepting(StateId(0)));
    assert!(!dfa.is_accepting(StateId::DEAD));

    assert_eq!(module.routines().entry(RoutineKind::Matches), Some(StepId(0)));
    assert_eq!(module.routines().entry(RoutineKind::Find), None);
    assert_eq!(
        module.decode_step(StepId(8)),
        Some(Instruction::Halt { outcome: Outcome::Accept })
    );
    assert_eq!(module.decode_step(StepId(9)), None);
}

#[test]
fn rejects_short_input() {
    assert_eq!(
        Module::load(&[0u8; 10]).unwrap_err(),
        ModuleError::FileTooSmall(10)
    );
}

#[test]
fn rejects_bad_magic_and_version() {
    let mut bytes = tiny_artifact();
    bytes[0] = b'X';
    assert_eq!(Module::load(&bytes).unwrap_err(), ModuleError::InvalidMagic);

    let mut bytes = tiny_artifact();
    bytes[4] = 7;
    assert_eq!(
        Module::load(&bytes).unwrap_err(),
        ModuleError::UnsupportedVersion(7)
    );
}

#[test]
fn rejects_truncation() {
    let mut bytes = tiny_artifact();
    bytes.pop();
    assert!(matches!(
        Module::load(&bytes).unwrap_err(),
        ModuleError::SizeMismatch { .. }
    ));
}

#[test]
fn rejects_flipped_byte() {
    let mut bytes = tiny_artifact();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    assert!(matches!(
        Module::load(&bytes).unwrap_err(),
        ModuleError::ChecksumMismatch { .. }
    ));
}

#[test]
fn rejects_bad_class_map() {
    let mut bytes = tiny_artifact();
    let class_map = Module::load(&bytes).unwrap().offsets().class_map as usize;
    bytes[class_map] = 5;
    reseal(&mut bytes);
    assert_eq!(
        Module::load(&bytes).unwrap_err(),
        ModuleError::InvalidClassMap(3)
    );
}

#[test]
fn rejects_bad_dfa_role() {
    let mut bytes = tiny_artifact();
    let directory = Module::load(&bytes).unwrap().offsets().dfa_directory as usize;
    bytes[directory] = 9;
    reseal(&mut bytes);
    assert_eq!(
        Module::load(&bytes).unwrap_err(),
        ModuleError::InvalidDfaDirectory("unknown role")
    );
}

#[test]
fn rejects_routine_past_code() {
    let mut bytes = tiny_artifact();
    let routines = Module::load(&bytes).unwrap().offsets().routines as usize;
    bytes[routines + 2] = 200;
    reseal(&mut bytes);
    assert_eq!(
        Module::load(&bytes).unwrap_err(),
        ModuleError::InvalidRoutines("entry step out of range")
    );
}

#[test]
fn dump_tiny_artifact() {
    let module = Module::from_bytes(tiny_artifact()).unwrap();
    insta::assert_snapshot!(dump(&module, Colors::OFF), @r#"
    [matcher]
    name = tiny
    pattern = a
    length = 1..=1
    flags = []

    [strings]
    S0 "tiny"
    S1 "a"

    [classes] count=3
    C0 00-60
    C1 61
    C2 62-ff

    [dfa D0 forward_exact] start=s0 states=2
     s0     C1→s1
    *s1     (dead)

    [code]
    matches:
      0  seek origin
      1  begin D0
      2  jump_if_dead 7
      3  jump_if_end 6
      4  step D0
      5  jump 2
      6  jump_if_accept D0 8
      7  halt reject
      8  halt accept
    "#);
}
