//! Dispatch instructions.
//!
//! Every instruction is one 8-byte step:
//!
//! ```text
//! [opcode u8][a u8][b u16][c u32]
//! ```
//!
//! `a` carries a register, DFA id or outcome; `b` a jump target; `c` a
//! length bound or string id. Unused fields are zero.

/// Index of an 8-byte step in the steps section.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(transparent)]
pub struct StepId(pub u16);

impl StepId {
    pub fn new(n: u16) -> Self {
        Self(n)
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

/// Index into the string table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct StringId(pub u16);

impl StringId {
    /// Generated matcher name.
    pub const NAME: Self = Self(0);
    /// Source pattern text.
    pub const PATTERN: Self = Self(1);
    /// First literal prefilter string.
    pub const FIRST_LITERAL: Self = Self(2);

    pub fn get(self) -> u16 {
        self.0
    }
}

/// Index into the DFA directory.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct DfaId(pub u8);

impl DfaId {
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a DFA is used for. The discriminant is its directory role byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum DfaRole {
    /// Anchored at both ends; decides `matches`.
    ForwardExact = 0,
    /// Unanchored leftmost-longest; finds the end of the next match.
    ForwardSearch = 1,
    /// Reversed language, anchored at the match end; finds the start.
    Reverse = 2,
    /// Unanchored with absorbing accept; decides `contained_in`.
    Membership = 3,
}

impl DfaRole {
    pub const ALL: [Self; 4] = [
        Self::ForwardExact,
        Self::ForwardSearch,
        Self::Reverse,
        Self::Membership,
    ];

    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::ForwardExact,
            1 => Self::ForwardSearch,
            2 => Self::Reverse,
            3 => Self::Membership,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ForwardExact => "forward_exact",
            Self::ForwardSearch => "forward_search",
            Self::Reverse => "reverse",
            Self::Membership => "membership",
        }
    }
}

/// Public entry points of the dispatch routine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum RoutineKind {
    Matches = 0,
    Find = 1,
    ContainedIn = 2,
}

impl RoutineKind {
    pub const ALL: [Self; 3] = [Self::Matches, Self::Find, Self::ContainedIn];

    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Matches,
            1 => Self::Find,
            2 => Self::ContainedIn,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Matches => "matches",
            Self::Find => "find",
            Self::ContainedIn => "contained_in",
        }
    }
}

/// Position registers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Reg {
    /// Where the scan began (the matcher cursor).
    Origin = 0,
    /// Start of the match being reported.
    Start = 1,
    /// End of the match being reported.
    End = 2,
}

impl Reg {
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Origin,
            1 => Self::Start,
            2 => Self::End,
            _ => return None,
        })
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Result reported by `Halt`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Outcome {
    Reject = 0,
    Accept = 1,
    /// Accept and report `start..end`.
    Span = 2,
}

impl Outcome {
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Reject,
            1 => Self::Accept,
            2 => Self::Span,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Accept => "accept",
            Self::Span => "span",
        }
    }
}

/// Opcode byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Opcode {
    MinLength = 0x01,
    MaxLength = 0x02,
    Literal = 0x03,
    Seek = 0x10,
    Begin = 0x11,
    Mark = 0x12,
    Step = 0x13,
    StepBack = 0x14,
    JumpIfEnd = 0x20,
    JumpIfOrigin = 0x21,
    JumpIfDead = 0x22,
    JumpIfAccept = 0x23,
    JumpIfMarked = 0x24,
    Capture = 0x30,
    Jump = 0x31,
    Halt = 0x3F,
}

impl Opcode {
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0x01 => Self::MinLength,
            0x02 => Self::MaxLength,
            0x03 => Self::Literal,
            0x10 => Self::Seek,
            0x11 => Self::Begin,
            0x12 => Self::Mark,
            0x13 => Self::Step,
            0x14 => Self::StepBack,
            0x20 => Self::JumpIfEnd,
            0x21 => Self::JumpIfOrigin,
            0x22 => Self::JumpIfDead,
            0x23 => Self::JumpIfAccept,
            0x24 => Self::JumpIfMarked,
            0x30 => Self::Capture,
            0x31 => Self::Jump,
            0x3F => Self::Halt,
            _ => return None,
        })
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::MinLength => "min_len",
            Self::MaxLength => "max_len",
            Self::Literal => "literal",
            Self::Seek => "seek",
            Self::Begin => "begin",
            Self::Mark => "mark",
            Self::Step => "step",
            Self::StepBack => "step_back",
            Self::JumpIfEnd => "jump_if_end",
            Self::JumpIfOrigin => "jump_if_origin",
            Self::JumpIfDead => "jump_if_dead",
            Self::JumpIfAccept => "jump_if_accept",
            Self::JumpIfMarked => "jump_if_marked",
            Self::Capture => "capture",
            Self::Jump => "jump",
            Self::Halt => "halt",
        }
    }
}

/// Decoded instruction.
///
/// Prefilters (`MinLength`, `MaxLength`, `Literal`) test the input slice
/// from the origin register to the end and jump to `fail` when the test
/// rules out a match.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Instruction {
    MinLength { min: u32, fail: StepId },
    MaxLength { max: u32, fail: StepId },
    Literal { lit: StringId, fail: StepId },
    /// Move the cursor to a register's position.
    Seek { reg: Reg },
    /// Select a DFA, enter its start state and clear the mark.
    Begin { dfa: DfaId },
    /// Record the cursor if the current state accepts.
    Mark { dfa: DfaId },
    /// Consume the byte at the cursor and advance.
    Step { dfa: DfaId },
    /// Retreat and consume the byte before the cursor.
    StepBack { dfa: DfaId },
    JumpIfEnd { target: StepId },
    JumpIfOrigin { target: StepId },
    JumpIfDead { target: StepId },
    JumpIfAccept { dfa: DfaId, target: StepId },
    JumpIfMarked { target: StepId },
    /// Copy the mark into a register, or jump to `fail` if nothing is marked.
    Capture { reg: Reg, fail: StepId },
    Jump { target: StepId },
    Halt { outcome: Outcome },
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::MinLength { .. } => Opcode::MinLength,
            Self::MaxLength { .. } => Opcode::MaxLength,
            Self::Literal { .. } => Opcode::Literal,
            Self::Seek { .. } => Opcode::Seek,
            Self::Begin { .. } => Opcode::Begin,
            Self::Mark { .. } => Opcode::Mark,
            Self::Step { .. } => Opcode::Step,
            Self::StepBack { .. } => Opcode::StepBack,
            Self::JumpIfEnd { .. } => Opcode::JumpIfEnd,
            Self::JumpIfOrigin { .. } => Opcode::JumpIfOrigin,
            Self::JumpIfDead { .. } => Opcode::JumpIfDead,
            Self::JumpIfAccept { .. } => Opcode::JumpIfAccept,
            Self::JumpIfMarked { .. } => Opcode::JumpIfMarked,
            Self::Capture { .. } => Opcode::Capture,
            Self::Jump { .. } => Opcode::Jump,
            Self::Halt { .. } => Opcode::Halt,
        }
    }

    /// Every step this instruction may transfer control to, besides the next one.
    pub fn target(&self) -> Option<StepId> {
        match *self {
            Self::MinLength { fail, .. }
            | Self::MaxLength { fail, .. }
            | Self::Literal { fail, .. }
            | Self::Capture { fail, .. } => Some(fail),
            Self::JumpIfEnd { target }
            | Self::JumpIfOrigin { target }
            | Self::JumpIfDead { target }
            | Self::JumpIfAccept { target, .. }
            | Self::JumpIfMarked { target }
            | Self::Jump { target } => Some(target),
            _ => None,
        }
    }

    /// DFA referenced by this instruction.
    pub fn dfa(&self) -> Option<DfaId> {
        match *self {
            Self::Begin { dfa }
            | Self::Mark { dfa }
            | Self::Step { dfa }
            | Self::StepBack { dfa }
            | Self::JumpIfAccept { dfa, .. } => Some(dfa),
            _ => None,
        }
    }

    /// True if control never falls through to the next step.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Jump { .. } | Self::Halt { .. })
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        let (a, b, c): (u8, u16, u32) = match *self {
            Self::MinLength { min, fail } => (0, fail.0, min),
            Self::MaxLength { max, fail } => (0, fail.0, max),
            Self::Literal { lit, fail } => (0, fail.0, lit.0 as u32),
            Self::Seek { reg } => (reg as u8, 0, 0),
            Self::Begin { dfa } | Self::Mark { dfa } | Self::Step { dfa } | Self::StepBack { dfa } => {
                (dfa.0, 0, 0)
            }
            Self::JumpIfEnd { target }
            | Self::JumpIfOrigin { target }
            | Self::JumpIfDead { target }
            | Self::JumpIfMarked { target }
            | Self::Jump { target } => (0, target.0, 0),
            Self::JumpIfAccept { dfa, target } => (dfa.0, target.0, 0),
            Self::Capture { reg, fail } => (reg as u8, fail.0, 0),
            Self::Halt { outcome } => (outcome as u8, 0, 0),
        };

        let mut bytes = [0u8; 8];
        bytes[0] = self.opcode() as u8;
        bytes[1] = a;
        bytes[2..4].copy_from_slice(&b.to_le_bytes());
        bytes[4..8].copy_from_slice(&c.to_le_bytes());
        bytes
    }

    /// Decode one step. `None` for unknown opcodes or operand values.
    pub fn from_bytes(bytes: [u8; 8]) -> Option<Self> {
        let opcode = Opcode::from_u8(bytes[0])?;
        let a = bytes[1];
        let b = StepId(u16::from_le_bytes([bytes[2], bytes[3]]));
        let c = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        Some(match opcode {
            Opcode::MinLength => Self::MinLength { min: c, fail: b },
            Opcode::MaxLength => Self::MaxLength { max: c, fail: b },
            Opcode::Literal => Self::Literal {
                lit: StringId(u16::try_from(c).ok()?),
                fail: b,
            },
            Opcode::Seek => Self::Seek {
                reg: Reg::from_u8(a)?,
            },
            Opcode::Begin => Self::Begin { dfa: DfaId(a) },
            Opcode::Mark => Self::Mark { dfa: DfaId(a) },
            Opcode::Step => Self::Step { dfa: DfaId(a) },
            Opcode::StepBack => Self::StepBack { dfa: DfaId(a) },
            Opcode::JumpIfEnd => Self::JumpIfEnd { target: b },
            Opcode::JumpIfOrigin => Self::JumpIfOrigin { target: b },
            Opcode::JumpIfDead => Self::JumpIfDead { target: b },
            Opcode::JumpIfAccept => Self::JumpIfAccept {
                dfa: DfaId(a),
                target: b,
            },
            Opcode::JumpIfMarked => Self::JumpIfMarked { target: b },
            Opcode::Capture => Self::Capture {
                reg: Reg::from_u8(a)?,
                fail: b,
            },
            Opcode::Jump => Self::Jump { target: b },
            Opcode::Halt => Self::Halt {
                outcome: Outcome::from_u8(a)?,
            },
        })
    }
}
