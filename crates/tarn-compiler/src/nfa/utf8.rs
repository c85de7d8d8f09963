//! Lowering scalar-value ranges to UTF-8 byte-range sequences.
//!
//! A range of chars becomes a set of sequences; each sequence is 1-4 byte
//! ranges that match exactly the encodings of a sub-range. The surrogate
//! gap is never encoded.

const MAX_ONE_BYTE: u32 = 0x7F;
const MAX_TWO_BYTE: u32 = 0x7FF;
const MAX_THREE_BYTE: u32 = 0xFFFF;
const SURROGATE_LO: u32 = 0xD800;
const SURROGATE_HI: u32 = 0xDFFF;

/// Inclusive byte range.
pub type ByteRange = (u8, u8);

/// Byte-range sequences matching exactly the UTF-8 encodings of `lo..=hi`.
pub fn utf8_sequences(lo: char, hi: char) -> Vec<Vec<ByteRange>> {
    let (lo, hi) = (lo as u32, hi as u32);
    let mut out = Vec::new();
    if lo < SURROGATE_LO {
        split(lo, hi.min(SURROGATE_LO - 1), &mut out);
    }
    if hi > SURROGATE_HI {
        split(lo.max(SURROGATE_HI + 1), hi, &mut out);
    }
    out
}

fn split(lo: u32, hi: u32, out: &mut Vec<Vec<ByteRange>>) {
    if lo > hi {
        return;
    }

    // Both ends must encode to the same length.
    for boundary in [MAX_ONE_BYTE, MAX_TWO_BYTE, MAX_THREE_BYTE] {
        if lo <= boundary && boundary < hi {
            split(lo, boundary, out);
            split(boundary + 1, hi, out);
            return;
        }
    }

    if hi <= MAX_ONE_BYTE {
        out.push(vec![(lo as u8, hi as u8)]);
        return;
    }

    // Split until every continuation byte below the first differing one
    // spans its full 0x80..=0xBF range.
    for i in 1..encoded_len(lo) {
        let mask = (1u32 << (6 * i)) - 1;
        if lo & !mask != hi & !mask {
            if lo & mask != 0 {
                split(lo, lo | mask, out);
                split((lo | mask) + 1, hi, out);
                return;
            }
            if hi & mask != mask {
                split(lo, (hi & !mask) - 1, out);
                split(hi & !mask, hi, out);
                return;
            }
        }
    }

    let a = encode(lo);
    let b = encode(hi);
    out.push(a.iter().zip(b.iter()).map(|(&x, &y)| (x, y)).collect());
}

fn encoded_len(v: u32) -> usize {
    match v {
        0..=MAX_ONE_BYTE => 1,
        0..=MAX_TWO_BYTE => 2,
        0..=MAX_THREE_BYTE => 3,
        _ => 4,
    }
}

fn encode(v: u32) -> Vec<u8> {
    let mut buf = [0u8; 4];
    // callers only pass scalar values
    char::from_u32(v).map_or_else(Vec::new, |c| c.encode_utf8(&mut buf).as_bytes().to_vec())
}
