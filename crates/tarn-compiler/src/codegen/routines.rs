//! The three dispatch routines.
//!
//! DFA `D{n}` is the table with role `n` (see [`DfaRole`]). Every routine
//! starts from the origin register: 0 for `matches` and `contained_in`,
//! the matcher cursor for `find`.

use tarn_bytecode::{DfaId, DfaRole, Outcome, Reg, RoutineKind};

use super::Prefilters;
use super::builder::{Label, Routine, RoutineBuilder};

fn dfa_id(role: DfaRole) -> DfaId {
    DfaId(role as u8)
}

/// Emit the enabled prefilters, each failing to `fail`.
fn prefilters(r: &mut RoutineBuilder, p: &Prefilters, fail: Label, with_max: bool) {
    if p.min_len > 0 {
        r.min_length(p.min_len, fail);
    }
    if with_max && let Some(max) = p.max_len {
        r.max_length(max, fail);
    }
    if let Some(lit) = p.literal {
        r.literal(lit, fail);
    }
}

/// Whole-input test with the exact DFA.
pub fn matches(p: &Prefilters) -> Routine {
    let exact = dfa_id(DfaRole::ForwardExact);
    let mut r = RoutineBuilder::new(RoutineKind::Matches);
    let (scan, done, reject, accept) = (
        r.fresh_label(),
        r.fresh_label(),
        r.fresh_label(),
        r.fresh_label(),
    );

    prefilters(&mut r, p, reject, true);
    r.seek(Reg::Origin)
        .begin(exact)
        .bind(scan)
        .jump_if_dead(reject)
        .jump_if_end(done)
        .step(exact)
        .jump(scan)
        .bind(done)
        .jump_if_accept(exact, accept)
        .bind(reject)
        .halt(Outcome::Reject)
        .bind(accept)
        .halt(Outcome::Accept);
    r.finish()
}

/// Leftmost-longest search: a forward pass marks the latest accepting
/// offset, then a reverse pass from there back to the origin marks the
/// earliest start.
pub fn find(p: &Prefilters) -> Routine {
    let search = dfa_id(DfaRole::ForwardSearch);
    let reverse = dfa_id(DfaRole::Reverse);
    let mut r = RoutineBuilder::new(RoutineKind::Find);
    let (forward, forward_done, none, found, backward, backward_done) = (
        r.fresh_label(),
        r.fresh_label(),
        r.fresh_label(),
        r.fresh_label(),
        r.fresh_label(),
        r.fresh_label(),
    );

    // a match may end anywhere, so only the lower bound applies
    prefilters(&mut r, p, none, false);
    r.seek(Reg::Origin)
        .begin(search)
        .mark(search)
        .bind(forward)
        .jump_if_dead(forward_done)
        .jump_if_end(forward_done)
        .step(search)
        .mark(search)
        .jump(forward)
        .bind(forward_done)
        .jump_if_marked(found)
        .bind(none)
        .halt(Outcome::Reject)
        .bind(found)
        .capture(Reg::End, none)
        .seek(Reg::End)
        .begin(reverse)
        .mark(reverse)
        .bind(backward)
        .jump_if_dead(backward_done)
        .jump_if_origin(backward_done)
        .step_back(reverse)
        .mark(reverse)
        .jump(backward)
        .bind(backward_done)
        .capture(Reg::Start, none)
        .halt(Outcome::Span);
    r.finish()
}

/// Substring test with the membership DFA; stops at the first accept.
pub fn contained_in(p: &Prefilters) -> Routine {
    let member = dfa_id(DfaRole::Membership);
    let mut r = RoutineBuilder::new(RoutineKind::ContainedIn);
    let (scan, reject, accept) = (r.fresh_label(), r.fresh_label(), r.fresh_label());

    prefilters(&mut r, p, reject, false);
    r.seek(Reg::Origin)
        .begin(member)
        .bind(scan)
        .jump_if_accept(member, accept)
        .jump_if_dead(reject)
        .jump_if_end(reject)
        .step(member)
        .jump(scan)
        .bind(reject)
        .halt(Outcome::Reject)
        .bind(accept)
        .halt(Outcome::Accept);
    r.finish()
}
