use opal_stamp::{IntStamp, Stamp};
use pretty_assertions::assert_eq;

use super::*;

fn int32(lo: i64, hi: i64) -> Stamp {
    Stamp::Int(IntStamp::range(32, lo, hi))
}

#[test]
fn constants_are_interned() {
    let mut g = ValueGraph::new();
    let a = g.add_constant(ConstValue::int(32, 7));
    let b = g.add_constant(ConstValue::int(32, 7));
    let c = g.add_constant(ConstValue::int(32, 8));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(g.len(), 2);
}

#[test]
fn signed_zero_constants_stay_distinct() {
    let mut g = ValueGraph::new();
    let pos = g.add_constant(ConstValue::float(0.0));
    let neg = g.add_constant(ConstValue::float(-0.0));
    assert_ne!(pos, neg);
}

#[test]
fn constant_stamp_is_singleton() {
    let mut g = ValueGraph::new();
    let c = g.add_constant(ConstValue::int(32, 5));
    assert_eq!(g.stamp(c).as_constant(), Some(ConstValue::int(32, 5)));
}

#[test]
fn unary_stamp_is_folded_at_construction() {
    let mut g = ValueGraph::new();
    let p = g.add_param(0, int32(1, 5));
    let n = g.add_unary(UnaryOp::Neg, p);
    assert_eq!(g.stamp(n), int32(-5, -1));
}

#[test]
fn binary_stamp_is_folded_at_construction() {
    let mut g = ValueGraph::new();
    let p = g.add_param(0, int32(1, 5));
    let q = g.add_param(1, int32(10, 20));
    let s = g.add_binary(BinaryOp::Add, p, q);
    assert_eq!(g.stamp(s), int32(11, 25));
}

#[test]
fn uses_are_tracked_per_edge() {
    let mut g = ValueGraph::new();
    let p = g.add_param(0, int32(0, 10));
    let n = g.add_unary(UnaryOp::Neg, p);
    let s = g.add_binary(BinaryOp::Add, p, p);
    assert_eq!(g.uses(p), &[n, s, s]);
    assert!(g.is_dead(n));
    assert!(g.is_dead(s));
    assert!(!g.is_dead(p));
}

#[test]
fn replace_uses_rewires_and_refreshes_stamps() {
    let mut g = ValueGraph::new();
    let wide = g.add_param(0, int32(-100, 100));
    let narrow = g.add_param(1, int32(1, 5));
    let n = g.add_unary(UnaryOp::Neg, wide);
    assert_eq!(g.stamp(n), int32(-100, 100));

    g.replace_uses(wide, narrow);
    assert!(g.is_dead(wide));
    assert_eq!(g.uses(narrow), &[n]);
    assert_eq!(*g.kind(n), NodeKind::Unary { op: UnaryOp::Neg, value: narrow });
    // The consumer's cached stamp follows the rewiring.
    assert_eq!(g.stamp(n), int32(-5, -1));
}

#[test]
fn replace_uses_handles_double_edges() {
    let mut g = ValueGraph::new();
    let a = g.add_param(0, int32(1, 2));
    let b = g.add_param(1, int32(3, 4));
    let s = g.add_binary(BinaryOp::Add, a, a);
    g.replace_uses(a, b);
    assert_eq!(*g.kind(s), NodeKind::Binary { op: BinaryOp::Add, x: b, y: b });
    assert_eq!(g.stamp(s), int32(6, 8));
}

#[test]
fn recompute_stamp_reports_change() {
    let mut g = ValueGraph::new();
    let p = g.add_param(0, int32(1, 5));
    let n = g.add_unary(UnaryOp::Neg, p);
    // Nothing changed, so recomputation is a no-op.
    assert!(!g.recompute_stamp(n));
    assert_eq!(g.computed_stamp(n), g.stamp(n));
}

#[test]
fn positions_are_optional_metadata() {
    let mut g = ValueGraph::new();
    let p = g.add_param(0, int32(0, 1));
    assert_eq!(g.position(p), None);
    let handle = opal_diagnostic::PositionHandle::new(42);
    g.set_position(p, handle);
    assert_eq!(g.position(p), Some(handle));
}
