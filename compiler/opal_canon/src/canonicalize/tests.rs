use pretty_assertions::assert_eq;

use opal_stamp::{FloatStamp, IntStamp};

use super::*;

fn int_param(graph: &mut ValueGraph, index: u32) -> NodeId {
    graph.add_param(index, Stamp::Int(IntStamp::full(32)))
}

fn float_param(graph: &mut ValueGraph, index: u32) -> NodeId {
    graph.add_param(index, Stamp::Float(FloatStamp::full()))
}

#[test]
fn double_negation_cancels() {
    let mut graph = ValueGraph::new();
    let x = int_param(&mut graph, 0);
    let inner = graph.add_unary(UnaryOp::Neg, x);
    let outer = graph.add_unary(UnaryOp::Neg, inner);

    assert_eq!(canonicalize(&mut graph, outer), Replacement::ReplaceWith(x));
}

#[test]
fn double_complement_cancels() {
    let mut graph = ValueGraph::new();
    let x = int_param(&mut graph, 0);
    let inner = graph.add_unary(UnaryOp::Not, x);
    let outer = graph.add_unary(UnaryOp::Not, inner);

    assert_eq!(canonicalize(&mut graph, outer), Replacement::ReplaceWith(x));
}

#[test]
fn mixed_unary_pair_stays() {
    let mut graph = ValueGraph::new();
    let x = int_param(&mut graph, 0);
    let inner = graph.add_unary(UnaryOp::Not, x);
    let outer = graph.add_unary(UnaryOp::Neg, inner);

    assert_eq!(canonicalize(&mut graph, outer), Replacement::Unchanged);
}

#[test]
fn negated_subtraction_swaps_operands() {
    let mut graph = ValueGraph::new();
    let a = int_param(&mut graph, 0);
    let b = int_param(&mut graph, 1);
    let diff = graph.add_binary(BinaryOp::Sub, a, b);
    let neg = graph.add_unary(UnaryOp::Neg, diff);

    let Replacement::ReplaceWith(swapped) = canonicalize(&mut graph, neg) else {
        panic!("negated subtraction must rewrite");
    };
    assert_eq!(
        *graph.kind(swapped),
        NodeKind::Binary {
            op: BinaryOp::Sub,
            x: b,
            y: a,
        }
    );
    // The fresh node carries a folded stamp from construction.
    assert_eq!(graph.stamp(swapped), Stamp::Int(IntStamp::full(32)));
}

#[test]
fn negated_float_subtraction_stays() {
    // NaN, signed zeros, and rounding make -(a - b) != b - a for floats.
    let mut graph = ValueGraph::new();
    let a = float_param(&mut graph, 0);
    let b = float_param(&mut graph, 1);
    let diff = graph.add_binary(BinaryOp::Sub, a, b);
    let neg = graph.add_unary(UnaryOp::Neg, diff);

    assert_eq!(canonicalize(&mut graph, neg), Replacement::Unchanged);
}

#[test]
fn negated_sign_shift_becomes_unsigned() {
    let mut graph = ValueGraph::new();
    let x = int_param(&mut graph, 0);
    let count = graph.add_constant(ConstValue::int(32, 31));
    let shr = graph.add_binary(BinaryOp::Shr, x, count);
    let neg = graph.add_unary(UnaryOp::Neg, shr);

    let Replacement::ReplaceWith(ushr) = canonicalize(&mut graph, neg) else {
        panic!("negated sign shift must rewrite");
    };
    assert_eq!(
        *graph.kind(ushr),
        NodeKind::Binary {
            op: BinaryOp::UShr,
            x,
            y: count,
        }
    );
}

#[test]
fn negated_interior_shift_stays() {
    // Only the count bits-1 isolates the sign bit; 30 does not.
    let mut graph = ValueGraph::new();
    let x = int_param(&mut graph, 0);
    let count = graph.add_constant(ConstValue::int(32, 30));
    let shr = graph.add_binary(BinaryOp::Shr, x, count);
    let neg = graph.add_unary(UnaryOp::Neg, shr);

    assert_eq!(canonicalize(&mut graph, neg), Replacement::Unchanged);
}

#[test]
fn negated_variable_shift_stays() {
    let mut graph = ValueGraph::new();
    let x = int_param(&mut graph, 0);
    let count = int_param(&mut graph, 1);
    let shr = graph.add_binary(BinaryOp::Shr, x, count);
    let neg = graph.add_unary(UnaryOp::Neg, shr);

    assert_eq!(canonicalize(&mut graph, neg), Replacement::Unchanged);
}

#[test]
fn unary_constant_folds() {
    let mut graph = ValueGraph::new();
    let seven = graph.add_constant(ConstValue::int(32, 7));
    let neg = graph.add_unary(UnaryOp::Neg, seven);

    assert_eq!(
        canonicalize(&mut graph, neg),
        Replacement::ReplaceWithConstant(ConstValue::int(32, -7))
    );
}

#[test]
fn negating_width_minimum_wraps() {
    let mut graph = ValueGraph::new();
    let min = graph.add_constant(ConstValue::int(32, i64::from(i32::MIN)));
    let neg = graph.add_unary(UnaryOp::Neg, min);

    assert_eq!(
        canonicalize(&mut graph, neg),
        Replacement::ReplaceWithConstant(ConstValue::int(32, i64::from(i32::MIN)))
    );
}

#[test]
fn binary_constant_folds() {
    let mut graph = ValueGraph::new();
    let three = graph.add_constant(ConstValue::int(32, 3));
    let four = graph.add_constant(ConstValue::int(32, 4));
    let sum = graph.add_binary(BinaryOp::Add, three, four);

    assert_eq!(
        canonicalize(&mut graph, sum),
        Replacement::ReplaceWithConstant(ConstValue::int(32, 7))
    );
}

#[test]
fn shift_count_folds_masked() {
    let mut graph = ValueGraph::new();
    let one = graph.add_constant(ConstValue::int(32, 1));
    let count = graph.add_constant(ConstValue::int(32, 33));
    let shl = graph.add_binary(BinaryOp::Shl, one, count);

    // 33 masks to 1 at 32 bits.
    assert_eq!(
        canonicalize(&mut graph, shl),
        Replacement::ReplaceWithConstant(ConstValue::int(32, 2))
    );
}

#[test]
fn constant_division_by_zero_stays() {
    let mut graph = ValueGraph::new();
    let five = graph.add_constant(ConstValue::int(32, 5));
    let zero = graph.add_constant(ConstValue::int(32, 0));
    let div = graph.add_binary(BinaryOp::Div, five, zero);

    assert_eq!(canonicalize(&mut graph, div), Replacement::Unchanged);
}

#[test]
fn right_neutral_eliminated() {
    let mut graph = ValueGraph::new();
    let x = int_param(&mut graph, 0);
    let zero = graph.add_constant(ConstValue::int(32, 0));
    let one = graph.add_constant(ConstValue::int(32, 1));

    let add = graph.add_binary(BinaryOp::Add, x, zero);
    assert_eq!(canonicalize(&mut graph, add), Replacement::ReplaceWith(x));

    let sub = graph.add_binary(BinaryOp::Sub, x, zero);
    assert_eq!(canonicalize(&mut graph, sub), Replacement::ReplaceWith(x));

    let mul = graph.add_binary(BinaryOp::Mul, x, one);
    assert_eq!(canonicalize(&mut graph, mul), Replacement::ReplaceWith(x));

    let shl = graph.add_binary(BinaryOp::Shl, x, zero);
    assert_eq!(canonicalize(&mut graph, shl), Replacement::ReplaceWith(x));
}

#[test]
fn left_neutral_needs_commutativity() {
    let mut graph = ValueGraph::new();
    let x = int_param(&mut graph, 0);
    let zero = graph.add_constant(ConstValue::int(32, 0));

    // 0 + x -> x, but 0 - x is a negation, not x.
    let add = graph.add_binary(BinaryOp::Add, zero, x);
    assert_eq!(canonicalize(&mut graph, add), Replacement::ReplaceWith(x));

    let sub = graph.add_binary(BinaryOp::Sub, zero, x);
    assert_eq!(canonicalize(&mut graph, sub), Replacement::Unchanged);
}

#[test]
fn all_ones_is_the_and_neutral() {
    let mut graph = ValueGraph::new();
    let x = int_param(&mut graph, 0);
    let ones = graph.add_constant(ConstValue::int(32, -1));
    let zero = graph.add_constant(ConstValue::int(32, 0));

    let and = graph.add_binary(BinaryOp::And, x, ones);
    assert_eq!(canonicalize(&mut graph, and), Replacement::ReplaceWith(x));

    let or = graph.add_binary(BinaryOp::Or, x, zero);
    assert_eq!(canonicalize(&mut graph, or), Replacement::ReplaceWith(x));
}

#[test]
fn float_add_neutral_is_negative_zero() {
    let mut graph = ValueGraph::new();
    let x = float_param(&mut graph, 0);
    let neg_zero = graph.add_constant(ConstValue::float(-0.0));
    let pos_zero = graph.add_constant(ConstValue::float(0.0));

    // x + (-0.0) is exact for every x; x + 0.0 rewrites -0.0 to +0.0.
    let exact = graph.add_binary(BinaryOp::Add, x, neg_zero);
    assert_eq!(canonicalize(&mut graph, exact), Replacement::ReplaceWith(x));

    let lossy = graph.add_binary(BinaryOp::Add, x, pos_zero);
    assert_eq!(canonicalize(&mut graph, lossy), Replacement::Unchanged);
}

#[test]
fn float_sub_neutral_is_positive_zero() {
    let mut graph = ValueGraph::new();
    let x = float_param(&mut graph, 0);
    let neg_zero = graph.add_constant(ConstValue::float(-0.0));
    let pos_zero = graph.add_constant(ConstValue::float(0.0));

    let exact = graph.add_binary(BinaryOp::Sub, x, pos_zero);
    assert_eq!(canonicalize(&mut graph, exact), Replacement::ReplaceWith(x));

    // x - (-0.0) rewrites -0.0 to +0.0.
    let lossy = graph.add_binary(BinaryOp::Sub, x, neg_zero);
    assert_eq!(canonicalize(&mut graph, lossy), Replacement::Unchanged);
}

#[test]
fn float_mul_neutral_is_one() {
    let mut graph = ValueGraph::new();
    let x = float_param(&mut graph, 0);
    let one = graph.add_constant(ConstValue::float(1.0));

    let mul = graph.add_binary(BinaryOp::Mul, x, one);
    assert_eq!(canonicalize(&mut graph, mul), Replacement::ReplaceWith(x));

    let div = graph.add_binary(BinaryOp::Div, x, one);
    assert_eq!(canonicalize(&mut graph, div), Replacement::ReplaceWith(x));
}

#[test]
fn leaves_are_unchanged() {
    let mut graph = ValueGraph::new();
    let c = graph.add_constant(ConstValue::int(32, 7));
    let p = int_param(&mut graph, 0);

    assert_eq!(canonicalize(&mut graph, c), Replacement::Unchanged);
    assert_eq!(canonicalize(&mut graph, p), Replacement::Unchanged);
}

#[test]
fn undefined_float_operation_stays() {
    let mut graph = ValueGraph::new();
    let x = float_param(&mut graph, 0);
    let not = graph.add_unary(UnaryOp::Not, x);

    assert_eq!(canonicalize(&mut graph, not), Replacement::Unchanged);
}

#[test]
fn object_domain_stays() {
    use opal_stamp::ObjectStamp;

    let mut graph = ValueGraph::new();
    let x = graph.add_param(0, Stamp::Object(ObjectStamp::full()));
    let neg = graph.add_unary(UnaryOp::Neg, x);

    assert_eq!(canonicalize(&mut graph, neg), Replacement::Unchanged);
}

#[test]
fn rewrites_reach_a_fixed_point() {
    let mut graph = ValueGraph::new();
    let a = int_param(&mut graph, 0);
    let b = int_param(&mut graph, 1);
    let diff = graph.add_binary(BinaryOp::Sub, a, b);
    let neg = graph.add_unary(UnaryOp::Neg, diff);

    let Replacement::ReplaceWith(swapped) = canonicalize(&mut graph, neg) else {
        panic!("negated subtraction must rewrite");
    };
    assert_eq!(canonicalize(&mut graph, swapped), Replacement::Unchanged);

    let x = int_param(&mut graph, 2);
    let count = graph.add_constant(ConstValue::int(32, 31));
    let shr = graph.add_binary(BinaryOp::Shr, x, count);
    let shifted = graph.add_unary(UnaryOp::Neg, shr);

    let Replacement::ReplaceWith(ushr) = canonicalize(&mut graph, shifted) else {
        panic!("negated sign shift must rewrite");
    };
    assert_eq!(canonicalize(&mut graph, ushr), Replacement::Unchanged);
}

#[test]
fn rewritten_shapes_are_simplified_in_one_step() {
    // -(3 - 4) goes straight to 1; no transient 4 - 3 node survives.
    let mut graph = ValueGraph::new();
    let three = graph.add_constant(ConstValue::int(32, 3));
    let four = graph.add_constant(ConstValue::int(32, 4));
    let diff = graph.add_binary(BinaryOp::Sub, three, four);
    let neg = graph.add_unary(UnaryOp::Neg, diff);
    assert_eq!(
        canonicalize(&mut graph, neg),
        Replacement::ReplaceWithConstant(ConstValue::int(32, 1))
    );

    // -(0 - x) collapses to x through the swapped shape's neutral rule.
    let mut graph = ValueGraph::new();
    let x = int_param(&mut graph, 0);
    let zero = graph.add_constant(ConstValue::int(32, 0));
    let diff = graph.add_binary(BinaryOp::Sub, zero, x);
    let neg = graph.add_unary(UnaryOp::Neg, diff);
    assert_eq!(canonicalize(&mut graph, neg), Replacement::ReplaceWith(x));

    // -((-1) >> 31) evaluates the unsigned reinterpretation directly.
    let mut graph = ValueGraph::new();
    let ones = graph.add_constant(ConstValue::int(32, -1));
    let count = graph.add_constant(ConstValue::int(32, 31));
    let shr = graph.add_binary(BinaryOp::Shr, ones, count);
    let neg = graph.add_unary(UnaryOp::Neg, shr);
    assert_eq!(
        canonicalize(&mut graph, neg),
        Replacement::ReplaceWithConstant(ConstValue::int(32, 1))
    );
}

#[test]
fn constant_fold_wins_over_structure() {
    // The operand of the outer negation is itself a negation of a
    // constant; folding the inner node first collapses the chain, but
    // canonicalizing the outer node directly takes the involution.
    let mut graph = ValueGraph::new();
    let five = graph.add_constant(ConstValue::int(32, 5));
    let inner = graph.add_unary(UnaryOp::Neg, five);
    let outer = graph.add_unary(UnaryOp::Neg, inner);

    assert_eq!(
        canonicalize(&mut graph, inner),
        Replacement::ReplaceWithConstant(ConstValue::int(32, -5))
    );
    assert_eq!(
        canonicalize(&mut graph, outer),
        Replacement::ReplaceWith(five)
    );
}
