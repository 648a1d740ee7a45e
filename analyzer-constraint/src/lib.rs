//! Structured seat constraints and their translation into the dealer
//! predicate language.

mod ast;
mod compile;
mod constraint;

pub use ast::{BinaryOp, Expr, Function, Shape, ShapePattern, ShapeSpec, UnaryOp};
pub use compile::{compile, CompiledPredicate, Definition};
pub use constraint::{
    InvalidRangeError, Range, SeatConstraint, ShapePreset, MAX_HCP, MAX_SUIT_LENGTH,
};
