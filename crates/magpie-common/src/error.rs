//! Contract-violation errors.
//!
//! The pipeline distinguishes two failure classes. Parse errors (stray `<`,
//! bad declarations, unterminated blocks) are recoverable and silent: the
//! HTML tokenizer emits recovery tokens and the CSS parsers return `None`.
//! Contract violations are programmer bugs at the API boundary and surface
//! as `Err` values with a kind code so host code can decide whether to log
//! or abort.

use thiserror::Error;

/// A violated API contract.
///
/// Returned by DOM mutation operations and the CSS math parser; never used
/// for malformed *input*, which is handled by silent recovery instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// `remove_child` was given a node that is not a child of the parent.
    #[error("node is not a child of the given parent")]
    NotAChild,

    /// `insert_before` was given a reference node that is not a child of
    /// the parent.
    #[error("reference node is not a child of the given parent")]
    BadReference,

    /// A CSS math expression nested deeper than the 32-level budget.
    #[error("math expression exceeds maximum nesting depth")]
    ExpressionTooDeep,

    /// A numeric value overflowed its domain during parsing.
    #[error("numeric value out of range")]
    NumericOverflow,
}
