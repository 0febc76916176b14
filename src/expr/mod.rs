//! Condition trees and their evaluation
//!
//! Callers build an [`Expression`] tree out of terminal conditions combined with negation,
//! conjunction and disjunction. An [`Evaluator`] walks the tree and produces an
//! [`Evaluation`] of the same shape in which every node carries a [`Disposition`]:
//! `True`, `False`, or `Skipped` when short-circuiting meant the node was never looked at.
//!
//! # Implementation Model
//!
//! - Terminals wrap a predicate over state captured at construction time together with an
//!   [`Explainer`] that turns the outcome into a [`Rationale`] (expected, actual, hint).
//!   Rationales are only produced when someone asks for them.
//! - The evaluator threads an [`EvaluationContext`] by value. A compound marks the context
//!   complete for the siblings that follow its deciding child, which is what produces
//!   `Skipped` nodes without running their predicates.
//! - Nesting compounds or negations beyond the evaluator's maximum depth is a structural error.
//!
//! [`Subject`] offers ready-made terminal conditions over a named value.

mod disposition;
mod evaluation;
mod evaluator;
mod expression;
mod rationale;
mod subject;

pub use disposition::Disposition;
pub use evaluation::{EMPTY, Evaluation, Junction};
pub use evaluator::{DEFAULT_MAX_DEPTH, EvaluationContext, Evaluator};
pub use expression::{ABSENT, Expression, Predicate, UNNAMED};
pub use rationale::{Explainer, Rationale};
pub use subject::Subject;
