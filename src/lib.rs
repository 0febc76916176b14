//! Composable boolean conditions with short-circuit evaluation and root-cause diagnostics
//!
//! Preconditions, postconditions and invariants are stated as [`expr::Expression`] trees,
//! evaluated by an [`expr::Evaluator`] into [`expr::Evaluation`] trees, and explained by
//! the [`diagnostics`] module.
//!
//! ```
//! use verity::diagnostics::Formatter;
//! use verity::expr::{Evaluator, Expression, Subject};
//!
//! let retries = Subject::new("retries", 7);
//! let condition = Expression::all([retries.is_at_least(0), retries.is_at_most(5)]).named("retries in range");
//!
//! let evaluation = Evaluator::default().evaluate(&condition)?;
//! assert!(evaluation.disposition().is_false());
//!
//! let report = Formatter::new().with_root_cause_first(true).format(&evaluation);
//! assert!(report.as_str().starts_with("Root cause: retries <= 5"));
//! # Ok::<(), ohno::AppError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`expr`]: Condition trees, their evaluation, and rationales
//! - [`diagnostics`]: Root-cause chains and text rendering
//! - [`config`]: Evaluator and diagnostics settings

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod config;
pub mod diagnostics;
pub mod expr;
