//! Explaining why an evaluation failed
//!
//! [`Cause`] and [`RootCauseChain`] trace a failed [`Evaluation`](crate::expr::Evaluation) down
//! to the most specific condition responsible for it. Chain building runs while a failure is
//! already being reported, so it never fails itself: cycles and overly long chains end the
//! chain early and are recorded in its [`ChainTermination`].
//!
//! [`Formatter`] renders an evaluation tree as indented text, optionally preceded by a
//! "Root cause:" block so the offending condition is visible without scanning the whole tree.

mod cause;
mod formatter;

pub use cause::{Cause, ChainTermination, DEFAULT_MAX_CAUSE_DEPTH, RootCauseChain};
pub use formatter::{FormattedEvaluation, Formatter};
