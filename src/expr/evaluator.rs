//! Short-circuiting, skip-aware evaluation of expression trees
//!
//! Compounds visit their children in order. Once a conjunction sees a `False` child (or a
//! disjunction a `True` one) the remaining siblings are still visited, but under a completed
//! context that marks them `Skipped` without invoking their predicates. The resulting
//! [`Evaluation`] therefore always has the same shape as the expression.

use super::{Disposition, Evaluation, Expression, Junction};
use crate::Result;
use crate::config::EvaluatorConfig;
use ohno::app_err;
use std::sync::Arc;

const LOG_TARGET: &str = "evaluator";

/// Default limit on nesting of compounds and negations.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Per-call traversal state. Every descent produces a new value; nothing is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationContext {
    depth: usize,
    is_complete: bool,
}

impl EvaluationContext {
    #[must_use]
    pub const fn new(depth: usize, is_complete: bool) -> Self {
        Self { depth, is_complete }
    }

    #[must_use]
    pub const fn depth(self) -> usize {
        self.depth
    }

    /// Whether an enclosing compound has already been decided.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.is_complete
    }

    const fn descend(self) -> Self {
        Self::new(self.depth + 1, self.is_complete)
    }

    const fn completed(self) -> Self {
        Self::new(self.depth, true)
    }
}

/// Evaluates expression trees, refusing to nest compounds and negations deeper than `max_depth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    max_depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Evaluator {
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    #[must_use]
    pub const fn from_config(config: &EvaluatorConfig) -> Self {
        Self::new(config.max_depth)
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluate an expression tree.
    ///
    /// # Errors
    ///
    /// Returns an error if compounds and negations are nested deeper than the configured maximum depth.
    /// This signals a malformed tree, not a failed condition.
    pub fn evaluate(&self, expression: &Expression) -> Result<Evaluation> {
        log::debug!(target: LOG_TARGET, "Evaluating '{}'", expression.name());
        let evaluation = self.evaluate_node(expression, EvaluationContext::default())?;
        log::debug!(target: LOG_TARGET, "Evaluated '{}' as {}", evaluation.name(), evaluation.disposition());
        Ok(evaluation)
    }

    /// Like [`Evaluator::evaluate`], producing [`Evaluation::Empty`] when there is no expression.
    ///
    /// # Errors
    ///
    /// Returns an error if compounds and negations are nested deeper than the configured maximum depth.
    pub fn evaluate_optional(&self, expression: Option<&Expression>) -> Result<Evaluation> {
        expression.map_or(Ok(Evaluation::Empty), |expression| self.evaluate(expression))
    }

    /// Evaluate a node under an explicit context.
    ///
    /// # Errors
    ///
    /// Returns an error if compounds and negations are nested deeper than the configured maximum depth.
    pub fn evaluate_node(&self, expression: &Expression, context: EvaluationContext) -> Result<Evaluation> {
        match expression {
            Expression::Terminal { name, predicate, explainer } => {
                let disposition = if context.is_complete() {
                    Disposition::Skipped
                } else {
                    Disposition::from(predicate.test())
                };
                log::trace!(target: LOG_TARGET, "Terminal '{name}' at depth {} is {disposition}", context.depth());

                Ok(Evaluation::Terminal {
                    name: Arc::clone(name),
                    disposition,
                    explainer: explainer.clone(),
                })
            }

            // A negation never completes its context; only compounds short-circuit.
            Expression::Negation { name, child } => {
                let child = self.evaluate_node(child, self.descend(name, context)?)?;
                let disposition = if context.is_complete() {
                    Disposition::Skipped
                } else {
                    child.disposition().negate()
                };

                Ok(Evaluation::Negation {
                    name: Arc::clone(name),
                    disposition,
                    child: Arc::new(child),
                })
            }

            Expression::Conjunction { name, children } => self.evaluate_compound(name, Junction::All, children, context),
            Expression::Disjunction { name, children } => self.evaluate_compound(name, Junction::Any, children, context),
        }
    }

    /// The context for the children of `name`, or an error once nesting passes `max_depth`.
    fn descend(&self, name: &str, context: EvaluationContext) -> Result<EvaluationContext> {
        let next = context.descend();
        if next.depth() > self.max_depth {
            log::error!(target: LOG_TARGET, "'{name}' exceeds the maximum evaluation depth of {}", self.max_depth);
            return Err(app_err!("maximum evaluation depth of {} exceeded at '{name}'", self.max_depth));
        }
        Ok(next)
    }

    fn evaluate_compound(&self, name: &Arc<str>, junction: Junction, children: &[Expression], context: EvaluationContext) -> Result<Evaluation> {
        let mut iteration = self.descend(name, context)?;

        // The outcome that decides this compound as soon as one child produces it.
        let (deciding, undecided) = match junction {
            Junction::All => (Disposition::False, Disposition::True),
            Junction::Any => (Disposition::True, Disposition::False),
        };

        let mut result = undecided;
        let mut evaluated = Vec::with_capacity(children.len());
        for child in children {
            let evaluation = self.evaluate_node(child, iteration)?;
            if !iteration.is_complete() && evaluation.disposition() == deciding {
                result = deciding;
                iteration = iteration.completed();
            }
            evaluated.push(evaluation);
        }

        let disposition = if context.is_complete() { Disposition::Skipped } else { result };
        log::trace!(target: LOG_TARGET, "Compound '{name}' ({junction}) at depth {} is {disposition}", context.depth());

        Ok(Evaluation::Compound {
            name: Arc::clone(name),
            disposition,
            junction,
            children: evaluated.into(),
        })
    }
}
