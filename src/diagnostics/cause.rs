//! Tracing a failure down to its most specific contributor

use crate::Result;
use crate::expr::{Disposition, Evaluation};
use core::fmt;
use ohno::app_err;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use strum::Display;

const LOG_TARGET: &str = "cause";

/// Default limit on the number of causes in a chain.
pub const DEFAULT_MAX_CAUSE_DEPTH: usize = 1024;

/// One evaluation in a chain of causes, optionally linked to the cause beneath it.
///
/// Causes are compared by identity: two causes built from equal evaluations are still
/// different causes.
pub struct Cause {
    evaluation: Evaluation,
    underlying: OnceLock<Arc<Self>>,
}

impl Cause {
    #[must_use]
    pub fn new(evaluation: Evaluation) -> Arc<Self> {
        Arc::new(Self {
            evaluation,
            underlying: OnceLock::new(),
        })
    }

    #[must_use]
    pub fn with_underlying(evaluation: Evaluation, underlying: Arc<Self>) -> Arc<Self> {
        Arc::new(Self {
            evaluation,
            underlying: OnceLock::from(underlying),
        })
    }

    /// Attach the underlying cause after construction.
    ///
    /// Linking back to an earlier cause creates a cycle; chain building tolerates that,
    /// but the causes involved are then never freed.
    ///
    /// # Errors
    ///
    /// Returns an error if this cause already has an underlying cause.
    pub fn link(&self, underlying: Arc<Self>) -> Result<()> {
        self.underlying
            .set(underlying)
            .map_err(|_existing| app_err!("cause '{}' already has an underlying cause", self.name()))
    }

    /// Builds the causes behind an evaluation by following, from each node, the child that
    /// produced its disposition: a negation's child, or a compound's first child with the
    /// same disposition as the compound.
    #[must_use]
    pub fn from_evaluation(evaluation: &Evaluation) -> Arc<Self> {
        let mut path = vec![evaluation];
        let mut current = evaluation;
        while let Some(next) = contributing_child(current) {
            path.push(next);
            current = next;
        }

        let mut cause = Self::new(current.clone());
        for evaluation in path.iter().rev().skip(1) {
            cause = Self::with_underlying((*evaluation).clone(), cause);
        }
        cause
    }

    #[must_use]
    pub const fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.evaluation.name()
    }

    #[must_use]
    pub fn underlying(&self) -> Option<&Arc<Self>> {
        self.underlying.get()
    }

    #[must_use]
    pub fn root_cause_chain(self: &Arc<Self>) -> RootCauseChain {
        self.root_cause_chain_with_max_depth(DEFAULT_MAX_CAUSE_DEPTH)
    }

    /// Follow underlying causes from this one.
    ///
    /// Stops at the first cause without an underlying cause, at the first cause already in the
    /// chain, or once the chain holds `max_depth` causes. The latter two are recorded in
    /// [`RootCauseChain::termination`] and the partial chain is returned.
    #[must_use]
    pub fn root_cause_chain_with_max_depth(self: &Arc<Self>, max_depth: usize) -> RootCauseChain {
        let max_depth = max_depth.max(1);
        let mut seen: HashSet<*const Self> = HashSet::from([Arc::as_ptr(self)]);
        let mut rest = Vec::new();
        let mut termination = ChainTermination::Complete;

        let mut current = Arc::clone(self);
        loop {
            let Some(next) = current.underlying().cloned() else {
                break;
            };

            if !seen.insert(Arc::as_ptr(&next)) {
                log::warn!(target: LOG_TARGET, "Cause '{}' links back into its own chain, stopping at '{}'", next.name(), current.name());
                termination = ChainTermination::CycleDetected;
                break;
            }

            if rest.len() + 1 >= max_depth {
                log::warn!(target: LOG_TARGET, "Cause chain exceeds the maximum depth of {max_depth}, stopping at '{}'", current.name());
                termination = ChainTermination::MaximumDepthExceeded;
                break;
            }

            rest.push(Arc::clone(&next));
            current = next;
        }

        RootCauseChain {
            head: Arc::clone(self),
            rest,
            termination,
        }
    }

    /// The last cause of [`Cause::root_cause_chain`].
    #[must_use]
    pub fn root_cause(self: &Arc<Self>) -> Arc<Self> {
        Arc::clone(self.root_cause_chain().root_cause())
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the next name: following links could loop forever.
        f.debug_struct("Cause")
            .field("name", &self.name())
            .field("disposition", &self.evaluation.disposition())
            .field("underlying", &self.underlying().map(|cause| cause.name()))
            .finish()
    }
}

fn contributing_child(evaluation: &Evaluation) -> Option<&Evaluation> {
    match evaluation {
        Evaluation::Negation { disposition, child, .. } if *disposition != Disposition::Skipped => Some(child.as_ref()),
        Evaluation::Compound { disposition, children, .. } if *disposition != Disposition::Skipped => {
            children.iter().find(|child| child.disposition() == *disposition)
        }
        _ => None,
    }
}

/// Why building a chain stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ChainTermination {
    /// The last cause has no underlying cause.
    Complete,
    CycleDetected,
    MaximumDepthExceeded,
}

/// A non-empty, duplicate-free sequence of causes from a failure down to its root cause.
#[derive(Debug, Clone)]
pub struct RootCauseChain {
    head: Arc<Cause>,
    rest: Vec<Arc<Cause>>,
    termination: ChainTermination,
}

impl RootCauseChain {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Always `false`; a chain holds at least the cause it was built from.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Cause>> {
        core::iter::once(&self.head).chain(self.rest.iter())
    }

    #[must_use]
    pub fn root_cause(&self) -> &Arc<Cause> {
        self.rest.last().unwrap_or(&self.head)
    }

    #[must_use]
    pub const fn termination(&self) -> ChainTermination {
        self.termination
    }
}

impl<'a> IntoIterator for &'a RootCauseChain {
    type Item = &'a Arc<Cause>;
    type IntoIter = Box<dyn Iterator<Item = &'a Arc<Cause>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Display for RootCauseChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, cause) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(cause.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Evaluator, Expression};

    fn failed(name: &str) -> Evaluation {
        Evaluator::default()
            .evaluate(&Expression::contradiction().named(name))
            .unwrap()
    }

    #[test]
    fn test_single_cause_is_its_own_root() {
        let cause = Cause::new(failed("only"));
        let chain = cause.root_cause_chain();
        assert_eq!(chain.len(), 1);
        assert!(Arc::ptr_eq(chain.root_cause(), &cause));
        assert!(Arc::ptr_eq(&cause.root_cause(), &cause));
        assert_eq!(chain.termination(), ChainTermination::Complete);
        assert_eq!(chain.to_string(), "only");
    }

    #[test]
    fn test_linear_chain() {
        let c = Cause::new(failed("c"));
        let b = Cause::with_underlying(failed("b"), c);
        let a = Cause::with_underlying(failed("a"), b);

        let chain = a.root_cause_chain();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.root_cause().name(), "c");
        assert_eq!(chain.to_string(), "a -> b -> c");
        let names: Vec<_> = (&chain).into_iter().map(|cause| cause.name().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cycle_is_detected() {
        let a = Cause::new(failed("a"));
        let b = Cause::with_underlying(failed("b"), Arc::clone(&a));
        a.link(Arc::clone(&b)).unwrap();

        let chain = a.root_cause_chain();
        assert_eq!(chain.termination(), ChainTermination::CycleDetected);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.root_cause().name(), "b");
    }

    #[test]
    fn test_self_cycle() {
        let a = Cause::new(failed("a"));
        a.link(Arc::clone(&a)).unwrap();

        let chain = a.root_cause_chain();
        assert_eq!(chain.termination(), ChainTermination::CycleDetected);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_equal_evaluations_are_distinct_causes() {
        let evaluation = failed("same");
        let b = Cause::new(evaluation.clone());
        let a = Cause::with_underlying(evaluation, b);

        let chain = a.root_cause_chain();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.termination(), ChainTermination::Complete);
    }

    #[test]
    fn test_depth_limit() {
        let mut cause = Cause::new(failed("leaf"));
        for i in 0..20 {
            cause = Cause::with_underlying(failed(&format!("level {i}")), cause);
        }

        let chain = cause.root_cause_chain_with_max_depth(5);
        assert_eq!(chain.len(), 5);
        assert_eq!(chain.termination(), ChainTermination::MaximumDepthExceeded);
        assert_eq!(chain.root_cause().name(), "level 15");

        let full = cause.root_cause_chain_with_max_depth(21);
        assert_eq!(full.len(), 21);
        assert_eq!(full.termination(), ChainTermination::Complete);
    }

    #[test]
    fn test_link_twice_fails() {
        let a = Cause::new(failed("a"));
        a.link(Cause::new(failed("b"))).unwrap();
        let err = a.link(Cause::new(failed("c"))).unwrap_err();
        assert!(err.to_string().contains("already has an underlying cause"));
    }

    #[test]
    fn test_from_evaluation_follows_failures() {
        let expr = Expression::all([
            Expression::tautology().named("fine"),
            Expression::any([Expression::contradiction().named("left"), Expression::contradiction().named("right")]).named("either"),
            Expression::contradiction().named("never reached"),
        ])
        .named("everything");

        let evaluation = Evaluator::default().evaluate(&expr).unwrap();
        let chain = Cause::from_evaluation(&evaluation).root_cause_chain();
        assert_eq!(chain.to_string(), "everything -> either -> left");
        assert!(chain.root_cause().evaluation().disposition().is_false());
    }

    #[test]
    fn test_from_evaluation_through_negation() {
        let expr = Expression::not(Expression::any([Expression::contradiction().named("a"), Expression::tautology().named("b")]).named("some"))
            .named("none");

        let evaluation = Evaluator::default().evaluate(&expr).unwrap();
        let chain = Cause::from_evaluation(&evaluation).root_cause_chain();
        assert_eq!(chain.to_string(), "none -> some -> b");
    }

    #[test]
    fn test_debug_does_not_follow_cycles() {
        let a = Cause::new(failed("a"));
        a.link(Arc::clone(&a)).unwrap();
        let text = format!("{a:?}");
        assert!(text.contains("\"a\""));
    }
}
