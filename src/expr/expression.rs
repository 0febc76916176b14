//! Immutable condition trees built by callers and evaluated any number of times

use super::{Explainer, Rationale};
use core::fmt;
use std::sync::Arc;

/// Name given to any node built without an explicit one.
pub const UNNAMED: &str = "(unnamed)";

/// Name of the contradiction substituted for an absent child.
pub const ABSENT: &str = "(absent)";

/// A boolean check over state captured when the condition was built.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn() -> bool + Send + Sync>);

impl Predicate {
    pub fn new(predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    #[must_use]
    pub fn test(&self) -> bool {
        (self.0)()
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

/// A node in a condition tree.
///
/// Children are reference counted, so cloning an expression or embedding it in a larger tree
/// never copies the subtree. Trees are `Send + Sync` and may be evaluated from several threads
/// at once; thread safety of the captured predicates is up to whoever wrote them.
#[derive(Debug, Clone)]
pub enum Expression {
    Terminal {
        name: Arc<str>,
        predicate: Predicate,
        explainer: Explainer,
    },
    Negation {
        name: Arc<str>,
        child: Arc<Self>,
    },
    Conjunction {
        name: Arc<str>,
        children: Arc<[Self]>,
    },
    Disjunction {
        name: Arc<str>,
        children: Arc<[Self]>,
    },
}

impl Expression {
    /// A terminal condition whose rationale only reports the boolean outcome.
    pub fn terminal(name: impl Into<Arc<str>>, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self::Terminal {
            name: name.into(),
            predicate: Predicate::new(predicate),
            explainer: Explainer::default(),
        }
    }

    pub fn explained(
        name: impl Into<Arc<str>>,
        predicate: impl Fn() -> bool + Send + Sync + 'static,
        explain: impl Fn(bool) -> Rationale + Send + Sync + 'static,
    ) -> Self {
        Self::Terminal {
            name: name.into(),
            predicate: Predicate::new(predicate),
            explainer: Explainer::new(explain),
        }
    }

    /// A terminal condition over a subject shared by the predicate and the rationale.
    pub fn on<T>(
        name: impl Into<Arc<str>>,
        subject: T,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
        explain: impl Fn(&T, bool) -> Rationale + Send + Sync + 'static,
    ) -> Self
    where
        T: Send + Sync + 'static,
    {
        let subject = Arc::new(subject);
        let for_explainer = Arc::clone(&subject);
        Self::explained(name, move || predicate(&subject), move |passed| explain(&for_explainer, passed))
    }

    #[must_use]
    pub fn tautology() -> Self {
        Self::explained("(tautology)", || true, |passed| Rationale::new("true", passed.to_string()))
    }

    #[must_use]
    pub fn contradiction() -> Self {
        Self::explained("(contradiction)", || false, |passed| Rationale::new("false", passed.to_string()))
    }

    #[must_use]
    pub fn not(child: Self) -> Self {
        Self::Negation {
            name: UNNAMED.into(),
            child: Arc::new(child),
        }
    }

    /// Every child must hold. The children are collected into a fresh sequence.
    pub fn all(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Conjunction {
            name: UNNAMED.into(),
            children: children.into_iter().collect(),
        }
    }

    /// At least one child must hold.
    pub fn any(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Disjunction {
            name: UNNAMED.into(),
            children: children.into_iter().collect(),
        }
    }

    /// Like [`Expression::all`], tolerating absent children by substituting a contradiction.
    pub fn all_present(children: impl IntoIterator<Item = Option<Self>>) -> Self {
        Self::all(children.into_iter().map(|child| child.unwrap_or_else(absent)))
    }

    /// Like [`Expression::any`], tolerating absent children by substituting a contradiction.
    pub fn any_present(children: impl IntoIterator<Item = Option<Self>>) -> Self {
        Self::any(children.into_iter().map(|child| child.unwrap_or_else(absent)))
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::all([self, other])
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::any([self, other])
    }

    /// Returns this node renamed. Children are shared, not copied.
    #[must_use]
    pub fn named(self, name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        match self {
            Self::Terminal { predicate, explainer, .. } => Self::Terminal {
                name,
                predicate,
                explainer,
            },
            Self::Negation { child, .. } => Self::Negation { name, child },
            Self::Conjunction { children, .. } => Self::Conjunction { name, children },
            Self::Disjunction { children, .. } => Self::Disjunction { name, children },
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Terminal { name, .. } | Self::Negation { name, .. } | Self::Conjunction { name, .. } | Self::Disjunction { name, .. } => {
                name
            }
        }
    }
}

fn absent() -> Expression {
    Expression::contradiction().named(ABSENT)
}
