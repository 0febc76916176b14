use core::fmt;
use serde::Serialize;
use std::sync::Arc;

const SKIPPED_TEXT: &str = "(skipped)";

/// Why a terminal condition passed or failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rationale {
    pub expected: String,
    pub actual: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Rationale {
    #[must_use]
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// The sentinel used for every node that was short-circuited.
    #[must_use]
    pub fn skipped() -> Self {
        Self::new(SKIPPED_TEXT, SKIPPED_TEXT)
    }

    /// Rationale for a condition that carries no description of its own.
    #[must_use]
    pub fn from_outcome(passed: bool) -> Self {
        Self::new("true", passed.to_string())
    }

    /// The same rationale with the expectation inverted, for a condition that held under a negation.
    #[must_use]
    pub fn negated(self) -> Self {
        Self {
            expected: format!("not ({})", self.expected),
            ..self
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.expected == SKIPPED_TEXT && self.actual == SKIPPED_TEXT && self.hint.is_none()
    }
}

/// Produces a [`Rationale`] on demand from the outcome of a terminal condition.
///
/// The subject being checked is captured by the closure. The pass/fail flag is handed in
/// rather than recomputed, so the predicate is never invoked a second time just to
/// explain itself.
#[derive(Clone)]
pub struct Explainer(Arc<dyn Fn(bool) -> Rationale + Send + Sync>);

impl Explainer {
    pub fn new(explain: impl Fn(bool) -> Rationale + Send + Sync + 'static) -> Self {
        Self(Arc::new(explain))
    }

    #[must_use]
    pub fn explain(&self, passed: bool) -> Rationale {
        (self.0)(passed)
    }
}

impl Default for Explainer {
    fn default() -> Self {
        Self::new(Rationale::from_outcome)
    }
}

impl fmt::Debug for Explainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Explainer")
    }
}
