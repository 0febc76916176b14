use super::{Disposition, Explainer, Rationale};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use strum::Display;

/// Name of the sentinel produced for an absent expression.
pub const EMPTY: &str = "(empty)";

/// How a compound combined its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Junction {
    All,
    Any,
}

/// The result tree of an evaluation. It mirrors the shape of the evaluated expression.
///
/// Nodes are never modified once built and subtrees are shared by reference counting,
/// so cloning is cheap.
#[derive(Debug, Clone)]
pub enum Evaluation {
    Terminal {
        name: Arc<str>,
        disposition: Disposition,
        explainer: Explainer,
    },
    Negation {
        name: Arc<str>,
        disposition: Disposition,
        child: Arc<Self>,
    },
    Compound {
        name: Arc<str>,
        disposition: Disposition,
        junction: Junction,
        children: Arc<[Self]>,
    },
    Empty,
}

impl Evaluation {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Terminal { name, .. } | Self::Negation { name, .. } | Self::Compound { name, .. } => name,
            Self::Empty => EMPTY,
        }
    }

    #[must_use]
    pub const fn disposition(&self) -> Disposition {
        match self {
            Self::Terminal { disposition, .. } | Self::Negation { disposition, .. } | Self::Compound { disposition, .. } => *disposition,
            Self::Empty => Disposition::True,
        }
    }

    /// Direct children; a negation has exactly one.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Negation { child, .. } => core::slice::from_ref(child.as_ref()),
            Self::Compound { children, .. } => children,
            Self::Terminal { .. } | Self::Empty => &[],
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    #[must_use]
    pub const fn junction(&self) -> Option<Junction> {
        match self {
            Self::Compound { junction, .. } => Some(*junction),
            _ => None,
        }
    }

    /// Explains a terminal outcome, generating the text only now.
    ///
    /// Skipped terminals always yield [`Rationale::skipped`]. Non-terminals have no rationale.
    #[must_use]
    pub fn rationale(&self) -> Option<Rationale> {
        match self {
            Self::Terminal { disposition, explainer, .. } => Some(match disposition {
                Disposition::Skipped => Rationale::skipped(),
                Disposition::True => explainer.explain(true),
                Disposition::False => explainer.explain(false),
            }),
            _ => None,
        }
    }

    /// All failed leaves, in tree order.
    #[must_use]
    pub fn failures(&self) -> Vec<&Self> {
        let mut found = Vec::new();
        collect_failures(self, &mut found);
        found
    }
}

fn collect_failures<'a>(evaluation: &'a Evaluation, found: &mut Vec<&'a Evaluation>) {
    if evaluation.is_leaf() {
        if evaluation.disposition().is_false() {
            found.push(evaluation);
        }
        return;
    }

    for child in evaluation.children() {
        collect_failures(child, found);
    }
}

impl Serialize for Evaluation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Evaluation", 5)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("disposition", &self.disposition())?;
        if let Some(junction) = self.junction() {
            state.serialize_field("junction", &junction)?;
        }
        if self.disposition().is_false() {
            if let Some(rationale) = self.rationale() {
                state.serialize_field("rationale", &rationale)?;
            }
        }
        if !self.is_leaf() {
            state.serialize_field("children", self.children())?;
        }
        state.end()
    }
}
