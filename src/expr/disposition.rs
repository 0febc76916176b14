use serde::Serialize;
use strum::{Display, EnumIter};

/// The tri-state outcome of evaluating a single expression node.
///
/// `Skipped` means the node was never evaluated because an enclosing compound had
/// already been decided by an earlier sibling. It is distinct from `False`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    True,
    False,
    Skipped,
}

impl Disposition {
    /// Logical negation. `Skipped` is absorbing.
    #[must_use]
    pub const fn negate(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Skipped => Self::Skipped,
        }
    }

    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::True)
    }

    #[must_use]
    pub const fn is_false(self) -> bool {
        matches!(self, Self::False)
    }

    #[must_use]
    pub const fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped)
    }
}

impl From<bool> for Disposition {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}
