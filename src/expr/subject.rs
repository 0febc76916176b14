//! A generic builder that turns a named value into terminal conditions
//!
//! One builder serves every subject type; the available factories depend on what the
//! subject type supports (ordering, text, slices, options).

use super::{Expression, Rationale};
use core::fmt::Debug;
use std::sync::Arc;

/// A named value that conditions are stated about.
#[derive(Debug, Clone)]
pub struct Subject<T> {
    name: Arc<str>,
    value: Arc<T>,
}

impl<T> Subject<T>
where
    T: Debug + Send + Sync + 'static,
{
    pub fn new(name: impl Into<Arc<str>>, value: T) -> Self {
        Self {
            name: name.into(),
            value: Arc::new(value),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// A condition described in prose, e.g. `subject.satisfies("is even", |n| n % 2 == 0)`.
    pub fn satisfies(&self, description: &str, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Expression {
        let label = format!("{} {description}", self.name);
        self.condition(label, predicate, |v| format!("{v:?}"), None)
    }

    pub fn is_equal_to(&self, expected: T) -> Expression
    where
        T: PartialEq,
    {
        let label = format!("{} == {expected:?}", self.name);
        self.condition(label, move |v| *v == expected, |v| format!("{v:?}"), None)
    }

    pub fn is_not_equal_to(&self, unexpected: T) -> Expression
    where
        T: PartialEq,
    {
        let label = format!("{} != {unexpected:?}", self.name);
        self.condition(label, move |v| *v != unexpected, |v| format!("{v:?}"), None)
    }

    pub fn is_greater_than(&self, bound: T) -> Expression
    where
        T: PartialOrd,
    {
        let label = format!("{} > {bound:?}", self.name);
        self.condition(label, move |v| *v > bound, |v| format!("{v:?}"), None)
    }

    pub fn is_at_least(&self, bound: T) -> Expression
    where
        T: PartialOrd,
    {
        let label = format!("{} >= {bound:?}", self.name);
        self.condition(label, move |v| *v >= bound, |v| format!("{v:?}"), None)
    }

    pub fn is_less_than(&self, bound: T) -> Expression
    where
        T: PartialOrd,
    {
        let label = format!("{} < {bound:?}", self.name);
        self.condition(label, move |v| *v < bound, |v| format!("{v:?}"), None)
    }

    pub fn is_at_most(&self, bound: T) -> Expression
    where
        T: PartialOrd,
    {
        let label = format!("{} <= {bound:?}", self.name);
        self.condition(label, move |v| *v <= bound, |v| format!("{v:?}"), None)
    }

    /// Inclusive on both ends.
    pub fn is_between(&self, low: T, high: T) -> Expression
    where
        T: PartialOrd,
    {
        let label = format!("{low:?} <= {} <= {high:?}", self.name);
        let hint = (low > high).then(|| format!("the range is empty because {low:?} > {high:?}"));
        self.condition(label, move |v| low <= *v && *v <= high, |v| format!("{v:?}"), hint)
    }

    pub fn is_blank(&self) -> Expression
    where
        T: AsRef<str>,
    {
        let label = format!("{} is blank", self.name);
        self.condition(label, |v| v.as_ref().trim().is_empty(), |v| format!("{v:?}"), None)
    }

    pub fn is_not_blank(&self) -> Expression
    where
        T: AsRef<str>,
    {
        let label = format!("{} is not blank", self.name);
        self.condition(label, |v| !v.as_ref().trim().is_empty(), |v| format!("{v:?}"), None)
    }

    pub fn starts_with(&self, prefix: impl Into<String>) -> Expression
    where
        T: AsRef<str>,
    {
        let prefix = prefix.into();
        let label = format!("{} starts with {prefix:?}", self.name);
        self.condition(label, move |v| v.as_ref().starts_with(prefix.as_str()), |v| format!("{v:?}"), None)
    }

    pub fn ends_with(&self, suffix: impl Into<String>) -> Expression
    where
        T: AsRef<str>,
    {
        let suffix = suffix.into();
        let label = format!("{} ends with {suffix:?}", self.name);
        self.condition(label, move |v| v.as_ref().ends_with(suffix.as_str()), |v| format!("{v:?}"), None)
    }

    pub fn contains_text(&self, needle: impl Into<String>) -> Expression
    where
        T: AsRef<str>,
    {
        let needle = needle.into();
        let label = format!("{} contains {needle:?}", self.name);
        self.condition(label, move |v| v.as_ref().contains(needle.as_str()), |v| format!("{v:?}"), None)
    }

    pub fn is_empty<E>(&self) -> Expression
    where
        T: AsRef<[E]>,
    {
        let label = format!("{} is empty", self.name);
        self.condition(label, |v| v.as_ref().is_empty(), |v| format!("{} elements", v.as_ref().len()), None)
    }

    pub fn is_not_empty<E>(&self) -> Expression
    where
        T: AsRef<[E]>,
    {
        let label = format!("{} is not empty", self.name);
        self.condition(label, |v| !v.as_ref().is_empty(), |v| format!("{} elements", v.as_ref().len()), None)
    }

    pub fn has_length<E>(&self, length: usize) -> Expression
    where
        T: AsRef<[E]>,
    {
        let label = format!("{} has {length} elements", self.name);
        self.condition(
            label,
            move |v| v.as_ref().len() == length,
            |v| format!("{} elements", v.as_ref().len()),
            None,
        )
    }

    pub fn contains<E>(&self, element: E) -> Expression
    where
        T: AsRef<[E]>,
        E: PartialEq + Debug + Send + Sync + 'static,
    {
        let label = format!("{} contains {element:?}", self.name);
        self.condition(label, move |v| v.as_ref().contains(&element), |v| format!("{v:?}"), None)
    }

    fn condition(
        &self,
        label: String,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
        describe: impl Fn(&T) -> String + Send + Sync + 'static,
        hint: Option<String>,
    ) -> Expression {
        let expected = label.clone();
        let subject = Arc::clone(&self.value);
        let for_explainer = Arc::clone(&self.value);
        Expression::explained(
            label,
            move || predicate(&subject),
            move |_| {
                let rationale = Rationale::new(expected.clone(), describe(&for_explainer));
                match &hint {
                    Some(hint) => rationale.with_hint(hint.clone()),
                    None => rationale,
                }
            },
        )
    }
}

impl<V> Subject<Option<V>>
where
    V: Debug + Send + Sync + 'static,
{
    pub fn is_some(&self) -> Expression {
        let label = format!("{} is present", self.name);
        self.condition(label, Option::is_some, |v| format!("{v:?}"), None)
    }

    pub fn is_none(&self) -> Expression {
        let label = format!("{} is absent", self.name);
        self.condition(label, Option::is_none, |v| format!("{v:?}"), None)
    }
}
