use super::{Cause, ChainTermination, DEFAULT_MAX_CAUSE_DEPTH};
use crate::config::DiagnosticsConfig;
use crate::expr::{Disposition, Evaluation, Junction, Rationale};
use core::fmt::{self, Write};
use owo_colors::OwoColorize;

const INDENT: &str = "    ";

/// Rendered text of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedEvaluation(String);

impl FormattedEvaluation {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FormattedEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FormattedEvaluation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<FormattedEvaluation> for String {
    fn from(value: FormattedEvaluation) -> Self {
        value.0
    }
}

/// Renders evaluation trees as indented text.
///
/// Each node becomes one line, `[/]` for true, `[X]` for false and `[ ]` for skipped,
/// indented four spaces per level. Failed leaves are followed by their rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    root_cause_first: bool,
    use_colors: bool,
    max_cause_depth: usize,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            root_cause_first: false,
            use_colors: false,
            max_cause_depth: DEFAULT_MAX_CAUSE_DEPTH,
        }
    }
}

impl Formatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn from_config(config: &DiagnosticsConfig) -> Self {
        Self {
            root_cause_first: config.root_cause_first,
            use_colors: config.use_colors,
            max_cause_depth: config.max_cause_depth,
        }
    }

    /// Lead failed evaluations with a block describing their root cause.
    #[must_use]
    pub const fn with_root_cause_first(mut self, enabled: bool) -> Self {
        self.root_cause_first = enabled;
        self
    }

    #[must_use]
    pub const fn with_colors(mut self, enabled: bool) -> Self {
        self.use_colors = enabled;
        self
    }

    #[must_use]
    pub const fn with_max_cause_depth(mut self, max_cause_depth: usize) -> Self {
        self.max_cause_depth = max_cause_depth;
        self
    }

    #[must_use]
    pub fn format(&self, evaluation: &Evaluation) -> FormattedEvaluation {
        FormattedEvaluation(Report { formatter: self, evaluation }.to_string())
    }

    /// Render into any writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer does.
    pub fn write<W: Write>(&self, evaluation: &Evaluation, writer: &mut W) -> fmt::Result {
        if self.root_cause_first && evaluation.disposition().is_false() {
            self.write_root_cause(evaluation, writer)?;
            writeln!(writer)?;
        }

        self.write_node(evaluation, 0, writer)
    }

    fn write_root_cause<W: Write>(&self, evaluation: &Evaluation, writer: &mut W) -> fmt::Result {
        let chain = Cause::from_evaluation(evaluation).root_cause_chain_with_max_depth(self.max_cause_depth);
        let root = chain.root_cause().evaluation();

        let label = "Root cause:";
        if self.use_colors {
            writeln!(writer, "{} {}", label.red().bold(), root.name())?;
        } else {
            writeln!(writer, "{label} {}", root.name())?;
        }

        // Under an odd number of negations the root cause held; what failed is the expectation that it would not.
        if let Some(rationale) = leaf_rationale(root) {
            let rationale = if root.disposition().is_true() { rationale.negated() } else { rationale };
            write_rationale(&rationale, 1, writer)?;
        }

        if chain.len() > 1 {
            writeln!(writer, "{INDENT}Via: {chain}")?;
        }

        if chain.termination() != ChainTermination::Complete {
            writeln!(writer, "{INDENT}Note: cause chain stopped early ({})", chain.termination())?;
        }

        Ok(())
    }

    fn write_node<W: Write>(&self, evaluation: &Evaluation, depth: usize, writer: &mut W) -> fmt::Result {
        writeln!(
            writer,
            "{}{} {}",
            INDENT.repeat(depth),
            self.marker(evaluation.disposition()),
            evaluation.name()
        )?;

        if evaluation.is_leaf() {
            if evaluation.disposition().is_false() {
                if let Some(rationale) = leaf_rationale(evaluation) {
                    write_rationale(&rationale, depth + 1, writer)?;
                }
            }
            return Ok(());
        }

        for child in evaluation.children() {
            self.write_node(child, depth + 1, writer)?;
        }

        Ok(())
    }

    fn marker(&self, disposition: Disposition) -> String {
        let marker = match disposition {
            Disposition::True => "[/]",
            Disposition::False => "[X]",
            Disposition::Skipped => "[ ]",
        };

        if !self.use_colors {
            return marker.to_string();
        }

        match disposition {
            Disposition::True => marker.green().to_string(),
            Disposition::False => marker.red().bold().to_string(),
            Disposition::Skipped => marker.dimmed().to_string(),
        }
    }
}

struct Report<'a> {
    formatter: &'a Formatter,
    evaluation: &'a Evaluation,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.formatter.write(self.evaluation, f)
    }
}

/// Rationale shown for a leaf. An empty disjunction has no terminal to ask, so it gets its own.
fn leaf_rationale(evaluation: &Evaluation) -> Option<Rationale> {
    match evaluation {
        Evaluation::Compound {
            junction: Junction::Any,
            disposition: Disposition::False,
            children,
            ..
        } if children.is_empty() => Some(Rationale::new("any condition to hold", "no conditions were given")),
        _ => evaluation.rationale(),
    }
}

fn write_rationale<W: Write>(rationale: &Rationale, depth: usize, writer: &mut W) -> fmt::Result {
    let indent = INDENT.repeat(depth);
    writeln!(writer, "{indent}Expected: {}", rationale.expected)?;
    writeln!(writer, "{indent}Actual: {}", rationale.actual)?;
    if let Some(hint) = &rationale.hint {
        writeln!(writer, "{indent}Hint: {hint}")?;
    }
    Ok(())
}
