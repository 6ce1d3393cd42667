//! Rich (multi-run) text values

use crate::style::FontStyle;
use std::fmt;

/// A run of text with an optional font override
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RichTextRun {
    /// Text fragment
    pub text: String,
    /// Font for this fragment; `None` means the cell's font applies
    pub font: Option<FontStyle>,
}

impl RichTextRun {
    /// Unformatted run
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }

    /// Run with its own font
    pub fn with_font<S: Into<String>>(text: S, font: FontStyle) -> Self {
        Self {
            text: text.into(),
            font: Some(font),
        }
    }
}

/// Ordered sequence of text runs
///
/// Two rich text values are equal only if their runs match in order, text
/// and font. Runs with no text are not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RichText {
    runs: Vec<RichTextRun>,
}

impl RichText {
    /// Empty rich text
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from runs
    pub fn from_runs(mut runs: Vec<RichTextRun>) -> Self {
        runs.retain(|r| !r.text.is_empty());
        Self { runs }
    }

    /// Append a run, builder style
    pub fn push<S: Into<String>>(mut self, text: S, font: Option<FontStyle>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.runs.push(RichTextRun { text, font });
        }
        self
    }

    /// The runs in order
    pub fn runs(&self) -> &[RichTextRun] {
        &self.runs
    }

    /// Concatenation of every run's text with no separator
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// True if there are no runs
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}

impl FromIterator<RichTextRun> for RichText {
    fn from_iter<I: IntoIterator<Item = RichTextRun>>(iter: I) -> Self {
        Self::from_runs(iter.into_iter().collect())
    }
}
