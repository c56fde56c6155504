//! Error types for loading and building scenes

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::layout::{Attribute, AttributeAxis, LayoutError};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene TOML: {}", .0.message())]
    Parse(#[from] toml::de::Error),

    #[error("duplicate name '{name}'")]
    DuplicateName { name: String, span: Span },

    #[error("unknown name '{name}'")]
    UnknownName {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    #[error("'{name}' is a layout guide, not a view")]
    NotAView { name: String, span: Span },

    #[error("invalid anchor '{anchor}': {reason}")]
    InvalidAnchor {
        anchor: String,
        reason: String,
        span: Span,
    },

    #[error("cannot relate {edge} ({expected}) to {target} ({found})")]
    AxisMismatch {
        edge: Attribute,
        expected: AttributeAxis,
        target: String,
        found: AttributeAxis,
        span: Span,
    },

    #[error("'{edge}' rule needs a target anchor")]
    MissingTarget { edge: Attribute, span: Span },

    #[error("invalid rule: {message}")]
    InvalidRule { message: String, span: Span },

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl SceneError {
    /// Get the source span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Parse(e) => e.span(),
            Self::DuplicateName { span, .. }
            | Self::UnknownName { span, .. }
            | Self::NotAView { span, .. }
            | Self::InvalidAnchor { span, .. }
            | Self::AxisMismatch { span, .. }
            | Self::MissingTarget { span, .. }
            | Self::InvalidRule { span, .. } => Some(span.clone()),
            Self::Io(_) | Self::Layout(_) => None,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UnknownName { suggestions, .. } if !suggestions.is_empty() => Some(suggestions),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne
    ///
    /// Errors without a span fall back to their plain message. Output is
    /// uncolored so it can be logged or compared verbatim.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return self.to_string();
        };

        let message = self.to_string();
        let mut label = Label::new((filename, span.clone())).with_color(Color::Red);
        label = match self.suggestions() {
            Some(suggestions) => {
                label.with_message(format!("did you mean: {}?", suggestions.join(", ")))
            }
            None => label.with_message(&message),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_color(false))
            .with_message(&message)
            .with_label(label)
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => message,
        }
    }
}
