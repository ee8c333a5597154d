use thiserror::Error;

/// Errors that abort a transformation.
///
/// Only structural problems and unparseable numbers end up here. Data-quality
/// problems (bad dates, missing currency, unknown unit codes, ...) are
/// substituted where they are read and never surface as an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MappingError {
    /// The document root is not one of the supported source dialects.
    #[error("unrecognized document root: {0}")]
    UnrecognizedRoot(String),

    /// A mandatory segment or party record is missing.
    #[error("structural error: {0}")]
    Structural(String),

    /// A monetary or quantity field could not be parsed as a number.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// XML reading or writing error.
    #[error("XML error: {0}")]
    Xml(String),
}

impl MappingError {
    pub(crate) fn missing(what: impl std::fmt::Display) -> Self {
        Self::Structural(format!("missing mandatory {what}"))
    }

    /// True for errors caused by the shape of the source document rather than
    /// by a single field value.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::UnrecognizedRoot(_) | Self::Structural(_))
    }
}
