use crate::config::SectionKind;
use thiserror::Error;

/// All errors that generating a document can produce
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("configuration error: {0}")]
    /// The page format, column set or section order cannot be laid out
    Configuration(String),

    #[error("measurement error: {0}")]
    /// The text measurer or the canvas failed
    Measurement(String),

    #[error("data error: {0}")]
    /// A required part of the document model is missing and has no safe default
    Data(String),

    #[error(transparent)]
    /// [image] failed to decode an image handed to the canvas
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// An I/O error occurred while writing the finished document
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [serde_json] failed to parse a document model
    Json(#[from] serde_json::Error),

    #[error("failed to lay out the {section} section: {source}")]
    /// A component failed while the named section was being laid out
    Section {
        section: SectionKind,
        #[source]
        source: Box<GenerationError>,
    },
}

impl GenerationError {
    /// Wrap this error with the name of the section that was being laid out.
    /// Errors that already carry a section are left alone.
    pub fn in_section(self, section: SectionKind) -> GenerationError {
        match self {
            GenerationError::Section { .. } => self,
            other => GenerationError::Section {
                section,
                source: Box::new(other),
            },
        }
    }

    /// The section the error was raised in, if known
    pub fn section(&self) -> Option<SectionKind> {
        match self {
            GenerationError::Section { section, .. } => Some(*section),
            _ => None,
        }
    }

    /// The underlying error, looking through any section wrapper
    pub fn root(&self) -> &GenerationError {
        match self {
            GenerationError::Section { source, .. } => source.root(),
            other => other,
        }
    }
}
