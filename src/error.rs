use thiserror::Error;

/// Failures surfaced to the user while previewing a file.
///
/// Every variant is terminal for the operation that produced it. None of them
/// is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not load the model: {0}")]
    ImportFailure(String),

    #[error("Preview could not be displayed: {0}")]
    DisplayFailure(String),

    #[error("There is no file to convert")]
    ConversionUnavailable,
}

impl ViewError {
    /// Text shown in the alert box. Import failures point at the console, where
    /// the importer's own message is logged.
    pub fn notice(&self) -> String {
        match self {
            ViewError::UnsupportedFormat(_) => "Unsupported file format.".to_owned(),
            ViewError::ImportFailure(_) => {
                "Error: Could not load the model. Check the console for details.".to_owned()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        assert_eq!(
            ViewError::UnsupportedFormat("dwg".into()).notice(),
            "Unsupported file format."
        );
        assert!(ViewError::ImportFailure("bad header".into())
            .notice()
            .contains("Check the console"));
        assert_eq!(
            ViewError::DisplayFailure("decode".into()).notice(),
            "Preview could not be displayed: decode"
        );
    }
}
