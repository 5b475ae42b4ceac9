// Input errors — the only failures that are reported back to the caller verbatim.
//
// Everything else travels as anyhow::Error. Boundaries (the CLI and the web
// layer) downcast to InputError to tell "your request was wrong" apart from
// "something broke on our side".

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Feedback text must not be empty")]
    EmptyText,

    #[error("No file uploaded (expected multipart field 'file')")]
    MissingFile,

    #[error("Unsupported file format")]
    UnsupportedFormat(String),

    #[error("CSV must contain 'text' column")]
    MissingTextColumn,

    #[error("Could not read uploaded file: {0}")]
    Malformed(String),
}

/// Returns the InputError at the root of `err`, if there is one.
pub fn as_input_error(err: &anyhow::Error) -> Option<&InputError> {
    err.downcast_ref::<InputError>()
}
