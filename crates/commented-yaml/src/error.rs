use alloc::string::String;

/// Errors produced while reading a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid YAML: {0}")]
    Syntax(String),

    #[error("unsupported YAML feature on line {line}: {feature}")]
    Unsupported { feature: &'static str, line: usize },

    #[error("duplicate key '{key}' on line {line}")]
    DuplicateKey { key: String, line: usize },
}
