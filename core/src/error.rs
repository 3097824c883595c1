use std::path::PathBuf;

use thiserror::Error;

use crate::backend::ShaderStage;

// Recoverable: the session keeps whatever terrain it already had
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("could not read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("image has zero area ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("expected {expected} height samples, got {actual}")]
    SampleCount { expected: usize, actual: usize },
}

// Compile and link failures are fatal at session start,
// allocation failures during a reload are not
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {log}")]
    Link { log: String },

    #[error("GPU allocation failed: {0}")]
    Allocation(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value {field} = {value}: {requirement}")]
    Invalid {
        field: &'static str,
        value: f32,
        requirement: &'static str,
    },
}
