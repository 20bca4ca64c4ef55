use serde_derive::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct CliErrorOutput {
    pub code: i32,
    pub description: String,
}

/// Envelope for everything written to stdout.
#[derive(Debug, Serialize)]
#[serde(tag = "result", content = "data")]
#[serde(rename_all = "lowercase")]
pub enum CliResult<T> {
    Success(T),
    Error(CliErrorOutput),
}

impl From<&CliError> for CliErrorOutput {
    fn from(error: &CliError) -> Self {
        Self {
            code: error.kind.exit_code(),
            description: error.description.to_string(),
        }
    }
}
