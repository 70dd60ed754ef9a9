pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use vastgoed_core::VastgoedError;

/// Load a structured input document from `--input`, or from piped stdin.
pub fn read_document<T: DeserializeOwned>(
    path: Option<&str>,
    command: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_document(path);
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(serde_json::from_value(data)?),
        None => Err(VastgoedError::InvalidInput {
            field: "--input".into(),
            reason: format!("a file (or JSON on stdin) is required for {command}"),
        }
        .into()),
    }
}
