use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Parses a JSON file into a given type `T`.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let file_path = file_path.as_ref();
    log::debug!("Reading JSON from '{}'", file_path.display());

    let data = fs::read_to_string(file_path).map_err(Error::IoError)?;
    let parsed_data: T = serde_json::from_str(&data).map_err(Error::DeserializationError)?;

    Ok(parsed_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = parse_json_file::<Sample>("/definitely/not/here.json");
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn malformed_json_is_deserialization_error() {
        let path = std::env::temp_dir().join(format!("workflow_editor_parser_{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();

        let result = parse_json_file::<Sample>(&path);
        assert!(matches!(result, Err(Error::DeserializationError(_))));

        fs::remove_file(&path).unwrap();
    }
}
