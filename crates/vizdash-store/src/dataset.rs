//! Dataset file loading
//!
//! The bundled dataset is a JSON array of flat record objects.

use crate::StoreError;
use serde_json::Value;
use std::path::Path;
use vizdash_domain::Record;

/// Read and parse a dataset file
pub fn load_json_file(path: &Path) -> Result<Vec<Record>, StoreError> {
    let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset(&contents)
}

/// Parse dataset text
///
/// The top level must be an array; each element must be an object.
pub fn parse_dataset(contents: &str) -> Result<Vec<Record>, StoreError> {
    match serde_json::from_str::<Value>(contents)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(object) => Ok(Record::from_json_object(object)),
                _ => Err(StoreError::InvalidData(format!(
                    "dataset entry {} is not an object",
                    i
                ))),
            })
            .collect(),
        _ => Err(StoreError::InvalidData(
            "dataset must be a JSON array of records".to_string(),
        )),
    }
}
