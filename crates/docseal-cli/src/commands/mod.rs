pub mod canonicalize;
pub mod hash;
pub mod notarize;
pub mod register;
pub mod verify;

use crate::errors::CliError;
use std::io::{self, Read};

/// Reads a file, or stdin when no path is given.
pub fn read_input(input: Option<&str>) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match input {
        Some(path) => Ok(std::fs::read(path).map_err(|source| CliError::Read {
            path: path.to_string(),
            source,
        })?),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Reads and parses a JSON file, or stdin when no path is given.
pub fn read_json(input: Option<&str>) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let bytes = read_input(input)?;
    Ok(serde_json::from_slice(&bytes).map_err(|e| format!("Invalid JSON: {}", e))?)
}
