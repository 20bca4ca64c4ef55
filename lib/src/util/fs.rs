use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;

/// Read a whole file as bytes. Saved forum pages are not guaranteed to be valid UTF-8.
pub fn read_file_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>, anyhow::Error> {
    let path = path.as_ref();

    let mut file = fs::File::open(path).with_context(|| format!("Error opening file: {}", path.display()))?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .with_context(|| format!("Error reading file: {}", path.display()))?;

    Ok(bytes)
}

pub fn read_file_string(path: impl AsRef<Path>) -> Result<String, anyhow::Error> {
    let path = path.as_ref();

    fs::read_to_string(path).with_context(|| format!("Error reading file: {}", path.display()))
}

/// Write `contents` to `path`, creating missing parent directories first.
pub fn write_file_with_parents(path: impl AsRef<Path>, contents: &[u8]) -> Result<(), anyhow::Error> {
    let path = path.as_ref();

    if let Some(parent_dir_path) = path.parent() {
        fs::create_dir_all(parent_dir_path)
            .with_context(|| format!("Error creating path: {}", parent_dir_path.display()))?;
    }

    let mut file = fs::File::create(path).with_context(|| format!("Error creating file: {}", path.display()))?;
    file.write_all(contents)
        .with_context(|| format!("Error writing file: {}", path.display()))?;

    Ok(())
}
