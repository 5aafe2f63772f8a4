use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Lazily read a text source line by line, in order. Single pass.
pub fn read_lines<R: Read + 'static>(
    reader: R,
) -> Box<dyn Iterator<Item = Result<String>>> {
    Box::new(
        BufReader::new(reader)
            .lines()
            .enumerate()
            .map(|(idx, line)| line.with_context(|| format!("Failed to read line {}", idx + 1))),
    )
}

/// Open a CSV file and return its lines.
pub fn read_data_source<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn Iterator<Item = Result<String>>>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open input file: {:?}", path))?;
    Ok(read_lines(file))
}

pub fn write_json<T: serde::Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();

    // Create directory if it doesn't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
