//! Loading the list of packages the user may choose to remove.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Parse candidate file content into a sorted list of package names.
///
/// Lines that are blank after trimming are skipped, as are lines whose first
/// character is `#`. Everything else is kept trimmed. Duplicates are kept.
pub fn parse_candidates(content: &str) -> Vec<String> {
    let mut pkgs: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| line.trim().to_string())
        .collect();

    pkgs.sort();
    pkgs
}

/// Read and parse a candidate file.
pub fn read_candidates(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    Ok(parse_candidates(&content))
}
