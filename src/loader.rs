// src/loader.rs
// =============================================================================
// This module reads the Markdown document the links are extracted from.
//
// Checks, in this order:
// 1. The path exists                       -> FileNotFound
// 2. It is a file with a .md/.markdown ext -> IncompatibleFileType
// 3. It is not empty                       -> EmptyFile
//
// Any other read problem (permissions, bytes that are not UTF-8) comes back
// as MdLinksError::Read with the underlying io::Error attached.
// =============================================================================

use crate::error::{MdLinksError, Result};
use std::io::ErrorKind;
use std::path::Path;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Reads a Markdown file and returns its contents.
pub fn load_markdown(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path).map_err(|e| read_error(path, e))?;

    if metadata.is_dir() || !is_markdown_path(path) {
        return Err(MdLinksError::IncompatibleFileType {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;

    if content.is_empty() {
        return Err(MdLinksError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "loaded markdown");
    Ok(content)
}

fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn read_error(path: &Path, source: std::io::Error) -> MdLinksError {
    if source.kind() == ErrorKind::NotFound {
        MdLinksError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        MdLinksError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}
