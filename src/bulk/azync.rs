//! Module for async-specific bulk formatting code.
//!
//! Mirrors the sync API of [`bulk`](crate::bulk) on top of `tokio::fs`.
//! Formatting itself stays synchronous and in memory; only the file
//! traversal and the reads and writes are asynchronous.

use std::path::{Path, PathBuf};

use async_recursion::async_recursion;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

use crate::errors::Result;
use crate::formatter::FormatParams;

use super::{format_bytes, is_xml_like};

/// Recursively collects every `.xml` and `.xsd` file under `dir`.
///
/// Async equivalent of [`discover`](crate::bulk::discover).
#[async_recursion]
async fn collect_xml_like(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir).await?;
    let mut children = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        children.push(entry.path());
    }
    // Stable order, matching the sync walk.
    children.sort();
    for child in children {
        if fs::metadata(&child).await?.is_dir() {
            collect_xml_like(&child, found).await?;
        } else if is_xml_like(&child) {
            found.push(child);
        }
    }
    Ok(())
}

/// Reformats one file in place. Returns `true` when the file changed.
///
/// Async equivalent of [`format_file`](crate::bulk::format_file).
pub async fn format_file_async(path: impl AsRef<Path>, params: &FormatParams) -> Result<bool> {
    let path = path.as_ref();
    let source = fs::read(path).await?;
    let formatted = format_bytes(&source, params)?;
    if formatted == source {
        trace!(path = %path.display(), "already formatted");
        return Ok(false);
    }
    let mut file = fs::File::create(path).await?;
    file.write_all(&formatted).await?;
    file.flush().await?;
    debug!(path = %path.display(), bytes = formatted.len(), "reformatted");
    Ok(true)
}

/// Reformats a file, or every `.xml`/`.xsd` under a directory, in place.
/// Returns the number of files that changed.
///
/// Async equivalent of [`format_path`](crate::bulk::format_path).
pub async fn format_path_async(path: impl AsRef<Path>, params: &FormatParams) -> Result<usize> {
    let path = path.as_ref();
    if fs::metadata(path).await?.is_dir() {
        let mut found = Vec::new();
        collect_xml_like(path, &mut found).await?;
        let mut changed = 0;
        for file in found {
            if format_file_async(&file, params).await? {
                changed += 1;
            }
        }
        Ok(changed)
    } else {
        Ok(format_file_async(path, params).await? as usize)
    }
}
