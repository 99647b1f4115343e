//! Bulk formatting of files and directory trees.
//!
//! The core formatter binds to in-memory buffers and sinks; this module is
//! the file-level glue around it: discovery of `.xml`/`.xsd` files, whole
//! file formatting with the cosmetic post passes applied, and in-place
//! rewriting that skips files whose formatted bytes are unchanged.

#[cfg(feature = "async")]
mod azync;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::errors::Result;
use crate::formatter::{FormatParams, Formatter};
use crate::post;

#[cfg(feature = "async")]
pub use self::azync::{format_file_async, format_path_async};

/// Formats a whole document: pretty-prints (or re-indents) `source` with
/// `params` and applies the cosmetic post passes.
///
/// # Examples
///
/// ```
/// use xml_indent::bulk::format_bytes;
/// use xml_indent::FormatParams;
///
/// let out = format_bytes(b"<a><b/></a>", &FormatParams::default()).unwrap();
/// assert_eq!(out, b"<a>\r\n\t<b />\r\n</a>\r\n");
/// ```
pub fn format_bytes(source: &[u8], params: &FormatParams) -> Result<Vec<u8>> {
    let sink = Vec::with_capacity(source.len() + source.len() / 8);
    let mut formatter = Formatter::with_params(source, params.clone(), sink);
    formatter.pretty_print()?;
    Ok(post::apply(&formatter.into_inner()))
}

/// Returns `true` for the file extensions the bulk mode picks up.
fn is_xml_like(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            ext.eq_ignore_ascii_case("xml") || ext.eq_ignore_ascii_case("xsd")
        })
}

/// Recursively collects every `.xml` and `.xsd` file under `root`, in a
/// stable order.
pub fn discover(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_xml_like(entry.path()) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Reformats one file in place. Returns `true` when the file changed.
pub fn format_file(path: impl AsRef<Path>, params: &FormatParams) -> Result<bool> {
    let path = path.as_ref();
    let source = fs::read(path)?;
    let formatted = format_bytes(&source, params)?;
    if formatted == source {
        trace!(path = %path.display(), "already formatted");
        return Ok(false);
    }
    fs::write(path, &formatted)?;
    debug!(path = %path.display(), bytes = formatted.len(), "reformatted");
    Ok(true)
}

/// Reformats `input` into `output`, leaving the input untouched.
pub fn format_file_to(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    params: &FormatParams,
) -> Result<()> {
    let source = fs::read(input.as_ref())?;
    let formatted = format_bytes(&source, params)?;
    fs::write(output.as_ref(), &formatted)?;
    debug!(
        input = %input.as_ref().display(),
        output = %output.as_ref().display(),
        "reformatted"
    );
    Ok(())
}

/// Reformats a file, or every `.xml`/`.xsd` under a directory, in place.
/// Returns the number of files that changed.
pub fn format_path(path: impl AsRef<Path>, params: &FormatParams) -> Result<usize> {
    let path = path.as_ref();
    if path.is_dir() {
        let mut changed = 0;
        for file in discover(path)? {
            if format_file(&file, params)? {
                changed += 1;
            }
        }
        Ok(changed)
    } else {
        Ok(format_file(path, params)? as usize)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_bytes_runs_the_post_passes() {
        let out = format_bytes(b"<a><!--x--></a>", &FormatParams::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<a>\r\n\t<!-- x -->\r\n</a>\r\n"
        );
    }

    #[test]
    fn xml_like_extensions() {
        assert!(is_xml_like(Path::new("data/a.xml")));
        assert!(is_xml_like(Path::new("schema.XSD")));
        assert!(!is_xml_like(Path::new("readme.md")));
        assert!(!is_xml_like(Path::new("noext")));
    }

    #[test]
    fn in_place_rewrite_and_skip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.xml");
        fs::write(&file, b"<a><b/></a>").unwrap();

        let params = FormatParams::default();
        assert!(format_file(&file, &params).unwrap());
        assert_eq!(fs::read(&file).unwrap(), b"<a>\r\n\t<b />\r\n</a>\r\n");

        // A second run finds nothing to do.
        assert!(!format_file(&file, &params).unwrap());
    }

    #[test]
    fn directory_walk_finds_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.xml"), b"<a/>").unwrap();
        fs::write(dir.path().join("sub/b.xsd"), b"<b/>").unwrap();
        fs::write(dir.path().join("skip.txt"), b"-").unwrap();

        let found = discover(dir.path()).unwrap();
        assert_eq!(found.len(), 2);

        let changed = format_path(dir.path(), &FormatParams::default()).unwrap();
        assert_eq!(changed, 2);
        assert_eq!(
            fs::read(dir.path().join("a.xml")).unwrap(),
            b"<a />\r\n"
        );
    }
}
