//! Turning a folder of text files into index documents.
//!
//! Every regular file below the documents directory becomes one [`SiteDocument`]:
//! the file name is the title, the decoded text is the content and the path is the
//! unique key, so re-running ingestion updates documents in place. HTML files are
//! indexed as plain text.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::document::SiteDocument;
use crate::error::Result;
use crate::index::Index;

/// Outcome of decoding a file's bytes as UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The bytes were valid UTF-8.
    Clean(String),
    /// Invalid sequences were replaced with U+FFFD.
    Lossy(String),
}

impl Decoded {
    pub fn is_lossy(&self) -> bool {
        matches!(self, Decoded::Lossy(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Decoded::Clean(text) | Decoded::Lossy(text) => text,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Decoded::Clean(text) | Decoded::Lossy(text) => text,
        }
    }
}

/// Decode `bytes` as UTF-8, reporting whether replacement characters were needed.
pub fn decode_text(bytes: Vec<u8>) -> Decoded {
    match String::from_utf8(bytes) {
        Ok(text) => Decoded::Clean(text),
        Err(err) => match String::from_utf8_lossy(err.as_bytes()) {
            Cow::Owned(text) => Decoded::Lossy(text),
            Cow::Borrowed(text) => Decoded::Clean(text.to_string()),
        },
    }
}

/// Every regular file below `dir`, in a deterministic order.
///
/// Entries of each directory are visited sorted by name, depth first.
pub fn walk_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_into(dir.as_ref(), &mut files)?;
    Ok(files)
}

fn walk_into(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        let metadata = fs::metadata(&path)?;
        if metadata.is_dir() {
            walk_into(&path, files)?;
        } else if metadata.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

/// Read one file into a site document, together with its decode outcome.
pub fn load_site_document<P: AsRef<Path>>(path: P) -> Result<(SiteDocument, bool)> {
    let path = path.as_ref();
    let decoded = decode_text(fs::read(path)?);
    let lossy = decoded.is_lossy();
    if lossy {
        warn!("{} is not valid UTF-8; indexed with replacement characters", path.display());
    }

    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let document = SiteDocument::new(title, decoded.into_string(), path.to_string_lossy());
    Ok((document, lossy))
}

/// Summary of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Documents staged and committed.
    pub indexed: usize,
    /// How many of those needed replacement characters.
    pub lossy: usize,
    /// Generation produced by the commit.
    pub generation: u64,
}

/// Index every file below `docs_dir` in a single writer transaction.
///
/// Nothing becomes visible unless every file was read and the commit succeeded;
/// staged documents are discarded with the writer on error.
pub fn build_index<P: AsRef<Path>>(docs_dir: P, index: &Index) -> Result<IngestReport> {
    let docs_dir = docs_dir.as_ref();
    let files = walk_documents(docs_dir)?;
    debug!("Found {} files under {}", files.len(), docs_dir.display());

    let mut writer = index.writer()?;
    let mut report = IngestReport::default();

    for path in &files {
        let (document, lossy) = load_site_document(path)?;
        writer.update_document(document)?;
        report.indexed += 1;
        if lossy {
            report.lossy += 1;
        }
    }

    report.generation = writer.commit()?.generation;
    info!(
        "Indexed {} documents from {} (generation {})",
        report.indexed,
        docs_dir.display(),
        report.generation
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SiteField;
    use tempfile::TempDir;

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text(b"wolves".to_vec()), Decoded::Clean("wolves".to_string()));

        let decoded = decode_text(vec![b'a', 0xff, b'b']);
        assert!(decoded.is_lossy());
        assert_eq!(decoded.as_str(), "a\u{fffd}b");
    }

    #[test]
    fn test_walk_is_sorted_and_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("sub").join("c.txt"), "c").unwrap();

        let files = walk_documents(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("sub").join("c.txt")
            ]
        );
    }

    #[test]
    fn test_walk_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(walk_documents(dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_load_site_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wolves.txt");
        fs::write(&path, "wolves run in packs").unwrap();

        let (doc, lossy) = load_site_document(&path).unwrap();
        assert!(!lossy);
        assert_eq!(doc.title, "wolves.txt");
        assert_eq!(doc.content, "wolves run in packs");
        assert_eq!(doc.path, path.to_string_lossy());
    }

    #[test]
    fn test_build_index() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("wolves.txt"), "wolves run in packs").unwrap();
        fs::write(dir.path().join("cats.txt"), "cats run too").unwrap();
        fs::write(dir.path().join("broken.txt"), [b'r', b'u', b'n', 0xfe]).unwrap();

        let index = Index::in_memory(SiteField::schema().unwrap()).unwrap();
        let report = build_index(dir.path(), &index).unwrap();

        assert_eq!(report.indexed, 3);
        assert_eq!(report.lossy, 1);
        assert_eq!(report.generation, 1);
        assert_eq!(index.snapshot().doc_count(), 3);

        let again = build_index(dir.path(), &index).unwrap();
        assert_eq!(again.generation, 2);
        assert_eq!(index.snapshot().doc_count(), 3);
    }
}
