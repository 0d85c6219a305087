/// Corpus file handling utilities
///
/// This module discovers the documents of a corpus, derives each document's
/// language bucket from its file name and reads document content.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use memmap2::Mmap;
use walkdir::WalkDir;

/// Files above this size are memory-mapped instead of read into a buffer
pub const MMAP_THRESHOLD: u64 = 10 * 1024 * 1024;

/// Error reading a single document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not valid UTF-8: {source}")]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Error enumerating the corpus
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("corpus directory not found: {0}")]
    NotFound(PathBuf),

    #[error("corpus path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// A document of the corpus, before its content is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusDocument {
    /// Location of the file
    pub path: PathBuf,
    /// Language bucket, the first two characters of the file name
    pub language: String,
    /// File size in bytes at discovery time
    pub size: u64,
}

/// Language code of a file name: its first two characters, verbatim.
///
/// Shorter names use the whole name. No validation is applied, so "x_" or
/// "EN" are buckets of their own.
pub fn language_code(file_name: &str) -> String {
    file_name.chars().take(2).collect()
}

/// Find every document of the corpus.
///
/// # Arguments
///
/// * `root` - Corpus directory, walked recursively
/// * `extension` - File extension to accept (without the dot, case-sensitive)
/// * `largest_only` - Keep only the largest file of each language
///
/// # Returns
///
/// Documents sorted by path
pub fn discover_documents(
    root: &Path,
    extension: &str,
    largest_only: bool,
) -> Result<Vec<CorpusDocument>, ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable corpus entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!("Error reading metadata for {}: {}", entry.path().display(), e);
                0
            }
        };

        debug!("Found document {}", entry.path().display());
        documents.push(CorpusDocument {
            path: entry.path().to_path_buf(),
            language: language_code(&file_name),
            size,
        });
    }

    if largest_only {
        documents = largest_per_language(documents);
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(documents)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext == OsStr::new(extension))
        .unwrap_or(false)
}

/// Keep the largest document of each language; the first one found wins a tie
fn largest_per_language(documents: Vec<CorpusDocument>) -> Vec<CorpusDocument> {
    let mut largest: BTreeMap<String, CorpusDocument> = BTreeMap::new();

    for document in documents {
        match largest.get(&document.language) {
            Some(current) if current.size >= document.size => {}
            _ => {
                largest.insert(document.language.clone(), document);
            }
        }
    }

    largest.into_values().collect()
}

/// Run `f` over a document's UTF-8 text.
///
/// Large files are memory-mapped and `f` borrows the mapped text directly.
/// Invalid UTF-8 is an error rather than being replaced, so a mis-encoded
/// book does not skew the counts.
pub fn with_document<T, F>(path: &Path, f: F) -> Result<T, DocumentError>
where
    F: FnOnce(&str) -> T,
{
    let io_error = |source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    };
    let encoding_error = |source| DocumentError::Encoding {
        path: path.to_path_buf(),
        source,
    };

    let size = fs::metadata(path).map_err(io_error)?.len();

    if size > MMAP_THRESHOLD {
        debug!("Memory-mapping large document {} ({} bytes)", path.display(), size);
        let file = File::open(path).map_err(io_error)?;
        // Safety: the corpus is read-only input for the duration of the pass
        let mmap = unsafe { Mmap::map(&file) }.map_err(io_error)?;
        let content = std::str::from_utf8(&mmap).map_err(encoding_error)?;
        return Ok(f(content));
    }

    let bytes = fs::read(path).map_err(io_error)?;
    let content = String::from_utf8(bytes).map_err(|e| encoding_error(e.utf8_error()))?;
    Ok(f(&content))
}
