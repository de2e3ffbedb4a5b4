use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Result, TopicError};

/// Number of characters of the last line kept as the corpus title.
pub const TITLE_LEN: usize = 100;

/// Raw documents read from one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCorpus {
    pub documents: Vec<String>,
    /// First [`TITLE_LEN`] characters of the last line read.
    pub title: Option<String>,
}

///Reads `dir/file_name` and returns one trimmed document per line, in file order.
///Empty lines are kept as empty documents. Invalid UTF-8 is decoded lossily.
/// # Example
/// ```
/// use lsa_topics::loader::load_documents;
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("docs.txt"), "first line\n  second line  \n").unwrap();
/// let corpus = load_documents(dir.path(), "docs.txt").unwrap();
/// assert_eq!(corpus.documents, vec!["first line", "second line"]);
/// assert_eq!(corpus.title.as_deref(), Some("second line"));
/// ```
pub fn load_documents(dir: &Path, file_name: &str) -> Result<LoadedCorpus> {
    let path = dir.join(file_name);
    let bytes = fs::read(&path).map_err(|e| TopicError::io(&path, e))?;
    let content = String::from_utf8_lossy(&bytes);

    let documents: Vec<String> = content.lines().map(|l| l.trim().to_string()).collect();
    // the title comes from whatever line was read last
    let title = documents.last().map(|last| title_of(last));

    info!("Loaded {}", path.display());
    println!("Total Number of Documents: {}", documents.len());
    Ok(LoadedCorpus { documents, title })
}

fn title_of(line: &str) -> String {
    line.chars().take(TITLE_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_count() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c.txt"), "one\ntwo\n\nthree").unwrap();
        let corpus = load_documents(dir.path(), "c.txt").unwrap();
        assert_eq!(corpus.documents, vec!["one", "two", "", "three"]);
        assert_eq!(corpus.title.as_deref(), Some("three"));
    }

    #[test]
    fn title_is_truncated_by_chars() {
        let long: String = "ä".repeat(150);
        assert_eq!(title_of(&long).chars().count(), TITLE_LEN);
        assert_eq!(title_of("short"), "short");
    }

    #[test]
    fn crlf_and_whitespace_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c.txt"), "  alpha \r\nbeta\t\r\n").unwrap();
        let corpus = load_documents(dir.path(), "c.txt").unwrap();
        assert_eq!(corpus.documents, vec!["alpha", "beta"]);
    }

    #[test]
    fn empty_file_has_no_title() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();
        let corpus = load_documents(dir.path(), "empty.txt").unwrap();
        assert!(corpus.documents.is_empty());
        assert!(corpus.title.is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_documents(dir.path(), "nope.txt").unwrap_err();
        assert!(matches!(err, TopicError::Io { .. }));
        assert!(err.to_string().contains("nope.txt"));
    }
}
