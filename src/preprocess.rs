use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rayon::prelude::*;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

use crate::error::{Result, TopicError};

/// Fixed English stopword list (NLTK).
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Lowercases, tokenizes on word-character runs, drops stopwords and stems.
pub struct Preprocessor {
    stemmer: Stemmer,
    regex: Regex,
    stopwords: HashSet<String>,
}

impl Preprocessor {
    /// English stemmer and the fixed English stopword list.
    pub fn english() -> Result<Self> {
        Ok(Self {
            stemmer: Stemmer::create(Algorithm::English),
            regex: Regex::new(r"\w+")?,
            stopwords: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        })
    }

    /// Adds user stopwords on top of the fixed list.
    pub fn with_extra_stopwords<I>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.stopwords
            .extend(words.into_iter().map(|w| w.to_lowercase()));
        self
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Lowercased word-character runs, before stopword removal and stemming.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.regex
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }

    /// Full cleaning of a single document.
    pub fn process(&self, text: &str) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .filter(|t| !self.is_stopword(t))
            .map(|t| self.stem(&t))
            .collect()
    }

    /// Processes every document; output order matches input order.
    pub fn process_all(&self, documents: &[String]) -> Vec<Vec<String>> {
        documents.par_iter().map(|doc| self.process(doc)).collect()
    }
}

///Reads an additional stopword file: one word per line, blank lines ignored.
pub fn load_stopwords(path: &Path) -> Result<HashSet<String>> {
    let content = fs::read_to_string(path).map_err(|e| TopicError::io(path, e))?;
    Ok(content
        .lines()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pre() -> Preprocessor {
        Preprocessor::english().unwrap()
    }

    #[test]
    fn tokenize_lowercases_and_splits_on_word_runs() {
        let tokens = pre().tokenize("Hello, World! it's 2024_v2");
        assert_eq!(tokens, vec!["hello", "world", "it", "s", "2024_v2"]);
    }

    #[test]
    fn stopwords_are_removed_before_stemming() {
        let p = pre();
        let out = p.process("The cats are running faster than the dogs");
        assert_eq!(out, vec!["cat", "run", "faster", "dog"]);
        for token in &out {
            assert!(!p.is_stopword(token));
        }
    }

    #[test]
    fn surviving_tokens_equal_stemmer_output() {
        let p = pre();
        let text = "Connections were connected by connecting";
        let expected: Vec<String> = p
            .tokenize(text)
            .iter()
            .filter(|t| !p.is_stopword(t))
            .map(|t| p.stem(t))
            .collect();
        assert_eq!(p.process(text), expected);
        assert_eq!(p.process(text), vec!["connect", "connect", "connect"]);
    }

    #[test]
    fn process_all_keeps_document_order() {
        let docs: Vec<String> = (0..50).map(|i| format!("word{i} tree")).collect();
        let out = pre().process_all(&docs);
        assert_eq!(out.len(), 50);
        for (i, tokens) in out.iter().enumerate() {
            assert_eq!(tokens[0], format!("word{i}"));
        }
    }

    #[test]
    fn extra_stopwords_are_lowercased() {
        let p = pre().with_extra_stopwords(vec!["Tree".to_string()]);
        assert!(p.is_stopword("tree"));
        assert_eq!(p.process("tree house"), vec!["hous"]);
    }

    #[test]
    fn stopword_file_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.txt");
        fs::write(&path, "Alpha\n\n  beta \n").unwrap();
        let words = load_stopwords(&path).unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.contains("alpha") && words.contains("beta"));
    }
}
