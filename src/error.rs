use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum TopicError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("empty corpus: {0}")]
    EmptyCorpus(&'static str),

    #[error("empty topic-count search range: start {start}, stop {stop}, step {step}")]
    EmptySearchRange {
        start: usize,
        stop: usize,
        step: usize,
    },

    #[error("invalid topic count {0}, a model needs at least one topic")]
    InvalidTopicCount(usize),

    #[error("word index {0} is not in the dictionary")]
    UnknownTokenId(usize),

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl TopicError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TopicError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = core::result::Result<T, TopicError>;
