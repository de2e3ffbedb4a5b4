//! Latent semantic topic modeling over a line-per-document text corpus.
//!
//! The pipeline loads documents, cleans and stems them, builds a bag-of-words
//! corpus, picks a topic count by C_V coherence, refits a final LSI model and
//! writes corpus-wide word occurrence counts to CSV.

use std::path::PathBuf;

use log::{debug, info};

pub mod coherence;
pub mod corpus;
pub mod error;
pub mod loader;
pub mod lsi;
pub mod preprocess;
pub mod report;
pub mod selection;

pub use coherence::CoherenceParams;
pub use corpus::{BagOfWords, Dictionary, prepare_corpus};
pub use error::{Result, TopicError};
pub use loader::{LoadedCorpus, load_documents};
pub use lsi::{LsiModel, Topic};
pub use preprocess::{Preprocessor, load_stopwords};
pub use report::{
    OccurrenceRow, RunSummary, VocabularyEntry, aggregate_occurrences, save_occurrence_report,
    save_summary, vocabulary_entries,
};
pub use selection::{Candidate, CandidateScore, TopicSearch, best_candidate, words_per_topic};

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub corpus_dir: PathBuf,
    pub file_name: String,
    pub search: TopicSearch,
    pub coherence: CoherenceParams,
    /// Additional stopword file, one word per line.
    pub stopwords: Option<PathBuf>,
    pub report_path: PathBuf,
    /// Optional JSON summary of the run.
    pub summary_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("."),
            file_name: "Test3.txt".to_string(),
            search: TopicSearch::default(),
            coherence: CoherenceParams::default(),
            stopwords: None,
            report_path: PathBuf::from("wordInstances.csv"),
            summary_path: None,
        }
    }
}

/// Outcome of [`run_pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub document_count: usize,
    pub title: Option<String>,
    pub vocabulary_size: usize,
    pub candidates: Vec<CandidateScore>,
    /// Topic count of the final model.
    pub selected_topics: usize,
    pub words_per_topic: usize,
    pub topics: Vec<Topic>,
    /// Each document projected onto the final model's topics.
    pub document_topics: Vec<Vec<f64>>,
    pub rows: Vec<OccurrenceRow>,
    pub vocabulary: Vec<VocabularyEntry>,
}

///Runs every stage in order and writes the occurrence report (and the summary, if configured).
///The search range is checked before any input is read.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    config.search.candidates()?;

    let LoadedCorpus { documents, title } =
        load_documents(&config.corpus_dir, &config.file_name)?;
    if documents.is_empty() {
        return Err(TopicError::EmptyCorpus("the input file has no documents"));
    }

    let mut preprocessor = Preprocessor::english()?;
    if let Some(path) = &config.stopwords {
        preprocessor = preprocessor.with_extra_stopwords(load_stopwords(path)?);
    }
    let texts = preprocessor.process_all(&documents);

    let (dictionary, corpus) = prepare_corpus(&texts);
    if dictionary.is_empty() {
        return Err(TopicError::EmptyCorpus(
            "no tokens left after stopword removal",
        ));
    }
    info!(
        "Dictionary has {} unique tokens over {} documents",
        dictionary.len(),
        corpus.len()
    );

    let candidates = selection::compute_coherence_values(
        &dictionary,
        &corpus,
        &texts,
        &config.search,
        &config.coherence,
    )?;
    let scores: Vec<f64> = candidates.iter().map(|c| c.coherence).collect();
    let best = best_candidate(&scores).ok_or(TopicError::EmptySearchRange {
        start: config.search.start,
        stop: config.search.stop,
        step: config.search.step,
    })?;
    let chosen = &candidates[best];
    info!(
        "Selected {} topics (requested {}) with coherence {:.4}",
        chosen.fitted_topics(),
        chosen.requested_topics,
        chosen.coherence
    );

    let selected_topics = chosen.fitted_topics();
    let words_per_topic = words_per_topic(dictionary.len(), selected_topics);
    let model = LsiModel::fit(&corpus, &dictionary, selected_topics)?;
    let topics = model.show_topics(words_per_topic);
    for topic in &topics {
        debug!("{topic}");
    }
    let document_topics: Vec<Vec<f64>> = corpus.iter().map(|bow| model.project(bow)).collect();

    let rows = aggregate_occurrences(&corpus, &dictionary)?;
    save_occurrence_report(&rows, &config.report_path)?;
    info!(
        "Wrote {} rows to {}",
        rows.len(),
        config.report_path.display()
    );

    let vocabulary = vocabulary_entries(&rows, &dictionary)?;

    let report = PipelineReport {
        document_count: documents.len(),
        title,
        vocabulary_size: dictionary.len(),
        candidates: candidates.iter().map(Candidate::score).collect(),
        selected_topics: model.num_topics(),
        words_per_topic,
        topics,
        document_topics,
        rows,
        vocabulary,
    };

    if let Some(path) = &config.summary_path {
        save_summary(&report.summary(), path)?;
        info!("Wrote run summary to {}", path.display());
    }

    Ok(report)
}

impl PipelineReport {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            generated_at: RunSummary::timestamp(),
            title: self.title.clone(),
            documents: self.document_count,
            vocabulary_size: self.vocabulary_size,
            candidates: self.candidates.clone(),
            selected_topics: self.selected_topics,
            words_per_topic: self.words_per_topic,
            topics: self.topics.clone(),
            document_topics: self.document_topics.clone(),
            vocabulary: self.vocabulary.clone(),
        }
    }
}
