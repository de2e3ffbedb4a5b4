#![forbid(unsafe_code)]
//! # LSA Topics CLI
//!
//! Command-line interface for the `lsa_topics` crate. Reads one document per
//! line, selects the number of LSI topics by C_V coherence, fits the final
//! model and writes per-word occurrence counts to CSV.
//!
//! ## Example
//! ```bash
//! cargo run --release -- Test3.txt --dir corpus --max-topics 7 --start 2 --step 3
//! ```
//!
//! See `--help` for all available options.

use clap::Parser;
use log::error;
use lsa_topics::{CoherenceParams, PipelineConfig, PipelineReport, TopicSearch, run_pipeline};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Text file to analyze, one document per line
    file: String,

    /// Directory containing the input file
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Upper bound (exclusive) of the topic counts to try
    #[arg(long, default_value_t = 7)]
    max_topics: usize,

    /// First topic count to try
    #[arg(long, default_value_t = 2)]
    start: usize,

    /// Step between tried topic counts
    #[arg(long, default_value_t = 3)]
    step: usize,

    /// Occurrence report (CSV)
    #[arg(long, default_value = "wordInstances.csv")]
    output: PathBuf,

    /// Optional JSON summary of the run
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Optional path to additional stopword file (.txt, one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        PipelineConfig {
            corpus_dir: self.dir,
            file_name: self.file,
            search: TopicSearch {
                start: self.start,
                stop: self.max_topics,
                step: self.step,
            },
            coherence: CoherenceParams::default(),
            stopwords: self.stopwords,
            report_path: self.output,
            summary_path: self.summary,
        }
    }
}

fn print_report(report: &PipelineReport, config: &PipelineConfig) {
    if let Some(title) = &report.title {
        println!("Title: {title}");
    }
    println!("Vocabulary size: {}", report.vocabulary_size);
    for c in &report.candidates {
        println!(
            "  {} topics requested, {} fitted: coherence {:.4}",
            c.requested_topics, c.fitted_topics, c.coherence
        );
    }
    println!(
        "Final model: {} topics, {} words per topic",
        report.selected_topics, report.words_per_topic
    );
    for topic in &report.topics {
        println!("  {topic}");
    }
    println!(
        "Wrote {} words to {}",
        report.rows.len(),
        config.report_path.display()
    );
}

fn main() {
    env_logger::init();
    let config = Cli::parse().into_config();

    match run_pipeline(&config) {
        Ok(report) => print_report(&report, &config),
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}
