use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use csv::WriterBuilder;
use serde::Serialize;

use crate::corpus::{BagOfWords, Dictionary};
use crate::error::{Result, TopicError};
use crate::lsi::Topic;
use crate::selection::CandidateScore;

/// Corpus-wide occurrence count of one vocabulary entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OccurrenceRow {
    #[serde(rename = "word index")]
    pub index: usize,
    pub word: String,
    pub occurrences: u64,
}

///Sums the per-document counts of every word index, one row per index seen,
///ordered by index. Word names are looked up by index.
pub fn aggregate_occurrences(
    corpus: &[BagOfWords],
    dictionary: &Dictionary,
) -> Result<Vec<OccurrenceRow>> {
    let mut totals: BTreeMap<usize, u64> = BTreeMap::new();
    for bow in corpus {
        for &(index, count) in bow {
            *totals.entry(index).or_insert(0) += u64::from(count);
        }
    }

    totals
        .into_iter()
        .map(|(index, occurrences)| {
            let word = dictionary
                .token(index)
                .ok_or(TopicError::UnknownTokenId(index))?;
            Ok(OccurrenceRow {
                index,
                word: word.to_string(),
                occurrences,
            })
        })
        .collect()
}

/// Writes the rows as CSV with the header `word index,word,occurrences`.
pub fn write_occurrence_report<W: Write>(rows: &[OccurrenceRow], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["word index", "word", "occurrences"])?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn save_occurrence_report(rows: &[OccurrenceRow], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| TopicError::io(path, e))?;
    write_occurrence_report(rows, file)
}

/// Per-word statistics listed in the run summary.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub index: usize,
    pub word: String,
    pub document_frequency: u32,
    pub occurrences: u64,
}

///Joins occurrence rows with the dictionary's document frequencies.
pub fn vocabulary_entries(
    rows: &[OccurrenceRow],
    dictionary: &Dictionary,
) -> Result<Vec<VocabularyEntry>> {
    rows.iter()
        .map(|row| {
            let document_frequency = dictionary
                .document_frequency(row.index)
                .ok_or(TopicError::UnknownTokenId(row.index))?;
            Ok(VocabularyEntry {
                index: row.index,
                word: row.word.clone(),
                document_frequency,
                occurrences: row.occurrences,
            })
        })
        .collect()
}

/// JSON summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub title: Option<String>,
    pub documents: usize,
    pub vocabulary_size: usize,
    pub candidates: Vec<CandidateScore>,
    pub selected_topics: usize,
    pub words_per_topic: usize,
    pub topics: Vec<Topic>,
    /// Coordinates of each document in the final model's topic space.
    pub document_topics: Vec<Vec<f64>>,
    pub vocabulary: Vec<VocabularyEntry>,
}

impl RunSummary {
    pub fn timestamp() -> String {
        let local: DateTime<Local> = Local::now();
        local.to_rfc3339()
    }
}

pub fn save_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| TopicError::io(path, e))?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::prepare_corpus;

    fn texts(raw: &[&str]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.split_whitespace().map(String::from).collect())
            .collect()
    }

    #[test]
    fn counts_sum_across_documents() {
        let (dict, corpus) = prepare_corpus(&texts(&["cat run fast", "dog run faster cat", "run"]));
        let rows = aggregate_occurrences(&corpus, &dict).unwrap();
        assert_eq!(rows.len(), dict.len());
        let run = rows.iter().find(|r| r.word == "run").unwrap();
        assert_eq!(run.occurrences, 3);
        for row in &rows {
            assert_eq!(Some(row.occurrences), dict.collection_frequency(row.index));
            assert_eq!(dict.token(row.index), Some(row.word.as_str()));
        }
    }

    #[test]
    fn names_follow_index_not_encounter_order() {
        // "b" (index 1) is met before "a" (index 0) in the corpus
        let dict = Dictionary::from_documents(&texts(&["a b"]));
        let corpus = vec![vec![(1, 4)], vec![(0, 2), (1, 1)]];
        let rows = aggregate_occurrences(&corpus, &dict).unwrap();
        assert_eq!(
            rows,
            vec![
                OccurrenceRow { index: 0, word: "a".into(), occurrences: 2 },
                OccurrenceRow { index: 1, word: "b".into(), occurrences: 5 },
            ]
        );
    }

    #[test]
    fn unknown_index_is_an_error() {
        let dict = Dictionary::from_documents(&texts(&["a"]));
        let err = aggregate_occurrences(&[vec![(7, 1)]], &dict).unwrap_err();
        assert!(matches!(err, TopicError::UnknownTokenId(7)));
    }

    #[test]
    fn vocabulary_entries_carry_document_frequency() {
        let (dict, corpus) = prepare_corpus(&texts(&["a a b", "a c", "c"]));
        let rows = aggregate_occurrences(&corpus, &dict).unwrap();
        let entries = vocabulary_entries(&rows, &dict).unwrap();
        let freq: Vec<(&str, u32, u64)> = entries
            .iter()
            .map(|e| (e.word.as_str(), e.document_frequency, e.occurrences))
            .collect();
        assert_eq!(freq, vec![("a", 2, 3), ("b", 1, 1), ("c", 2, 2)]);
    }

    #[test]
    fn csv_has_expected_header_and_rows() {
        let rows = vec![
            OccurrenceRow { index: 0, word: "cat".into(), occurrences: 2 },
            OccurrenceRow { index: 1, word: "run".into(), occurrences: 2 },
        ];
        let mut buf = Vec::new();
        write_occurrence_report(&rows, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "word index,word,occurrences\n0,cat,2\n1,run,2\n");
    }

    #[test]
    fn empty_report_still_has_header() {
        let mut buf = Vec::new();
        write_occurrence_report(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "word index,word,occurrences\n");
    }
}
