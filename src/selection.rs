use log::{debug, warn};
use serde::Serialize;

use crate::coherence::{CoherenceParams, cv_coherence};
use crate::corpus::{BagOfWords, Dictionary};
use crate::error::{Result, TopicError};
use crate::lsi::LsiModel;

/// Topic counts to try: `start, start + step, ...` below `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicSearch {
    pub start: usize,
    pub stop: usize,
    pub step: usize,
}

impl Default for TopicSearch {
    fn default() -> Self {
        Self {
            start: 2,
            stop: 7,
            step: 3,
        }
    }
}

impl TopicSearch {
    ///Enumerates the candidate topic counts, failing when there are none.
    /// # Example
    /// ```
    /// use lsa_topics::selection::TopicSearch;
    /// let search = TopicSearch { start: 2, stop: 7, step: 3 };
    /// assert_eq!(search.candidates().unwrap(), vec![2, 5]);
    /// ```
    pub fn candidates(&self) -> Result<Vec<usize>> {
        if self.step == 0 || self.stop <= self.start {
            return Err(TopicError::EmptySearchRange {
                start: self.start,
                stop: self.stop,
                step: self.step,
            });
        }
        if self.start == 0 {
            return Err(TopicError::InvalidTopicCount(0));
        }
        Ok((self.start..self.stop).step_by(self.step).collect())
    }
}

/// A fitted model together with its coherence score.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub requested_topics: usize,
    pub coherence: f64,
    pub model: LsiModel,
}

impl Candidate {
    pub fn fitted_topics(&self) -> usize {
        self.model.num_topics()
    }

    pub fn score(&self) -> CandidateScore {
        CandidateScore {
            requested_topics: self.requested_topics,
            fitted_topics: self.fitted_topics(),
            coherence: self.coherence,
        }
    }
}

/// Serializable summary of a [`Candidate`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct CandidateScore {
    pub requested_topics: usize,
    pub fitted_topics: usize,
    pub coherence: f64,
}

/// Fits one model per candidate topic count and scores it, in search order.
pub fn compute_coherence_values(
    dictionary: &Dictionary,
    corpus: &[BagOfWords],
    texts: &[Vec<String>],
    search: &TopicSearch,
    params: &CoherenceParams,
) -> Result<Vec<Candidate>> {
    search
        .candidates()?
        .into_iter()
        .map(|requested_topics| {
            let model = LsiModel::fit(corpus, dictionary, requested_topics)?;
            let coherence = cv_coherence(&model, texts, dictionary, params);
            if coherence.is_nan() {
                warn!("Coherence for {requested_topics} topics is undefined");
            }
            debug!(
                "{} topics requested, {} fitted, coherence {:.4}",
                requested_topics,
                model.num_topics(),
                coherence
            );
            Ok(Candidate {
                requested_topics,
                coherence,
                model,
            })
        })
        .collect()
}

///Index of the highest score. A later score must be strictly greater to win,
///so ties keep the earliest. NaN never wins; if no score is comparable the
///first index is returned. `None` only for an empty slice.
/// # Example
/// ```
/// use lsa_topics::selection::best_candidate;
/// assert_eq!(best_candidate(&[0.3, 0.5, 0.5, 0.1]), Some(1));
/// ```
pub fn best_candidate(scores: &[f64]) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }
    let best = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &s)| match best {
            Some((_, top)) if s <= top => best,
            _ => Some((i, s)),
        });
    Some(best.map_or(0, |(i, _)| i))
}

/// Vocabulary size divided by the topic count, at least one word.
pub fn words_per_topic(vocabulary_size: usize, num_topics: usize) -> usize {
    (vocabulary_size / num_topics.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::prepare_corpus;

    #[test]
    fn default_search_matches_two_and_five() {
        assert_eq!(TopicSearch::default().candidates().unwrap(), vec![2, 5]);
    }

    #[test]
    fn empty_ranges_are_errors() {
        for search in [
            TopicSearch { start: 5, stop: 5, step: 1 },
            TopicSearch { start: 6, stop: 2, step: 1 },
            TopicSearch { start: 2, stop: 7, step: 0 },
        ] {
            assert!(matches!(
                search.candidates(),
                Err(TopicError::EmptySearchRange { .. })
            ));
        }
    }

    #[test]
    fn zero_start_is_invalid() {
        let search = TopicSearch { start: 0, stop: 3, step: 1 };
        assert!(matches!(
            search.candidates(),
            Err(TopicError::InvalidTopicCount(0))
        ));
    }

    #[test]
    fn arg_max_picks_the_maximum() {
        assert_eq!(best_candidate(&[0.1, 0.7, 0.3]), Some(1));
        assert_eq!(best_candidate(&[-0.4, -0.2, -0.9]), Some(1));
    }

    #[test]
    fn arg_max_ties_keep_first_seen() {
        assert_eq!(best_candidate(&[0.5, 0.5]), Some(0));
        assert_eq!(best_candidate(&[0.2, 0.6, 0.1, 0.6]), Some(1));
    }

    #[test]
    fn arg_max_skips_nan() {
        assert_eq!(best_candidate(&[f64::NAN, 0.2, 0.1]), Some(1));
        assert_eq!(best_candidate(&[f64::NAN, f64::NAN]), Some(0));
        assert_eq!(best_candidate(&[]), None);
    }

    #[test]
    fn words_budget_never_hits_zero() {
        assert_eq!(words_per_topic(10, 3), 3);
        assert_eq!(words_per_topic(2, 5), 1);
        assert_eq!(words_per_topic(4, 0), 4);
    }

    #[test]
    fn candidates_are_scored_in_search_order() {
        let texts: Vec<Vec<String>> = ["apple banana apple", "banana cherry", "cherry date date"]
            .iter()
            .map(|d| d.split_whitespace().map(String::from).collect())
            .collect();
        let (dict, corpus) = prepare_corpus(&texts);
        let search = TopicSearch { start: 1, stop: 4, step: 1 };
        let candidates =
            compute_coherence_values(&dict, &corpus, &texts, &search, &CoherenceParams::default())
                .unwrap();
        let requested: Vec<usize> = candidates.iter().map(|c| c.requested_topics).collect();
        assert_eq!(requested, vec![1, 2, 3]);
        for c in &candidates {
            assert!(c.fitted_topics() <= c.requested_topics);
            assert!(c.coherence.is_finite());
        }
    }
}
