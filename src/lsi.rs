//! Latent semantic indexing over bag-of-words counts.
//!
//! The term-document count matrix is decomposed with a truncated SVD taken from
//! the symmetric eigendecomposition of its smaller Gram matrix. Each topic is a
//! left singular vector: one weight per vocabulary entry.

use log::debug;
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::corpus::{BagOfWords, Dictionary};
use crate::error::{Result, TopicError};

const ZERO: f64 = 1e-12;
/// Singular values below this fraction of the leading one count as zero.
/// Squaring in the Gram matrix leaves about 1e-8 of relative noise on sigma.
const RANK_CUTOFF: f64 = 1e-7;

/// One fitted topic with its strongest words.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Topic {
    pub index: usize,
    pub singular_value: f64,
    pub words: Vec<(String, f64)>,
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Topic {} (sigma {:.3}): ", self.index, self.singular_value)?;
        for (i, (word, weight)) in self.words.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{weight:.3}*\"{word}\"")?;
        }
        Ok(())
    }
}

/// Fitted LSI model.
#[derive(Debug, Clone)]
pub struct LsiModel {
    /// topics x terms
    projection: Array2<f64>,
    singular_values: Array1<f64>,
    id2word: Vec<String>,
}

impl LsiModel {
    /// Fits at most `num_topics` topics. Fewer are kept when the matrix rank
    /// is lower than requested.
    pub fn fit(corpus: &[BagOfWords], dictionary: &Dictionary, num_topics: usize) -> Result<Self> {
        if num_topics == 0 {
            return Err(TopicError::InvalidTopicCount(0));
        }
        if corpus.is_empty() || dictionary.is_empty() {
            return Err(TopicError::EmptyCorpus("no terms to decompose"));
        }

        let matrix = term_document_matrix(corpus, dictionary.len())?;
        let (projection, singular_values) = truncated_svd(&matrix, num_topics);
        debug!(
            "LSI fit: requested {} topics, kept {} ({} terms x {} documents)",
            num_topics,
            singular_values.len(),
            matrix.nrows(),
            matrix.ncols()
        );

        Ok(Self {
            projection,
            singular_values,
            id2word: dictionary.tokens().to_vec(),
        })
    }

    /// Number of topics actually fitted.
    pub fn num_topics(&self) -> usize {
        self.projection.nrows()
    }

    pub fn num_terms(&self) -> usize {
        self.projection.ncols()
    }

    /// Topic-term weight matrix (topics x terms).
    pub fn get_topics(&self) -> &Array2<f64> {
        &self.projection
    }

    pub fn singular_values(&self) -> &Array1<f64> {
        &self.singular_values
    }

    /// Indices of the `topn` strongest terms of a topic by absolute weight.
    /// Ties keep the lower index first.
    pub fn top_term_ids(&self, topic: usize, topn: usize) -> Vec<usize> {
        if topic >= self.num_topics() {
            return Vec::new();
        }
        let row = self.projection.row(topic);
        let mut ids: Vec<usize> = (0..row.len()).collect();
        ids.sort_by(|&a, &b| row[b].abs().total_cmp(&row[a].abs()));
        ids.truncate(topn);
        ids
    }

    /// Strongest words of one topic with their weights.
    pub fn show_topic(&self, topic: usize, topn: usize) -> Vec<(String, f64)> {
        self.top_term_ids(topic, topn)
            .into_iter()
            .map(|id| (self.id2word[id].clone(), self.projection[[topic, id]]))
            .collect()
    }

    pub fn show_topics(&self, num_words: usize) -> Vec<Topic> {
        (0..self.num_topics())
            .map(|index| Topic {
                index,
                singular_value: self.singular_values[index],
                words: self.show_topic(index, num_words),
            })
            .collect()
    }

    /// Document coordinates in topic space. Unknown word indices are skipped.
    pub fn project(&self, bow: &BagOfWords) -> Vec<f64> {
        (0..self.num_topics())
            .map(|topic| {
                bow.iter()
                    .filter(|(id, _)| *id < self.num_terms())
                    .map(|&(id, count)| self.projection[[topic, id]] * f64::from(count))
                    .sum()
            })
            .collect()
    }
}

fn term_document_matrix(corpus: &[BagOfWords], num_terms: usize) -> Result<Array2<f64>> {
    let mut matrix = Array2::zeros((num_terms, corpus.len()));
    for (doc, bow) in corpus.iter().enumerate() {
        for &(id, count) in bow {
            if id >= num_terms {
                return Err(TopicError::UnknownTokenId(id));
            }
            matrix[[id, doc]] = f64::from(count);
        }
    }
    Ok(matrix)
}

/// Returns the first `k` left singular vectors as rows, and their singular values.
///
/// With `A` of shape terms x documents, the eigenvectors of `A Aᵀ` are the left
/// singular vectors directly. When documents are fewer, `Aᵀ A` is decomposed
/// instead and each left vector is recovered as `A v / sigma`.
fn truncated_svd(matrix: &Array2<f64>, k: usize) -> (Array2<f64>, Array1<f64>) {
    let (m, n) = matrix.dim();
    let k = k.min(m).min(n);
    let terms_side = m <= n;
    let gram = if terms_side {
        matrix.dot(&matrix.t())
    } else {
        matrix.t().dot(matrix)
    };
    let size = gram.nrows();
    let eigen = SymmetricEigen::new(DMatrix::from_fn(size, size, |i, j| gram[[i, j]]));

    let mut order: Vec<usize> = (0..size).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));
    let sigma_of = |i: usize| eigen.eigenvalues[i].max(0.0).sqrt();
    let leading = order.first().map_or(0.0, |&i| sigma_of(i));

    let mut vectors: Vec<Array1<f64>> = Vec::with_capacity(k);
    let mut values: Vec<f64> = Vec::with_capacity(k);
    for &i in order.iter().take(k) {
        let sigma = sigma_of(i);
        if sigma < ZERO || sigma < leading * RANK_CUTOFF {
            break;
        }
        let eigenvector: Array1<f64> = eigen.eigenvectors.column(i).iter().copied().collect();
        let left = if terms_side {
            eigenvector
        } else {
            let u = matrix.dot(&eigenvector);
            let norm_u = norm(&u);
            u / norm_u
        };
        vectors.push(normalize_sign(left));
        values.push(sigma);
    }

    let mut projection = Array2::zeros((vectors.len(), m));
    for (i, v) in vectors.iter().enumerate() {
        projection.row_mut(i).assign(v);
    }
    (projection, Array1::from(values))
}

fn norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}

/// Flips the vector so its largest-magnitude entry is positive.
fn normalize_sign(v: Array1<f64>) -> Array1<f64> {
    let pivot = v
        .iter()
        .copied()
        .fold(0.0_f64, |acc, x| if x.abs() > acc.abs() { x } else { acc });
    if pivot < 0.0 { -v } else { v }
}
