use std::collections::HashMap;

/// Sparse document-term entry: `(word index, count in document)`, sorted by index.
pub type BagOfWords = Vec<(usize, u32)>;

/// Bidirectional token <-> index mapping. Indices are handed out in the order
/// tokens are first seen and never change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    token2id: HashMap<String, usize>,
    id2token: Vec<String>,
    dfs: Vec<u32>,
    cfs: Vec<u64>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary from tokenized documents.
    pub fn from_documents(texts: &[Vec<String>]) -> Self {
        let mut dictionary = Self::new();
        for tokens in texts {
            dictionary.add_document(tokens);
        }
        dictionary
    }

    /// Registers the tokens of one document, assigning new indices as needed,
    /// and returns its bag-of-words.
    pub fn add_document(&mut self, tokens: &[String]) -> BagOfWords {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for token in tokens {
            let id = match self.token2id.get(token) {
                Some(&id) => id,
                None => {
                    let id = self.id2token.len();
                    self.token2id.insert(token.clone(), id);
                    self.id2token.push(token.clone());
                    self.dfs.push(0);
                    self.cfs.push(0);
                    id
                }
            };
            *counts.entry(id).or_insert(0) += 1;
        }

        let bow = sorted_bow(counts);
        for &(id, count) in &bow {
            self.dfs[id] += 1;
            self.cfs[id] += u64::from(count);
        }
        bow
    }

    pub fn len(&self) -> usize {
        self.id2token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2token.is_empty()
    }

    pub fn id(&self, token: &str) -> Option<usize> {
        self.token2id.get(token).copied()
    }

    pub fn token(&self, id: usize) -> Option<&str> {
        self.id2token.get(id).map(String::as_str)
    }

    /// Tokens in index order.
    pub fn tokens(&self) -> &[String] {
        &self.id2token
    }

    /// Number of documents containing the token.
    pub fn document_frequency(&self, id: usize) -> Option<u32> {
        self.dfs.get(id).copied()
    }

    /// Number of occurrences of the token across the corpus.
    pub fn collection_frequency(&self, id: usize) -> Option<u64> {
        self.cfs.get(id).copied()
    }
}

fn sorted_bow(counts: HashMap<usize, u32>) -> BagOfWords {
    let mut bow: BagOfWords = counts.into_iter().collect();
    bow.sort_unstable_by_key(|&(id, _)| id);
    bow
}

/// Builds the vocabulary and the document-term list of a tokenized corpus.
pub fn prepare_corpus(texts: &[Vec<String>]) -> (Dictionary, Vec<BagOfWords>) {
    let mut dictionary = Dictionary::new();
    let corpus = texts
        .iter()
        .map(|tokens| dictionary.add_document(tokens))
        .collect();
    (dictionary, corpus)
}
