use std::collections::{BTreeMap, HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use super::{stop_words::StopWords, SimilarityError, TextSimilarityProvider};

lazy_static! {
    // Words of two or more word characters, Unicode aware.
    static ref TOKEN_RE: Regex = Regex::new(r"\b\w\w+\b").expect("token pattern is valid");
}

#[derive(Debug, Clone)]
pub struct TfidfOptions {
    pub max_features: usize,
    pub min_df: usize,
    pub max_df: f64,
    pub stop_words: StopWords,
}

impl Default for TfidfOptions {
    fn default() -> Self {
        Self {
            max_features: 1000,
            min_df: 2,
            max_df: 0.8,
            stop_words: StopWords::Russian,
        }
    }
}

/// TF-IDF cosine similarity. Holds only options; every call fits a fresh vector space on the
/// learner's solved corpus, so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct TfidfSimilarity {
    options: TfidfOptions,
    stop_words: HashSet<&'static str>,
}

impl TfidfSimilarity {
    pub fn new(options: TfidfOptions) -> Self {
        let stop_words = options.stop_words.words();
        Self {
            options,
            stop_words,
        }
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TOKEN_RE
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }

    fn term_counts(&self, text: &str) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for token in self.tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        counts
    }

    /// Fit the vocabulary and idf weights on `corpus`.
    pub fn fit(&self, corpus: &[&str]) -> Result<VectorSpace, SimilarityError> {
        let n_docs = corpus.len();
        if n_docs == 0 {
            return Err(SimilarityError::EmptyCorpus);
        }

        let max_doc_count = self.options.max_df * n_docs as f64;
        if max_doc_count < self.options.min_df as f64 {
            return Err(SimilarityError::DocumentFrequencyBounds {
                max_doc_count,
                min_df: self.options.min_df,
            });
        }

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        let mut term_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in corpus {
            for (term, count) in self.term_counts(doc) {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
                *term_freq.entry(term).or_insert(0) += count;
            }
        }

        let mut kept: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= self.options.min_df && (*df as f64) <= max_doc_count)
            .collect();

        if kept.len() > self.options.max_features {
            kept.sort_by(|(a, _), (b, _)| term_freq[b].cmp(&term_freq[a]).then_with(|| a.cmp(b)));
            kept.truncate(self.options.max_features);
            kept.sort_by(|(a, _), (b, _)| a.cmp(b));
        }

        if kept.is_empty() {
            return Err(SimilarityError::EmptyVocabulary);
        }

        let n = n_docs as f64;
        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (index, (term, df)) in kept.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Ok(VectorSpace { vocabulary, idf })
    }

    pub fn transform(&self, space: &VectorSpace, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; space.idf.len()];
        for (term, count) in self.term_counts(text) {
            if let Some(&index) = space.vocabulary.get(&term) {
                vector[index] = count as f64 * space.idf[index];
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in vector.iter_mut() {
                *value /= norm;
            }
        }
        vector
    }
}

impl Default for TfidfSimilarity {
    fn default() -> Self {
        Self::new(TfidfOptions::default())
    }
}

impl TextSimilarityProvider for TfidfSimilarity {
    fn name(&self) -> &'static str {
        "tfidf"
    }

    fn score(&self, solved: &[&str], candidates: &[&str]) -> Result<Vec<f64>, SimilarityError> {
        let space = self.fit(solved)?;
        let solved_vectors: Vec<Vec<f64>> = solved
            .iter()
            .map(|text| self.transform(&space, text))
            .collect();

        Ok(candidates
            .iter()
            .map(|text| {
                let vector = self.transform(&space, text);
                solved_vectors
                    .iter()
                    .map(|other| cosine(&vector, other))
                    .fold(0.0, f64::max)
            })
            .collect())
    }
}

/// Vocabulary and idf weights fitted on one request's solved corpus.
#[derive(Debug, Clone)]
pub struct VectorSpace {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl VectorSpace {
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }
}

pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
