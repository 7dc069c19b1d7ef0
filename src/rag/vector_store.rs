//! In-memory vector store with cosine-similarity search

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;
use tracing::info;

use crate::errors::AiMitraError;
use crate::errors::Result;

/// Floor applied to vector norms so zero vectors do not divide by zero
pub const NORM_EPSILON: f32 = 1e-10;

/// Open key-value metadata stored alongside each vector
pub type Metadata = Map<String, Value>;

/// A single search hit
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: usize,
    pub similarity: f32,
    pub metadata: Metadata,
}

/// On-disk layout: `{dimension, vectors, metadata}`
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    dimension: usize,
    #[serde(default)]
    vectors: Vec<Vec<f32>>,
    #[serde(default)]
    metadata: Vec<Metadata>,
}

/// Append-only store of equal-length vectors.
///
/// Ids are zero-based insertion positions.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorStore {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
    metadata: Vec<Metadata>,
}

impl VectorStore {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
            metadata: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    /// Append a vector and return its id.
    ///
    /// Rejects vectors whose length differs from the store dimension without
    /// touching the store.
    pub fn add(&mut self, vector: Vec<f32>, metadata: Metadata) -> Result<usize> {
        if vector.len() != self.dimension {
            return Err(AiMitraError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let id = self.vectors.len();
        self.vectors.push(vector);
        self.metadata.push(metadata);
        Ok(id)
    }

    /// Return up to `k` hits ordered by descending cosine similarity.
    /// Equal similarities keep insertion order.
    ///
    /// A query whose length differs from the store dimension is rejected
    /// unless the store is empty.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if self.vectors.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(AiMitraError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, vector)| (id, cosine_similarity(query, vector)))
            .collect();

        // NaN scores sort after every finite score
        scored.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
            (false, false) => b.1.total_cmp(&a.1),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        });
        scored.truncate(k);

        debug!("Vector search returned {} of {} records", scored.len(), self.len());

        Ok(scored
            .into_iter()
            .map(|(id, similarity)| SearchHit {
                id,
                similarity,
                metadata: self.metadata[id].clone(),
            })
            .collect())
    }

    /// Write dimension, vectors and metadata as one JSON record
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = StoreFile {
            dimension: self.dimension,
            vectors: self.vectors.clone(),
            metadata: self.metadata.clone(),
        };
        std::fs::write(path.as_ref(), serde_json::to_string(&file)?)?;
        info!(
            "Saved vector store with {} records to {}",
            self.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Replace the in-memory state with the contents of `path`.
    ///
    /// The file is fully validated first; on error the store is unchanged.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let file: StoreFile = serde_json::from_str(&content)?;

        if file.vectors.len() != file.metadata.len() {
            return Err(AiMitraError::VectorStore(format!(
                "{} vectors but {} metadata records",
                file.vectors.len(),
                file.metadata.len()
            )));
        }
        if let Some(bad) = file.vectors.iter().find(|v| v.len() != file.dimension) {
            return Err(AiMitraError::DimensionMismatch {
                expected: file.dimension,
                actual: bad.len(),
            });
        }

        self.dimension = file.dimension;
        self.vectors = file.vectors;
        self.metadata = file.metadata;
        info!(
            "Loaded vector store with {} records from {}",
            self.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Build a store from a saved file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut store = Self::new(0);
        store.load(path)?;
        Ok(store)
    }
}

/// `dot(a, b) / (max(|a|, ε) * max(|b|, ε))`
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt().max(NORM_EPSILON);
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt().max(NORM_EPSILON);
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn meta(name: &str) -> Metadata {
        let mut map = Metadata::new();
        map.insert("name".to_string(), json!(name));
        map
    }

    #[test]
    fn test_add_returns_sequential_ids() {
        let mut store = VectorStore::new(2);
        assert_eq!(store.add(vec![1.0, 0.0], meta("a")).unwrap(), 0);
        assert_eq!(store.add(vec![0.0, 1.0], meta("b")).unwrap(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_rejects_dimension_mismatch() {
        let mut store = VectorStore::new(3);
        store.add(vec![1.0, 2.0, 3.0], meta("ok")).unwrap();

        let err = store.add(vec![1.0, 2.0], meta("short")).unwrap_err();
        assert!(matches!(
            err,
            AiMitraError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.metadata().len(), 1);
    }

    #[test]
    fn test_search_empty_store() {
        let store = VectorStore::new(2);
        assert!(store.search(&[1.0, 0.0], 3).unwrap().is_empty());
        // Any query length is accepted while the store is empty
        assert!(store.search(&[1.0], 3).unwrap().is_empty());
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let mut store = VectorStore::new(2);
        store.add(vec![0.0, 1.0], meta("orthogonal")).unwrap();
        store.add(vec![1.0, 0.1], meta("close")).unwrap();
        store.add(vec![-1.0, 0.0], meta("opposite")).unwrap();

        let hits = store.search(&[1.0, 0.0], 3).unwrap();
        let ids: Vec<usize> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 0, 2]);
        assert!((hits[2].similarity + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_limits_to_k() {
        let mut store = VectorStore::new(1);
        for i in 0..5 {
            store.add(vec![1.0], meta(&i.to_string())).unwrap();
        }
        assert_eq!(store.search(&[1.0], 2).unwrap().len(), 2);
        assert_eq!(store.search(&[1.0], 10).unwrap().len(), 5);
        assert!(store.search(&[1.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut store = VectorStore::new(2);
        store.add(vec![2.0, 0.0], meta("first")).unwrap();
        store.add(vec![1.0, 0.0], meta("second")).unwrap();

        let hits = store.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].id, 0);
        assert_eq!(hits[1].id, 1);
    }

    #[test]
    fn test_nan_scores_sort_last() {
        let mut store = VectorStore::new(2);
        store.add(vec![f32::NAN, 0.0], meta("nan-a")).unwrap();
        store.add(vec![0.0, 1.0], meta("orthogonal")).unwrap();
        store.add(vec![f32::NAN, 1.0], meta("nan-b")).unwrap();
        store.add(vec![1.0, 0.0], meta("match")).unwrap();

        let hits = store.search(&[1.0, 0.0], 4).unwrap();
        let ids: Vec<usize> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![3, 1, 0, 2]);
        assert!(hits[2].similarity.is_nan());
        assert!(hits[3].similarity.is_nan());
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_load_rejects_inconsistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(
            &path,
            r#"{"dimension": 2, "vectors": [[1.0, 2.0], [1.0]], "metadata": [{}, {}]}"#,
        )
        .unwrap();

        let mut store = VectorStore::new(2);
        store.add(vec![0.5, 0.5], meta("kept")).unwrap();
        assert!(store.load(&path).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_rejects_metadata_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"dimension": 1, "vectors": [[1.0]], "metadata": []}"#).unwrap();

        let err = VectorStore::from_file(&path).unwrap_err();
        assert!(matches!(err, AiMitraError::VectorStore(_)));
    }
}
