//! Hash-seeded pseudo-embeddings

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use sha2::Digest;
use sha2::Sha256;

use super::Encoder;

/// Deterministic placeholder encoder.
///
/// The generator is seeded from SHA-256 of the text, so the same text maps to
/// the same vector in every process. Similar texts are NOT close in vector
/// space.
#[derive(Debug, Clone)]
pub struct MockEncoder {
    dimension: usize,
    model_name: String,
}

impl MockEncoder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self::with_model_name(dimension, "all-MiniLM-L6-v2")
    }

    #[must_use]
    pub fn with_model_name(dimension: usize, model_name: impl Into<String>) -> Self {
        Self {
            dimension,
            model_name: model_name.into(),
        }
    }

    /// Name of the model this encoder stands in for
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn seed_for(text: &str) -> u64 {
        let digest = Sha256::digest(text.as_bytes());
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(seed)
    }
}

impl Default for MockEncoder {
    fn default() -> Self {
        Self::new(super::DEFAULT_EMBEDDING_DIM)
    }
}

impl Encoder for MockEncoder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(Self::seed_for(text));
        (0..self.dimension).map(|_| rng.gen::<f32>()).collect()
    }
}
