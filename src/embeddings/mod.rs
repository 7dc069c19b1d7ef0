//! Text embedding module
//!
//! Retrieval only depends on the [`Encoder`] contract: text in, fixed-length
//! vector out. The bundled [`MockEncoder`] is a deterministic stand-in and
//! must be replaced by a real sentence-embedding model for semantic search.
//!
//! # Examples
//!
//! ```rust
//! use ai_mitra::embeddings::{Encoder, MockEncoder};
//!
//! let encoder = MockEncoder::new(384);
//! let embedding = encoder.encode("When should I sow wheat?");
//! assert_eq!(embedding.len(), 384);
//! ```

pub mod mock;

pub use mock::MockEncoder;

/// Default embedding dimension for all-MiniLM-L6-v2 sized vectors
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Produces fixed-length vectors from text
pub trait Encoder: Send + Sync {
    /// Length of every vector returned by [`Encoder::encode`]
    fn dimension(&self) -> usize;

    /// Encode a single text
    fn encode(&self, text: &str) -> Vec<f32>;

    /// Encode several texts, preserving order
    fn encode_batch(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}
