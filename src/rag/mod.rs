//! RAG (Retrieval-Augmented Generation) module
//!
//! This module indexes the app's static metadata so prompts can be enriched
//! with the in-app destinations most related to a farmer's question:
//! - In-memory vector store with cosine-similarity search and JSON persistence
//! - Context retrieval over navigation routes, the app description and features
//! - Query augmentation with the retrieved navigation routes
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ai_mitra::embeddings::MockEncoder;
//! use ai_mitra::models::AppContext;
//! use ai_mitra::rag::ContextRetriever;
//!
//! let retriever = ContextRetriever::new(&AppContext::default(), Arc::new(MockEncoder::default()), 3)?;
//! assert_eq!(retriever.enhance_query_with_context("wheat")?, "wheat");
//! # Ok::<(), ai_mitra::AiMitraError>(())
//! ```

pub mod retriever;
pub mod vector_store;

pub use retriever::ContextRetriever;
pub use vector_store::cosine_similarity;
pub use vector_store::Metadata;
pub use vector_store::SearchHit;
pub use vector_store::VectorStore;
