//! LLM integration
//!
//! Prompt construction, the messages API client and extraction of the
//! `{message, tags}` object from whatever text the model returns.

pub mod client;
pub mod prompts;
pub mod response;

pub use client::LlmClient;
pub use client::Message;
pub use prompts::build_system_prompt;
pub use prompts::FarmingPrompts;
pub use prompts::PromptTemplate;
pub use response::parse_model_output;
pub use response::LlmReply;
