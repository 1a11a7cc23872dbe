//! Hosted LLM access
//!
//! Generation goes through the [`LlmProvider`] trait so the server can run
//! against OpenAI in production and a canned provider in tests.

pub mod llm;
pub mod openai;

pub use llm::{estimate_cost, Completion, LlmProvider, Usage};
pub use openai::OpenAiClient;
