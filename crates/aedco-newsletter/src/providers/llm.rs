//! LLM provider trait for newsletter generation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Price per 1000 prompt tokens in USD
const PROMPT_COST_PER_1K: f64 = 0.03;
/// Price per 1000 completion tokens in USD
const COMPLETION_COST_PER_1K: f64 = 0.06;

/// Token accounting reported by the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Text returned by a chat completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub content: String,
    pub usage: Usage,
}

/// Trait for chat-style text generation
///
/// Implementations:
/// - `OpenAiClient`: OpenAI chat completions API
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one system + user exchange
    async fn complete(&self, system: &str, user: &str) -> Result<Completion>;

    /// Check if the provider is reachable and the key is accepted
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

/// Approximate request cost in USD, rounded to 4 decimals
pub fn estimate_cost(usage: &Usage) -> f64 {
    let prompt = usage.prompt_tokens as f64 / 1000.0 * PROMPT_COST_PER_1K;
    let completion = usage.completion_tokens as f64 / 1000.0 * COMPLETION_COST_PER_1K;
    ((prompt + completion) * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_cost() {
        let usage = Usage {
            prompt_tokens: 2500,
            completion_tokens: 6000,
            total_tokens: 8500,
        };
        // 0.075 + 0.36
        assert!((estimate_cost(&usage) - 0.435).abs() < 1e-9);

        let tiny = Usage {
            prompt_tokens: 1,
            completion_tokens: 1,
            total_tokens: 2,
        };
        assert!((estimate_cost(&tiny) - 0.0001).abs() < 1e-9);
        assert_eq!(estimate_cost(&Usage::default()), 0.0);
    }
}
