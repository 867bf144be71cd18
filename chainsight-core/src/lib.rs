pub mod completion;
pub mod config;
pub mod prompt;

pub use completion::{ChatCompletionClient, CompletionError};
pub use config::{HttpConfig, InsightConfig, LimitsConfig, OpenAiConfig};
pub use prompt::{compose_prompt, SYSTEM_PROMPT};
