pub mod ollama;
pub mod prompt;

pub use ollama::OllamaChatGenerator;
pub use prompt::{build_prompt, Prompt, PromptOptions};

use synonymizer_core::CoreError;

/// A model that turns a prompt into free text.
pub trait TextGenerator {
    async fn generate(&self, model: &str, prompt: &Prompt) -> Result<String, CoreError>;
}
