//! Command line arguments.

use clap::Parser;
use std::path::PathBuf;
use synonymizer_core::AppConfig;

/// Generate Arabic synonyms with a language model and keep the ones whose
/// embeddings stay close to the original word.
#[derive(Parser, Debug, Clone)]
#[command(name = "synonymizer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct Args {
    /// Word to generate synonyms for
    #[arg(long)]
    pub word: String,

    /// Model to use for generating synonyms [default: aya]
    #[arg(long)]
    pub model: Option<String>,

    /// Model to use for generating embeddings [default: llama3]
    #[arg(long = "embedding_model", visible_alias = "embedding-model")]
    pub embedding_model: Option<String>,

    /// Number of synonyms to generate [default: 10]
    #[arg(long = "num_synonyms", visible_alias = "num-synonyms")]
    pub num_synonyms: Option<usize>,

    /// Cosine similarity threshold for selecting best synonyms [default: 0.8]
    #[arg(
        long = "similarity_threshold",
        visible_alias = "similarity-threshold",
        allow_negative_numbers = true
    )]
    pub similarity_threshold: Option<f32>,

    /// Ollama server URL (overrides OLLAMA_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print each kept synonym with its similarity score
    #[arg(long)]
    pub show_scores: bool,

    /// Send only the user prompt, without the format-enforcing system message
    #[arg(long)]
    pub no_system_prompt: bool,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Flags given on the command line win over file and environment.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.ollama.host = host.clone();
        }
        if let Some(model) = &self.model {
            config.generation.model = model.clone();
        }
        if let Some(count) = self.num_synonyms {
            config.generation.num_synonyms = count;
        }
        if self.no_system_prompt {
            config.generation.system_instruction = false;
        }
        if let Some(model) = &self.embedding_model {
            config.embedding.model = model.clone();
        }
        if let Some(threshold) = self.similarity_threshold {
            config.embedding.similarity_threshold = threshold;
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "synonymizer=debug,synonymizer_core=debug,llm_interface=debug,embedding_engine=debug,refiner=debug"
        } else {
            "synonymizer=info,refiner=info,warn"
        }
    }
}
