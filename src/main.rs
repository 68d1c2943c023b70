mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Args;
use embedding_engine::OllamaEmbedder;
use llm_interface::{OllamaChatGenerator, PromptOptions};
use refiner::{RefineRequest, SynonymRefiner};
use std::process::ExitCode;
use synonymizer_core::{AppConfig, CoreError, ErrorReporter, OllamaHttp};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            if let Some(core) = err.downcast_ref::<CoreError>() {
                let hint = ErrorReporter::new().report_error(core);
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())
        .map_err(CoreError::from)
        .context("loading configuration")?;
    args.apply_to(&mut config);
    config.validate().map_err(CoreError::from)?;

    tracing::info!(
        "Refining synonyms for {} with {} / {} via {}",
        args.word,
        config.generation.model,
        config.embedding.model,
        config.ollama.host
    );

    let http = OllamaHttp::new(&config.ollama)?;
    let refiner = SynonymRefiner::new(
        OllamaChatGenerator::from_http(http.clone()),
        OllamaEmbedder::from_http(http),
    )
    .with_prompt_options(PromptOptions {
        system_instruction: config.generation.system_instruction,
    })
    .with_retry(config.retry.clone());

    let request = RefineRequest::from_config(&args.word, &config);

    let output = if args.show_scores {
        let scored = refiner.refine_scored(&request).await?;
        serde_json::to_string(&scored)?
    } else {
        let synonyms = refiner.refine(&request).await?;
        serde_json::to_string(&synonyms)?
    };

    println!("{output}");
    Ok(())
}
