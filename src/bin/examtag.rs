use anyhow::{Context, Result};
use clap::Parser;
use examtag::{
    config::Config,
    llm::GeminiProvider,
    models::QuestionEntry,
    tagger::{KeywordSuggester, PromptBuilder, PromptOptions},
    utils,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "examtag")]
#[command(about = "Suggest keywords for one OCR-scanned exam question")]
#[command(version)]
struct Cli {
    /// File containing the OCR text (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Subject the question belongs to
    #[arg(short, long)]
    subject: String,

    /// Question bank (JSON array) to draw few-shot examples from
    #[arg(short, long, value_name = "BANK")]
    examples: Option<PathBuf>,

    /// Maximum number of examples to include (overrides config)
    #[arg(long)]
    max_examples: Option<usize>,

    /// Print the prompt instead of calling the model
    #[arg(long)]
    print_prompt: bool,

    /// Config file (defaults to config/settings.toml or ~/.config/examtag/settings.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn read_ocr_text(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read OCR text: {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read OCR text from stdin")?;
            Ok(buffer)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    utils::init_logging();
    let cli = Cli::parse();
    let config = Config::load_from(cli.config.as_deref())?;

    let ocr_text = read_ocr_text(cli.file.as_ref())?;
    let max_examples = cli.max_examples.unwrap_or(config.suggest.max_examples);

    let examples: Vec<QuestionEntry> = match &cli.examples {
        Some(path) => {
            let bank = utils::read_question_bank(path)?;
            utils::select_examples(&bank, &cli.subject, max_examples)
        }
        None => Vec::new(),
    };
    tracing::info!(subject = %cli.subject, examples = examples.len(), "suggesting keywords");

    let options = PromptOptions::from(&config.suggest);

    if cli.print_prompt {
        let prompt = PromptBuilder::new(&cli.subject)
            .with_options(options)
            .examples(&examples)
            .build(&ocr_text);
        println!("{}", prompt);
        return Ok(());
    }

    let provider = GeminiProvider::from_config(&config)?;
    let suggester = KeywordSuggester::with_options(Arc::new(provider), options);

    let keywords = suggester.suggest_keywords(&ocr_text, &cli.subject, &examples).await;
    if keywords.is_empty() {
        tracing::warn!("no keywords suggested");
    }

    println!("{}", serde_json::to_string(&keywords)?);

    Ok(())
}
