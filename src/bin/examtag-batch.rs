use anyhow::Result;
use clap::Parser;
use examtag::{
    config::Config,
    llm::GeminiProvider,
    tagger::{KeywordSuggester, PromptOptions},
    utils,
};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "examtag-batch")]
#[command(about = "Suggest keywords for every untagged question in a question bank")]
#[command(version)]
struct Cli {
    /// Question bank (JSON array of entries with ocrText and keywords)
    #[arg(value_name = "BANK")]
    bank: PathBuf,

    /// Subject for entries that do not name one
    #[arg(short, long)]
    subject: String,

    /// Maximum number of examples per request (overrides config)
    #[arg(long)]
    max_examples: Option<usize>,

    /// Concurrent requests (overrides config)
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Write the updated bank here instead of overwriting BANK
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List the questions that would be tagged without calling the model
    #[arg(long)]
    dry_run: bool,

    /// Config file (defaults to config/settings.toml or ~/.config/examtag/settings.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    utils::init_logging();
    let cli = Cli::parse();
    let config = Config::load_from(cli.config.as_deref())?;

    let mut bank = utils::read_question_bank(&cli.bank)?;
    let max_examples = cli.max_examples.unwrap_or(config.suggest.max_examples);
    let concurrency = cli.concurrency.unwrap_or(config.suggest.concurrency).max(1);

    let pending: Vec<usize> = bank
        .iter()
        .enumerate()
        .filter(|(_, e)| e.has_text() && !e.is_tagged())
        .map(|(i, _)| i)
        .collect();

    println!(
        "{} questions in bank, {} to tag",
        bank.len(),
        pending.len()
    );

    if cli.dry_run {
        for &i in &pending {
            let entry = &bank[i];
            let label = entry.id.clone().unwrap_or_else(|| format!("#{}", i));
            let subject = entry.subject.as_deref().unwrap_or(&cli.subject);
            println!("  would tag {} ({})", label, subject);
        }
        return Ok(());
    }

    if pending.is_empty() {
        return Ok(());
    }

    let provider = GeminiProvider::from_config(&config)?;
    let suggester = KeywordSuggester::with_options(Arc::new(provider), PromptOptions::from(&config.suggest));

    // Build every request up front so the bank is only borrowed immutably while requests run
    let jobs: Vec<_> = pending
        .iter()
        .map(|&i| {
            let entry = &bank[i];
            let subject = entry.subject.clone().unwrap_or_else(|| cli.subject.clone());
            let examples = utils::select_examples(&bank, &subject, max_examples);
            let text = entry.ocr_text.clone().unwrap_or_default();
            (i, subject, text, examples)
        })
        .collect();

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} questions ({msg})")?
            .progress_chars("#>-"),
    );

    let results: Vec<(usize, Vec<String>)> = stream::iter(jobs)
        .map(|(i, subject, text, examples)| {
            let suggester = suggester.clone();
            let pb = pb.clone();
            async move {
                let keywords = suggester.suggest_keywords(&text, &subject, &examples).await;
                pb.inc(1);
                (i, keywords)
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut tagged = 0;
    let mut failed = 0;
    for (i, keywords) in results {
        if keywords.is_empty() {
            failed += 1;
        } else {
            tagged += 1;
            bank[i].keywords = keywords;
        }
    }
    pb.finish_with_message(format!("{} tagged, {} without suggestions", tagged, failed));

    let output = cli.output.unwrap_or(cli.bank);
    utils::write_question_bank(&output, &bank)?;
    println!("✓ Wrote {} ({} tagged, {} without suggestions)", output.display(), tagged, failed);

    Ok(())
}
