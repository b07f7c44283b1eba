use anyhow::Result;
use slowka::{
    config::Config, repositories::WordRepository, selection::SelectionSet, validation,
    vocabulary::WordBank,
};
use std::sync::Arc;

/// Demo program that validates a text, reconciles its words against the
/// stored vocabulary and saves the new ones, without calling the AI service.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Create database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(config.database_url())
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let text = "Dzisiaj kot śpi na oknie, a pies czeka w ogrodzie.";
    let report = validation::validate(text);
    let count = validation::word_count(text);
    println!("Text: {}", text);
    println!("Words: {}/{}, valid: {}", count.current, count.max, report.is_valid());
    if !report.is_valid() {
        for message in report.messages() {
            println!("  {}", message);
        }
        return Ok(());
    }

    let bank = WordBank::load(Arc::new(WordRepository::new(pool))).await?;

    // Stand-in for the AI extraction: every word, lower-cased, without punctuation.
    let candidates: Vec<String> = validation::words(text)
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .collect();

    let mut selections: SelectionSet = bank.reconcile(candidates.as_slice()).await;
    for item in selections.items() {
        let status = if item.exists_in_db { "known" } else { "new" };
        println!("  {:<12} {}", item.word, status);
    }

    if selections.select_all_new() == 0 {
        println!("Nothing new to save.");
        return Ok(());
    }

    let saved = bank.save_selected(&selections).await?;
    println!("Saved {} words.", saved.len());
    println!("Browse them with: cargo run --bin studio");

    Ok(())
}
