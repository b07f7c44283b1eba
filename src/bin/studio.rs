//! Line-oriented terminal client for extracting and saving vocabulary.

use anyhow::{Context, Result};
use slowka::{
    ai::{AiClient, LanguageLevel, VocabularyAi},
    auth::{JwtService, Session},
    config::Config,
    repositories::WordRepository,
    vocabulary::WordBank,
    workspace::{BrowserState, ExtractionWorkspace, WordBrowser},
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use uuid::Uuid;

const ENV_ACCESS_TOKEN: &str = "SLOWKA_ACCESS_TOKEN";

const HELP: &str = "\
commands:
  text <polish text>   set the text to analyse
  level <A1..C2>       choose the proficiency level
  levels               list levels
  extract              extract words from the text
  list                 show extracted words
  toggle <n>           select or deselect word n
  all                  select every new word
  save                 save selected words
  phrase <w1 w2 ...>   generate a phrase using the given words
  search <query>       search saved words
  clear                clear the search
  next | prev | page <n>
  words                show the current page of saved words
  quit";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    let bank = Arc::new(WordBank::load(Arc::new(WordRepository::new(pool))).await?);
    let ai: Arc<dyn VocabularyAi> = Arc::new(AiClient::from_config(&config)?);
    let session = resolve_session(&config)?;

    let mut workspace = ExtractionWorkspace::new(ai.clone(), bank.clone(), Some(session.clone()));
    let browser = WordBrowser::new(bank);
    spawn_browser_printer(&browser);
    browser.refresh().await;

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            "text" => {
                workspace.set_text(rest);
                print_validation(&workspace);
            }
            "level" => match rest.parse::<LanguageLevel>() {
                Ok(level) => {
                    workspace.set_level(level);
                    println!("level: {} ({})", level, level.label());
                }
                Err(e) => println!("{}", e),
            },
            "levels" => {
                for level in LanguageLevel::ALL {
                    println!("  {}  {}", level, level.label());
                }
            }
            "extract" => {
                let outcome = workspace.extract().await.map(|_| ());
                match outcome {
                    Ok(()) => print_selections(&workspace),
                    Err(e) => println!("error: {}", e),
                }
            }
            "list" => print_selections(&workspace),
            "toggle" => match rest.parse::<usize>() {
                Ok(n) if n > 0 => match workspace.toggle(n - 1) {
                    Ok(true) => println!("{} selected", n),
                    Ok(false) => println!("{} deselected", n),
                    Err(e) => println!("error: {}", e),
                },
                _ => println!("usage: toggle <n>"),
            },
            "all" => println!("{} selected", workspace.select_all_new()),
            "save" => match workspace.save().await {
                Ok(count) => {
                    println!("saved {} words", count);
                    browser.refresh().await;
                }
                Err(e) => println!("error: {}", e),
            },
            "phrase" => {
                let words: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
                match ai.generate_phrase(Some(session.clone()), &words).await {
                    Ok(phrase) => {
                        println!("{}", phrase.phrase);
                        println!("  uses: {}", phrase.words_used.join(", "));
                    }
                    Err(e) => println!("error: {}", e),
                }
            }
            "search" => browser.set_query(rest),
            "clear" => browser.clear_search().await,
            "next" => {
                browser.next_page().await;
            }
            "prev" => {
                browser.previous_page().await;
            }
            "page" => match rest.parse::<u32>() {
                Ok(page) => {
                    browser.go_to_page(page).await;
                }
                Err(_) => println!("usage: page <n>"),
            },
            "words" => print_words(&browser.state()),
            other => println!("unknown command: {} (try 'help')", other),
        }
    }

    Ok(())
}

/// Use a provider-issued token when given, otherwise mint a local one.
fn resolve_session(config: &Config) -> Result<Session> {
    if let Ok(token) = std::env::var(ENV_ACCESS_TOKEN) {
        return Ok(Session::new(token));
    }

    warn!("{} not set, using a locally signed token", ENV_ACCESS_TOKEN);
    let user_id = Uuid::new_v4();
    let token = JwtService::new(config.jwt_secret()).generate_token(user_id)?;
    Ok(Session::new(token).with_user(user_id.to_string()))
}

fn spawn_browser_printer(browser: &WordBrowser) {
    let mut updates = browser.subscribe();
    tokio::spawn(async move {
        let mut last_printed: Option<(String, u32, i64)> = None;
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.loading {
                continue;
            }
            let key = (state.query.clone(), state.page, state.total_count);
            if last_printed.as_ref() != Some(&key) {
                print_words(&state);
                last_printed = Some(key);
            }
        }
    });
}

fn print_validation(workspace: &ExtractionWorkspace) {
    let count = workspace.word_count();
    println!("words: {}/{}", count.current, count.max);
    for message in workspace.validation().messages() {
        println!("  ! {}", message);
    }
}

fn print_selections(workspace: &ExtractionWorkspace) {
    if let Some(extraction) = workspace.extraction() {
        println!(
            "{} words at {} ({} in text)",
            extraction.words.len(),
            extraction.language_level,
            extraction.total_words
        );
        if !extraction.analysis.is_empty() {
            println!("{}", extraction.analysis);
        }
    }
    for (i, item) in workspace.selections().items().iter().enumerate() {
        let mark = match (item.exists_in_db, item.selected) {
            (true, _) => "saved",
            (false, true) => "[x]",
            (false, false) => "[ ]",
        };
        println!("{:>3}. {:<5} {}", i + 1, mark, item.word);
    }
}

fn print_words(state: &BrowserState) {
    if let Some(error) = &state.last_error {
        println!("error: {}", error);
    }
    let query = if state.query.is_empty() {
        String::new()
    } else {
        format!(" matching '{}'", state.query)
    };
    println!(
        "-- {} saved words{}, page {}/{} --",
        state.total_count,
        query,
        state.page,
        state.total_pages.max(1)
    );
    for word in &state.rows {
        match &word.translated_word {
            Some(translation) => println!("  {} - {}", word.word, translation),
            None => println!("  {}", word.word),
        }
    }
}
