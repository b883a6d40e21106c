use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dictionary::{
    Dictionary, DictionaryError, DictionaryOptions, LexicalDatabase, LookupCache, LookupResult,
    UnavailableLexicon, WordNet,
};
use tracing_subscriber::EnvFilter;

use settings::AppConfig;
use storage::SqliteCache;
use utilities::{default_output_file, input, str_to_bool};

mod settings;
mod storage;
mod utilities;

#[derive(Parser)]
#[command(name = "definer", about = "Look up pronunciations and definitions for a word")]
struct Cli {
    /// Word to look up; starts an interactive prompt when omitted
    word: Option<String>,
    /// Where to write the JSON result (default: <word>_definitions.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Optional configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = "DEFINER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.log_level)?;
    config.validate()?;

    let lexicon = load_lexicon(&config.wordnet_dir);
    let options = DictionaryOptions {
        api_key: config.api_key().map(str::to_owned),
        cache_ttl: config.cache_ttl(),
        ..DictionaryOptions::default()
    };
    let mut dict = Dictionary::new(options, lexicon)?;
    if let Some(cache) = connect_cache(&config).await {
        dict = dict.with_cache(cache);
    }

    match cli.word {
        Some(word) => {
            let result = dict.lookup(&word).await?;
            let output = cli
                .output
                .unwrap_or_else(|| PathBuf::from(default_output_file(&word)));
            save_to_json(&result, &output)?;
            print_summary(&result, &output);
        }
        None => prompt_loop(&dict).await?,
    }
    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))
}

fn load_lexicon(dir: &Path) -> Arc<dyn LexicalDatabase> {
    match WordNet::load(dir) {
        Ok(wordnet) => Arc::new(wordnet),
        Err(error) => {
            tracing::warn!(%error, "WordNet unavailable; WordNet definitions will be empty");
            Arc::new(UnavailableLexicon::new(error.to_string()))
        }
    }
}

async fn connect_cache(config: &AppConfig) -> Option<Arc<dyn LookupCache>> {
    let url = config.cache_url.as_deref()?;
    match SqliteCache::initialize(url).await {
        Ok(cache) => {
            match cache.purge_expired().await {
                Ok(purged) => tracing::debug!(purged, "purged expired cache entries"),
                Err(error) => tracing::warn!(%error, "failed to purge expired cache entries"),
            }
            tracing::info!(url, "lookup cache enabled");
            Some(Arc::new(cache))
        }
        Err(error) => {
            tracing::warn!(url, %error, "unable to open cache at CACHE_URL; continuing without cache");
            None
        }
    }
}

async fn prompt_loop(dict: &Dictionary) -> anyhow::Result<()> {
    loop {
        let Some(line) = input(">> ")? else {
            println!();
            break;
        };
        let line = line.trim();
        let mut command_parts = line.split_ascii_whitespace();
        if let Some(command) = command_parts.next() {
            match command {
                "exit" | "leave" | "quit" | "e" | "q" | "l" => {
                    break;
                }
                "define" | "find" => {
                    define_word(dict, &command_parts.collect::<Vec<&str>>().join(" ")).await?;
                }
                _ => {
                    println!("Unknown command {command}.");
                }
            }
        }
    }
    Ok(())
}

async fn define_word(dict: &Dictionary, word: &str) -> anyhow::Result<()> {
    match dict.lookup(word).await {
        Ok(result) => {
            print_definition(&result);
            let answer = input("Save this result as JSON? (y/N): ")?;
            if answer.and_then(str_to_bool).unwrap_or(false) {
                let output = PathBuf::from(default_output_file(&result.word));
                match save_to_json(&result, &output) {
                    Ok(()) => println!("Definitions saved to: {}", output.display()),
                    Err(error) => eprintln!("Failed to save the result: {error:#}"),
                }
            }
        }
        Err(DictionaryError::InvalidWord) => {
            println!("Please enter a word to define.");
        }
        Err(other) => {
            println!("Encountered an error while searching for the word definition: {other}");
        }
    }
    Ok(())
}

fn save_to_json(result: &LookupResult, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn print_definition(result: &LookupResult) {
    println!("Showing definition for '{}':", result.word);
    for phonetic in &result.pronunciation.phonetics {
        match (&phonetic.text, &phonetic.audio) {
            (Some(text), Some(audio)) => println!("    \\{text}\\  {audio}"),
            (Some(text), None) => println!("    \\{text}\\"),
            (None, Some(audio)) => println!("    {audio}"),
            (None, None) => {}
        }
    }
    if !result.definitions.wordnet.is_empty() {
        println!("    WordNet:");
        for definition in &result.definitions.wordnet {
            println!("        {definition}");
        }
    }
    if let Some(easton) = &result.definitions.easton {
        println!("    Easton's Bible Dictionary:");
        println!("        {easton}");
    }
    if result.total_definitions() == 0 {
        println!("    No definitions found.");
    }
}

fn print_summary(result: &LookupResult, output: &Path) {
    let easton = if result.definitions.easton.is_some() { "Yes" } else { "No" };
    println!("\nSummary:");
    println!("  Word: {}", result.word);
    println!("  Total definitions found: {}", result.total_definitions());
    println!("  Easton's: {easton}");
    println!("  WordNet: {} definitions", result.definitions.wordnet.len());
    println!("  Pronunciations: {}", result.pronunciation.phonetics.len());
    println!("  Output file: {}", output.display());
}
