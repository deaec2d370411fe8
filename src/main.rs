use std::env;
use std::io::{self, Write};

use anyhow::{Context, Result, bail};

use movie_lookup::{LookupClient, LookupConfig, LookupOutcome};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("✗ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    println!("Movie Lookup Tool");
    println!("=================");

    let api_key = env::var("MOVIE_API_KEY")
        .context("MOVIE_API_KEY is not set; export your provider API key first")?;

    let mut config = LookupConfig::new(api_key);
    if let Ok(base_url) = env::var("MOVIE_API_BASE_URL") {
        config = config.base_url(base_url);
    }
    let client = LookupClient::new(config)?;

    let title = prompt("Enter in the exact movie name: ")?;
    if title.is_empty() {
        bail!("movie name must not be empty");
    }

    let fields: Vec<String> = prompt("What information do you want? ")?
        .split_whitespace()
        .map(str::to_string)
        .collect();

    match client.lookup(&title, &fields).await? {
        LookupOutcome::Matched(movie) => {
            println!();
            println!("✓ Found: {}", movie.title);
            println!("Poster: {}", movie.poster_url);
            for (name, value) in &movie.fields {
                println!("{}: {}", name, value);
            }
        }
        LookupOutcome::NotFound => {
            println!("Movie not found");
        }
    }

    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    Ok(line.trim().to_string())
}
