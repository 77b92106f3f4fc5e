use std::{
    path::PathBuf,
    process,
    time::Instant,
};

use clap::Parser;
use okurigo::{
    checkpoint::Checkpoint,
    config::RunConfig,
    engine::{
        Interrupt,
        SyncEngine,
    },
    iknow::{
        IknowClient,
        DEFAULT_BASE_URL,
    },
    source,
    translit::KanaTransliterator,
};

/// Imports a vocabulary export into custom flashcard courses, resumably.
#[derive(Parser)]
#[command(name = "okurigo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the run configuration (cookies, csrf_token, word_source)
    #[arg(long, default_value = "generation_info.json")]
    config: PathBuf,

    /// Checkpoint file read at startup and rewritten on exit
    #[arg(long, default_value = "prior_results.json")]
    checkpoint: PathBuf,

    /// Root URL of the course service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match RunConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => fail(&format!("Could not read run configuration: {}", e)),
    };

    let checkpoint = match Checkpoint::load(&cli.checkpoint) {
        Ok(checkpoint) => checkpoint,
        Err(e) => fail(&e.to_string()),
    };
    if checkpoint.added.is_empty() && checkpoint.courses.is_empty() {
        println!("No prior results found. Starting fresh.");
    }

    let books = match source::load_books(&config.word_source) {
        Ok(books) => books,
        Err(e) => fail(&format!("Could not read the word source: {}", e)),
    };

    let client = match IknowClient::new(&cli.base_url, &config.cookies, &config.csrf_token) {
        Ok(client) => client,
        Err(e) => fail(&e.to_string()),
    };

    // Ctrl-c only sets the flag; the engine stops at its next safe point and
    // the checkpoint below is still written before exit.
    let interrupt = Interrupt::new();
    {
        let interrupt = interrupt.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Interrupt received; finishing the request in flight...");
                interrupt.trigger();
            }
        });
    }

    println!("Starting import of {} book(s)...", books.len());
    let start = Instant::now();

    let engine = SyncEngine::new(client, KanaTransliterator, interrupt);
    let results = engine.run(&books, &checkpoint).await;

    println!(
        "Done: {} word(s) on the service, {} not added, {} without samples ({:.1}s)",
        results.added.len(),
        results.not_added.len(),
        results.no_sample.len(),
        start.elapsed().as_secs_f32()
    );

    println!("Writing out results to {}", cli.checkpoint.display());
    if let Err(e) = results.save(&cli.checkpoint) {
        fail(&format!("Failed to write the checkpoint: {}", e));
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}
