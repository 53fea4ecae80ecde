use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use newsdigest::bootstrap::{build_services, load_config, load_dotenv};
use newsdigest::models::Query;
use newsdigest::report::{render_digest, render_lookup};
use newsdigest::telemetry::init_tracing;

/// Print a one-off news digest for a topic to stdout
#[derive(Parser, Debug)]
#[command(name = "digest_cli")]
struct Args {
    /// News topic to search for
    topic: String,

    /// Category filter; repeat for several (defaults come from config)
    #[arg(long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Two-letter language code
    #[arg(long)]
    language: Option<String>,

    /// Number of articles to request (1-50)
    #[arg(long)]
    size: Option<u32>,

    /// Also look the topic up on Wikipedia
    #[arg(long)]
    lookup: bool,

    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value = "warn")]
    log_level: String,

    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.log_file.as_deref())?;
    load_dotenv();

    let config = load_config(Path::new("."), args.config).await?;
    let services = build_services(&config)?;

    if args.lookup {
        match &services.lookup {
            Some(lookup) => match lookup.lookup(&args.topic).await {
                Ok(outcome) => println!("{}", render_lookup(&args.topic, &outcome)),
                Err(e) => eprintln!("Wikipedia lookup failed: {}", e),
            },
            None => eprintln!("Topic lookup is disabled in the configuration."),
        }
    }

    let Some(pipeline) = &services.pipeline else {
        for problem in &services.errors {
            eprintln!("Error: {}", problem);
        }
        std::process::exit(2);
    };

    let categories = if args.categories.is_empty() {
        config.news.default_categories()
    } else {
        args.categories
    };
    let language = args.language.unwrap_or_else(|| config.news.default_language());
    let size = args.size.unwrap_or_else(|| config.news.default_size());
    let query = Query::new(&args.topic, categories, &language, size)?;

    println!("Recent News Articles\n");
    let result = pipeline.run(&query).await;
    print!("{}", render_digest(&result));
    Ok(())
}
