mod commands;
mod view;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use commands::{Command, Flow};
use quote_reader::{ReaderClient, ReaderConfig, ReaderPage};

#[derive(Debug, Parser)]
#[command(name = "quote-reader")]
#[command(about = "Search a document, collect quotes, and ask about them")]
struct Args {
    /// Title of the document to open on start.
    #[arg(value_name = "TITLE")]
    title: Option<String>,
    /// Override READER_API_BASE.
    #[arg(long)]
    api_base: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    let args = Args::parse();
    let config = ReaderConfig::from_env()?.with_api_base(args.api_base);

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .init();

    let client = ReaderClient::new(&config).context("Failed to create HTTP client")?;
    info!(api_base = %config.api_base, "reader client initialized");

    let mut page = ReaderPage::new();
    if let Some(title) = args.title {
        println!("{}", commands::open(&mut page, &client, &title).await);
    } else {
        println!("{}", commands::HELP);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };

        match commands::run(&mut page, &client, Command::parse(&line)).await {
            Ok(Flow::Continue(output)) => {
                if !output.is_empty() {
                    println!("{}", output);
                }
            }
            Ok(Flow::Quit) => break,
            Err(e) => {
                error!("command failed: {:#}", e);
                println!("Error: {:#}", e);
            }
        }
    }

    info!("reader closed");
    Ok(())
}
