use crate::pipeline::workflow::launch;
use anyhow::Result;
use clap::Parser;

mod charts;
mod cli;
mod config;
mod llm;
mod pipeline;
mod types;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = args.into_config();

    launch(&config).await
}
