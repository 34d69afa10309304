//! Circuledge CLI - edit shared notes from the command line
//!
//! Every save is checked against the revision the edit started from; a
//! conflicting save shows the diff instead of overwriting the server.

mod cli;
mod commands;
mod error;
mod http;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::channels::run_channels;
use crate::commands::common::resolve_server_url;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::history::run_history;
use crate::commands::list::{run_list, ListOptions};
use crate::commands::new::run_new;
use crate::commands::settings::run_settings;
use crate::commands::show::run_show;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("circuledge=warn".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let server = resolve_server_url(cli.server)?;

    match cli.command {
        Commands::List {
            limit,
            offset,
            channel,
            tag,
            title,
            body,
            sort,
            json,
        } => {
            let options = ListOptions {
                limit,
                offset,
                channel,
                tag,
                title,
                body,
                sort,
                json,
            };
            run_list(options, &server).await?;
        }
        Commands::Show { id, json } => run_show(&id, json, &server).await?,
        Commands::New { content } => run_new(&content, &server).await?,
        Commands::Edit { id } => run_edit(&id, &server).await?,
        Commands::Delete { id } => run_delete(&id, &server).await?,
        Commands::History {
            limit,
            offset,
            json,
        } => run_history(limit, offset, json, &server).await?,
        Commands::Channels { json } => run_channels(json, &server).await?,
        Commands::Settings { default_channel } => {
            run_settings(default_channel.as_deref(), &server).await?;
        }
    }

    Ok(())
}
