//! `astronauts`: run the roster server, or drive one from the terminal.
//!
//! ```text
//! astronauts serve --addr 0.0.0.0:3001
//! astronauts seed
//! astronauts list --page 2
//! astronauts add --first-name Sally --last-name Ride --birthdate 1951-05-26 --superpower "Super Speed"
//! astronauts update 3 --first-name Sally --last-name Ride --birthdate 1951-05-26 --superpower Healing
//! astronauts remove 3 --page 1
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use astronaut_roster::client::{ApiClient, Followup, RosterView};
use astronaut_roster::config::{Cli, Command, DEFAULT_LOG_FILTER, ServeConfig};
use astronaut_roster::middleware::Cors;
use astronaut_roster::{DEFAULT_PAGE_SIZE, Error, Roster, Server, api};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_filter.as_deref());

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `--log-filter` / `ASTRONAUTS_LOG` wins, then `RUST_LOG`, then the default.
fn init_tracing(cli_filter: Option<&str>) {
    let filter = match cli_filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Serve(config) => serve(config).await,
        Command::List { client, page } => {
            let api = ApiClient::new(client.url);
            print!("{}", load(&api, page).await?);
            Ok(())
        }
        Command::Add { client, fields, page } => {
            let api = ApiClient::new(client.url);
            let mut view = load(&api, page).await?;

            let astronaut = api.create(&fields.into()).await?;
            println!("Astronaut Created (ID {})", astronaut.id);
            view.record_created(astronaut);
            print!("{view}");
            Ok(())
        }
        Command::Update { client, id, fields, page } => {
            let api = ApiClient::new(client.url);
            let mut view = load(&api, page).await?;

            let astronaut = api.update(id, &fields.into()).await?;
            println!("Astronaut {} Updated.", astronaut.id);
            view.record_updated(astronaut);
            print!("{view}");
            Ok(())
        }
        Command::Remove { client, id, page } => {
            let api = ApiClient::new(client.url);
            let mut view = load(&api, page).await?;

            println!("{}", api.delete(id).await?);
            if view.record_removed(id) == Followup::Refetch {
                view.apply_page(api.page(view.page()).await?);
            }
            print!("{view}");
            Ok(())
        }
        Command::Seed { client } => {
            println!("{}", ApiClient::new(client.url).seed().await?);
            Ok(())
        }
    }
}

/// The view as it stands on `page` before any change is made.
async fn load(api: &ApiClient, page: u32) -> Result<RosterView, Error> {
    let mut view = RosterView::new(DEFAULT_PAGE_SIZE);
    view.apply_page(api.page(page).await?);
    Ok(view)
}

async fn serve(config: ServeConfig) -> Result<(), Error> {
    let roster = Arc::new(Roster::with_page_size(config.page_size));
    Server::bind(config.addr)
        .cors(Cors::new(config.cors_origin))
        .body_limit(config.body_limit)
        .serve(api::routes(roster))
        .await
}
