//! Command-line and environment configuration for the `astronauts` binary.
//!
//! Every flag has an `ASTRONAUTS_*` environment fallback, so the same image
//! can be configured either way.

use std::net::SocketAddr;

use chrono::{Local, NaiveDate};
use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand};

use crate::astronaut::{AstronautFields, SUPERPOWERS};
use crate::request::DEFAULT_BODY_LIMIT;
use crate::store::DEFAULT_PAGE_SIZE;

/// Filter used when neither `--log-filter` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,astronaut_roster=info";

#[derive(Parser, Debug)]
#[command(name = "astronauts", version, about = "Astronaut roster server and client")]
pub struct Cli {
    /// tracing filter directive (e.g. "debug,hyper=info"); overrides RUST_LOG
    #[arg(long, env = "ASTRONAUTS_LOG", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the REST API server
    Serve(ServeConfig),
    /// Print one page of the roster
    List {
        #[command(flatten)]
        client: ClientConfig,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Create an astronaut, then show the page being viewed
    Add {
        #[command(flatten)]
        client: ClientConfig,
        #[command(flatten)]
        fields: FieldArgs,
        /// Page being viewed
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Replace every field of an existing astronaut, then show its page
    Update {
        #[command(flatten)]
        client: ClientConfig,
        id: u64,
        #[command(flatten)]
        fields: FieldArgs,
        /// Page the astronaut is listed on
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Delete an astronaut, then show the page it was on
    Remove {
        #[command(flatten)]
        client: ClientConfig,
        id: u64,
        /// Page the astronaut is listed on
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Add the example astronauts
    Seed {
        #[command(flatten)]
        client: ClientConfig,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    /// Address to listen on
    #[arg(long, env = "ASTRONAUTS_ADDR", default_value = "0.0.0.0:3001")]
    pub addr: SocketAddr,

    /// Astronauts per page
    #[arg(long, env = "ASTRONAUTS_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE,
          value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub page_size: usize,

    /// Value of access-control-allow-origin ("*" for any origin)
    #[arg(long, env = "ASTRONAUTS_CORS_ORIGIN", default_value = "*")]
    pub cors_origin: String,

    /// Largest request body accepted, in bytes
    #[arg(long, env = "ASTRONAUTS_BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of a running roster server
    #[arg(long, env = "ASTRONAUTS_URL", default_value = "http://localhost:3001")]
    pub url: String,
}

// Checked before anything is sent, so the server only sees plausible input.
#[derive(Args, Debug, Clone)]
pub struct FieldArgs {
    /// At least 2 characters
    #[arg(long, value_parser = parse_name)]
    pub first_name: String,
    /// At least 2 characters
    #[arg(long, value_parser = parse_name)]
    pub last_name: String,
    /// Birth date as YYYY-MM-DD, no later than today
    #[arg(long, value_parser = parse_birthdate)]
    pub birthdate: String,
    /// Free text. Suggested: Healing, Super Speed, Super Jump, Invisibility, Immortality
    #[arg(long, value_parser = parse_superpower)]
    pub superpower: String,
}

fn parse_name(raw: &str) -> Result<String, String> {
    if raw.chars().count() < 2 {
        return Err("must be at least 2 characters".to_owned());
    }
    Ok(raw.to_owned())
}

fn parse_birthdate(raw: &str) -> Result<String, String> {
    birthdate_as_of(raw, Local::now().date_naive())
}

fn birthdate_as_of(raw: &str, today: NaiveDate) -> Result<String, String> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("expected a YYYY-MM-DD date: {e}"))?;
    if date > today {
        return Err(format!("must not be after today ({today})"));
    }
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Any non-empty text. A suggested superpower typed in another case is
/// spelled the suggested way.
fn parse_superpower(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        return Err("must not be empty".to_owned());
    }
    let suggested = SUPERPOWERS.iter().find(|s| s.eq_ignore_ascii_case(raw.trim()));
    Ok(suggested.map_or_else(|| raw.to_owned(), |s| (*s).to_owned()))
}

impl From<FieldArgs> for AstronautFields {
    fn from(args: FieldArgs) -> Self {
        AstronautFields::new(args.first_name, args.last_name, args.birthdate, args.superpower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["astronauts", "serve"]).unwrap();
        let Command::Serve(config) = cli.command else { panic!("expected serve") };
        assert_eq!(config.addr, "0.0.0.0:3001".parse().unwrap());
        assert_eq!(config.page_size, 5);
        assert_eq!(config.cors_origin, "*");
        assert_eq!(config.body_limit, 100 * 1024);
    }

    #[test]
    fn page_size_must_be_positive() {
        assert!(Cli::try_parse_from(["astronauts", "serve", "--page-size", "0"]).is_err());
        let cli = Cli::try_parse_from(["astronauts", "serve", "--page-size", "10"]).unwrap();
        let Command::Serve(config) = cli.command else { panic!("expected serve") };
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn update_takes_id_and_all_fields() {
        let cli = Cli::try_parse_from([
            "astronauts", "update", "4",
            "--first-name", "Ivan", "--last-name", "Bella",
            "--birthdate", "1964-05-21", "--superpower", "Invisibility",
            "--url", "http://roster:3001",
            "--log-filter", "debug",
        ]).unwrap();
        assert_eq!(cli.log_filter.as_deref(), Some("debug"));
        let Command::Update { client, id, fields, page } = cli.command else { panic!("expected update") };
        assert_eq!((id, page, client.url.as_str()), (4, 1, "http://roster:3001"));
        assert_eq!(
            AstronautFields::from(fields),
            AstronautFields::new("Ivan", "Bella", "1964-05-21", "Invisibility"),
        );
    }

    #[test]
    fn add_requires_every_field() {
        assert!(Cli::try_parse_from(["astronauts", "add", "--first-name", "Ivan"]).is_err());
    }

    fn add(first: &str, last: &str, birthdate: &str, superpower: &str) -> Result<FieldArgs, clap::Error> {
        let cli = Cli::try_parse_from([
            "astronauts", "add",
            "--first-name", first, "--last-name", last,
            "--birthdate", birthdate, "--superpower", superpower,
        ])?;
        let Command::Add { fields, .. } = cli.command else { panic!("expected add") };
        Ok(fields)
    }

    #[test]
    fn names_need_two_characters() {
        assert!(add("I", "Bella", "1964-05-21", "Healing").is_err());
        assert!(add("Ivan", "B", "1964-05-21", "Healing").is_err());
        assert_eq!(add("Li", "Wu", "1964-05-21", "Healing").unwrap().first_name, "Li");
    }

    #[test]
    fn birthdate_must_be_a_past_or_present_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(birthdate_as_of("2024-06-01", today).unwrap(), "2024-06-01");
        assert!(birthdate_as_of("2024-06-02", today).is_err());
        assert!(birthdate_as_of("1964-02-30", today).is_err());
        assert!(birthdate_as_of("21. 5. 1964", today).is_err());
        assert!(add("Ivan", "Bella", "9999-01-01", "Healing").is_err());
    }

    #[test]
    fn superpower_suggestions_are_normalised() {
        assert_eq!(add("Ivan", "Bella", "1964-05-21", "super speed").unwrap().superpower, "Super Speed");
        assert_eq!(add("Ivan", "Bella", "1964-05-21", "Telepathy").unwrap().superpower, "Telepathy");
        assert!(add("Ivan", "Bella", "1964-05-21", " ").is_err());
    }
}
