use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use strum_macros::EnumString;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod command;
mod error;
mod result;

use awful_scraping::config::{self as lib_config, ResolvedScraperConfig, ScraperConfig};
use awful_scraping::location::ThreadPageLocator;
use awful_scraping::scraper::{self, PageOptions};

use crate::error::*;
use crate::result::*;

#[derive(Clone, Copy, Debug, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum PageType {
    Forums,
    Threads,
    Bookmarks,
    Posts,
    Folder,
    Message,
    UnreadCount,
    Profile,
    Lepers,
    Forms,
}

#[derive(Debug, Parser)]
#[command(name = "awful-scrape", version = env!("CARGO_PKG_VERSION"), author = env!("CARGO_PKG_AUTHORS"))]
struct Opt {
    #[arg(short = 'v', action = clap::ArgAction::Count, help = "Verbosity")]
    verbosity: u8,

    #[command(flatten)]
    general_options: GeneralOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
pub struct GeneralOptions {
    #[arg(long = "config-path", help = "Specify config path to use")]
    config_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ScrapeOptions {
    #[arg(long = "forum", help = "Forum id of a thread list page")]
    forum_id: Option<String>,
    #[arg(long = "thread", help = "Thread id of a posts page")]
    thread_id: Option<String>,
    #[arg(long = "page", value_parser = parse_locator, default_value = "1", help = "Requested page (N|last|unread)")]
    locator: ThreadPageLocator,
    #[arg(long = "author", help = "User id the posts page was filtered by")]
    author: Option<String>,
    #[arg(long = "anchor", help = "Post id the page was opened at")]
    anchor: Option<String>,
    #[arg(long = "base-url", help = "Override the configured base URL")]
    base_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(name = "generate-config", about = "Generate default configuration file")]
    GenerateConfig,

    #[command(name = "scrape", about = "Scrape a saved forums page")]
    Scrape {
        #[arg(help = "Page type (forums|threads|bookmarks|posts|folder|message|unread-count|profile|lepers|forms)")]
        page_type: PageType,
        #[arg(help = "Path to the saved HTML file")]
        path: PathBuf,
        #[command(flatten)]
        scrape_options: ScrapeOptions,
    },
    #[command(name = "locate", about = "Decode the page location of a thread URL")]
    Locate {
        #[arg(help = "Thread URL")]
        url: String,
    },
}

impl From<PageType> for scraper::PageType {
    fn from(v: PageType) -> Self {
        match v {
            PageType::Forums => scraper::PageType::Forums,
            PageType::Threads => scraper::PageType::Threads,
            PageType::Bookmarks => scraper::PageType::Bookmarks,
            PageType::Posts => scraper::PageType::Posts,
            PageType::Folder => scraper::PageType::Folder,
            PageType::Message => scraper::PageType::Message,
            PageType::UnreadCount => scraper::PageType::UnreadCount,
            PageType::Profile => scraper::PageType::Profile,
            PageType::Lepers => scraper::PageType::Lepers,
            PageType::Forms => scraper::PageType::Forms,
        }
    }
}

impl From<&ScrapeOptions> for PageOptions {
    fn from(v: &ScrapeOptions) -> Self {
        PageOptions {
            forum_id: v.forum_id.clone(),
            thread_id: v.thread_id.clone(),
            locator: v.locator,
            author_filter: v.author.clone(),
            anchor_post_id: v.anchor.clone(),
        }
    }
}

fn parse_locator(s: &str) -> Result<ThreadPageLocator, String> {
    s.parse().map_err(|_| format!("'{s}' is not a page number, 'last' or 'unread'"))
}

fn main() {
    let opt = Opt::parse();

    // Vary the output based on how many times the user used the "verbose" flag
    // (i.e. 'myprog -v -v -v' or 'myprog -vvv' vs 'myprog -v'
    let log_level = match opt.verbosity {
        0 => "off",
        1 => "error",
        2 => "warn",
        3 => "info",
        4 => "debug",
        _ => "trace",
    };

    initialize_logging(log_level);

    debug!("Debug logging enabled.");

    let config_location = opt
        .general_options
        .config_path
        .clone()
        .or_else(lib_config::get_default_config_path);

    let cmd_result = match opt.command {
        Command::GenerateConfig => match &config_location {
            Some(location) => output(command::generate_config(location)),
            None => Err(CliError::new(
                CliErrorKind::Config,
                "No config path specified, and no default path could be determined.",
            )),
        },
        Command::Scrape {
            page_type,
            path,
            scrape_options,
        } => load_config(config_location.as_ref(), scrape_options.base_url.clone()).and_then(|config| {
            output(command::scrape(
                page_type.into(),
                &path,
                &PageOptions::from(&scrape_options),
                &config,
            ))
        }),
        Command::Locate { url } => {
            load_config(config_location.as_ref(), None).and_then(|config| output(command::locate(&url, &config)))
        }
    };

    match cmd_result {
        Ok(_) => {}
        Err(err) => {
            // Print error description to stderr
            eprintln!("{}", err.description);

            // Return the exit code that corresponds to the error kind
            std::process::exit(err.kind.exit_code());
        }
    };
}

fn initialize_logging(our_level: &str) {
    const BIN_MODULE: &str = env!("CARGO_CRATE_NAME");
    const LIB_MODULE: &str = "awful_scraping";

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("error,{BIN_MODULE}={our_level},{LIB_MODULE}={our_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(location: Option<&PathBuf>, base_url: Option<String>) -> Result<ResolvedScraperConfig, CliError> {
    let mut config = match location {
        Some(location) => ScraperConfig::from_location(location)?,
        None => {
            warn!("No config path specified, and no default path could be determined.");

            ScraperConfig::default()
        }
    };

    if base_url.is_some() {
        config.base_url = base_url;
    }

    Ok(config.resolve()?)
}

/// Print the command's result as JSON on stdout, passing the error on for the exit code.
fn output<T: Serialize>(result: Result<T, CliError>) -> Result<(), CliError> {
    let (envelope, failed) = match result {
        Ok(data) => (CliResult::Success(data), None),
        Err(err) => (CliResult::Error(CliErrorOutput::from(&err)), Some(err)),
    };

    let json = serde_json::to_string_pretty(&envelope)
        .map_err(|err| CliError::new(CliErrorKind::Other, format!("Error serializing result: {err}")))?;

    println!("{json}");

    match failed {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
