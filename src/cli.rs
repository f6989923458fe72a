//! Command-line interface definitions for upvote_scrape.
//!
//! Arguments can be provided via command-line flags or, where noted,
//! environment variables. Flags override values from the settings file.

use crate::config::Settings;
use crate::scrapers::extract::MarkupScheme;
use clap::{Args, Parser, Subcommand};

/// Command-line arguments for the upvote_scrape application.
///
/// # Examples
///
/// ```sh
/// # Scrape once and save the result
/// upvote_scrape scrape --user-id laeyoung -o data/upvoted.json
///
/// # Serve the API, reading saved data from a file
/// upvote_scrape serve --store data/upvoted.json
///
/// # Pages on the site hold 20 topics now
/// upvote_scrape --page-size 20 scrape -u laeyoung
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "UPVOTE_SCRAPE_CONFIG", global = true)]
    pub config: Option<String>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Scrape settings that can be overridden on the command line.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Forum base URL
    #[arg(long, env = "GEEKNEWS_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Number of topics on a full listing page
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Highest page number to request
    #[arg(long, global = true)]
    pub max_pages: Option<u32>,

    /// Pause between page fetches, in milliseconds
    #[arg(long, global = true)]
    pub page_delay_ms: Option<u64>,

    /// Listing markup the extractor expects
    #[arg(long, value_enum, global = true)]
    pub scheme: Option<MarkupScheme>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collect every upvoted topic for a user and write them to a JSON file
    Scrape {
        /// Forum user id whose upvotes are collected
        #[arg(short, long, env = "GEEKNEWS_ID")]
        user_id: String,

        /// Output path for the JSON array
        #[arg(short, long, default_value = "upvoted.json")]
        output: String,

        /// Sort newest topic id first instead of listing order
        #[arg(long)]
        sort_by_id: bool,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "BIND_ADDR")]
        bind: Option<String>,

        /// User scraped when a request omits `userId`
        #[arg(long, env = "GEEKNEWS_ID")]
        default_user_id: Option<String>,

        /// Saved article array for `/api/articles` (file path or http(s) URL)
        #[arg(long, env = "ARTICLES_SOURCE")]
        store: Option<String>,
    },
}

impl Overrides {
    /// Apply any flags that were given on top of `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(page_size) = self.page_size {
            settings.page_size = page_size;
        }
        if let Some(max_pages) = self.max_pages {
            settings.max_pages = max_pages;
        }
        if let Some(delay) = self.page_delay_ms {
            settings.page_delay_ms = delay;
        }
        if let Some(scheme) = self.scheme {
            settings.scheme = scheme;
        }
    }
}
