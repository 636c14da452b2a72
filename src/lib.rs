//! # repo-seek
//!
//! A Rust library and CLI for searching GitHub repositories. Filters are
//! validated, compiled into a single search query, split into page
//! requests and fetched one page at a time while respecting GitHub's rate
//! limit.
//!
//! ## Main Components
//!
//! - [`validate`]: option checks producing an immutable [`SearchOptions`]
//! - [`query`]: compiles filters into the `q` parameter
//! - [`pagination`]: plans the pages needed for a result limit
//! - [`RequestOrchestrator`]: builds request URLs and tracks the rate limit
//! - [`GitHubSearcher`]: fetches the planned pages
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Utc;
//! use repo_seek_lib::{
//!     validate, Config, FileRateLimitStore, GitHubSearcher, OptionSet, RequestOrchestrator,
//!     TerminalPrompter,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let options = OptionSet {
//!         topic: Some(vec!["cli".to_string()]),
//!         language: Some(vec!["rust".to_string()]),
//!         ..Default::default()
//!     };
//!     let search = validate::validate(&options, Utc::now().date_naive(), &TerminalPrompter)?;
//!
//!     let config = Config::from_env();
//!     let store = FileRateLimitStore::in_dir(&config.state_dir);
//!     let mut orchestrator = RequestOrchestrator::load(config.api_url, store)?;
//!     let urls = orchestrator.plan_requests(&search, Utc::now().timestamp())?;
//!
//!     let results = GitHubSearcher::new(search.raw)?.run(&urls, &mut orchestrator).await?;
//!     println!("{} repositories", results.items.len());
//!     Ok(())
//! }
//! ```

mod args;
mod config;
mod error;
mod github_searcher;
mod options;
mod orchestrator;
mod output;
mod prompt;
mod rate_limit;

pub mod pagination;
pub mod query;
pub mod validate;

pub use crate::args::Args;
pub use crate::config::Config;
pub use crate::error::{OutputError, SeekError, Stage, StoreError, ValidationError};
pub use crate::github_searcher::{GitHubSearcher, SearchResults};
pub use crate::options::{
    Bounds, DateRange, OptionSet, Order, OutputFormat, OutputTarget, SearchOptions, SortKey,
    StarsRange,
};
pub use crate::orchestrator::{RequestOrchestrator, RequestOutcome, DEFAULT_SEARCH_ENDPOINT};
pub use crate::output::render;
pub use crate::prompt::{Prompter, TerminalPrompter};
pub use crate::rate_limit::{
    FileRateLimitStore, MemoryRateLimitStore, RateLimitState, RateLimitStore,
};
