use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::SeekError;
use crate::orchestrator::{RequestOrchestrator, RequestOutcome};
use crate::rate_limit::RateLimitStore;

const USER_AGENT: &str = concat!("repo-seek/", env!("CARGO_PKG_VERSION"));

/// Repository fields kept when raw output is not requested.
const SUMMARY_FIELDS: &[&str] = &[
    "id",
    "name",
    "full_name",
    "description",
    "html_url",
    "homepage",
    "language",
    "stargazers_count",
    "forks_count",
    "open_issues_count",
    "watchers_count",
    "has_issues",
    "has_projects",
    "has_downloads",
    "has_wiki",
    "has_pages",
    "has_discussions",
    "updated_at",
];

/// Combined results of every page of a search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<Value>,
}

impl SearchResults {
    /// Folds one page's response body into the running results.
    pub fn absorb_page(&mut self, first_page: bool, body: &Value) -> Result<usize, SeekError> {
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .ok_or(SeekError::UnexpectedResponse)?;

        if first_page {
            self.total_count = body.get("total_count").and_then(Value::as_u64).unwrap_or(0);
        }
        if body
            .get("incomplete_results")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            self.incomplete_results = true;
        }

        self.items.extend(items.iter().cloned());
        Ok(items.len())
    }
}

/// Reduces a repository item to the summary field set.
pub fn summarize_item(item: &Value) -> Value {
    let mut summary = serde_json::Map::new();
    for field in SUMMARY_FIELDS {
        summary.insert(
            field.to_string(),
            item.get(*field).cloned().unwrap_or(Value::Null),
        );
    }

    let owner = item.get("owner");
    let owner_field = |name: &str| {
        owner
            .and_then(|o| o.get(name))
            .cloned()
            .unwrap_or(Value::Null)
    };
    let license_name = item
        .get("license")
        .and_then(|l| l.get("name"))
        .cloned()
        .unwrap_or(Value::Null);

    summary.insert("license".to_string(), json!({ "name": license_name }));
    summary.insert(
        "owner".to_string(),
        json!({
            "login": owner_field("login"),
            "html_url": owner_field("html_url"),
            "avatar_url": owner_field("avatar_url"),
        }),
    );

    Value::Object(summary)
}

/// Reads the rate-limit headers GitHub attaches to a successful response.
pub fn success_outcome(headers: &HeaderMap) -> RequestOutcome {
    RequestOutcome::Success {
        remaining: header_number(headers, "x-ratelimit-remaining"),
        limit: header_number(headers, "x-ratelimit-limit"),
    }
}

/// Reads the reset time GitHub attaches to a rate-limit rejection.
pub fn rate_limited_outcome(headers: &HeaderMap) -> RequestOutcome {
    RequestOutcome::RateLimited {
        reset_epoch_seconds: header_number(headers, "x-ratelimit-reset"),
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

pub struct GitHubSearcher {
    client: Client,
    raw: bool,
}

impl GitHubSearcher {
    /// Create a new GitHubSearcher instance
    pub fn new(raw: bool) -> Result<Self, SeekError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(GitHubSearcher { client, raw })
    }

    /// Fetch every URL in order, stopping at the first failed page.
    pub async fn run<S: RateLimitStore>(
        &self,
        urls: &[String],
        orchestrator: &mut RequestOrchestrator<S>,
    ) -> Result<SearchResults, SeekError> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(Duration::from_millis(80));

        let mut results = SearchResults::default();
        for (index, url) in urls.iter().enumerate() {
            pb.set_message(format!("Fetching page {} of {}", index + 1, urls.len()));

            match self.search_page(url, index == 0, &mut results, orchestrator).await {
                Ok(count) => info!("Received {} items from page {}", count, index + 1),
                Err(e) => {
                    pb.finish_and_clear();
                    error!("Error fetching page {}: {}", index + 1, e);
                    return Err(e);
                }
            }
        }
        pb.finish_and_clear();

        if !self.raw {
            results.items = results.items.iter().map(summarize_item).collect();
        }

        info!(
            "Fetched {} of {} matching repositories",
            results.items.len(),
            results.total_count
        );
        Ok(results)
    }

    /// Request one page and fold it into `results`.
    async fn search_page<S: RateLimitStore>(
        &self,
        url: &str,
        first_page: bool,
        results: &mut SearchResults,
        orchestrator: &mut RequestOrchestrator<S>,
    ) -> Result<usize, SeekError> {
        debug!("Requesting URL: {}", url);
        let response = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            orchestrator.record(rate_limited_outcome(response.headers()));
            return Err(SeekError::RateLimitExceeded {
                limit: orchestrator.state().limit,
            });
        }

        let outcome = success_outcome(response.headers());
        let body: Value = response.json().await?;

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            warn!("GitHub answered {}: {}", status, message);
            return Err(SeekError::Upstream(message));
        }

        orchestrator.record(outcome);
        results.absorb_page(first_page, &body)
    }
}
