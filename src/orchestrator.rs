//! Turns validated options into request URLs and tracks the rate limit.

use tracing::{debug, info, warn};
use url::form_urlencoded;

use crate::error::SeekError;
use crate::options::SearchOptions;
use crate::pagination;
use crate::prompt::Prompter;
use crate::query;
use crate::rate_limit::{RateLimitState, RateLimitStore};

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.github.com/search/repositories";

/// What a single request reported back about the rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success {
        remaining: Option<u32>,
        limit: Option<u32>,
    },
    RateLimited {
        reset_epoch_seconds: Option<i64>,
    },
}

pub struct RequestOrchestrator<S: RateLimitStore> {
    endpoint: String,
    store: S,
    state: RateLimitState,
}

impl<S: RateLimitStore> RequestOrchestrator<S> {
    /// Loads the last persisted rate-limit state from `store`.
    pub fn load(endpoint: impl Into<String>, store: S) -> Result<Self, SeekError> {
        let state = store.read()?.unwrap_or_default();
        Ok(Self {
            endpoint: endpoint.into(),
            store,
            state,
        })
    }

    pub fn state(&self) -> &RateLimitState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fails while a cooldown from an earlier rate-limit rejection is running.
    pub fn check_cooldown(&self, now: i64) -> Result<(), SeekError> {
        if let Some(remaining_secs) = self.state.cooldown_remaining(now) {
            warn!("Rate limit cooldown active for another {}s", remaining_secs);
            return Err(SeekError::RateLimitActive {
                limit: self.state.limit,
                remaining_secs,
            });
        }
        Ok(())
    }

    /// Builds one URL per planned page, refusing while a cooldown is active.
    pub fn plan_requests(&self, options: &SearchOptions, now: i64) -> Result<Vec<String>, SeekError> {
        self.check_cooldown(now)?;

        let body = query::compile(options);
        let encoded: String = form_urlencoded::byte_serialize(body.as_bytes()).collect();
        debug!("Compiled query: {}", body);

        let plan = pagination::plan(options.limit, options.sort, options.order);
        let urls: Vec<String> = plan
            .fragments()
            .iter()
            .map(|fragment| {
                let fragment = fragment.trim_end_matches('&');
                if fragment.is_empty() {
                    format!("{}?q={}", self.endpoint, encoded)
                } else {
                    format!("{}?q={}&{}", self.endpoint, encoded, fragment)
                }
            })
            .collect();

        info!("Planned {} request(s) for {} results", urls.len(), plan.total());
        Ok(urls)
    }

    /// Asks before sending more than one request, unless `force` is set.
    pub fn confirm_requests(
        &self,
        count: usize,
        force: bool,
        prompter: &dyn Prompter,
    ) -> Result<(), SeekError> {
        if count <= 1 || force {
            return Ok(());
        }
        if prompter.confirm_requests(count).map_err(SeekError::Prompt)? {
            Ok(())
        } else {
            Err(SeekError::Cancelled)
        }
    }

    /// Records the rate-limit information of one response and persists it.
    ///
    /// A state that cannot be saved is logged and otherwise ignored; the
    /// in-memory state is still updated.
    pub fn record(&mut self, outcome: RequestOutcome) {
        match outcome {
            RequestOutcome::Success { remaining, limit } => {
                if let Some(limit) = limit {
                    self.state.limit = limit;
                }
                if let Some(remaining) = remaining {
                    self.state.remaining = remaining;
                }
                self.state.reset_epoch_seconds = None;
            }
            RequestOutcome::RateLimited {
                reset_epoch_seconds,
            } => {
                warn!(
                    "GitHub rejected the request; rate limit resets at {:?}",
                    reset_epoch_seconds
                );
                self.state.remaining = 0;
                self.state.reset_epoch_seconds = reset_epoch_seconds;
            }
        }
        if let Err(e) = self.store.write(&self.state) {
            warn!("Could not save rate limit state: {}", e);
        }
    }
}
