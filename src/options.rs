//! Search options before and after validation.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;

/// Maximum number of AND-joined components GitHub accepts in one query.
pub const MAX_QUERY_COMPONENTS: usize = 6;
/// Largest `per_page` the search API honours.
pub const API_MAX_PAGE_SIZE: u32 = 100;
/// Page size the search API uses when `per_page` is omitted.
pub const API_DEFAULT_PAGE_SIZE: u32 = 30;
/// Upper bound on the number of results a single run may request.
pub const MAX_RESULT_LIMIT: u32 = 500;
/// Results are capped to this many when printing to the terminal.
pub const STDOUT_LIMIT: u32 = 50;
pub const DEFAULT_LIMIT: u32 = 30;
pub const DEFAULT_OUTPUT_NAME: &str = "repo-seek-results";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Stars,
    Forks,
    HelpWantedIssues,
    Updated,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Stars => "stars",
            SortKey::Forks => "forks",
            SortKey::HelpWantedIssues => "help-wanted-issues",
            SortKey::Updated => "updated",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Stdout,
    Json,
    Csv,
}

impl OutputFormat {
    /// File extension for file targets, `None` for the terminal.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Stdout => None,
            OutputFormat::Json => Some("json"),
            OutputFormat::Csv => Some("csv"),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OutputFormat::Stdout)
    }
}

/// The options exactly as the user supplied them.
///
/// A `None` field means the option was not given at all. Numeric options
/// are kept as text so that validation can report non-numeric input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet {
    pub topic: Option<Vec<String>>,
    pub language: Option<Vec<String>>,
    pub stars_min: Option<String>,
    pub stars_max: Option<String>,
    pub created_before: Option<String>,
    pub created_after: Option<String>,
    pub sort: Option<SortKey>,
    pub order: Option<Order>,
    pub limit: Option<String>,
    pub output_format: OutputFormat,
    pub output_name: Option<String>,
    pub force: bool,
    pub raw: bool,
}

impl OptionSet {
    /// Whether any option that contributes to the search query is present.
    pub fn has_query(&self) -> bool {
        self.topic.is_some()
            || self.language.is_some()
            || self.stars_min.is_some()
            || self.stars_max.is_some()
            || self.created_before.is_some()
            || self.created_after.is_some()
    }
}

/// An inclusive range with optional bounds, rendered as `lower..upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<T> {
    pub lower: Option<T>,
    pub upper: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }
}

impl<T: fmt::Display> Bounds<T> {
    pub fn new(lower: Option<T>, upper: Option<T>) -> Self {
        Self { lower, upper }
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Renders the range with `*` standing in for a missing bound, or
    /// `None` when neither bound is set.
    pub fn render(&self) -> Option<String> {
        let side = |bound: &Option<T>| match bound {
            Some(v) => v.to_string(),
            None => "*".to_string(),
        };
        if self.is_empty() {
            return None;
        }
        Some(format!("{}..{}", side(&self.lower), side(&self.upper)))
    }
}

pub type StarsRange = Bounds<u64>;
pub type DateRange = Bounds<NaiveDate>;

/// Where results end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File { format: OutputFormat, path: PathBuf },
}

/// Options that passed every validation check. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub topics: Vec<String>,
    pub languages: Vec<String>,
    pub stars: StarsRange,
    pub created: DateRange,
    pub sort: Option<SortKey>,
    pub order: Option<Order>,
    pub limit: u32,
    /// Set when `limit` was lowered to [`STDOUT_LIMIT`].
    pub limit_capped: bool,
    pub output: OutputTarget,
    pub force: bool,
    pub raw: bool,
}
