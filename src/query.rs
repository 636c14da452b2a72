//! Builds the `q` parameter of a repository search.
//!
//! Qualifiers are emitted in a fixed category order (topic, language,
//! stars, created) and joined by single spaces, which GitHub treats as
//! logical AND.

use chrono::NaiveDate;

use crate::options::{DateRange, OptionSet, SearchOptions, StarsRange, MAX_QUERY_COMPONENTS};

/// Per-category tally of the AND components a query would contain.
///
/// Topics and languages count once per value. Stars and created count at
/// most once each, whether one or both bounds are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryComponentCount {
    pub topic: usize,
    pub language: usize,
    pub stars: usize,
    pub created: usize,
}

impl QueryComponentCount {
    pub fn from_options(options: &OptionSet) -> Self {
        Self {
            topic: options.topic.as_ref().map_or(0, Vec::len),
            language: options.language.as_ref().map_or(0, Vec::len),
            stars: usize::from(options.stars_min.is_some() || options.stars_max.is_some()),
            created: usize::from(
                options.created_before.is_some() || options.created_after.is_some(),
            ),
        }
    }

    pub fn total(&self) -> usize {
        self.topic + self.language + self.stars + self.created
    }

    pub fn exceeds_ceiling(&self) -> bool {
        self.total() > MAX_QUERY_COMPONENTS
    }
}

/// Compiles validated options into a query body (not yet URL-encoded).
pub fn compile(options: &SearchOptions) -> String {
    let mut terms: Vec<String> = Vec::new();

    terms.extend(options.topics.iter().map(|t| qualifier("topic", t)));
    terms.extend(options.languages.iter().map(|l| qualifier("language", l)));
    if let Some(range) = options.stars.render() {
        terms.push(format!("stars:{}", range));
    }
    if let Some(range) = options.created.render() {
        terms.push(format!("created:{}", range));
    }

    terms.join(" ")
}

fn qualifier(field: &str, value: &str) -> String {
    let needs_quotes = value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"');
    if needs_quotes {
        format!("{}:\"{}\"", field, value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        format!("{}:{}", field, value)
    }
}

/// Qualifiers recovered from a compiled query body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub topics: Vec<String>,
    pub languages: Vec<String>,
    pub stars: StarsRange,
    pub created: DateRange,
}

/// Parses a body produced by [`compile`] back into its qualifiers.
///
/// Returns `None` for terms this compiler never emits.
pub fn parse_query(body: &str) -> Option<ParsedQuery> {
    let mut parsed = ParsedQuery::default();

    for term in split_terms(body)? {
        let (field, value) = term.split_once(':')?;
        match field {
            "topic" => parsed.topics.push(unquote(value)?),
            "language" => parsed.languages.push(unquote(value)?),
            "stars" => {
                let (lower, upper) = split_range(value)?;
                parsed.stars = StarsRange::new(parse_bound(lower)?, parse_bound(upper)?);
            }
            "created" => {
                let (lower, upper) = split_range(value)?;
                parsed.created = DateRange::new(parse_date_bound(lower)?, parse_date_bound(upper)?);
            }
            _ => return None,
        }
    }

    Some(parsed)
}

/// Splits on spaces outside of double quotes.
fn split_terms(body: &str) -> Option<Vec<String>> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in body.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => {
                current.push(c);
                escaped = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return None;
    }
    if !current.is_empty() {
        terms.push(current);
    }
    Some(terms)
}

fn unquote(value: &str) -> Option<String> {
    let Some(inner) = value.strip_prefix('"') else {
        return Some(value.to_string());
    };
    let inner = inner.strip_suffix('"')?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next()?);
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn split_range(value: &str) -> Option<(&str, &str)> {
    value.split_once("..")
}

fn parse_bound(raw: &str) -> Option<Option<u64>> {
    if raw == "*" {
        return Some(None);
    }
    raw.parse().ok().map(Some)
}

fn parse_date_bound(raw: &str) -> Option<Option<NaiveDate>> {
    if raw == "*" {
        return Some(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(Some)
}
