use clap::Parser;

use crate::options::{OptionSet, Order, OutputFormat, SortKey};

/// Search GitHub repositories by topic, language, stars and creation date.
#[derive(Parser, Debug)]
#[clap(
    name = "repo-seek",
    author,
    version,
    about,
    long_about = "Search GitHub repositories by combining topic, language, star and creation-date filters. Large result sets are fetched page by page and can be written to JSON or CSV."
)]
pub struct Args {
    /// Filter in repositories with the desired topic(s).
    #[clap(long, num_args = 1.., value_name = "TOPIC")]
    pub topic: Option<Vec<String>>,

    /// Filter in repositories with the desired language(s).
    #[clap(long, num_args = 1.., value_name = "LANGUAGE")]
    pub language: Option<Vec<String>>,

    /// Filter in repositories with N stars or more.
    #[clap(long = "stars-min", value_name = "N", allow_hyphen_values = true)]
    pub stars_min: Option<String>,

    /// Filter in repositories with N stars or less.
    #[clap(long = "stars-max", value_name = "N", allow_hyphen_values = true)]
    pub stars_max: Option<String>,

    /// Filter in repositories created on or after a date (YYYY-MM-DD).
    #[clap(long = "created-after", value_name = "DATE")]
    pub created_after: Option<String>,

    /// Filter in repositories created on or before a date (YYYY-MM-DD).
    #[clap(long = "created-before", value_name = "DATE")]
    pub created_before: Option<String>,

    /// Sort repositories based on some criteria.
    #[clap(long, value_enum)]
    pub sort: Option<SortKey>,

    /// Apply sorting in some order. Requires --sort.
    #[clap(long, value_enum)]
    pub order: Option<Order>,

    /// Set an upper limit for the result count (1-500, default 30).
    #[clap(long, value_name = "N", allow_hyphen_values = true)]
    pub limit: Option<String>,

    /// Output the result in some format.
    #[clap(long = "output-format", value_enum, default_value_t = OutputFormat::Stdout)]
    pub output_format: OutputFormat,

    /// Output the result into a file with some name (default: repo-seek-results).
    #[clap(long = "output-name", value_name = "NAME")]
    pub output_name: Option<String>,

    /// Enable forced execution without any prompts.
    #[clap(long)]
    pub force: bool,

    /// Enable raw response data for more detailed information.
    #[clap(long)]
    pub raw: bool,

    /// Bare words are accepted but never become part of the query.
    #[clap(hide = true, value_name = "WORD")]
    pub words: Vec<String>,
}

impl Args {
    pub fn into_option_set(self) -> OptionSet {
        OptionSet {
            topic: self.topic,
            language: self.language,
            stars_min: self.stars_min,
            stars_max: self.stars_max,
            created_before: self.created_before,
            created_after: self.created_after,
            sort: self.sort,
            order: self.order,
            limit: self.limit,
            output_format: self.output_format,
            output_name: self.output_name,
            force: self.force,
            raw: self.raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<OptionSet, clap::Error> {
        let argv = std::iter::once("repo-seek").chain(args.iter().copied());
        Args::try_parse_from(argv).map(Args::into_option_set)
    }

    #[test]
    fn test_multi_value_flags() {
        let options = parse(&["--language", "js", "--topic", "cli", "tui"]).unwrap();
        assert_eq!(options.topic, Some(vec!["cli".to_string(), "tui".to_string()]));
        assert_eq!(options.language, Some(vec!["js".to_string()]));
        assert_eq!(options.output_format, OutputFormat::Stdout);
        assert!(!options.force);
    }

    #[test]
    fn test_absent_flags_stay_absent() {
        let options = parse(&[]).unwrap();
        assert_eq!(options, OptionSet::default());
    }

    #[test]
    fn test_numbers_kept_as_text() {
        let options = parse(&["--stars-min", "-3", "--limit", "abc"]).unwrap();
        assert_eq!(options.stars_min.as_deref(), Some("-3"));
        assert_eq!(options.limit.as_deref(), Some("abc"));
    }

    #[test]
    fn test_enum_choices() {
        let options = parse(&[
            "--topic",
            "x",
            "--sort",
            "help-wanted-issues",
            "--order",
            "asc",
            "--output-format",
            "csv",
        ])
        .unwrap();
        assert_eq!(options.sort, Some(SortKey::HelpWantedIssues));
        assert_eq!(options.order, Some(Order::Asc));
        assert_eq!(options.output_format, OutputFormat::Csv);

        assert!(parse(&["--sort", "name"]).is_err());
        assert!(parse(&["--output-format", "pretty"]).is_err());
        assert!(parse(&["--unknown"]).is_err());
    }

    #[test]
    fn test_bare_words_do_not_reach_the_query() {
        let options = parse(&["rust", "cli"]).unwrap();
        assert_eq!(options, OptionSet::default());
        assert!(!options.has_query());

        let options = parse(&["--force", "rust"]).unwrap();
        assert!(options.force);
        assert!(!options.has_query());
    }
}
