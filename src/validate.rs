//! Validation of user-supplied options.
//!
//! Each check is a small pure function run in a fixed order; the first
//! failure stops validation. Checks that succeed hand back the typed value
//! they validated, and [`validate_options`] assembles those into an
//! immutable [`SearchOptions`].

use std::path::PathBuf;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{SeekError, ValidationError};
use crate::options::{
    DateRange, OptionSet, OutputFormat, OutputTarget, SearchOptions, StarsRange,
    DEFAULT_LIMIT, DEFAULT_OUTPUT_NAME, MAX_RESULT_LIMIT, STDOUT_LIMIT,
};
use crate::prompt::Prompter;
use crate::query::QueryComponentCount;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid date regex"));

/// Numeric options after the type check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericOptions {
    pub limit: Option<i64>,
    pub stars_min: Option<i64>,
    pub stars_max: Option<i64>,
}

pub fn check_empty_query(options: &OptionSet) -> Result<(), ValidationError> {
    if options.has_query() {
        Ok(())
    } else {
        Err(ValidationError::EmptyQuery)
    }
}

pub fn check_component_ceiling(options: &OptionSet) -> Result<(), ValidationError> {
    let count = QueryComponentCount::from_options(options);
    if count.exceeds_ceiling() {
        return Err(ValidationError::QueryLimit {
            components: count.total(),
        });
    }
    Ok(())
}

pub fn check_numeric_types(options: &OptionSet) -> Result<NumericOptions, ValidationError> {
    fn number(raw: &Option<String>, option: &'static str) -> Result<Option<i64>, ValidationError> {
        raw.as_deref()
            .map(|v| {
                v.trim()
                    .parse::<i64>()
                    .map_err(|_| ValidationError::NotANumber { option })
            })
            .transpose()
    }

    Ok(NumericOptions {
        limit: number(&options.limit, "limit")?,
        stars_min: number(&options.stars_min, "stars-min")?,
        stars_max: number(&options.stars_max, "stars-max")?,
    })
}

/// Returns the effective limit and whether it was capped for the terminal.
pub fn check_limit(
    limit: Option<i64>,
    format: OutputFormat,
) -> Result<(u32, bool), ValidationError> {
    let requested = limit.unwrap_or(i64::from(DEFAULT_LIMIT));
    if requested <= 0 || requested > i64::from(MAX_RESULT_LIMIT) {
        return Err(ValidationError::LimitOutOfRange { limit: requested });
    }

    let requested = requested as u32;
    if requested > STDOUT_LIMIT && format.is_terminal() {
        warn!(
            "Limit capped at {} to prevent terminal flooding. Use JSON or CSV for more results.",
            STDOUT_LIMIT
        );
        return Ok((STDOUT_LIMIT, true));
    }

    Ok((requested, false))
}

pub fn check_stars(
    stars_min: Option<i64>,
    stars_max: Option<i64>,
) -> Result<StarsRange, ValidationError> {
    fn non_negative(value: Option<i64>, option: &'static str) -> Result<Option<u64>, ValidationError> {
        match value {
            Some(v) if v < 0 => Err(ValidationError::NegativeStars { option }),
            Some(v) => Ok(Some(v as u64)),
            None => Ok(None),
        }
    }

    let min = non_negative(stars_min, "stars-min")?;
    let max = non_negative(stars_max, "stars-max")?;
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ValidationError::StarsMinAboveMax { min, max });
        }
    }

    Ok(StarsRange::new(min, max))
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str, option: &'static str) -> Result<NaiveDate, ValidationError> {
    let caps = DATE_PATTERN
        .captures(raw)
        .ok_or(ValidationError::MalformedDate { option })?;

    let field = |i: usize| caps[i].parse::<u32>().ok();
    let (year, month, day) = match (field(1), field(2), field(3)) {
        (Some(y), Some(m), Some(d)) => (y as i32, m, d),
        _ => return Err(ValidationError::MalformedDate { option }),
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or(ValidationError::InvalidDate { option })
}

pub fn check_created(
    created_before: Option<&str>,
    created_after: Option<&str>,
    today: NaiveDate,
) -> Result<DateRange, ValidationError> {
    let before = created_before
        .map(|raw| parse_date(raw, "created-before"))
        .transpose()?;
    let after = created_after
        .map(|raw| parse_date(raw, "created-after"))
        .transpose()?;

    if matches!(after, Some(after) if after > today) {
        return Err(ValidationError::CreatedAfterInFuture);
    }
    if let (Some(before), Some(after)) = (before, after) {
        if before < after {
            return Err(ValidationError::CreatedBeforePrecedesAfter);
        }
    }

    // The query range runs from the "after" bound up to the "before" bound.
    Ok(DateRange::new(after, before))
}

pub fn check_order(options: &OptionSet) -> Result<(), ValidationError> {
    if options.order.is_some() && options.sort.is_none() {
        return Err(ValidationError::OrderWithoutSort);
    }
    Ok(())
}

/// Resolves where results go, synthesising a default file name for file
/// formats when none was given.
pub fn resolve_output(options: &OptionSet) -> Result<OutputTarget, ValidationError> {
    let Some(extension) = options.output_format.extension() else {
        if options.output_name.is_some() {
            return Err(ValidationError::OutputNameWithStdout);
        }
        return Ok(OutputTarget::Stdout);
    };

    let path = match &options.output_name {
        Some(name) => PathBuf::from(name),
        None => PathBuf::from(format!("{}.{}", DEFAULT_OUTPUT_NAME, extension)),
    };

    Ok(OutputTarget::File {
        format: options.output_format,
        path,
    })
}

/// Runs every pure check and builds the validated options.
pub fn validate_options(
    options: &OptionSet,
    today: NaiveDate,
) -> Result<SearchOptions, ValidationError> {
    check_empty_query(options)?;
    check_component_ceiling(options)?;
    let numbers = check_numeric_types(options)?;
    let (limit, limit_capped) = check_limit(numbers.limit, options.output_format)?;
    let stars = check_stars(numbers.stars_min, numbers.stars_max)?;
    let created = check_created(
        options.created_before.as_deref(),
        options.created_after.as_deref(),
        today,
    )?;
    check_order(options)?;
    let output = resolve_output(options)?;

    Ok(SearchOptions {
        topics: options.topic.clone().unwrap_or_default(),
        languages: options.language.clone().unwrap_or_default(),
        stars,
        created,
        sort: options.sort,
        order: options.order,
        limit,
        limit_capped,
        output,
        force: options.force,
        raw: options.raw,
    })
}

/// Asks before overwriting an existing output file unless `force` is set.
pub fn confirm_output_target(
    options: &SearchOptions,
    prompter: &dyn Prompter,
) -> Result<(), SeekError> {
    let OutputTarget::File { path, .. } = &options.output else {
        return Ok(());
    };
    if options.force || !path.exists() {
        return Ok(());
    }

    debug!("Output file {} already exists", path.display());
    if prompter.confirm_overwrite(path).map_err(SeekError::Prompt)? {
        Ok(())
    } else {
        Err(SeekError::Cancelled)
    }
}

/// Full validation: pure checks, then the overwrite confirmation.
pub fn validate(
    options: &OptionSet,
    today: NaiveDate,
    prompter: &dyn Prompter,
) -> Result<SearchOptions, SeekError> {
    let search = validate_options(options, today)?;
    confirm_output_target(&search, prompter)?;
    Ok(search)
}
