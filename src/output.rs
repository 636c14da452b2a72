//! Rendering of search results to the terminal or to a file.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{OutputError, SeekError};
use crate::github_searcher::SearchResults;
use crate::options::{OutputFormat, OutputTarget, SearchOptions, STDOUT_LIMIT};
use crate::rate_limit::RateLimitState;

/// Writes the items to the search's output target and prints the run summary.
pub fn render(
    search: &SearchOptions,
    results: &SearchResults,
    rate_limit: &RateLimitState,
) -> Result<(), SeekError> {
    match &search.output {
        OutputTarget::Stdout => {
            let pretty = serde_json::to_string_pretty(&results.items).map_err(OutputError::from)?;
            println!("{}", pretty);
        }
        OutputTarget::File { format, path } => {
            match format {
                OutputFormat::Csv => write_csv(path, &results.items)?,
                _ => write_json(path, &results.items)?,
            }
            info!("Wrote {} items to {}", results.items.len(), path.display());
            println!("\nResults can be found in '{}'", path.display());
        }
    }

    println!(
        "\nRequests remaining: {} from {} per minute",
        rate_limit.remaining, rate_limit.limit
    );
    println!("\nTotal count: {}", results.total_count);
    println!("Results returned: {}\n", results.items.len());
    if let Some(note) = capped_note(search) {
        println!("{}\n", note);
    }

    if results.incomplete_results {
        warn!("Results may be incomplete due to request timeout.");
    }
    Ok(())
}

/// Reminder printed after terminal output whose limit was lowered.
pub fn capped_note(search: &SearchOptions) -> Option<String> {
    search.limit_capped.then(|| {
        format!(
            "Only the first {} results are printed to the terminal. Use --output-format json or csv for more.",
            STDOUT_LIMIT
        )
    })
}

pub fn write_json(path: &Path, items: &[Value]) -> Result<(), OutputError> {
    let json = serde_json::to_string(items)?;
    fs::write(path, json).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_csv(path: &Path, items: &[Value]) -> Result<(), OutputError> {
    let file = fs::File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv_to(file, items)
}

/// Writes items as CSV with dotted column names for nested objects.
pub fn write_csv_to<W: io::Write>(writer: W, items: &[Value]) -> Result<(), OutputError> {
    let rows: Vec<Vec<(String, String)>> = items
        .iter()
        .map(|item| {
            let mut row = Vec::new();
            flatten("", item, &mut row);
            row
        })
        .collect();

    let mut columns: Vec<String> = Vec::new();
    for (key, _) in rows.iter().flatten() {
        if !columns.contains(key) {
            columns.push(key.clone());
        }
    }

    let mut wtr = csv::Writer::from_writer(writer);
    if !columns.is_empty() {
        wtr.write_record(&columns)?;
    }
    for row in &rows {
        let record = columns.iter().map(|column| {
            row.iter()
                .find(|(key, _)| key == column)
                .map(|(_, value)| value.as_str())
                .unwrap_or("")
        });
        wtr.write_record(record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn flatten(prefix: &str, value: &Value, row: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, nested) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&name, nested, row);
            }
        }
        _ => {
            let text = match value {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            row.push((prefix.to_string(), text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{DateRange, StarsRange};
    use serde_json::json;

    fn search(limit_capped: bool) -> SearchOptions {
        SearchOptions {
            topics: vec!["cli".into()],
            languages: Vec::new(),
            stars: StarsRange::default(),
            created: DateRange::default(),
            sort: None,
            order: None,
            limit: STDOUT_LIMIT,
            limit_capped,
            output: OutputTarget::Stdout,
            force: false,
            raw: false,
        }
    }

    fn csv_text(items: &[Value]) -> String {
        let mut buffer = Vec::new();
        write_csv_to(&mut buffer, items).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_csv_flattens_nested_objects() {
        let items = vec![json!({
            "name": "repo",
            "owner": {"login": "octo"},
            "topics": ["cli", "rust"],
            "homepage": null,
        })];

        let text = csv_text(&items);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("homepage,name,owner.login,topics"));
        assert_eq!(lines.next(), Some(",repo,octo,\"[\"\"cli\"\",\"\"rust\"\"]\""));
    }

    #[test]
    fn test_csv_union_of_columns() {
        let items = vec![json!({"a": 1}), json!({"b": true, "a": 2})];
        assert_eq!(csv_text(&items), "a,b\n1,\n2,true\n");
    }

    #[test]
    fn test_csv_empty_items() {
        assert_eq!(csv_text(&[]), "");
    }

    #[test]
    fn test_json_file_round_trips_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let items = vec![json!({"id": 1}), json!({"id": 2})];

        write_json(&path, &items).unwrap();
        let written: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, items);
    }

    #[test]
    fn test_json_file_in_missing_dir_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");

        match write_json(&path, &[json!({"id": 1})]) {
            Err(OutputError::Io { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected an io error, got {:?}", other),
        }
    }

    #[test]
    fn test_capped_note_only_when_limit_was_lowered() {
        let note = capped_note(&search(true)).unwrap();
        assert!(note.contains("first 50 results"));
        assert_eq!(capped_note(&search(false)), None);
    }
}
