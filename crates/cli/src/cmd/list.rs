//! List command implementation.

use std::path::Path;

use noteindex_core::index::{
    DateDirection, Filter, FinderOpts, IndexDb, MATCH_END, MATCH_START, Match,
};
use serde::Serialize;

use crate::ListArgs;

/// Search result for JSON output.
#[derive(Debug, Serialize)]
struct MatchOutput {
    path: String,
    title: String,
    word_count: u32,
    created: String,
    modified: String,
    snippet: String,
}

impl From<&Match> for MatchOutput {
    fn from(m: &Match) -> Self {
        Self {
            path: m.metadata.path.clone(),
            title: m.metadata.title.clone(),
            word_count: m.metadata.word_count,
            created: m.metadata.created.to_rfc3339(),
            modified: m.metadata.modified.to_rfc3339(),
            snippet: m.snippet.clone(),
        }
    }
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: &ListArgs) {
    let (rc, _log) = super::load_config(config, profile);

    if !rc.index_path.exists() {
        eprintln!("Error opening index: {} does not exist", rc.index_path.display());
        eprintln!("Hint: Run 'nidx index' to build the index first.");
        std::process::exit(1);
    }

    let db = match IndexDb::open(&rc.index_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error opening index: {}", e);
            std::process::exit(1);
        }
    };

    let opts = FinderOpts::new(build_filters(args)).with_limit(args.limit.unwrap_or(0));
    tracing::debug!(filters = opts.filters.len(), limit = opts.limit, "listing notes");

    let matches = match db.notes().find_all(&opts) {
        Ok(matches) => matches,
        Err(e) => {
            eprintln!("Error searching: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        print_matches_json(&matches);
    } else {
        print_matches(&matches, args.query.is_some());
    }
}

fn build_filters(args: &ListArgs) -> Vec<Filter> {
    let mut filters = Vec::new();

    if let Some(ref query) = args.query {
        filters.push(Filter::matching(query.as_str()));
    }
    if !args.paths.is_empty() {
        filters.push(Filter::path(args.paths.iter().cloned()));
    }
    if !args.excludes.is_empty() {
        filters.push(Filter::exclude_path(args.excludes.iter().cloned()));
    }

    let created = [
        (args.created_before, DateDirection::Before),
        (args.created_on, DateDirection::On),
        (args.created_after, DateDirection::After),
    ];
    for (date, direction) in created {
        if let Some(date) = date {
            filters.push(Filter::created(direction, date));
        }
    }

    let modified = [
        (args.modified_before, DateDirection::Before),
        (args.modified_on, DateDirection::On),
        (args.modified_after, DateDirection::After),
    ];
    for (date, direction) in modified {
        if let Some(date) = date {
            filters.push(Filter::modified(direction, date));
        }
    }

    filters
}

fn print_matches(matches: &[Match], with_snippets: bool) {
    if matches.is_empty() {
        println!("(no notes found)");
        return;
    }

    let path_width =
        matches.iter().map(|m| m.metadata.path.len()).max().unwrap_or(4).clamp(4, 40);

    for m in matches {
        println!(
            "{:<path_width$}  {}  {}",
            m.metadata.path,
            m.metadata.modified.format("%Y-%m-%d %H:%M"),
            m.metadata.title,
            path_width = path_width,
        );
        if with_snippets && !m.snippet.is_empty() {
            println!("    {}", highlight(&m.snippet));
        }
    }

    println!();
    println!("-- {} notes --", matches.len());
}

/// Render match markers as `*term*` for the terminal.
fn highlight(snippet: &str) -> String {
    snippet.replace(MATCH_START, "*").replace(MATCH_END, "*").replace('\n', " ")
}

fn print_matches_json(matches: &[Match]) {
    let output: Vec<MatchOutput> = matches.iter().map(MatchOutput::from).collect();
    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
}
