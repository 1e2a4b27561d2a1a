//! Composable note filters.
//!
//! Each [`Filter`] compiles to one SQL predicate over the `notes n` table
//! plus its bound parameters. The finder ANDs the predicates together into a
//! single statement, so filtering and `LIMIT` both happen in SQLite.

use chrono::{DateTime, Days, NaiveTime, Utc};
use rusqlite::types::Value;

use super::db::encode_time;

/// A predicate on indexed notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Full-text query in FTS5 syntax. `|` is accepted as an alias of `OR`.
    /// Orders results by relevance and enables match snippets.
    Match(String),
    /// Keep notes whose path matches any of the patterns.
    Path(Vec<String>),
    /// Drop notes whose path matches any of the patterns.
    ExcludePath(Vec<String>),
    /// Compare the created or modified date.
    Date(DateFilter),
}

impl Filter {
    pub fn matching(query: impl Into<String>) -> Self {
        Self::Match(query.into())
    }

    pub fn path<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Path(patterns.into_iter().map(Into::into).collect())
    }

    pub fn exclude_path<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ExcludePath(patterns.into_iter().map(Into::into).collect())
    }

    pub fn created(direction: DateDirection, date: DateTime<Utc>) -> Self {
        Self::Date(DateFilter { date, field: DateField::Created, direction })
    }

    pub fn modified(direction: DateDirection, date: DateTime<Utc>) -> Self {
        Self::Date(DateFilter { date, field: DateField::Modified, direction })
    }

    /// The SQL predicate for this filter, or `None` when it has nothing to
    /// constrain (blank query, empty pattern list).
    pub(crate) fn compile(&self) -> Option<Fragment> {
        match self {
            Self::Match(query) => {
                let query = convert_query(query);
                if query.trim().is_empty() {
                    return None;
                }
                Some(Fragment {
                    sql: "notes_fts MATCH ?".to_string(),
                    params: vec![Value::Text(query)],
                    full_text: true,
                })
            }
            Self::Path(patterns) => path_predicate(patterns),
            Self::ExcludePath(patterns) => path_predicate(patterns).map(|f| Fragment {
                sql: format!("NOT ({})", f.sql),
                ..f
            }),
            Self::Date(filter) => Some(filter.compile()),
        }
    }

    /// Short human-readable form, used as error context.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Match(query) => format!("match {:?}", convert_query(query)),
            Self::Path(patterns) => format!("path {}", patterns.join(", ")),
            Self::ExcludePath(patterns) => format!("exclude {}", patterns.join(", ")),
            Self::Date(filter) => {
                let field = match filter.field {
                    DateField::Created => "created",
                    DateField::Modified => "modified",
                };
                let direction = match filter.direction {
                    DateDirection::Before => "before",
                    DateDirection::On => "on",
                    DateDirection::After => "after",
                };
                format!("{field} {direction} {}", filter.date.to_rfc3339())
            }
        }
    }
}

/// Which timestamp a [`DateFilter`] looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Created,
    Modified,
}

impl DateField {
    fn column(self) -> &'static str {
        match self {
            Self::Created => "n.created",
            Self::Modified => "n.modified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateDirection {
    /// Strictly earlier than the date.
    Before,
    /// Same calendar day (UTC) as the date.
    On,
    /// Strictly later than the date.
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFilter {
    pub date: DateTime<Utc>,
    pub field: DateField,
    pub direction: DateDirection,
}

impl DateFilter {
    fn compile(&self) -> Fragment {
        let column = self.field.column();
        let (sql, params) = match self.direction {
            DateDirection::Before => (format!("{column} < ?"), vec![encode_time(&self.date)]),
            DateDirection::After => (format!("{column} > ?"), vec![encode_time(&self.date)]),
            DateDirection::On => {
                let (start, end) = day_bounds(&self.date);
                (
                    format!("({column} >= ? AND {column} < ?)"),
                    vec![encode_time(&start), encode_time(&end)],
                )
            }
        };

        Fragment {
            sql,
            params: params.into_iter().map(Value::Text).collect(),
            full_text: false,
        }
    }
}

/// A compiled filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Fragment {
    pub sql: String,
    pub params: Vec<Value>,
    /// The predicate references `notes_fts` and needs the full-text join.
    pub full_text: bool,
}

/// Start of the UTC day containing `date`, and start of the next day.
fn day_bounds(date: &DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day = date.date_naive();
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = day
        .checked_add_days(Days::new(1))
        .map_or(DateTime::<Utc>::MAX_UTC, |next| next.and_time(NaiveTime::MIN).and_utc());
    (start, end)
}

/// OR of GLOB tests, one per pattern. A pattern matches the path itself or
/// anything below it when read as a directory. `*` is the only wildcard.
fn path_predicate(patterns: &[String]) -> Option<Fragment> {
    let patterns: Vec<&str> = patterns
        .iter()
        .map(|p| p.trim_end_matches('/'))
        .filter(|p| !p.is_empty())
        .collect();

    if patterns.is_empty() {
        return None;
    }

    let mut clauses = Vec::with_capacity(patterns.len());
    let mut params = Vec::with_capacity(patterns.len() * 2);
    for pattern in patterns.into_iter().map(escape_glob) {
        clauses.push("n.path GLOB ? OR n.path GLOB ?");
        params.push(Value::Text(pattern.to_string()));
        params.push(Value::Text(format!("{pattern}/*")));
    }

    Some(Fragment { sql: format!("({})", clauses.join(" OR ")), params, full_text: false })
}

/// Quote the GLOB metacharacters other than `*` so they match literally.
fn escape_glob(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '[' => escaped.push_str("[[]"),
            '?' => escaped.push_str("[?]"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Rewrite the user-facing query syntax into FTS5 syntax.
///
/// A `|` outside double quotes becomes ` OR `; everything else, including
/// native FTS5 operators and quoted phrases, is passed through untouched.
pub fn convert_query(query: &str) -> String {
    let mut converted = String::with_capacity(query.len());
    let mut in_quotes = false;

    for c in query.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                converted.push(c);
            }
            '|' if !in_quotes => converted.push_str(" OR "),
            _ => converted.push(c),
        }
    }

    converted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::test_support::utc;

    #[test]
    fn test_convert_query_pipes() {
        assert_eq!(convert_query("daily | index"), "daily  OR  index");
        assert_eq!(convert_query("daily|index"), "daily OR index");
        assert_eq!(convert_query(r#""a | b" | c"#), r#""a | b"  OR  c"#);
        assert_eq!(convert_query("one NOT two"), "one NOT two");
    }

    #[test]
    fn test_blank_match_compiles_to_nothing() {
        assert_eq!(Filter::matching("  ").compile(), None);
        assert_eq!(Filter::path(Vec::<String>::new()).compile(), None);
        assert_eq!(Filter::exclude_path(["/"]).compile(), None);
    }

    #[test]
    fn test_path_patterns_or_together() {
        let fragment = Filter::path(["ref/", "index.md"]).compile().unwrap();

        assert_eq!(
            fragment.sql,
            "(n.path GLOB ? OR n.path GLOB ? OR n.path GLOB ? OR n.path GLOB ?)"
        );
        assert_eq!(
            fragment.params,
            ["ref", "ref/*", "index.md", "index.md/*"]
                .map(|p| Value::Text(p.to_string()))
                .to_vec()
        );
        assert!(!fragment.full_text);
    }

    #[test]
    fn test_path_brackets_and_question_marks_are_literal() {
        let fragment = Filter::path(["drafts/[wip]", "why?.md"]).compile().unwrap();

        assert_eq!(
            fragment.params,
            ["drafts/[[]wip]", "drafts/[[]wip]/*", "why[?].md", "why[?].md/*"]
                .map(|p| Value::Text(p.to_string()))
                .to_vec()
        );
    }

    #[test]
    fn test_describe_filters() {
        assert_eq!(Filter::matching("a|b").describe(), r#"match "a OR b""#);
        assert_eq!(Filter::exclude_path(["log", "ref"]).describe(), "exclude log, ref");
        assert_eq!(
            Filter::created(DateDirection::After, utc(2020, 11, 22, 0, 0, 0)).describe(),
            "created after 2020-11-22T00:00:00+00:00"
        );
    }

    #[test]
    fn test_exclude_path_negates() {
        let fragment = Filter::exclude_path(["log"]).compile().unwrap();
        assert_eq!(fragment.sql, "NOT ((n.path GLOB ? OR n.path GLOB ?))");
    }

    #[test]
    fn test_date_on_spans_the_day() {
        let fragment =
            Filter::created(DateDirection::On, utc(2020, 11, 22, 10, 12, 45)).compile().unwrap();

        assert_eq!(fragment.sql, "(n.created >= ? AND n.created < ?)");
        assert_eq!(
            fragment.params,
            vec![
                Value::Text("2020-11-22T00:00:00.000000000Z".to_string()),
                Value::Text("2020-11-23T00:00:00.000000000Z".to_string()),
            ]
        );
    }

    #[test]
    fn test_date_before_after_are_strict() {
        let date = utc(2020, 1, 20, 8, 52, 42);

        assert_eq!(
            Filter::modified(DateDirection::Before, date).compile().unwrap().sql,
            "n.modified < ?"
        );
        assert_eq!(
            Filter::modified(DateDirection::After, date).compile().unwrap().sql,
            "n.modified > ?"
        );
    }

    #[test]
    fn test_match_needs_full_text() {
        let fragment = Filter::matching("daily | index").compile().unwrap();
        assert!(fragment.full_text);
        assert_eq!(fragment.params, vec![Value::Text("daily  OR  index".to_string())]);
    }
}
