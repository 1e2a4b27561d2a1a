//! Compile [`FinderOpts`] into one query and stream the matching notes.

use rusqlite::params_from_iter;
use rusqlite::types::Value;

use super::db::IndexError;
use super::notes::{NOTE_COLUMNS, NoteDao, row_to_metadata};
use super::types::{FinderOpts, Match};

/// Opening marker around a matched term in a snippet.
pub const MATCH_START: &str = "<nidx:match>";
/// Closing marker around a matched term in a snippet.
pub const MATCH_END: &str = "</nidx:match>";

/// Maximum number of tokens in a snippet.
const SNIPPET_TOKENS: usize = 20;

/// bm25 column weights for path, title and body.
const RANK: &str = "bm25(notes_fts, 1000.0, 500.0, 1.0)";

/// A compiled finder query.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
    pub full_text: bool,
    /// What was asked for, without the SQL.
    pub summary: String,
}

impl CompiledQuery {
    pub fn new(opts: &FinderOpts) -> Self {
        let mut predicates = Vec::new();
        let mut params = Vec::new();
        let mut full_text_queries = Vec::new();
        let mut summary: Vec<String> = opts.filters.iter().map(|f| f.describe()).collect();

        for filter in &opts.filters {
            let Some(fragment) = filter.compile() else { continue };

            // Only one MATCH constraint per statement; combine them instead.
            if fragment.full_text {
                full_text_queries.extend(fragment.params);
                continue;
            }
            predicates.push(fragment.sql);
            params.extend(fragment.params);
        }

        let full_text = !full_text_queries.is_empty();
        let mut sql = format!("SELECT {NOTE_COLUMNS}");
        if full_text {
            sql.push_str(&format!(
                ", snippet(notes_fts, 2, '{MATCH_START}', '{MATCH_END}', '…', \
                 {SNIPPET_TOKENS})"
            ));
        }
        sql.push_str(" FROM notes n");

        if full_text {
            sql.push_str(" JOIN notes_fts ON n.id = notes_fts.rowid");
            predicates.insert(0, "notes_fts MATCH ?".to_string());
            params.insert(0, Value::Text(join_full_text(full_text_queries)));
        }

        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }

        if full_text {
            sql.push_str(&format!(" ORDER BY {RANK}, n.path"));
        } else {
            sql.push_str(" ORDER BY n.title, n.path");
        }

        if opts.limit > 0 {
            sql.push_str(" LIMIT ?");
            params.push(Value::Integer(i64::try_from(opts.limit).unwrap_or(i64::MAX)));
            summary.push(format!("limit {}", opts.limit));
        }

        let summary = if summary.is_empty() {
            "all notes".to_string()
        } else {
            summary.join("; ")
        };
        Self { sql, params, full_text, summary }
    }
}

fn join_full_text(queries: Vec<Value>) -> String {
    let mut texts: Vec<String> = queries
        .into_iter()
        .filter_map(|v| match v {
            Value::Text(text) => Some(text),
            _ => None,
        })
        .collect();

    if texts.len() == 1 {
        return texts.remove(0);
    }
    texts.iter().map(|t| format!("({t})")).collect::<Vec<_>>().join(" AND ")
}

impl NoteDao<'_> {
    /// Run a query, passing each match to `visit` in result order.
    ///
    /// Returns the number of matches visited. The first error returned by
    /// `visit` stops the iteration and is returned as is.
    pub fn find<F, E>(&self, opts: &FinderOpts, mut visit: F) -> Result<usize, E>
    where
        F: FnMut(Match) -> Result<(), E>,
        E: From<IndexError>,
    {
        let query = CompiledQuery::new(opts);
        tracing::debug!(sql = %query.sql, params = query.params.len(), "finding notes");

        let fail = |source: rusqlite::Error| {
            E::from(IndexError::Query { query: query.summary.clone(), source })
        };

        let mut stmt = self.conn.prepare(&query.sql).map_err(fail)?;
        let mut rows = stmt.query(params_from_iter(query.params.iter())).map_err(fail)?;

        let mut count = 0;
        while let Some(row) = rows.next().map_err(fail)? {
            let metadata = row_to_metadata(row).map_err(fail)?;
            let snippet = if query.full_text {
                row.get(7).map_err(fail)?
            } else {
                leading_snippet(&metadata.body)
            };

            visit(Match { metadata, snippet })?;
            count += 1;
        }

        Ok(count)
    }

    /// Collect every match of a query.
    pub fn find_all(&self, opts: &FinderOpts) -> Result<Vec<Match>, IndexError> {
        let mut matches = Vec::new();
        self.find(opts, |m| {
            matches.push(m);
            Ok::<_, IndexError>(())
        })?;
        Ok(matches)
    }
}

/// The first words of a body, for results without a full-text match.
fn leading_snippet(body: &str) -> String {
    let mut words = body.split_whitespace();
    let mut snippet = words.by_ref().take(SNIPPET_TOKENS).collect::<Vec<_>>().join(" ");
    if words.next().is_some() {
        snippet.push('…');
    }
    snippet
}
