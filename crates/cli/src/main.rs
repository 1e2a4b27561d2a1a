mod cmd;
mod logging;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "nidx", version, about = "Index and search a directory of markdown notes")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved paths
    Doctor,

    /// Bring the index up to date with the notebook
    Index(IndexArgs),

    /// List indexed notes, optionally filtered and searched
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Re-read every note, even when its modification time is unchanged
    #[arg(long)]
    pub force: bool,

    /// Print each note as it is processed
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Full-text query (FTS5 syntax, `|` for OR)
    pub query: Option<String>,

    /// Only notes under this path or matching this glob (repeatable)
    #[arg(long = "path", value_name = "GLOB")]
    pub paths: Vec<String>,

    /// Leave out notes under this path or matching this glob (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Created strictly before this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub created_before: Option<DateTime<Utc>>,

    /// Created strictly after this date
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub created_after: Option<DateTime<Utc>>,

    /// Created on this calendar day (UTC)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub created_on: Option<DateTime<Utc>>,

    /// Modified strictly before this date
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub modified_before: Option<DateTime<Utc>>,

    /// Modified strictly after this date
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub modified_after: Option<DateTime<Utc>>,

    /// Modified on this calendar day (UTC)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub modified_on: Option<DateTime<Utc>>,

    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse YYYY-MM-DD (midnight UTC) or an RFC 3339 timestamp.
fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD or RFC 3339"))
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref(), cli.profile.as_deref()),
        Commands::Index(args) => {
            cmd::index::run(cli.config.as_deref(), cli.profile.as_deref(), &args)
        }
        Commands::List(args) => {
            cmd::list::run(cli.config.as_deref(), cli.profile.as_deref(), &args)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2020-11-22"),
            Ok(Utc.with_ymd_and_hms(2020, 11, 22, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2020-11-22T16:27:45+02:00"),
            Ok(Utc.with_ymd_and_hms(2020, 11, 22, 14, 27, 45).unwrap())
        );
        assert!(parse_date("last tuesday").is_err());
    }

    #[test]
    fn test_cli_parses_list_filters() {
        let cli = Cli::try_parse_from([
            "nidx", "list", "daily | index", "--path", "log", "--path", "ref", "--exclude",
            "ref/test", "--modified-on", "2020-11-29", "-n", "3",
        ])
        .unwrap();

        let Commands::List(args) = cli.command else { panic!("expected list") };
        assert_eq!(args.query.as_deref(), Some("daily | index"));
        assert_eq!(args.paths, vec!["log", "ref"]);
        assert_eq!(args.excludes, vec!["ref/test"]);
        assert!(args.modified_on.is_some());
        assert_eq!(args.limit, Some(3));
    }
}
