//! Index command implementation.

use std::io::Write;
use std::path::Path;

use noteindex_core::index::{IndexBuilder, IndexDb, ProgressCallback};
use noteindex_core::notebook::NotebookSource;

use crate::IndexArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: &IndexArgs) {
    let (rc, _log) = super::load_config(config, profile);

    if let Some(index_dir) = rc.index_path.parent()
        && let Err(e) = std::fs::create_dir_all(index_dir)
    {
        eprintln!("Error creating index directory: {}", e);
        std::process::exit(1);
    }

    let mut db = match IndexDb::open(&rc.index_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error opening index database: {}", e);
            std::process::exit(1);
        }
    };

    let source = match NotebookSource::new(&rc.notebook_root, rc.excluded_folders.clone()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error opening notebook: {}", e);
            std::process::exit(1);
        }
    };

    println!("Indexing notebook: {}", rc.notebook_root.display());

    let progress: ProgressCallback = if args.verbose {
        Box::new(|current, total, path| {
            println!("[{}/{}] {}", current, total, path);
        })
    } else {
        Box::new(|current, total, _path| {
            if current % 50 == 0 || current == total {
                print!("\rIndexing... {}/{}", current, total);
                std::io::stdout().flush().ok();
            }
        })
    };

    let result = IndexBuilder::new(&mut db).with_progress(progress).reindex(&source, args.force);
    match result {
        Ok(stats) => {
            if !args.verbose && stats.added + stats.modified + stats.removed > 0 {
                println!();
            }
            for (path, e) in &stats.failures {
                tracing::warn!(path = %path, "note not indexed: {}", e);
            }

            println!();
            println!("Indexing complete:");
            println!("  Files found:    {}", stats.files_found);
            println!("  Added:          {}", stats.added);
            println!("  Modified:       {}", stats.modified);
            println!("  Removed:        {}", stats.removed);
            println!("  Unchanged:      {}", stats.unchanged);
            if !stats.failures.is_empty() {
                println!("  Failed:         {}", stats.failures.len());
            }
            println!("  Duration:       {}ms", stats.duration_ms);
            println!();
            println!("Index stored at: {}", rc.index_path.display());
        }
        Err(e) => {
            eprintln!("\nError during indexing: {}", e);
            std::process::exit(1);
        }
    }
}
