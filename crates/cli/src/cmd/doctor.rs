use std::path::Path;

use noteindex_core::config::loader::{ConfigLoader, default_config_path};
use noteindex_core::index::IndexDb;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            println!("FAIL nidx doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    };

    let _log = crate::logging::init(&rc);

    println!("OK   nidx doctor");
    println!(
        "path: {}",
        config.map_or_else(
            || default_config_path().display().to_string(),
            |p| p.display().to_string()
        )
    );
    println!("profile: {}", rc.active_profile);
    println!("notebook_root: {}", rc.notebook_root.display());
    println!("index_path: {}", rc.index_path.display());
    for folder in &rc.excluded_folders {
        println!("excluded: {}", folder.display());
    }

    if !rc.notebook_root.is_dir() {
        println!("WARN notebook_root is not a directory");
    }

    if !rc.index_path.exists() {
        println!("index: not built yet (run 'nidx index')");
        return;
    }

    match IndexDb::open(&rc.index_path).and_then(|db| db.notes().count()) {
        Ok(count) => println!("index: {count} notes"),
        Err(e) => {
            tracing::error!("can't read index: {e}");
            println!("FAIL index: {e}");
            std::process::exit(1);
        }
    }
}
