pub mod doctor;
pub mod index;
pub mod list;

use std::path::Path;

use noteindex_core::config::loader::ConfigLoader;
use noteindex_core::config::types::ResolvedConfig;

use crate::logging::LogGuard;

/// Load the configuration and start logging, or exit with an error.
fn load_config(config: Option<&Path>, profile: Option<&str>) -> (ResolvedConfig, LogGuard) {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let guard = crate::logging::init(&rc);
    (rc, guard)
}
