pub mod config;
pub mod index;
pub mod notebook;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
