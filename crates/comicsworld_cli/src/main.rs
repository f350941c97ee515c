//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `comicsworld_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use comicsworld_core::{ComicsRepository, StaticComicsRepository};

fn main() {
    println!("comicsworld_core ping={}", comicsworld_core::ping());
    println!(
        "comicsworld_core version={}",
        comicsworld_core::core_version()
    );

    let catalog = StaticComicsRepository::new().get_comics().get();
    println!("comicsworld_core catalog_size={}", catalog.len());
}
