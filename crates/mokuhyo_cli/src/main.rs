//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to inspect a data file from the terminal.
//! - Keep output deterministic for quick local sanity checks.

use mokuhyo_core::{JsonFileStore, MboService};

fn main() {
    let data_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "mbo_data.json".to_string());

    let service = MboService::open(JsonFileStore::new(&data_file));

    println!("mokuhyo_core version={}", mokuhyo_core::core_version());
    println!("data_file={data_file}");

    match service.current_period_name() {
        Some(name) => {
            let stats = service.statistics();
            println!("current_period={name}");
            println!(
                "goals={} completed={} partial={} total_weight={} items={} achievement_rate={:.1}",
                stats.total_goals,
                stats.completed_goals,
                stats.partial_goals,
                stats.total_weight,
                stats.total_achievement_items,
                stats.achievement_rate
            );
        }
        None => println!("current_period=none"),
    }
}
