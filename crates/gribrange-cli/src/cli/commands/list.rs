//! `gribrange list <index>` – print the records of an index.

use anyhow::Result;
use gribrange_core::config::Settings;
use gribrange_core::job;

pub async fn run_list(settings: &Settings, index: &str, parameters: &[String]) -> Result<()> {
    let entries = job::load_index(index, &settings.index_fetch_options()).await?;
    let shown: Vec<_> = entries
        .iter()
        .filter(|e| parameters.is_empty() || parameters.iter().any(|p| p == &e.parameter))
        .collect();

    if shown.is_empty() {
        println!("No matching records in index.");
        return Ok(());
    }
    println!(
        "{:<6} {:<12} {:<12} {:<10} {:<28} {}",
        "SEQ", "OFFSET", "DATE", "PARAM", "LEVEL", "KIND"
    );
    for e in shown {
        println!(
            "{:<6} {:<12} {:<12} {:<10} {:<28} {}",
            e.sequence_number, e.byte_offset, e.date, e.parameter, e.level, e.record_kind
        );
    }
    Ok(())
}
