//! Validate command handler

use anyhow::Result;
use colored::*;
use std::path::Path;

use super::load_pipeline;

/// Check the pipeline structure and print a summary of it
pub fn handle_validate(path: &Path) -> Result<()> {
    let spec = load_pipeline(path)?;

    println!("{}", "✓ Pipeline is valid".green().bold());
    println!(
        "  Stages: {}, work items: {}",
        spec.stages.len(),
        spec.work_item_count()
    );

    for (stage_idx, stage) in spec.stages.iter().enumerate() {
        println!(
            "  {} Stage {} ({} parallel chain(s))",
            "▸".cyan(),
            stage_idx + 1,
            stage.chains().len()
        );
        for (chain_idx, chain) in stage.chains().iter().enumerate() {
            println!("    Chain {}:", chain_idx + 1);
            for item in chain.items() {
                println!("      - {}", item.as_str().dimmed());
            }
        }
    }

    Ok(())
}
