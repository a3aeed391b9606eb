use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use sch_core::Coordinate;
use sch_sandbox::{Sandbox, SandboxRegistries};
use serde_json::json;

use super::{Workspace, format_coordinate};

pub fn run(
    workspace: &Workspace,
    id: &str,
    at: Option<Coordinate>,
    as_json: bool,
) -> Result<(), String> {
    let sandbox = Sandbox::new().into_shared();
    let registries = SandboxRegistries::new(&sandbox);
    let schematics = workspace.load_schematics(&registries)?;
    let schematic = schematics
        .get(id)
        .ok_or_else(|| format!("no schematic named '{id}'"))?;

    let anchor = at.unwrap_or(schematic.initial_position());
    let report = schematic
        .apply_at(anchor)
        .map_err(|e| format!("applying '{id}' failed: {e}"))?;

    let world = sandbox
        .lock()
        .map_err(|_| "sandbox lock is poisoned".to_string())?;

    if as_json {
        let value = json!({
            "applied": report.applied,
            "skipped": report.skipped,
            "blocks": world.blocks(),
            "entities": world.entities(),
        });
        let text = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    println!(
        "  {} '{id}' at {}",
        "Applied".bold(),
        format_coordinate(anchor)
    );
    println!(
        "  {} applied, {} skipped",
        report.applied.to_string().green(),
        report.skipped.to_string().yellow()
    );

    let blocks = world.blocks();
    if !blocks.is_empty() {
        println!();
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Block", "Material"]);
        for block in &blocks {
            table.add_row(vec![block.pos.to_string(), block.material.to_string()]);
        }
        println!("{table}");
    }

    if !world.entities().is_empty() {
        println!();
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Entity", "Location"]);
        for entity in world.entities() {
            table.add_row(vec![entity.entity_type.to_string(), format_coordinate(entity.at)]);
        }
        println!("{table}");
    }

    Ok(())
}
