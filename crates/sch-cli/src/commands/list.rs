use comfy_table::{ContentArrangement, Table};
use sch_sandbox::{Sandbox, SandboxRegistries};

use super::{Workspace, format_coordinate};

pub fn run(workspace: &Workspace) -> Result<(), String> {
    let registries = SandboxRegistries::new(&Sandbox::new().into_shared());
    let schematics = workspace.load_schematics(&registries)?;
    let animations = workspace.load_animations(&registries)?;

    if schematics.is_empty() && animations.is_empty() {
        println!("  No schematics or animations found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Kind", "Details"]);

    for schematic in schematics.items() {
        table.add_row(vec![
            schematic.id().unwrap_or("-").to_string(),
            "schematic".to_string(),
            format!(
                "{} modifications at {}",
                schematic.len(),
                format_coordinate(schematic.initial_position())
            ),
        ]);
    }
    for animation in animations.items() {
        table.add_row(vec![
            animation.id().unwrap_or("-").to_string(),
            "animation".to_string(),
            format!(
                "{} transitions, {} ms",
                animation.len(),
                animation.total_time()
            ),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} schematics, {} animations",
        schematics.len(),
        animations.len()
    );
    Ok(())
}
