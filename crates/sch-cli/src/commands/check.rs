use colored::Colorize;
use sch_sandbox::{Sandbox, SandboxRegistries};

use super::{Workspace, print_skipped};

pub fn run(workspace: &Workspace) -> Result<(), String> {
    let registries = SandboxRegistries::new(&Sandbox::new().into_shared());

    let mut schematics = workspace.schematic_store(&registries);
    let schematic_report = schematics
        .load()
        .map_err(|e| format!("cannot load schematics: {e}"))?;
    let mut animations = workspace.animation_store(&registries);
    let animation_report = animations
        .load()
        .map_err(|e| format!("cannot load animations: {e}"))?;

    print_skipped(&schematic_report);
    print_skipped(&animation_report);

    let skipped = schematic_report.skipped.len() + animation_report.skipped.len();
    if skipped > 0 {
        return Err(format!(
            "{skipped} file{} could not be loaded",
            if skipped == 1 { "" } else { "s" }
        ));
    }

    println!("  {}", "All artifacts loaded.".green());
    println!(
        "  {} schematics, {} animations",
        schematic_report.loaded, animation_report.loaded
    );
    Ok(())
}
