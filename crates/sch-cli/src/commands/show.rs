use sch_sandbox::{Sandbox, SandboxRegistries};
use serde_json::Value;

use super::Workspace;

pub fn run(workspace: &Workspace, id: &str) -> Result<(), String> {
    let registries = SandboxRegistries::new(&Sandbox::new().into_shared());

    let schematics = workspace.load_schematics(&registries)?;
    let serialized = match schematics.get(id) {
        Some(schematic) => schematics.to_record(schematic),
        None => {
            let animations = workspace.load_animations(&registries)?;
            let animation = animations
                .get(id)
                .ok_or_else(|| format!("no schematic or animation named '{id}'"))?;
            animations.to_record(animation)
        }
    };
    let record = serialized.map_err(|e| format!("cannot serialize '{id}': {e}"))?;

    let text = serde_json::to_string_pretty(&Value::Object(record)).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}
