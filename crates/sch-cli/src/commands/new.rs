use sch_codec::{SaveOutcome, StoreConfig, validate_id};
use sch_core::{Coordinate, Schematic};
use sch_sandbox::{Sandbox, SandboxRegistries};

use super::Workspace;

pub fn run(
    workspace: &Workspace,
    id: &str,
    at: Option<Coordinate>,
    force: bool,
) -> Result<(), String> {
    validate_id(id).map_err(|e| e.to_string())?;

    let registries = SandboxRegistries::new(&Sandbox::new().into_shared());
    let store = workspace
        .schematic_store(&registries)
        .with_config(StoreConfig::default().with_overwrite(force));
    let schematic = Schematic::with_id(id, at.unwrap_or(Coordinate::ORIGIN));

    match store.save(&schematic).map_err(|e| e.to_string())? {
        SaveOutcome::Written(path) => {
            println!("  Created schematic '{id}' in {}", path.display());
            Ok(())
        }
        SaveOutcome::Kept(path) => Err(format!(
            "{} already exists (use --force to replace it)",
            path.display()
        )),
    }
}
