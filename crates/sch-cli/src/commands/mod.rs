pub mod apply;
pub mod check;
pub mod list;
pub mod new;
pub mod play;
pub mod show;

use std::path::{Path, PathBuf};

use colored::Colorize;
use sch_animation::AnimationDefinition;
use sch_codec::{LoadReport, RecordPolicy, Store, StoreConfig, schematic_blueprint_with_policy};
use sch_core::{Coordinate, Schematic};
use sch_sandbox::SandboxRegistries;

/// Subdirectory holding schematic files.
pub const SCHEMATICS_DIR: &str = "schematics";
/// Subdirectory holding animation files.
pub const ANIMATIONS_DIR: &str = "animations";

/// The artifact directories a command works on.
pub struct Workspace {
    dir: PathBuf,
    policy: RecordPolicy,
}

impl Workspace {
    pub fn new(dir: &Path, skip_invalid: bool) -> Self {
        let policy = if skip_invalid {
            RecordPolicy::SkipInvalid
        } else {
            RecordPolicy::Strict
        };
        Self {
            dir: dir.to_path_buf(),
            policy,
        }
    }

    pub fn schematics_dir(&self) -> PathBuf {
        self.dir.join(SCHEMATICS_DIR)
    }

    pub fn animations_dir(&self) -> PathBuf {
        self.dir.join(ANIMATIONS_DIR)
    }

    /// A schematic store that does not create missing directories.
    pub fn schematic_store(&self, registries: &SandboxRegistries) -> Store<Schematic> {
        Store::new(
            self.schematics_dir(),
            schematic_blueprint_with_policy(registries.modifications.clone(), self.policy),
        )
        .with_config(StoreConfig::default().with_create_missing(false))
    }

    /// An animation store that does not create missing directories.
    pub fn animation_store(&self, registries: &SandboxRegistries) -> Store<AnimationDefinition> {
        Store::new(self.animations_dir(), registries.animation_blueprint())
            .with_config(StoreConfig::default().with_create_missing(false))
    }

    /// Load every schematic, warning about skipped files on stderr.
    pub fn load_schematics(
        &self,
        registries: &SandboxRegistries,
    ) -> Result<Store<Schematic>, String> {
        let mut store = self.schematic_store(registries);
        let report = store
            .load()
            .map_err(|e| format!("cannot load schematics: {e}"))?;
        print_skipped(&report);
        Ok(store)
    }

    /// Load every animation, warning about skipped files on stderr.
    pub fn load_animations(
        &self,
        registries: &SandboxRegistries,
    ) -> Result<Store<AnimationDefinition>, String> {
        let mut store = self.animation_store(registries);
        let report = store
            .load()
            .map_err(|e| format!("cannot load animations: {e}"))?;
        print_skipped(&report);
        Ok(store)
    }
}

/// Print one warning line per skipped file.
pub fn print_skipped(report: &LoadReport) {
    for skipped in &report.skipped {
        eprintln!(
            "  {} {}: {}",
            "skipped".yellow().bold(),
            skipped.path.display(),
            skipped.reason
        );
    }
}

/// Parse `x,y,z` into a coordinate.
pub fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got '{s}'"));
    };
    let number = |part: &str| {
        part.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("'{part}' is not a finite number"))
    };
    Ok(Coordinate::new(number(x)?, number(y)?, number(z)?))
}

/// Format a coordinate compactly for tables.
pub fn format_coordinate(at: Coordinate) -> String {
    format!("{}, {}, {}", at.x, at.y, at.z)
}
