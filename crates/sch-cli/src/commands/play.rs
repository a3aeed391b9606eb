use colored::Colorize;
use sch_animation::{Animation, AnimationDriver, DriverConfig, PlaybackEventKind};
use sch_sandbox::{Sandbox, SandboxRegistries};

use super::{Workspace, format_coordinate};

pub fn run(
    workspace: &Workspace,
    id: &str,
    period: u64,
    max_pulses: u64,
    max_events: usize,
) -> Result<(), String> {
    if period == 0 {
        return Err("period must be at least 1 ms".into());
    }

    let sandbox = Sandbox::new().into_shared();
    let registries = SandboxRegistries::new(&sandbox);
    let mut animations = workspace.load_animations(&registries)?;
    let definition = animations
        .remove(id)
        .ok_or_else(|| format!("no animation named '{id}'"))?;
    let total = definition.total_time();

    let config = DriverConfig::default()
        .with_period_ms(period)
        .with_max_events(max_events);
    let mut driver = AnimationDriver::new(config);
    let handle = driver.add(Animation::new(definition));
    driver.start(handle).map_err(|e| e.to_string())?;
    let outcome = driver.run_until_idle(max_pulses);

    println!(
        "  {} '{id}' {}",
        "Playing".bold(),
        format!("({total} ms, {period} ms/pulse)").dimmed()
    );
    println!();
    for event in driver.events().events() {
        let time = format!("[{:>6} ms]", event.at_ms).dimmed();
        let kind = match &event.kind {
            PlaybackEventKind::Fired { .. } => event.kind.to_string().green(),
            PlaybackEventKind::Finished => event.kind.to_string().bold(),
            PlaybackEventKind::Halted => event.kind.to_string().red().bold(),
            _ => event.kind.to_string().normal(),
        };
        println!("  {time} {kind}");
    }

    let pulses = outcome.map_err(|e| format!("animation '{id}' stopped: {e}"))?;
    if !driver.is_idle() {
        return Err(format!("animation '{id}' did not finish within {pulses} pulses"));
    }

    let world = sandbox
        .lock()
        .map_err(|_| "sandbox lock is poisoned".to_string())?;
    println!();
    println!(
        "  {} pulses, {} blocks, {} entities, {} sounds",
        pulses,
        world.block_count(),
        world.entities().len(),
        world.sounds().len()
    );
    for sound in world.sounds() {
        println!(
            "  {} {} at {}",
            "sound".cyan(),
            sound.sound,
            format_coordinate(sound.location)
        );
    }
    Ok(())
}
