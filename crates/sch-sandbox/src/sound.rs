use std::any::Any;
use std::fmt;

use sch_animation::{AnimationError, AnimationResult, Timing, Transition};
use sch_core::Coordinate;

use crate::world::{PlayedSound, SharedSandbox, lock};

/// Plays a sound at a fixed location when it fires.
#[derive(Clone)]
pub struct SoundTransition {
    sandbox: SharedSandbox,
    sound: String,
    location: Coordinate,
    volume: f32,
    pitch: f32,
    timing: Timing,
}

impl SoundTransition {
    /// Kind tag of sound transitions.
    pub const KIND: &'static str = "sound";

    /// A sound at normal volume and pitch.
    pub fn new(
        sandbox: SharedSandbox,
        sound: impl Into<String>,
        location: Coordinate,
        timing: Timing,
    ) -> Self {
        Self {
            sandbox,
            sound: sound.into(),
            location,
            volume: 1.0,
            pitch: 1.0,
            timing,
        }
    }

    /// Set the playback volume.
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// Set the playback pitch.
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    /// Sound name.
    pub fn sound(&self) -> &str {
        &self.sound
    }

    /// Where the sound plays.
    pub fn location(&self) -> Coordinate {
        self.location
    }

    /// Playback volume.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Playback pitch.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

impl fmt::Debug for SoundTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundTransition")
            .field("sound", &self.sound)
            .field("location", &self.location)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl Transition for SoundTransition {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn timing(&self) -> Timing {
        self.timing
    }

    fn run(&self) -> AnimationResult<()> {
        let mut sandbox = lock(&self.sandbox).map_err(|e| AnimationError::TransitionFailed {
            kind: Self::KIND.to_string(),
            reason: e.to_string(),
        })?;
        sandbox.play_sound(PlayedSound {
            sound: self.sound.clone(),
            location: self.location,
            volume: self.volume,
            pitch: self.pitch,
        });
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Sandbox;

    #[test]
    fn run_records_the_sound() {
        let sandbox = Sandbox::new().into_shared();
        let bell = SoundTransition::new(
            sandbox.clone(),
            "block.bell.use",
            Coordinate::new(0.0, 64.0, 0.0),
            Timing::from_millis(0, 500),
        )
        .with_volume(0.5)
        .with_pitch(2.0);
        bell.run().unwrap();

        let guard = sandbox.lock().unwrap();
        assert_eq!(guard.sounds().len(), 1);
        assert_eq!(guard.sounds()[0].sound, "block.bell.use");
        assert_eq!(guard.sounds()[0].volume, 0.5);
        assert_eq!(guard.sounds()[0].pitch, 2.0);
        assert_eq!(bell.run_time(), 500);
    }
}
