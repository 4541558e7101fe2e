//! Sound requests queued by the simulation
//!
//! The simulation never touches audio hardware. It records what should be
//! heard this frame and the platform layer drains the queue after each tick.

/// Logical sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Food eaten with an open mouth
    Eat,
    /// Food hit with a closed mouth (eat sound played backwards)
    EatReversed,
    /// Ghost dodged with a closed mouth
    GhostHit,
    /// Life-up collected
    LifeCollect,
    /// Life-up item appears
    LifeSpawn,
    /// Game over
    Lose,
    /// Mode cursor moved ("1" / "3")
    ButtonSelect,
    /// Start/confirm ("2")
    ButtonConfirm,
    /// Background music during play
    StageMusic,
}

/// One audio request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    /// Fire-and-forget one-shot
    Play { cue: Cue, volume: f32 },
    /// Start a looping cue (music)
    Loop { cue: Cue, volume: f32 },
    /// Stop a looping cue; a no-op if it is not playing
    Stop { cue: Cue },
}

/// Per-frame outbox of audio requests
#[derive(Debug, Clone, Default)]
pub struct AudioQueue {
    commands: Vec<AudioCommand>,
}

impl AudioQueue {
    pub fn play(&mut self, cue: Cue, volume: f32) {
        self.commands.push(AudioCommand::Play { cue, volume });
    }

    pub fn start_loop(&mut self, cue: Cue, volume: f32) {
        self.commands.push(AudioCommand::Loop { cue, volume });
    }

    pub fn stop(&mut self, cue: Cue) {
        self.commands.push(AudioCommand::Stop { cue });
    }

    /// Take every pending command in the order it was queued
    pub fn drain(&mut self) -> std::vec::Drain<'_, AudioCommand> {
        self.commands.drain(..)
    }

    pub fn pending(&self) -> &[AudioCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of pending one-shots of `cue`
    pub fn plays_of(&self, cue: Cue) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, AudioCommand::Play { cue: played, .. } if *played == cue))
            .count()
    }
}
