//! Audio system using Web Audio API
//!
//! Procedurally generated cues - no external files needed. The simulation
//! queues [`AudioCommand`]s and the frame loop hands them to [`AudioManager::execute`].

use web_sys::{AudioContext, AudioNode, GainNode, OscillatorNode, OscillatorType};

use crate::Settings;
use crate::sim::{AudioCommand, Cue};

/// Stage music: (frequency, beats) pairs, looped
const STAGE_MELODY: [(f32, f64); 16] = [
    (493.88, 0.5),
    (987.77, 0.5),
    (739.99, 0.5),
    (622.25, 0.5),
    (987.77, 0.25),
    (739.99, 0.75),
    (622.25, 1.0),
    (523.25, 0.5),
    (1046.50, 0.5),
    (783.99, 0.5),
    (659.25, 0.5),
    (1046.50, 0.25),
    (783.99, 0.75),
    (659.25, 1.0),
    (622.25, 0.5),
    (698.46, 1.5),
];

const STAGE_BEAT_SECONDS: f64 = 0.2;

/// How far ahead of the clock music notes are scheduled
const MUSIC_LOOKAHEAD: f64 = 0.3;

/// A running music loop
struct MusicLoop {
    bus: GainNode,
    next_note_time: f64,
    note_index: usize,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    settings: Settings,
    music: Option<MusicLoop>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            settings: settings.clone(),
            music: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Run one queued command
    pub fn execute(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Play { cue, volume } => self.play(cue, volume),
            AudioCommand::Loop { cue, volume } => self.start_loop(cue, volume),
            AudioCommand::Stop { cue } => self.stop(cue),
        }
    }

    /// Keep the music loop scheduled; call once per animation frame
    pub fn update(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        let Some(music) = &mut self.music else { return };

        let horizon = ctx.current_time() + MUSIC_LOOKAHEAD;
        // Catch up after a stall (hidden tab) instead of bursting old notes
        if music.next_note_time < ctx.current_time() {
            music.next_note_time = ctx.current_time();
        }
        while music.next_note_time < horizon {
            let (freq, beats) = STAGE_MELODY[music.note_index];
            let length = beats * STAGE_BEAT_SECONDS;
            schedule_note(ctx, &music.bus, freq, music.next_note_time, length);
            music.next_note_time += length;
            music.note_index = (music.note_index + 1) % STAGE_MELODY.len();
        }
    }

    /// Play a one-shot cue
    fn play(&self, cue: Cue, volume: f32) {
        let vol = self.settings.effect_gain(volume);
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Eat => self.play_eat(ctx, vol),
            Cue::EatReversed => self.play_eat_reversed(ctx, vol),
            Cue::GhostHit => self.play_ghost_hit(ctx, vol),
            Cue::LifeCollect => self.play_life_collect(ctx, vol),
            Cue::LifeSpawn => self.play_life_spawn(ctx, vol),
            Cue::Lose => self.play_lose(ctx, vol),
            Cue::ButtonSelect => self.play_button_select(ctx, vol),
            Cue::ButtonConfirm => self.play_button_confirm(ctx, vol),
            Cue::StageMusic => log::warn!("StageMusic is a loop, not a one-shot"),
        }
    }

    fn start_loop(&mut self, cue: Cue, volume: f32) {
        if cue != Cue::StageMusic {
            log::warn!("{:?} cannot loop, playing once", cue);
            self.play(cue, volume);
            return;
        }
        self.stop(cue);

        let Some(ctx) = &self.ctx else { return };
        let Ok(bus) = ctx.create_gain() else {
            log::warn!("Failed to create music bus");
            return;
        };
        bus.gain().set_value(self.settings.music_gain(volume));
        if bus.connect_with_audio_node(&ctx.destination()).is_err() {
            log::warn!("Failed to connect music bus");
            return;
        }
        self.music = Some(MusicLoop {
            bus,
            next_note_time: ctx.current_time() + 0.05,
            note_index: 0,
        });
        self.update();
    }

    /// Stop a loop; already-scheduled notes are cut off with the bus
    fn stop(&mut self, cue: Cue) {
        if cue != Cue::StageMusic {
            return;
        }
        if let Some(music) = self.music.take() {
            let node: &AudioNode = &music.bus;
            let _ = node.disconnect();
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        create_osc_into(ctx, &ctx.destination(), freq, osc_type)
    }

    /// Eat - quick rising chomp
    fn play_eat(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(660.0, t + 0.06)
            .ok();
        osc.frequency().set_value_at_time(330.0, t + 0.06).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(880.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.14).ok();
    }

    /// Eat played backwards - falling chomp
    fn play_eat_reversed(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.01, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(vol * 0.3, t + 0.1)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.14)
            .ok();
        osc.frequency().set_value_at_time(880.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(330.0, t + 0.06)
            .ok();
        osc.frequency().set_value_at_time(660.0, t + 0.06).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(220.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Ghost dodged - hollow bonk
    fn play_ghost_hit(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(90.0, t + 0.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        // Wobble on top
        if let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(500.0, t).ok();
            osc.frequency().set_value_at_time(420.0, t + 0.04).ok();
            osc.frequency().set_value_at_time(500.0, t + 0.08).ok();
            osc.frequency().set_value_at_time(420.0, t + 0.12).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.18).ok();
        }
    }

    /// Life collected - happy rising arpeggio
    fn play_life_collect(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25, 659.25, 783.99, 1046.50].iter().enumerate() {
            let delay = i as f64 * 0.07;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Life-up appears - the collect arpeggio backwards
    fn play_life_spawn(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [1046.50, 783.99, 659.25, 523.25].iter().enumerate() {
            let delay = i as f64 * 0.07;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(0.01, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(vol * 0.3, t + 0.12)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.14).ok();
            }
        }
    }

    /// Lose - long descending wail
    fn play_lose(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.2)
                .ok();
            // Siren sweeps that sink each cycle
            for (i, (hi, lo)) in [(800.0, 600.0), (650.0, 450.0), (500.0, 300.0), (350.0, 120.0)]
                .iter()
                .enumerate()
            {
                let start = t + i as f64 * 0.3;
                osc.frequency().set_value_at_time(*hi, start).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(*lo, start + 0.28)
                    .ok();
            }
            osc.start().ok();
            osc.stop_with_when(t + 1.25).ok();
        }
    }

    /// Mode cursor moved - short blip
    fn play_button_select(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 660.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Confirm - two-tone chirp
    fn play_button_confirm(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [880.0, 1320.0].iter().enumerate() {
            let delay = i as f64 * 0.06;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.1).ok();
            }
        }
    }
}

/// Oscillator -> gain -> `out`
fn create_osc_into(
    ctx: &AudioContext,
    out: &AudioNode,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(out).ok()?;

    Some((osc, gain))
}

/// One plucked music note on the music bus
fn schedule_note(ctx: &AudioContext, bus: &GainNode, freq: f32, start: f64, length: f64) {
    let Some((osc, gain)) = create_osc_into(ctx, bus, freq, OscillatorType::Square) else {
        return;
    };
    gain.gain().set_value_at_time(0.25, start).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, start + length * 0.9)
        .ok();
    osc.start_with_when(start).ok();
    osc.stop_with_when(start + length).ok();
}
