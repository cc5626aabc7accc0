//! Audio playback using the Web Audio API
//!
//! Every cue is a handful of oscillator bursts from `Cue::tones`, scheduled on
//! the audio clock; no sound files are needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::feedback::{Cue, Tone, Waveform};

/// Audio manager for the arcade
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Every burst feeds this node, which feeds the destination
    master: Option<GainNode>,
    /// User volume, 0 when sound is off
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let master = ctx.as_ref().and_then(|ctx| {
            let gain = ctx.create_gain().ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some(gain)
        });
        if ctx.is_some() && master.is_none() {
            log::warn!("Failed to create master gain - audio disabled");
        }
        let mut audio = Self {
            ctx,
            master,
            volume: 1.0,
        };
        audio.set_volume(1.0);
        audio
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set the user volume (0.0 - 1.0), as from `Settings::effective_volume`
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
        if let Some(master) = &self.master {
            master.gain().set_value(self.volume * Cue::MASTER_GAIN);
        }
    }

    /// Play every tone of a cue
    pub fn play(&self, cue: Cue) {
        if self.volume <= 0.0 {
            return;
        }

        let (Some(ctx), Some(master)) = (&self.ctx, &self.master) else {
            return;
        };

        // Browsers start the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let t = ctx.current_time();
        for tone in cue.tones() {
            self.play_tone(ctx, master, tone, t);
        }
    }

    /// Create an oscillator routed through its own gain node
    fn create_osc(
        &self,
        ctx: &AudioContext,
        master: &GainNode,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(master).ok()?;

        Some((osc, gain))
    }

    /// One burst with an exponential fade, offset from `now` by the tone delay
    fn play_tone(&self, ctx: &AudioContext, master: &GainNode, tone: &Tone, now: f64) {
        let Some((osc, gain)) =
            self.create_osc(ctx, master, tone.freq_hz, oscillator_type(tone.waveform))
        else {
            return;
        };
        let start = now + f64::from(tone.delay_ms) / 1000.0;
        let end = start + tone.duration_s;

        gain.gain().set_value_at_time(Cue::TONE_GAIN, start).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();

        osc.start_with_when(start).ok();
        osc.stop_with_when(end).ok();
    }
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}
