//! Control-surface command channel.
//!
//! UI/controller threads hold an [`EngineHandle`] and send commands; the
//! engine drains the queue at the top of each tick, which is what makes
//! concurrent parameter writes last-writer-wins in queue order.

use crossbeam_channel::{unbounded, Receiver, Sender};

use murmur_types::{Pattern, Scale};

/// Commands accepted from the external control surface.
#[derive(Debug, Clone)]
pub enum EngineCmd {
    Start { scale: Scale, pattern: Pattern },
    Stop,
    Dispose,
    SetScale(Scale),
    SetPattern(Pattern),
    SetMelodicFrequency(u8),
    UpdateDensity(f32),
    UpdateReverb(f32),
    UpdateReverbAmount(f32),
    SetVolume(f32),
}

/// Clone-able sender half handed to UI/controller threads.
#[derive(Clone)]
pub struct EngineHandle {
    tx: Sender<EngineCmd>,
}

impl EngineHandle {
    pub fn send(&self, cmd: EngineCmd) {
        // A dropped engine makes the surface inert, not an error.
        let _ = self.tx.send(cmd);
    }

    pub fn start(&self, scale: Scale, pattern: Pattern) {
        self.send(EngineCmd::Start { scale, pattern });
    }

    pub fn stop(&self) {
        self.send(EngineCmd::Stop);
    }

    pub fn dispose(&self) {
        self.send(EngineCmd::Dispose);
    }

    pub fn set_scale(&self, scale: Scale) {
        self.send(EngineCmd::SetScale(scale));
    }

    pub fn set_pattern(&self, pattern: Pattern) {
        self.send(EngineCmd::SetPattern(pattern));
    }

    pub fn set_melodic_frequency(&self, value: u8) {
        self.send(EngineCmd::SetMelodicFrequency(value));
    }

    pub fn update_density(&self, value: f32) {
        self.send(EngineCmd::UpdateDensity(value));
    }

    pub fn update_reverb(&self, value: f32) {
        self.send(EngineCmd::UpdateReverb(value));
    }

    pub fn update_reverb_amount(&self, value: f32) {
        self.send(EngineCmd::UpdateReverbAmount(value));
    }

    pub fn set_volume(&self, value: f32) {
        self.send(EngineCmd::SetVolume(value));
    }
}

pub(crate) fn command_channel() -> (EngineHandle, Receiver<EngineCmd>) {
    let (tx, rx) = unbounded();
    (EngineHandle { tx }, rx)
}
