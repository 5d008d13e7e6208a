//! Engine facade: owns both generators and the command queue, driven by a
//! single thread calling `tick(elapsed)`.

use std::time::Duration;

use crossbeam_channel::Receiver;

use murmur_types::{Pattern, Scale};

use crate::ambient::AmbientScheduler;
use crate::commands::{command_channel, EngineCmd, EngineHandle};
use crate::melodic::MelodicGenerator;
use crate::voice::OutputRouting;

pub struct Engine {
    melodic: MelodicGenerator,
    ambient: AmbientScheduler,
    handle: EngineHandle,
    cmd_rx: Receiver<EngineCmd>,
}

impl Engine {
    pub fn new(melodic: MelodicGenerator, ambient: AmbientScheduler) -> Self {
        let (handle, cmd_rx) = command_channel();
        Self {
            melodic,
            ambient,
            handle,
            cmd_rx,
        }
    }

    /// Sender half for UI/controller threads.
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Bind both generators to the externally owned output endpoints.
    pub fn initialize(&mut self, outs: OutputRouting) {
        self.melodic.initialize(outs);
        self.ambient.initialize(outs);
    }

    /// Start both generators from one scale/pattern pair.
    pub fn start(&mut self, scale: Scale, pattern: Pattern) {
        self.ambient.set_scale(scale.clone());
        self.ambient.start();
        self.melodic.start(scale, pattern);
    }

    pub fn stop(&mut self) {
        self.melodic.stop();
        self.ambient.stop();
    }

    pub fn dispose(&mut self) {
        self.melodic.dispose();
        self.ambient.dispose();
    }

    pub fn set_scale(&mut self, scale: Scale) {
        self.melodic.set_scale(scale.clone());
        self.ambient.set_scale(scale);
    }

    /// Drain pending commands, then advance both generators.
    pub fn tick(&mut self, elapsed: Duration) {
        self.drain_commands();
        self.melodic.tick(elapsed);
        self.ambient.tick(elapsed);
    }

    fn drain_commands(&mut self) {
        while let Ok(cmd) = self.cmd_rx.try_recv() {
            self.apply(cmd);
        }
    }

    fn apply(&mut self, cmd: EngineCmd) {
        match cmd {
            EngineCmd::Start { scale, pattern } => self.start(scale, pattern),
            EngineCmd::Stop => self.stop(),
            EngineCmd::Dispose => self.dispose(),
            EngineCmd::SetScale(scale) => self.set_scale(scale),
            EngineCmd::SetPattern(pattern) => self.melodic.set_pattern(pattern),
            EngineCmd::SetMelodicFrequency(f) => self.melodic.set_frequency(f),
            EngineCmd::UpdateDensity(v) => self.ambient.update_density(v),
            EngineCmd::UpdateReverb(v) => self.ambient.update_reverb(v),
            EngineCmd::UpdateReverbAmount(v) => self.melodic.update_reverb_amount(v),
            EngineCmd::SetVolume(v) => {
                self.melodic.set_volume(v);
                self.ambient.set_volume(v);
            }
        }
    }

    pub fn melodic(&self) -> &MelodicGenerator {
        &self.melodic
    }

    pub fn melodic_mut(&mut self) -> &mut MelodicGenerator {
        &mut self.melodic
    }

    pub fn ambient(&self) -> &AmbientScheduler {
        &self.ambient
    }

    pub fn ambient_mut(&mut self) -> &mut AmbientScheduler {
        &mut self.ambient
    }
}
