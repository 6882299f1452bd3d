//! AD9850 driver over a bit-serial GPIO bus

use crate::codec::ProgramWord;
use crate::hal::{DdsBus, DdsLine, Direction};
use crate::types::{OutputState, StagedState};

/// AD9850 in serial load mode.
///
/// Settings are staged with the `set_*` methods and sent to the chip by
/// [`commit`](Ad9850::commit). Getters return what was last committed.
pub struct Ad9850<B: DdsBus> {
    bus: B,
    oscillator_hz: u32,
    state: StagedState,
    last_word: ProgramWord,
}

impl<B: DdsBus> Ad9850<B> {
    /// Take ownership of the bus, reset the chip into serial mode and load
    /// a zero frequency word with the output powered down.
    pub fn new(bus: B, oscillator_hz: u32) -> Self {
        let mut dds = Self {
            bus,
            oscillator_hz,
            state: StagedState::default(),
            last_word: ProgramWord::power_on(),
        };

        for line in DdsLine::ALL {
            dds.bus.set_direction(line, Direction::Output).ok();
        }

        // RESET clears the registers; one W_CLK then one FQ_UD pulse
        // selects serial input mode.
        dds.pulse(DdsLine::Reset);
        dds.pulse(DdsLine::WordClock);
        dds.pulse(DdsLine::FrequencyUpdate);

        dds.program(ProgramWord::power_on());

        #[cfg(feature = "defmt")]
        defmt::info!("AD9850 reset, oscillator {} Hz", oscillator_hz);

        dds
    }

    /// Stage the output frequency in Hz
    pub fn set_frequency(&mut self, frequency_hz: u32) {
        self.state.stage_frequency(frequency_hz);
    }

    /// Stage the phase offset in 0.01° units (22.5° is 2250)
    pub fn set_phase(&mut self, phase_centideg: u32) {
        self.state.stage_phase(phase_centideg);
    }

    /// Stage output enable
    pub fn set_enabled(&mut self, enabled: bool) {
        self.state.stage_enabled(enabled);
    }

    /// Apply the staged settings and load them into the chip
    pub fn commit(&mut self) {
        let word = self.state.apply(self.oscillator_hz);

        #[cfg(feature = "defmt")]
        defmt::debug!("Commit {}", self.state.current());

        self.program(word);
    }

    /// Committed frequency in Hz
    pub fn frequency(&self) -> u32 {
        self.state.current().frequency_hz
    }

    /// Committed phase in 0.01° units, a multiple of 11.25°
    pub fn phase(&self) -> u32 {
        self.state.current().phase_centideg
    }

    pub fn enabled(&self) -> bool {
        self.state.current().enabled
    }

    pub fn state(&self) -> OutputState {
        *self.state.current()
    }

    /// Settings that the next commit will apply
    pub fn staged(&self) -> OutputState {
        *self.state.pending()
    }

    /// Word most recently shifted into the chip
    pub fn last_word(&self) -> ProgramWord {
        self.last_word
    }

    pub fn oscillator_hz(&self) -> u32 {
        self.oscillator_hz
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }

    /// Shift out the 40 bits LSB first, then latch with FQ_UD
    fn program(&mut self, word: ProgramWord) {
        for bit in word.bits() {
            self.bus.set_level(DdsLine::Data, bit).ok();
            self.pulse(DdsLine::WordClock);
        }
        self.pulse(DdsLine::FrequencyUpdate);
        self.last_word = word;
    }

    fn pulse(&mut self, line: DdsLine) {
        self.bus.pulse(line).ok();
    }
}
