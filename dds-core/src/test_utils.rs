//! Test utilities for the signal generator core

use alloc::vec::Vec;

use crate::codec::{ProgramWord, PROGRAM_WORD_BITS};
use crate::hal::mock::BusEvent;
use crate::hal::{DdsLine, Direction};

/// Behavioural model of the AD9850 serial interface.
///
/// Replays a bus trace and recovers the words the chip would have latched:
/// RESET clears the chip, one W_CLK then one FQ_UD edge enter serial mode,
/// after which every W_CLK edge shifts DATA into a 40-bit register and
/// every FQ_UD edge latches it.
#[derive(Debug, Default)]
pub struct VirtualAd9850 {
    outputs: [bool; 4],
    levels: [bool; 4],
    armed: bool,
    serial_mode: bool,
    shift_register: u64,
    bits_shifted: usize,
    resets: usize,
    latched: Vec<ProgramWord>,
    short_loads: usize,
}

fn index(line: DdsLine) -> usize {
    match line {
        DdsLine::WordClock => 0,
        DdsLine::FrequencyUpdate => 1,
        DdsLine::Data => 2,
        DdsLine::Reset => 3,
    }
}

impl VirtualAd9850 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a whole trace through a fresh chip
    pub fn replay(events: &[BusEvent]) -> Self {
        let mut chip = Self::new();
        for event in events {
            chip.apply(*event);
        }
        chip
    }

    pub fn apply(&mut self, event: BusEvent) {
        match event {
            BusEvent::Direction(line, direction) => {
                self.outputs[index(line)] = direction == Direction::Output;
            }
            BusEvent::Level(line, high) => {
                // An unconfigured pin does not reach the chip
                if !self.outputs[index(line)] {
                    return;
                }
                let rising = high && !self.levels[index(line)];
                self.levels[index(line)] = high;
                if rising {
                    self.rising_edge(line);
                }
            }
        }
    }

    fn rising_edge(&mut self, line: DdsLine) {
        match line {
            DdsLine::Reset => {
                self.armed = false;
                self.serial_mode = false;
                self.shift_register = 0;
                self.bits_shifted = 0;
                self.resets += 1;
            }
            DdsLine::WordClock if self.serial_mode => {
                let bit = self.levels[index(DdsLine::Data)] as u64;
                self.shift_register =
                    (self.shift_register >> 1) | (bit << (PROGRAM_WORD_BITS - 1));
                self.bits_shifted += 1;
            }
            DdsLine::WordClock => self.armed = true,
            DdsLine::FrequencyUpdate if self.serial_mode => {
                if self.bits_shifted < PROGRAM_WORD_BITS {
                    self.short_loads += 1;
                }
                self.latched.push(ProgramWord::from_raw(self.shift_register));
                self.bits_shifted = 0;
            }
            DdsLine::FrequencyUpdate => self.serial_mode = self.armed,
            DdsLine::Data => {}
        }
    }

    /// Words latched by FQ_UD, oldest first
    pub fn latched_words(&self) -> &[ProgramWord] {
        &self.latched
    }

    /// Word driving the output right now
    pub fn active_word(&self) -> Option<ProgramWord> {
        self.latched.last().copied()
    }

    pub fn is_serial_mode(&self) -> bool {
        self.serial_mode
    }

    pub fn resets(&self) -> usize {
        self.resets
    }

    /// Bits shifted since the last latch
    pub fn bits_shifted(&self) -> usize {
        self.bits_shifted
    }

    /// Latches that happened before a full 40-bit word was shifted in
    pub fn short_loads(&self) -> usize {
        self.short_loads
    }
}

/// Drive a [`VirtualAd9850`] through the standard serial-mode entry sequence
pub fn serial_mode_chip() -> VirtualAd9850 {
    let mut chip = VirtualAd9850::new();
    for line in DdsLine::ALL {
        chip.apply(BusEvent::Direction(line, Direction::Output));
    }
    for line in [DdsLine::Reset, DdsLine::WordClock, DdsLine::FrequencyUpdate] {
        chip.apply(BusEvent::Level(line, true));
        chip.apply(BusEvent::Level(line, false));
    }
    chip
}
