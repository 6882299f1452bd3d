//! AD9850 register encodings
//!
//! Pure conversions from output settings to the values shifted into the
//! chip. Nothing here touches hardware.

/// Phase step of the AD9850, in 0.01° units (11.25°)
pub const PHASE_INCREMENT_CENTIDEG: u32 = 1125;

/// Number of phase steps in a full turn (5-bit register)
pub const PHASE_STEPS: u32 = 32;

/// Width of the serial load word
pub const PROGRAM_WORD_BITS: usize = 40;

/// Oscillator fitted on common AD9850 breakout boards
pub const DEFAULT_OSCILLATOR_HZ: u32 = 125_000_000;

/// Compute the 32-bit tuning word for `frequency_hz`.
///
/// `floor(frequency_hz * 2^32 / oscillator_hz)`, evaluated in 64 bits.
/// Frequencies at or above the oscillator keep the low 32 bits, which is
/// what the chip's phase accumulator does with them anyway. A zero
/// oscillator gives a zero word.
pub fn compute_frequency_register(oscillator_hz: u32, frequency_hz: u32) -> u32 {
    let scaled = (frequency_hz as u64) << 32;
    scaled.checked_div(oscillator_hz as u64).unwrap_or(0) as u32
}

/// Compute the 5-bit phase register for a phase in 0.01° units.
///
/// Rounds to the nearest 11.25° step and wraps into `0..32`.
pub fn compute_phase_register(phase_centideg: u32) -> u8 {
    let mut quotient = phase_centideg / PHASE_INCREMENT_CENTIDEG;
    let remainder = phase_centideg % PHASE_INCREMENT_CENTIDEG;

    if 2 * remainder > PHASE_INCREMENT_CENTIDEG {
        quotient += 1;
    }

    (quotient % PHASE_STEPS) as u8
}

/// Phase actually produced by a register value, in 0.01° units
pub const fn phase_from_register(phase_register: u8) -> u32 {
    (phase_register as u32 % PHASE_STEPS) * PHASE_INCREMENT_CENTIDEG
}

/// The 40-bit word loaded into the AD9850 in serial mode.
///
/// Wire order (first bit shifted = bit 0):
///
/// | bits  | field                     |
/// |-------|---------------------------|
/// | 0-31  | frequency tuning word     |
/// | 32-33 | control bits, always zero |
/// | 34    | power-down                |
/// | 35-39 | phase register            |
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProgramWord {
    pub frequency_register: u32,
    pub power_down: bool,
    pub phase_register: u8,
}

impl ProgramWord {
    pub const fn new(frequency_register: u32, phase_register: u8, enabled: bool) -> Self {
        Self {
            frequency_register,
            power_down: !enabled,
            phase_register: phase_register & 0x1F,
        }
    }

    /// Word sent at power-up: no frequency, output powered down
    pub const fn power_on() -> Self {
        Self::new(0, 0, false)
    }

    pub const fn enabled(&self) -> bool {
        !self.power_down
    }

    /// Pack into the low 40 bits of a `u64`, bit 0 first on the wire
    pub const fn to_raw(&self) -> u64 {
        (self.frequency_register as u64)
            | ((self.power_down as u64) << 34)
            | (((self.phase_register & 0x1F) as u64) << 35)
    }

    /// Unpack a word captured from the wire. Control bits are discarded.
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            frequency_register: raw as u32,
            power_down: (raw >> 34) & 1 == 1,
            phase_register: ((raw >> 35) & 0x1F) as u8,
        }
    }

    /// Bits in the order they are shifted out
    pub fn bits(&self) -> impl Iterator<Item = bool> {
        let raw = self.to_raw();
        (0..PROGRAM_WORD_BITS).map(move |bit| (raw >> bit) & 1 == 1)
    }
}
