//! Core data types for the signal generator

use crate::codec::{
    compute_frequency_register, compute_phase_register, phase_from_register, ProgramWord,
    DEFAULT_OSCILLATOR_HZ,
};
use crate::decoder::DecodeError;

/// Output configuration of the synthesizer
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputState {
    /// Output frequency in Hz
    pub frequency_hz: u32,
    /// Phase offset in 0.01° units
    pub phase_centideg: u32,
    /// Output enabled (chip powered up)
    pub enabled: bool,
}

/// Pending settings next to the settings last sent to the chip.
///
/// Setters only touch the pending copy. [`StagedState::apply`] is the single
/// transition that moves pending into current, so the current state always
/// describes a word that was actually computed for the chip.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StagedState {
    current: OutputState,
    pending: OutputState,
}

impl StagedState {
    pub const fn new(initial: OutputState) -> Self {
        Self {
            current: initial,
            pending: initial,
        }
    }

    /// Settings last applied
    pub const fn current(&self) -> &OutputState {
        &self.current
    }

    /// Settings waiting for the next [`apply`](Self::apply)
    pub const fn pending(&self) -> &OutputState {
        &self.pending
    }

    pub fn stage_frequency(&mut self, frequency_hz: u32) {
        self.pending.frequency_hz = frequency_hz;
    }

    pub fn stage_phase(&mut self, phase_centideg: u32) {
        self.pending.phase_centideg = phase_centideg;
    }

    pub fn stage_enabled(&mut self, enabled: bool) {
        self.pending.enabled = enabled;
    }

    /// Compute the load word for the pending settings and make them current.
    ///
    /// The current phase becomes the quantized phase the chip will produce,
    /// not the requested one. The pending phase keeps the raw request.
    pub fn apply(&mut self, oscillator_hz: u32) -> ProgramWord {
        let frequency_register =
            compute_frequency_register(oscillator_hz, self.pending.frequency_hz);
        let phase_register = compute_phase_register(self.pending.phase_centideg);

        self.current = OutputState {
            frequency_hz: self.pending.frequency_hz,
            phase_centideg: phase_from_register(phase_register),
            enabled: self.pending.enabled,
        };

        ProgramWord::new(frequency_register, phase_register, self.pending.enabled)
    }
}

/// Optional command fields
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// `"enable_out"`, boolean
    EnableOut,
    /// `"frequency"`, integer Hz
    Frequency,
    /// `"phase"`, integer 0.01° units
    Phase,
}

impl Field {
    /// JSON property name
    pub const fn key(&self) -> &'static str {
        match self {
            Field::EnableOut => "enable_out",
            Field::Frequency => "frequency",
            Field::Phase => "phase",
        }
    }
}

/// Settings carried by a valid command. Absent fields leave the DDS as is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Update {
    pub command_number: i64,
    pub frequency_hz: Option<u32>,
    pub phase_centideg: Option<u32>,
    pub enable_out: Option<bool>,
}

impl Update {
    pub const fn new(command_number: i64) -> Self {
        Self {
            command_number,
            frequency_hz: None,
            phase_centideg: None,
            enable_out: None,
        }
    }

    /// True when no optional field was given
    pub const fn is_empty(&self) -> bool {
        self.frequency_hz.is_none() && self.phase_centideg.is_none() && self.enable_out.is_none()
    }
}

/// One decoded line
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Valid command, to be applied to the DDS
    Apply(Update),
    /// Invalid command, only reported
    Reject {
        command_number: i64,
        error: DecodeError,
    },
}

impl Command {
    /// Number echoed in the response
    pub const fn command_number(&self) -> i64 {
        match self {
            Command::Apply(update) => update.command_number,
            Command::Reject { command_number, .. } => *command_number,
        }
    }

    pub const fn error(&self) -> Option<DecodeError> {
        match self {
            Command::Apply(_) => None,
            Command::Reject { error, .. } => Some(*error),
        }
    }

    pub const fn is_rejected(&self) -> bool {
        matches!(self, Command::Reject { .. })
    }
}

/// Signal generator configuration parameters
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GeneratorConfig {
    /// Reference oscillator driving the AD9850
    pub oscillator_hz: u32,
    /// Frequency staged at power-up (output stays disabled)
    pub startup_frequency_hz: u32,
    /// Command UART baud rate
    pub baud_rate: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            oscillator_hz: DEFAULT_OSCILLATOR_HZ,
            startup_frequency_hz: 1_000,
            baud_rate: 115_200,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with validation
    pub fn new(
        oscillator_hz: u32,
        startup_frequency_hz: u32,
        baud_rate: u32,
    ) -> Result<Self, &'static str> {
        if oscillator_hz == 0 {
            return Err("Oscillator frequency must be non-zero");
        }
        if baud_rate == 0 {
            return Err("Baud rate must be non-zero");
        }

        let config = Self {
            oscillator_hz,
            startup_frequency_hz,
            baud_rate,
        };
        if config.startup_frequency_hz > config.nyquist_hz() {
            return Err("Startup frequency must not exceed half the oscillator");
        }
        Ok(config)
    }

    /// Frequency resolution of one tuning word step, in millihertz
    pub fn resolution_mhz(&self) -> u32 {
        ((self.oscillator_hz as u64 * 1000) >> 32) as u32
    }

    /// Highest frequency the chip can synthesize without aliasing
    pub fn nyquist_hz(&self) -> u32 {
        self.oscillator_hz / 2
    }
}
