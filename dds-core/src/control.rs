//! Command execution and reporting

use core::fmt;

use crate::dds::Ad9850;
use crate::decoder::DecodeError;
use crate::hal::{DdsBus, SerialPort};
use crate::processor::CommandProcessor;
use crate::types::{Command, GeneratorConfig, OutputState, Update};

/// Response line for one executed command
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// Command applied; carries the settings now in effect
    Ack {
        command_number: i64,
        state: OutputState,
    },
    /// Command rejected; the DDS was not touched
    Error {
        command_number: i64,
        error: DecodeError,
    },
}

impl Report {
    pub const fn command_number(&self) -> i64 {
        match self {
            Report::Ack { command_number, .. } | Report::Error { command_number, .. } => {
                *command_number
            }
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Report::Error { .. })
    }

    /// Write the report followed by a newline
    pub fn write_to<S: SerialPort>(&self, serial: &mut S) -> Result<(), S::Error> {
        let mut writer = SerialWriter {
            serial,
            error: None,
        };
        if fmt::write(&mut writer, format_args!("{}\n", self)).is_err() {
            if let Some(error) = writer.error {
                return Err(error);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Ack {
                command_number,
                state,
            } => write!(
                f,
                "{{  \"command_number\":{},  \"frequency\":{},  \"phase\":{},  \"enable_out\":{}}}",
                command_number, state.frequency_hz, state.phase_centideg, state.enabled
            ),
            Report::Error {
                command_number,
                error,
            } => write!(
                f,
                "{{  \"command_number\":{},  \"error\":\"{}\"}}",
                command_number, error
            ),
        }
    }
}

/// Streams formatted text into a serial port, keeping the port's error
struct SerialWriter<'a, S: SerialPort> {
    serial: &'a mut S,
    error: Option<S::Error>,
}

impl<S: SerialPort> fmt::Write for SerialWriter<'_, S> {
    fn write_str(&mut self, text: &str) -> fmt::Result {
        self.serial.write_str(text).map_err(|error| {
            self.error = Some(error);
            fmt::Error
        })
    }
}

/// The whole instrument: command reception, the DDS and the report stream
pub struct SignalGenerator<B: DdsBus> {
    dds: Ad9850<B>,
    processor: CommandProcessor,
    config: GeneratorConfig,
}

impl<B: DdsBus> SignalGenerator<B> {
    /// Load the start-up frequency with the output left disabled
    pub fn new(mut dds: Ad9850<B>, config: GeneratorConfig) -> Self {
        dds.set_frequency(config.startup_frequency_hz);
        dds.commit();

        #[cfg(feature = "defmt")]
        defmt::info!("Signal generator ready at {} Hz", config.startup_frequency_hz);

        Self {
            dds,
            processor: CommandProcessor::new(),
            config,
        }
    }

    /// One pass of the main loop.
    ///
    /// Handles at most one received character and at most one queued
    /// command, returning the report that was written.
    pub fn service<S: SerialPort>(&mut self, serial: &mut S) -> Result<Option<Report>, S::Error> {
        self.processor.poll(serial)?;

        let Some(command) = self.processor.next_command() else {
            return Ok(None);
        };

        let report = self.execute(command);
        report.write_to(serial)?;
        Ok(Some(report))
    }

    /// Apply one command to the DDS
    pub fn execute(&mut self, command: Command) -> Report {
        match command {
            Command::Reject {
                command_number,
                error,
            } => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Command {} rejected: {}", command_number, error);
                Report::Error {
                    command_number,
                    error,
                }
            }
            Command::Apply(update) => {
                if update.is_empty() {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Command {} changes nothing", update.command_number);
                } else {
                    self.stage(&update);
                }
                self.dds.commit();
                Report::Ack {
                    command_number: update.command_number,
                    state: self.dds.state(),
                }
            }
        }
    }

    fn stage(&mut self, update: &Update) {
        if let Some(enabled) = update.enable_out {
            self.dds.set_enabled(enabled);
        }
        if let Some(frequency_hz) = update.frequency_hz {
            self.dds.set_frequency(frequency_hz);
        }
        if let Some(phase_centideg) = update.phase_centideg {
            self.dds.set_phase(phase_centideg);
        }
    }

    pub fn dds(&self) -> &Ad9850<B> {
        &self.dds
    }

    pub fn processor(&self) -> &CommandProcessor {
        &self.processor
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Commands received but not executed yet
    pub fn pending_commands(&self) -> usize {
        self.processor.number_of_commands()
    }
}
