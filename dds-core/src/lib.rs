#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # DDS Core
//!
//! Serial-controlled signal generator logic for the AD9850 DDS chip.
//! JSON commands arrive one per line, are decoded and queued, and are then
//! applied to the chip through a bit-serial GPIO bus. Needs `alloc` for the
//! JSON tree and the command queue.

extern crate alloc;

pub mod codec;
pub mod control;
pub mod dds;
pub mod decoder;
pub mod hal;
pub mod line;
pub mod processor;
pub mod queue;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;


pub use codec::*;
pub use control::{Report, SignalGenerator};
pub use dds::Ad9850;
pub use decoder::{decode_command, DecodeError};
pub use hal::{DdsBus, DdsLine, Direction, EmbeddedHalDdsBus, EmbeddedHalSerial, HalError, SerialPort};
pub use line::{Feed, LineAssembler, COMMAND_BUFFER_LEN, MAX_COMMAND_LEN};
pub use processor::{CommandProcessor, PROMPT};
pub use queue::CommandQueue;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration of the reference build: 125 MHz oscillator, 1 kHz at
/// power-up, 115200 baud
pub fn default_config() -> GeneratorConfig {
    GeneratorConfig::default()
}
