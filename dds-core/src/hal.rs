//! Hardware Abstraction Layer for the signal generator
//!
//! Two seams: [`DdsBus`] drives the four AD9850 control lines, and
//! [`SerialPort`] carries command text in and reports out. Generic
//! implementations over `embedded-hal` pins and `embedded-hal-nb` UARTs are
//! provided; board crates only have to hand over their peripherals.

use embedded_hal::digital::OutputPin;
use embedded_hal_nb::serial;

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// UART read or write failed
    SerialError,
    /// Invalid configuration
    InvalidConfig,
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::SerialError => write!(f, "Serial operation failed"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// AD9850 control lines
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DdsLine {
    /// W_CLK, shifts one data bit on the rising edge
    WordClock,
    /// FQ_UD, latches the loaded word on the rising edge
    FrequencyUpdate,
    /// DATA (D7), serial data input
    Data,
    /// RESET, active high
    Reset,
}

impl DdsLine {
    pub const ALL: [DdsLine; 4] = [
        DdsLine::WordClock,
        DdsLine::FrequencyUpdate,
        DdsLine::Data,
        DdsLine::Reset,
    ];
}

/// GPIO direction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

/// Trait for the GPIO lines wired to the AD9850
pub trait DdsBus {
    type Error: From<HalError>;

    /// Configure a line as input or output
    fn set_direction(&mut self, line: DdsLine, direction: Direction) -> Result<(), Self::Error>;

    /// Drive a line high (`true`) or low
    fn set_level(&mut self, line: DdsLine, high: bool) -> Result<(), Self::Error>;

    /// High then low, with no delay in between
    fn pulse(&mut self, line: DdsLine) -> Result<(), Self::Error> {
        self.set_level(line, true)?;
        self.set_level(line, false)
    }
}

/// Trait for the command transport
pub trait SerialPort {
    type Error: From<HalError>;

    /// Next received character, `None` when nothing is waiting. Never blocks.
    fn read_char(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Write all bytes
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        self.write_bytes(text.as_bytes())
    }
}

/// Generic implementation for embedded-hal compatible output pins.
///
/// Pin direction is fixed by the pin types, so only `Direction::Output`
/// is accepted.
pub struct EmbeddedHalDdsBus<WClk, FqUd, Data, Reset> {
    w_clk: WClk,
    fq_ud: FqUd,
    data: Data,
    reset: Reset,
}

impl<WClk, FqUd, Data, Reset> EmbeddedHalDdsBus<WClk, FqUd, Data, Reset>
where
    WClk: OutputPin,
    FqUd: OutputPin,
    Data: OutputPin,
    Reset: OutputPin,
{
    pub fn new(w_clk: WClk, fq_ud: FqUd, data: Data, reset: Reset) -> Self {
        Self {
            w_clk,
            fq_ud,
            data,
            reset,
        }
    }

    /// Give the pins back
    pub fn release(self) -> (WClk, FqUd, Data, Reset) {
        (self.w_clk, self.fq_ud, self.data, self.reset)
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), HalError> {
    if high {
        pin.set_high().map_err(|_| HalError::GpioError)
    } else {
        pin.set_low().map_err(|_| HalError::GpioError)
    }
}

impl<WClk, FqUd, Data, Reset> DdsBus for EmbeddedHalDdsBus<WClk, FqUd, Data, Reset>
where
    WClk: OutputPin,
    FqUd: OutputPin,
    Data: OutputPin,
    Reset: OutputPin,
{
    type Error = HalError;

    fn set_direction(&mut self, _line: DdsLine, direction: Direction) -> Result<(), Self::Error> {
        match direction {
            Direction::Output => Ok(()),
            Direction::Input => Err(HalError::InvalidConfig),
        }
    }

    fn set_level(&mut self, line: DdsLine, high: bool) -> Result<(), Self::Error> {
        match line {
            DdsLine::WordClock => drive(&mut self.w_clk, high),
            DdsLine::FrequencyUpdate => drive(&mut self.fq_ud, high),
            DdsLine::Data => drive(&mut self.data, high),
            DdsLine::Reset => drive(&mut self.reset, high),
        }
    }
}

/// Generic implementation for embedded-hal-nb compatible UARTs
pub struct EmbeddedHalSerial<U> {
    uart: U,
}

impl<U> EmbeddedHalSerial<U>
where
    U: serial::Read<u8> + serial::Write<u8>,
{
    pub fn new(uart: U) -> Self {
        Self { uart }
    }

    pub fn release(self) -> U {
        self.uart
    }
}

impl<U> SerialPort for EmbeddedHalSerial<U>
where
    U: serial::Read<u8> + serial::Write<u8>,
{
    type Error = HalError;

    fn read_char(&mut self) -> Result<Option<u8>, Self::Error> {
        match self.uart.read() {
            Ok(character) => Ok(Some(character)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(_)) => Err(HalError::SerialError),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &byte in bytes {
            nb::block!(self.uart.write(byte)).map_err(|_| HalError::SerialError)?;
        }
        nb::block!(self.uart.flush()).map_err(|_| HalError::SerialError)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use alloc::collections::VecDeque;
    use alloc::string::String;
    use alloc::vec::Vec;

    /// One operation seen by [`RecordingBus`]
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum BusEvent {
        Direction(DdsLine, Direction),
        Level(DdsLine, bool),
    }

    /// Bus that records every operation in order
    #[derive(Debug, Default)]
    pub struct RecordingBus {
        events: Vec<BusEvent>,
        failing: bool,
    }

    impl RecordingBus {
        pub fn new() -> Self {
            Self::default()
        }

        /// Bus whose writes all fail (still recorded)
        pub fn failing() -> Self {
            Self {
                events: Vec::new(),
                failing: true,
            }
        }

        pub fn events(&self) -> &[BusEvent] {
            &self.events
        }

        pub fn clear(&mut self) {
            self.events.clear();
        }

        /// Rising edges seen on `line`
        pub fn pulses(&self, line: DdsLine) -> usize {
            let mut high = false;
            let mut rising = 0;
            for event in &self.events {
                if let BusEvent::Level(l, level) = *event {
                    if l == line {
                        if level && !high {
                            rising += 1;
                        }
                        high = level;
                    }
                }
            }
            rising
        }
    }

    impl DdsBus for RecordingBus {
        type Error = HalError;

        fn set_direction(&mut self, line: DdsLine, direction: Direction) -> Result<(), Self::Error> {
            self.events.push(BusEvent::Direction(line, direction));
            if self.failing {
                return Err(HalError::GpioError);
            }
            Ok(())
        }

        fn set_level(&mut self, line: DdsLine, high: bool) -> Result<(), Self::Error> {
            self.events.push(BusEvent::Level(line, high));
            if self.failing {
                return Err(HalError::GpioError);
            }
            Ok(())
        }
    }

    /// Serial port fed from a script, capturing everything written
    #[derive(Debug, Default)]
    pub struct ScriptedSerial {
        input: VecDeque<u8>,
        output: Vec<u8>,
    }

    impl ScriptedSerial {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue characters to be read
        pub fn type_text(&mut self, text: &str) {
            self.input.extend(text.bytes());
        }

        pub fn type_bytes(&mut self, bytes: &[u8]) {
            self.input.extend(bytes.iter().copied());
        }

        /// Characters not read yet
        pub fn pending_input(&self) -> usize {
            self.input.len()
        }

        pub fn output(&self) -> &[u8] {
            &self.output
        }

        /// Drain the captured output as text
        pub fn take_output(&mut self) -> String {
            let output = core::mem::take(&mut self.output);
            String::from_utf8_lossy(&output).into_owned()
        }
    }

    impl SerialPort for ScriptedSerial {
        type Error = HalError;

        fn read_char(&mut self) -> Result<Option<u8>, Self::Error> {
            Ok(self.input.pop_front())
        }

        fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
            self.output.extend_from_slice(bytes);
            Ok(())
        }
    }
}
