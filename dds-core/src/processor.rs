//! Interactive command reception
//!
//! Glues the line assembler, decoder and queue to a serial port: echoes what
//! is typed, prints a prompt after every line, and queues one decoded
//! command per non-empty line.

use crate::decoder::decode_command;
use crate::hal::SerialPort;
use crate::line::{Feed, LineAssembler, MAX_COMMAND_LEN};
use crate::queue::CommandQueue;
use crate::types::Command;

/// Prompt printed once a line has been processed
pub const PROMPT: &str = "$ ";

/// Receives command lines from a serial port and queues decoded commands
#[derive(Debug, Default)]
pub struct CommandProcessor {
    assembler: LineAssembler<MAX_COMMAND_LEN>,
    commands: CommandQueue,
    prompt_pending: bool,
}

impl CommandProcessor {
    pub const fn new() -> Self {
        Self {
            assembler: LineAssembler::new(),
            commands: CommandQueue::new(),
            prompt_pending: false,
        }
    }

    /// Handle at most one incoming character.
    ///
    /// A prompt owed from the previous line is written first, so that any
    /// report produced in between lands before it.
    pub fn poll<S: SerialPort>(&mut self, serial: &mut S) -> Result<(), S::Error> {
        if self.prompt_pending {
            serial.write_str(PROMPT)?;
            self.prompt_pending = false;
        }

        let Some(character) = serial.read_char()? else {
            return Ok(());
        };

        match self.assembler.feed(character) {
            Feed::Echo(character) => serial.write_bytes(&[character])?,
            Feed::Terminated(line) => {
                if let Some(line) = line {
                    let command = decode_command(&line);
                    #[cfg(feature = "defmt")]
                    defmt::trace!("Queued {}", command);
                    self.commands.enqueue(command);
                }
                serial.write_str("\n")?;
                self.prompt_pending = true;
            }
            Feed::Ignored => {}
        }

        Ok(())
    }

    pub fn command_is_available(&self) -> bool {
        !self.commands.is_empty()
    }

    pub fn number_of_commands(&self) -> usize {
        self.commands.len()
    }

    /// Oldest queued command
    pub fn next_command(&mut self) -> Option<Command> {
        self.commands.dequeue()
    }

    /// Characters of the line being typed
    pub fn partial_line(&self) -> &[u8] {
        self.assembler.as_bytes()
    }
}
