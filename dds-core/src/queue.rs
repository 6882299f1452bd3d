//! FIFO of decoded commands

use alloc::collections::VecDeque;

use crate::types::Command;

/// Commands waiting to be applied, oldest first.
///
/// Heap backed: the length is only limited by available memory.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: VecDeque<Command>,
}

impl CommandQueue {
    pub const fn new() -> Self {
        Self {
            commands: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Remove and return the oldest command
    pub fn dequeue(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}
