// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice I/O for Aletheia.
//!
//! [`VoiceIo`] wraps a [`SpeechRecognizer`](aletheia_core::SpeechRecognizer)
//! and a [`SpeechSynthesizer`](aletheia_core::SpeechSynthesizer) behind
//! capability-checked listen operations and a FIFO speech lane. The
//! remaining modules provide host backends built on external commands.

pub mod io;
pub mod line;
pub mod player;
pub mod synth;

pub use io::{ContinuousListener, VoiceIo};
pub use line::LineRecognizer;
pub use player::CommandPlayer;
pub use synth::{CommandSynthesizer, PrintSynthesizer, TtsFlavor};

/// Splits a configured command line into program and arguments.
///
/// Returns `None` for a blank command.
pub(crate) fn split_command(command: &str) -> Option<(String, Vec<String>)> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// True if `program` resolves to a file on `PATH` (or is itself a path).
pub(crate) fn on_path(program: &str) -> bool {
    if program.contains(std::path::MAIN_SEPARATOR) {
        return std::path::Path::new(program).is_file();
    }
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
