// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A recognizer that "hears" lines of text.
//!
//! Used by the terminal front end in place of a microphone, and by tests
//! with an in-memory reader.

use std::sync::atomic::{AtomicBool, Ordering};

use aletheia_core::{AletheiaError, SpeechRecognizer};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{Mutex, Notify};

pub struct LineRecognizer<R> {
    lines: Mutex<Lines<R>>,
    abort: Notify,
    exhausted: AtomicBool,
}

impl LineRecognizer<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> LineRecognizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
            abort: Notify::new(),
            exhausted: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl<R> SpeechRecognizer for LineRecognizer<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    /// Supported until the underlying reader hits end of input.
    fn is_supported(&self) -> bool {
        !self.exhausted.load(Ordering::SeqCst)
    }

    async fn recognize_once(&self) -> Result<Option<String>, AletheiaError> {
        let aborted = self.abort.notified();
        let mut lines = self.lines.lock().await;
        tokio::select! {
            _ = aborted => Ok(None),
            line = lines.next_line() => {
                let line = line.map_err(|e| AletheiaError::Internal(e.to_string()))?;
                if line.is_none() {
                    self.exhausted.store(true, Ordering::SeqCst);
                }
                Ok(line)
            }
        }
    }

    async fn abort(&self) -> Result<(), AletheiaError> {
        self.abort.notify_waiters();
        Ok(())
    }
}
