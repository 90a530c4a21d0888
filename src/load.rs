//! Completion handle for asynchronously loaded effects.

use crate::{Error, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Resolves once a convolution effect is attached (`Ok`) or its impulse
/// response failed to load (`Err`).
///
/// Attachment waits for the track to become ready, so a track whose media
/// never loads leaves the handle pending forever. Use
/// [`EffectLoad::wait_timeout`] when that matters.
#[derive(Debug)]
pub struct EffectLoad {
    name: String,
    result: Receiver<Result<()>>,
}

impl EffectLoad {
    pub(crate) fn channel(name: &str) -> (Sender<Result<()>>, Self) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        (
            tx,
            Self {
                name: name.to_string(),
                result: rx,
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block until the load settles.
    pub fn wait(self) -> Result<()> {
        self.result.recv().unwrap_or_else(|_| Err(self.dropped()))
    }

    /// `None` if the load is still pending after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<()>> {
        match self.result.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(self.dropped())),
        }
    }

    /// Non-blocking poll. `None` while pending.
    pub fn try_result(&self) -> Option<Result<()>> {
        match self.result.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.dropped())),
        }
    }

    fn dropped(&self) -> Error {
        cadenza_core::Error::EffectDropped(self.name.clone()).into()
    }
}
