//! Replays a fixed list of datagrams

use fmtel_core::{PacketSource, SourceError};
use std::collections::VecDeque;

/// Source that yields pre-recorded datagrams in order, then reports
/// [`SourceError::Closed`]
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pending: VecDeque<Vec<u8>>,
    current: Vec<u8>,
}

impl ScriptedSource {
    pub fn new<I>(datagrams: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self {
            pending: datagrams.into_iter().collect(),
            current: Vec::new(),
        }
    }

    /// Datagrams not yet delivered
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl PacketSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn recv(&mut self) -> Result<&[u8], SourceError> {
        match self.pending.pop_front() {
            Some(datagram) => {
                self.current = datagram;
                Ok(self.current.as_slice())
            }
            None => Err(SourceError::Closed),
        }
    }
}
