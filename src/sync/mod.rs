//! Synchronization with the power-management peer
//!
//! The simulation core only talks to a `SyncChannel`. Standalone runs use
//! `NullChannel`; tests use `MemoryChannel` to capture the transcript; the
//! binary connects a `PeerChannel` over TCP.

pub mod message;
pub mod peer;
pub mod snapshot;

use crate::core::error::Result;

pub use message::SyncMessage;
pub use peer::PeerChannel;
pub use snapshot::Snapshot;

/// Line-oriented link to an external consumer of occupancy changes
pub trait SyncChannel {
    /// Initial occupancy published by the peer, if any
    ///
    /// Called once, before `START` is sent.
    fn recv_snapshot(&mut self) -> Result<Option<Snapshot>>;

    /// Send one message; fire-and-forget
    fn send(&mut self, message: &SyncMessage) -> Result<()>;

    /// Flush and close after `END`
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Messages discarded instead of delivered
    fn dropped(&self) -> u64 {
        0
    }

    /// Real-time pause after each tick so the peer can keep up
    fn pace(&self) -> Option<std::time::Duration> {
        None
    }
}

/// Channel for standalone runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChannel;

impl SyncChannel for NullChannel {
    fn recv_snapshot(&mut self) -> Result<Option<Snapshot>> {
        Ok(None)
    }

    fn send(&mut self, _message: &SyncMessage) -> Result<()> {
        Ok(())
    }
}

/// In-process channel that records every line it is given
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    snapshot_line: Option<String>,
    sent: Vec<String>,
    finished: bool,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `line` as the peer's snapshot
    pub fn with_snapshot(line: impl Into<String>) -> Self {
        Self {
            snapshot_line: Some(line.into()),
            ..Self::default()
        }
    }

    /// Lines sent so far, without newlines
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl SyncChannel for MemoryChannel {
    fn recv_snapshot(&mut self) -> Result<Option<Snapshot>> {
        Ok(self.snapshot_line.take().map(|line| Snapshot::parse(&line)))
    }

    fn send(&mut self, message: &SyncMessage) -> Result<()> {
        self.sent.push(message.to_string());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}
