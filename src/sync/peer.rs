//! TCP link to the power-management peer
//!
//! The handshake (greeting + snapshot) is read synchronously on connect.
//! Afterwards the write half belongs to a background task fed by a bounded
//! queue, so the simulation loop never blocks on the socket. A full queue
//! drops the message; a dead writer is fatal for the run.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::core::config::PeerConfig;
use crate::core::error::{ParkError, Result};
use crate::sync::{Snapshot, SyncChannel, SyncMessage};

/// Connected peer channel
pub struct PeerChannel {
    runtime: Runtime,
    reader: Option<BufReader<OwnedReadHalf>>,
    tx: Option<mpsc::Sender<String>>,
    writer: Option<JoinHandle<std::io::Result<()>>>,
    greeting: Option<String>,
    pace: Option<Duration>,
    dropped: u64,
}

impl PeerChannel {
    /// Connect to the peer described by `config`
    pub fn connect(config: &PeerConfig) -> Result<Self> {
        if config.queue_capacity == 0 {
            return Err(ParkError::InvalidConfig("peer.queue_capacity must be positive".into()));
        }
        let runtime = Runtime::new()?;
        let addr = config.address();

        let stream = runtime
            .block_on(TcpStream::connect(&addr))
            .map_err(|source| ParkError::ChannelUnavailable { addr: addr.clone(), source })?;
        stream.set_nodelay(true)?;
        tracing::info!("Connected to peer at {}", addr);

        let (read_half, write_half) = stream.into_split();
        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let writer = runtime.spawn(write_lines(write_half, rx));

        Ok(Self {
            runtime,
            reader: Some(BufReader::new(read_half)),
            tx: Some(tx),
            writer: Some(writer),
            greeting: None,
            pace: (config.pace_ms > 0).then(|| Duration::from_millis(config.pace_ms)),
            dropped: 0,
        })
    }

    /// Greeting line received during the handshake
    pub fn greeting(&self) -> Option<&str> {
        self.greeting.as_deref()
    }
}

impl SyncChannel for PeerChannel {
    fn recv_snapshot(&mut self) -> Result<Option<Snapshot>> {
        let Some(mut reader) = self.reader.take() else {
            return Ok(None);
        };

        let (greeting, snapshot_line) = self.runtime.block_on(async move {
            let greeting = read_line(&mut reader, "greeting").await?;
            let snapshot = read_line(&mut reader, "snapshot").await?;
            Ok::<_, ParkError>((greeting, snapshot))
        })?;

        tracing::info!("Peer greeting: {}", greeting);
        self.greeting = Some(greeting);
        Ok(Some(Snapshot::parse(&snapshot_line)))
    }

    fn send(&mut self, message: &SyncMessage) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(ParkError::ChannelClosed)?;
        match tx.try_send(message.to_line()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                tracing::warn!("Peer queue full, dropped message: {}", message);
                Ok(())
            }
            Err(TrySendError::Closed(_)) => Err(ParkError::ChannelClosed),
        }
    }

    fn finish(&mut self) -> Result<()> {
        // Closing the queue lets the writer drain and shut the socket down
        self.tx.take();
        if let Some(writer) = self.writer.take() {
            self.runtime
                .block_on(writer)
                .map_err(|_| ParkError::ChannelClosed)??;
        }
        if self.dropped > 0 {
            tracing::warn!("{} messages to the peer were dropped", self.dropped);
        }
        Ok(())
    }

    fn dropped(&self) -> u64 {
        self.dropped
    }

    fn pace(&self) -> Option<Duration> {
        self.pace
    }
}

async fn read_line(reader: &mut BufReader<OwnedReadHalf>, what: &str) -> Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Err(ParkError::Handshake(format!("peer closed before sending {}", what)));
    }
    Ok(line.trim_end().to_string())
}

async fn write_lines(
    mut write_half: OwnedWriteHalf,
    mut rx: mpsc::Receiver<String>,
) -> std::io::Result<()> {
    while let Some(line) = rx.recv().await {
        if let Err(e) = write_half.write_all(line.as_bytes()).await {
            tracing::error!("Peer write failed: {}", e);
            return Err(e);
        }
    }
    write_half.flush().await?;
    write_half.shutdown().await
}
