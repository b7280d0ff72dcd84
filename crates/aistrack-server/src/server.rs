//! UDP ingest loop.
//!
//! This module provides the ingest side of the tracker:
//! - Receiving datagrams on a UDP socket
//! - Framing datagrams into sentence lines
//! - Reassembling fragments and decoding messages
//! - Applying decoded messages to the shared tracker

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use aistrack_core::{DecodedMessage, Outcome, ShipTracker};
use aistrack_protocol::{LineBuffer, MessageDecoder, SentenceAssembler, SixBitDecoder};

use crate::sink::StaticLog;

/// Largest datagram the ingest loop reads in one call.
const MAX_DATAGRAM: usize = 65_535;

/// Statistics are logged every this many lines.
const STATS_LOG_INTERVAL: u64 = 1_000;

/// Tracker handle shared between the ingest loop and readers.
pub type SharedTracker = Arc<RwLock<ShipTracker>>;

/// Configuration for the ingest server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to receive datagrams on.
    pub bind_addr: SocketAddr,
    /// Where received static reports are appended, if anywhere.
    pub static_log: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 2947)),
            static_log: None,
        }
    }
}

/// Errors that stop the ingest loop.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to receive datagram: {0}")]
    Receive(#[source] std::io::Error),
}

/// Counters for ingested traffic.
#[derive(Debug, Default)]
pub struct IngestStats {
    lines: AtomicU64,
    messages: AtomicU64,
    decoded: AtomicU64,
}

/// Point-in-time copy of [`IngestStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestSnapshot {
    /// Sentence lines fully processed.
    pub lines: u64,
    /// Complete messages emitted by the assembler.
    pub messages: u64,
    /// Messages the decoder produced a result for.
    pub decoded: u64,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_line(&self) -> u64 {
        self.lines.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn record_message(&self) {
        self.messages.fetch_add(1, Ordering::Relaxed);
    }

    fn record_decoded(&self) {
        self.decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> IngestSnapshot {
        IngestSnapshot {
            lines: self.lines.load(Ordering::Relaxed),
            messages: self.messages.load(Ordering::Relaxed),
            decoded: self.decoded.load(Ordering::Relaxed),
        }
    }
}

/// The AIS ingest server.
///
/// Owns the reassembly state and processes datagrams strictly in arrival
/// order. The tracker is only locked for writing while a single decoded
/// message is applied.
pub struct AisServer<D = SixBitDecoder> {
    config: ServerConfig,
    tracker: SharedTracker,
    decoder: D,
    stats: Arc<IngestStats>,
    log: Option<StaticLog>,
    lines: LineBuffer,
    assembler: SentenceAssembler,
}

impl AisServer<SixBitDecoder> {
    /// Create a server around a freshly built tracker.
    pub fn new(config: ServerConfig, tracker: ShipTracker) -> Self {
        Self::with_shared(config, Arc::new(RwLock::new(tracker)))
    }

    /// Create a server feeding an existing shared tracker.
    pub fn with_shared(config: ServerConfig, tracker: SharedTracker) -> Self {
        let log = config.static_log.clone().map(StaticLog::new);
        Self {
            config,
            tracker,
            decoder: SixBitDecoder,
            stats: Arc::new(IngestStats::new()),
            log,
            lines: LineBuffer::new(),
            assembler: SentenceAssembler::new(),
        }
    }
}

impl<D: MessageDecoder> AisServer<D> {
    /// Replace the message decoder.
    pub fn with_decoder<E: MessageDecoder>(self, decoder: E) -> AisServer<E> {
        AisServer {
            config: self.config,
            tracker: self.tracker,
            decoder,
            stats: self.stats,
            log: self.log,
            lines: self.lines,
            assembler: self.assembler,
        }
    }

    /// Handle to the shared tracker.
    pub fn tracker(&self) -> SharedTracker {
        self.tracker.clone()
    }

    /// Handle to the ingest counters.
    pub fn stats(&self) -> Arc<IngestStats> {
        self.stats.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured address and run the ingest loop.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.bind_addr;
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.run_on(socket).await
    }

    /// Run the ingest loop on an already bound socket.
    ///
    /// Only returns when receiving fails.
    pub async fn run_on(mut self, socket: UdpSocket) -> Result<(), ServerError> {
        match socket.local_addr() {
            Ok(addr) => info!("AIS ingest listening on udp://{}", addr),
            Err(_) => info!("AIS ingest listening"),
        }

        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            let (len, peer) = socket
                .recv_from(&mut buf)
                .await
                .map_err(ServerError::Receive)?;
            debug!("Datagram from {}: {} bytes", peer, len);
            self.process_datagram(&buf[..len]).await;
        }
    }

    /// Frame a datagram into lines and process each one.
    pub async fn process_datagram(&mut self, data: &[u8]) {
        for line in self.lines.push(data) {
            self.process_line(&line).await;
        }
    }

    /// Feed one sentence line through reassembly, decoding and tracking.
    ///
    /// The line is counted once its effects are visible in the tracker.
    pub async fn process_line(&mut self, line: &str) {
        self.apply_line(line).await;

        let count = self.stats.record_line();
        if count % STATS_LOG_INTERVAL == 0 {
            let stats = self.stats.snapshot();
            debug!(
                lines = stats.lines,
                messages = stats.messages,
                decoded = stats.decoded,
                "Ingest statistics"
            );
        }
    }

    async fn apply_line(&mut self, line: &str) {
        let Some(message) = self.assembler.push(line) else {
            return;
        };
        self.stats.record_message();

        let Some(decoded) = self.decoder.decode(&message) else {
            debug!("No decoder result for {:?}", message);
            return;
        };
        self.stats.record_decoded();

        let now = Utc::now();
        let outcome = {
            let mut tracker = self.tracker.write().await;
            tracker.handle(&decoded, now)
        };

        match (&decoded, outcome) {
            (DecodedMessage::Static(report), Outcome::Registered) => {
                debug!("Registered static info for {}", report.mmsi);
                if let Some(log) = &self.log {
                    if let Err(e) = log.append(report, now).await {
                        warn!("Static log {} not written: {}", log.path().display(), e);
                    }
                }
            }
            (_, Outcome::Excluded) => {
                debug!("Skipped observer vessel {}", decoded.mmsi());
            }
            _ => {}
        }
    }
}
