// imu_bridge_core/src/bridge/tcp.rs

//! rosbridge client over a plain TCP socket.
//!
//! The caller never blocks: `publish` serializes the operation and pushes the
//! frame onto a bounded queue. A dedicated writer thread owns the socket,
//! reconnects after failures and replays every advertisement on each new
//! connection. Frames are newline-terminated JSON objects.
//!
//! Connecting and writing are both bounded by `io_timeout_ms`. A server that
//! stops reading counts as a lost connection, so the writer always gets back
//! to its shutdown check and dropping the bridge cannot hang.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::protocol::Operation;
use super::{BridgeClient, BridgeError, PublisherRegistry, Result};
use crate::messages::{BridgeMessage, MessageType};
use crate::types::ConnectionState;

const RECV_POLL: Duration = Duration::from_millis(100);
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TcpBridgeConfig {
    /// `host:port` of the rosbridge TCP server.
    #[serde(default = "default_address")]
    pub address: String,
    /// Frames buffered between the caller and the writer thread.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Delay between connection attempts.
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
    /// Upper bound on a single connection attempt or frame write.
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
}

fn default_address() -> String {
    "127.0.0.1:9090".to_string()
}
fn default_queue_capacity() -> usize {
    1024
}
fn default_reconnect_interval_ms() -> u64 {
    1000
}
fn default_io_timeout_ms() -> u64 {
    2000
}

impl Default for TcpBridgeConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            queue_capacity: default_queue_capacity(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
            io_timeout_ms: default_io_timeout_ms(),
        }
    }
}

enum Frame {
    Advertise { topic: String, bytes: Vec<u8> },
    Publish(Vec<u8>),
}

/// A [`BridgeClient`] speaking the rosbridge JSON protocol over TCP.
pub struct TcpRosBridge {
    registry: PublisherRegistry,
    sender: Sender<Frame>,
    connected: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    writer_thread: Option<JoinHandle<()>>,
}

impl TcpRosBridge {
    /// Starts the writer thread. Returns immediately; the connection is established in the background.
    pub fn spawn(config: TcpBridgeConfig) -> Result<Self> {
        let (sender, receiver) = bounded(config.queue_capacity.max(1));
        let connected = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));

        let connected_clone = Arc::clone(&connected);
        let shutdown_clone = Arc::clone(&shutdown);
        let address = config.address.clone();

        let writer_thread = thread::Builder::new()
            .name("rosbridge-writer".to_string())
            .spawn(move || {
                Self::writer_loop(&config, receiver, connected_clone, shutdown_clone);
            })?;

        info!("rosbridge client started for {}", address);

        Ok(Self {
            registry: PublisherRegistry::new(),
            sender,
            connected,
            shutdown,
            writer_thread: Some(writer_thread),
        })
    }

    /// Writer thread main loop - owns the socket.
    fn writer_loop(
        config: &TcpBridgeConfig,
        receiver: Receiver<Frame>,
        connected: Arc<AtomicBool>,
        shutdown: Arc<AtomicBool>,
    ) {
        // Advertisements seen so far, replayed on every (re)connection.
        let mut advertisements: Vec<(String, Vec<u8>)> = Vec::new();
        let reconnect_interval = Duration::from_millis(config.reconnect_interval_ms);
        // Zero would mean "no timeout" to the socket API.
        let io_timeout = Duration::from_millis(config.io_timeout_ms.max(1));

        while !shutdown.load(Ordering::Relaxed) {
            let mut stream = match Self::connect(&config.address, io_timeout) {
                Ok(stream) => stream,
                Err(e) => {
                    debug!("rosbridge connect to {} failed: {}", config.address, e);
                    Self::sleep_unless_shutdown(reconnect_interval, &shutdown);
                    continue;
                }
            };
            if let Err(e) = stream.set_write_timeout(Some(io_timeout)) {
                warn!("Failed to set rosbridge write timeout, retrying: {}", e);
                Self::sleep_unless_shutdown(reconnect_interval, &shutdown);
                continue;
            }
            if let Err(e) = stream.set_nodelay(true) {
                debug!("Failed to set TCP_NODELAY: {}", e);
            }

            let mut healthy = advertisements
                .iter()
                .all(|(_, bytes)| Self::write_frame(&mut stream, bytes).is_ok());

            if healthy {
                connected.store(true, Ordering::SeqCst);
                info!("rosbridge connected to {}", config.address);
            }

            while healthy && !shutdown.load(Ordering::Relaxed) {
                let result = match receiver.recv_timeout(RECV_POLL) {
                    Ok(Frame::Advertise { topic, bytes }) => {
                        let result = Self::write_frame(&mut stream, &bytes);
                        match advertisements.iter_mut().find(|(t, _)| *t == topic) {
                            Some(entry) => entry.1 = bytes,
                            None => advertisements.push((topic, bytes)),
                        }
                        result
                    }
                    Ok(Frame::Publish(bytes)) => Self::write_frame(&mut stream, &bytes),
                    Err(RecvTimeoutError::Timeout) => Ok(()),
                    // Every sender is gone: the bridge was dropped.
                    Err(RecvTimeoutError::Disconnected) => {
                        connected.store(false, Ordering::SeqCst);
                        return;
                    }
                };

                if let Err(e) = result {
                    match e.kind() {
                        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => warn!(
                            "rosbridge server at {} stopped reading, dropping connection",
                            config.address
                        ),
                        _ => warn!("rosbridge connection to {} lost: {}", config.address, e),
                    }
                    healthy = false;
                }
            }

            connected.store(false, Ordering::SeqCst);
        }

        debug!("rosbridge writer thread exiting");
    }

    /// Tries every address `address` resolves to, each bounded by `timeout`.
    fn connect(address: &str, timeout: Duration) -> io::Result<TcpStream> {
        let mut last_error = None;
        for addr in address.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "address resolved to nothing")
        }))
    }

    fn write_frame(stream: &mut TcpStream, bytes: &[u8]) -> io::Result<()> {
        stream.write_all(bytes)?;
        stream.write_all(b"\n")
    }

    fn sleep_unless_shutdown(duration: Duration, shutdown: &AtomicBool) {
        let deadline = Instant::now() + duration;
        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep(SHUTDOWN_POLL.min(deadline - now));
        }
    }

    fn enqueue(&self, topic: &str, frame: Frame) -> Result<()> {
        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(BridgeError::QueueFull(topic.to_string())),
            Err(TrySendError::Disconnected(_)) => Err(BridgeError::NotConnected),
        }
    }

    /// Stops the writer thread. Queued frames that were not yet written are discarded.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

impl BridgeClient for TcpRosBridge {
    fn connection_state(&self) -> ConnectionState {
        if self.connected.load(Ordering::SeqCst) {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    fn register_publisher(&mut self, topic: &str, message_type: MessageType) -> Result<()> {
        self.registry.register(topic, message_type)?;
        let bytes = Operation::advertise(topic, message_type).to_frame()?;
        self.enqueue(
            topic,
            Frame::Advertise {
                topic: topic.to_string(),
                bytes,
            },
        )
    }

    fn publish(&mut self, topic: &str, message: &BridgeMessage) -> Result<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(BridgeError::NotConnected);
        }
        self.registry.check(topic, message)?;
        let bytes = Operation::publish(topic, message).to_frame()?;
        self.enqueue(topic, Frame::Publish(bytes))
    }
}

impl Drop for TcpRosBridge {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread) = self.writer_thread.take() {
            let _ = thread.join();
        }
    }
}
