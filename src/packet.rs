// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Inbound packet type and the queue that carries packets from the
//! platform callback thread to the caller.
//!
//! The endpoint backend receives data on a thread owned by the OS MIDI
//! service. The queue here is the only synchronization between that
//! thread and the caller: the callback pushes with [`PacketSender::send`],
//! the caller drains through [`PacketReceiver`].
//!
//! The queue is bounded. When it is full the newest packet is dropped
//! rather than blocking the MIDI service thread; drops are traced. A
//! capacity of 0 makes the queue a rendezvous point: a packet is only
//! delivered if the caller is already blocked in [`PacketReceiver::recv`].

use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::time::Duration;

use tracing::trace;

/// One inbound MIDI message, always exactly three bytes.
///
/// Messages shorter than three bytes arrive zero-padded; this layer does
/// not parse or validate message contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub data: [u8; 3],
}

impl Packet {
    pub const LEN: usize = 3;
}

impl From<[u8; 3]> for Packet {
    fn from(data: [u8; 3]) -> Self {
        Packet { data }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x} {:02x} {:02x}",
            self.data[0], self.data[1], self.data[2]
        )
    }
}

/// Creates the bounded queue connecting a connection's read callback to
/// its consumer. Returns the sender half (captured by the callback) and
/// the receiver half (held by the connection).
pub fn packet_queue(capacity: usize) -> (PacketSender, PacketReceiver) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    (PacketSender { tx }, PacketReceiver { rx })
}

/// Sending half of the packet queue. Cloneable and safe to use from the
/// OS callback thread.
#[derive(Clone)]
pub struct PacketSender {
    tx: SyncSender<Packet>,
}

impl PacketSender {
    /// Offers a packet to the queue. Returns `false` if the packet was
    /// dropped because the queue is full or the receiver is gone.
    pub fn send(&self, packet: Packet) -> bool {
        match self.tx.try_send(packet) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                trace!(%packet, "inbound queue full, dropping packet");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Receiving half of the packet queue.
pub struct PacketReceiver {
    rx: Receiver<Packet>,
}

impl PacketReceiver {
    /// Blocks until a packet arrives. Returns `None` once the sending
    /// side has been dropped and the queue is empty.
    pub fn recv(&self) -> Option<Packet> {
        self.rx.recv().ok()
    }

    /// Returns the next packet without blocking, if one is queued.
    pub fn try_recv(&self) -> Option<Packet> {
        self.rx.try_recv().ok()
    }

    /// Blocks up to `timeout` for the next packet.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Packet> {
        match self.rx.recv_timeout(timeout) {
            Ok(packet) => Some(packet),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drains all currently queued packets.
    pub fn drain(&self) -> Vec<Packet> {
        let mut packets = Vec::new();
        while let Some(packet) = self.try_recv() {
            packets.push(packet);
        }
        packets
    }
}
