// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Endpoint-oriented backend: a MIDI connection through the Core MIDI
//! service.
//!
//! Opening registers a client, creates an input port with a read callback
//! and an output port, and connects the input port to the source
//! endpoint. Inbound packets arrive on a thread owned by the MIDI
//! service; each one is forwarded as a three-byte triplet into the
//! connection's bounded queue (see [`crate::packet`]). Outbound writes
//! build a timestamped packet list and hand it to the service's send
//! primitive.

use coremidi::{Client, Destination, InputPort, OutputPort, PacketBuffer, PacketList, Source};
use tracing::debug;

use super::packetize::{plan_packets, triplet};
use super::MidiWrite;
use crate::error::{Error, Result, K_MIDI_OBJECT_NOT_FOUND};
use crate::packet::{packet_queue, Packet, PacketReceiver};

/// A connection to a Core MIDI source/destination pair.
///
/// The source and destination endpoints belong to the system; the
/// connection borrows them for its lifetime and never disposes them.
pub struct EndpointConnection {
    // `None` once the connection has been closed.
    client: Option<Client>,
    input_port: Option<InputPort>,
    output_port: Option<OutputPort>,
    source: Source,
    destination: Destination,
    receiver: PacketReceiver,
}

impl EndpointConnection {
    /// Opens a connection to the source and destination at the given
    /// system indices.
    ///
    /// Setup runs in order: resolve endpoints, create the client, create
    /// the input port with its read callback, create the output port,
    /// connect the input port to the source. The first failing step
    /// returns its error; resources acquired before it are released as
    /// they go out of scope.
    ///
    /// `queue_size` bounds the inbound packet queue. When the queue is
    /// full the newest packet is dropped; 0 means packets are only
    /// delivered to a caller already blocked in a receive.
    pub fn open(
        source_index: usize,
        destination_index: usize,
        queue_size: usize,
    ) -> Result<Self> {
        let source = Source::from_index(source_index)
            .ok_or(Error::DeviceNotFound(K_MIDI_OBJECT_NOT_FOUND))?;
        let destination = Destination::from_index(destination_index)
            .ok_or(Error::DeviceNotFound(K_MIDI_OBJECT_NOT_FOUND))?;

        let client = Client::new("midilink").map_err(Error::from_os_status)?;

        let (sender, receiver) = packet_queue(queue_size);
        let input_port = client
            .input_port("midilink input", move |packets: &PacketList| {
                for packet in packets.iter() {
                    sender.send(Packet::from(triplet(packet.data())));
                }
            })
            .map_err(Error::from_os_status)?;
        let output_port = client
            .output_port("midilink output")
            .map_err(Error::from_os_status)?;

        input_port
            .connect_source(&source)
            .map_err(Error::from_os_status)?;

        debug!(source_index, destination_index, "opened coremidi connection");
        Ok(EndpointConnection {
            client: Some(client),
            input_port: Some(input_port),
            output_port: Some(output_port),
            source,
            destination,
            receiver,
        })
    }

    /// Sends `bytes` to the destination as one timestamped packet list.
    ///
    /// The packetization contract applies: one packet per 256-byte chunk
    /// (at least one), three payload bytes per packet, and the returned
    /// count is `packets * 256`, the list capacity rather than the payload
    /// copied into it. See [`super::packetize`].
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        let output_port = self.output_port.as_ref().ok_or(Error::Closed)?;
        let plan = plan_packets(bytes)?;

        // Timestamp 0 asks the service to deliver immediately; the whole
        // list shares it.
        let mut list = PacketBuffer::with_capacity(plan.reported_len);
        for payload in &plan.payloads {
            list.push_data(0, payload);
        }

        output_port
            .send(&self.destination, &list)
            .map_err(Error::from_os_status)?;
        Ok(plan.reported_len)
    }

    /// The receiving half of the inbound packet queue.
    pub fn packets(&self) -> &PacketReceiver {
        &self.receiver
    }

    pub fn is_closed(&self) -> bool {
        self.input_port.is_none()
    }

    /// Tears the connection down: disconnects and disposes the input
    /// port, then the output port, then the client, in that order. Every
    /// step runs; the first failure is the one reported. The endpoints
    /// are left untouched; they are system objects this connection never
    /// owned.
    pub fn close(&mut self) -> Result<()> {
        let input_port = self.input_port.take().ok_or(Error::Closed)?;
        let disconnect_rc = input_port
            .disconnect_source(&self.source)
            .map_err(Error::from_os_status);
        drop(input_port);
        drop(self.output_port.take());
        drop(self.client.take());
        debug!("closed coremidi connection");
        disconnect_rc
    }
}

impl MidiWrite for EndpointConnection {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        EndpointConnection::write(self, bytes)
    }
}
