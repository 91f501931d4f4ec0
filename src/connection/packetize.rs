// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Outbound packet planning for the endpoint backend.
//!
//! The packetization contract is quirky but load-bearing, and callers
//! account for it:
//!
//! * a buffer of length `L` becomes `L / 256 + 1` packets (one packet per
//!   256-byte chunk, always at least one);
//! * each packet carries exactly three payload bytes: the first three of
//!   its chunk, zero-padded when the chunk is shorter;
//! * the reported "bytes written" is `packets * 256`, the capacity
//!   reserved for the list, not the payload actually copied into it.
//!
//! Kept separate from the Core MIDI glue so the arithmetic is exercised
//! on every platform.

use crate::error::{Error, Result, INSUFFICIENT_SPACE_IN_PACKET};

/// Outbound chunk size. One packet is emitted per chunk.
pub const CHUNK_SIZE: usize = 256;

/// Fixed payload length carried by every packet.
pub const PACKET_PAYLOAD_LEN: usize = 3;

// Per-packet overhead in a MIDIPacketList: 8-byte timestamp plus 2-byte
// length, as laid out by the service's packet header.
const PACKET_HEADER_LEN: usize = 10;

/// A planned packet list: the payload triplets and the byte count that
/// will be reported for the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketPlan {
    pub payloads: Vec<[u8; PACKET_PAYLOAD_LEN]>,
    pub reported_len: usize,
}

impl PacketPlan {
    pub fn packet_count(&self) -> usize {
        self.payloads.len()
    }
}

/// Plans the packet list for `buffer`, reserving `packets * 256` bytes of
/// list capacity.
pub fn plan_packets(buffer: &[u8]) -> Result<PacketPlan> {
    let packets = buffer.len() / CHUNK_SIZE + 1;
    plan_with_capacity(buffer, packets * CHUNK_SIZE)
}

/// Plans the packet list against an explicit capacity budget. If a packet
/// does not fit, fails with [`Error::Truncated`] and nothing is sent.
pub(crate) fn plan_with_capacity(buffer: &[u8], capacity: usize) -> Result<PacketPlan> {
    let packets = buffer.len() / CHUNK_SIZE + 1;
    let mut payloads = Vec::with_capacity(packets);
    let mut used = 0;

    for chunk_index in 0..packets {
        used += PACKET_HEADER_LEN + PACKET_PAYLOAD_LEN;
        if used > capacity {
            return Err(Error::Truncated(INSUFFICIENT_SPACE_IN_PACKET));
        }
        let start = (chunk_index * CHUNK_SIZE).min(buffer.len());
        payloads.push(triplet(&buffer[start..]));
    }

    Ok(PacketPlan {
        payloads,
        reported_len: packets * CHUNK_SIZE,
    })
}

/// First three bytes of `data`, zero-padded. This is also the shape every
/// inbound packet is forwarded in.
pub fn triplet(data: &[u8]) -> [u8; PACKET_PAYLOAD_LEN] {
    let mut out = [0u8; PACKET_PAYLOAD_LEN];
    let n = data.len().min(PACKET_PAYLOAD_LEN);
    out[..n].copy_from_slice(&data[..n]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_still_sends_one_packet() {
        let plan = plan_packets(&[]).unwrap();
        assert_eq!(plan.packet_count(), 1);
        assert_eq!(plan.reported_len, 256);
        assert_eq!(plan.payloads[0], [0, 0, 0]);
    }

    #[test]
    fn test_three_byte_message() {
        let plan = plan_packets(&[0x90, 0x40, 0x7F]).unwrap();
        assert_eq!(plan.packet_count(), 1);
        assert_eq!(plan.reported_len, 256);
        assert_eq!(plan.payloads[0], [0x90, 0x40, 0x7F]);
    }

    #[test]
    fn test_exactly_one_chunk_rolls_into_two_packets() {
        let buffer = vec![0xAB; 256];
        let plan = plan_packets(&buffer).unwrap();
        assert_eq!(plan.packet_count(), 2);
        assert_eq!(plan.reported_len, 512);
        assert_eq!(plan.payloads[0], [0xAB, 0xAB, 0xAB]);
        // The second chunk is empty, so its payload is all padding.
        assert_eq!(plan.payloads[1], [0, 0, 0]);
    }

    #[test]
    fn test_one_byte_past_a_chunk_boundary() {
        let mut buffer = vec![0x11; 256];
        buffer.push(0x22);
        let plan = plan_packets(&buffer).unwrap();
        assert_eq!(plan.packet_count(), 2);
        assert_eq!(plan.reported_len, 512);
        assert_eq!(plan.payloads[1], [0x22, 0, 0]);
    }

    #[test]
    fn test_reported_len_ignores_actual_payload() {
        // Regardless of L, the reported count is packets * 256.
        for (len, expected) in [(0, 256), (3, 256), (255, 256), (256, 512), (257, 512), (1024, 1280)] {
            let buffer = vec![0u8; len];
            let plan = plan_packets(&buffer).unwrap();
            assert_eq!(plan.reported_len, expected, "L = {len}");
            assert_eq!(plan.packet_count(), len / 256 + 1, "L = {len}");
        }
    }

    #[test]
    fn test_exhausted_capacity_reports_truncated() {
        // A budget too small for even one packet header + payload.
        let err = plan_with_capacity(&[0x90, 0x40, 0x7F], 12).unwrap_err();
        assert_eq!(err, Error::Truncated(INSUFFICIENT_SPACE_IN_PACKET));

        // Room for one packet but not two.
        let buffer = vec![0u8; 256];
        let err = plan_with_capacity(&buffer, 20).unwrap_err();
        assert_eq!(err, Error::Truncated(INSUFFICIENT_SPACE_IN_PACKET));
    }

    #[test]
    fn test_triplet_pads_short_input() {
        assert_eq!(triplet(&[]), [0, 0, 0]);
        assert_eq!(triplet(&[0xF8]), [0xF8, 0, 0]);
        assert_eq!(triplet(&[0xC0, 0x05]), [0xC0, 0x05, 0]);
        assert_eq!(triplet(&[0x90, 0x40, 0x7F]), [0x90, 0x40, 0x7F]);
        assert_eq!(triplet(&[0x90, 0x40, 0x7F, 0xFF]), [0x90, 0x40, 0x7F]);
    }
}
