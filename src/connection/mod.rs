// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Connection backends.
//!
//! Two mutually exclusive backends satisfy one contract: open a device,
//! write bytes, read (by blocking call or queued callback), close.
//!
//! * [`stream`]: a device as a pair of blocking byte streams (ALSA
//!   rawmidi on Linux).
//! * [`coremidi_backend`]: a client/port/endpoint connection to the
//!   Core MIDI service on macOS, with inbound data delivered through a
//!   bounded queue.
//!
//! The platform glue is target-gated; the lifecycle state machine and the
//! packetization rules are not, and are tested everywhere.

pub mod packetize;
pub mod stream;

#[cfg(target_os = "macos")]
pub mod coremidi_backend;

use crate::error::Result;

/// Write half of the connection contract, implemented by both backends.
///
/// The returned count is backend-defined: the stream backend reports
/// bytes accepted by the device, the endpoint backend reports the packet
/// list capacity it reserved (see [`packetize`]).
pub trait MidiWrite: Send {
    fn write(&mut self, bytes: &[u8]) -> Result<usize>;
}

pub use stream::{MidiStream, StreamConnection};

#[cfg(target_os = "linux")]
pub use stream::{open, RawmidiConnection};

#[cfg(target_os = "macos")]
pub use coremidi_backend::EndpointConnection;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock writer for testing code that is generic over `MidiWrite`.
    struct RecordingWriter {
        sent: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl MidiWrite for RecordingWriter {
        fn write(&mut self, bytes: &[u8]) -> Result<usize> {
            self.sent.lock().unwrap().push(bytes.to_vec());
            Ok(bytes.len())
        }
    }

    #[test]
    fn test_midi_write_as_trait_object() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut writer: Box<dyn MidiWrite> = Box::new(RecordingWriter { sent: sent.clone() });

        writer.write(&[0x90, 0x3C, 0x64]).unwrap();
        writer.write(&[0x80, 0x3C, 0x00]).unwrap();

        assert_eq!(
            *sent.lock().unwrap(),
            vec![vec![0x90, 0x3C, 0x64], vec![0x80, 0x3C, 0x00]]
        );
    }
}
