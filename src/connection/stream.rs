// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Stream-oriented backend: a MIDI device as a pair of blocking byte
//! streams.
//!
//! On Linux this sits on ALSA rawmidi. The connection owns one capture
//! stream and one playback stream, opened together; read and write are
//! direct blocking calls on the calling thread with no internal locking,
//! so concurrent use of one connection needs external synchronization.
//!
//! [`MidiStream`] is the seam between the connection lifecycle and the
//! platform: tests substitute in-memory streams, the Linux glue plugs in
//! rawmidi handles.

use tracing::debug;

use super::MidiWrite;
use crate::error::{Error, Result};

/// A blocking byte stream on one side of a MIDI device.
pub trait MidiStream: Send {
    /// Reads up to `buf.len()` bytes, blocking until at least one is
    /// available.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Writes the whole buffer, blocking until accepted.
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Releases the stream. Called exactly once, from
    /// [`StreamConnection::close`].
    fn close(&mut self) -> Result<()>;
}

/// A bidirectional stream connection.
///
/// Operations on a closed connection fail with [`Error::Closed`] instead
/// of being undefined.
pub struct StreamConnection<S> {
    input: S,
    output: S,
    closed: bool,
}

impl<S: MidiStream> StreamConnection<S> {
    /// Builds a connection from an already-open input/output stream pair.
    pub fn from_streams(input: S, output: S) -> Self {
        StreamConnection {
            input,
            output,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    /// Blocking read from the input side.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;
        self.input.read(buf)
    }

    /// Blocking write to the output side.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.ensure_open()?;
        self.output.write(bytes)
    }

    /// Closes both sides. Both closes run unconditionally; when both
    /// fail, the input side's error is the one reported.
    pub fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.closed = true;
        let input_rc = self.input.close();
        let output_rc = self.output.close();
        debug!("closed stream connection");
        input_rc.and(output_rc)
    }
}

impl<S> std::fmt::Debug for StreamConnection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamConnection")
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl<S: MidiStream> MidiWrite for StreamConnection<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        StreamConnection::write(self, bytes)
    }
}

#[cfg(target_os = "linux")]
mod rawmidi {
    use alsa::rawmidi::Rawmidi;
    use alsa::Direction;
    use std::io::{Read, Write};
    use tracing::debug;

    use super::{MidiStream, StreamConnection};
    use crate::error::{Error, Result};

    /// One direction of an ALSA rawmidi device.
    pub struct RawmidiStream {
        handle: Rawmidi,
        direction: Direction,
    }

    impl MidiStream for RawmidiStream {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            self.handle.io().read(buf).map_err(Error::from_io)
        }

        fn write(&mut self, buf: &[u8]) -> Result<usize> {
            self.handle.io().write(buf).map_err(Error::from_io)
        }

        fn close(&mut self) -> Result<()> {
            // Flush pending output, discard unread input; the device
            // handle itself is released when the stream is dropped.
            let rc = match self.direction {
                Direction::Playback => self.handle.drain(),
                Direction::Capture => self.handle.drop(),
            };
            rc.map_err(Error::from_alsa)
        }
    }

    /// A rawmidi device connection.
    pub type RawmidiConnection = StreamConnection<RawmidiStream>;

    /// Opens the named rawmidi device (an ALSA hardware id such as
    /// `hw:1,0`) for reading and writing. On failure nothing is left
    /// open: a stream acquired before the failing step is released when
    /// it goes out of scope.
    pub fn open(name: &str) -> Result<RawmidiConnection> {
        let input = Rawmidi::new(name, Direction::Capture, false).map_err(Error::from_alsa)?;
        let output = Rawmidi::new(name, Direction::Playback, false).map_err(Error::from_alsa)?;
        debug!(device = name, "opened rawmidi connection");
        Ok(StreamConnection::from_streams(
            RawmidiStream {
                handle: input,
                direction: Direction::Capture,
            },
            RawmidiStream {
                handle: output,
                direction: Direction::Playback,
            },
        ))
    }
}

#[cfg(target_os = "linux")]
pub use rawmidi::{open, RawmidiConnection, RawmidiStream};
