// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cross-platform MIDI device connections.
//!
//! midilink opens a MIDI device, writes raw bytes to it, surfaces inbound
//! bytes, and closes it. Nothing more. Two backends satisfy that
//! contract:
//!
//! * **Linux** ([`connection::stream`]): the device is an ALSA rawmidi
//!   byte stream; reads and writes are blocking calls on the calling
//!   thread.
//! * **macOS** ([`connection::coremidi_backend`]): the device is a Core
//!   MIDI source/destination pair; inbound data arrives on a service
//!   thread and is queued as three-byte [`Packet`]s, outbound data is
//!   sent as a timestamped packet list.
//!
//! There is no message parsing, no scheduling, and no device state beyond
//! the connection handle itself. Operational failures come back as
//! [`Error`] values carrying the raw platform status; a closed connection
//! rejects further use with [`Error::Closed`].
//!
//! ```no_run
//! # #[cfg(target_os = "linux")]
//! # fn run() -> midilink::Result<()> {
//! let mut conn = midilink::open("hw:1,0")?;
//! conn.write(&[0x90, 0x3C, 0x64])?; // note on
//! conn.write(&[0x80, 0x3C, 0x00])?; // note off
//! conn.close()?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod device;
pub mod error;
pub mod packet;

pub use connection::{MidiStream, MidiWrite, StreamConnection};
pub use device::{devices, print_devices, Device, DeviceDirection};
pub use error::{Error, Result};
pub use packet::{packet_queue, Packet, PacketReceiver, PacketSender};

#[cfg(target_os = "linux")]
pub use connection::{open, RawmidiConnection};

#[cfg(target_os = "macos")]
pub use connection::EndpointConnection;
