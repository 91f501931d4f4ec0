// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error type shared by both backends.
//!
//! Platform calls report raw status integers (negative `OSStatus` values
//! from Core MIDI, `errno` values from ALSA). Those are folded into a
//! small closed set of error kinds, with the raw status preserved so it
//! can still be logged or compared against platform documentation.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Status code reported when a packet list runs out of space while
/// being built. Not a real `OSStatus`, but callers may match on it.
pub const INSUFFICIENT_SPACE_IN_PACKET: i32 = -10900;

// The Core MIDI statuses this layer cares about. The full range is
// -10830..=-10844; anything unlisted maps to `Unknown`.
pub(crate) const K_MIDI_UNKNOWN_ENDPOINT: i32 = -10834;
pub(crate) const K_MIDI_MESSAGE_SEND_ERR: i32 = -10838;
pub(crate) const K_MIDI_SERVER_START_ERR: i32 = -10839;
pub(crate) const K_MIDI_WRONG_THREAD: i32 = -10841;
pub(crate) const K_MIDI_OBJECT_NOT_FOUND: i32 = -10842;
pub(crate) const K_MIDI_NOT_PERMITTED: i32 = -10844;

/// A MIDI connection error.
///
/// Every variant except [`Error::Closed`] carries the raw platform
/// status that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The platform refused the operation.
    #[error("operation not permitted (status {0})")]
    PermissionDenied(i32),

    /// The device exists but is held by someone else.
    #[error("device is busy (status {0})")]
    DeviceBusy(i32),

    /// No device or endpoint matches the given identifier.
    #[error("device not found (status {0})")]
    DeviceNotFound(i32),

    /// Communication with the device or the MIDI service failed.
    #[error("transport failure (status {0})")]
    Transport(i32),

    /// A packet list ran out of space while being built; nothing was sent.
    #[error("insufficient space in packet (status {0})")]
    Truncated(i32),

    /// The connection has already been closed.
    #[error("connection is closed")]
    Closed,

    /// Any other platform status.
    #[error("unknown platform status {0}")]
    Unknown(i32),
}

impl Error {
    /// The raw platform status behind this error, or 0 for [`Error::Closed`].
    pub fn status(&self) -> i32 {
        match *self {
            Error::PermissionDenied(s)
            | Error::DeviceBusy(s)
            | Error::DeviceNotFound(s)
            | Error::Transport(s)
            | Error::Truncated(s)
            | Error::Unknown(s) => s,
            Error::Closed => 0,
        }
    }

    /// Maps a Core MIDI `OSStatus` to an error. `status` must be nonzero.
    pub fn from_os_status(status: i32) -> Error {
        match status {
            K_MIDI_NOT_PERMITTED => Error::PermissionDenied(status),
            K_MIDI_UNKNOWN_ENDPOINT | K_MIDI_OBJECT_NOT_FOUND => Error::DeviceNotFound(status),
            K_MIDI_MESSAGE_SEND_ERR | K_MIDI_SERVER_START_ERR | K_MIDI_WRONG_THREAD => {
                Error::Transport(status)
            }
            INSUFFICIENT_SPACE_IN_PACKET => Error::Truncated(status),
            _ => Error::Unknown(status),
        }
    }

    /// Maps an `errno` value from an ALSA call to an error.
    #[cfg(target_os = "linux")]
    pub fn from_errno(errno: i32) -> Error {
        match errno {
            libc::EACCES | libc::EPERM => Error::PermissionDenied(errno),
            libc::EBUSY => Error::DeviceBusy(errno),
            libc::ENOENT | libc::ENODEV | libc::ENXIO => Error::DeviceNotFound(errno),
            libc::EIO | libc::EPIPE | libc::ESTRPIPE => Error::Transport(errno),
            _ => Error::Unknown(errno),
        }
    }

    #[cfg(target_os = "linux")]
    pub(crate) fn from_alsa(err: alsa::Error) -> Error {
        Error::from_errno(err.errno())
    }

    #[cfg(target_os = "linux")]
    pub(crate) fn from_io(err: std::io::Error) -> Error {
        match err.raw_os_error() {
            Some(errno) => Error::from_errno(errno),
            None => Error::Transport(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_status_mapping() {
        assert_eq!(
            Error::from_os_status(K_MIDI_NOT_PERMITTED),
            Error::PermissionDenied(-10844)
        );
        assert_eq!(
            Error::from_os_status(K_MIDI_UNKNOWN_ENDPOINT),
            Error::DeviceNotFound(-10834)
        );
        assert_eq!(
            Error::from_os_status(K_MIDI_OBJECT_NOT_FOUND),
            Error::DeviceNotFound(-10842)
        );
        assert_eq!(
            Error::from_os_status(K_MIDI_MESSAGE_SEND_ERR),
            Error::Transport(-10838)
        );
        assert_eq!(
            Error::from_os_status(INSUFFICIENT_SPACE_IN_PACKET),
            Error::Truncated(-10900)
        );
    }

    #[test]
    fn test_unlisted_status_is_unknown() {
        assert_eq!(Error::from_os_status(-10830), Error::Unknown(-10830));
        assert_eq!(Error::from_os_status(42), Error::Unknown(42));
    }

    #[test]
    fn test_raw_status_is_preserved() {
        assert_eq!(Error::from_os_status(-10844).status(), -10844);
        assert_eq!(Error::from_os_status(-12345).status(), -12345);
        assert_eq!(Error::Closed.status(), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_errno_mapping() {
        assert_eq!(Error::from_errno(libc::EACCES), Error::PermissionDenied(libc::EACCES));
        assert_eq!(Error::from_errno(libc::EBUSY), Error::DeviceBusy(libc::EBUSY));
        assert_eq!(Error::from_errno(libc::ENOENT), Error::DeviceNotFound(libc::ENOENT));
        assert_eq!(Error::from_errno(libc::EIO), Error::Transport(libc::EIO));
        assert_eq!(Error::from_errno(libc::EINVAL), Error::Unknown(libc::EINVAL));
    }

    #[test]
    fn test_display() {
        let err = Error::Truncated(INSUFFICIENT_SPACE_IN_PACKET);
        assert_eq!(err.to_string(), "insufficient space in packet (status -10900)");
        assert_eq!(Error::Closed.to_string(), "connection is closed");
    }
}
