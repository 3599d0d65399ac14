//! Wake channel used to interrupt a blocked wait.
//!
//! The channel is a non-blocking pipe. Its read end sits in the wait set
//! next to the device descriptors; its write end is used by control
//! operations that change what should be polled. The only valid payload
//! is [`WAKE_MESSAGE`].

use super::unix::{sys_close, sys_pipe, sys_read, sys_set_cloexec, sys_set_nonblocking, sys_write};

use std::io;
use std::os::fd::RawFd;
use tracing::{error, warn};

/// Sentinel byte carried by the wake channel.
pub(crate) const WAKE_MESSAGE: u8 = b'W';

/// Outcome of draining one byte from the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Drained {
    /// The sentinel byte was consumed.
    Wake,
    /// Some other byte was consumed.
    Unknown(u8),
    /// Nothing was available.
    Empty,
}

pub(crate) struct WakeChannel {
    read: RawFd,
    write: RawFd,
}

impl WakeChannel {
    /// Opens the pipe and sets both ends non-blocking and close-on-exec.
    pub(crate) fn new() -> io::Result<Self> {
        let (read, write) = sys_pipe()?;
        let channel = Self { read, write };

        for fd in [read, write] {
            sys_set_nonblocking(fd)?;
            sys_set_cloexec(fd)?;
        }

        Ok(channel)
    }

    /// Descriptor registered in the wait set.
    pub(crate) fn read_fd(&self) -> RawFd {
        self.read
    }

    /// Writes one sentinel byte.
    ///
    /// A full pipe already guarantees the waiter will wake, so `EAGAIN`
    /// is not reported as an error.
    pub(crate) fn signal(&self) -> io::Result<()> {
        let rc = sys_write(self.write, &[WAKE_MESSAGE]);
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::WouldBlock {
                return Ok(());
            }
            error!(error = %err, "error sending wake message");
            return Err(err);
        }

        Ok(())
    }

    /// Reads and discards exactly one byte.
    pub(crate) fn drain_one(&self) -> Drained {
        let mut msg = [0u8; 1];

        let rc = sys_read(self.read, &mut msg);
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::WouldBlock {
                error!(error = %err, "error reading from wake pipe");
            }
            return Drained::Empty;
        }
        if rc == 0 {
            return Drained::Empty;
        }

        if msg[0] != WAKE_MESSAGE {
            warn!("unknown message on wake queue (0x{:02x})", msg[0]);
            return Drained::Unknown(msg[0]);
        }

        Drained::Wake
    }
}

impl Drop for WakeChannel {
    fn drop(&mut self) {
        sys_close(self.read);
        sys_close(self.write);
    }
}
