//! Wait set over the device descriptors and the wake channel.
//!
//! Entries are positional: entry `i` belongs to the slot whose
//! [`DeviceSlot::index`] is `i`, and the wake channel always occupies the
//! last entry. Slots that are not configured, or whose device failed to
//! initialize, keep a negative descriptor, which `poll(2)` ignores.

use super::unix::sys_poll;
use crate::device::DeviceSlot;

use libc::{POLLIN, pollfd};
use std::io;
use std::os::fd::RawFd;
use std::time::{Duration, Instant};
use tracing::debug;

#[cfg(feature = "magnetometer")]
const WAKE_ENTRY: usize = DeviceSlot::MAX;

const INERT: pollfd = pollfd {
    fd: -1,
    events: 0,
    revents: 0,
};

pub(crate) struct WaitSet {
    entries: [pollfd; DeviceSlot::MAX + 1],
}

impl WaitSet {
    pub(crate) fn new() -> Self {
        Self {
            entries: [INERT; DeviceSlot::MAX + 1],
        }
    }

    /// Registers read interest for a device descriptor.
    pub(crate) fn set_device(&mut self, slot: DeviceSlot, fd: RawFd) {
        self.entries[slot.index()] = readable(fd);
    }

    /// Registers the read end of the wake channel.
    #[cfg(feature = "magnetometer")]
    pub(crate) fn set_wake(&mut self, fd: RawFd) {
        self.entries[WAKE_ENTRY] = readable(fd);
    }

    /// Blocks until a descriptor is readable or `timeout` expires.
    ///
    /// `None` waits indefinitely. Interrupted waits are restarted with
    /// whatever remains of `timeout`.
    pub(crate) fn wait(&mut self, timeout: Option<Duration>) -> io::Result<usize> {
        let started = Instant::now();

        loop {
            let timeout_ms = timeout
                .map(|t| poll_timeout_ms(t.saturating_sub(started.elapsed())))
                .unwrap_or(-1);

            match sys_poll(&mut self.entries, timeout_ms) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                    debug!("poll() restart ({err})");
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub(crate) fn is_ready(&self, slot: DeviceSlot) -> bool {
        self.entries[slot.index()].revents & POLLIN != 0
    }

    pub(crate) fn clear(&mut self, slot: DeviceSlot) {
        self.entries[slot.index()].revents = 0;
    }

    #[cfg(feature = "magnetometer")]
    pub(crate) fn wake_ready(&self) -> bool {
        self.entries[WAKE_ENTRY].revents & POLLIN != 0
    }

    #[cfg(feature = "magnetometer")]
    pub(crate) fn clear_wake(&mut self) {
        self.entries[WAKE_ENTRY].revents = 0;
    }
}

/// Whole milliseconds for `poll(2)`, rounded up so a short non-zero
/// timeout still blocks.
fn poll_timeout_ms(timeout: Duration) -> i32 {
    timeout.as_nanos().div_ceil(1_000_000).min(i32::MAX as u128) as i32
}

fn readable(fd: RawFd) -> pollfd {
    pollfd {
        fd,
        events: POLLIN,
        revents: 0,
    }
}
