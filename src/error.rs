//! Error types returned by the poll router.

use crate::device::DeviceSlot;
use crate::event::SensorHandle;

use std::io;

/// Errors surfaced to the host sensor service.
///
/// The host expects negative errno values; [`RouterError::errno`]
/// provides the mapping.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// The identifier is not routable, or the routed sensor rejects the
    /// operation by policy (flush on a one-shot sensor).
    #[error("invalid sensor handle {0}")]
    InvalidHandle(SensorHandle),

    /// A device capability call failed.
    #[error("{slot} device error: {source}")]
    Device {
        slot: DeviceSlot,
        #[source]
        source: io::Error,
    },

    /// The identifier routes to a slot whose device could not be created.
    #[error("{0} device unavailable")]
    Unavailable(DeviceSlot),

    /// The multiplexed wait failed for a reason other than interruption.
    #[error("poll() failed: {0}")]
    Wait(#[source] io::Error),
}

impl RouterError {
    /// Negative errno equivalent of this error.
    pub fn errno(&self) -> i32 {
        match self {
            RouterError::InvalidHandle(_) => -libc::EINVAL,
            RouterError::Device { source, .. } => -source.raw_os_error().unwrap_or(libc::EIO),
            RouterError::Unavailable(_) => -libc::ENODEV,
            RouterError::Wait(source) => -source.raw_os_error().unwrap_or(libc::EIO),
        }
    }

    pub(crate) fn device(slot: DeviceSlot, source: io::Error) -> Self {
        RouterError::Device { slot, source }
    }
}

pub type Result<T> = std::result::Result<T, RouterError>;
