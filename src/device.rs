//! Device capability interface.
//!
//! Each physical source (the sensor hub, the magnetometer, the rear
//! proximity sensor) is driven by its own driver which owns a pollable
//! descriptor and a queue of decoded events. The router only talks to
//! drivers through [`SensorDevice`].

use crate::event::{SensorEvent, SensorHandle};

use std::fmt;
use std::io;
use std::os::fd::RawFd;

/// Capabilities the router needs from a device driver.
///
/// Methods take `&self`: control operations may be issued from another
/// thread while the polling thread is draining the same device, so
/// drivers keep their mutable state behind their own synchronization.
pub trait SensorDevice: Send + Sync {
    /// Descriptor that becomes readable when the driver has data.
    fn pollable_fd(&self) -> RawFd;

    /// Enables or disables reporting for `handle`.
    fn set_enable(&self, handle: SensorHandle, enabled: bool) -> io::Result<()>;

    /// Sets the sampling interval for `handle`.
    fn set_delay(&self, handle: SensorHandle, interval_ns: i64) -> io::Result<()>;

    /// Whether decoded events are still queued inside the driver.
    ///
    /// A single readiness notification may carry more events than fit
    /// in the caller's buffer; the router drains such devices again even
    /// if their descriptor is not reported ready.
    fn has_pending_events(&self) -> bool;

    /// Copies up to `buffer.len()` decoded events into `buffer`.
    fn read_events(&self, buffer: &mut [SensorEvent]) -> io::Result<usize>;

    /// Requests a flush-complete marker for `handle`.
    ///
    /// Only the hub implements this.
    fn flush(&self, handle: SensorHandle) -> io::Result<()> {
        let _ = handle;
        Err(io::Error::from_raw_os_error(libc::EINVAL))
    }
}

/// Input accepted by the magnetometer for its orientation computation.
pub trait AccelSink: Send + Sync {
    /// Pushes the most recent accelerometer sample.
    fn set_accel_input(&self, event: &SensorEvent);
}

/// Position of a physical device in the router.
///
/// The discriminant is the drain order: slots are always visited from
/// `Hub` to `Proximity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceSlot {
    Hub = 0,
    #[cfg(feature = "magnetometer")]
    Magnetometer = 1,
    #[cfg(feature = "rear-proximity")]
    Proximity = 2,
}

impl DeviceSlot {
    /// Upper bound on the number of slots in any build.
    pub const MAX: usize = 3;

    /// Every slot compiled into this build, in drain order.
    pub const ALL: &'static [DeviceSlot] = &[
        DeviceSlot::Hub,
        #[cfg(feature = "magnetometer")]
        DeviceSlot::Magnetometer,
        #[cfg(feature = "rear-proximity")]
        DeviceSlot::Proximity,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceSlot::Hub => "sensorhub",
            #[cfg(feature = "magnetometer")]
            DeviceSlot::Magnetometer => "magnetometer",
            #[cfg(feature = "rear-proximity")]
            DeviceSlot::Proximity => "rearprox",
        }
    }
}

impl fmt::Display for DeviceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
