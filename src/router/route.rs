use crate::device::DeviceSlot;
use crate::event::SensorHandle;
use crate::sensor_list::SensorInfo;

use std::collections::HashMap;
use tracing::{debug, warn};

/// Where a control call for one identifier goes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Route {
    /// Static metadata for the identifier.
    pub(crate) info: &'static SensorInfo,

    /// Device that owns the identifier.
    pub(crate) primary: DeviceSlot,

    /// Devices that must follow the primary's enable state and rate.
    pub(crate) secondary: &'static [DeviceSlot],

    /// Enabling this identifier must interrupt a blocked wait.
    pub(crate) wakes_poller: bool,
}

/// Identifier to device mapping, built once at construction.
pub(crate) struct RouteTable {
    routes: HashMap<SensorHandle, Route>,
}

impl RouteTable {
    /// Builds the table from the metadata list.
    ///
    /// Identifiers whose owning device is compiled out, or was not
    /// configured, are left out and are rejected by every operation.
    pub(crate) fn build(
        sensors: &'static [SensorInfo],
        configured: impl Fn(DeviceSlot) -> bool,
    ) -> Self {
        let mut routes = HashMap::with_capacity(sensors.len());

        for info in sensors {
            let Some(primary) = driver_for(info.handle) else {
                debug!(handle = %info.handle, name = info.name, "no driver for sensor");
                continue;
            };

            if !configured(primary) {
                continue;
            }

            if routes.contains_key(&info.handle) {
                warn!(handle = %info.handle, name = info.name, "duplicate sensor entry ignored");
                continue;
            }

            routes.insert(
                info.handle,
                Route {
                    info,
                    primary,
                    secondary: secondary_for(info.handle),
                    wakes_poller: wakes_poller(info.handle),
                },
            );
        }

        Self { routes }
    }

    pub(crate) fn get(&self, handle: SensorHandle) -> Option<&Route> {
        self.routes.get(&handle)
    }

    pub(crate) fn len(&self) -> usize {
        self.routes.len()
    }
}

/// Device owning `handle` in this build.
pub(crate) fn driver_for(handle: SensorHandle) -> Option<DeviceSlot> {
    match handle {
        SensorHandle::ACCELEROMETER
        | SensorHandle::LIGHT
        | SensorHandle::DISPLAY_ROTATE
        | SensorHandle::PROXIMITY
        | SensorHandle::FLAT_UP
        | SensorHandle::FLAT_DOWN
        | SensorHandle::STOWED
        | SensorHandle::CAMERA_ACTIVATE
        | SensorHandle::GLANCE_GESTURE => Some(DeviceSlot::Hub),

        #[cfg(feature = "gyroscope")]
        SensorHandle::GYROSCOPE
        | SensorHandle::UNCALIBRATED_GYROSCOPE
        | SensorHandle::GAME_ROTATION_VECTOR
        | SensorHandle::LINEAR_ACCELERATION
        | SensorHandle::GRAVITY => Some(DeviceSlot::Hub),

        #[cfg(feature = "accel-secondary")]
        SensorHandle::SECONDARY_ACCELEROMETER => Some(DeviceSlot::Hub),

        #[cfg(feature = "chopchop")]
        SensorHandle::CHOPCHOP => Some(DeviceSlot::Hub),

        #[cfg(feature = "lift")]
        SensorHandle::LIFT => Some(DeviceSlot::Hub),

        #[cfg(feature = "pedometer")]
        SensorHandle::STEP_COUNTER | SensorHandle::STEP_DETECTOR => Some(DeviceSlot::Hub),

        #[cfg(feature = "magnetometer")]
        SensorHandle::MAGNETIC_FIELD
        | SensorHandle::UNCALIBRATED_MAGNETIC_FIELD
        | SensorHandle::ORIENTATION => Some(DeviceSlot::Magnetometer),

        #[cfg(feature = "rear-proximity")]
        SensorHandle::REAR_PROXIMITY => Some(DeviceSlot::Proximity),

        _ => None,
    }
}

/// Orientation is computed by the magnetometer from hub accelerometer
/// samples, so the hub must be enabled and clocked alongside it.
fn secondary_for(handle: SensorHandle) -> &'static [DeviceSlot] {
    match handle {
        #[cfg(feature = "magnetometer")]
        SensorHandle::ORIENTATION => &[DeviceSlot::Hub],
        _ => &[],
    }
}

fn wakes_poller(handle: SensorHandle) -> bool {
    match handle {
        #[cfg(feature = "magnetometer")]
        SensorHandle::MAGNETIC_FIELD | SensorHandle::ORIENTATION => true,
        _ => false,
    }
}
