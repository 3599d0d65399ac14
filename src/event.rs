//! Sensor identifiers and decoded events.

use std::fmt;

/// Logical sensor identifier as seen by the host sensor service.
///
/// Identifiers are small positive integers defined outside this crate.
/// The named constants cover every sensor the hub stack can expose; which
/// of them are routable depends on the enabled features and on the
/// devices configured at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SensorHandle(pub i32);

impl SensorHandle {
    pub const ACCELEROMETER: Self = Self(0);
    pub const GYROSCOPE: Self = Self(1);
    pub const PROXIMITY: Self = Self(2);
    pub const MAGNETIC_FIELD: Self = Self(3);
    pub const UNCALIBRATED_MAGNETIC_FIELD: Self = Self(4);
    pub const ORIENTATION: Self = Self(5);
    pub const LIGHT: Self = Self(6);
    pub const DISPLAY_ROTATE: Self = Self(7);
    pub const FLAT_UP: Self = Self(8);
    pub const FLAT_DOWN: Self = Self(9);
    pub const STOWED: Self = Self(10);
    pub const CAMERA_ACTIVATE: Self = Self(11);
    pub const UNCALIBRATED_GYROSCOPE: Self = Self(12);
    pub const GAME_ROTATION_VECTOR: Self = Self(13);
    pub const LINEAR_ACCELERATION: Self = Self(14);
    pub const GRAVITY: Self = Self(15);
    pub const SECONDARY_ACCELEROMETER: Self = Self(16);
    pub const CHOPCHOP: Self = Self(17);
    pub const LIFT: Self = Self(18);
    pub const STEP_COUNTER: Self = Self(19);
    pub const STEP_DETECTOR: Self = Self(20);
    pub const GLANCE_GESTURE: Self = Self(21);
    pub const REAR_PROXIMITY: Self = Self(22);
}

impl fmt::Display for SensorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for SensorHandle {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

/// One decoded sample produced by a device.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorEvent {
    /// Sensor that produced the sample.
    pub sensor: SensorHandle,

    /// Capture time in nanoseconds.
    pub timestamp: i64,

    /// Payload; layout depends on the sensor.
    pub data: [f32; 16],
}

impl Default for SensorHandle {
    fn default() -> Self {
        Self(-1)
    }
}

impl SensorEvent {
    /// Builds an event from its leading payload values; extra values are dropped.
    pub fn new(sensor: SensorHandle, timestamp: i64, values: &[f32]) -> Self {
        let mut data = [0.0; 16];
        let n = values.len().min(data.len());
        data[..n].copy_from_slice(&values[..n]);

        Self {
            sensor,
            timestamp,
            data,
        }
    }
}
