//! Static sensor metadata.
//!
//! The table lists every sensor compiled into this build together with
//! its reporting-mode flags. The router builds its route table from it
//! and consults the flags when a flush is requested.

use crate::event::SensorHandle;

/// The sensor wakes the application processor when it reports.
pub const SENSOR_FLAG_WAKE_UP: u32 = 0x1;

/// Bits of [`SensorInfo::flags`] holding the reporting mode.
pub const REPORTING_MODE_MASK: u32 = 0xE;

pub const SENSOR_FLAG_CONTINUOUS_MODE: u32 = 0x0;
pub const SENSOR_FLAG_ON_CHANGE_MODE: u32 = 0x2;
pub const SENSOR_FLAG_ONE_SHOT_MODE: u32 = 0x4;
pub const SENSOR_FLAG_SPECIAL_REPORTING_MODE: u32 = 0x6;

/// How a sensor delivers samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportingMode {
    Continuous,
    OnChange,
    OneShot,
    Special,
}

/// Metadata for one logical sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorInfo {
    pub handle: SensorHandle,
    pub name: &'static str,
    pub flags: u32,
}

impl SensorInfo {
    pub const fn new(handle: SensorHandle, name: &'static str, flags: u32) -> Self {
        Self {
            handle,
            name,
            flags,
        }
    }

    pub fn reporting_mode(&self) -> ReportingMode {
        match self.flags & REPORTING_MODE_MASK {
            SENSOR_FLAG_ON_CHANGE_MODE => ReportingMode::OnChange,
            SENSOR_FLAG_ONE_SHOT_MODE => ReportingMode::OneShot,
            SENSOR_FLAG_SPECIAL_REPORTING_MODE => ReportingMode::Special,
            _ => ReportingMode::Continuous,
        }
    }

    pub fn is_one_shot(&self) -> bool {
        self.reporting_mode() == ReportingMode::OneShot
    }

    pub fn is_wake_up(&self) -> bool {
        self.flags & SENSOR_FLAG_WAKE_UP != 0
    }
}

/// Sensors available in this build.
pub static SENSOR_LIST: &[SensorInfo] = &[
    SensorInfo::new(
        SensorHandle::ACCELEROMETER,
        "Accelerometer",
        SENSOR_FLAG_CONTINUOUS_MODE,
    ),
    #[cfg(feature = "gyroscope")]
    SensorInfo::new(
        SensorHandle::GYROSCOPE,
        "Gyroscope",
        SENSOR_FLAG_CONTINUOUS_MODE,
    ),
    #[cfg(feature = "gyroscope")]
    SensorInfo::new(
        SensorHandle::UNCALIBRATED_GYROSCOPE,
        "Gyroscope Uncalibrated",
        SENSOR_FLAG_CONTINUOUS_MODE,
    ),
    #[cfg(feature = "gyroscope")]
    SensorInfo::new(
        SensorHandle::GAME_ROTATION_VECTOR,
        "Game Rotation Vector",
        SENSOR_FLAG_CONTINUOUS_MODE,
    ),
    #[cfg(feature = "gyroscope")]
    SensorInfo::new(
        SensorHandle::LINEAR_ACCELERATION,
        "Linear Acceleration",
        SENSOR_FLAG_CONTINUOUS_MODE,
    ),
    #[cfg(feature = "gyroscope")]
    SensorInfo::new(SensorHandle::GRAVITY, "Gravity", SENSOR_FLAG_CONTINUOUS_MODE),
    SensorInfo::new(SensorHandle::LIGHT, "Light", SENSOR_FLAG_ON_CHANGE_MODE),
    SensorInfo::new(
        SensorHandle::DISPLAY_ROTATE,
        "Display Rotation",
        SENSOR_FLAG_ON_CHANGE_MODE,
    ),
    SensorInfo::new(
        SensorHandle::PROXIMITY,
        "Proximity",
        SENSOR_FLAG_ON_CHANGE_MODE | SENSOR_FLAG_WAKE_UP,
    ),
    SensorInfo::new(
        SensorHandle::FLAT_UP,
        "Flat Up",
        SENSOR_FLAG_ON_CHANGE_MODE | SENSOR_FLAG_WAKE_UP,
    ),
    SensorInfo::new(
        SensorHandle::FLAT_DOWN,
        "Flat Down",
        SENSOR_FLAG_ON_CHANGE_MODE | SENSOR_FLAG_WAKE_UP,
    ),
    SensorInfo::new(
        SensorHandle::STOWED,
        "Stowed",
        SENSOR_FLAG_ON_CHANGE_MODE | SENSOR_FLAG_WAKE_UP,
    ),
    SensorInfo::new(
        SensorHandle::CAMERA_ACTIVATE,
        "Camera Activation",
        SENSOR_FLAG_SPECIAL_REPORTING_MODE | SENSOR_FLAG_WAKE_UP,
    ),
    #[cfg(feature = "accel-secondary")]
    SensorInfo::new(
        SensorHandle::SECONDARY_ACCELEROMETER,
        "Secondary Accelerometer",
        SENSOR_FLAG_CONTINUOUS_MODE,
    ),
    #[cfg(feature = "chopchop")]
    SensorInfo::new(
        SensorHandle::CHOPCHOP,
        "Chop Chop Gesture",
        SENSOR_FLAG_ONE_SHOT_MODE | SENSOR_FLAG_WAKE_UP,
    ),
    #[cfg(feature = "lift")]
    SensorInfo::new(
        SensorHandle::LIFT,
        "Lift Gesture",
        SENSOR_FLAG_ONE_SHOT_MODE | SENSOR_FLAG_WAKE_UP,
    ),
    #[cfg(feature = "pedometer")]
    SensorInfo::new(
        SensorHandle::STEP_COUNTER,
        "Step Counter",
        SENSOR_FLAG_ON_CHANGE_MODE,
    ),
    #[cfg(feature = "pedometer")]
    SensorInfo::new(
        SensorHandle::STEP_DETECTOR,
        "Step Detector",
        SENSOR_FLAG_SPECIAL_REPORTING_MODE,
    ),
    SensorInfo::new(
        SensorHandle::GLANCE_GESTURE,
        "Glance Gesture",
        SENSOR_FLAG_ONE_SHOT_MODE | SENSOR_FLAG_WAKE_UP,
    ),
    #[cfg(feature = "magnetometer")]
    SensorInfo::new(
        SensorHandle::MAGNETIC_FIELD,
        "Magnetic Field",
        SENSOR_FLAG_CONTINUOUS_MODE,
    ),
    #[cfg(feature = "magnetometer")]
    SensorInfo::new(
        SensorHandle::UNCALIBRATED_MAGNETIC_FIELD,
        "Magnetic Field Uncalibrated",
        SENSOR_FLAG_CONTINUOUS_MODE,
    ),
    #[cfg(feature = "magnetometer")]
    SensorInfo::new(
        SensorHandle::ORIENTATION,
        "Orientation",
        SENSOR_FLAG_CONTINUOUS_MODE,
    ),
    #[cfg(feature = "rear-proximity")]
    SensorInfo::new(
        SensorHandle::REAR_PROXIMITY,
        "Rear Proximity",
        SENSOR_FLAG_ON_CHANGE_MODE | SENSOR_FLAG_WAKE_UP,
    ),
];
