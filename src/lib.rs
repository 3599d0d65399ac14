//! # sensorhub-poll
//!
//! Multiplexes the sensor hub, the optional magnetometer and the optional
//! rear proximity sensor into a single ordered event stream for the host
//! sensor service.
//!
//! The crate treats each device as an opaque pollable event source with a
//! small control interface ([`SensorDevice`]). The [`PollRouter`]:
//!
//! - routes `activate`, `set_delay`, `batch` and `flush` to the device that
//!   owns a logical sensor identifier,
//! - blocks on every device descriptor at once and drains the ready ones
//!   into the caller's buffer,
//! - forwards the hub's latest accelerometer sample to the magnetometer,
//! - lets a control call interrupt an indefinite wait through an internal
//!   wake channel.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sensorhub_poll::{PollRouter, SensorEvent, SensorHandle};
//!
//! let router = PollRouter::builder()
//!     .hub(HubSensors::open)
//!     .magnetometer(AkmSensor::open)
//!     .build();
//!
//! router.activate(SensorHandle::ACCELEROMETER, true)?;
//!
//! let mut events = [SensorEvent::default(); 64];
//! loop {
//!     let n = router.poll_events(&mut events)?;
//!     for event in &events[..n] {
//!         // deliver event
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - `magnetometer`: magnetometer slot, orientation and the wake channel
//! - `rear-proximity`: rear proximity slot
//! - `gyroscope`, `accel-secondary`, `chopchop`, `lift`, `pedometer`: hub
//!   sensors compiled into the route table

#[cfg(not(unix))]
compile_error!("sensorhub-poll requires a unix target");

mod device;
mod error;
mod event;
mod poller;
mod router;

pub mod sensor_list;

pub use device::{AccelSink, DeviceSlot, SensorDevice};
pub use error::{Result, RouterError};
pub use event::{SensorEvent, SensorHandle};
pub use router::{PollRouter, RouterBuilder};
pub use sensor_list::{ReportingMode, SensorInfo};
