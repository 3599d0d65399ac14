use super::core::PollRouter;
use super::route::RouteTable;
use crate::device::{AccelSink, DeviceSlot, SensorDevice};
use crate::poller::WaitSet;
#[cfg(feature = "magnetometer")]
use crate::poller::WakeChannel;
use crate::sensor_list::{SENSOR_LIST, SensorInfo};

use std::io;
use std::sync::Arc;
use tracing::{debug, error};

type DeviceFactory = Box<dyn FnOnce() -> io::Result<Arc<dyn SensorDevice>>>;

#[cfg(feature = "magnetometer")]
type MagnetometerFactory =
    Box<dyn FnOnce() -> io::Result<(Arc<dyn SensorDevice>, Arc<dyn AccelSink>)>>;

/// Builder for configuring and creating a [`PollRouter`].
///
/// Each device is given as a factory which runs during
/// [`build`](Self::build). A factory that fails leaves its slot absent:
/// the router is still created, and operations routed to that slot
/// return [`RouterError::Unavailable`](crate::RouterError::Unavailable).
///
/// # Examples
///
/// ```rust,ignore
/// let router = PollRouter::builder()
///     .hub(HubSensors::open)
///     .magnetometer(AkmSensor::open)
///     .build();
/// ```
pub struct RouterBuilder {
    /// Metadata the route table is built from.
    sensors: &'static [SensorInfo],

    hub: Option<DeviceFactory>,

    #[cfg(feature = "magnetometer")]
    magnetometer: Option<MagnetometerFactory>,

    #[cfg(feature = "rear-proximity")]
    proximity: Option<DeviceFactory>,
}

impl RouterBuilder {
    /// Creates a builder with no devices and the built-in sensor list.
    pub fn new() -> Self {
        Self {
            sensors: SENSOR_LIST,
            hub: None,
            #[cfg(feature = "magnetometer")]
            magnetometer: None,
            #[cfg(feature = "rear-proximity")]
            proximity: None,
        }
    }

    /// Replaces the sensor metadata table.
    pub fn sensor_list(mut self, sensors: &'static [SensorInfo]) -> Self {
        self.sensors = sensors;
        self
    }

    /// Configures the sensor hub device.
    pub fn hub<D, F>(mut self, factory: F) -> Self
    where
        D: SensorDevice + 'static,
        F: FnOnce() -> io::Result<D> + 'static,
    {
        self.hub = Some(boxed(factory));
        self
    }

    /// Configures the magnetometer device.
    ///
    /// The magnetometer also receives the hub's accelerometer samples.
    #[cfg(feature = "magnetometer")]
    pub fn magnetometer<D, F>(mut self, factory: F) -> Self
    where
        D: SensorDevice + AccelSink + 'static,
        F: FnOnce() -> io::Result<D> + 'static,
    {
        self.magnetometer = Some(Box::new(
            move || -> io::Result<(Arc<dyn SensorDevice>, Arc<dyn AccelSink>)> {
                let device = Arc::new(factory()?);
                Ok((
                    device.clone() as Arc<dyn SensorDevice>,
                    device as Arc<dyn AccelSink>,
                ))
            },
        ));
        self
    }

    /// Configures the rear proximity device.
    #[cfg(feature = "rear-proximity")]
    pub fn proximity<D, F>(mut self, factory: F) -> Self
    where
        D: SensorDevice + 'static,
        F: FnOnce() -> io::Result<D> + 'static,
    {
        self.proximity = Some(boxed(factory));
        self
    }

    /// Creates the devices, the wake channel and the route table.
    pub fn build(self) -> PollRouter {
        let mut slots: [Option<Arc<dyn SensorDevice>>; DeviceSlot::MAX] = Default::default();
        let mut configured = [false; DeviceSlot::MAX];
        let mut wait = WaitSet::new();

        if let Some(factory) = self.hub {
            configured[DeviceSlot::Hub.index()] = true;
            install(&mut slots, &mut wait, DeviceSlot::Hub, factory());
        }

        #[cfg(feature = "magnetometer")]
        let (accel_sink, wake) = match self.magnetometer {
            Some(factory) => {
                let slot = DeviceSlot::Magnetometer;
                configured[slot.index()] = true;

                let (device, sink) = match factory() {
                    Ok((device, sink)) => (Ok(device), Some(sink)),
                    Err(e) => (Err(e), None),
                };
                install(&mut slots, &mut wait, slot, device);

                (sink, open_wake(&mut wait))
            }
            None => (None, None),
        };

        #[cfg(not(feature = "magnetometer"))]
        let accel_sink: Option<Arc<dyn AccelSink>> = None;

        #[cfg(feature = "rear-proximity")]
        if let Some(factory) = self.proximity {
            configured[DeviceSlot::Proximity.index()] = true;
            install(&mut slots, &mut wait, DeviceSlot::Proximity, factory());
        }

        let routes = RouteTable::build(self.sensors, |slot| configured[slot.index()]);

        debug!(routes = routes.len(), "poll router initialized");

        let router = PollRouter::from_parts(slots, accel_sink, routes, wait);

        #[cfg(feature = "magnetometer")]
        let router = router.with_wake(wake);

        router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn boxed<D, F>(factory: F) -> DeviceFactory
where
    D: SensorDevice + 'static,
    F: FnOnce() -> io::Result<D> + 'static,
{
    Box::new(move || -> io::Result<Arc<dyn SensorDevice>> {
        Ok(Arc::new(factory()?) as Arc<dyn SensorDevice>)
    })
}

/// Stores a created device and registers its descriptor. A failed
/// factory leaves the slot absent and its wait-set entry inert.
fn install(
    slots: &mut [Option<Arc<dyn SensorDevice>>; DeviceSlot::MAX],
    wait: &mut WaitSet,
    slot: DeviceSlot,
    device: io::Result<Arc<dyn SensorDevice>>,
) {
    match device {
        Ok(device) => {
            wait.set_device(slot, device.pollable_fd());
            slots[slot.index()] = Some(device);
        }
        Err(e) => {
            error!(%slot, "failed to create device ({e})");
        }
    }
}

/// Opens the wake channel and registers its read end. Failure is logged
/// and the router runs without one.
#[cfg(feature = "magnetometer")]
fn open_wake(wait: &mut WaitSet) -> Option<WakeChannel> {
    match WakeChannel::new() {
        Ok(channel) => {
            wait.set_wake(channel.read_fd());
            Some(channel)
        }
        Err(e) => {
            error!("error creating wake pipe ({e})");
            None
        }
    }
}
