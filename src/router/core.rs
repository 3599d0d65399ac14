use super::builder::RouterBuilder;
use super::route::{Route, RouteTable};
use crate::device::{AccelSink, DeviceSlot, SensorDevice};
use crate::error::{Result, RouterError};
use crate::event::{SensorEvent, SensorHandle};
use crate::poller::WaitSet;
#[cfg(feature = "magnetometer")]
use crate::poller::WakeChannel;

use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, error, trace, warn};

static GLOBAL: OnceLock<PollRouter> = OnceLock::new();

/// Multiplexes the sensor devices into a single event stream.
///
/// The router owns one slot per physical device, a route table mapping
/// logical sensor identifiers to slots, and a wait set covering every
/// device descriptor plus the wake channel.
///
/// Control operations ([`activate`](Self::activate),
/// [`set_delay`](Self::set_delay), [`batch`](Self::batch),
/// [`flush`](Self::flush)) may be called from any thread, including
/// while another thread is blocked in [`poll_events`](Self::poll_events).
/// Slots and routes never change after construction; per-device state is
/// synchronized by the drivers themselves.
pub struct PollRouter {
    /// Device drivers indexed by [`DeviceSlot::index`]. `None` when the
    /// slot was not configured or its factory failed.
    slots: [Option<Arc<dyn SensorDevice>>; DeviceSlot::MAX],

    /// Magnetometer input fed from hub accelerometer samples.
    accel_sink: Option<Arc<dyn AccelSink>>,

    routes: RouteTable,

    /// Present only when the magnetometer is configured.
    #[cfg(feature = "magnetometer")]
    wake: Option<WakeChannel>,

    /// Locked by the polling thread for the whole wait/drain cycle.
    wait: Mutex<WaitSet>,
}

impl PollRouter {
    /// Returns a builder used to configure the devices.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub(crate) fn from_parts(
        slots: [Option<Arc<dyn SensorDevice>>; DeviceSlot::MAX],
        accel_sink: Option<Arc<dyn AccelSink>>,
        routes: RouteTable,
        wait: WaitSet,
    ) -> Self {
        Self {
            slots,
            accel_sink,
            routes,
            #[cfg(feature = "magnetometer")]
            wake: None,
            wait: Mutex::new(wait),
        }
    }

    #[cfg(feature = "magnetometer")]
    pub(crate) fn with_wake(mut self, wake: Option<WakeChannel>) -> Self {
        self.wake = wake;
        self
    }

    /// Returns the process-wide router, constructing it with `init` on
    /// first use.
    ///
    /// Hosts that can own the router directly should build it with
    /// [`PollRouter::builder`] instead.
    pub fn global_or_init(init: impl FnOnce() -> PollRouter) -> &'static PollRouter {
        GLOBAL.get_or_init(init)
    }

    /// Returns the process-wide router if it was initialized.
    pub fn global() -> Option<&'static PollRouter> {
        GLOBAL.get()
    }

    /// Whether the device behind `slot` is present.
    pub fn is_available(&self, slot: DeviceSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    /// Enables or disables a sensor.
    ///
    /// Identifiers with secondary targets are forwarded to each of them
    /// after the primary; the first failure is returned. Successfully
    /// enabling a sensor that changes what the poller must watch signals
    /// the wake channel.
    pub fn activate(&self, handle: impl Into<SensorHandle>, enabled: bool) -> Result<()> {
        let handle = handle.into();
        let route = self.route(handle, "activate")?;

        for slot in route.targets() {
            self.device(slot)?
                .set_enable(handle, enabled)
                .map_err(|e| RouterError::device(slot, e))?;
        }

        if enabled && route.wakes_poller {
            self.wake();
        }

        debug!(%handle, enabled, slot = %route.primary, "activate");
        Ok(())
    }

    /// Sets the sampling interval of a sensor, in nanoseconds.
    pub fn set_delay(&self, handle: impl Into<SensorHandle>, interval_ns: i64) -> Result<()> {
        let handle = handle.into();
        let route = self.route(handle, "setDelay")?;

        for slot in route.targets() {
            self.device(slot)?
                .set_delay(handle, interval_ns)
                .map_err(|e| RouterError::device(slot, e))?;
        }

        Ok(())
    }

    /// Configures batching for a sensor.
    ///
    /// The devices do not support batching, so `flags` and the report
    /// latency are ignored and only the sampling interval is applied.
    pub fn batch(
        &self,
        handle: impl Into<SensorHandle>,
        flags: i32,
        interval_ns: i64,
        max_report_latency_ns: i64,
    ) -> Result<()> {
        let _ = (flags, max_report_latency_ns);
        self.set_delay(handle, interval_ns)
    }

    /// Requests a flush-complete event for a sensor.
    ///
    /// One-shot sensors reject flush. Every other sensor is flushed
    /// through the hub, which emits the completion marker.
    pub fn flush(&self, handle: impl Into<SensorHandle>) -> Result<()> {
        let handle = handle.into();
        let route = self.route(handle, "flush")?;

        if route.info.is_one_shot() {
            return Err(RouterError::InvalidHandle(handle));
        }

        self.device(DeviceSlot::Hub)?
            .flush(handle)
            .map_err(|e| RouterError::device(DeviceSlot::Hub, e))
    }

    /// Interrupts a blocked [`poll_events`](Self::poll_events).
    ///
    /// Does nothing when the router has no wake channel.
    #[cfg(feature = "magnetometer")]
    pub fn wake(&self) {
        if let Some(wake) = &self.wake {
            let _ = wake.signal();
        }
    }

    /// Interrupts a blocked [`poll_events`](Self::poll_events).
    ///
    /// Builds without a magnetometer have no wake channel; this does nothing.
    #[cfg(not(feature = "magnetometer"))]
    pub fn wake(&self) {}

    /// Blocks until at least one device has data, then drains every
    /// device that is ready into `buffer`.
    ///
    /// Returns the number of events written. Zero means the wait was
    /// interrupted by the wake channel with nothing to report.
    pub fn poll_events(&self, buffer: &mut [SensorEvent]) -> Result<usize> {
        self.poll_events_timeout(buffer, None)
    }

    /// Same as [`poll_events`](Self::poll_events) with a bounded first
    /// wait. `None` waits indefinitely.
    ///
    /// Devices are drained in slot order. A device that keeps filling
    /// the buffer can starve later slots within one call; they are
    /// served on the next call. When a device read fails, the error is
    /// returned and events already copied by this call are discarded.
    pub fn poll_events_timeout(
        &self,
        buffer: &mut [SensorEvent],
        timeout: Option<Duration>,
    ) -> Result<usize> {
        let mut wait = self.wait.lock();
        let mut timeout = timeout;
        let mut total = 0;

        loop {
            wait.wait(timeout).map_err(|e| {
                error!("poll() failed ({e})");
                RouterError::Wait(e)
            })?;

            let drained = self.drain(&mut wait, &mut buffer[total..])?;
            total += drained;

            #[cfg(feature = "magnetometer")]
            if wait.wake_ready() {
                if let Some(wake) = &self.wake {
                    wake.drain_one();
                }
                wait.clear_wake();
            }

            trace!(drained, total, "drain pass");

            if drained == 0 || total == buffer.len() {
                break;
            }

            // Collect anything that became ready while draining.
            timeout = Some(Duration::ZERO);
        }

        Ok(total)
    }

    /// One pass over every slot in fixed order.
    fn drain(&self, wait: &mut WaitSet, buffer: &mut [SensorEvent]) -> Result<usize> {
        let mut count = 0;

        for &slot in DeviceSlot::ALL {
            if count == buffer.len() {
                break;
            }

            let Some(device) = self.slots[slot.index()].as_deref() else {
                continue;
            };

            if !wait.is_ready(slot) && !device.has_pending_events() {
                continue;
            }

            let out = &mut buffer[count..];
            let n = device.read_events(out).map_err(|e| {
                error!(%slot, "readEvents failed ({e})");
                RouterError::device(slot, e)
            })?;

            let n = if n > out.len() {
                warn!(%slot, n, capacity = out.len(), "device reported more events than requested");
                out.len()
            } else {
                n
            };

            wait.clear(slot);

            if slot == DeviceSlot::Hub && n > 0 {
                self.correlate(&out[..n]);
            }

            count += n;
        }

        Ok(count)
    }

    /// Forwards the newest accelerometer sample of a hub batch to the
    /// magnetometer.
    fn correlate(&self, hub_events: &[SensorEvent]) {
        let Some(sink) = &self.accel_sink else {
            return;
        };

        if let Some(accel) = hub_events
            .iter()
            .rev()
            .find(|e| e.sensor == SensorHandle::ACCELEROMETER)
        {
            sink.set_accel_input(accel);
        }
    }

    fn route(&self, handle: SensorHandle, op: &'static str) -> Result<&Route> {
        self.routes.get(handle).ok_or_else(|| {
            warn!(%handle, op, "bad handle");
            RouterError::InvalidHandle(handle)
        })
    }

    fn device(&self, slot: DeviceSlot) -> Result<&dyn SensorDevice> {
        self.slots[slot.index()]
            .as_deref()
            .ok_or(RouterError::Unavailable(slot))
    }
}

impl Route {
    /// Primary slot followed by the secondary ones.
    fn targets(&self) -> impl Iterator<Item = DeviceSlot> + '_ {
        std::iter::once(self.primary).chain(self.secondary.iter().copied())
    }
}
