#![cfg(all(feature = "magnetometer", feature = "rear-proximity"))]

mod common;

use common::{Call, CallLog, MockDevice, events};
use sensorhub_poll::{DeviceSlot, PollRouter, RouterError, SensorEvent, SensorHandle};

use std::thread;
use std::time::{Duration, Instant};

fn router(log: &CallLog) -> (MockDevice, MockDevice, MockDevice, PollRouter) {
    let hub = MockDevice::new("hub", log);
    let mag = MockDevice::new("mag", log);
    let prox = MockDevice::new("prox", log);

    let router = PollRouter::builder()
        .hub(hub.factory())
        .magnetometer(mag.factory())
        .proximity(prox.factory())
        .build();

    (hub, mag, prox, router)
}

fn reads(log: &CallLog) -> Vec<&'static str> {
    log.calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Read(name, _) => Some(name),
            _ => None,
        })
        .collect()
}

#[test]
fn drains_every_ready_device_in_slot_order() {
    let log = CallLog::default();
    let (hub, mag, prox, router) = router(&log);

    prox.push_samples(SensorHandle::REAR_PROXIMITY, 1);
    mag.push_samples(SensorHandle::MAGNETIC_FIELD, 2);
    hub.push_samples(SensorHandle::LIGHT, 3);

    let mut buf = events(16);
    let n = router.poll_events(&mut buf).unwrap();

    assert_eq!(n, 6);
    let sensors: Vec<_> = buf[..n].iter().map(|e| e.sensor).collect();
    assert_eq!(
        sensors,
        vec![
            SensorHandle::LIGHT,
            SensorHandle::LIGHT,
            SensorHandle::LIGHT,
            SensorHandle::MAGNETIC_FIELD,
            SensorHandle::MAGNETIC_FIELD,
            SensorHandle::REAR_PROXIMITY,
        ]
    );
    assert_eq!(reads(&log), vec!["hub", "mag", "prox"]);
}

#[test]
fn events_made_ready_while_draining_are_collected_in_the_same_call() {
    let log = CallLog::default();
    let (hub, _mag, prox, router) = router(&log);

    prox.push_samples(SensorHandle::REAR_PROXIMITY, 1);
    prox.on_read_push(
        &hub,
        &[
            SensorEvent::new(SensorHandle::LIGHT, 10, &[300.0]),
            SensorEvent::new(SensorHandle::LIGHT, 20, &[310.0]),
        ],
    );

    let mut buf = events(8);
    let n = router.poll_events(&mut buf).unwrap();

    assert_eq!(n, 3);
    let sensors: Vec<_> = buf[..n].iter().map(|e| e.sensor).collect();
    assert_eq!(
        sensors,
        vec![
            SensorHandle::REAR_PROXIMITY,
            SensorHandle::LIGHT,
            SensorHandle::LIGHT,
        ]
    );
    // The hub slot was already passed when the proximity read queued onto it.
    assert_eq!(reads(&log), vec!["prox", "hub"]);
    assert_eq!(hub.queued(), 0);
}

#[test]
fn empty_pass_ends_the_call() {
    let log = CallLog::default();
    let (hub, _mag, _prox, router) = router(&log);

    hub.push_samples(SensorHandle::LIGHT, 2);

    let started = Instant::now();
    let mut buf = events(8);
    let n = router
        .poll_events_timeout(&mut buf, Some(Duration::from_secs(5)))
        .unwrap();

    assert_eq!(n, 2);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(reads(&log), vec!["hub"]);

    // A readable device that yields nothing also ends the call.
    hub.push(&[]);

    let started = Instant::now();
    let n = router
        .poll_events_timeout(&mut buf, Some(Duration::from_secs(5)))
        .unwrap();

    assert_eq!(n, 0);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(reads(&log), vec!["hub", "hub"]);
}

#[test]
fn never_writes_more_than_capacity() {
    let log = CallLog::default();
    let (hub, _mag, prox, router) = router(&log);

    hub.push_samples(SensorHandle::LIGHT, 5);
    prox.push_samples(SensorHandle::REAR_PROXIMITY, 3);

    let mut buf = events(4);
    let n = router.poll_events(&mut buf).unwrap();

    assert_eq!(n, 4);
    assert!(buf.iter().all(|e| e.sensor == SensorHandle::LIGHT));
    assert_eq!(hub.queued(), 1);
    assert_eq!(prox.queued(), 3);

    // The hub's leftover is picked up through has_pending_events.
    let n = router.poll_events(&mut buf).unwrap();

    assert_eq!(n, 4);
    assert_eq!(buf[0].sensor, SensorHandle::LIGHT);
    assert!(buf[1..].iter().all(|e| e.sensor == SensorHandle::REAR_PROXIMITY));
    assert_eq!(hub.queued(), 0);
    assert_eq!(prox.queued(), 0);
}

#[test]
fn capacity_shrinks_as_devices_are_drained() {
    let log = CallLog::default();
    let (hub, mag, _prox, router) = router(&log);

    hub.push_samples(SensorHandle::LIGHT, 2);
    mag.push_samples(SensorHandle::MAGNETIC_FIELD, 10);

    let mut buf = events(6);
    let n = router.poll_events(&mut buf).unwrap();

    assert_eq!(n, 6);
    let capacities: Vec<_> = log
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Read(_, capacity) => Some(capacity),
            _ => None,
        })
        .collect();
    assert_eq!(capacities, vec![6, 4]);
    assert_eq!(mag.queued(), 6);
}

#[test]
fn read_failure_aborts_the_call() {
    let log = CallLog::default();
    let (hub, mag, prox, router) = router(&log);

    hub.push_samples(SensorHandle::LIGHT, 2);
    mag.push_samples(SensorHandle::MAGNETIC_FIELD, 1);
    mag.fail_read_with(libc::ENODEV);
    prox.push_samples(SensorHandle::REAR_PROXIMITY, 1);

    let mut buf = events(8);
    let err = router.poll_events(&mut buf).unwrap_err();

    assert!(matches!(
        err,
        RouterError::Device {
            slot: DeviceSlot::Magnetometer,
            ..
        }
    ));
    assert_eq!(err.errno(), -libc::ENODEV);
    assert_eq!(reads(&log), vec!["hub", "mag"]);
    assert!(
        buf.iter()
            .all(|e| e.sensor != SensorHandle::REAR_PROXIMITY)
    );
    assert_eq!(prox.queued(), 1);
}

#[test]
fn latest_hub_accelerometer_sample_feeds_magnetometer() {
    let log = CallLog::default();
    let (hub, _mag, _prox, router) = router(&log);

    let first = SensorEvent::new(SensorHandle::ACCELEROMETER, 100, &[0.0, 0.0, 9.8]);
    let latest = SensorEvent::new(SensorHandle::ACCELEROMETER, 200, &[0.1, 0.2, 9.7]);
    hub.push(&[
        first,
        SensorEvent::new(SensorHandle::LIGHT, 150, &[300.0]),
        latest,
        SensorEvent::new(SensorHandle::STOWED, 250, &[0.0]),
    ]);

    let mut buf = events(8);
    let n = router.poll_events(&mut buf).unwrap();

    assert_eq!(n, 4);
    let fed: Vec<_> = log
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Accel(..)))
        .collect();
    assert_eq!(fed, vec![Call::Accel("mag", latest)]);
}

#[test]
fn magnetometer_samples_are_not_correlated() {
    let log = CallLog::default();
    let (hub, mag, _prox, router) = router(&log);

    hub.push_samples(SensorHandle::LIGHT, 1);
    mag.push(&[SensorEvent::new(SensorHandle::ACCELEROMETER, 1, &[1.0])]);

    let mut buf = events(8);
    router.poll_events(&mut buf).unwrap();

    assert!(!log.calls().iter().any(|c| matches!(c, Call::Accel(..))));
}

#[test]
fn wake_signal_alone_returns_zero() {
    let log = CallLog::default();
    let (_hub, _mag, _prox, router) = router(&log);

    router.activate(SensorHandle::MAGNETIC_FIELD, true).unwrap();

    let started = Instant::now();
    let mut buf = events(8);
    let n = router
        .poll_events_timeout(&mut buf, Some(Duration::from_secs(5)))
        .unwrap();

    assert_eq!(n, 0);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(reads(&log).is_empty());
}

#[test]
fn enabling_other_sensors_does_not_wake() {
    let log = CallLog::default();
    let (_hub, _mag, _prox, router) = router(&log);

    router.activate(SensorHandle::ACCELEROMETER, true).unwrap();
    router
        .activate(SensorHandle::UNCALIBRATED_MAGNETIC_FIELD, true)
        .unwrap();
    router.activate(SensorHandle::MAGNETIC_FIELD, false).unwrap();
    router.set_delay(SensorHandle::ORIENTATION, 1_000_000).unwrap();

    let started = Instant::now();
    let mut buf = events(8);
    let n = router
        .poll_events_timeout(&mut buf, Some(Duration::from_millis(100)))
        .unwrap();

    assert_eq!(n, 0);
    assert!(started.elapsed() >= Duration::from_millis(90));
}

#[test]
fn control_call_interrupts_blocked_poll() {
    let log = CallLog::default();
    let (_hub, _mag, _prox, router) = router(&log);

    thread::scope(|s| {
        let poller = s.spawn(|| {
            let mut buf = events(8);
            router.poll_events(&mut buf)
        });

        thread::sleep(Duration::from_millis(50));
        router.activate(SensorHandle::ORIENTATION, true).unwrap();

        let n = poller.join().unwrap().unwrap();
        assert_eq!(n, 0);
    });
}

#[test]
fn events_arriving_after_wake_are_delivered() {
    let log = CallLog::default();
    let (hub, _mag, _prox, router) = router(&log);

    router.wake();
    let mut buf = events(8);
    assert_eq!(router.poll_events(&mut buf).unwrap(), 0);

    hub.push_samples(SensorHandle::ACCELEROMETER, 2);
    assert_eq!(router.poll_events(&mut buf).unwrap(), 2);
}
