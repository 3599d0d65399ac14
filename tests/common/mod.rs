#![allow(dead_code)]

use parking_lot::Mutex;
use sensorhub_poll::{AccelSink, SensorDevice, SensorEvent, SensorHandle};

use std::collections::VecDeque;
use std::io;
use std::os::fd::RawFd;
use std::sync::Arc;

/// Capability call observed by a mock device.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Enable(&'static str, SensorHandle, bool),
    Delay(&'static str, SensorHandle, i64),
    Flush(&'static str, SensorHandle),
    Read(&'static str, usize),
    Accel(&'static str, SensorEvent),
}

/// Call log shared by every mock in a test, so ordering across devices
/// can be asserted.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    /// Calls other than reads.
    pub fn control_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Read(..)))
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

struct Inner {
    name: &'static str,
    log: CallLog,
    read_fd: RawFd,
    write_fd: RawFd,
    queue: Mutex<VecDeque<SensorEvent>>,
    fail_enable: Mutex<Option<i32>>,
    fail_read: Mutex<Option<i32>>,
    on_read: Mutex<Option<(MockDevice, Vec<SensorEvent>)>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.read_fd);
            libc::close(self.write_fd);
        }
    }
}

/// Pipe-backed device: pushing events makes its descriptor readable.
#[derive(Clone)]
pub struct MockDevice {
    inner: Arc<Inner>,
}

impl MockDevice {
    pub fn new(name: &'static str, log: &CallLog) -> Self {
        let mut fds: [RawFd; 2] = [-1; 2];
        let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(rc, 0, "pipe failed");

        for fd in fds {
            let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
            unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
        }

        Self {
            inner: Arc::new(Inner {
                name,
                log: log.clone(),
                read_fd: fds[0],
                write_fd: fds[1],
                queue: Mutex::new(VecDeque::new()),
                fail_enable: Mutex::new(None),
                fail_read: Mutex::new(None),
                on_read: Mutex::new(None),
            }),
        }
    }

    /// Queues events and signals readiness.
    pub fn push(&self, events: &[SensorEvent]) {
        self.inner.queue.lock().extend(events.iter().copied());
        let rc = unsafe { libc::write(self.inner.write_fd, b"x".as_ptr() as *const _, 1) };
        assert_eq!(rc, 1);
    }

    /// Queues `n` events from `sensor` with increasing timestamps.
    pub fn push_samples(&self, sensor: SensorHandle, n: usize) {
        let events: Vec<_> = (0..n)
            .map(|i| SensorEvent::new(sensor, i as i64, &[i as f32]))
            .collect();
        self.push(&events);
    }

    pub fn fail_enable_with(&self, errno: i32) {
        *self.inner.fail_enable.lock() = Some(errno);
    }

    pub fn fail_read_with(&self, errno: i32) {
        *self.inner.fail_read.lock() = Some(errno);
    }

    /// On the next read, queues `events` on `other` as well, as if the
    /// read had made another device readable.
    pub fn on_read_push(&self, other: &MockDevice, events: &[SensorEvent]) {
        *self.inner.on_read.lock() = Some((other.clone(), events.to_vec()));
    }

    pub fn queued(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Factory for the router builder.
    pub fn factory(&self) -> impl FnOnce() -> io::Result<MockDevice> + 'static {
        let device = self.clone();
        move || Ok(device)
    }

    fn drain_pipe(&self) {
        let mut buf = [0u8; 64];
        loop {
            let n = unsafe { libc::read(self.inner.read_fd, buf.as_mut_ptr() as *mut _, buf.len()) };
            if n <= 0 {
                break;
            }
        }
    }
}

impl SensorDevice for MockDevice {
    fn pollable_fd(&self) -> RawFd {
        self.inner.read_fd
    }

    fn set_enable(&self, handle: SensorHandle, enabled: bool) -> io::Result<()> {
        self.inner.log.push(Call::Enable(self.inner.name, handle, enabled));
        match *self.inner.fail_enable.lock() {
            Some(errno) => Err(io::Error::from_raw_os_error(errno)),
            None => Ok(()),
        }
    }

    fn set_delay(&self, handle: SensorHandle, interval_ns: i64) -> io::Result<()> {
        self.inner.log.push(Call::Delay(self.inner.name, handle, interval_ns));
        Ok(())
    }

    fn has_pending_events(&self) -> bool {
        !self.inner.queue.lock().is_empty()
    }

    fn read_events(&self, buffer: &mut [SensorEvent]) -> io::Result<usize> {
        self.inner.log.push(Call::Read(self.inner.name, buffer.len()));
        self.drain_pipe();

        if let Some(errno) = *self.inner.fail_read.lock() {
            return Err(io::Error::from_raw_os_error(errno));
        }

        let mut queue = self.inner.queue.lock();
        let mut n = 0;
        while n < buffer.len() {
            match queue.pop_front() {
                Some(event) => {
                    buffer[n] = event;
                    n += 1;
                }
                None => break,
            }
        }
        drop(queue);

        if let Some((other, events)) = self.inner.on_read.lock().take() {
            other.push(&events);
        }

        Ok(n)
    }

    fn flush(&self, handle: SensorHandle) -> io::Result<()> {
        self.inner.log.push(Call::Flush(self.inner.name, handle));
        Ok(())
    }
}

impl AccelSink for MockDevice {
    fn set_accel_input(&self, event: &SensorEvent) {
        self.inner.log.push(Call::Accel(self.inner.name, *event));
    }
}

pub fn failing_factory() -> impl FnOnce() -> io::Result<MockDevice> + 'static {
    || Err(io::Error::from(io::ErrorKind::OutOfMemory))
}

pub fn events(n: usize) -> Vec<SensorEvent> {
    vec![SensorEvent::default(); n]
}
