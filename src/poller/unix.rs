use libc::{nfds_t, pollfd};
#[cfg(feature = "magnetometer")]
use libc::{F_GETFD, F_GETFL, F_SETFD, F_SETFL, FD_CLOEXEC, O_NONBLOCK, fcntl};
use std::io;
use std::os::fd::RawFd;

/// Reads from a file descriptor into the given buffer.
///
/// Returns the number of bytes read, or a negative value on error.
/// The file descriptor **must** be non-blocking.
#[cfg(feature = "magnetometer")]
pub(crate) fn sys_read(fd: RawFd, buffer: &mut [u8]) -> isize {
    unsafe { libc::read(fd, buffer.as_mut_ptr() as *mut _, buffer.len()) }
}

/// Writes the buffer to a file descriptor.
///
/// Returns the number of bytes written, or a negative value on error.
/// The file descriptor **must** be non-blocking.
#[cfg(any(test, feature = "magnetometer"))]
pub(crate) fn sys_write(fd: RawFd, buffer: &[u8]) -> isize {
    unsafe { libc::write(fd, buffer.as_ptr() as *const _, buffer.len()) }
}

/// Closes a file descriptor.
#[cfg(any(test, feature = "magnetometer"))]
pub(crate) fn sys_close(fd: RawFd) {
    unsafe { libc::close(fd) };
}

/// Sets a file descriptor to non-blocking mode.
#[cfg(feature = "magnetometer")]
pub(crate) fn sys_set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = unsafe { fcntl(fd, F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }

    let rc = unsafe { fcntl(fd, F_SETFL, flags | O_NONBLOCK) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

/// Marks a file descriptor close-on-exec.
#[cfg(feature = "magnetometer")]
pub(crate) fn sys_set_cloexec(fd: RawFd) -> io::Result<()> {
    let flags = unsafe { fcntl(fd, F_GETFD) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }

    let rc = unsafe { fcntl(fd, F_SETFD, flags | FD_CLOEXEC) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

/// Creates an anonymous pipe and returns `(read_end, write_end)`.
#[cfg(any(test, feature = "magnetometer"))]
pub(crate) fn sys_pipe() -> io::Result<(RawFd, RawFd)> {
    let mut fds: [RawFd; 2] = [-1; 2];

    let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok((fds[0], fds[1]))
}

/// Waits on a set of descriptors using `poll(2)`.
///
/// A negative `timeout_ms` blocks indefinitely. Returns the number of
/// entries with a non-zero `revents`.
pub(crate) fn sys_poll(fds: &mut [pollfd], timeout_ms: i32) -> io::Result<usize> {
    let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as nfds_t, timeout_ms) };
    if rc < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(rc as usize)
    }
}
