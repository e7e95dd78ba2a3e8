use crate::buffer::RawIoBuffer;
use crate::ioctl_consts;
use crate::scalar::ScalarDescriptor;

/// `struct fastrpc_invoke` passed to `FASTRPC_IOCTL_INVOKE`.
#[repr(C)]
struct RawInvoke {
    handle: u32,
    sc: u32,
    args: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("kernel invocation failed: {0}")]
    Transport(i32),
}

impl WireError {
    /// Captures `errno` the way the source does: `ret = ioctl(...); if
    /// (ret) ...`. Negative `errno` propagates unchanged.
    pub fn from_errno() -> Self {
        Self::Transport(-std::io::Error::last_os_error().raw_os_error().unwrap_or(1))
    }

    pub fn raw_errno(&self) -> i32 {
        match self {
            WireError::Transport(e) => *e,
        }
    }
}

/// A kernel invocation channel. Implemented by the real FastRPC device
/// node and by in-memory stubs used in tests. Deliberately not bounded by
/// `Send`/`Sync` here — callers that need to hold a channel across an
/// await point (the listener loop) add those bounds on the trait object
/// they actually use, rather than forcing every implementor (including
/// `RefCell`-based test stubs) to carry them.
pub trait Channel {
    /// Issues one `INVOKE` ioctl with a packed scalar descriptor and a flat
    /// array of I/O buffer descriptors (inbufs followed by outbufs).
    fn invoke_raw(
        &self,
        handle: u32,
        sc: ScalarDescriptor,
        args: &mut [RawIoBuffer],
    ) -> Result<(), WireError>;
}

/// A channel backed by an open FastRPC device file descriptor.
pub struct DeviceChannel {
    fd: std::os::fd::RawFd,
}

impl DeviceChannel {
    /// Wraps an already-open channel fd (e.g. inherited via
    /// `HEXAGONRPC_FD`). Does not take ownership of the fd.
    pub fn from_raw_fd(fd: std::os::fd::RawFd) -> Self {
        Self { fd }
    }

    pub fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.fd
    }
}

impl Channel for DeviceChannel {
    fn invoke_raw(
        &self,
        handle: u32,
        sc: ScalarDescriptor,
        args: &mut [RawIoBuffer],
    ) -> Result<(), WireError> {
        let invoke = RawInvoke {
            handle,
            sc: sc.into_raw(),
            args: args.as_mut_ptr() as u64,
        };

        // SAFETY: `invoke` borrows `args` for the duration of the call and
        // the ioctl request code/struct layout match the FastRPC driver's
        // `FASTRPC_IOCTL_INVOKE` ABI.
        let ret = unsafe { libc::ioctl(self.fd, ioctl_consts::INVOKE as _, &invoke) };
        if ret < 0 {
            return Err(WireError::from_errno());
        }

        Ok(())
    }
}
