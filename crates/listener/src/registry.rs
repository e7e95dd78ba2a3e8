//! The interface registry and dispatch table. Slot 0 is reserved for
//! `apps_remotectl`; every other slot is whatever `hexagonrpcd` registers
//! at startup standing in for collaborators like `apps_std`/`apps_mem`
//! (their method *bodies* live elsewhere, only the registration/dispatch
//! contract is here).

use hexagonrpc_idl::MethodDescriptor;
use hexagonrpc_marshal::HrpcError;

/// One exposed method: its shape, and the function that runs it.
///
/// `handler` receives the decoded buffers in wire order (`decoded[0]` is
/// the primary-input blob, the rest are the real inbufs) and a mutable
/// slice of preallocated, zeroed output buffers matching
/// [`crate::geometry::allocate_outbufs`]'s layout; it writes its results
/// in place and returns the AEE-style result code.
pub struct ProcSlot {
    pub descriptor: MethodDescriptor,
    pub handler: Box<dyn Fn(&[Vec<u8>], &mut [Vec<u8>]) -> u32 + Send + Sync>,
}

/// One registered remote interface: a name (for `apps_remotectl.open`
/// lookups) and its method table, indexed by method id.
pub struct Interface {
    pub name: String,
    procs: Vec<ProcSlot>,
}

impl Interface {
    pub fn new(name: impl Into<String>, procs: Vec<ProcSlot>) -> Self {
        Self {
            name: name.into(),
            procs,
        }
    }

    pub fn proc(&self, method: u32) -> Option<&ProcSlot> {
        self.procs.get(method as usize)
    }
}

/// The handle directory. Handles are assigned by registration order;
/// slot 0 is always `apps_remotectl` by convention, not enforced by this
/// type itself.
#[derive(Default)]
pub struct InterfaceRegistry {
    interfaces: Vec<Interface>,
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an interface and returns the handle it was assigned.
    pub fn register(&mut self, iface: Interface) -> u32 {
        self.interfaces.push(iface);
        (self.interfaces.len() - 1) as u32
    }

    pub fn lookup(&self, handle: u32) -> Option<&Interface> {
        self.interfaces.get(handle as usize)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<u32> {
        self.interfaces
            .iter()
            .position(|i| i.name == name)
            .map(|i| i as u32)
    }

    /// There is no reclamation: handles stay valid and assigned for the
    /// registry's lifetime. This exists so callers have an explicit no-op
    /// to call rather than silently doing nothing.
    pub fn close(&self, _handle: u32) {}
}

/// Resolves the effective method id for a call against `sc`: the
/// raw scalar-descriptor method slot unless it's the extended marker, in
/// which case the id is the first word of the primary-input blob.
pub fn resolve_method(
    sc: hexagonrpc_wire::ScalarDescriptor,
    prim_in: &[u8],
) -> Result<u32, HrpcError> {
    if sc.is_extended() {
        prim_in
            .get(0..4)
            .map(|b| u32::from_le_bytes(b.try_into().unwrap()))
            .ok_or(HrpcError::Unsupported)
    } else {
        Ok(sc.method())
    }
}
