//! Tunable constants the loop needs. The 256-byte primary-input bound is
//! a literal in the source (`char inbufs[256]` in `return_for_next_invoke`);
//! making it a field here rather than a hardcoded constant keeps that
//! bound configurable instead of baked in (see DESIGN.md).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum bytes `next2` may report for the combined
    /// inbufs blob before the listener refuses to decode it.
    pub max_listener_inbuf_len: u32,
    /// Handle `apps_remotectl` is assigned at startup registration.
    pub remotectl_handle: u32,
    /// Peer-side handle `adsp_listener`'s `init2`/`next2` are invoked
    /// through.
    pub adsp_listener_handle: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_listener_inbuf_len: 256,
            remotectl_handle: 0,
            adsp_listener_handle: crate::proto::ADSP_LISTENER_HANDLE,
        }
    }
}
