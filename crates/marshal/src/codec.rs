//! The wire codec for the listener's `next2` inbufs/outbufs. Each buffer
//! is length-prefixed the same way `shared::protocol::send_data`/
//! `receive_data` frame a vsock message —
//! `[u32 len][payload]`, repeated — except the listener assembles whole
//! frames from a kernel-filled buffer instead of reading a stream, so
//! decoding is a state machine fed in chunks rather than an async read.

/// Flattens `entries` into one buffer: `[u32 len][payload]` per entry, in
/// order.
pub fn encode_outbufs(entries: &[&[u8]]) -> Vec<u8> {
    let total: usize = entries.iter().map(|e| e.len() + 4).sum();
    let mut out = Vec::with_capacity(total);
    for entry in entries {
        out.extend_from_slice(&(entry.len() as u32).to_le_bytes());
        out.extend_from_slice(entry);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectLength,
    ExpectPayload(usize),
}

/// Decodes a sequence of length-prefixed buffers, possibly delivered across
/// more than one `feed` call. One instance decodes one primary-input blob;
/// callers create a fresh decoder per listener iteration.
#[derive(Debug)]
pub struct InbufDecoder {
    state: State,
    scratch: Vec<u8>,
    entries: Vec<Vec<u8>>,
}

impl Default for InbufDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl InbufDecoder {
    pub fn new() -> Self {
        Self {
            state: State::ExpectLength,
            scratch: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Feeds more bytes in. Consumes as many complete `[len][payload]`
    /// frames as the buffered input allows; leftover bytes (a partial
    /// length word or a partial payload) stay buffered for the next call.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.scratch.extend_from_slice(bytes);

        loop {
            match self.state {
                State::ExpectLength => {
                    if self.scratch.len() < 4 {
                        break;
                    }
                    let len = u32::from_le_bytes(self.scratch[0..4].try_into().unwrap()) as usize;
                    self.scratch.drain(0..4);
                    self.state = State::ExpectPayload(len);
                }
                State::ExpectPayload(len) => {
                    if self.scratch.len() < len {
                        break;
                    }
                    let payload = self.scratch.drain(0..len).collect();
                    self.entries.push(payload);
                    self.state = State::ExpectLength;
                }
            }
        }
    }

    /// True once every frame implied by the bytes fed so far has been
    /// fully consumed and the decoder is waiting on a fresh length word
    /// with nothing partially buffered.
    pub fn is_complete(&self) -> bool {
        self.state == State::ExpectLength && self.scratch.is_empty()
    }

    pub fn finish(self) -> Vec<Vec<u8>> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_several_entries() {
        let a = b"hello".as_slice();
        let b = b"".as_slice();
        let c = b"world!!".as_slice();
        let encoded = encode_outbufs(&[a, b, c]);

        let mut decoder = InbufDecoder::new();
        decoder.feed(&encoded);
        assert!(decoder.is_complete());
        assert_eq!(decoder.finish(), vec![a.to_vec(), b.to_vec(), c.to_vec()]);
    }

    #[test]
    fn handles_chunked_feed() {
        let encoded = encode_outbufs(&[b"abcdef"]);
        let mut decoder = InbufDecoder::new();
        for chunk in encoded.chunks(3) {
            decoder.feed(chunk);
        }
        assert!(decoder.is_complete());
        assert_eq!(decoder.finish(), vec![b"abcdef".to_vec()]);
    }

    #[test]
    fn incomplete_input_is_not_complete() {
        let encoded = encode_outbufs(&[b"abcdef"]);
        let mut decoder = InbufDecoder::new();
        decoder.feed(&encoded[..encoded.len() - 1]);
        assert!(!decoder.is_complete());
    }
}
