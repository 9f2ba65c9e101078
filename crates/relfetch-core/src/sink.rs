//! Result sink: where a successfully fetched body goes.
//!
//! The fetch loop calls `observe` at most once, and only with the body of a
//! response that was classified as a success. Implementations must not
//! panic; a panic unwinds straight out of the fetch and is never retried.

/// Caller-supplied receiver for the fetched body.
pub trait ResultSink {
    fn observe(&mut self, body: Vec<u8>);
}

impl<F> ResultSink for F
where
    F: FnMut(Vec<u8>),
{
    fn observe(&mut self, body: Vec<u8>) {
        self(body)
    }
}

/// Sink that keeps the body in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectSink {
    body: Option<Vec<u8>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body delivered by the fetch, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn into_body(self) -> Option<Vec<u8>> {
        self.body
    }
}

impl ResultSink for CollectSink {
    fn observe(&mut self, body: Vec<u8>) {
        self.body = Some(body);
    }
}
