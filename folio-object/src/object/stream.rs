//! Streams.

use std::fmt::{Debug, Formatter};

/// The byte payload attached to an indirect object.
///
/// The data is kept exactly as it should end up in the file, i.e. already encoded with
/// whatever filters the owning dictionary lists.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Stream {
    data: Vec<u8>,
}

impl Stream {
    /// Create a new stream with the given data.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// The data of the stream.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replace the data of the stream.
    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) {
        self.data = data.into();
    }

    /// Append data to the end of the stream.
    pub fn append(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data);
    }

    /// The length of the data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the stream holds no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Debug for Stream {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stream (len: {:?})", self.data.len())
    }
}
