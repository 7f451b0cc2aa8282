//! Strings.

/// A PDF string. The bytes are stored unescaped, `hex` only selects how the string
/// is written out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PdfString {
    data: Vec<u8>,
    hex: bool,
}

impl PdfString {
    /// Create a new literal string.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            hex: false,
        }
    }

    /// Create a new string that is written in hexadecimal form.
    pub fn new_hex(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            hex: true,
        }
    }

    /// The bytes of the string.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the string is written in hexadecimal form.
    pub fn is_hex(&self) -> bool {
        self.hex
    }
}

impl From<&str> for PdfString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
