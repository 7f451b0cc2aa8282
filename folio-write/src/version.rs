//! PDF versions.

use folio_object::Error;

/// A PDF version, as written into the header of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PdfVersion {
    /// PDF 1.0.
    Pdf10,
    /// PDF 1.1.
    Pdf11,
    /// PDF 1.2.
    Pdf12,
    /// PDF 1.3.
    Pdf13,
    /// PDF 1.4.
    Pdf14,
    /// PDF 1.5.
    Pdf15,
    /// PDF 1.6.
    Pdf16,
    /// PDF 1.7.
    #[default]
    Pdf17,
    /// PDF 2.0.
    Pdf20,
}

impl PdfVersion {
    /// Create a version from its major and minor number.
    ///
    /// Fails with `ValueOutOfRange` for versions that don't exist.
    pub fn new(major: u8, minor: u8) -> Result<Self, Error> {
        Ok(match (major, minor) {
            (1, 0) => Self::Pdf10,
            (1, 1) => Self::Pdf11,
            (1, 2) => Self::Pdf12,
            (1, 3) => Self::Pdf13,
            (1, 4) => Self::Pdf14,
            (1, 5) => Self::Pdf15,
            (1, 6) => Self::Pdf16,
            (1, 7) => Self::Pdf17,
            (2, 0) => Self::Pdf20,
            _ => return Err(Error::ValueOutOfRange),
        })
    }

    /// The major version number.
    pub fn major(&self) -> u8 {
        match self {
            Self::Pdf20 => 2,
            _ => 1,
        }
    }

    /// The minor version number.
    pub fn minor(&self) -> u8 {
        match self {
            Self::Pdf10 | Self::Pdf20 => 0,
            Self::Pdf11 => 1,
            Self::Pdf12 => 2,
            Self::Pdf13 => 3,
            Self::Pdf14 => 4,
            Self::Pdf15 => 5,
            Self::Pdf16 => 6,
            Self::Pdf17 => 7,
        }
    }
}
