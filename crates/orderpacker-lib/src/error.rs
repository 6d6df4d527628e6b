use thiserror::Error;

/// Convenient result alias for the order packer library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Raised when a box set is empty or contains a zero-capacity box.
    #[error("invalid box set: {reason}")]
    InvalidBoxSet { reason: InvalidBoxSetReason },

    /// Raised when a packing result would exceed the caller's box limit.
    #[error("order needs {required} boxes, more than the limit of {limit}")]
    TooManyBoxes { required: u64, limit: u64 },
}

/// Why a candidate box set was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidBoxSetReason {
    /// No capacities were supplied.
    Empty,
    /// At least one capacity was zero.
    ZeroCapacity,
}

impl std::fmt::Display for InvalidBoxSetReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "boxes list is empty"),
            Self::ZeroCapacity => write!(f, "box capacity must be greater than zero"),
        }
    }
}

impl Error {
    pub(crate) fn empty_box_set() -> Self {
        Self::InvalidBoxSet {
            reason: InvalidBoxSetReason::Empty,
        }
    }

    pub(crate) fn too_many_boxes(required: u64, limit: u64) -> Self {
        Self::TooManyBoxes { required, limit }
    }

    pub(crate) fn zero_capacity() -> Self {
        Self::InvalidBoxSet {
            reason: InvalidBoxSetReason::ZeroCapacity,
        }
    }
}
