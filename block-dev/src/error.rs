use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested blocks lie (partly) past the end of the medium.
    OutOfRange { block: usize, count: usize },
    /// The buffer is empty or not a whole number of blocks.
    Misaligned { len: usize },
    /// The medium reported a failure; a retry may succeed.
    Device,
    /// Every attempt allowed by [`crate::Retry`] failed.
    RetriesExhausted { attempts: usize },
}

impl Error {
    /// 是否值得重试
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Device)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { block, count } => {
                write!(f, "blocks {block}..{} are out of range", block + count)
            }
            Self::Misaligned { len } => write!(f, "buffer of {len} bytes is not block aligned"),
            Self::Device => write!(f, "device error"),
            Self::RetriesExhausted { attempts } => {
                write!(f, "read failed after {attempts} attempts")
            }
        }
    }
}
