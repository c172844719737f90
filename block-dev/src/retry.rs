use crate::{BlockDevice, Error};

/// 物理介质的读取可能偶发失败，失败后复位控制器再试，最多尝试`attempts`次。
#[derive(Debug)]
pub struct Retry<D> {
    inner: D,
    attempts: usize,
}

impl<D: BlockDevice> Retry<D> {
    pub const DEFAULT_ATTEMPTS: usize = 3;

    pub fn new(inner: D) -> Self {
        Self::with_attempts(inner, Self::DEFAULT_ATTEMPTS)
    }

    /// `attempts`至少为1
    pub fn with_attempts(inner: D, attempts: usize) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: BlockDevice> BlockDevice for Retry<D> {
    fn read_blocks(&self, block_id: usize, buf: &mut [u8]) -> Result<(), Error> {
        for attempt in 1..=self.attempts {
            match self.inner.read_blocks(block_id, buf) {
                Ok(()) => return Ok(()),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    log::warn!("block {block_id}: attempt {attempt}/{} failed: {e}", self.attempts);
                    if attempt < self.attempts {
                        self.inner.reset();
                    }
                }
            }
        }

        Err(Error::RetriesExhausted {
            attempts: self.attempts,
        })
    }

    fn reset(&self) {
        self.inner.reset();
    }
}
