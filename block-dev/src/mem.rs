use alloc::vec::Vec;

use crate::{block_count, BlockDevice, Error, BLOCK_SIZE};

/// 内存中的磁盘
#[derive(Debug, Clone)]
pub struct MemDisk {
    data: Vec<u8>,
}

impl MemDisk {
    /// 不足一个块的尾部会补零
    pub fn new(mut data: Vec<u8>) -> Self {
        let len = data.len().next_multiple_of(BLOCK_SIZE);
        data.resize(len, 0);
        Self { data }
    }

    pub fn blocks(&self) -> usize {
        self.data.len() / BLOCK_SIZE
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl BlockDevice for MemDisk {
    fn read_blocks(&self, block_id: usize, buf: &mut [u8]) -> Result<(), Error> {
        let count = block_count(buf)?;
        let out_of_range = Error::OutOfRange {
            block: block_id,
            count,
        };

        let start = block_id.checked_mul(BLOCK_SIZE).ok_or(out_of_range)?;
        let end = start.checked_add(buf.len()).ok_or(out_of_range)?;
        let src = self.data.get(start..end).ok_or(out_of_range)?;
        buf.copy_from_slice(src);

        Ok(())
    }
}
