//! 扇区的抽象

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use block_dev::{BlockDevice, BLOCK_SIZE};
use derive_more::{Add, From, Into};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Add, From, Into)]
#[repr(transparent)]
pub struct SectorId(usize);

impl core::ops::Add<usize> for SectorId {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        self + Self(rhs)
    }
}

impl SectorId {
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// 拉伸扇区号至块ID
    pub const fn block(self, sector_bytes: usize) -> usize {
        self.0 * (sector_bytes / BLOCK_SIZE)
    }
}

/// 区间内的扇区数
pub fn count(sectors: &Range<SectorId>) -> usize {
    sectors.end.0.saturating_sub(sectors.start.0)
}

/// 一次性读出`sectors`内的全部扇区
pub fn read(
    dev: &dyn BlockDevice,
    sectors: Range<SectorId>,
    sector_bytes: usize,
) -> Result<Vec<u8>, block_dev::Error> {
    let mut buf = vec![0; count(&sectors) * sector_bytes];
    log::trace!(
        "read sectors {}..{} ({} bytes)",
        sectors.start.0,
        sectors.end.0,
        buf.len()
    );
    dev.read_blocks(sectors.start.block(sector_bytes), &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use block_dev::MemDisk;

    use super::*;

    #[test]
    fn sectors_stretch_to_blocks() {
        assert_eq!(7, SectorId::new(7).block(512));
        assert_eq!(14, SectorId::new(7).block(1024));
        assert_eq!(32, SectorId::new(4).block(4096));
    }

    #[test]
    fn reads_whole_sectors() {
        let mut image = vec![0; 4 * 1024];
        image[2 * 1024] = 0x42;
        let disk = MemDisk::new(image);

        let buf = read(&disk, SectorId::new(2)..SectorId::new(4), 1024).unwrap();
        assert_eq!(2048, buf.len());
        assert_eq!(0x42, buf[0]);
    }
}
