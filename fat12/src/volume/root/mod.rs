//! 根目录，FAT12/16中位于FAT区之后、数据区之前，容量固定。

mod dir_entry;

use alloc::vec::Vec;

use block_dev::BlockDevice;

pub use self::dir_entry::*;
use crate::sector;
use crate::volume::reserved::Bpb;
use crate::{Error, Region};

#[derive(Debug, Clone)]
pub struct RootDir {
    entries: Vec<ShortDirEntry>,
}

impl RootDir {
    pub fn load(dev: &dyn BlockDevice, bpb: &Bpb) -> Result<Self, Error> {
        let bytes = sector::read(dev, bpb.root_dir(), bpb.sector_bytes())
            .map_err(Error::io(Region::RootDir))?;

        let entries: Vec<_> = bytes
            .chunks_exact(DIR_ENTRY_SIZE)
            .take(bpb.root_entries())
            .filter_map(ShortDirEntry::from_bytes)
            .collect();
        log::debug!("root directory loaded, {} slots", entries.len());

        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<ShortDirEntry>) -> Self {
        Self { entries }
    }

    /// 目录项槽位总数，含空闲的
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// 按11字节的8.3名称精确查找，第一个匹配的胜出。
    ///
    /// 不做大小写转换，`name`应先经过[`short_name`]。
    pub fn find(&self, name: &[u8; 11]) -> Option<&ShortDirEntry> {
        self.occupied().find(|dirent| dirent.name() == name)
    }

    /// 已占用的短目录项，跳过长文件名项
    pub fn iter(&self) -> impl Iterator<Item = &ShortDirEntry> + '_ {
        self.occupied().filter(|dirent| !dirent.is_long_name())
    }

    fn occupied(&self) -> impl Iterator<Item = &ShortDirEntry> + '_ {
        self.entries
            .iter()
            .take_while(|dirent| dirent.status() != DirEntryStatus::TailFree)
            .filter(|dirent| dirent.status() == DirEntryStatus::Occupied)
    }
}
