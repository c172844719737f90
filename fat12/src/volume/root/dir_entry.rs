//! 32字节的短目录项

use alloc::string::String;
use core::mem;

use enumflags2::{bitflags, BitFlags};

use crate::{ClusterError, ClusterId};

pub const DIR_ENTRY_SIZE: usize = mem::size_of::<ShortDirEntry>();

pub type FreeDirEntry = [u8; DIR_ENTRY_SIZE];

/// 已删除
pub static FREE: FreeDirEntry = {
    let mut arr = [0; DIR_ENTRY_SIZE];
    arr[0] = 0xE5;
    arr
};

/// 目录结束，其后皆为空
pub static TAIL_FREE: FreeDirEntry = [0; DIR_ENTRY_SIZE];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C, packed)]
pub struct ShortDirEntry {
    /// 8 name + 3 extension, space padded, no dot
    name: [u8; 11],

    attr: u8,

    /// Reserved, must be 0
    _ntres: u8,

    /// Count of tenths of a second.
    /// Range: [0, 199]
    _crt_time_tenth: u8,

    /// Creation time, granularity is 2 seconds
    _crt_time: u16,

    /// Creation date
    _crt_date: u16,

    /// Last access date
    _lst_acc_date: u16,

    /// High word of first data cluster number, always 0 on FAT12
    _fst_clus_hi: u16,

    /// Last modification time
    _wrt_time: u16,

    /// Last modification date
    _wrt_date: u16,

    /// Low word of first data cluster number
    /// for file/directory described by this entry
    fst_clus_lo: u16,

    /// Quantity containing size in bytes
    /// of file/directory described by this entry
    file_size: u32,
}

impl ShortDirEntry {
    pub fn new_file(name: [u8; 11], id: ClusterId, size: u32) -> Self {
        Self {
            name,
            attr: AttrFlag::Archive as u8,
            fst_clus_lo: id.into(),
            file_size: size,
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, attr: BitFlags<AttrFlag>) -> Self {
        self.attr = attr.bits();
        self
    }

    /// 长度不是32时返回`None`
    pub fn from_bytes(raw: &[u8]) -> Option<Self> {
        let raw: [u8; DIR_ENTRY_SIZE] = raw.try_into().ok()?;
        Some(unsafe { mem::transmute::<[u8; DIR_ENTRY_SIZE], Self>(raw) })
    }

    pub fn to_bytes(&self) -> [u8; DIR_ENTRY_SIZE] {
        unsafe { mem::transmute(*self) }
    }

    pub fn name(&self) -> &[u8; 11] {
        &self.name
    }

    /// `"README  TXT"` -> `"README.TXT"`
    pub fn display_name(&self) -> String {
        let base = String::from_utf8_lossy(&self.name[..8]);
        let ext = String::from_utf8_lossy(&self.name[8..]);
        let (base, ext) = (base.trim_end(), ext.trim_end());

        let mut name = String::from(base);
        if !ext.is_empty() {
            name.push('.');
            name.push_str(ext);
        }
        name
    }

    pub fn attr(&self) -> BitFlags<AttrFlag> {
        BitFlags::from_bits_truncate(self.attr)
    }

    pub fn status(&self) -> DirEntryStatus {
        match self.name[0] {
            0xE5 => DirEntryStatus::Free,
            0x00 => DirEntryStatus::TailFree,
            _ => DirEntryStatus::Occupied,
        }
    }

    /// 首簇编号，磁盘上是16位字段，超出12位的值不是FAT12簇号
    pub fn cluster_id(&self) -> Result<ClusterId, ClusterError> {
        match self.fst_clus_lo {
            raw @ 0..=0x0FFF => Ok(ClusterId::new(raw)),
            _ => Err(ClusterError::OutOfRange),
        }
    }

    pub const fn size(&self) -> usize {
        self.file_size as usize
    }

    pub fn is_dir(&self) -> bool {
        self.attr().contains(AttrFlag::Directory)
    }

    pub fn is_volume_label(&self) -> bool {
        self.attr() == BitFlags::from(AttrFlag::VolumeID)
    }

    pub fn is_long_name(&self) -> bool {
        self.attr() == AttrFlag::long_name()
    }
}

/// 把`"readme.txt"`一类的名字转换为11字节的8.3名称。
///
/// 以最后一个`.`分开主名与扩展名，超长部分直接截断，不足则补空格，全部转为大写。
pub fn short_name(name: &str) -> [u8; 11] {
    let (base, ext) = name.rsplit_once('.').unwrap_or((name, ""));

    let mut arr = [b' '; 11];
    let (arr_base, arr_ext) = arr.split_at_mut(8);
    for (b, nb) in arr_base.iter_mut().zip(base.bytes()) {
        *b = nb.to_ascii_uppercase();
    }
    for (b, nb) in arr_ext.iter_mut().zip(ext.bytes()) {
        *b = nb.to_ascii_uppercase();
    }

    arr
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[bitflags]
#[repr(u8)]
pub enum AttrFlag {
    ReadOnly = 0b0000_0001,
    Hidden = 0b0000_0010,
    /// The corresponding file is tagged as a component of the operating system
    System = 0b0000_0100,
    /// The corresponding entry contains the volume label
    VolumeID = 0b0000_1000,
    Directory = 0b0001_0000,
    /// Indicates that properties of the associated file have been modified
    Archive = 0b0010_0000,
}

impl AttrFlag {
    /// 长文件名目录项的属性组合
    pub fn long_name() -> BitFlags<AttrFlag> {
        AttrFlag::ReadOnly | AttrFlag::Hidden | AttrFlag::System | AttrFlag::VolumeID
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DirEntryStatus {
    /// name[0] == 0xE5
    Free,
    /// name[0] == 0，此条目后的条目皆为[`DirEntryStatus::TailFree`]
    TailFree,
    /// 已被使用
    Occupied,
}
