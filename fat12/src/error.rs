use core::fmt;

use crate::volume::reserved::BpbError;
use crate::{ClusterError, ClusterId};

pub type Result<T> = core::result::Result<T, Error>;

/// 卷的区域：保留区 | FAT区 | 根目录 | 数据区
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    BootSector,
    Fat,
    RootDir,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// 块设备读取失败
    Io {
        region: Region,
        source: block_dev::Error,
    },
    /// 启动扇区的字段不自洽
    BootSector(BpbError),
    /// 根目录中没有这个名字
    NotFound,
    /// 簇链表中出现了坏簇标记，携带的是标记所在的簇
    BadCluster(ClusterId),
    /// 簇链表损坏
    Chain(ClusterError),
    /// 簇链表在读满文件大小之前就结束了
    ChainTooShort { expected: usize, read: usize },
}

impl Error {
    /// 出错的区域，[`Error::NotFound`]不属于任何区域
    pub const fn region(&self) -> Option<Region> {
        match self {
            Self::Io { region, .. } => Some(*region),
            Self::BootSector(_) => Some(Region::BootSector),
            Self::NotFound => None,
            Self::BadCluster(_) | Self::Chain(_) | Self::ChainTooShort { .. } => Some(Region::Data),
        }
    }

    pub(crate) fn io(region: Region) -> impl FnOnce(block_dev::Error) -> Self {
        move |source| Self::Io { region, source }
    }
}

impl From<BpbError> for Error {
    fn from(e: BpbError) -> Self {
        Self::BootSector(e)
    }
}

impl From<ClusterError> for Error {
    fn from(e: ClusterError) -> Self {
        Self::Chain(e)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BootSector => "boot sector",
            Self::Fat => "FAT",
            Self::RootDir => "root directory",
            Self::Data => "data area",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { region, source } => write!(f, "failed to read {region}: {source}"),
            Self::BootSector(e) => write!(f, "invalid boot sector: {e}"),
            Self::NotFound => write!(f, "file not found"),
            Self::BadCluster(id) => write!(f, "cluster {id} is marked bad"),
            Self::Chain(e) => write!(f, "corrupt cluster chain: {e}"),
            Self::ChainTooShort { expected, read } => write!(
                f,
                "cluster chain ended after {read} of {expected} bytes"
            ),
        }
    }
}
