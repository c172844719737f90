//! 数据区，存放文件内容的区域，使用**簇编号**索引。
//!
//! 因为FAT条目存放着下一个簇的编号，
//! 其中`0`表示簇未分配，`1`保留，
//! 所以数据区第一个可用的簇编号为2。

use core::ops::Range;

use crate::volume::reserved::Bpb;
use crate::{ClusterError, ClusterId, SectorId};

#[derive(Debug, Clone)]
pub struct DataArea {
    range: Range<SectorId>,
    cluster_sectors: usize,
}

impl DataArea {
    pub fn new(bpb: &Bpb) -> Self {
        Self {
            range: bpb.data_area(),
            cluster_sectors: bpb.cluster_sectors(),
        }
    }

    pub const fn cluster_sectors(&self) -> usize {
        self.cluster_sectors
    }

    /// 返回簇编号指向的一系列扇区
    ///
    /// 数据区不占有`ClusterId::MIN`前面的簇，所以需要转换计算得到索引指向的扇区。
    /// 最后一个不完整的簇不可用。
    pub fn cluster(&self, id: ClusterId) -> Result<Range<SectorId>, ClusterError> {
        let id = id.validate().map_err(|e| match e {
            ClusterError::Eof => ClusterError::Reserved,
            e => e,
        })?;

        let start = self.range.start + id.index() * self.cluster_sectors;
        let end = start + self.cluster_sectors;
        if end > self.range.end {
            return Err(ClusterError::OutOfRange);
        }

        Ok(start..end)
    }
}
