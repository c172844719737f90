//! 文件分配表，每个条目12位，两个条目挤在三个字节里。

use alloc::boxed::Box;
use alloc::vec;

use block_dev::BlockDevice;

use crate::sector;
use crate::volume::reserved::Bpb;
use crate::{ClusterError, ClusterId, Error, Region};

#[derive(Debug, Clone)]
pub struct FatTable {
    bytes: Box<[u8]>,
}

impl FatTable {
    /// 只读第一份FAT
    pub fn load(dev: &dyn BlockDevice, bpb: &Bpb) -> Result<Self, Error> {
        let bytes = sector::read(dev, bpb.fat_area(), bpb.sector_bytes())
            .map_err(Error::io(Region::Fat))?;
        let fat = Self::from_bytes(bytes);
        log::debug!("FAT loaded, {} entries", fat.entry_count());
        Ok(fat)
    }

    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn zeroed(len: usize) -> Self {
        Self::from_bytes(vec![0; len])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 能容纳多少条簇编号
    pub fn entry_count(&self) -> usize {
        self.bytes.len() * 2 / 3
    }

    /// 读取`id`的原始条目
    pub fn get(&self, id: ClusterId) -> Result<u16, ClusterError> {
        let offset = self.offset(id)?;
        let word = u16::from_le_bytes([self.bytes[offset], self.bytes[offset + 1]]);

        Ok(if u16::from(id) % 2 == 0 {
            word & 0x0FFF
        } else {
            word >> 4
        })
    }

    /// 写入`id`的原始条目，同一个字里另一个条目的半字节保持不变
    pub fn set(&mut self, id: ClusterId, value: u16) -> Result<(), ClusterError> {
        let offset = self.offset(id)?;
        let word = u16::from_le_bytes([self.bytes[offset], self.bytes[offset + 1]]);
        let value = value & 0x0FFF;

        let word = if u16::from(id) % 2 == 0 {
            (word & 0xF000) | value
        } else {
            (word & 0x000F) | (value << 4)
        };
        self.bytes[offset..offset + 2].copy_from_slice(&word.to_le_bytes());

        Ok(())
    }

    /// 获取下一个簇编号。
    /// 若`id`指向未分配、保留或损坏的簇，则报错。
    /// `Ok(None)`表示`id`为链表上最后一个簇。
    pub fn next(&self, id: ClusterId) -> Result<Option<ClusterId>, ClusterError> {
        match ClusterId::new(self.get(id)?).validate() {
            Ok(next) => Ok(Some(next)),
            Err(ClusterError::Eof) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// 从`start`开始遍历簇链表
    pub fn chain(&self, start: ClusterId) -> Chain<'_> {
        let head = start.validate().map_err(|e| match e {
            ClusterError::Eof => ClusterError::Reserved,
            e => e,
        });

        Chain {
            fat: self,
            next: Some(head),
            steps: 0,
        }
    }

    /// 条目所在的字节偏移，两个字节都得在表内
    fn offset(&self, id: ClusterId) -> Result<usize, ClusterError> {
        let offset = usize::from(id) * 3 / 2;
        if offset + 1 < self.bytes.len() {
            Ok(offset)
        } else {
            Err(ClusterError::OutOfRange)
        }
    }
}

/// 簇链表迭代器，出错后停止
#[derive(Debug)]
pub struct Chain<'a> {
    fat: &'a FatTable,
    next: Option<Result<ClusterId, ClusterError>>,
    steps: usize,
}

impl Iterator for Chain<'_> {
    type Item = Result<ClusterId, ClusterError>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = match self.next.take()? {
            Ok(id) => id,
            Err(e) => return Some(Err(e)),
        };

        self.steps += 1;
        if self.steps > self.fat.entry_count() {
            return Some(Err(ClusterError::Cycle));
        }

        self.next = self.fat.next(id).transpose();
        Some(Ok(id))
    }
}
