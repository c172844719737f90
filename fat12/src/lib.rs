//! FAT12卷的只读访问：解析启动扇区，解码FAT，在根目录中按8.3名称查找文件，
//! 再沿簇链表读出文件内容。
//!
//! 整体自下而上：块设备 -> [`volume::reserved::Bpb`] -> ([`volume::fat::FatTable`],
//! [`volume::root::RootDir`]) -> [`FileReader`]，由[`FatFileSystem`]串起来。

#![no_std]

extern crate alloc;

mod cluster;
mod control;
mod error;
mod reader;
mod sector;
pub mod volume;

pub use self::{
    cluster::{ClusterError, ClusterId},
    control::FatFileSystem,
    error::{Error, Region, Result},
    reader::FileReader,
    sector::SectorId,
    volume::root::short_name,
};
