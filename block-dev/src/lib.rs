//! # 块设备接口层
//!
//! 块设备是以**块**为单位存储数据的设备，例如软盘、硬盘、磁盘镜像文件等；
//! [`BlockDevice`] 就是对读块设备的抽象，实现了此特质的类型称为**块设备驱动**。
//!
//! 文件系统以扇区为单位寻址，扇区到块的换算由上层负责。

#![no_std]

extern crate alloc;

#[cfg(all(target_arch = "x86", feature = "bios"))]
mod bios;
mod error;
mod mem;
mod retry;

use core::any::Any;

#[cfg(all(target_arch = "x86", feature = "bios"))]
pub use self::bios::BiosDisk;
pub use self::{error::Error, mem::MemDisk, retry::Retry};

/// 块大小，上层的扇区大小必须是它的整数倍
pub const BLOCK_SIZE: usize = 512;

/// 块设备驱动特质
pub trait BlockDevice: Send + Sync + Any {
    /// 从`block_id`起连续读取`buf.len() / BLOCK_SIZE`个块。
    ///
    /// 读取是原子的：返回`Err`时`buf`的内容没有意义。
    fn read_blocks(&self, block_id: usize, buf: &mut [u8]) -> Result<(), Error>;

    /// Brings the controller back into a known state after a failed transfer.
    fn reset(&self) {}
}

/// 检查缓冲区长度，返回要读取的块数
pub fn block_count(buf: &[u8]) -> Result<usize, Error> {
    if buf.is_empty() || buf.len() % BLOCK_SIZE != 0 {
        return Err(Error::Misaligned { len: buf.len() });
    }
    Ok(buf.len() / BLOCK_SIZE)
}
