//! INT 13h 扩展读，仅在实模式的引导程序中可用。

use core::arch::asm;

use crate::{block_count, BlockDevice, Error};

/// 单次INT 13h扩展读最多传输的块数
const MAX_TRANSFER: usize = 127;

/// Disk Address Packet
#[repr(C, packed)]
struct AddressPacket {
    size: u8,
    zero: u8,
    sectors_count: u16,
    /// segment:offset
    buffer: u32,
    s_lba: u64,
}

impl AddressPacket {
    fn new(sectors_count: u16, buffer: *mut u8, s_lba: u64) -> Self {
        let linear = buffer as usize as u32;
        AddressPacket {
            size: 0x10,
            zero: 0x00,
            sectors_count,
            buffer: ((linear >> 4) << 16) | (linear & 0xF),
            s_lba,
        }
    }

    fn disk_read(&self, drive_number: u8) -> Result<(), Error> {
        let status: u8;
        let dap_addr: *const AddressPacket = self;

        // DS:SI指向地址包，取DS=0，所以包必须位于前64K（引导程序的栈上）
        unsafe {
            asm!(
                "push si",
                "push ds",
                "mov si, cx",
                "xor cx, cx",
                "mov ds, cx",
                "mov ah, 0x42",
                "int 0x13",
                "pop ds",
                "pop si",
                in("dl") drive_number,
                inout("cx") dap_addr as usize as u16 => _,
                out("ah") status,
            )
        }

        if status == 0x00 {
            Ok(())
        } else {
            Err(Error::Device)
        }
    }
}

/// BIOS提供的磁盘，`drive`为BIOS驱动号（0x00软盘，0x80硬盘）
#[derive(Debug, Clone, Copy)]
pub struct BiosDisk {
    drive: u8,
}

impl BiosDisk {
    pub const fn new(drive: u8) -> Self {
        Self { drive }
    }
}

impl BlockDevice for BiosDisk {
    fn read_blocks(&self, block_id: usize, buf: &mut [u8]) -> Result<(), Error> {
        block_count(buf)?;

        for (i, chunk) in buf.chunks_mut(MAX_TRANSFER * crate::BLOCK_SIZE).enumerate() {
            let count = chunk.len() / crate::BLOCK_SIZE;
            let lba = block_id + i * MAX_TRANSFER;
            AddressPacket::new(count as u16, chunk.as_mut_ptr(), lba as u64)
                .disk_read(self.drive)?;
        }

        Ok(())
    }

    fn reset(&self) {
        unsafe {
            asm!(
                "xor ah, ah",
                "int 0x13",
                in("dl") self.drive,
                out("ah") _,
            )
        }
    }
}
