use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use block_dev::{BlockDevice, Error, BLOCK_SIZE};
use send_wrapper::SendWrapper;

/// 磁盘镜像文件，一次定位加一次读取，失败即报错，没有控制器可复位。
#[derive(Debug)]
pub struct BlockFile {
    inner: SendWrapper<RefCell<File>>,
}

impl BlockFile {
    pub fn new(fd: File) -> Self {
        Self {
            inner: SendWrapper::new(RefCell::new(fd)),
        }
    }
}

impl BlockDevice for BlockFile {
    fn read_blocks(&self, block_id: usize, buf: &mut [u8]) -> Result<(), Error> {
        let count = block_dev::block_count(buf)?;
        let mut file = self.inner.borrow_mut();

        file.seek(SeekFrom::Start((block_id * BLOCK_SIZE) as u64))
            .map_err(device_error)?;
        file.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::OutOfRange {
                block: block_id,
                count,
            },
            _ => device_error(e),
        })
    }
}

fn device_error(e: io::Error) -> Error {
    log::warn!("disk image I/O error: {e}");
    Error::Device
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn temp_image(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{name}-{}.img", std::process::id()));
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn reads_at_block_offsets() {
        let mut bytes = vec![0u8; 3 * BLOCK_SIZE];
        bytes[2 * BLOCK_SIZE] = 0x7E;
        let path = temp_image("block-file-read", &bytes);

        let dev = BlockFile::new(File::open(&path).unwrap());
        let mut buf = [0; BLOCK_SIZE];
        dev.read_blocks(2, &mut buf).unwrap();
        assert_eq!(0x7E, buf[0]);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn short_read_is_out_of_range() {
        let path = temp_image("block-file-short", &[0u8; BLOCK_SIZE + 100]);

        let dev = BlockFile::new(File::open(&path).unwrap());
        let mut buf = [0; 2 * BLOCK_SIZE];
        assert_eq!(
            Err(Error::OutOfRange { block: 0, count: 2 }),
            dev.read_blocks(0, &mut buf)
        );
        assert_eq!(
            Err(Error::Misaligned { len: 10 }),
            dev.read_blocks(0, &mut [0; 10])
        );

        fs::remove_file(path).unwrap();
    }
}
