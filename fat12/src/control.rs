use alloc::sync::Arc;
use alloc::vec::Vec;

use block_dev::BlockDevice;

use crate::volume::data::DataArea;
use crate::volume::fat::FatTable;
use crate::volume::reserved::Bpb;
use crate::volume::root::{short_name, RootDir, ShortDirEntry};
use crate::{Error, FileReader};

/// 一次挂载，持有启动扇区、FAT与根目录，离开作用域即全部释放。
pub struct FatFileSystem {
    dev: Arc<dyn BlockDevice>,
    bpb: Bpb,
    fat: FatTable,
    root_dir: RootDir,
    data_area: DataArea,
}

impl core::fmt::Debug for FatFileSystem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FatFileSystem")
            .field("geometry", &self.bpb.geometry())
            .field("data_area", &self.data_area)
            .finish_non_exhaustive()
    }
}

impl FatFileSystem {
    /// 依次解析启动扇区、读取FAT、读取根目录
    pub fn mount(dev: Arc<dyn BlockDevice>) -> Result<Self, Error> {
        let bpb = Bpb::load(dev.as_ref())?;
        let fat = FatTable::load(dev.as_ref(), &bpb)?;
        let root_dir = RootDir::load(dev.as_ref(), &bpb)?;
        log::debug!(
            "mounted: {} clusters of {} bytes",
            bpb.clusters(),
            bpb.cluster_bytes()
        );

        Ok(Self::from_parts(dev, bpb, fat, root_dir))
    }

    pub fn from_parts(dev: Arc<dyn BlockDevice>, bpb: Bpb, fat: FatTable, root_dir: RootDir) -> Self {
        Self {
            data_area: DataArea::new(&bpb),
            dev,
            bpb,
            fat,
            root_dir,
        }
    }

    pub fn bpb(&self) -> &Bpb {
        &self.bpb
    }

    pub fn fat(&self) -> &FatTable {
        &self.fat
    }

    pub fn root_dir(&self) -> &RootDir {
        &self.root_dir
    }

    pub fn data_area(&self) -> &DataArea {
        &self.data_area
    }

    pub(crate) fn device(&self) -> &dyn BlockDevice {
        self.dev.as_ref()
    }

    /// 按11字节的8.3名称查找
    pub fn find(&self, name: &[u8; 11]) -> Option<&ShortDirEntry> {
        self.root_dir.find(name)
    }

    /// 按`README.TXT`一类的名字查找
    pub fn find_by_display_name(&self, name: &str) -> Result<&ShortDirEntry, Error> {
        self.find(&short_name(name)).ok_or(Error::NotFound)
    }

    pub fn reader(&self, dirent: &ShortDirEntry) -> FileReader<'_> {
        FileReader::new(self, dirent)
    }

    /// 读出整个文件，长度恰为目录项记录的大小
    pub fn read_file(&self, dirent: &ShortDirEntry) -> Result<Vec<u8>, Error> {
        let mut data = Vec::with_capacity(dirent.size());
        for chunk in self.reader(dirent) {
            data.extend_from_slice(&chunk?);
        }
        Ok(data)
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>, Error> {
        let dirent = *self.find_by_display_name(name)?;
        self.read_file(&dirent)
    }
}
