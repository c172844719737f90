#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use block_dev::{BlockDevice, Error, MemDisk};
use fat12::volume::fat::FatTable;
use fat12::volume::reserved::{Bpb, Geometry};
use fat12::volume::root::ShortDirEntry;
use fat12::{short_name, ClusterId};

/// 512字节扇区，每簇1扇区，1个保留扇区，2份各1扇区的FAT，16个根目录项，共64扇区。
/// 数据区从4号扇区开始，共60个簇。
pub const SMALL: Geometry = Geometry {
    sector_bytes: 512,
    cluster_sectors: 1,
    reserved_sectors: 1,
    fat_count: 2,
    root_entries: 16,
    fat_sectors: 1,
    total_sectors: 64,
    media: 0xF8,
};

/// 在内存中拼出一张FAT12镜像
pub struct ImageBuilder {
    bpb: Bpb,
    fat: FatTable,
    entries: Vec<ShortDirEntry>,
    image: Vec<u8>,
}

impl ImageBuilder {
    pub fn new(geometry: Geometry) -> Self {
        let bpb = Bpb::from_geometry(geometry).unwrap();
        let mut fat = FatTable::zeroed(bpb.fat_sectors() * bpb.sector_bytes());
        fat.set(ClusterId::new(0), 0xF00 | u16::from(bpb.media()))
            .unwrap();
        fat.set(ClusterId::new(1), 0xFFF).unwrap();

        Self {
            image: vec![0; bpb.total_sectors() * bpb.sector_bytes()],
            bpb,
            fat,
            entries: Vec::new(),
        }
    }

    pub fn small() -> Self {
        Self::new(SMALL)
    }

    pub fn bpb(&self) -> &Bpb {
        &self.bpb
    }

    pub fn cluster_bytes(&self) -> usize {
        self.bpb.cluster_bytes()
    }

    /// 把`data`依次写入`clusters`并串成链表
    pub fn add_file(&mut self, name: &str, clusters: &[u16], data: &[u8]) -> &mut Self {
        let cluster_bytes = self.cluster_bytes();
        for (&cluster, chunk) in clusters.iter().zip(data.chunks(cluster_bytes)) {
            let offset = self.cluster_offset(cluster);
            self.image[offset..offset + chunk.len()].copy_from_slice(chunk);
        }
        self.link(clusters);

        let first = clusters.first().copied().unwrap_or(0);
        self.add_entry(ShortDirEntry::new_file(
            short_name(name),
            ClusterId::new(first),
            data.len() as u32,
        ))
    }

    /// 链表末尾写入结束标记
    pub fn link(&mut self, clusters: &[u16]) -> &mut Self {
        for pair in clusters.windows(2) {
            self.set_fat(pair[0], pair[1]);
        }
        if let Some(&last) = clusters.last() {
            self.set_fat(last, 0xFFF);
        }
        self
    }

    pub fn add_entry(&mut self, entry: ShortDirEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn set_fat(&mut self, cluster: u16, value: u16) -> &mut Self {
        self.fat.set(ClusterId::new(cluster), value).unwrap();
        self
    }

    pub fn fill_cluster(&mut self, cluster: u16, byte: u8) -> &mut Self {
        let offset = self.cluster_offset(cluster);
        let len = self.cluster_bytes();
        self.image[offset..offset + len].fill(byte);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let sector_bytes = self.bpb.sector_bytes();
        let mut image = self.image.clone();

        image[..512].copy_from_slice(&self.bpb.to_bytes());

        let fat = self.fat.as_bytes();
        for copy in 0..self.bpb.fat_count() {
            let offset = usize::from(self.bpb.fats().start) * sector_bytes + copy * fat.len();
            image[offset..offset + fat.len()].copy_from_slice(fat);
        }

        let root = usize::from(self.bpb.root_dir().start) * sector_bytes;
        for (i, entry) in self.entries.iter().enumerate() {
            let offset = root + i * 32;
            image[offset..offset + 32].copy_from_slice(&entry.to_bytes());
        }

        image
    }

    pub fn disk(&self) -> MemDisk {
        MemDisk::new(self.build())
    }

    fn cluster_offset(&self, cluster: u16) -> usize {
        let sector = usize::from(self.bpb.data_area().start)
            + (cluster as usize - 2) * self.bpb.cluster_sectors();
        sector * self.bpb.sector_bytes()
    }
}

/// 记录每一次读取的块设备
pub struct RecordingDisk {
    inner: MemDisk,
    reads: Mutex<Vec<(usize, usize)>>,
}

impl RecordingDisk {
    pub fn new(inner: MemDisk) -> Arc<Self> {
        Arc::new(Self {
            inner,
            reads: Mutex::new(Vec::new()),
        })
    }

    /// (起始块, 块数)
    pub fn reads(&self) -> Vec<(usize, usize)> {
        self.reads.lock().unwrap().clone()
    }

    /// 落在`first_block`及之后的读取次数
    pub fn reads_from(&self, first_block: usize) -> usize {
        self.reads()
            .iter()
            .filter(|(block, _)| *block >= first_block)
            .count()
    }

    pub fn clear(&self) {
        self.reads.lock().unwrap().clear();
    }
}

impl BlockDevice for RecordingDisk {
    fn read_blocks(&self, block_id: usize, buf: &mut [u8]) -> Result<(), Error> {
        self.reads
            .lock()
            .unwrap()
            .push((block_id, buf.len() / block_dev::BLOCK_SIZE));
        self.inner.read_blocks(block_id, buf)
    }
}
