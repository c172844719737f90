use core::fmt;
use core::mem;
use core::ops::Range;

use block_dev::{BlockDevice, BLOCK_SIZE};

use crate::sector::{self, SectorId};
use crate::{Error, Region};

/// 一个根目录项的字节数
const DIR_ENTRY_BYTES: usize = 32;

/// FAT12最多能容纳的数据簇数，再多就是FAT16了
const FAT12_MAX_CLUSTERS: usize = 4084;

/// BIOS Parameter Block BIOS参数块
/// 位于保留区的第一扇区，该扇区又名启动扇区。
///
/// 只含整数字段，任意512字节都是合法的位模式，校验交给[`Bpb`]。
#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub(crate) struct RawBpb {
    /// 跳转至启动代码的指令
    bs_jmp_boot: [u8; 3],

    /// 一般用于记录什么系统格式化此卷
    bs_oem_name: [u8; 8],

    /// 一个扇区的字节量
    byts_per_sec: u16,

    /// 一个簇的扇区数
    sec_per_clus: u8,

    /// 保留区的扇区数
    rsvd_sec_cnt: u16,

    /// 此卷的文件分配表(FAT)数量，建议为2
    num_fats: u8,

    /// 根目录能容纳的目录项数
    root_ent_cnt: u16,

    /// 扇区总数，为0时见`tot_sec32`
    tot_sec16: u16,

    /// 物理媒介的类型
    media: u8,

    /// 一个FAT占用的扇区数
    fat_sz16: u16,

    /// 中断0x13模式下，轨道的扇区数
    sec_per_trk: u16,

    /// 中断0x13模式下，头数量
    num_heads: u16,

    /// 中断0x13模式下使用
    hidd_sec: u32,

    /// 扇区总数超过0xFFFF时使用
    tot_sec32: u32,

    /*
     * Extended boot record for FAT12/FAT16 volumes
     */
    /// 中断0x13驱动号，为0x80或0x00
    drv_num: u8,

    _reserved1: u8,

    /// 为0x28或0x29时，表示接下来的三个字段存在
    boot_sig: u8,

    /// 供移动介质使用
    vol_id: u32,

    /// 卷标签，与根目录记录的卷标签一致
    /// NOTE: 若不设卷标签，则值为"NO NAME    "
    vol_lab: [u8; 11],

    /// 文件系统类型：FAT12/FAT16
    ///
    /// 只用来做告示，不应信赖此字段。
    fil_sys_type: [u8; 8],

    boot_code: [u8; 448],

    /// [0x55, 0xAA]
    signature_word: [u8; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum SectorBytes {
    B512 = 512,
    B1024 = 1024,
    B2048 = 2048,
    B4096 = 4096,
}

impl TryFrom<u16> for SectorBytes {
    type Error = BpbError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        match raw {
            512 => Ok(Self::B512),
            1024 => Ok(Self::B1024),
            2048 => Ok(Self::B2048),
            4096 => Ok(Self::B4096),
            _ => Err(BpbError::SectorBytes(raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClusterSectors {
    S1 = 1,
    S2 = 2,
    S4 = 4,
    S8 = 8,
    S16 = 16,
    S32 = 32,
    S64 = 64,
    S128 = 128,
}

impl TryFrom<u8> for ClusterSectors {
    type Error = BpbError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(Self::S1),
            2 => Ok(Self::S2),
            4 => Ok(Self::S4),
            8 => Ok(Self::S8),
            16 => Ok(Self::S16),
            32 => Ok(Self::S32),
            64 => Ok(Self::S64),
            128 => Ok(Self::S128),
            _ => Err(BpbError::ClusterSectors(raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BpbError {
    SectorBytes(u16),
    ClusterSectors(u8),
    NoReservedSectors,
    NoFats,
    NoRootEntries,
    NoFatSectors,
    NoSectors,
    /// 数据区的起点不在卷内
    DataAreaOutOfVolume { data_start: usize, total_sectors: usize },
    /// 簇数超出FAT12的上限
    NotFat12 { clusters: usize },
    /// FAT装不下全部数据簇
    FatTooSmall { entries: usize, clusters: usize },
}

impl fmt::Display for BpbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SectorBytes(n) => write!(f, "unsupported sector size {n}"),
            Self::ClusterSectors(n) => write!(f, "unsupported sectors per cluster {n}"),
            Self::NoReservedSectors => write!(f, "no reserved sectors"),
            Self::NoFats => write!(f, "no FAT copies"),
            Self::NoRootEntries => write!(f, "no root directory entries"),
            Self::NoFatSectors => write!(f, "FAT has no sectors"),
            Self::NoSectors => write!(f, "volume has no sectors"),
            Self::DataAreaOutOfVolume {
                data_start,
                total_sectors,
            } => write!(
                f,
                "data area starts at sector {data_start} but the volume has {total_sectors}"
            ),
            Self::NotFat12 { clusters } => write!(f, "{clusters} clusters is too many for FAT12"),
            Self::FatTooSmall { entries, clusters } => write!(
                f,
                "FAT holds {entries} entries but the volume has {clusters} clusters"
            ),
        }
    }
}

/// 卷上可写的几何参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub sector_bytes: u16,
    pub cluster_sectors: u8,
    pub reserved_sectors: u16,
    pub fat_count: u8,
    pub root_entries: u16,
    pub fat_sectors: u16,
    pub total_sectors: u32,
    pub media: u8,
}

impl Geometry {
    /// 3.5英寸1.44MB软盘
    pub const FLOPPY_1440: Self = Self {
        sector_bytes: 512,
        cluster_sectors: 1,
        reserved_sectors: 1,
        fat_count: 2,
        root_entries: 224,
        fat_sectors: 9,
        total_sectors: 2880,
        media: 0xF0,
    };
}

/// 校验过的启动扇区。各区域的边界在构造时算好，此后不变。
#[derive(Debug, Clone)]
pub struct Bpb {
    raw: RawBpb,
    sector_bytes: SectorBytes,
    cluster_sectors: ClusterSectors,
    total_sectors: usize,
    fats: Range<SectorId>,
    root_dir: Range<SectorId>,
    data_area: Range<SectorId>,
}

impl Bpb {
    /// 读取并解析0号块
    pub fn load(dev: &dyn BlockDevice) -> Result<Self, Error> {
        let mut buf = [0u8; BLOCK_SIZE];
        dev.read_blocks(0, &mut buf)
            .map_err(Error::io(Region::BootSector))?;
        let bpb = Self::parse(&buf)?;
        log::debug!("boot sector: {:?}", bpb.geometry());
        Ok(bpb)
    }

    pub fn parse(buf: &[u8; BLOCK_SIZE]) -> Result<Self, BpbError> {
        let raw: RawBpb = unsafe { mem::transmute(*buf) };
        Self::from_raw(raw)
    }

    pub fn from_geometry(geometry: Geometry) -> Result<Self, BpbError> {
        let (tot_sec16, tot_sec32) = match u16::try_from(geometry.total_sectors) {
            Ok(n) => (n, 0),
            Err(_) => (0, geometry.total_sectors),
        };

        Self::from_raw(RawBpb {
            bs_jmp_boot: [0xEB, 0x3C, 0x90],
            bs_oem_name: *b"FAT12RS ",
            byts_per_sec: geometry.sector_bytes,
            sec_per_clus: geometry.cluster_sectors,
            rsvd_sec_cnt: geometry.reserved_sectors,
            num_fats: geometry.fat_count,
            root_ent_cnt: geometry.root_entries,
            tot_sec16,
            media: geometry.media,
            fat_sz16: geometry.fat_sectors,
            sec_per_trk: 18,
            num_heads: 2,
            hidd_sec: 0,
            tot_sec32,
            drv_num: 0x00,
            _reserved1: 0,
            boot_sig: 0x29,
            vol_id: 0,
            vol_lab: *b"NO NAME    ",
            fil_sys_type: *b"FAT12   ",
            boot_code: [0; 448],
            signature_word: [0x55, 0xAA],
        })
    }

    /// 编码为启动扇区
    pub fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        unsafe { mem::transmute(self.raw) }
    }

    fn from_raw(raw: RawBpb) -> Result<Self, BpbError> {
        let sector_bytes = SectorBytes::try_from(raw.byts_per_sec)?;
        let cluster_sectors = ClusterSectors::try_from(raw.sec_per_clus)?;

        let reserved = match raw.rsvd_sec_cnt {
            0 => return Err(BpbError::NoReservedSectors),
            n => n as usize,
        };
        let fat_count = match raw.num_fats {
            0 => return Err(BpbError::NoFats),
            n => n as usize,
        };
        let root_entries = match raw.root_ent_cnt {
            0 => return Err(BpbError::NoRootEntries),
            n => n as usize,
        };
        let fat_sectors = match raw.fat_sz16 {
            0 => return Err(BpbError::NoFatSectors),
            n => n as usize,
        };
        let total_sectors = match (raw.tot_sec16, raw.tot_sec32) {
            (0, 0) => return Err(BpbError::NoSectors),
            (0, n) => n as usize,
            (n, _) => n as usize,
        };

        let fat_start = SectorId::new(reserved);
        let root_start = fat_start + fat_count * fat_sectors;
        let root_sectors = (root_entries * DIR_ENTRY_BYTES).div_ceil(sector_bytes as usize);
        let data_start = root_start + root_sectors;

        if usize::from(data_start) >= total_sectors {
            return Err(BpbError::DataAreaOutOfVolume {
                data_start: data_start.into(),
                total_sectors,
            });
        }

        let clusters = (total_sectors - usize::from(data_start)) / cluster_sectors as usize;
        if clusters > FAT12_MAX_CLUSTERS {
            return Err(BpbError::NotFat12 { clusters });
        }

        // 0号、1号条目保留
        let entries = fat_sectors * sector_bytes as usize * 2 / 3;
        if entries < clusters + 2 {
            return Err(BpbError::FatTooSmall { entries, clusters });
        }

        Ok(Self {
            raw,
            sector_bytes,
            cluster_sectors,
            total_sectors,
            fats: fat_start..root_start,
            root_dir: root_start..data_start,
            data_area: data_start..SectorId::new(total_sectors),
        })
    }
}

impl Bpb {
    pub const fn sector_bytes(&self) -> usize {
        self.sector_bytes as usize
    }

    pub const fn cluster_sectors(&self) -> usize {
        self.cluster_sectors as usize
    }

    pub const fn cluster_bytes(&self) -> usize {
        self.sector_bytes() * self.cluster_sectors()
    }

    pub const fn reserved_sectors(&self) -> usize {
        self.raw.rsvd_sec_cnt as usize
    }

    pub const fn fat_count(&self) -> usize {
        self.raw.num_fats as usize
    }

    /// FAT占用的扇区数
    pub const fn fat_sectors(&self) -> usize {
        self.raw.fat_sz16 as usize
    }

    pub const fn root_entries(&self) -> usize {
        self.raw.root_ent_cnt as usize
    }

    pub const fn total_sectors(&self) -> usize {
        self.total_sectors
    }

    pub const fn media(&self) -> u8 {
        self.raw.media
    }

    /// 第一份FAT
    pub fn fat_area(&self) -> Range<SectorId> {
        self.fats.start..self.fats.start + self.fat_sectors()
    }

    /// 全部FAT副本
    pub fn fats(&self) -> Range<SectorId> {
        self.fats.clone()
    }

    pub fn root_dir(&self) -> Range<SectorId> {
        self.root_dir.clone()
    }

    pub fn data_area(&self) -> Range<SectorId> {
        self.data_area.clone()
    }

    /// 数据区的簇数
    pub fn clusters(&self) -> usize {
        sector::count(&self.data_area) / self.cluster_sectors()
    }

    pub fn oem_name(&self) -> &str {
        trim(&self.raw.bs_oem_name)
    }

    pub fn volume_id(&self) -> Option<u32> {
        self.has_extended_fields().then_some(self.raw.vol_id)
    }

    pub fn volume_label(&self) -> Option<&str> {
        self.has_extended_fields()
            .then(|| trim(&self.raw.vol_lab))
    }

    pub fn fs_type(&self) -> Option<&str> {
        self.has_extended_fields()
            .then(|| trim(&self.raw.fil_sys_type))
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            sector_bytes: self.raw.byts_per_sec,
            cluster_sectors: self.raw.sec_per_clus,
            reserved_sectors: self.raw.rsvd_sec_cnt,
            fat_count: self.raw.num_fats,
            root_entries: self.raw.root_ent_cnt,
            fat_sectors: self.raw.fat_sz16,
            total_sectors: self.total_sectors as u32,
            media: self.raw.media,
        }
    }

    fn has_extended_fields(&self) -> bool {
        matches!(self.raw.boot_sig, 0x28 | 0x29)
    }
}

fn trim(bytes: &[u8]) -> &str {
    core::str::from_utf8(bytes).unwrap_or("").trim_end()
}
