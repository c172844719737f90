use core::fmt;

/// FAT12的簇编号，只有低12位有效
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClusterId(u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterError {
    /// 0x000, unallocated
    Free,
    /// 0x001 and 0xFF0..=0xFF6
    Reserved,
    /// 0xFF7, marked bad
    Defective,
    /// 0xFF8..=0xFFF, end of chain
    Eof,
    /// Beyond the FAT or the data area.
    OutOfRange,
    /// The chain visits more clusters than the volume has.
    Cycle,
}

impl fmt::Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Free => "free cluster in chain",
            Self::Reserved => "reserved cluster in chain",
            Self::Defective => "bad cluster in chain",
            Self::Eof => "unexpected end of chain",
            Self::OutOfRange => "cluster out of range",
            Self::Cycle => "cluster chain loops",
        };
        f.write_str(msg)
    }
}

impl From<u16> for ClusterId {
    fn from(raw: u16) -> Self {
        Self::new(raw)
    }
}

impl From<ClusterId> for u16 {
    fn from(id: ClusterId) -> Self {
        id.0
    }
}

impl From<ClusterId> for usize {
    fn from(id: ClusterId) -> Self {
        id.0 as usize
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

impl ClusterId {
    pub const FREE: Self = Self(0);

    /// 最小的可用簇号
    pub const MIN: Self = Self(2);

    pub const BAD: Self = Self(0xFF7);

    /// 写入FAT时使用的链表结束标记
    pub const EOF: Self = Self(0xFFF);

    pub const fn new(raw: u16) -> Self {
        Self(raw & 0x0FFF)
    }

    pub const fn is_eof(&self) -> bool {
        self.0 >= 0xFF8
    }

    pub fn validate(self) -> Result<Self, ClusterError> {
        match self.0 {
            0x000 => Err(ClusterError::Free),
            0x001 | 0xFF0..=0xFF6 => Err(ClusterError::Reserved),
            0xFF7 => Err(ClusterError::Defective),
            0xFF8..=0xFFF => Err(ClusterError::Eof),
            _ => Ok(self),
        }
    }

    /// 数据区不占有`ClusterId::MIN`前面的簇，返回其在数据区中的序号
    pub const fn index(&self) -> usize {
        self.0.saturating_sub(Self::MIN.0) as usize
    }
}
