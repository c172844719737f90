//! 保留区，首个扇区即启动扇区

mod bpb;

pub(crate) use self::bpb::RawBpb;
pub use self::bpb::{Bpb, BpbError, ClusterSectors, Geometry, SectorBytes};
