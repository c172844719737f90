use alloc::vec::Vec;

use crate::sector;
use crate::volume::root::ShortDirEntry;
use crate::{ClusterError, ClusterId, Error, FatFileSystem, Region};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Positioned(ClusterId),
    /// 目录项的首簇字段本身就不合法
    Rejected(Error),
    Done,
    Failed,
}

/// 沿簇链表逐簇读出文件内容。
///
/// 每步产出一个簇中属于文件的部分，总量不超过目录项记录的大小；
/// 出错后不再产出任何东西。
#[derive(Debug)]
pub struct FileReader<'fs> {
    fs: &'fs FatFileSystem,
    state: State,
    size: usize,
    remaining: usize,
    /// 已经走过的簇数
    steps: usize,
}

impl<'fs> FileReader<'fs> {
    pub(crate) fn new(fs: &'fs FatFileSystem, dirent: &ShortDirEntry) -> Self {
        let size = dirent.size();
        let state = match dirent.cluster_id() {
            _ if size == 0 => State::Done,
            Ok(id) => State::Positioned(id),
            Err(e) => State::Rejected(e.into()),
        };

        Self {
            fs,
            state,
            size,
            remaining: size,
            steps: 0,
        }
    }

    /// 尚未读出的字节数
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    fn step(&mut self, id: ClusterId) -> Result<Vec<u8>, Error> {
        // 只有链表头会在这里遇到坏簇标记，链表中间的在`next`时就拦下了
        let sectors = self.fs.data_area().cluster(id).map_err(|e| match e {
            ClusterError::Defective => Error::BadCluster(id),
            e => e.into(),
        })?;

        // 文件已读满时不必再读盘，但链表仍要走到结尾
        let data = if self.remaining > 0 {
            let mut data = sector::read(self.fs.device(), sectors, self.fs.bpb().sector_bytes())
                .map_err(Error::io(Region::Data))?;
            data.truncate(self.remaining);
            self.remaining -= data.len();
            data
        } else {
            Vec::new()
        };

        self.steps += 1;
        self.state = match self.fs.fat().next(id) {
            Ok(Some(_)) if self.steps >= self.fs.bpb().clusters() => {
                return Err(ClusterError::Cycle.into());
            }
            Ok(Some(next)) => State::Positioned(next),
            Ok(None) => State::Done,
            Err(ClusterError::Defective) => return Err(Error::BadCluster(id)),
            Err(e) => return Err(e.into()),
        };
        log::trace!("cluster {id} -> {:?}", self.state);

        if self.state == State::Done && self.remaining > 0 {
            return Err(Error::ChainTooShort {
                expected: self.size,
                read: self.size - self.remaining,
            });
        }

        Ok(data)
    }
}

impl Iterator for FileReader<'_> {
    type Item = Result<Vec<u8>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = match self.state {
                State::Positioned(id) => id,
                State::Rejected(e) => {
                    self.state = State::Failed;
                    return Some(Err(e));
                }
                State::Done | State::Failed => return None,
            };
            // 成功时由`step`改写
            self.state = State::Failed;

            match self.step(id) {
                Ok(data) if data.is_empty() => continue,
                Ok(data) => return Some(Ok(data)),
                Err(e) => {
                    self.state = State::Failed;
                    return Some(Err(e));
                }
            }
        }
    }
}
