//! # 打开文件表
//!
//! 定长槽位数组，槽位下标即交给调用者的文件句柄。
//! 槽位状态机：空闲 --open--> 绑定(offset) --close--> 空闲。

use crate::{Error, MAX_OPEN_FILES, Result};

/// 文件句柄：打开文件表的槽位下标
pub type FileHandle = usize;

#[derive(Debug, Clone, Copy, Default)]
struct OpenFile {
    /// 绑定的 inode，空表示槽位空闲
    inode_id: Option<u32>,
    /// 游标
    offset: usize,
}

#[derive(Debug)]
pub struct FileHandleTable {
    slots: [OpenFile; MAX_OPEN_FILES],
}

impl FileHandleTable {
    pub fn new() -> Self {
        Self {
            slots: [OpenFile::default(); MAX_OPEN_FILES],
        }
    }

    /// 把最小的空闲槽位绑定到 inode 上，游标归零
    pub fn bind(&mut self, inode_id: u32) -> Result<FileHandle> {
        let (fd, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.inode_id.is_none())
            .ok_or(Error::NoFreeHandle)?;

        *slot = OpenFile {
            inode_id: Some(inode_id),
            offset: 0,
        };
        Ok(fd)
    }

    /// 释放槽位；越界或未绑定的句柄被忽略，返回是否真的释放了
    pub fn release(&mut self, fd: FileHandle) -> bool {
        match self.slots.get_mut(fd) {
            Some(slot) if slot.inode_id.is_some() => {
                *slot = OpenFile::default();
                true
            }
            _ => false,
        }
    }

    /// 句柄绑定的 inode 与游标
    pub fn get(&self, fd: FileHandle) -> Result<(u32, usize)> {
        self.slots
            .get(fd)
            .and_then(|slot| slot.inode_id.map(|inode_id| (inode_id, slot.offset)))
            .ok_or(Error::InvalidHandle)
    }

    pub fn set_offset(&mut self, fd: FileHandle, offset: usize) -> Result<()> {
        match self.slots.get_mut(fd) {
            Some(slot) if slot.inode_id.is_some() => {
                slot.offset = offset;
                Ok(())
            }
            _ => Err(Error::InvalidHandle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_takes_lowest_free_slot() {
        let mut table = FileHandleTable::new();
        assert_eq!(table.bind(3), Ok(0));
        assert_eq!(table.bind(3), Ok(1));
        assert_eq!(table.bind(5), Ok(2));

        assert!(table.release(1));
        assert_eq!(table.bind(7), Ok(1));
        assert_eq!(table.get(1), Ok((7, 0)));
    }

    #[test]
    fn table_runs_out_of_slots() {
        let mut table = FileHandleTable::new();
        for fd in 0..MAX_OPEN_FILES {
            assert_eq!(table.bind(0), Ok(fd));
        }
        assert_eq!(table.bind(0), Err(Error::NoFreeHandle));
    }

    #[test]
    fn release_resets_offset_and_ignores_bad_handles() {
        let mut table = FileHandleTable::new();
        let fd = table.bind(2).unwrap();
        table.set_offset(fd, 42).unwrap();
        assert_eq!(table.get(fd), Ok((2, 42)));

        assert!(!table.release(MAX_OPEN_FILES));
        assert!(!table.release(fd + 1));
        assert!(table.release(fd));
        assert!(!table.release(fd));

        assert_eq!(table.get(fd), Err(Error::InvalidHandle));
        assert_eq!(table.set_offset(fd, 1), Err(Error::InvalidHandle));
        assert_eq!(table.bind(2), Ok(fd));
        assert_eq!(table.get(fd), Ok((2, 0)));
    }
}
