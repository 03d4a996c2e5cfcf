//! # 文件操作层
//!
//! 对外的全部文件操作：按名字创建、删除、打开，按句柄读写、定位、关闭。
//!
//! 读写**不会**移动句柄的游标，调用者需要自己 [`SimpleFileSystem::seek`]。
//! 删除文件时不检查也不作废指向它的句柄。

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::handle::FileHandle;
use crate::layout::DiskInode;
use crate::{Error, MAX_NAME_STRLEN, NUM_INODES, Result, SimpleFileSystem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub inode: u32,
    /// 文件字节数
    pub size: usize,
    /// 占用的数据块数
    pub blocks: usize,
}

impl SimpleFileSystem {
    /// 创建空文件并返回其 inode ID
    pub fn create(&mut self, name: &str) -> Result<u32> {
        if name.len() > MAX_NAME_STRLEN {
            return Err(Error::NameTooLong);
        }
        // 盘上的名字以 \0 结尾，含 \0 的名字存进去就对不上了
        if name.contains('\0') {
            return Err(Error::InvalidName);
        }
        // 确认没有已创建的同名项
        if self.resolve(name).is_ok() {
            return Err(Error::DuplicateName);
        }

        let inode_id = self.alloc_inode().ok_or(Error::NoFreeInode)?;
        let mut inode = DiskInode::default();
        inode.init(name);
        self.write_inode(inode_id, &inode);
        self.sync();

        log::debug!("create {name:?}: inode {inode_id}");
        Ok(inode_id)
    }

    /// 删除文件，归还它的数据块与 inode；文件不存在时什么也不做
    pub fn delete(&mut self, name: &str) {
        let Ok(inode_id) = self.resolve(name) else {
            return;
        };

        let inode = self.read_inode(inode_id);
        let mut freed = 0;
        for block_id in inode.blocks() {
            self.free_data_block(block_id);
            freed += 1;
        }
        self.free_inode(inode_id);
        self.sync();

        log::debug!("delete {name:?}: inode {inode_id}, {freed} block(s)");
    }

    pub fn open(&mut self, name: &str) -> Result<FileHandle> {
        let inode_id = self.resolve(name)?;
        self.handles.bind(inode_id)
    }

    /// 关闭句柄；无效句柄被静默忽略
    pub fn close(&mut self, fd: FileHandle) {
        self.handles.release(fd);
    }

    /// 游标相对当前位置移动 `delta` 字节，结果必须落在 `[0, 文件大小]` 内
    pub fn seek(&mut self, fd: FileHandle, delta: isize) -> Result<()> {
        let (inode_id, offset) = self.handles.get(fd)?;
        let size = self.read_inode(inode_id).size();

        let new_offset = offset
            .checked_add_signed(delta)
            .filter(|&new_offset| new_offset <= size)
            .ok_or(Error::OutOfBounds)?;
        self.handles.set_offset(fd, new_offset)
    }

    /// 当前游标
    pub fn tell(&self, fd: FileHandle) -> Result<usize> {
        self.handles.get(fd).map(|(_, offset)| offset)
    }

    /// 从游标处读出恰好 `len` 字节
    pub fn read(&self, fd: FileHandle, len: usize) -> Result<Vec<u8>> {
        let (inode_id, offset) = self.handles.get(fd)?;
        let inode = self.read_inode(inode_id);

        // 先查界再开缓冲区
        offset
            .checked_add(len)
            .filter(|&end| end <= inode.size())
            .ok_or(Error::OutOfBounds)?;

        let mut buf = vec![0; len];
        self.read_span(&inode, offset, &mut buf)?;
        Ok(buf)
    }

    /// 把 `buf` 写到游标处，文件随之增长
    pub fn write(&mut self, fd: FileHandle, buf: &[u8]) -> Result<()> {
        let (inode_id, offset) = self.handles.get(fd)?;
        let mut inode = self.read_inode(inode_id);

        self.write_span(&mut inode, offset, buf)?;
        self.write_inode(inode_id, &inode);
        self.sync();
        Ok(())
    }

    pub fn stat(&self, name: &str) -> Result<Stat> {
        let inode_id = self.resolve(name)?;
        let inode = self.read_inode(inode_id);

        Ok(Stat {
            inode: inode_id,
            size: inode.size(),
            blocks: inode.blocks().count(),
        })
    }

    /// 按 inode 顺序列出所有文件
    pub fn list(&self) -> Vec<(u32, String)> {
        (0..NUM_INODES as u32)
            .filter_map(|inode_id| {
                let inode = self.read_inode(inode_id);
                inode
                    .is_in_use()
                    .then(|| (inode_id, String::from_utf8_lossy(inode.name()).into_owned()))
            })
            .collect()
    }
}
