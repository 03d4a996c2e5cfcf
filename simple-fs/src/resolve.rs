//! # 名字解析
//!
//! 扁平命名空间，没有索引：逐个扫描 inode 表，
//! 返回第一个名字完全相同的在用 inode。

use crate::{Error, NUM_INODES, Result, SimpleFileSystem};

impl SimpleFileSystem {
    pub(crate) fn resolve(&self, name: &str) -> Result<u32> {
        (0..NUM_INODES as u32)
            .find(|&inode_id| {
                let inode = self.read_inode(inode_id);
                inode.is_in_use() && inode.name() == name.as_bytes()
            })
            .ok_or(Error::NotFound)
    }
}
