//! 磁盘上的 inode 记录
//!
//! 只有直接索引：`direct_blocks[i]` 记录文件第 `i` 块所在的块ID，
//! 未分配的位置存放 `UNALLOCATED`。

use crate::{BLOCK_SIZE, MAX_FILE_SIZE, MAX_NAME_STRLEN};

/// 未分配块的标记
const UNALLOCATED: u32 = u32::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct DiskInode {
    /// [`InodeStatus`] 的原始值，零值即空闲
    status: u32,
    // 最后一字节留给 \0
    name: [u8; MAX_NAME_STRLEN + 1],
    // 不用usize是为了严控布局
    file_size: u32,
    direct_blocks: [u32; MAX_FILE_SIZE],
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum InodeStatus {
    #[default]
    Free = 0,
    InUse = 1,
}

impl DiskInode {
    /// 初始化为空文件，调用者保证 `name` 不超长
    pub fn init(&mut self, name: &str) {
        let bytes = name.as_bytes();
        let mut raw_name = [0; MAX_NAME_STRLEN + 1];
        raw_name[..bytes.len()].copy_from_slice(bytes);

        *self = Self {
            status: InodeStatus::InUse as u32,
            name: raw_name,
            ..Default::default()
        }
    }

    #[inline]
    pub fn status(&self) -> InodeStatus {
        if self.status == InodeStatus::InUse as u32 {
            InodeStatus::InUse
        } else {
            InodeStatus::Free
        }
    }

    #[inline]
    pub fn is_in_use(&self) -> bool {
        self.status() == InodeStatus::InUse
    }

    /// 文件名的原始字节，截止到首个 \0
    pub fn name(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(self.name.len());
        &self.name[..len]
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.file_size as usize
    }

    #[inline]
    pub fn set_size(&mut self, size: usize) {
        self.file_size = size as u32;
    }

    /// 文件第 `index` 块所在的块ID
    #[inline]
    pub fn block(&self, index: usize) -> Option<u32> {
        let id = self.direct_blocks[index];
        (id != UNALLOCATED).then_some(id)
    }

    #[inline]
    pub fn set_block(&mut self, index: usize, block_id: Option<u32>) {
        self.direct_blocks[index] = block_id.unwrap_or(UNALLOCATED);
    }

    /// 所有已分配的块ID
    pub fn blocks(&self) -> impl Iterator<Item = u32> {
        self.direct_blocks
            .into_iter()
            .filter(|&id| id != UNALLOCATED)
    }

    /// 计算容纳指定数据量需要多少个**数据块**
    #[inline]
    pub fn count_data_block(size: usize) -> usize {
        size.div_ceil(BLOCK_SIZE)
    }
}

impl Default for DiskInode {
    fn default() -> Self {
        Self {
            status: InodeStatus::Free as u32,
            name: [0; MAX_NAME_STRLEN + 1],
            file_size: 0,
            direct_blocks: [UNALLOCATED; MAX_FILE_SIZE],
        }
    }
}
