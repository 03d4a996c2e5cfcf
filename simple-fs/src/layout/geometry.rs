use core::mem;

use crate::layout::DiskInode;
use crate::{BLOCK_BITS, BLOCK_SIZE, NUM_INODES};

/// 各区域占用的块数，超级块固定占第 0 块
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub inode_bitmap_blocks: u32,
    pub inode_area_blocks: u32,
    pub data_bitmap_blocks: u32,
    pub data_area_blocks: u32,
}

impl Geometry {
    pub const INODE_SIZE: usize = mem::size_of::<DiskInode>();
    pub const INODES_PER_BLOCK: usize = BLOCK_SIZE / Self::INODE_SIZE;

    /// 为含 `data_blocks` 个数据块的卷规划布局
    pub fn new(data_blocks: u32) -> Self {
        Self {
            inode_bitmap_blocks: NUM_INODES.div_ceil(BLOCK_BITS) as u32,
            inode_area_blocks: NUM_INODES.div_ceil(Self::INODES_PER_BLOCK) as u32,
            data_bitmap_blocks: (data_blocks as usize).div_ceil(BLOCK_BITS) as u32,
            data_area_blocks: data_blocks,
        }
    }

    /// 块设备至少需要的块数
    #[inline]
    pub fn total_blocks(&self) -> u32 {
        self.data_area_start() + self.data_area_blocks
    }

    #[inline]
    pub fn inode_bitmap_start(&self) -> u32 {
        1
    }

    #[inline]
    pub fn inode_area_start(&self) -> u32 {
        self.inode_bitmap_start() + self.inode_bitmap_blocks
    }

    #[inline]
    pub fn data_bitmap_start(&self) -> u32 {
        self.inode_area_start() + self.inode_area_blocks
    }

    #[inline]
    pub fn data_area_start(&self) -> u32 {
        self.data_bitmap_start() + self.data_bitmap_blocks
    }
}
