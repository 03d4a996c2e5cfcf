//! # 磁盘块管理器层
//!
//! 构建出磁盘的布局并使用：inode 表的读写与分配、数据块的分配与回收。
//! 打开文件表也挂在 [`SimpleFileSystem`] 上，整个卷只有这一个服务对象。

use alloc::sync::Arc;

use block_dev::BlockDevice;

use crate::DataBlock;
use crate::block_cache::BlockCacheManager;
use crate::handle::FileHandleTable;
use crate::layout::*;
use crate::{BLOCK_SIZE, Error, NUM_INODES, Result};

#[derive(Debug)]
pub struct SimpleFileSystem {
    pub(crate) caches: BlockCacheManager,
    pub(crate) handles: FileHandleTable,
    geometry: Geometry,
    inode_bitmap: Bitmap,
    data_bitmap: Bitmap,
}

impl SimpleFileSystem {
    /// 在块设备上建立新的空卷，设备至少要有 [`Geometry::total_blocks`] 块
    pub fn format(block_device: Arc<dyn BlockDevice>, geometry: Geometry) -> Self {
        let zero: DataBlock = [0; BLOCK_SIZE];
        for i in 0..geometry.total_blocks() {
            block_device.write_block(i as usize, &zero);
        }

        let sfs = Self::assemble(BlockCacheManager::new(block_device), geometry);

        sfs.caches
            .get(0)
            .lock()
            .map_mut(0, |super_block: &mut SuperBlock| super_block.init(&geometry));
        // 零值的直接索引是合法块号，统一写成未分配
        for inode_id in 0..NUM_INODES as u32 {
            sfs.write_inode(inode_id, &DiskInode::default());
        }
        sfs.sync();

        log::debug!(
            "formatted volume: {} blocks, {} data blocks",
            geometry.total_blocks(),
            geometry.data_area_blocks
        );
        sfs
    }

    /// 挂载已有的卷
    pub fn mount(block_device: Arc<dyn BlockDevice>) -> Result<Self> {
        let caches = BlockCacheManager::new(block_device);
        let geometry = caches
            .get(0)
            .lock()
            .map(0, |super_block: &SuperBlock| {
                super_block.is_valid().then(|| super_block.geometry())
            })
            .ok_or(Error::InvalidImage)?;

        log::debug!("mounted volume: {geometry:?}");
        Ok(Self::assemble(caches, geometry))
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// 读出 inode 记录的副本
    pub fn read_inode(&self, inode_id: u32) -> DiskInode {
        let (block_id, block_offset) = self.disk_inode_pos(inode_id);
        self.caches
            .get(block_id)
            .lock()
            .map(block_offset, |disk_inode: &DiskInode| disk_inode.clone())
    }

    pub(crate) fn write_inode(&self, inode_id: u32, inode: &DiskInode) {
        let (block_id, block_offset) = self.disk_inode_pos(inode_id);
        self.caches
            .get(block_id)
            .lock()
            .map_mut(block_offset, |disk_inode: &mut DiskInode| {
                disk_inode.clone_from(inode)
            });
    }

    /// 在磁盘上分配新的 inode 并返回其ID
    #[inline]
    pub(crate) fn alloc_inode(&self) -> Option<u32> {
        self.inode_bitmap.alloc(&self.caches)
    }

    /// 回收 inode，记录恢复为空闲
    pub(crate) fn free_inode(&self, inode_id: u32) {
        self.write_inode(inode_id, &DiskInode::default());
        self.inode_bitmap.dealloc(&self.caches, inode_id);
    }

    /// 在磁盘上分配新的数据块并返回其ID
    #[inline]
    pub(crate) fn alloc_data_block(&self) -> Option<u32> {
        self.data_bitmap
            .alloc(&self.caches)
            .map(|index| self.geometry.data_area_start() + index)
    }

    /// 回收数据块，块内容清零以便下次分配
    pub(crate) fn free_data_block(&self, block_id: u32) {
        self.caches
            .get(block_id as usize)
            .lock()
            .map_mut(0, |data_block: &mut DataBlock| data_block.fill(0));
        self.data_bitmap
            .dealloc(&self.caches, block_id - self.geometry.data_area_start())
    }

    pub fn free_inodes(&self) -> usize {
        self.inode_bitmap.capacity() - self.inode_bitmap.allocated(&self.caches)
    }

    pub fn free_data_blocks(&self) -> usize {
        self.data_bitmap.capacity() - self.data_bitmap.allocated(&self.caches)
    }

    /// 把缓存中的脏块写回块设备
    #[inline]
    pub fn sync(&self) {
        self.caches.sync_all();
    }
}

impl SimpleFileSystem {
    fn assemble(caches: BlockCacheManager, geometry: Geometry) -> Self {
        Self {
            caches,
            handles: FileHandleTable::new(),
            geometry,
            inode_bitmap: Bitmap::new(
                geometry.inode_bitmap_start() as usize,
                geometry.inode_bitmap_blocks as usize,
                NUM_INODES,
            ),
            data_bitmap: Bitmap::new(
                geometry.data_bitmap_start() as usize,
                geometry.data_bitmap_blocks as usize,
                geometry.data_area_blocks as usize,
            ),
        }
    }

    /// 通过ID获取 inode 在磁盘上的位置：**块ID**以及**块内偏移**
    fn disk_inode_pos(&self, inode_id: u32) -> (usize, usize) {
        assert!((inode_id as usize) < NUM_INODES, "inode {inode_id} out of table");
        let inode_id = inode_id as usize;
        let block_id =
            self.geometry.inode_area_start() as usize + inode_id / Geometry::INODES_PER_BLOCK;
        let block_offset = inode_id % Geometry::INODES_PER_BLOCK * Geometry::INODE_SIZE;

        (block_id, block_offset)
    }
}
