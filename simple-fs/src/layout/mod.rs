//! # 磁盘数据结构层
//!
//! simple-fs 的磁盘布局：
//! 超级块 | 索引节点位图 | 索引节点区域 | 数据块位图 | 数据块区域

mod super_block;
pub use super_block::SuperBlock;

mod geometry;
pub use geometry::Geometry;

mod bitmap;
pub use bitmap::Bitmap;

mod inode;
pub use inode::{DiskInode, InodeStatus};
