#![cfg_attr(not(test), no_std)]

extern crate alloc;

/* simple-fs 的整体架构，自上而下 */

// 文件操作层：创建、删除、打开、关闭、定位
mod vfs;
pub use vfs::Stat;

// 块跨度读写引擎：把字节区间拆成块级操作
mod span;

// 名字解析：线性扫描 inode 表
mod resolve;

// 打开文件表
mod handle;
pub use handle::FileHandle;

// 磁盘块管理器层：inode 表与数据块分配
mod sfs;
pub use sfs::SimpleFileSystem;

// 磁盘数据结构层：表示磁盘文件系统的数据结构
mod layout;
pub use layout::{DiskInode, Geometry, InodeStatus};

// 块缓存层：内存上的磁盘块数据缓存
mod block_cache;

mod error;
pub use error::{Error, Result};

pub use block_dev::BlockDevice;

pub const MAGIC: u32 = 0x5346_0001;
/// 每块字节数
pub const BLOCK_SIZE: usize = 512;
pub const BLOCK_BITS: usize = BLOCK_SIZE * 8;
/// inode 表容量，即最多能容纳的文件数
pub const NUM_INODES: usize = 32;
/// 每个 inode 的直接索引块个数，文件最大为 `MAX_FILE_SIZE * BLOCK_SIZE` 字节
pub const MAX_FILE_SIZE: usize = 8;
/// 同时打开的文件数上限
pub const MAX_OPEN_FILES: usize = 20;
/// 文件名最大字节数
pub const MAX_NAME_STRLEN: usize = 27;

type DataBlock = [u8; BLOCK_SIZE];
