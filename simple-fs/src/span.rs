//! # 块跨度读写引擎
//!
//! 把逻辑字节区间 `[offset, offset + len)` 拆成块级操作：
//! 首块可能只涉及尾部，末块可能只涉及头部，中间块整块读写。
//! 区间落在同一块内时，首块即末块。

use alloc::vec::Vec;
use core::ops::{Range, RangeInclusive};

use crate::layout::DiskInode;
use crate::{BLOCK_SIZE, DataBlock, Error, MAX_FILE_SIZE, Result, SimpleFileSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockSpan {
    pub start_block: usize,
    pub start_in_block: usize,
    pub end_block: usize,
    /// 末字节的块内偏移
    pub end_in_block: usize,
}

/// 跨度在单个块内的片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    /// 文件内的块索引
    pub block_index: usize,
    /// 块内的字节范围
    pub in_block: Range<usize>,
    /// 调用者缓冲区内的字节范围
    pub in_buf: Range<usize>,
}

impl BlockSpan {
    /// 空区间没有跨度
    pub fn new(offset: usize, len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let last = offset + len - 1;

        Some(Self {
            start_block: offset / BLOCK_SIZE,
            start_in_block: offset % BLOCK_SIZE,
            end_block: last / BLOCK_SIZE,
            end_in_block: last % BLOCK_SIZE,
        })
    }

    #[inline]
    pub fn blocks(&self) -> RangeInclusive<usize> {
        self.start_block..=self.end_block
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> {
        let span = *self;
        let mut buf_start = 0;

        self.blocks().map(move |block_index| {
            let start = if block_index == span.start_block {
                span.start_in_block
            } else {
                0
            };
            let end = if block_index == span.end_block {
                span.end_in_block + 1
            } else {
                BLOCK_SIZE
            };

            let in_buf = buf_start..buf_start + (end - start);
            buf_start = in_buf.end;
            Segment {
                block_index,
                in_block: start..end,
                in_buf,
            }
        })
    }
}

impl SimpleFileSystem {
    /// 从文件的 `offset` 处读满 `buf`，不允许读出文件末尾
    pub(crate) fn read_span(&self, inode: &DiskInode, offset: usize, buf: &mut [u8]) -> Result<()> {
        if offset + buf.len() > inode.size() {
            return Err(Error::OutOfBounds);
        }
        let Some(span) = BlockSpan::new(offset, buf.len()) else {
            return Ok(());
        };
        if span.end_block >= MAX_FILE_SIZE {
            return Err(Error::FileTooLarge);
        }

        for segment in span.segments() {
            let dest = &mut buf[segment.in_buf];
            match inode.block(segment.block_index) {
                Some(block_id) => self.caches.get(block_id as usize).lock().map(
                    0,
                    |data_block: &DataBlock| dest.copy_from_slice(&data_block[segment.in_block]),
                ),
                // 文件大小之内不该有空洞，有的话按零读出
                None => dest.fill(0),
            }
        }

        Ok(())
    }

    /// 把 `buf` 写到文件的 `offset` 处，必要时扩展文件。
    ///
    /// 只修改传入的 `inode` 副本，持久化由调用者负责；
    /// 失败时 `inode` 保持原样。
    pub(crate) fn write_span(&self, inode: &mut DiskInode, offset: usize, buf: &[u8]) -> Result<()> {
        if offset > inode.size() {
            return Err(Error::OutOfBounds);
        }
        let Some(span) = BlockSpan::new(offset, buf.len()) else {
            return Ok(());
        };
        if span.end_block >= MAX_FILE_SIZE {
            return Err(Error::FileTooLarge);
        }

        self.alloc_span(inode, &span)?;

        for segment in span.segments() {
            let Some(block_id) = inode.block(segment.block_index) else {
                unreachable!("block {} allocated above", segment.block_index);
            };
            let src = &buf[segment.in_buf];
            // 块缓存里已有旧内容，只覆盖本片段
            self.caches.get(block_id as usize).lock().map_mut(
                0,
                |data_block: &mut DataBlock| data_block[segment.in_block].copy_from_slice(src),
            );
        }

        inode.set_size(inode.size().max(offset + buf.len()));
        Ok(())
    }

    /// 为跨度内未分配的位置分配数据块，要么全部成功，要么一块不留
    fn alloc_span(&self, inode: &mut DiskInode, span: &BlockSpan) -> Result<()> {
        let mut fresh: Vec<(usize, u32)> = Vec::new();

        for block_index in span.blocks() {
            if inode.block(block_index).is_some() {
                continue;
            }

            let Some(block_id) = self.alloc_data_block() else {
                log::warn!(
                    "data blocks exhausted, releasing {} block(s) taken by this write",
                    fresh.len()
                );
                for (_, block_id) in fresh {
                    self.free_data_block(block_id);
                }
                return Err(Error::AllocationExhausted);
            };
            fresh.push((block_index, block_id));
        }

        for (block_index, block_id) in fresh {
            log::trace!("file block {block_index} -> device block {block_id}");
            inode.set_block(block_index, Some(block_id));
        }

        Ok(())
    }
}
