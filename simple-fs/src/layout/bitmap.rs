use crate::BLOCK_BITS;
use crate::block_cache::BlockCacheManager;

/// 位图区域内块的结构
type BitmapBlock = [u64; BLOCK_BITS / 64];

/// 位图区域，记录其指示区域的块分配情况
///
/// 最后一块位图往往只有前一部分位有对应的块，
/// 分配与计数都只看 [`Bitmap::mask`] 圈出的有效位。
#[derive(Debug)]
pub struct Bitmap {
    /// 位图的起始块
    start_block_id: usize,
    /// 所指示区域的实际大小
    len: usize,
}

/// 块编号
struct BlockID(u32);

impl Bitmap {
    #[inline]
    pub fn new(start_block_id: usize, blocks: usize, len: usize) -> Self {
        debug_assert!(len <= blocks * BLOCK_BITS);
        Self {
            start_block_id,
            len,
        }
    }

    /// 位图所指示区域的总块数
    #[inline]
    pub fn capacity(&self) -> usize {
        self.len
    }

    /// 在指示区域内分配编号最小的空闲块。
    /// 若区域已满，则返回空。
    pub fn alloc(&self, caches: &BlockCacheManager) -> Option<u32> {
        self.block_indexes().find_map(|block_index| {
            let cache = caches.get(self.start_block_id + block_index);
            let mut cache = cache.lock();
            let bitmap_block: &mut BitmapBlock = cache.get_mut(0);

            // 找到第一个还有空闲有效位的组
            let (group_index, free) =
                bitmap_block
                    .iter()
                    .enumerate()
                    .find_map(|(group_index, &bits)| {
                        let free = !bits & self.mask(block_index, group_index);
                        (free != 0).then_some((group_index, free))
                    })?;
            let ingroup_index = free.trailing_zeros() as usize;

            bitmap_block[group_index] |= 1 << ingroup_index;
            Some(BlockID::encode(block_index, group_index, ingroup_index))
        })
    }

    pub fn dealloc(&self, caches: &BlockCacheManager, block_id: u32) {
        assert!((block_id as usize) < self.len);
        let (block_index, group_index, ingroup_index) = BlockID(block_id).decode();
        let cache = caches.get(self.start_block_id + block_index);
        let mut cache = cache.lock();
        let bitmap_block: &mut BitmapBlock = cache.get_mut(0);

        // 编号一定得有对应的位
        assert_ne!(bitmap_block[group_index] & (1 << ingroup_index), 0);

        bitmap_block[group_index] &= !(1 << ingroup_index);
    }

    /// 已分配的块数
    pub fn allocated(&self, caches: &BlockCacheManager) -> usize {
        self.block_indexes()
            .map(|block_index| {
                caches
                    .get(self.start_block_id + block_index)
                    .lock()
                    .map(0, |bitmap_block: &BitmapBlock| {
                        bitmap_block
                            .iter()
                            .enumerate()
                            .map(|(group_index, &bits)| {
                                (bits & self.mask(block_index, group_index)).count_ones() as usize
                            })
                            .sum::<usize>()
                    })
            })
            .sum()
    }

    /// 含有效位的位图块
    #[inline]
    fn block_indexes(&self) -> impl Iterator<Item = usize> {
        0..self.len.div_ceil(BLOCK_BITS)
    }

    /// 位组中落在区域内的位
    fn mask(&self, block_index: usize, group_index: usize) -> u64 {
        let first = block_index * BLOCK_BITS + group_index * 64;
        match self.len.saturating_sub(first) {
            0 => 0,
            valid @ 1..64 => (1 << valid) - 1,
            _ => u64::MAX,
        }
    }
}

impl BlockID {
    /// 线性映射编码得到块ID
    #[inline]
    fn encode(block_index: usize, group_index: usize, ingroup_index: usize) -> u32 {
        (block_index * BLOCK_BITS + group_index * 64 + ingroup_index) as u32
    }

    fn decode(self) -> (usize, usize, usize) {
        let mut block_id = self.0 as usize;

        let block_index = block_id / BLOCK_BITS;
        block_id %= BLOCK_BITS;
        (block_index, block_id / 64, block_id % 64)
    }
}
