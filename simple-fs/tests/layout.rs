use std::mem;

use simple_fs::{BLOCK_SIZE, DiskInode, Geometry, MAX_FILE_SIZE, MAX_NAME_STRLEN};

#[test]
fn disk_inode() {
    assert_eq!(
        4 + MAX_NAME_STRLEN + 1 + 4 + 4 * MAX_FILE_SIZE,
        mem::size_of::<DiskInode>()
    );
    assert_eq!(BLOCK_SIZE / mem::size_of::<DiskInode>(), Geometry::INODES_PER_BLOCK);
}

#[test]
fn geometry() {
    let geometry = Geometry::new(64);
    assert_eq!(geometry.inode_bitmap_blocks, 1);
    assert_eq!(geometry.inode_area_blocks, 5);
    assert_eq!(geometry.data_bitmap_blocks, 1);
    assert_eq!(geometry.data_area_start(), 8);
    assert_eq!(geometry.total_blocks(), 72);

    // 一个位图块能管理 4096 个数据块
    assert_eq!(Geometry::new(4096).data_bitmap_blocks, 1);
    assert_eq!(Geometry::new(4097).data_bitmap_blocks, 2);
}

#[test]
fn fresh_inode_has_no_blocks() {
    let inode = DiskInode::default();
    assert!(!inode.is_in_use());
    assert_eq!(inode.size(), 0);
    assert_eq!(inode.blocks().count(), 0);
    assert!((0..MAX_FILE_SIZE).all(|index| inode.block(index).is_none()));
}
