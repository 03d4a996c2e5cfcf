use std::sync::Arc;

use block_dev::RamDisk;
use rand::Rng;
use simple_fs::{BLOCK_SIZE, Error, Geometry, MAX_FILE_SIZE, SimpleFileSystem};

const MAX_BYTES: usize = MAX_FILE_SIZE * BLOCK_SIZE;

fn new_fs(data_blocks: u32) -> SimpleFileSystem {
    let geometry = Geometry::new(data_blocks);
    let disk = RamDisk::new(BLOCK_SIZE, geometry.total_blocks() as usize);
    SimpleFileSystem::format(Arc::new(disk), geometry)
}

/// 在游标 `offset` 处读 `len` 字节，读完游标回到原处
fn read_at(sfs: &mut SimpleFileSystem, fd: usize, offset: usize, len: usize) -> Vec<u8> {
    let here = sfs.tell(fd).unwrap() as isize;
    sfs.seek(fd, offset as isize - here).unwrap();
    let data = sfs.read(fd, len).unwrap();
    sfs.seek(fd, here - offset as isize).unwrap();
    data
}

#[test]
fn scenario_two_blocks() {
    let mut sfs = new_fs(16);
    sfs.create("f").unwrap();
    let fd = sfs.open("f").unwrap();
    assert_eq!(fd, 0);

    sfs.write(fd, b"0123456789").unwrap();
    assert_eq!(sfs.stat("f").unwrap().size, 10);

    sfs.seek(fd, 0).unwrap();
    assert_eq!(sfs.read(fd, 10).unwrap(), b"0123456789");

    sfs.seek(fd, 10).unwrap();
    sfs.write(fd, &[b'A'; 512]).unwrap();
    let stat = sfs.stat("f").unwrap();
    assert_eq!(stat.size, 522);
    assert_eq!(stat.blocks, 2);

    assert_eq!(read_at(&mut sfs, fd, 0, 10), b"0123456789");
    assert_eq!(read_at(&mut sfs, fd, 10, 512), [b'A'; 512]);
}

#[test]
fn read_and_write_leave_offset_alone() {
    let mut sfs = new_fs(16);
    sfs.create("f").unwrap();
    let fd = sfs.open("f").unwrap();

    sfs.write(fd, b"abcdef").unwrap();
    assert_eq!(sfs.tell(fd), Ok(0));
    assert_eq!(sfs.read(fd, 3).unwrap(), b"abc");
    assert_eq!(sfs.tell(fd), Ok(0));

    // 第二次写覆盖同一位置
    sfs.write(fd, b"XY").unwrap();
    assert_eq!(sfs.read(fd, 6).unwrap(), b"XYcdef");
    assert_eq!(sfs.stat("f").unwrap().size, 6);
}

#[test]
fn no_short_reads() {
    let mut sfs = new_fs(16);
    sfs.create("f").unwrap();
    let fd = sfs.open("f").unwrap();
    sfs.write(fd, &[7; 100]).unwrap();

    assert_eq!(sfs.read(fd, 101), Err(Error::OutOfBounds));
    assert_eq!(sfs.read(fd, usize::MAX), Err(Error::OutOfBounds));
    sfs.seek(fd, 60).unwrap();
    assert_eq!(sfs.read(fd, 41), Err(Error::OutOfBounds));
    assert_eq!(sfs.read(fd, 40).unwrap(), [7; 40]);
    sfs.seek(fd, 40).unwrap();
    assert!(sfs.read(fd, 0).unwrap().is_empty());
}

#[test]
fn zero_length_write_allocates_nothing() {
    let mut sfs = new_fs(16);
    sfs.create("f").unwrap();
    let fd = sfs.open("f").unwrap();

    sfs.write(fd, &[]).unwrap();
    assert_eq!(sfs.stat("f").unwrap().blocks, 0);
    assert_eq!(sfs.free_data_blocks(), 16);
}

#[test]
fn file_size_is_bounded_by_direct_blocks() {
    let mut sfs = new_fs(64);
    sfs.create("f").unwrap();
    let fd = sfs.open("f").unwrap();

    assert_eq!(sfs.write(fd, &vec![1; MAX_BYTES + 1]), Err(Error::FileTooLarge));
    assert_eq!(sfs.stat("f").unwrap().size, 0);
    assert_eq!(sfs.free_data_blocks(), 64);

    sfs.write(fd, &vec![1; MAX_BYTES]).unwrap();
    assert_eq!(sfs.stat("f").unwrap().blocks, MAX_FILE_SIZE);

    sfs.seek(fd, MAX_BYTES as isize).unwrap();
    assert_eq!(sfs.write(fd, b"!"), Err(Error::FileTooLarge));
    assert_eq!(sfs.stat("f").unwrap().size, MAX_BYTES);
}

#[test]
fn failed_growth_rolls_back_fresh_blocks() {
    let mut sfs = new_fs(3);
    sfs.create("a").unwrap();
    sfs.create("b").unwrap();

    let a = sfs.open("a").unwrap();
    sfs.write(a, b"a").unwrap();
    assert_eq!(sfs.free_data_blocks(), 2);

    // 需要 3 块，只剩 2 块
    let b = sfs.open("b").unwrap();
    let inode = sfs.stat("b").unwrap().inode;
    let before = sfs.read_inode(inode);
    assert_eq!(sfs.write(b, &[2; 3 * BLOCK_SIZE]), Err(Error::AllocationExhausted));
    assert_eq!(sfs.read_inode(inode), before);
    assert_eq!(sfs.free_data_blocks(), 2);

    // 已有的块不受回滚影响
    sfs.write(b, b"0123456789").unwrap();
    assert_eq!(sfs.free_data_blocks(), 1);
    let before = sfs.read_inode(inode);
    assert_eq!(sfs.write(b, &[2; 3 * BLOCK_SIZE]), Err(Error::AllocationExhausted));
    assert_eq!(sfs.read_inode(inode), before);
    assert_eq!(sfs.free_data_blocks(), 1);
    assert_eq!(sfs.read(b, 10).unwrap(), b"0123456789");

    // 剩下的一块仍然可用
    sfs.write(b, &[2; 2 * BLOCK_SIZE]).unwrap();
    assert_eq!(sfs.free_data_blocks(), 0);
    assert_eq!(sfs.stat("b").unwrap().size, 2 * BLOCK_SIZE);
}

#[test]
fn handles_share_one_file() {
    let mut sfs = new_fs(16);
    sfs.create("f").unwrap();
    let writer = sfs.open("f").unwrap();
    let reader = sfs.open("f").unwrap();
    assert_ne!(writer, reader);

    sfs.write(writer, b"shared").unwrap();
    assert_eq!(sfs.read(reader, 6).unwrap(), b"shared");

    sfs.seek(reader, 2).unwrap();
    assert_eq!(sfs.tell(writer), Ok(0));
}

#[test]
fn random_round_trip() {
    let mut rng = rand::thread_rng();
    let mut sfs = new_fs(MAX_FILE_SIZE as u32);
    sfs.create("f").unwrap();
    let fd = sfs.open("f").unwrap();

    let mut shadow = vec![0u8; MAX_BYTES];
    rng.fill(&mut shadow[..]);
    sfs.write(fd, &shadow).unwrap();

    for _ in 0..200 {
        let offset = rng.gen_range(0..MAX_BYTES);
        let len = rng.gen_range(0..=MAX_BYTES - offset);
        let data: Vec<u8> = (0..len).map(|_| rng.r#gen()).collect();

        sfs.seek(fd, offset as isize - sfs.tell(fd).unwrap() as isize)
            .unwrap();
        sfs.write(fd, &data).unwrap();
        shadow[offset..offset + len].copy_from_slice(&data);

        assert_eq!(sfs.read(fd, len).unwrap(), data);
    }

    sfs.seek(fd, -(sfs.tell(fd).unwrap() as isize)).unwrap();
    assert_eq!(sfs.read(fd, MAX_BYTES).unwrap(), shadow);
    assert_eq!(sfs.free_data_blocks(), 0);
}

#[test]
fn boundary_straddling_round_trip() {
    let mut sfs = new_fs(16);
    sfs.create("f").unwrap();
    let fd = sfs.open("f").unwrap();
    sfs.write(fd, &vec![0; 4 * BLOCK_SIZE]).unwrap();

    for (offset, len) in [
        (BLOCK_SIZE - 1, 2),
        (BLOCK_SIZE, BLOCK_SIZE),
        (BLOCK_SIZE / 2, 2 * BLOCK_SIZE),
        (3 * BLOCK_SIZE - 5, BLOCK_SIZE + 5),
    ] {
        let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        sfs.seek(fd, offset as isize - sfs.tell(fd).unwrap() as isize)
            .unwrap();
        sfs.write(fd, &data).unwrap();
        assert_eq!(sfs.read(fd, len).unwrap(), data);
    }
    assert_eq!(sfs.stat("f").unwrap().size, 4 * BLOCK_SIZE);
}
