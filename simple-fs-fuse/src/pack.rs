//! 宿主机目录与镜像之间的搬运

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use simple_fs::{BLOCK_SIZE, Geometry, SimpleFileSystem};

use crate::BlockFile;

/// 把 `source` 目录下的普通文件按名字顺序写进新建的镜像，子目录被跳过
pub fn pack(source: &Path, image: &Path, data_blocks: u32) -> io::Result<SimpleFileSystem> {
    let geometry = Geometry::new(data_blocks);
    let fd = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(image)?;
    fd.set_len(u64::from(geometry.total_blocks()) * BLOCK_SIZE as u64)?;

    let mut sfs = SimpleFileSystem::format(Arc::new(BlockFile::new(fd)), geometry);

    let mut entries = fs::read_dir(source)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        if !entry.file_type()?.is_file() {
            log::debug!("skip {:?}", entry.path());
            continue;
        }
        let name = entry
            .file_name()
            .into_string()
            .map_err(|name| io::Error::other(format!("non UTF-8 file name: {name:?}")))?;
        let data = fs::read(entry.path())?;
        log::info!("file={name:?} size={}", data.len());

        sfs.create(&name).map_err(|err| fs_error(&name, err))?;
        let handle = sfs.open(&name).map_err(|err| fs_error(&name, err))?;
        let written = sfs.write(handle, &data);
        sfs.close(handle);
        written.map_err(|err| fs_error(&name, err))?;
    }

    Ok(sfs)
}

pub fn mount(image: &Path) -> io::Result<SimpleFileSystem> {
    let fd = OpenOptions::new().read(true).write(true).open(image)?;
    SimpleFileSystem::mount(Arc::new(BlockFile::new(fd)))
        .map_err(|err| io::Error::other(format!("{image:?}: {err}")))
}

/// 读出整个文件
pub fn read_file(sfs: &mut SimpleFileSystem, name: &str) -> io::Result<Vec<u8>> {
    let stat = sfs.stat(name).map_err(|err| fs_error(name, err))?;
    let handle = sfs.open(name).map_err(|err| fs_error(name, err))?;
    let data = sfs.read(handle, stat.size);
    sfs.close(handle);
    data.map_err(|err| fs_error(name, err))
}

pub fn fs_error(name: &str, err: simple_fs::Error) -> io::Error {
    io::Error::other(format!("{name}: {err}"))
}
