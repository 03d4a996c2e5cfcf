mod cli;

use std::io;
use std::io::Write;
use std::path::Path;

use clap::Parser;
use cli::{Cli, Command};
use simple_fs_fuse::{fs_error, mount, read_file};

fn main() -> io::Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Pack {
            source,
            image,
            data_blocks,
        } => pack(&source, &image, data_blocks),
        Command::Ls { image } => ls(&image),
        Command::Cat { image, name } => cat(&image, &name),
    }
}

fn pack(source: &Path, image: &Path, data_blocks: u32) -> io::Result<()> {
    println!("source={source:?}\nimage={image:?}");

    let sfs = simple_fs_fuse::pack(source, image, data_blocks)?;

    println!(
        "free inodes={} free data blocks={}",
        sfs.free_inodes(),
        sfs.free_data_blocks()
    );
    Ok(())
}

fn ls(image: &Path) -> io::Result<()> {
    let sfs = mount(image)?;

    for (_, name) in sfs.list() {
        let stat = sfs.stat(&name).map_err(|err| fs_error(&name, err))?;
        println!("{:>4} {:>8} {name}", stat.inode, stat.size);
    }

    Ok(())
}

fn cat(image: &Path, name: &str) -> io::Result<()> {
    let mut sfs = mount(image)?;
    io::stdout().write_all(&read_file(&mut sfs, name)?)
}
