use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("file name longer than {} bytes", crate::MAX_NAME_STRLEN)]
    NameTooLong,
    #[error("file name contains NUL")]
    InvalidName,
    #[error("file already exists")]
    DuplicateName,
    #[error("inode table is full")]
    NoFreeInode,
    #[error("no such file")]
    NotFound,
    #[error("too many open files")]
    NoFreeHandle,
    #[error("bad file handle")]
    InvalidHandle,
    #[error("offset out of file bounds")]
    OutOfBounds,
    #[error("no free data block")]
    AllocationExhausted,
    #[error("file would exceed {} blocks", crate::MAX_FILE_SIZE)]
    FileTooLarge,
    #[error("not a simple-fs image")]
    InvalidImage,
}
