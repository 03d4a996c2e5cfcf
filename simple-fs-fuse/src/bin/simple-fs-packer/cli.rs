use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(about = "Build and inspect simple-fs images")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Format a new image and copy every regular file of a directory into it
    Pack {
        /// Host source directory
        #[arg(long, short)]
        source: PathBuf,

        /// Image file to create
        #[arg(long, short)]
        image: PathBuf,

        /// Number of data blocks in the volume
        #[arg(long, short, default_value_t = 256)]
        data_blocks: u32,
    },

    /// List files stored in an image
    Ls {
        #[arg(long, short)]
        image: PathBuf,
    },

    /// Dump a file stored in an image to stdout
    Cat {
        #[arg(long, short)]
        image: PathBuf,

        /// File name inside the image
        name: String,
    },
}
