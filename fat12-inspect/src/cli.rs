use clap::Parser;
use std::path::PathBuf;

/// Print one file from the root directory of a FAT12 disk image
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// Disk image, e.g. `floppy.img`
    pub image: PathBuf,

    /// File to print, e.g. `README.TXT`
    pub name: String,

    /// Skip the boot sector and root directory report
    #[arg(long, short = 'q')]
    pub no_info: bool,

    /// Print the file's cluster chain
    #[arg(long, short)]
    pub chain: bool,
}
