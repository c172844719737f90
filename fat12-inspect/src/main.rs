mod block_file;
mod cli;
mod report;

use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use block_dev::BlockDevice;
use clap::Parser;
use fat12::{short_name, Error, FatFileSystem, Region};

pub use self::{block_file::BlockFile, cli::Cli};

/// 进程退出码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum Failure {
    Usage = 1,
    BootSector = 2,
    Fat = 3,
    RootDir = 4,
    NotFound = 5,
    ReadFile = 6,
}

impl From<Failure> for ExitCode {
    fn from(failure: Failure) -> Self {
        ExitCode::from(failure as u8)
    }
}

impl From<&Error> for Failure {
    fn from(e: &Error) -> Self {
        match e.region() {
            Some(Region::BootSector) => Failure::BootSector,
            Some(Region::Fat) => Failure::Fat,
            Some(Region::RootDir) => Failure::RootDir,
            Some(Region::Data) => Failure::ReadFile,
            None => Failure::NotFound,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let usage = e.use_stderr();
            // 打印失败也无处可报
            let _ = e.print();
            return if usage {
                Failure::Usage.into()
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => failure.into(),
    }
}

fn run(cli: &Cli) -> Result<(), Failure> {
    let fd = File::open(&cli.image).map_err(|e| {
        eprintln!("Error: cannot open {}: {e}", cli.image.display());
        Failure::Usage
    })?;
    log::info!("image={:?}", cli.image);

    let block_dev: Arc<dyn BlockDevice> = Arc::new(BlockFile::new(fd));
    let fs = FatFileSystem::mount(block_dev).map_err(fail("mount failed"))?;

    let mut out = io::stdout().lock();
    if !cli.no_info {
        report::boot_sector(&mut out, fs.bpb())
            .and_then(|()| writeln!(out))
            .and_then(|()| report::root_dir(&mut out, fs.root_dir()))
            .and_then(|()| writeln!(out))
            .map_err(broken_pipe)?;
    }

    let target = short_name(&cli.name);
    writeln!(out, "Searching for: \"{}\"", String::from_utf8_lossy(&target)).map_err(broken_pipe)?;

    let dirent = *fs.find(&target).ok_or(Error::NotFound).map_err(|e| {
        eprintln!("Error: {} not found", cli.name);
        Failure::from(&e)
    })?;
    writeln!(out, "File found! Size: {} bytes", dirent.size()).map_err(broken_pipe)?;

    if cli.chain {
        report::chain(&mut out, fs.fat(), &dirent).map_err(broken_pipe)?;
    }

    let data = fs.read_file(&dirent).map_err(fail("read failed"))?;
    report::contents(&mut out, &data)
        .and_then(|()| out.flush())
        .map_err(broken_pipe)
}

fn fail(context: &'static str) -> impl FnOnce(Error) -> Failure {
    move |e| {
        eprintln!("Error: {context}: {e}");
        Failure::from(&e)
    }
}

/// stdout写不出去时，按文件读取失败处理
fn broken_pipe(e: io::Error) -> Failure {
    log::error!("stdout: {e}");
    Failure::ReadFile
}
