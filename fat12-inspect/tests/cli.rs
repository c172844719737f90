use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use fat12::volume::reserved::{Bpb, Geometry};
use fat12::volume::root::ShortDirEntry;
use fat12::{short_name, ClusterId};

const SECTOR: usize = 512;

/// 64扇区的小卷，`HELLO.TXT`占2号簇
fn small_image() -> Vec<u8> {
    let bpb = Bpb::from_geometry(Geometry {
        sector_bytes: 512,
        cluster_sectors: 1,
        reserved_sectors: 1,
        fat_count: 2,
        root_entries: 16,
        fat_sectors: 1,
        total_sectors: 64,
        media: 0xF8,
    })
    .unwrap();
    let mut image = vec![0; bpb.total_sectors() * SECTOR];
    image[..SECTOR].copy_from_slice(&bpb.to_bytes());

    // 条目0..=2: 0xFF8, 0xFFF, 0xFFF
    let fat = [0xF8, 0xFF, 0xFF, 0xFF, 0x0F];
    for copy in 1..=2 {
        image[copy * SECTOR..copy * SECTOR + fat.len()].copy_from_slice(&fat);
    }

    let content = b"Hi!\r\n";
    let dirent = ShortDirEntry::new_file(short_name("hello.txt"), ClusterId::MIN, content.len() as u32);
    image[3 * SECTOR..3 * SECTOR + 32].copy_from_slice(&dirent.to_bytes());
    image[4 * SECTOR..4 * SECTOR + content.len()].copy_from_slice(content);

    image
}

fn write_image(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("fat12-inspect-{name}-{}.img", std::process::id()));
    fs::write(&path, bytes).unwrap();
    path
}

fn inspect(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fat12-inspect"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn prints_the_file() {
    let path = write_image("found", &small_image());
    let out = inspect(&[path.to_str().unwrap(), "hello.txt"]);
    fs::remove_file(&path).unwrap();

    assert_eq!(Some(0), out.status.code());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Bytes per sector:       512\n"));
    assert!(stdout.contains("File: HELLO   TXT | Size: 5 bytes\n"));
    assert!(stdout.contains("Searching for: \"HELLO   TXT\"\n"));
    assert!(stdout.contains("File found! Size: 5 bytes\n"));
    assert!(stdout.ends_with("Hi!<0d><0a>\n"));
}

#[test]
fn quiet_with_chain() {
    let path = write_image("chain", &small_image());
    let out = inspect(&["--no-info", "--chain", path.to_str().unwrap(), "HELLO.TXT"]);
    fs::remove_file(&path).unwrap();

    assert_eq!(Some(0), out.status.code());
    assert_eq!(
        "Searching for: \"HELLO   TXT\"\n\
         File found! Size: 5 bytes\n\
         Cluster chain: 2\n\
         Hi!<0d><0a>\n",
        String::from_utf8(out.stdout).unwrap()
    );
}

#[test]
fn missing_file_exits_5() {
    let path = write_image("missing", &small_image());
    let out = inspect(&[path.to_str().unwrap(), "NOPE.BIN"]);
    fs::remove_file(&path).unwrap();

    assert_eq!(Some(5), out.status.code());
    assert!(!String::from_utf8(out.stdout).unwrap().contains("File found!"));
}

#[test]
fn bad_boot_sector_exits_2() {
    let path = write_image("zeroed", &[0; 64 * SECTOR]);
    let out = inspect(&[path.to_str().unwrap(), "HELLO.TXT"]);
    fs::remove_file(&path).unwrap();

    assert_eq!(Some(2), out.status.code());
}

#[test]
fn truncated_fat_exits_3() {
    let image = small_image();
    let path = write_image("truncated", &image[..SECTOR]);
    let out = inspect(&[path.to_str().unwrap(), "HELLO.TXT"]);
    fs::remove_file(&path).unwrap();

    assert_eq!(Some(3), out.status.code());
}

#[test]
fn truncated_root_dir_exits_4() {
    let image = small_image();
    let path = write_image("no-root", &image[..3 * SECTOR]);
    let out = inspect(&[path.to_str().unwrap(), "HELLO.TXT"]);
    fs::remove_file(&path).unwrap();

    assert_eq!(Some(4), out.status.code());
}

#[test]
fn bad_cluster_exits_6() {
    let mut image = small_image();
    // 2号簇标成坏簇
    image[SECTOR + 3] = 0xF7;
    let path = write_image("bad-cluster", &image);
    let out = inspect(&[path.to_str().unwrap(), "HELLO.TXT"]);
    fs::remove_file(&path).unwrap();

    assert_eq!(Some(6), out.status.code());
}

#[test]
fn usage_errors_exit_1() {
    assert_eq!(Some(1), inspect(&[]).status.code());
    assert_eq!(
        Some(1),
        inspect(&["/nonexistent/fat12-inspect.img", "A.TXT"]).status.code()
    );
    assert_eq!(Some(0), inspect(&["--help"]).status.code());
}
