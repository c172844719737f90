//! 终端输出

use std::io::{self, Write};

use fat12::volume::fat::FatTable;
use fat12::volume::reserved::Bpb;
use fat12::volume::root::{RootDir, ShortDirEntry};
use typed_bytesize::ByteSizeIec;

pub fn boot_sector(out: &mut impl Write, bpb: &Bpb) -> io::Result<()> {
    let volume_bytes = (bpb.total_sectors() * bpb.sector_bytes()) as u64;

    writeln!(out, "Boot Sector Information:")?;
    writeln!(out, "=======================")?;
    writeln!(out, "OEM name:               {}", bpb.oem_name())?;
    writeln!(out, "Bytes per sector:       {}", bpb.sector_bytes())?;
    writeln!(out, "Sectors per cluster:    {}", bpb.cluster_sectors())?;
    writeln!(out, "Reserved sectors:       {}", bpb.reserved_sectors())?;
    writeln!(out, "FAT count:              {}", bpb.fat_count())?;
    writeln!(out, "Root directory entries: {}", bpb.root_entries())?;
    writeln!(out, "Sectors per FAT:        {}", bpb.fat_sectors())?;
    writeln!(
        out,
        "Total sectors:          {} ({})",
        bpb.total_sectors(),
        ByteSizeIec(volume_bytes)
    )?;
    writeln!(out, "Media descriptor:       {:#04x}", bpb.media())?;
    if let Some(label) = bpb.volume_label() {
        writeln!(out, "Volume label:           {label}")?;
    }
    if let Some(id) = bpb.volume_id() {
        writeln!(out, "Volume id:              {id:08X}")?;
    }

    Ok(())
}

pub fn root_dir(out: &mut impl Write, root_dir: &RootDir) -> io::Result<()> {
    writeln!(out, "Root Directory Contents:")?;
    writeln!(out, "=======================")?;

    for dirent in root_dir.iter() {
        let name = String::from_utf8_lossy(dirent.name());
        let tag = if dirent.is_volume_label() {
            " <VOL>"
        } else if dirent.is_dir() {
            " <DIR>"
        } else {
            ""
        };
        writeln!(out, "File: {name} | Size: {} bytes{tag}", dirent.size())?;
    }

    Ok(())
}

pub fn chain(out: &mut impl Write, fat: &FatTable, dirent: &ShortDirEntry) -> io::Result<()> {
    write!(out, "Cluster chain:")?;
    let start = match dirent.cluster_id() {
        Ok(start) => start,
        Err(e) => return writeln!(out, " <{e}>"),
    };
    for id in fat.chain(start) {
        match id {
            Ok(id) => write!(out, " {}", u16::from(id))?,
            Err(e) => {
                write!(out, " <{e}>")?;
                break;
            }
        }
    }
    writeln!(out)
}

/// 可打印的ASCII原样输出，其余写成`<xx>`
pub fn contents(out: &mut impl Write, data: &[u8]) -> io::Result<()> {
    for &b in data {
        if b == b' ' || b.is_ascii_graphic() {
            out.write_all(&[b])?;
        } else {
            write!(out, "<{b:02x}>")?;
        }
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use fat12::{short_name, ClusterId};

    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn escapes_unprintable_bytes() {
        let text = render(|out| contents(out, b"Hi there!\r\n\x00\x7f~"));
        assert_eq!("Hi there!<0d><0a><00><7f>~\n", text);
    }

    #[test]
    fn lists_occupied_entries() {
        let dir = RootDir::from_entries(vec![
            ShortDirEntry::new_file(short_name("readme.txt"), ClusterId::MIN, 13),
            ShortDirEntry::new_file(short_name("boot"), ClusterId::FREE, 0)
                .with_attr(fat12::volume::root::AttrFlag::Directory.into()),
        ]);

        let text = render(|out| root_dir(out, &dir));
        assert!(text.contains("File: README  TXT | Size: 13 bytes\n"));
        assert!(text.contains("File: BOOT        | Size: 0 bytes <DIR>\n"));
    }

    #[test]
    fn prints_the_chain() {
        let mut fat = FatTable::zeroed(12);
        fat.set(ClusterId::new(2), 4).unwrap();
        fat.set(ClusterId::new(4), 0xFFF).unwrap();

        let dirent = ShortDirEntry::new_file(short_name("a.bin"), ClusterId::MIN, 1024);
        assert_eq!(
            "Cluster chain: 2 4\n",
            render(|out| chain(out, &fat, &dirent))
        );

        fat.set(ClusterId::new(4), 0xFF7).unwrap();
        assert_eq!(
            "Cluster chain: 2 4 <bad cluster in chain>\n",
            render(|out| chain(out, &fat, &dirent))
        );

        let mut raw = dirent.to_bytes();
        raw[26..28].copy_from_slice(&0x1002u16.to_le_bytes());
        let wide = ShortDirEntry::from_bytes(&raw).unwrap();
        assert_eq!(
            "Cluster chain: <cluster out of range>\n",
            render(|out| chain(out, &fat, &wide))
        );
    }
}
