use anyhow::{ensure, Result};
use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::io::{Read, Write};

const HEADER_SIZE: u32 = 6;
const DIR_ENTRY_SIZE: u32 = 16;

/// An icon file bundling several images with a directory of offsets.
///
/// Layout is a 6 byte header, one 16 byte directory entry per image and the
/// concatenated image payloads. All integers are little endian. Payloads are
/// self contained png streams, which every consumer of modern ico files
/// accepts.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IcoFile {
    pub entries: Vec<IcoEntry>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IcoEntry {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl IcoEntry {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// A zero byte stands for 256 px in the directory.
    fn size_byte(px: u32) -> u8 {
        if px == 256 {
            0
        } else {
            px as u8
        }
    }

    fn size_px(byte: u8) -> u32 {
        if byte == 0 {
            256
        } else {
            byte as u32
        }
    }
}

impl IcoFile {
    /// Parses the canonical layout this crate writes: payloads contiguous
    /// and in directory order. Ico files from other producers may pad or
    /// reorder payloads and are rejected.
    pub fn read(r: &mut impl Read) -> Result<Self> {
        ensure!(r.read_u16::<LE>()? == 0, "invalid ico header");
        ensure!(r.read_u16::<LE>()? == 1, "not an icon resource");
        let count = r.read_u16::<LE>()? as usize;
        ensure!(count > 0, "ico file contains no images");
        let mut directory = Vec::with_capacity(count);
        for _ in 0..count {
            let width = IcoEntry::size_px(r.read_u8()?);
            let height = IcoEntry::size_px(r.read_u8()?);
            let _palette = r.read_u8()?;
            ensure!(r.read_u8()? == 0, "invalid directory entry");
            let _planes = r.read_u16::<LE>()?;
            let _bpp = r.read_u16::<LE>()?;
            let length = r.read_u32::<LE>()?;
            let offset = r.read_u32::<LE>()?;
            directory.push((width, height, length, offset));
        }
        let mut expected_offset = HEADER_SIZE + DIR_ENTRY_SIZE * count as u32;
        let mut entries = Vec::with_capacity(count);
        for (width, height, length, offset) in directory {
            ensure!(
                offset == expected_offset,
                "image payloads overlap or leave gaps"
            );
            let mut data = vec![0; length as usize];
            r.read_exact(&mut data)?;
            expected_offset += length;
            entries.push(IcoEntry {
                width,
                height,
                data,
            });
        }
        Ok(Self { entries })
    }

    pub fn write(&self, w: &mut impl Write) -> Result<()> {
        ensure!(
            !self.entries.is_empty(),
            "an ico file needs at least one image"
        );
        ensure!(
            self.entries.len() <= u16::MAX as usize,
            "too many images for one ico file"
        );
        for entry in &self.entries {
            ensure!(
                (1..=256).contains(&entry.width) && (1..=256).contains(&entry.height),
                "ico images must be between 1 and 256 px"
            );
        }
        w.write_u16::<LE>(0)?;
        w.write_u16::<LE>(1)?;
        w.write_u16::<LE>(self.entries.len() as u16)?;
        let mut offset = HEADER_SIZE + DIR_ENTRY_SIZE * self.entries.len() as u32;
        for entry in &self.entries {
            w.write_u8(IcoEntry::size_byte(entry.width))?;
            w.write_u8(IcoEntry::size_byte(entry.height))?;
            w.write_u8(0)?;
            w.write_u8(0)?;
            w.write_u16::<LE>(1)?;
            w.write_u16::<LE>(32)?;
            w.write_u32::<LE>(entry.data.len() as u32)?;
            w.write_u32::<LE>(offset)?;
            offset += entry.data.len() as u32;
        }
        for entry in &self.entries {
            w.write_all(&entry.data)?;
        }
        Ok(())
    }

    /// Total file size produced by `write`.
    pub fn byte_size(&self) -> u64 {
        let payload: u64 = self.entries.iter().map(|entry| entry.data.len() as u64).sum();
        HEADER_SIZE as u64 + DIR_ENTRY_SIZE as u64 * self.entries.len() as u64 + payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> IcoFile {
        IcoFile {
            entries: vec![
                IcoEntry::new(16, 16, vec![1, 2, 3]),
                IcoEntry::new(32, 32, vec![4; 10]),
                IcoEntry::new(256, 256, vec![9; 5]),
            ],
        }
    }

    #[test]
    fn roundtrip() -> Result<()> {
        let file = sample();
        let mut buf = Vec::new();
        file.write(&mut buf)?;
        let parsed = IcoFile::read(&mut Cursor::new(&buf))?;
        assert_eq!(parsed, file);
        Ok(())
    }

    #[test]
    fn byte_accounting() -> Result<()> {
        for n in 1..=3 {
            let file = IcoFile {
                entries: sample().entries.into_iter().take(n).collect(),
            };
            let mut buf = Vec::new();
            file.write(&mut buf)?;
            let payload: usize = file.entries.iter().map(|entry| entry.data.len()).sum();
            assert_eq!(buf.len(), 6 + 16 * n + payload);
            assert_eq!(buf.len() as u64, file.byte_size());
        }
        Ok(())
    }

    #[test]
    fn empty_is_rejected() {
        let mut buf = Vec::new();
        let err = IcoFile::default().write(&mut buf).unwrap_err();
        assert!(err.to_string().contains("at least one image"));
        assert!(buf.is_empty());
    }

    #[test]
    fn oversized_images_are_rejected() {
        let file = IcoFile {
            entries: vec![IcoEntry::new(300, 300, vec![1, 2, 3])],
        };
        let mut buf = Vec::new();
        let err = file.write(&mut buf).unwrap_err();
        assert!(err.to_string().contains("between 1 and 256 px"));
        assert!(buf.is_empty());
    }

    #[test]
    fn directory_layout() -> Result<()> {
        let file = sample();
        let mut buf = Vec::new();
        file.write(&mut buf)?;
        // header: reserved, type 1, count 3
        assert_eq!(&buf[..6], &[0, 0, 1, 0, 3, 0]);
        // first entry is 16x16 and starts right after the directory
        assert_eq!(buf[6], 16);
        assert_eq!(buf[7], 16);
        assert_eq!(&buf[18..22], &54u32.to_le_bytes());
        // 256 px is encoded as a zero byte
        assert_eq!(buf[6 + 32], 0);
        Ok(())
    }

    #[test]
    fn rejects_overlapping_offsets() -> Result<()> {
        let file = sample();
        let mut buf = Vec::new();
        file.write(&mut buf)?;
        // point the second entry at the first payload
        buf[22 + 12..22 + 16].copy_from_slice(&54u32.to_le_bytes());
        let err = IcoFile::read(&mut Cursor::new(&buf)).unwrap_err();
        assert!(err.to_string().contains("overlap"));
        Ok(())
    }
}
