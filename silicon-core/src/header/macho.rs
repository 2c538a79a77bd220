use crate::error::ReaderResult;
use crate::header::Header;
use crate::reader::ByteReader;
use goblin::mach::header::{MH_CIGAM, MH_CIGAM_64, MH_MAGIC_64};

/// The leading fields of a thin Mach-O header (`mach_header` / `mach_header_64`).
///
/// Only `magic` and `cputype` are decoded; the rest of the header and all load
/// commands are left untouched in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachHeader {
    /// Magic number as read big-endian.
    ///
    /// - `MH_MAGIC` (`0xFEEDFACE`): 32-bit, big-endian fields
    /// - `MH_MAGIC_64` (`0xFEEDFACF`): 64-bit, big-endian fields
    /// - `MH_CIGAM` (`0xCEFAEDFE`): 32-bit, byte-swapped (little-endian) fields
    /// - `MH_CIGAM_64` (`0xCFFAEDFE`): 64-bit, byte-swapped (little-endian) fields
    pub magic: u32,

    /// CPU type of the single image, e.g. `CPU_TYPE_ARM64` (`0x0100000C`).
    pub cputype: u32,
}

impl MachHeader {
    /// Decodes the fields following an already-consumed `magic`.
    pub fn from_reader(reader: &mut ByteReader, magic: u32) -> ReaderResult<Self> {
        let swapped = matches!(magic, MH_CIGAM | MH_CIGAM_64);
        let cputype = if swapped {
            reader.read_u32_le()?
        } else {
            reader.read_u32_be()?
        };

        Ok(Self { magic, cputype })
    }

    pub fn is_64(&self) -> bool {
        matches!(self.magic, MH_MAGIC_64 | MH_CIGAM_64)
    }

    pub fn is_byte_swapped(&self) -> bool {
        matches!(self.magic, MH_CIGAM | MH_CIGAM_64)
    }
}

impl Header for MachHeader {
    fn magic(&self) -> u32 {
        self.magic
    }

    fn cpu_types(&self) -> Vec<u32> {
        vec![self.cputype]
    }

    fn is_fat(&self) -> bool {
        false
    }

    fn format_name(&self) -> &'static str {
        "Mach-O"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::read_header;
    use goblin::mach::header::MH_MAGIC;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn byte_swapped_64_bit_header() {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("thin");
        fs::write(&path, [0xCF, 0xFA, 0xED, 0xFE, 0x07, 0x00, 0x00, 0x01])
            .expect("write fixture");

        let mut reader = ByteReader::open(&path).expect("open fixture");
        let magic = reader.read_u32_be().expect("read magic");
        let header = MachHeader::from_reader(&mut reader, magic).expect("decode header");

        assert_eq!(header.cputype, 0x0100_0007);
        assert!(header.is_64());
        assert!(header.is_byte_swapped());
        assert_eq!(reader.position(), 8);
    }

    #[test]
    fn dispatches_thin_magic() {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("thin");
        fs::write(&path, [0xFE, 0xED, 0xFA, 0xCE, 0x00, 0x00, 0x00, 0x12])
            .expect("write fixture");

        let mut reader = ByteReader::open(&path).expect("open fixture");
        let header = read_header(&mut reader).expect("decode header");

        assert!(!header.is_fat());
        assert_eq!(header.magic(), MH_MAGIC);
        assert_eq!(header.cpu_types(), vec![18]);
    }
}
