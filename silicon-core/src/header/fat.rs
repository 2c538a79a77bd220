use crate::error::ReaderResult;
use crate::header::Header;
use crate::reader::ByteReader;

/// One `fat_arch` record. All fields are big-endian on disk, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatArch {
    pub cputype: u32,
    pub cpusubtype: u32,
    /// File offset of the embedded image.
    pub offset: u32,
    pub size: u32,
    /// Alignment of the embedded image, as a power of two.
    pub align: u32,
}

impl FatArch {
    pub fn from_reader(reader: &mut ByteReader) -> ReaderResult<Self> {
        Ok(Self {
            cputype: reader.read_u32_be()?,
            cpusubtype: reader.read_u32_be()?,
            offset: reader.read_u32_be()?,
            size: reader.read_u32_be()?,
            align: reader.read_u32_be()?,
        })
    }
}

/// A universal binary's `fat_header` followed by its `fat_arch` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatHeader {
    pub magic: u32,
    pub nfat_arch: u32,
    pub arches: Vec<FatArch>,
}

impl FatHeader {
    /// Decodes `nfat_arch` and then every `fat_arch` entry after an
    /// already-consumed `magic`.
    pub fn from_reader(reader: &mut ByteReader, magic: u32) -> ReaderResult<Self> {
        let nfat_arch = reader.read_u32_be()?;
        log::debug!("{}: {nfat_arch} fat entries", reader.path().display());

        // The count is untrusted, so grow the table as entries are actually read.
        let mut arches = Vec::new();
        for _ in 0..nfat_arch {
            arches.push(FatArch::from_reader(reader)?);
        }

        Ok(Self {
            magic,
            nfat_arch,
            arches,
        })
    }
}

impl Header for FatHeader {
    fn magic(&self) -> u32 {
        self.magic
    }

    fn cpu_types(&self) -> Vec<u32> {
        self.arches.iter().map(|arch| arch.cputype).collect()
    }

    fn is_fat(&self) -> bool {
        true
    }

    fn format_name(&self) -> &'static str {
        "Mach-O (fat)"
    }
}
