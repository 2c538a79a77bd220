pub mod fat;
pub mod macho;

use crate::error::ProbeError;
use crate::reader::ByteReader;
use fat::FatHeader;
use goblin::mach::fat::FAT_MAGIC;
use goblin::mach::header::{MH_CIGAM, MH_CIGAM_64, MH_MAGIC, MH_MAGIC_64};
use macho::MachHeader;

pub trait Header: std::fmt::Debug + Send + Sync {
    /// Returns the magic number exactly as read big-endian from offset 0.
    fn magic(&self) -> u32;

    /// Returns every raw CPU type in file order.
    fn cpu_types(&self) -> Vec<u32>;

    /// Returns true for a fat (universal) container.
    fn is_fat(&self) -> bool;

    /// Returns a short human-readable name, e.g. "Mach-O" or "Mach-O (fat)".
    fn format_name(&self) -> &'static str;
}

/// Reads the magic number and dispatches to the thin or fat decoder.
pub fn read_header(reader: &mut ByteReader) -> Result<Box<dyn Header>, ProbeError> {
    let magic = reader.read_u32_be()?;
    log::debug!("{}: magic {magic:#010x}", reader.path().display());

    match magic {
        FAT_MAGIC => Ok(Box::new(FatHeader::from_reader(reader, magic)?)),
        MH_MAGIC | MH_MAGIC_64 | MH_CIGAM | MH_CIGAM_64 => {
            Ok(Box::new(MachHeader::from_reader(reader, magic)?))
        }
        _ => Err(ProbeError::InvalidMagic(magic)),
    }
}
