use crate::error::ProbeError;
use crate::header::read_header;
use crate::reader::ByteReader;
use crate::{Architecture, ArchitectureSet};
use std::path::Path;

/// The architectures a Mach-O file was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureProbe {
    pub path: String,
    pub format_name: &'static str,
    architectures: ArchitectureSet,
}

impl ArchitectureProbe {
    /// Probes `path`, returning `None` if it is not a readable Mach-O file.
    ///
    /// Missing files, directories, truncated headers and unrecognized magic
    /// numbers all collapse into `None`. The reason is logged at debug level;
    /// use [`ArchitectureProbe::inspect`] to get it as a value.
    pub fn probe<P: AsRef<Path>>(path: P) -> Option<Self> {
        match Self::inspect(&path) {
            Ok(probe) => Some(probe),
            Err(err) => {
                log::debug!("{}: not a valid Mach-O file: {err}", path.as_ref().display());
                None
            }
        }
    }

    /// Same as [`ArchitectureProbe::probe`] but keeps the failure reason.
    pub fn inspect<P: AsRef<Path>>(path: P) -> Result<Self, ProbeError> {
        let mut reader = ByteReader::open(&path)?;
        let header = read_header(&mut reader)?;

        let architectures: ArchitectureSet = header
            .cpu_types()
            .into_iter()
            .map(|cputype| {
                let arch = Architecture::from_cpu_type(cputype);
                log::debug!("cputype {cputype:#010x} -> {arch}");
                arch
            })
            .collect();

        log::info!(
            "{}: {} [{}]",
            path.as_ref().display(),
            header.format_name(),
            architectures
        );

        Ok(Self {
            path: path.as_ref().display().to_string(),
            format_name: header.format_name(),
            architectures,
        })
    }

    pub fn architectures(&self) -> &ArchitectureSet {
        &self.architectures
    }

    pub fn is_apple_silicon_ready(&self) -> bool {
        self.architectures.is_apple_silicon_ready()
    }

    pub fn architectures_label(&self) -> String {
        self.architectures.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReaderError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn fat_entries_keep_stream_aligned() {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("fat");

        let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 3];
        for cputype in [18u32, 0x0100_0007, 12] {
            bytes.extend_from_slice(&cputype.to_be_bytes());
            // subtype, offset, size, align; values that would map to known
            // architectures if the decoder drifted
            for field in [7u32, 0x0100_000C, 18, 7] {
                bytes.extend_from_slice(&field.to_be_bytes());
            }
        }
        fs::write(&path, bytes).expect("write fixture");

        let probe = ArchitectureProbe::inspect(&path).expect("probe fat binary");
        assert_eq!(
            probe.architectures().as_slice(),
            &[Architecture::Ppc, Architecture::X86_64, Architecture::Arm]
        );
        assert_eq!(probe.format_name, "Mach-O (fat)");
        assert_eq!(probe.architectures_label(), "PowerPC/Intel 64");
    }

    #[test]
    fn byte_swapped_thin_header_reads_little_endian() {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("thin");
        fs::write(&path, [0xCF, 0xFA, 0xED, 0xFE, 0x0C, 0x00, 0x00, 0x01])
            .expect("write fixture");

        let probe = ArchitectureProbe::inspect(&path).expect("probe thin binary");
        assert_eq!(probe.architectures().as_slice(), &[Architecture::Arm64]);
        assert!(probe.is_apple_silicon_ready());
        assert_eq!(probe.architectures_label(), "Apple");
    }

    #[test]
    fn inspect_distinguishes_failures() {
        let dir = tempdir().expect("create temp dir");

        let bad_magic = dir.path().join("elf");
        fs::write(&bad_magic, b"\x7FELF\x02\x01\x01\x00").expect("write fixture");
        assert!(matches!(
            ArchitectureProbe::inspect(&bad_magic),
            Err(ProbeError::InvalidMagic(0x7F454C46))
        ));

        let truncated = dir.path().join("truncated");
        fs::write(&truncated, [0xFE, 0xED, 0xFA, 0xCE]).expect("write fixture");
        assert!(matches!(
            ArchitectureProbe::inspect(&truncated),
            Err(ProbeError::Io(ReaderError::ReadError { offset: 4, .. }))
        ));

        assert!(matches!(
            ArchitectureProbe::inspect(dir.path()),
            Err(ProbeError::Io(ReaderError::IsDirectory(_)))
        ));
    }

    #[test]
    fn truncated_fat_table_fails() {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("fat");

        let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 2];
        bytes.extend_from_slice(&0x0100_000Cu32.to_be_bytes());
        bytes.extend_from_slice(&[0; 16]);
        bytes.extend_from_slice(&0x0100_0007u32.to_be_bytes());
        fs::write(&path, bytes).expect("write fixture");

        assert!(ArchitectureProbe::probe(&path).is_none());
    }
}
