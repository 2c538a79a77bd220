use goblin::mach::cputype::{
    CPU_TYPE_ARM, CPU_TYPE_ARM64, CPU_TYPE_I386, CPU_TYPE_POWERPC, CPU_TYPE_X86_64,
};
use std::fmt;

/// An instruction-set architecture recognized in a Mach-O header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    I386,
    X86_64,
    Arm,
    Arm64,
    Ppc,
    Unknown,
}

impl Architecture {
    /// Maps a raw `cputype` by exact value. Subtypes and capability bits other
    /// than `CPU_ARCH_ABI64` are not masked off.
    pub fn from_cpu_type(cputype: u32) -> Self {
        match cputype {
            CPU_TYPE_I386 => Architecture::I386,
            CPU_TYPE_X86_64 => Architecture::X86_64,
            CPU_TYPE_ARM => Architecture::Arm,
            CPU_TYPE_ARM64 => Architecture::Arm64,
            CPU_TYPE_POWERPC => Architecture::Ppc,
            _ => Architecture::Unknown,
        }
    }

    /// Display name of a lone architecture, e.g. "Apple" or "Intel 64".
    pub fn name(&self) -> &'static str {
        match self {
            Architecture::Arm64 => "Apple",
            Architecture::X86_64 => "Intel 64",
            Architecture::I386 => "Intel 32",
            Architecture::Ppc => "PowerPC",
            Architecture::Arm | Architecture::Unknown => "Unknown",
        }
    }

    pub fn is_apple(&self) -> bool {
        *self == Architecture::Arm64
    }

    pub fn is_intel32(&self) -> bool {
        *self == Architecture::I386
    }

    pub fn is_intel64(&self) -> bool {
        *self == Architecture::X86_64
    }

    pub fn is_intel(&self) -> bool {
        self.is_intel32() || self.is_intel64()
    }

    pub fn is_ppc(&self) -> bool {
        *self == Architecture::Ppc
    }
}

impl std::str::FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "i386" => Ok(Architecture::I386),
            "x86_64" => Ok(Architecture::X86_64),
            "arm" => Ok(Architecture::Arm),
            "arm64" => Ok(Architecture::Arm64),
            "ppc" => Ok(Architecture::Ppc),
            "<unknown>" | "unknown" => Ok(Architecture::Unknown),
            _ => Err(format!("Unknown architecture: {}", s)),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Architecture::I386 => "i386",
            Architecture::X86_64 => "x86_64",
            Architecture::Arm => "arm",
            Architecture::Arm64 => "arm64",
            Architecture::Ppc => "ppc",
            Architecture::Unknown => "<unknown>",
        };
        write!(f, "{}", name)
    }
}

/// Architectures in the order they appear in the file. Repeats and
/// [`Architecture::Unknown`] entries are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchitectureSet(Vec<Architecture>);

impl ArchitectureSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Architecture> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Architecture] {
        &self.0
    }

    pub fn contains(&self, arch: Architecture) -> bool {
        self.0.contains(&arch)
    }

    fn any(&self, pred: impl Fn(&Architecture) -> bool) -> bool {
        self.0.iter().any(pred)
    }

    /// True when a native arm64 image is present.
    pub fn is_apple_silicon_ready(&self) -> bool {
        self.any(Architecture::is_apple)
    }

    /// Human-readable classification of the whole set.
    ///
    /// First match wins:
    /// 1. a single entry uses that architecture's [`Architecture::name`]
    /// 2. any arm64 entry makes it "Universal"
    /// 3. PowerPC and Intel entries combine into e.g. "PowerPC/Intel 32/64"
    /// 4. otherwise "Unknown"
    pub fn label(&self) -> String {
        self.unique_name()
            .or_else(|| self.universal_name())
            .or_else(|| self.legacy_name())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn unique_name(&self) -> Option<String> {
        match self.0.as_slice() {
            [only] => Some(only.name().to_string()),
            _ => None,
        }
    }

    fn universal_name(&self) -> Option<String> {
        self.is_apple_silicon_ready().then(|| "Universal".to_string())
    }

    fn intel_name(&self) -> Option<&'static str> {
        match (self.any(Architecture::is_intel32), self.any(Architecture::is_intel64)) {
            (true, true) => Some("Intel 32/64"),
            (true, false) => Some("Intel 32"),
            (false, true) => Some("Intel 64"),
            (false, false) => None,
        }
    }

    fn legacy_name(&self) -> Option<String> {
        if self.is_apple_silicon_ready() {
            return None;
        }

        let ppc = self.any(Architecture::is_ppc).then_some("PowerPC");
        let parts: Vec<&str> = [ppc, self.intel_name()].into_iter().flatten().collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

impl FromIterator<Architecture> for ArchitectureSet {
    fn from_iter<I: IntoIterator<Item = Architecture>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ArchitectureSet {
    type Item = &'a Architecture;
    type IntoIter = std::slice::Iter<'a, Architecture>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ArchitectureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", names.join(", "))
    }
}
