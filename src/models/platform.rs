// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::models::variant::{Variant, VariantEntry, variant_string_impls};

/// CPU architectures as named by the catalog.
///
/// The catalog has several names for the same hardware (`x64`, `amd64`,
/// `x86_64`); the narrower names point at their canonical parent so that a
/// host reporting `amd64` still accepts packages published as `x64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Architecture {
    X86,
    X64,
    Aarch32,
    Aarch64,
    Ppc,
    Ppc64,
    Amd64,
    Arm,
    Arm32,
    Arm64,
    Mips,
    Ppc64el,
    Ppc64le,
    Riscv64,
    S390,
    S390x,
    Sparc,
    SparcV9,
    X86_64,
    X86_32,
    I386,
    I486,
    I586,
    I686,
    Unknown,
}

macro_rules! arch {
    ($variant:ident, $key:literal, [$($alias:literal),*], $parent:expr) => {
        VariantEntry {
            variant: Architecture::$variant,
            key: $key,
            aliases: &[$($alias),*],
            parent: $parent,
        }
    };
}

static ARCHITECTURES: &[VariantEntry<Architecture>] = &[
    arch!(X86, "x86", ["x86", "x32", "286"], None),
    arch!(X64, "x64", ["x64"], None),
    arch!(Aarch32, "aarch32", ["aarch32"], None),
    arch!(Aarch64, "aarch64", ["aarch64"], None),
    arch!(Ppc, "ppc", ["ppc"], None),
    arch!(Ppc64, "ppc64", ["ppc64"], None),
    arch!(Amd64, "amd64", ["amd64", "_amd64"], Some(Architecture::X64)),
    arch!(Arm, "arm", ["arm"], None),
    arch!(Arm32, "arm32", ["arm32", "aarch32", "armv6", "armv7l", "armv7"], None),
    arch!(Arm64, "arm64", ["arm64", "armv8"], None),
    arch!(Mips, "mips", ["mips"], None),
    arch!(Ppc64el, "ppc64el", ["ppc64el"], Some(Architecture::Ppc64)),
    arch!(Ppc64le, "ppc64le", ["ppc64le"], Some(Architecture::Ppc64)),
    arch!(Riscv64, "riscv64", ["riscv64", "risc-v", "riscv"], None),
    arch!(S390, "s390", ["s390"], None),
    arch!(S390x, "s390x", ["s390x"], None),
    arch!(Sparc, "sparc", ["sparc"], None),
    arch!(SparcV9, "sparcv9", ["sparcv9"], None),
    arch!(X86_64, "x86-64", ["x86-64", "x86_64", "x86lx64"], Some(Architecture::X64)),
    arch!(X86_32, "x86-32", ["x86-32", "x86_32", "x86lx32"], Some(Architecture::X86)),
    arch!(I386, "i386", ["i396", "386", "i386"], Some(Architecture::X86)),
    arch!(I486, "i486", ["i496", "486", "i486"], Some(Architecture::X86)),
    arch!(I586, "i586", ["i596", "586", "i586"], Some(Architecture::X86)),
    arch!(I686, "i686", ["i696", "686", "i686"], Some(Architecture::X86)),
    arch!(Unknown, "unknown", ["unknown"], None),
];

impl Variant for Architecture {
    fn table() -> &'static [VariantEntry<Self>] {
        ARCHITECTURES
    }

    fn index(self) -> usize {
        self as usize
    }
}

variant_string_impls!(Architecture, "architecture");

impl Architecture {
    pub fn is_64_bit(self) -> bool {
        matches!(
            self,
            Architecture::X64
                | Architecture::Amd64
                | Architecture::Arm64
                | Architecture::X86_64
                | Architecture::Aarch64
                | Architecture::Ppc64
                | Architecture::Ppc64el
                | Architecture::Riscv64
        )
    }

    pub fn is_arm(self) -> bool {
        matches!(
            self,
            Architecture::Arm
                | Architecture::Arm32
                | Architecture::Arm64
                | Architecture::Aarch32
                | Architecture::Aarch64
                | Architecture::Riscv64
        )
    }

    /// Whether a package built for `package` can run on `self`.
    ///
    /// Accepts an exact match or a package published under this
    /// architecture's declared parent.
    pub fn accepts(self, package: Architecture) -> bool {
        self == package || self.parent() == Some(package)
    }

    /// Suffix used by CI images for per-architecture `JAVA_HOME_<n>` variables.
    pub fn env_suffix(self) -> &'static str {
        if !self.is_64_bit() {
            ""
        } else if self.is_arm() {
            "_arm64"
        } else {
            "_X64"
        }
    }
}

/// Operating system families as named by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatingSystem {
    Windows,
    MacOs,
    Linux,
    AlpineLinux,
    LinuxMusl,
    Aix,
    Solaris,
    Qnx,
    FreeBsd,
    Unknown,
}

static OPERATING_SYSTEMS: &[VariantEntry<OperatingSystem>] = &[
    VariantEntry {
        variant: OperatingSystem::Windows,
        key: "windows",
        aliases: &["windows", "win"],
        parent: None,
    },
    VariantEntry {
        variant: OperatingSystem::MacOs,
        key: "macos",
        aliases: &["macos", "mac", "osx", "darwin"],
        parent: None,
    },
    VariantEntry {
        variant: OperatingSystem::Linux,
        key: "linux",
        aliases: &["linux"],
        parent: None,
    },
    VariantEntry {
        variant: OperatingSystem::AlpineLinux,
        key: "alpine_linux",
        aliases: &["alpine_linux", "alpine", "alpine-linux"],
        parent: Some(OperatingSystem::Linux),
    },
    VariantEntry {
        variant: OperatingSystem::LinuxMusl,
        key: "linux_musl",
        aliases: &["linux_musl", "musl"],
        parent: Some(OperatingSystem::Linux),
    },
    VariantEntry {
        variant: OperatingSystem::Aix,
        key: "aix",
        aliases: &["aix"],
        parent: None,
    },
    VariantEntry {
        variant: OperatingSystem::Solaris,
        key: "solaris",
        aliases: &["solaris", "sunos"],
        parent: None,
    },
    VariantEntry {
        variant: OperatingSystem::Qnx,
        key: "qnx",
        aliases: &["qnx"],
        parent: None,
    },
    VariantEntry {
        variant: OperatingSystem::FreeBsd,
        key: "freebsd",
        aliases: &["freebsd"],
        parent: None,
    },
    VariantEntry {
        variant: OperatingSystem::Unknown,
        key: "unknown",
        aliases: &["unknown"],
        parent: None,
    },
];

impl Variant for OperatingSystem {
    fn table() -> &'static [VariantEntry<Self>] {
        OPERATING_SYSTEMS
    }

    fn index(self) -> usize {
        self as usize
    }
}

variant_string_impls!(OperatingSystem, "operating system");

impl OperatingSystem {
    pub fn is_linux_family(self) -> bool {
        self == OperatingSystem::Linux || self.parent() == Some(OperatingSystem::Linux)
    }

    pub fn executable_extension(self) -> &'static str {
        match self {
            OperatingSystem::Windows => ".exe",
            _ => "",
        }
    }
}
