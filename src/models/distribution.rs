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

/// JDK distributions known to the catalog.
///
/// Declaration order is preference order: earlier distributions win when
/// several packages of the same major version match a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Distribution {
    // Preferred
    Microsoft,
    Temurin,
    Zulu,

    Jetbrains,
    Corretto,
    OracleOpenJdk,

    Debian,
    Bisheng,
    Dragonwell,
    Kona,
    Liberica,
    LibericaNative,
    Mandrel,
    Openlogic,
    Redhat,
    SapMachine,

    // Restrictive licensing
    ZuluPrime,
    Oracle,
    Graalvm,

    GraalvmCommunity,
    GluonGraalvm,

    // Unmaintained
    Aoj,
    OjdkBuild,
    Trava,
    GraalvmCe8,
    GraalvmCe11,
    GraalvmCe17,
    GraalvmCe19,
    GraalvmCe16,

    // OpenJ9
    Semeru,
    AojOpenj9,
    SemeruCertified,
}

macro_rules! distro {
    ($variant:ident, $key:literal) => {
        VariantEntry {
            variant: Distribution::$variant,
            key: $key,
            aliases: &[$key],
            parent: None,
        }
    };
}

static DISTRIBUTIONS: &[VariantEntry<Distribution>] = &[
    distro!(Microsoft, "microsoft"),
    distro!(Temurin, "temurin"),
    distro!(Zulu, "zulu"),
    distro!(Jetbrains, "jetbrains"),
    distro!(Corretto, "corretto"),
    distro!(OracleOpenJdk, "oracle_open_jdk"),
    distro!(Debian, "debian"),
    distro!(Bisheng, "bisheng"),
    distro!(Dragonwell, "dragonwell"),
    distro!(Kona, "kona"),
    distro!(Liberica, "liberica"),
    distro!(LibericaNative, "liberica_native"),
    distro!(Mandrel, "mandrel"),
    distro!(Openlogic, "openlogic"),
    distro!(Redhat, "redhat"),
    distro!(SapMachine, "sap_machine"),
    distro!(ZuluPrime, "zulu_prime"),
    distro!(Oracle, "oracle"),
    distro!(Graalvm, "graalvm"),
    distro!(GraalvmCommunity, "graalvm_community"),
    distro!(GluonGraalvm, "gluon_graalvm"),
    distro!(Aoj, "aoj"),
    distro!(OjdkBuild, "ojdk_build"),
    distro!(Trava, "trava"),
    distro!(GraalvmCe8, "graalvm_ce8"),
    distro!(GraalvmCe11, "graalvm_ce11"),
    distro!(GraalvmCe17, "graalvm_ce17"),
    distro!(GraalvmCe19, "graalvm_ce19"),
    distro!(GraalvmCe16, "graalvm_ce16"),
    distro!(Semeru, "semeru"),
    distro!(AojOpenj9, "aoj_openj9"),
    distro!(SemeruCertified, "semeru_certified"),
];

impl Variant for Distribution {
    fn table() -> &'static [VariantEntry<Self>] {
        DISTRIBUTIONS
    }

    fn index(self) -> usize {
        self as usize
    }
}

variant_string_impls!(Distribution, "distribution");

impl Distribution {
    pub fn all() -> impl Iterator<Item = Distribution> {
        DISTRIBUTIONS.iter().map(|entry| entry.variant)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Distribution::Microsoft => "Microsoft Build of OpenJDK",
            Distribution::Temurin => "Eclipse Temurin",
            Distribution::Zulu => "Azul Zulu",
            Distribution::Jetbrains => "JetBrains Runtime",
            Distribution::Corretto => "Amazon Corretto",
            Distribution::OracleOpenJdk => "Oracle OpenJDK",
            Distribution::Dragonwell => "Alibaba Dragonwell",
            Distribution::Kona => "Tencent Kona",
            Distribution::Liberica => "BellSoft Liberica",
            Distribution::Mandrel => "Red Hat Mandrel",
            Distribution::SapMachine => "SAP Machine",
            Distribution::Semeru => "IBM Semeru",
            other => other.key(),
        }
    }
}
