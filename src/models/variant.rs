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

//! Closed variant sets described as static data tables.
//!
//! Every variant has a canonical lowercase key (what the catalog API uses),
//! a list of alias names (what a host or an API may report) and an optional
//! parent variant.

/// One row of a variant table.
#[derive(Debug)]
pub struct VariantEntry<T: 'static> {
    pub variant: T,
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    pub parent: Option<T>,
}

/// A closed set of variants backed by a static table.
pub trait Variant: Copy + Eq + 'static {
    /// Rows in declaration order, so a variant's discriminant is its row index.
    fn table() -> &'static [VariantEntry<Self>];

    fn index(self) -> usize;

    fn entry(self) -> &'static VariantEntry<Self> {
        &Self::table()[self.index()]
    }

    /// Canonical lowercase key.
    fn key(self) -> &'static str {
        self.entry().key
    }

    fn parent(self) -> Option<Self> {
        self.entry().parent
    }

    /// Exact lookup by canonical key.
    fn by_key(key: &str) -> Option<Self> {
        Self::table()
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.variant)
    }

    /// Case-insensitive lookup by alias name.
    fn by_alias(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::table()
            .iter()
            .find(|entry| entry.aliases.iter().any(|alias| *alias == name))
            .map(|entry| entry.variant)
    }
}

/// Implements `Display` and `FromStr` for a variant type in terms of its table.
macro_rules! variant_string_impls {
    ($ty:ty, $what:literal) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", $crate::models::variant::Variant::key(*self))
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::error::ProvisionerError;

            fn from_str(s: &str) -> $crate::error::Result<Self> {
                use $crate::models::variant::Variant;
                let lower = s.to_lowercase();
                Self::by_key(&lower)
                    .or_else(|| Self::by_alias(&lower))
                    .ok_or_else(|| {
                        $crate::error::ProvisionerError::ConfigError(format!(
                            concat!("Unknown ", $what, ": {}"),
                            s
                        ))
                    })
            }
        }
    };
}

pub(crate) use variant_string_impls;
