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

use crate::error::{ProvisionerError, Result};
use std::cmp::Ordering;
use std::str::FromStr;

/// A parsed Java runtime version.
///
/// Accepts the shapes found in catalog entries and `java.version`
/// properties: `22.0.1+8`, `21-ea`, `17.0.11+9-LTS`, and the legacy
/// `1.8.0_412-b08` form, which is normalized to `8.0.412+8`.
#[derive(Debug, Clone)]
pub struct JavaVersion {
    pub components: Vec<u32>,
    pub build: Option<Vec<u32>>,
    pub pre_release: Option<String>,
}

impl JavaVersion {
    pub fn new(components: Vec<u32>) -> Self {
        Self {
            components,
            build: None,
            pre_release: None,
        }
    }

    pub fn major(&self) -> u32 {
        self.components.first().copied().unwrap_or(0)
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre_release.is_some()
    }

    fn component(&self, index: usize) -> u32 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

fn parse_numbers(s: &str, original: &str) -> Result<Vec<u32>> {
    s.split(['.', '_'])
        .map(|part| {
            part.parse::<u32>()
                .map_err(|_| ProvisionerError::InvalidVersion(original.to_string()))
        })
        .collect()
}

impl FromStr for JavaVersion {
    type Err = ProvisionerError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProvisionerError::InvalidVersion(s.to_string()));
        }

        let split = trimmed.find(['+', '-']).unwrap_or(trimmed.len());
        let (core, mut rest) = trimmed.split_at(split);

        let mut components = parse_numbers(core, s)?;
        // 1.8.0_412 is Java 8 update 412
        if components.len() > 1 && components[0] == 1 {
            components.remove(0);
        }

        let mut pre_release = None;
        let mut build = None;

        if let Some(after_dash) = rest.strip_prefix('-') {
            let end = after_dash.find('+').unwrap_or(after_dash.len());
            let tag = &after_dash[..end];
            if tag.is_empty() {
                return Err(ProvisionerError::InvalidVersion(s.to_string()));
            }
            // Legacy builds are spelled `-b08`
            match tag.strip_prefix('b').map(str::parse::<u32>) {
                Some(Ok(number)) => build = Some(vec![number]),
                _ => pre_release = Some(tag.to_string()),
            }
            rest = &after_dash[end..];
        }

        if let Some(after_plus) = rest.strip_prefix('+') {
            // Anything after a second dash is an optional tag such as `LTS`
            let end = after_plus.find('-').unwrap_or(after_plus.len());
            build = Some(parse_numbers(&after_plus[..end], s)?);
        }

        Ok(JavaVersion {
            components,
            build,
            pre_release,
        })
    }
}

impl Ord for JavaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for index in 0..len {
            match self.component(index).cmp(&other.component(index)) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }

        // A release sorts above its pre-releases
        let pre = match (&self.pre_release, &other.pre_release) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        };
        if pre != Ordering::Equal {
            return pre;
        }

        self.build.cmp(&other.build)
    }
}

impl PartialOrd for JavaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for JavaVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for JavaVersion {}

impl std::fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |parts: &[u32]| {
            parts
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(".")
        };

        write!(f, "{}", join(&self.components))?;
        if let Some(pre_release) = &self.pre_release {
            write!(f, "-{pre_release}")?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", join(build))?;
        }
        Ok(())
    }
}

/// Major version of a `java.specification.version` value (`1.8` is 8).
pub fn parse_specification_version(s: &str) -> Option<u32> {
    let s = s.trim();
    let s = s.strip_prefix("1.").unwrap_or(s);
    s.split('.').next()?.parse().ok()
}

/// Parse a user supplied major version; `latest`, `*` or an empty string
/// request the newest available.
pub fn parse_major_request(s: &str) -> Result<Option<u32>> {
    match s.trim() {
        "" | "latest" | "*" => Ok(None),
        other => parse_specification_version(other)
            .map(Some)
            .ok_or_else(|| ProvisionerError::InvalidVersion(s.to_string())),
    }
}
