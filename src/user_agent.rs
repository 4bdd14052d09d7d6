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

//! User-Agent strings for outgoing HTTP requests.

/// The package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for catalog queries
pub fn catalog_client() -> String {
    for_feature("catalog")
}

/// User-Agent for archive and checksum downloads
pub fn download_client() -> String {
    for_feature("download")
}

pub fn for_feature(feature: &str) -> String {
    format!("java-provisioner/{feature}/{VERSION}")
}
