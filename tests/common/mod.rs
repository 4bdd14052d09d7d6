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

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use java_provisioner::models::package::LibC;
use java_provisioner::platform::{self, HostFacts};
use std::fs;
use std::path::Path;

/// The real OS and architecture with a fixed libc, so no libc probing runs.
pub fn local_host() -> HostFacts {
    HostFacts::new(
        platform::detect_os(),
        platform::detect_architecture(),
        LibC::Glibc,
    )
}

/// Catalog entry JSON for a package built for `host`.
pub fn package_json(id: &str, filename: &str, jdk: u32, host: &HostFacts, redirect: &str) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "archive_type": "tar.gz",
            "distribution": "temurin",
            "major_version": {jdk},
            "java_version": "{jdk}.0.1+9",
            "jdk_version": {jdk},
            "operating_system": "{os}",
            "lib_c_type": "glibc",
            "architecture": "{arch}",
            "javafx_bundled": false,
            "filename": "{filename}",
            "links": {{
                "pkg_info_uri": null,
                "pkg_download_redirect": "{redirect}"
            }},
            "size": 0
        }}"#,
        os = host.os,
        arch = host.arch,
    )
}

pub fn envelope(items: &[String]) -> String {
    format!(r#"{{"result": [{}], "message": ""}}"#, items.join(","))
}

/// A `bin/java` that answers the settings probe for `spec_version`.
#[cfg(unix)]
pub fn write_fake_jdk(home: &Path, spec_version: &str, version: &str) {
    use std::os::unix::fs::PermissionsExt;

    let java = home.join("bin/java");
    fs::create_dir_all(java.parent().unwrap()).unwrap();
    fs::write(
        &java,
        format!(
            "#!/bin/sh\n\
             cat >&2 <<'PROPS'\n\
             Property settings:\n    \
             java.specification.version = {spec_version}\n    \
             java.vendor = Eclipse Adoptium\n    \
             java.version = {version}\n\
             PROPS\n"
        ),
    )
    .unwrap();
    fs::set_permissions(&java, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Pack `home` into a gzipped tarball under the root folder `root`.
pub fn tar_gz_of(home: &Path, root: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    builder.append_dir_all(root, home).unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

/// Gzipped tarball whose single entry is named `name` verbatim.
pub fn tar_gz_with_raw_name(name: &str, contents: &[u8]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let mut header = tar::Header::new_old();
    header.as_old_mut().name[..name.len()].copy_from_slice(name.as_bytes());
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_cksum();
    builder.append(&header, contents).unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(bytes))
}

pub fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}
