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

mod common;

use common::{envelope, local_host, package_json, sha256_hex, tar_gz_with_raw_name};
use java_provisioner::catalog::{Catalog, CatalogCache, CatalogClient};
use java_provisioner::download::Downloader;
use java_provisioner::platform::HostFacts;
use java_provisioner::provision::Provisioner;
use mockito::{Matcher, Server, ServerGuard};
use std::path::Path;
use tempfile::TempDir;

const FILENAME: &str = "OpenJDK21U-jdk_hotspot_21.0.1_12.tar.gz";

fn provisioner(server: &ServerGuard, host: HostFacts, cache_dir: &Path, offline: bool) -> Provisioner {
    let catalog = Catalog::new(
        CatalogClient::new().with_base_url(server.url()),
        CatalogCache::new(cache_dir, offline),
        offline,
    );
    Provisioner::new(host, catalog, Downloader::new(cache_dir, offline), cache_dir)
}

/// Serve a one-package catalog whose archive is `archive` and whose
/// published checksum is `checksum`.
fn serve(server: &mut ServerGuard, host: &HostFacts, archive: Vec<u8>, checksum: &str) -> Vec<mockito::Mock> {
    let redirect = format!("{}/download/{FILENAME}", server.url());
    let packages = server
        .mock("GET", "/packages/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(envelope(&[package_json("pkg21", FILENAME, 21, host, &redirect)]))
        .create();
    let detail = server
        .mock("GET", "/ids/pkg21")
        .with_status(200)
        .with_body(envelope(&[format!(
            r#"{{"filename": "{FILENAME}", "direct_download_uri": "{redirect}",
                "checksum": "{checksum}", "checksum_type": "sha256"}}"#
        )]))
        .create();
    let download = server
        .mock("GET", format!("/download/{FILENAME}").as_str())
        .with_status(200)
        .with_body(archive)
        .create();
    vec![packages, detail, download]
}

#[cfg(unix)]
#[test]
#[serial_test::serial]
fn test_provision_downloads_verifies_and_extracts() {
    let host = local_host();
    let staging = TempDir::new().unwrap();
    common::write_fake_jdk(staging.path(), "21", "21.0.1");
    let archive = common::tar_gz_of(staging.path(), "jdk-21.0.1+12");
    let checksum = sha256_hex(&archive);

    let mut server = Server::new();
    let mocks = serve(&mut server, &host, archive, &checksum);

    let cache = TempDir::new().unwrap();
    let install = provisioner(&server, host, cache.path(), false)
        .provision(Some(21), None)
        .unwrap();

    assert_eq!(install.major_version, 21);
    assert_eq!(install.version.as_deref(), Some("21.0.1"));
    assert_eq!(install.home, cache.path().join("OpenJDK21U-jdk_hotspot_21.0.1_12"));
    assert!(cache.path().join(FILENAME).is_file());
    assert!(cache.path().join("packages.json").is_file());
    assert!(cache.path().join(format!("{FILENAME}.json")).is_file());
    for mock in mocks {
        mock.assert();
    }

    // Everything needed is cached now.
    let offline = provisioner(&server, host, cache.path(), true)
        .provision(Some(21), None)
        .unwrap();
    assert_eq!(offline.home, install.home);
}

#[test]
fn test_checksum_mismatch_keeps_archive() {
    let host = local_host();
    let archive = b"not really a tarball".to_vec();

    let mut server = Server::new();
    let _mocks = serve(&mut server, &host, archive, &"0".repeat(64));

    let cache = TempDir::new().unwrap();
    let mut provisioner = provisioner(&server, host, cache.path(), false);
    let error = provisioner.provision(Some(21), None).unwrap_err();

    assert!(error.is_corrupt());
    assert_eq!(
        error.to_string(),
        format!("Failed to provision Disco download: {FILENAME}")
    );
    assert!(cache.path().join(FILENAME).is_file());
    assert!(provisioner.log().contains(&"Verifying checksums".to_string()));
}

#[test]
fn test_malicious_archive_is_rejected() {
    let host = local_host();
    let archive = tar_gz_with_raw_name("../../escaped", b"pwned");
    let checksum = sha256_hex(&archive);

    let mut server = Server::new();
    let _mocks = serve(&mut server, &host, archive, &checksum);

    let root = TempDir::new().unwrap();
    let cache = root.path().join("cache");
    let error = provisioner(&server, host, &cache, false)
        .provision(Some(21), None)
        .unwrap_err();

    assert!(error.is_security_violation());
    assert!(!root.path().join("escaped").exists());
}

#[test]
fn test_unknown_version_reports_both_attempts() {
    let host = local_host();
    let mut server = Server::new();
    let _mocks = serve(&mut server, &host, Vec::new(), &"0".repeat(64));

    let cache = TempDir::new().unwrap();
    let mut provisioner = provisioner(&server, host, cache.path(), false);
    let error = provisioner.provision(Some(8), None).unwrap_err();

    assert_eq!(error.to_string(), "Failed to provision Disco download");
    assert_eq!(error.log().len(), 2);
    assert!(error.log()[1].ends_with(" ANY"));
}
