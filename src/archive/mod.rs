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

//! Extraction of downloaded runtime archives.
//!
//! Archives usually wrap the runtime in a single root folder such as
//! `jdk-21.0.3+9/`. The extractor finds that folder by looking for the
//! `java` launcher and strips it, so the destination itself becomes the
//! runtime home.

use crate::error::{ProvisionerError, Result};
use crate::models::package::ArchiveFormat;
use crate::platform::HostFacts;
use crate::platform::file_ops;
use flate2::read::GzDecoder;
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tar::{Archive as TarArchive, EntryType};
use zip::ZipArchive;

/// Mode applied to zip entries that carry no Unix extra field.
const DEFAULT_ZIP_MODE: u32 = 0o755;

/// Header id of the ASi Unix extra field.
const ASI_UNIX_EXTRA_FIELD: u16 = 0x756e;

pub struct ArchiveExtractor {
    executable: String,
}

impl ArchiveExtractor {
    pub fn new(host: &HostFacts) -> Self {
        Self {
            executable: host.java_executable(),
        }
    }

    /// Path of the launcher relative to an extracted runtime home.
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Extract `archive` into `destination` and return the destination.
    ///
    /// Does nothing if the destination already holds the launcher.
    pub fn extract(
        &self,
        archive: &Path,
        destination: &Path,
        format: ArchiveFormat,
    ) -> Result<PathBuf> {
        let expected = destination.join(&self.executable);
        if expected.exists() {
            debug!("Already extracted: {}", destination.display());
            return Ok(destination.to_path_buf());
        }

        debug!(
            "Extracting {} to: {}",
            archive.display(),
            destination.display()
        );
        let destination = std::path::absolute(destination)?;
        fs::create_dir_all(&destination)?;
        let root = fs::canonicalize(&destination)?;

        let target = Target {
            archive,
            destination: &destination,
            root: &root,
        };
        let written = match format {
            ArchiveFormat::Zip => self.extract_zip(&target)?,
            ArchiveFormat::Tar | ArchiveFormat::TarGz | ArchiveFormat::Tgz => {
                self.extract_tar(&target, format.is_gzipped())?
            }
            other => {
                return Err(ProvisionerError::UnsupportedArchive(format!(
                    "{other} ({})",
                    archive.display()
                )));
            }
        };

        let expected = destination.join(&self.executable);
        if !expected.exists() {
            return Err(ProvisionerError::IncompleteExtraction {
                archive: archive.to_path_buf(),
                expected,
            });
        }

        info!("Extracted {written} files from {}", archive.display());
        Ok(destination)
    }

    /// Archive-internal root folder, taken from the shortest entry name that
    /// ends with the launcher path on a component boundary.
    fn find_prefix<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Option<String> {
        names
            .into_iter()
            .filter_map(|name| name.strip_suffix(self.executable.as_str()))
            .filter(|prefix| prefix.is_empty() || prefix.ends_with('/'))
            .min_by_key(|prefix| prefix.len())
            .map(str::to_string)
    }

    fn extract_zip(&self, target: &Target) -> Result<usize> {
        let mut zip = ZipArchive::new(File::open(target.archive)?)?;

        // Some vendors build their zips with `\` separators.
        let names: Vec<String> = zip.file_names().map(|name| name.replace('\\', "/")).collect();
        let prefix = self.find_prefix(names.iter().map(String::as_str));
        if let Some(prefix) = &prefix {
            debug!("  Prefix: {prefix}");
        }

        let mut written = 0;
        for index in 0..zip.len() {
            let mut file = zip.by_index(index)?;
            let name = file.name().replace('\\', "/");
            if file.is_dir() || name.ends_with('/') {
                continue;
            }

            let Some(out) = target.output_path(prefix.as_deref(), &name)? else {
                continue;
            };
            let mode = zip_mode(file.extra_data());

            target.prepare_parent(&out, &name)?;
            let mut output = File::create(&out)?;
            io::copy(&mut file, &mut output)?;
            drop(output);
            file_ops::set_permissions_from_mode(&out, mode)?;
            written += 1;
        }
        Ok(written)
    }

    fn extract_tar(&self, target: &Target, gzipped: bool) -> Result<usize> {
        let prefix = {
            let mut tar = TarArchive::new(tar_stream(target.archive, gzipped)?);
            let mut names = Vec::new();
            for entry in tar.entries()? {
                let entry = entry?;
                names.push(String::from_utf8_lossy(&entry.path_bytes()).into_owned());
            }
            self.find_prefix(names.iter().map(String::as_str))
        };
        if let Some(prefix) = &prefix {
            debug!("  Prefix: {prefix}");
        }

        // Links are made once every regular file is in place, so no file is
        // ever written through a link taken from the archive.
        let mut hard_links = Vec::new();
        let mut symlinks = Vec::new();

        let mut tar = TarArchive::new(tar_stream(target.archive, gzipped)?);
        let mut written = 0;
        for entry in tar.entries()? {
            let mut entry = entry?;
            let entry_type = entry.header().entry_type();
            if entry_type.is_dir() {
                continue;
            }

            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let Some(out) = target.output_path(prefix.as_deref(), &name)? else {
                continue;
            };

            match entry_type {
                EntryType::Regular | EntryType::Continuous | EntryType::GNUSparse => {
                    let mode = entry.header().mode()?;
                    target.prepare_parent(&out, &name)?;
                    let mut output = File::create(&out)?;
                    io::copy(&mut entry, &mut output)?;
                    drop(output);
                    file_ops::set_permissions_from_mode(&out, mode)?;
                    written += 1;
                }
                EntryType::Symlink => {
                    if let Some(link) = entry.link_name()? {
                        symlinks.push((out, name, link.into_owned()));
                    }
                }
                EntryType::Link => {
                    if let Some(link) = entry.link_name_bytes() {
                        let link = String::from_utf8_lossy(&link).into_owned();
                        if let Some(source) = target.output_path(prefix.as_deref(), &link)? {
                            hard_links.push((out, name, source));
                        }
                    }
                }
                other => debug!("  Skipping {name}: unsupported entry type {other:?}"),
            }
        }

        for (out, name, source) in hard_links {
            target.check_inside(&source, &name)?;
            target.prepare_parent(&out, &name)?;
            fs::copy(&source, &out)?;
            written += 1;
        }

        let mut created = Vec::new();
        for (out, name, link) in symlinks {
            let parent = target.prepare_parent(&out, &name)?;
            target.check_link(&parent, &link, &name)?;
            create_symlink(&link, &out)?;
            created.push((out, name));
            written += 1;
        }

        // A link judged on its own can still leave the destination through
        // another link, e.g. `x -> s/..` next to `s -> .`.
        for (out, name) in created.iter().filter(|(out, _)| out.exists()) {
            if let Err(e) = target.check_inside(out, name) {
                for (out, _) in &created {
                    let _ = fs::remove_file(out);
                }
                return Err(e);
            }
        }
        Ok(written)
    }
}

fn tar_stream(archive: &Path, gzipped: bool) -> Result<Box<dyn Read>> {
    let file = File::open(archive)?;
    Ok(if gzipped {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    })
}

/// The archive being extracted and where it goes. `root` is the canonical
/// form of `destination`; every write must end up below it.
struct Target<'a> {
    archive: &'a Path,
    destination: &'a Path,
    root: &'a Path,
}

impl Target<'_> {
    /// Where an entry lands in `destination`, or `None` if it is outside the
    /// archive's root folder.
    ///
    /// Fails with [`ProvisionerError::PathTraversal`] for names that would
    /// resolve outside `destination`.
    fn output_path(&self, prefix: Option<&str>, name: &str) -> Result<Option<PathBuf>> {
        let relative = match prefix {
            Some(prefix) => match name.strip_prefix(prefix) {
                Some(rest) => rest,
                None => return Ok(None),
            },
            None => name,
        };

        let Some(resolved) = resolve_within(Path::new(relative)) else {
            return Err(self.traversal(name));
        };
        if resolved.as_os_str().is_empty() {
            return Ok(None);
        }
        Ok(Some(self.destination.join(resolved)))
    }

    /// Create the parent directory of `out` and return its canonical path.
    ///
    /// Links extracted earlier are followed on disk, so the check runs on the
    /// deepest directory that already exists before anything is created
    /// below it, and again once the parent is in place.
    fn prepare_parent(&self, out: &Path, name: &str) -> Result<PathBuf> {
        let Some(parent) = out.parent() else {
            return Err(self.traversal(name));
        };
        let Some(existing) = parent.ancestors().find(|dir| dir.exists()) else {
            return Err(self.traversal(name));
        };
        self.check_inside(existing, name)?;

        fs::create_dir_all(parent)?;
        let parent = self.check_inside(parent, name)?;

        // A previous partial extraction may have left a link in the way.
        if fs::symlink_metadata(out).is_ok_and(|meta| meta.file_type().is_symlink()) {
            fs::remove_file(out)?;
        }
        Ok(parent)
    }

    /// Canonical form of the existing `path`, provided it is below `root`.
    fn check_inside(&self, path: &Path, name: &str) -> Result<PathBuf> {
        let canonical = fs::canonicalize(path)?;
        if canonical.starts_with(self.root) {
            Ok(canonical)
        } else {
            Err(self.traversal(name))
        }
    }

    /// A link created in the canonical directory `parent` must point below
    /// `root`.
    fn check_link(&self, parent: &Path, link: &Path, name: &str) -> Result<()> {
        let within = parent
            .strip_prefix(self.root)
            .ok()
            .and_then(|parent| resolve_within(&parent.join(link)));
        match within {
            Some(_) => Ok(()),
            None => Err(self.traversal(name)),
        }
    }

    fn traversal(&self, name: &str) -> ProvisionerError {
        warn!("Failed to extract {}", self.archive.display());
        warn!("  Invalid file! {name}");
        ProvisionerError::PathTraversal {
            archive: self.archive.to_path_buf(),
            entry: name.to_string(),
        }
    }
}

/// Lexically resolve `relative`; `None` if it climbs above its root or is
/// absolute.
fn resolve_within(relative: &Path) -> Option<PathBuf> {
    let mut resolved = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    if link.exists() {
        fs::remove_file(link)?;
    }
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    let source = link.parent().map(|parent| parent.join(target));
    match source {
        Some(source) if source.is_file() => fs::copy(source, link).map(|_| ()),
        _ => {
            debug!("  Skipping link {} -> {}", link.display(), target.display());
            Ok(())
        }
    }
}

/// Permission bits from a zip entry's ASi Unix extra field.
fn zip_mode(extra: Option<&[u8]>) -> u32 {
    let mut mode = DEFAULT_ZIP_MODE;
    let Some(mut data) = extra else {
        return mode;
    };

    while data.len() >= 4 {
        let id = u16::from_le_bytes([data[0], data[1]]);
        let len = usize::from(u16::from_le_bytes([data[2], data[3]]));
        data = &data[4..];
        let block = &data[..len.min(data.len())];

        // CRC-32, then the st_mode short.
        if id == ASI_UNIX_EXTRA_FIELD && block.len() >= 6 {
            mode = u32::from(u16::from_le_bytes([block[4], block[5]])) & 0o777;
        }
        data = &data[block.len()..];
    }
    mode
}
