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

use crate::models::package::LibC;
use crate::models::platform::{Architecture, OperatingSystem};
use crate::models::variant::Variant;
use log::{debug, warn};
use std::process::Command;

/// Exit status and combined stdout/stderr of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub text: String,
}

/// Run a command to completion. Returns `None` if it could not be started.
pub fn run_command(program: &str, args: &[&str]) -> Option<CommandOutput> {
    match Command::new(program).args(args).output() {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            Some(CommandOutput {
                success: output.status.success(),
                text,
            })
        }
        Err(e) => {
            debug!("Failed to start `{program}`: {e}");
            None
        }
    }
}

/// Map the compile-time target architecture to a catalog architecture.
pub fn detect_architecture() -> Architecture {
    match std::env::consts::ARCH {
        "powerpc64" if cfg!(target_endian = "little") => Architecture::Ppc64le,
        "powerpc64" => Architecture::Ppc64,
        "powerpc" => Architecture::Ppc,
        "sparc64" => Architecture::SparcV9,
        "mips" | "mips64" => Architecture::Mips,
        other => Architecture::by_alias(other).unwrap_or(Architecture::Unknown),
    }
}

pub fn detect_os() -> OperatingSystem {
    match std::env::consts::OS {
        "linux" if cfg!(target_env = "musl") => OperatingSystem::LinuxMusl,
        other => OperatingSystem::by_alias(other).unwrap_or(OperatingSystem::Unknown),
    }
}

/// Guess the host C library.
///
/// Musl is only reported when the OS itself says so, or when `getconf
/// GNU_LIBC_VERSION` or `ldd --version` mention it. Anything else, including
/// every non-Linux host, is treated as glibc.
pub fn detect_libc<F>(os: OperatingSystem, mut run: F) -> LibC
where
    F: FnMut(&str, &[&str]) -> Option<CommandOutput>,
{
    if os == OperatingSystem::LinuxMusl {
        return LibC::Musl;
    }
    if !os.is_linux_family() {
        return LibC::Glibc;
    }

    let probes: [(&str, &[&str]); 2] = [("getconf", &["GNU_LIBC_VERSION"]), ("ldd", &["--version"])];
    for (program, args) in probes {
        match run(program, args) {
            Some(output) if output.success => {
                if output.text.to_lowercase().contains("musl") {
                    return LibC::Musl;
                }
            }
            Some(output) => {
                let first = output.text.lines().next().unwrap_or_default();
                warn!("Failed to run `{program} {}`: {first}", args.join(" "));
            }
            None => warn!("Failed to run `{program} {}`", args.join(" ")),
        }
    }

    LibC::Glibc
}
