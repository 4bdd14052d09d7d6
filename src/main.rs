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

use clap::{Parser, Subcommand};
use java_provisioner::catalog::{Catalog, PackageRequest};
use java_provisioner::config::ProvisionerConfig;
use java_provisioner::discovery::LocatorChain;
use java_provisioner::download::Downloader;
use java_provisioner::error::{ProvisionerError, Result, format_error_with_color, get_exit_code};
use java_provisioner::logging;
use java_provisioner::models::distribution::Distribution;
use java_provisioner::models::platform::{Architecture, OperatingSystem};
use java_provisioner::platform::HostFacts;
use java_provisioner::provision::{Provisioner, find_or_provision};
use java_provisioner::version::parse_major_request;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "java-provisioner")]
#[command(author, version, about = "Find or download a Java runtime", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding downloaded and extracted runtimes
    #[arg(long, value_name = "DIR", global = true)]
    cache: Option<PathBuf>,

    /// Never touch the network; use cached catalog data only
    #[arg(long, global = true)]
    offline: bool,

    /// Disable download progress bars
    #[arg(long, global = true)]
    no_progress: bool,

    /// Download timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the home of a runtime for VERSION, provisioning one if needed
    Find {
        /// Major version (e.g. "17", "1.8", "latest")
        version: String,

        /// Preferred distribution when provisioning
        #[arg(long)]
        distro: Option<String>,

        /// Only search this machine
        #[arg(long)]
        no_provision: bool,
    },

    /// List every runtime found on this machine
    #[command(visible_alias = "ls")]
    List {
        /// Only list runtimes of this major version
        #[arg(long)]
        version: Option<String>,
    },

    /// Download and extract a runtime from the catalog
    Provision {
        /// Major version (defaults to the newest available)
        version: Option<String>,

        /// Distribution (e.g. "temurin", "zulu")
        #[arg(long)]
        distro: Option<String>,

        /// Architecture (defaults to this machine's)
        #[arg(long)]
        arch: Option<String>,

        /// Operating system (defaults to this machine's)
        #[arg(long)]
        os: Option<String>,
    },
}

fn load_config(cli: &Cli) -> Result<ProvisionerConfig> {
    let mut config = ProvisionerConfig::from_environment()?;
    if let Some(cache) = &cli.cache {
        config.cache_dir = Some(cache.clone());
    }
    if cli.offline {
        config.offline = true;
    }
    Ok(config)
}

fn parse_version(version: Option<&str>) -> Result<Option<u32>> {
    match version {
        Some(version) => parse_major_request(version),
        None => Ok(None),
    }
}

fn parse_distro(distro: Option<&str>, config: &ProvisionerConfig) -> Result<Option<Distribution>> {
    let Some(name) = distro.or(config.default_distribution.as_deref()) else {
        return Ok(None);
    };
    Distribution::from_str(name).map(Some).map_err(|_| {
        let known: Vec<String> = Distribution::all().map(|d| d.to_string()).collect();
        ProvisionerError::ConfigError(format!(
            "Unknown distribution: {name} (expected one of: {})",
            known.join(", ")
        ))
    })
}

fn provisioner(host: HostFacts, config: &ProvisionerConfig, options: &CliOptions) -> Provisioner {
    let cache_dir = config.jdk_cache_dir();
    let mut downloader = Downloader::new(&cache_dir, config.offline).with_progress(options.progress);
    if let Some(timeout) = options.timeout {
        downloader = downloader.with_timeout(Duration::from_secs(timeout));
    }
    Provisioner::new(host, Catalog::from_config(config), downloader, &cache_dir)
}

struct CliOptions {
    progress: bool,
    timeout: Option<u64>,
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let host = HostFacts::detect();
    let options = CliOptions {
        progress: !cli.no_progress,
        timeout: cli.timeout,
    };

    match cli.command {
        Commands::Find {
            version,
            distro,
            no_provision,
        } => {
            let version = parse_major_request(&version)?;
            let mut chain = LocatorChain::standard(host, &config);
            let install = if no_provision {
                chain.find(version)?
            } else {
                let distro = parse_distro(distro.as_deref(), &config)?;
                let mut provisioner = provisioner(host, &config, &options);
                find_or_provision(&mut chain, &mut provisioner, version, distro)?
            };
            println!("{}", install.home.display());
        }
        Commands::List { version } => {
            let version = parse_version(version.as_deref())?;
            let mut chain = LocatorChain::standard(host, &config);
            for install in chain.find_all(version) {
                println!("{install}");
            }
        }
        Commands::Provision {
            version,
            distro,
            arch,
            os,
        } => {
            let request = PackageRequest::new(parse_version(version.as_deref())?)
                .with_distro(parse_distro(distro.as_deref(), &config)?)
                .with_arch(Some(match arch {
                    Some(arch) => Architecture::from_str(&arch)?,
                    None => host.arch,
                }))
                .with_os(Some(match os {
                    Some(os) => OperatingSystem::from_str(&os)?,
                    None => host.os,
                }));

            let install = provisioner(host, &config, &options).provision_request(request)?;
            println!("{}", install.home.display());
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::setup_logger(cli.verbose);

    if let Err(e) = run(cli) {
        let color = std::io::stderr().is_terminal();
        eprintln!("{}", format_error_with_color(&e, color));
        std::process::exit(get_exit_code(&e));
    }
}
