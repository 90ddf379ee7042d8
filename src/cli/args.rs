//! Command line argument parsing
//!
//! Subcommands:
//! - `compose`: Convert every service of a Compose file
//! - `run`: Convert a `docker run` invocation
//! - `show-config`: Show configuration discovery information
//! - `init-config`: Write a configuration file from the given flags

use crate::GenerateOptions;
use crate::quadlet::{GlobalArgs, InstallSection, ServiceSection, UnitSection};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug)]
pub enum ExecutionMode {
    Compose(ComposeConfig),
    Run(RunConfig),
    ShowConfig,
    InitConfig { path: PathBuf, options: GenerateOptions },
}

/// How generated units are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Unit text separated by `# <filename>` headers
    #[default]
    Text,
    /// JSON array of `{filename, content}`
    Json,
}

#[derive(Debug)]
pub struct OutputConfig {
    pub output_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub config_override: Option<PathBuf>,
    pub options: GenerateOptions,
}

#[derive(Debug)]
pub struct ComposeConfig {
    pub file: PathBuf,
    pub output: OutputConfig,
}

#[derive(Debug)]
pub struct RunConfig {
    /// One element: a full command string; several: pre-tokenized arguments
    pub command: Vec<String>,
    pub output: OutputConfig,
}

#[derive(Debug, Parser)]
#[command(name = "quadlet-gen")]
#[command(author = "Quadlet Gen Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert Docker Compose services and docker run commands into Podman Quadlet units")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert every service of a Compose file into a .container unit
    Compose {
        /// Path to the Compose file
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        unit: UnitArgs,
    },
    /// Convert a docker run command into a .container unit
    Run {
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        unit: UnitArgs,
        /// The command, either quoted as one argument or given after `--`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Show configuration discovery information
    ShowConfig,
    /// Write a configuration file holding the given unit options
    InitConfig {
        /// Destination file
        path: PathBuf,
        #[command(flatten)]
        unit: UnitArgs,
    },
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct OutputArgs {
    /// Write `<name>.container` files into this directory instead of stdout
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// Output format for stdout
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Configuration file path (skips discovery)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

/// Flags that populate the generation options.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UnitArgs {
    /// Container and unit name (single-unit output only)
    #[arg(long = "name")]
    pub name: Option<String>,
    /// [Unit] Description=
    #[arg(long = "description")]
    pub description: Option<String>,
    /// [Unit] After= (repeatable)
    #[arg(long = "after", value_name = "UNIT")]
    pub after: Vec<String>,
    /// [Unit] Wants= (repeatable)
    #[arg(long = "wants", value_name = "UNIT")]
    pub wants: Vec<String>,
    /// [Unit] Requires= (repeatable)
    #[arg(long = "requires", value_name = "UNIT")]
    pub requires: Vec<String>,
    /// [Unit] Before= (repeatable)
    #[arg(long = "before", value_name = "UNIT")]
    pub before: Vec<String>,
    /// [Service] Restart=
    #[arg(long = "restart")]
    pub restart: Option<String>,
    /// [Service] RestartSec=
    #[arg(long = "restart-sec")]
    pub restart_sec: Option<String>,
    /// [Service] TimeoutStartSec=
    #[arg(long = "timeout-start-sec")]
    pub timeout_start_sec: Option<String>,
    /// [Install] WantedBy= (repeatable)
    #[arg(long = "wanted-by", value_name = "TARGET")]
    pub wanted_by: Vec<String>,
    /// [Install] RequiredBy= (repeatable)
    #[arg(long = "required-by", value_name = "TARGET")]
    pub required_by: Vec<String>,
    /// [GlobalArgs] PodmanArgs=
    #[arg(long = "podman-args", allow_hyphen_values = true)]
    pub podman_args: Option<String>,
}

impl UnitArgs {
    /// Generation options holding only the sections that were given.
    pub fn to_options(&self) -> GenerateOptions {
        let unit = UnitSection {
            description: self.description.clone(),
            after: self.after.clone(),
            wants: self.wants.clone(),
            requires: self.requires.clone(),
            before: self.before.clone(),
        };
        let service = ServiceSection {
            restart: self.restart.clone(),
            restart_sec: self.restart_sec.clone(),
            timeout_start_sec: self.timeout_start_sec.clone(),
        };
        let install = InstallSection {
            wanted_by: self.wanted_by.clone(),
            required_by: self.required_by.clone(),
        };
        let globals = GlobalArgs {
            podman_args: self.podman_args.clone(),
        };

        GenerateOptions {
            name: self.name.clone(),
            unit: (!unit.is_empty()).then_some(unit),
            service: (!service.is_empty()).then_some(service),
            install: (!install.is_empty()).then_some(install),
            globals: (!globals.is_empty()).then_some(globals),
        }
    }
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Result<ExecutionMode, String> {
        match &self.command {
            Some(Commands::Compose { file, output, unit }) => {
                Ok(ExecutionMode::Compose(ComposeConfig {
                    file: file.clone(),
                    output: Self::output_config(output, unit),
                }))
            }
            Some(Commands::Run {
                output,
                unit,
                command,
            }) => Ok(ExecutionMode::Run(RunConfig {
                command: command.clone(),
                output: Self::output_config(output, unit),
            })),
            Some(Commands::ShowConfig) => Ok(ExecutionMode::ShowConfig),
            Some(Commands::InitConfig { path, unit }) => Ok(ExecutionMode::InitConfig {
                path: path.clone(),
                options: unit.to_options(),
            }),
            None => Err(
                "No command specified. Use 'quadlet-gen --help' to see available commands."
                    .to_string(),
            ),
        }
    }

    fn output_config(output: &OutputArgs, unit: &UnitArgs) -> OutputConfig {
        OutputConfig {
            output_dir: output.output_dir.clone(),
            format: output.format,
            config_override: output.config.clone(),
            options: unit.to_options(),
        }
    }
}
