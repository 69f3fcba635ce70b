use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::settings::DeploySettings;
use crate::config::types::DeployError;
use crate::image::{verify_root, BuildDefinition};
use crate::install::supervisor::SupervisorCtl;
use crate::launch::environment;
use crate::observability::audit::{self, DeployEvent, DeployEventType};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CliMode {
    Full,
    Install,
    Launch,
}

impl CliMode {
    fn primary_binary(self) -> &'static str {
        match self {
            Self::Full => "sttctl",
            Self::Install => "stt-install",
            Self::Launch => "stt-launch",
        }
    }

    fn mode_name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Install => "install",
            Self::Launch => "launch",
        }
    }

    fn allows(self, command: &Commands) -> bool {
        match self {
            Self::Full => true,
            Self::Install => matches!(command, Commands::Install { .. }),
            Self::Launch => matches!(command, Commands::Launch | Commands::CheckEnv),
        }
    }

    /// Single-purpose binaries run their command with no subcommand given.
    fn default_command(self) -> Option<Commands> {
        match self {
            Self::Full => None,
            Self::Install => Some(Commands::Install {
                source: None,
                target: None,
                ctl: None,
            }),
            Self::Launch => Some(Commands::Launch),
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to deploy.json (defaults to ./deploy.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Append deploy audit events to this JSON-lines file
    #[arg(long, global = true)]
    audit_log: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the supervisor program definition and apply it
    Install {
        /// Supervisor config to install (overrides deploy.json)
        #[arg(long)]
        source: Option<PathBuf>,
        /// Destination path in the supervisor's conf.d directory
        #[arg(long)]
        target: Option<PathBuf>,
        /// supervisorctl executable
        #[arg(long)]
        ctl: Option<String>,
    },
    /// Resolve the environment and exec the WSGI server
    Launch,
    /// Render the canonical container build definition
    Render {
        /// Write the Dockerfile here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Verify a materialized image filesystem against the build definition
    Verify {
        /// Root of the materialized filesystem
        #[arg(long)]
        root: PathBuf,
        /// Emit the machine-readable JSON report
        #[arg(long)]
        json: bool,
    },
    /// Print the port and redacted secret report without launching
    CheckEnv,
}

impl Commands {
    fn command_name(&self) -> &'static str {
        match self {
            Self::Install { .. } => "install",
            Self::Launch => "launch",
            Self::Render { .. } => "render",
            Self::Verify { .. } => "verify",
            Self::CheckEnv => "check-env",
        }
    }
}

fn validate_command_mode(mode: CliMode, command: &Commands) {
    if mode.allows(command) {
        return;
    }

    eprintln!(
        "Error: command '{}' is not available in '{}' mode",
        command.command_name(),
        mode.mode_name()
    );

    match mode {
        CliMode::Full => {}
        CliMode::Install => {
            eprintln!(
                "Use '{}' for launch, render, and verify commands.",
                CliMode::Full.primary_binary()
            );
        }
        CliMode::Launch => {
            eprintln!(
                "Use '{}' for install, render, and verify commands.",
                CliMode::Full.primary_binary()
            );
        }
    }

    std::process::exit(2);
}

pub fn run(mode: CliMode) -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = audit::init_audit_log(cli.audit_log.clone()) {
        eprintln!("Failed to initialize audit log: {}", e);
        std::process::exit(1);
    }

    let command = match cli.command {
        Some(command) => command,
        None => match mode.default_command() {
            Some(command) => command,
            None => {
                eprintln!("Error: missing command. See '{} --help'.", mode.primary_binary());
                std::process::exit(2);
            }
        },
    };
    validate_command_mode(mode, &command);

    let settings = match &cli.config {
        Some(path) => DeploySettings::load_from_file(path),
        None => DeploySettings::load_default(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => return fail(e),
    };

    match command {
        Commands::Install {
            source,
            target,
            ctl,
        } => {
            // Writing under /etc and driving supervisord both need
            // elevated privileges on a stock host.
            if unsafe { libc::getuid() } != 0 {
                eprintln!(
                    "Warning: {} install usually requires root privileges",
                    mode.primary_binary()
                );
            }

            let mut profile = settings.install_profile();
            if let Some(source) = source {
                profile.source = source;
            }
            if let Some(target) = target {
                profile.target = target;
            }
            if let Some(ctl) = ctl {
                profile.ctl_program = ctl;
            }

            let ctl = SupervisorCtl::new(profile.ctl_program.clone());
            match crate::install::run_install(&profile, &ctl) {
                Ok(()) => Ok(()),
                Err(e) => fail(e),
            }
        }
        Commands::Launch => {
            if !cfg!(unix) {
                eprintln!("Error: launch requires a Unix host for process replacement");
                std::process::exit(1);
            }

            audit::record(DeployEvent::new(DeployEventType::LaunchStart, ""));
            // run_launcher only returns on failure; success is an exec.
            match crate::launch::run_launcher(&settings) {
                Ok(()) => Ok(()),
                Err(e) => {
                    audit::record(DeployEvent::new(
                        DeployEventType::LaunchFailure,
                        e.to_string(),
                    ));
                    fail(e)
                }
            }
        }
        Commands::Render { output } => {
            audit::record(DeployEvent::new(DeployEventType::RenderRun, ""));
            let dockerfile = BuildDefinition::default().render_dockerfile();
            match output {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, &dockerfile) {
                        return fail(DeployError::Image(format!(
                            "Failed to write {}: {}",
                            path.display(),
                            e
                        )));
                    }
                    eprintln!("Wrote {}", path.display());
                }
                None => print!("{}", dockerfile),
            }
            Ok(())
        }
        Commands::Verify { root, json } => {
            audit::record(DeployEvent::new(
                DeployEventType::VerifyRun,
                format!("root={}", root.display()),
            ));
            let report = verify_root(&BuildDefinition::default(), &root);

            if json {
                match report.to_json() {
                    Ok(text) => println!("{}", text),
                    Err(e) => return fail(e),
                }
            } else if report.ok {
                println!("OK: {} paths verified under {}", report.checked, root.display());
            } else {
                for path in &report.missing {
                    eprintln!("missing: {}", path.display());
                }
            }

            if !report.ok {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::CheckEnv => {
            let vars = environment::env_snapshot();
            match environment::resolve_port_from(&vars) {
                Ok(port) => println!("PORT: {}", port),
                Err(e) => return fail(e),
            }
            for status in environment::secret_report_from(&vars) {
                println!("{}", status.display_line());
            }
            Ok(())
        }
    }
}

/// Report the error and exit with its sysexits-style code. Every
/// failure aborts; nothing runs past it.
fn fail(err: DeployError) -> Result<()> {
    eprintln!("Error: {}", err);
    std::process::exit(i32::from(&err));
}
