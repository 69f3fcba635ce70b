//! Startup launcher
//!
//! Port resolution, redacted secret presence reporting, runtime
//! directory preparation, and process replacement into the WSGI server.
//! Every step aborts on first failure.

pub mod environment;
pub mod server;
pub mod workdirs;

use crate::config::settings::DeploySettings;
use crate::config::types::Result;
use crate::observability::audit::{self, DeployEvent, DeployEventType};

/// Startup banner, printed before the secret presence report
pub fn startup_banner(port: u16) -> String {
    format!("Starting YouTube STT on port {}", port)
}

/// Run the launcher end to end
///
/// On success this never returns: the final step replaces the process
/// with the server. Any error before (or from) the exec propagates out.
pub fn run_launcher(settings: &DeploySettings) -> Result<()> {
    let vars = environment::env_snapshot();
    let port = environment::resolve_port_from(&vars)?;

    println!("{}", startup_banner(port));
    for status in environment::secret_report_from(&vars) {
        println!("{}", status.display_line());
    }

    let dirs = environment::resolve_dirs_from(&vars, &settings.runtime_dirs());
    workdirs::prepare(&dirs, &workdirs::PermissionPolicy::default())?;

    audit::record(DeployEvent::new(
        DeployEventType::LaunchExec,
        format!("port={} workers=2 threads=4", port),
    ));

    server::exec(&settings.server_profile(port))
}
