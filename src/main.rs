//! Font Directory Watcher Service
//!
//! Watches `<public root>/fonts` and registers every font file dropped into
//! it with the operating system, while running as a managed service.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────┐  ControlRequest   ┌───────────────────────┐  ServiceStatus   ┌──────────────┐
//!   │ host (SCM or │──────────────────▶│  service control loop │─────────────────▶│ host         │
//!   │ signals)     │                   │  tick | control |     │                  │              │
//!   └──────────────┘                   │  change event         │                  └──────────────┘
//!                                      └───┬───────────▲───────┘
//!                       Shutdown::trigger  │           │ ChangeEvent
//!                                          ▼           │
//!                                      ┌───────────────┴───────┐        ┌──────────────────────┐
//!                                      │ watcher pump          │◀───────│ notify backend       │
//!                                      └───────────────────────┘  raw   └──────────────────────┘
//!
//!   Created event ──spawn──▶ font registrar task (settle → AddFontResourceW → event log)
//! ```

use std::path::PathBuf;

use clap::Parser;

use fontwatch::config::load_or_default;
use fontwatch::host;
use fontwatch::observability::logging::init_logging;
use fontwatch::observability::metrics::init_metrics;
use fontwatch::observability::{EventCode, EventLog};

#[derive(Parser)]
#[command(name = "fontwatch")]
#[command(about = "Registers fonts dropped into the shared fonts directory", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run in the foreground instead of under the service manager.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability)?;

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let name = config.service.name.clone();
    let log = EventLog::tracing(name.as_str());
    log.info(EventCode::Service, format!("starting {} service", name));

    let result = if cli.debug {
        host::console::run(&config, log.clone())
    } else {
        host::run_service(config, log.clone())
    };

    match result {
        Ok(()) => {
            log.info(EventCode::Service, format!("{} service stopped", name));
            Ok(())
        }
        Err(e) => {
            log.error(EventCode::Service, format!("{} service failed: {}", name, e));
            Err(e.into())
        }
    }
}
