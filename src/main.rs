use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

mod aggregate;
mod cli;
mod config;
mod ext;
mod model;
mod period;
mod report;
mod sheets;
mod telemetry;
mod util;
mod weeek;

use crate::cli::{normalize, Cli};
use crate::config::AppConfig;

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let eff = normalize(cli)?;

  // Phase 2: environment and logging
  let env_loaded = config::load_env_file(eff.overrides.env_file.as_deref());
  telemetry::init(&config::log_filter_from_env())?;
  if !env_loaded.inspect_err(|e| error!(error = %e, "configuration error"))? {
    info!("no env file loaded; using the process environment");
  }

  // Phase 3: configuration (fatal before any network call)
  let cfg = AppConfig::from_env(&eff.overrides).inspect_err(|e| error!(error = %e, "configuration error"))?;

  // Phase 4: run
  report::run(&cfg, &eff)
    .map(|_| ())
    .inspect_err(|e| error!(error = %format!("{e:#}"), "report run failed"))
}
