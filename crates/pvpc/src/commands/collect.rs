//! `pvpc collect`: one collection, printed.

use tracing::debug;

use pvpc_config::Config;
use pvpc_core::{PriceCollector, Sample, WindowEnd};

use crate::cli::{CollectArgs, GlobalOpts, WindowEndArg};
use crate::error::CliError;
use crate::output;

impl From<WindowEndArg> for WindowEnd {
    fn from(arg: WindowEndArg) -> Self {
        match arg {
            WindowEndArg::Today => WindowEnd::Today,
            WindowEndArg::Tomorrow => WindowEnd::Tomorrow,
        }
    }
}

/// Layer command-line overrides on top of the loaded file/env config.
pub(crate) fn apply_overrides(cfg: &mut Config, args: &CollectArgs, global: &GlobalOpts) {
    if let Some(ref time_trunc) = args.time_trunc {
        cfg.time_trunc.clone_from(time_trunc);
    }
    if let Some(geo_id) = args.geo_id {
        cfg.geo_id = geo_id;
    }
    if let (Some(start), Some(end)) = (&args.start, &args.end) {
        cfg.start_date = Some(start.clone());
        cfg.end_date = Some(end.clone());
    }
    if let Some(window_end) = args.window_end {
        cfg.window_end = window_end.into();
    }
    if let Some(ref timeout) = global.timeout {
        cfg.http_timeout.clone_from(timeout);
    }
    if let Some(ref api_url) = global.api_url {
        cfg.api_url = Some(api_url.clone());
    }
}

pub async fn handle(args: &CollectArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = pvpc_config::load_config(global.config.as_deref())?;
    apply_overrides(&mut cfg, args, global);

    let collector_config = cfg.to_collector_config()?;
    let collector = PriceCollector::new(collector_config.clone())
        .map_err(|e| CliError::from_core(e, &collector_config))?;

    let mut samples: Vec<Sample> = Vec::new();
    let count = collector
        .collect(&mut samples)
        .await
        .map_err(|e| CliError::from_core(e, &collector_config))?;
    debug!(count, "collection finished");

    if count == 0 && !global.quiet {
        eprintln!("No prices available for the requested range.");
    }

    let rendered = output::render_samples(
        &global.output,
        &samples,
        output::should_color(&global.color),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
