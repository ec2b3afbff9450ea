//! Config subcommand handlers.

use std::path::PathBuf;

use pvpc_config::SAMPLE_CONFIG;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

fn target_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(pvpc_config::config_path)
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = pvpc_config::load_config(global.config.as_deref())?;
            // Validate too, so `show` surfaces the same errors `collect` would.
            cfg.to_collector_config()?;
            let rendered = match global.output {
                OutputFormat::Json => serde_json::to_string_pretty(&cfg)?,
                OutputFormat::JsonCompact => serde_json::to_string(&cfg)?,
                OutputFormat::Table | OutputFormat::Line => cfg.to_toml()?,
            };
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&target_path(global).display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = target_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, SAMPLE_CONFIG)?;
            if !global.quiet {
                eprintln!("Wrote sample configuration to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Sample => {
            output::print_output(SAMPLE_CONFIG.trim_end(), global.quiet);
            Ok(())
        }
    }
}
