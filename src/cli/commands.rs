//! Command implementations for the synmerge CLI.

use log::debug;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::MergeConfig;
use crate::error::Result;
use crate::pipeline::{run_inspect, run_merge};
use crate::progress::{LogProgress, NoProgress, ProgressReporter};

/// Execute a CLI command.
pub fn execute_command(args: SynmergeArgs) -> Result<()> {
    match &args.command {
        Command::Merge(merge_args) => merge(merge_args, &args),
        Command::Inspect(inspect_args) => inspect(inspect_args, &args),
    }
}

/// Merge rows and write the output file.
fn merge(args: &MergeArgs, cli_args: &SynmergeArgs) -> Result<()> {
    let mut config = base_config(&args.tuning)?;
    if let Some(path) = &args.hmdb_file_path {
        config.hmdb_file_path = path.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(name) = &args.output_file_name {
        config.output_file_name = name.clone();
    }
    if args.overwrite {
        config.overwrite = true;
    }
    debug!("Effective config: {config:?}");

    let mut progress = reporter(args.tuning.progress);
    let summary = run_merge(&config, progress.as_mut())?;

    output_result("Merge completed", &summary, cli_args)
}

/// Report clusters without writing output.
fn inspect(args: &InspectArgs, cli_args: &SynmergeArgs) -> Result<()> {
    let mut config = base_config(&args.tuning)?;
    if let Some(path) = &args.hmdb_file_path {
        config.hmdb_file_path = path.clone();
    }
    debug!("Effective config: {config:?}");

    let mut progress = reporter(args.tuning.progress);
    let report = run_inspect(&config, args.show_clusters, progress.as_mut())?;

    output_result("Cluster report", &report, cli_args)
}

/// Config file (if any) with the tuning flags applied on top.
pub fn base_config(tuning: &TuningArgs) -> Result<MergeConfig> {
    let mut config = match &tuning.config {
        Some(path) => MergeConfig::from_json_file(path)?,
        None => MergeConfig::default(),
    };

    if let Some(min_syn_length) = tuning.min_syn_length {
        config.min_syn_length = min_syn_length;
    }
    if let Some(match_threshold) = tuning.match_threshold {
        config.match_threshold = match_threshold;
    }
    if let Some(delimiter) = tuning.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(tokens) = &tuning.missing_tokens {
        config.missing_tokens = tokens.clone();
    }

    Ok(config)
}

fn reporter(enabled: bool) -> Box<dyn ProgressReporter> {
    if enabled {
        Box::new(LogProgress::default())
    } else {
        Box::new(NoProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"min_syn_length": 5, "delimiter": ";", "match_threshold": 0.3}}"##
        )
        .unwrap();

        let tuning = TuningArgs {
            config: Some(file.path().to_path_buf()),
            min_syn_length: Some(2),
            ..Default::default()
        };
        let config = base_config(&tuning).unwrap();

        assert_eq!(config.min_syn_length, 2);
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.match_threshold, 0.3);
    }

    #[test]
    fn test_defaults_without_config_file() {
        let config = base_config(&TuningArgs::default()).unwrap();
        assert_eq!(config, MergeConfig::default());
    }
}
