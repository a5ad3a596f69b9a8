//! Command-line entry point: load ground truth for a dataset and report label statistics.

use std::path::PathBuf;

use framegt::config::{self, GroundTruthSettings};
use framegt::ground_truth::GroundTruth;
use framegt::logging::{self, LogTarget};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    let settings = resolve_settings(&options)?;

    let target = if options.no_log_file {
        LogTarget::StdoutOnly
    } else {
        settings
            .log_dir
            .clone()
            .map(LogTarget::Dir)
            .unwrap_or_default()
    };
    if let Err(err) = logging::init(target) {
        eprintln!("Logging disabled: {err}");
    }

    if !settings.gt_root.is_dir() {
        return Err(format!(
            "Ground-truth path is not a directory: {}",
            settings.gt_root.display()
        ));
    }

    let mut gt = GroundTruth::new(settings);
    gt.load_mapping().map_err(|err| err.to_string())?;
    if options.sparse {
        gt.sparse_gt().map_err(|err| err.to_string())?;
    }

    let mapping = gt.mapping();
    println!("labels: {}", mapping.len());
    match mapping.background_index() {
        Some(index) => println!("background index: {index}"),
        None => println!("background index: none"),
    }
    println!("videos: {}", gt.store().len());
    if !gt.skipped().is_empty() {
        println!("skipped ({}):", gt.skipped().len());
        for video in gt.skipped() {
            println!("  {video}");
        }
    }
    for summary in gt.activity_summaries(&options.activities) {
        println!(
            "activity {:<16} videos={:<5} K={}",
            summary.activity, summary.videos, summary.k
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    config_path: Option<PathBuf>,
    gt_root: Option<PathBuf>,
    keep_background: bool,
    smooth_zeros: bool,
    sparse: bool,
    stride: Option<usize>,
    activities: Vec<String>,
    no_log_file: bool,
}

fn resolve_settings(options: &CliOptions) -> Result<GroundTruthSettings, String> {
    let mut settings = match &options.config_path {
        Some(path) => config::load_settings_from(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())?;
    if let Some(root) = &options.gt_root {
        settings.gt_root = root.clone();
    }
    if options.keep_background {
        settings.bg = true;
    }
    if options.smooth_zeros {
        settings.zeros = false;
    }
    if let Some(stride) = options.stride {
        settings.sparse_stride = stride;
    }
    settings.validate().map_err(|err| err.to_string())?;
    Ok(settings)
}

fn parse_args(args: Vec<String>) -> Result<Option<CliOptions>, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--gt" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--gt requires a value".to_string())?;
                options.gt_root = Some(PathBuf::from(value));
            }
            "--activity" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--activity requires a value".to_string())?;
                options.activities.push(value.clone());
            }
            "--stride" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--stride requires a value".to_string())?;
                let stride = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --stride value: {value}"))?;
                options.stride = Some(stride);
            }
            "--bg" => options.keep_background = true,
            "--no-zeros" => options.smooth_zeros = true,
            "--sparse" => options.sparse = true,
            "--no-log-file" => options.no_log_file = true,
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(Some(options))
}

fn help_text() -> String {
    [
        "framegt",
        "",
        "Load frame-level ground truth, cache it and report per-activity label counts.",
        "",
        "Usage:",
        "  framegt [--config <file>] [--gt <dir>] [--bg] [--no-zeros] [--sparse]",
        "          [--stride <n>] [--activity <name>]... [--no-log-file]",
        "",
        "Options:",
        "  --config <file>    Settings file (default: framegt.toml in the app directory)",
        "  --gt <dir>         Ground-truth root holding annotation files and mapping/",
        "  --bg               Keep background at index -1",
        "  --no-zeros         Smooth label-0 runs at video boundaries",
        "  --sparse           Down-sample labels after loading",
        "  --stride <n>       Down-sampling stride (default: 10)",
        "  --activity <name>  Report K for videos whose name contains <name>; repeatable",
        "  --no-log-file      Log to stdout only",
    ]
    .join("\n")
}
