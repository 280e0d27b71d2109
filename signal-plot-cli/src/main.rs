//! Signal Plot CLI Application
//!
//! This is the command-line interface for the signal plot library.
//! It uses the signal-plot library and adds:
//! - Input file handling (several documents per run, processed in parallel)
//! - TOML configuration with command-line overrides
//! - Report generation (JSON/TXT)
//! - Logging setup

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use signal_plot::{ExpressionMode, Plotter, Waveform};
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod report;

use config::{AppConfig, OutputConfig, OutputFormat};
use report::DocumentReport;

/// Signal Plot - Turn XML signal descriptions into step-waveform segments
#[derive(Parser, Debug)]
#[command(name = "signal-plot-cli")]
#[command(about = "Turn XML signal descriptions into step-waveform segments", long_about = None)]
#[command(version)]
struct Args {
    /// XML signal document(s) to plot
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Evaluate time expressions with real subtraction and multiple constants
    #[arg(long)]
    strict_expressions: bool,

    /// Point cap for signals without transitions
    #[arg(long, value_name = "COUNT")]
    max_points: Option<usize>,

    /// Only plot this signal (can be repeated)
    #[arg(long = "signal", value_name = "NAME")]
    signals: Vec<String>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Signal Plot CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using plot library v{}", signal_plot::VERSION);

    let config = resolve_config(&args)?;
    log::debug!("Effective configuration: {:?}", config);

    let plotter = Plotter::new(config.plot.clone());
    log::debug!("Plotting with {:?}", plotter.config());

    let mut reports = Vec::new();
    let mut failures = 0;
    for (file, result) in plot_inputs(&plotter, &args.inputs) {
        match result {
            Ok(waveform) => reports.push(DocumentReport { file, waveform }),
            Err(e) => {
                failures += 1;
                log::error!("{:#}", e);
            }
        }
    }

    write_reports(&reports, &config.output, args.output.as_deref())?;

    if failures > 0 {
        bail!("{} of {} documents failed to plot", failures, args.inputs.len());
    }

    Ok(())
}

/// Merge the optional config file with command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if args.strict_expressions {
        config.plot.expression_mode = ExpressionMode::Strict;
    }
    if let Some(max_points) = args.max_points {
        config.plot.max_plain_points = max_points;
    }
    if !args.signals.is_empty() {
        config.plot.signal_filter = Some(args.signals.clone());
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.pretty {
        config.output.pretty = true;
    }

    Ok(config)
}

/// Only `.xml` documents are accepted
fn validate_input(path: &Path) -> Result<()> {
    let is_xml = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));

    if !is_xml {
        bail!("Input should be an .xml file: {:?}", path);
    }
    Ok(())
}

fn plot_input(plotter: &Plotter, path: &Path) -> Result<Waveform> {
    validate_input(path)?;
    plotter
        .plot_file(path)
        .with_context(|| format!("Failed to plot {:?}", path))
}

/// Plot every input on the rayon pool; results keep input order
fn plot_inputs(plotter: &Plotter, inputs: &[PathBuf]) -> Vec<(PathBuf, Result<Waveform>)> {
    inputs
        .par_iter()
        .map(|path| (path.clone(), plot_input(plotter, path)))
        .collect()
}

fn write_reports(
    reports: &[DocumentReport],
    output: &OutputConfig,
    output_file: Option<&Path>,
) -> Result<()> {
    match (output_file, &output.output_dir) {
        (None, Some(dir)) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {:?}", dir))?;

            for report in reports {
                let stem = report
                    .file
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("signals");
                let path = dir.join(format!("{}.{}", stem, output.format.extension()));

                let text = match output.format {
                    OutputFormat::Json => report::render_document_json(report, output.pretty)?,
                    OutputFormat::Txt => report::render_document_txt(report),
                };
                fs::write(&path, text)
                    .with_context(|| format!("Failed to write report: {:?}", path))?;
                log::info!("Wrote {:?}", path);
            }
        }
        (file, _) => {
            let text = match output.format {
                OutputFormat::Json => report::render_json(reports, output.pretty)?,
                OutputFormat::Txt => report::render_txt(reports),
            };

            match file {
                Some(path) => {
                    fs::write(path, text)
                        .with_context(|| format!("Failed to write report: {:?}", path))?;
                    log::info!("Wrote {:?}", path);
                }
                None => println!("{}", text),
            }
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    // logs go to stderr, stdout carries the report
    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<Signals>
        <Signal name="EN">
            <SamplePoint time="0ms" logic="false"/>
            <SamplePoint time="5ms" logic="true"/>
        </Signal>
    </Signals>"#;

    #[test]
    fn test_validate_input() {
        assert!(validate_input(Path::new("signals.xml")).is_ok());
        assert!(validate_input(Path::new("SIGNALS.XML")).is_ok());
        assert!(validate_input(Path::new("signals.json")).is_err());
        assert!(validate_input(Path::new("signals")).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "signal-plot-cli",
            "a.xml",
            "--strict-expressions",
            "--max-points",
            "7",
            "--signal",
            "CLK",
            "--format",
            "txt",
        ])
        .unwrap();

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.plot.expression_mode, ExpressionMode::Strict);
        assert_eq!(config.plot.max_plain_points, 7);
        assert_eq!(config.plot.signal_filter, Some(vec!["CLK".to_string()]));
        assert_eq!(config.output.format, OutputFormat::Txt);
    }

    #[test]
    fn test_inputs_are_required() {
        assert!(Args::try_parse_from(["signal-plot-cli"]).is_err());
    }

    #[test]
    fn test_plot_inputs_keeps_order_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.xml");
        let bad = dir.path().join("bad.xml");
        let wrong_ext = dir.path().join("good.txt");
        fs::write(&good, DOC).unwrap();
        fs::write(&bad, "<Signals><Signal/></Signals>").unwrap();
        fs::write(&wrong_ext, DOC).unwrap();

        let inputs = vec![good.clone(), bad.clone(), wrong_ext.clone()];
        let results = plot_inputs(&Plotter::default(), &inputs);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, good);
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, bad);
        assert!(results[1].1.is_err());
        assert!(results[2].1.is_err());
    }

    #[test]
    fn test_write_reports_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("enable.xml");
        fs::write(&input, DOC).unwrap();

        let waveform = plot_input(&Plotter::default(), &input).unwrap();
        let reports = vec![DocumentReport {
            file: input,
            waveform,
        }];

        let out_dir = dir.path().join("out");
        let output = OutputConfig {
            format: OutputFormat::Json,
            pretty: false,
            output_dir: Some(out_dir.clone()),
        };
        write_reports(&reports, &output, None).unwrap();

        let text = fs::read_to_string(out_dir.join("enable.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["signals"][0]["name"], "EN");
    }

    #[test]
    fn test_write_reports_to_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.txt");
        let output = OutputConfig {
            format: OutputFormat::Txt,
            ..OutputConfig::default()
        };

        write_reports(&[], &output, Some(&out)).unwrap();
        assert!(fs::read_to_string(&out).unwrap().starts_with("Signal Plot Report"));
    }
}
