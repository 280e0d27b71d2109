//! Report generation
//!
//! Renders plotted documents as JSON (for renderers) or as a plain-text
//! listing (for humans).

use anyhow::Result;
use serde::Serialize;
use signal_plot::{SignalWaveform, Waveform};
use std::fmt::Write;
use std::path::PathBuf;

/// Plot result of one input file
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub file: PathBuf,
    pub waveform: Waveform,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    file: String,
    signals: Vec<&'a SignalWaveform>,
}

impl<'a> From<&'a DocumentReport> for JsonDocument<'a> {
    fn from(report: &'a DocumentReport) -> Self {
        Self {
            file: report.file.display().to_string(),
            signals: report.waveform.signals().collect(),
        }
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// Render a single document as a JSON object
pub fn render_document_json(report: &DocumentReport, pretty: bool) -> Result<String> {
    to_json(&JsonDocument::from(report), pretty)
}

/// Render several documents as a JSON array, in input order
pub fn render_json(reports: &[DocumentReport], pretty: bool) -> Result<String> {
    let documents: Vec<JsonDocument> = reports.iter().map(JsonDocument::from).collect();
    to_json(&documents, pretty)
}

/// Render a single document as a text listing
pub fn render_document_txt(report: &DocumentReport) -> String {
    let mut out = String::new();
    write_header(&mut out);
    write_document(&mut out, report);
    out
}

/// Render several documents as one text listing
pub fn render_txt(reports: &[DocumentReport]) -> String {
    let mut out = String::new();
    write_header(&mut out);
    for report in reports {
        write_document(&mut out, report);
    }
    out
}

fn write_header(out: &mut String) {
    let _ = writeln!(out, "Signal Plot Report");
    let _ = writeln!(
        out,
        "Generated by signal-plot-cli v{} (library v{}) at {}",
        env!("CARGO_PKG_VERSION"),
        signal_plot::VERSION,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
}

fn write_document(out: &mut String, report: &DocumentReport) {
    let _ = writeln!(out, "\n=== {} ===", report.file.display());
    let _ = writeln!(out, "Signals: {}", report.waveform.len());
    if let Some((start, end)) = report.waveform.time_span() {
        let _ = writeln!(out, "Time span: {:.6} s .. {:.6} s", start, end);
    }

    for signal in report.waveform.signals() {
        let _ = write!(out, "\n[{}]", signal.name);
        if let Some(remark) = &signal.remark {
            let _ = write!(out, " - {}", remark);
        }
        let _ = writeln!(
            out,
            "\n  strategy: {:?}, {} segments, {} points",
            signal.strategy,
            signal.segments.len(),
            signal.num_points()
        );

        for (i, segment) in signal.segments.iter().enumerate() {
            let _ = writeln!(out, "  #{} {}", i, segment.style);
            for point in &segment.points {
                let _ = write!(out, "      x={:.6} y={}", point.x, point.y);
                if !point.tag.is_empty() {
                    let _ = write!(out, "  ({})", point.tag);
                }
                out.push('\n');
            }
        }
    }
}
