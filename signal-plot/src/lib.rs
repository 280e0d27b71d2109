//! Signal Plot Library
//!
//! A stateless library that turns declarative digital-signal documents into
//! plottable step waveforms.
//!
//! # Architecture
//!
//! The pipeline runs strictly top-down for every document load:
//! - Parses the XML document into constants and signals
//! - Resolves named constants (first declaration wins)
//! - Evaluates each sample point's time expression
//! - Builds an ordered timeline per signal, duplicating entries around transitions
//! - Segments each timeline into forward-step `line`/`fill` segments
//!
//! The library does NOT:
//! - Render anything
//! - Keep UI state (visibility, zoom, axis synchronisation)
//! - Persist data between loads
//!
//! File handling, output formats and logging setup live in the application
//! layer (signal-plot-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use signal_plot::{ExpressionMode, PlotConfig, Plotter};
//! use std::path::Path;
//!
//! let config = PlotConfig::new()
//!     .with_expression_mode(ExpressionMode::Legacy)
//!     .with_max_plain_points(20);
//!
//! let waveform = Plotter::new(config).plot_file(Path::new("signals.xml")).unwrap();
//!
//! for signal in waveform.signals() {
//!     println!("{}: {} segments", signal.name, signal.segments.len());
//! }
//! ```

// Public modules
pub mod config;
pub mod constants;
pub mod document;
pub mod expression;
pub mod plotter;
pub mod segmenter;
pub mod timeline;
pub mod transition;
pub mod types;

// Re-export main types for convenience
pub use config::{ExpressionMode, PlotConfig};
pub use constants::ConstantTable;
pub use document::{ConstantDecl, Document, SampleDecl, SignalDecl};
pub use plotter::{Plotter, SignalWaveform, Waveform};
pub use segmenter::Strategy;
pub use timeline::{SignalTimeline, TimelineBuilder, TimelineEntry};
pub use transition::has_transition;
pub use types::{LogicState, PlotError, PlotPoint, PlotSegment, Result, SegmentStyle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
