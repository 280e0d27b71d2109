//! Main plotting API
//!
//! The `Plotter` is the entry point of the library: it takes a signal document
//! (as XML text, a file, or an already parsed `Document`) and runs the whole
//! pipeline, returning one `SignalWaveform` per signal.
//!
//! Every call rebuilds the constant table, timelines and segments from scratch.
//! Any error aborts the whole load; no partial waveform is returned.

use crate::config::PlotConfig;
use crate::constants::ConstantTable;
use crate::document::{self, Document};
use crate::segmenter::{segment_timeline, Strategy};
use crate::timeline::{SignalTimeline, TimelineBuilder};
use crate::types::{PlotError, PlotSegment, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;

/// Plot output of one signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalWaveform {
    pub name: String,
    /// Signal-level remark from the document
    pub remark: Option<String>,
    /// Strategy that produced the segments
    pub strategy: Strategy,
    pub segments: Vec<PlotSegment>,
}

impl SignalWaveform {
    /// Smallest and largest x over all segments
    pub fn time_span(&self) -> Option<(f64, f64)> {
        merge_spans(self.segments.iter().filter_map(PlotSegment::x_range))
    }

    pub fn num_points(&self) -> usize {
        self.segments.iter().map(PlotSegment::len).sum()
    }
}

/// Plot output of a whole document, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Waveform {
    signals: IndexMap<String, SignalWaveform>,
}

impl Waveform {
    pub fn signal(&self, name: &str) -> Option<&SignalWaveform> {
        self.signals.get(name)
    }

    /// Signals in document order
    pub fn signals(&self) -> impl Iterator<Item = &SignalWaveform> + '_ {
        self.signals.values()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Shared x-axis range over every signal
    pub fn time_span(&self) -> Option<(f64, f64)> {
        merge_spans(self.signals().filter_map(SignalWaveform::time_span))
    }
}

fn merge_spans(spans: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    spans.reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
}

/// Runs the document → waveform pipeline
#[derive(Debug, Clone, Default)]
pub struct Plotter {
    config: PlotConfig,
}

impl Plotter {
    pub fn new(config: PlotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Parse XML text and plot it
    ///
    /// # Example
    /// ```
    /// use signal_plot::{Plotter, PlotConfig, SegmentStyle};
    ///
    /// let xml = r#"<Signals>
    ///   <Signal name="EN">
    ///     <SamplePoint time="0ms" logic="false"/>
    ///     <SamplePoint time="5ms" logic="true"/>
    ///   </Signal>
    /// </Signals>"#;
    ///
    /// let waveform = Plotter::new(PlotConfig::new()).plot_str(xml).unwrap();
    /// let en = waveform.signal("EN").unwrap();
    /// assert_eq!(en.segments.len(), 1);
    /// assert_eq!(en.segments[0].style, SegmentStyle::Line);
    /// ```
    pub fn plot_str(&self, xml: &str) -> Result<Waveform> {
        let document = document::parse_document(xml)?;
        self.plot_document(&document)
    }

    /// Load an XML file from disk and plot it
    pub fn plot_file(&self, path: &Path) -> Result<Waveform> {
        let document = document::load_document(path)?;
        let waveform = self.plot_document(&document)?;

        log::info!("Plotted {} signals from {:?}", waveform.len(), path);
        Ok(waveform)
    }

    /// Build the timeline of every signal in the document.
    ///
    /// Constants are fully resolved before the first signal is touched.
    pub fn timelines(&self, document: &Document) -> Result<Vec<SignalTimeline>> {
        let constants = ConstantTable::from_declarations(&document.constants)?;
        log::debug!("Resolved {} constants", constants.len());

        let builder = TimelineBuilder::new(&constants, self.config.expression_mode);

        let mut seen = std::collections::HashSet::new();
        let mut timelines = Vec::with_capacity(document.signals.len());

        for signal in &document.signals {
            if !seen.insert(signal.name.as_str()) {
                return Err(PlotError::DuplicateSignal(signal.name.clone()));
            }
            timelines.push(builder.build(signal)?);
        }

        Ok(timelines)
    }

    /// Run the full pipeline on a parsed document
    pub fn plot_document(&self, document: &Document) -> Result<Waveform> {
        log::info!(
            "Plotting document: {} signals, {} sample points",
            document.signals.len(),
            document.num_samples()
        );

        // every signal is validated, even those filtered out of the output
        let timelines = self.timelines(document)?;

        let mut waveform = Waveform::default();
        for timeline in timelines {
            if !self.config.should_plot_signal(timeline.name()) {
                log::debug!("Skipping filtered signal '{}'", timeline.name());
                continue;
            }

            let (strategy, segments) = segment_timeline(&timeline, self.config.max_plain_points);
            let signal = SignalWaveform {
                name: timeline.name().to_string(),
                remark: timeline.remark().map(str::to_string),
                strategy,
                segments,
            };
            waveform.signals.insert(signal.name.clone(), signal);
        }

        Ok(waveform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpressionMode;
    use crate::document::SignalDecl;
    use crate::types::{LogicState, SegmentStyle};

    fn clock_document() -> Document {
        Document::new()
            .with_constant("t1", "10ms")
            .with_signal(
                SignalDecl::new("CLK")
                    .with_remark("clock")
                    .with_sample("0ms", LogicState::False)
                    .with_sample("t1", LogicState::Transition)
                    .with_sample("t1+10ms", LogicState::True),
            )
            .with_signal(
                SignalDecl::new("EN")
                    .with_sample("0ms", LogicState::False)
                    .with_sample("t1-5ms", LogicState::True),
            )
    }

    #[test]
    fn test_plot_document() {
        let waveform = Plotter::default().plot_document(&clock_document()).unwrap();

        assert_eq!(waveform.len(), 2);
        let names: Vec<&str> = waveform.signals().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["CLK", "EN"]);

        let clk = waveform.signal("CLK").unwrap();
        assert_eq!(clk.strategy, Strategy::TransitionAware);
        assert_eq!(clk.remark.as_deref(), Some("clock"));
        assert!(clk.segments.iter().any(|s| s.style == SegmentStyle::Fill));

        // legacy mode sums the `-` fragments: 10 + 5
        let en = waveform.signal("EN").unwrap();
        assert_eq!(en.strategy, Strategy::Plain);
        assert_eq!(en.segments[0].points[1].x, 0.015);
    }

    #[test]
    fn test_strict_mode() {
        let plotter = Plotter::new(PlotConfig::new().with_expression_mode(ExpressionMode::Strict));
        assert_eq!(plotter.config().expression_mode, ExpressionMode::Strict);
        let waveform = plotter.plot_document(&clock_document()).unwrap();

        let en = waveform.signal("EN").unwrap();
        assert_eq!(en.segments[0].points[1].x, 0.005);
    }

    #[test]
    fn test_time_span() {
        let waveform = Plotter::default().plot_document(&clock_document()).unwrap();

        assert_eq!(waveform.signal("EN").unwrap().time_span(), Some((0.0, 0.015)));
        assert_eq!(waveform.time_span(), Some((0.0, 0.02)));
        assert_eq!(Waveform::default().time_span(), None);
    }

    #[test]
    fn test_signal_filter_still_validates_everything() {
        let plotter = Plotter::new(PlotConfig::new().with_signal_filter(vec!["EN".to_string()]));

        let waveform = plotter.plot_document(&clock_document()).unwrap();
        assert_eq!(waveform.len(), 1);
        assert!(waveform.signal("CLK").is_none());

        let broken = clock_document()
            .with_signal(SignalDecl::new("BAD").with_sample("later", LogicState::True));
        assert!(plotter.plot_document(&broken).is_err());
    }

    #[test]
    fn test_duplicate_signal_names() {
        let doc = Document::new()
            .with_signal(SignalDecl::new("A"))
            .with_signal(SignalDecl::new("A"));

        let err = Plotter::default().plot_document(&doc).unwrap_err();
        assert!(matches!(err, PlotError::DuplicateSignal(ref name) if name == "A"));
    }

    #[test]
    fn test_bad_constant_aborts_load() {
        let doc = clock_document().with_constant("t2", "abc");
        let err = Plotter::default().plot_document(&doc).unwrap_err();
        assert!(matches!(err, PlotError::Parse { ref input, .. } if input == "abc"));

        // a blank name would match every expression as a substring
        let doc = clock_document().with_constant("", "10ms");
        assert!(matches!(
            Plotter::default().plot_document(&doc),
            Err(PlotError::Parse { .. })
        ));
    }

    #[test]
    fn test_timelines_are_exposed() {
        let timelines = Plotter::default().timelines(&clock_document()).unwrap();
        assert_eq!(timelines.len(), 2);
        assert_eq!(timelines[0].name(), "CLK");
        assert_eq!(timelines[0].len(), 5);
    }
}
