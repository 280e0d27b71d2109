// End-to-end tests: XML text in, plot segments out
use signal_plot::{
    ExpressionMode, PlotConfig, PlotError, Plotter, SegmentStyle, Strategy, TimelineBuilder,
};
use std::io::Write;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const CLOCK_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Signals>
  <Constants>
    <Constant name="t1" value="10ms"/>
  </Constants>
  <Signal name="CLK" remark="clock line">
    <SamplePoint time="0ms" logic="false" remark="idle"/>
    <SamplePoint time="t1" logic="transition" remark="rising edge"/>
    <SamplePoint time="t1+10ms" logic="true"/>
  </Signal>
  <Signal name="EN">
    <SamplePoint time="0ms" logic="false"/>
    <SamplePoint time="4ms" logic="true"/>
    <SamplePoint time="t1-5ms" logic="false"/>
  </Signal>
</Signals>"#;

#[test]
fn test_clock_example_timeline() {
    init_logging();

    let document = signal_plot::document::parse_document(CLOCK_XML).unwrap();
    let constants = signal_plot::ConstantTable::from_declarations(&document.constants).unwrap();
    let timeline = TimelineBuilder::new(&constants, ExpressionMode::Legacy)
        .build(&document.signals[0])
        .unwrap();

    let keys: Vec<&str> = timeline.keys().collect();
    assert_eq!(keys[..4].to_vec(), vec!["0.0", "10.0", "10.0t", "20.0"]);
    assert_eq!(timeline.get("0.0").unwrap().logic.to_string(), "false");
    assert_eq!(timeline.get("10.0").unwrap().logic.to_string(), "transition");
    assert_eq!(timeline.get("20.0").unwrap().logic.to_string(), "true");
}

#[test]
fn test_clock_example_segments() {
    init_logging();

    let waveform = Plotter::default().plot_str(CLOCK_XML).unwrap();
    let clk = waveform.signal("CLK").unwrap();

    assert_eq!(clk.strategy, Strategy::TransitionAware);

    let fills: Vec<_> = clk
        .segments
        .iter()
        .filter(|s| s.style == SegmentStyle::Fill)
        .collect();
    assert_eq!(fills.len(), 1);

    let fill = fills[0];
    assert_eq!(fill.x_range(), Some((0.01, 0.02)));
    assert_eq!(fill.points.last().unwrap().y, 1.0);

    // the line before the ramp sits low, with remarks carried as tags
    let first = &clk.segments[0];
    assert_eq!(first.style, SegmentStyle::Line);
    assert_eq!(first.points[0].y, 0.0);
    assert_eq!(first.points[0].tag, "idle");
    assert_eq!(first.points[1].tag, "rising edge");
}

#[test]
fn test_plain_signal_round_trip() {
    let waveform = Plotter::default().plot_str(CLOCK_XML).unwrap();
    let en = waveform.signal("EN").unwrap();

    assert_eq!(en.strategy, Strategy::Plain);
    assert_eq!(en.segments.len(), 1);

    let points: Vec<(f64, f64)> = en.segments[0].points.iter().map(|p| (p.x, p.y)).collect();
    // legacy evaluation: t1-5ms resolves to 15, not 5
    assert_eq!(points, vec![(0.0, 0.0), (0.004, 1.0), (0.015, 0.0)]);
}

#[test]
fn test_strict_expressions_subtract() {
    let plotter = Plotter::new(PlotConfig::new().with_expression_mode(ExpressionMode::Strict));
    let waveform = plotter.plot_str(CLOCK_XML).unwrap();

    let en = waveform.signal("EN").unwrap();
    assert_eq!(en.segments[0].points[2].x, 0.005);
}

#[test]
fn test_pipeline_is_idempotent() {
    let plotter = Plotter::default();
    let first = plotter.plot_str(CLOCK_XML).unwrap();
    let second = plotter.plot_str(CLOCK_XML).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_json_shape() {
    let waveform = Plotter::default().plot_str(CLOCK_XML).unwrap();
    let json = serde_json::to_value(&waveform).unwrap();

    let clk = &json["CLK"];
    assert_eq!(clk["name"], "CLK");
    assert_eq!(clk["remark"], "clock line");
    assert_eq!(clk["strategy"], "transition_aware");
    assert_eq!(clk["segments"][1]["style"], "fill");
    assert_eq!(json["EN"]["segments"][0]["points"][1]["y"], 1.0);
}

#[test]
fn test_errors_abort_whole_document() {
    let missing_time = r#"<Signals>
        <Signal name="OK"><SamplePoint time="0" logic="true"/></Signal>
        <Signal name="BROKEN"><SamplePoint logic="true"/></Signal>
    </Signals>"#;
    assert!(matches!(
        Plotter::default().plot_str(missing_time),
        Err(PlotError::MissingAttribute { .. })
    ));

    let duplicate_time = r#"<Signals>
        <Signal name="DUP">
            <SamplePoint time="3ms" logic="true"/>
            <SamplePoint time="3" logic="false"/>
        </Signal>
    </Signals>"#;
    assert!(matches!(
        Plotter::default().plot_str(duplicate_time),
        Err(PlotError::DuplicateKey { .. })
    ));

    let bad_constant = r#"<Signals>
        <Constants><Constant name="t1" value="1o"/></Constants>
    </Signals>"#;
    assert!(matches!(
        Plotter::default().plot_str(bad_constant),
        Err(PlotError::Parse { .. })
    ));
}

#[test]
fn test_blank_constant_name_is_rejected() {
    let xml = r#"<Signals>
        <Constants><Constant name="" value="10ms"/></Constants>
        <Signal name="EN">
            <SamplePoint time="5ms" logic="false"/>
            <SamplePoint time="7ms" logic="true"/>
        </Signal>
    </Signals>"#;

    for mode in [ExpressionMode::Legacy, ExpressionMode::Strict] {
        let plotter = Plotter::new(PlotConfig::new().with_expression_mode(mode));
        assert!(matches!(plotter.plot_str(xml), Err(PlotError::Parse { .. })));
    }
}

#[test]
fn test_plot_file() {
    init_logging();

    let mut file = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
    file.write_all(CLOCK_XML.as_bytes()).unwrap();

    let waveform = Plotter::default().plot_file(file.path()).unwrap();
    assert_eq!(waveform.len(), 2);
    assert_eq!(waveform.time_span(), Some((0.0, 0.02)));
}
