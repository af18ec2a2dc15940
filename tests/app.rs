use std::path::PathBuf;
use std::rc::Rc;

use neuroscope::app::export_file_name;
use neuroscope::{
    channel, NamedTarget, PlotError, Probe, ProbeCapability, ProbeSink, SampleBlock,
    VisualizerApp, VisualizerConfig,
};

fn probes() -> Vec<Probe> {
    let ens = Rc::new(NamedTarget::new("ens"));
    vec![
        Probe::new(ens.clone(), Rc::new(ProbeCapability::new("spikes", 2))),
        Probe::new(ens, Rc::new(ProbeCapability::new("voltages", 2))),
    ]
}

fn app_with(cfg: VisualizerConfig) -> (VisualizerApp, ProbeSink) {
    let (sink, rx) = channel();
    (VisualizerApp::new(cfg, rx, probes()), sink)
}

fn app() -> (VisualizerApp, ProbeSink) {
    app_with(VisualizerConfig::default())
}

#[test]
fn add_plot_validates_type_and_stream() {
    let (mut app, _sink) = app();
    assert!(matches!(
        app.add_plot("RasterSpikePlot", "ens", "currents"),
        Err(PlotError::UnknownStream { .. })
    ));
    assert!(matches!(
        app.add_plot("PolarPlot", "ens", "spikes"),
        Err(PlotError::UnknownPlotType(_))
    ));
    assert!(matches!(
        app.add_plot("TimeSeriesPlot", "ens", "spikes"),
        Err(PlotError::UnsupportedCapability { .. })
    ));
    let id = app.add_plot("RasterSpikePlot", "ens", "spikes").unwrap();
    assert_eq!(app.hub().subscribers("ens", "spikes"), &[id]);
    assert!(app.is_visible(id));
}

#[test]
fn batches_reach_only_subscribed_plots() {
    let (mut app, sink) = app();
    let raster = app.add_plot("RasterSpikePlot", "ens", "spikes").unwrap();
    let series = app.add_plot("TimeSeriesPlot", "ens", "voltages").unwrap();

    let spikes = SampleBlock::from_rows(&[[0.0, 1.0], [0.0, 0.0]]).unwrap();
    sink.send_batch("ens", "spikes", 0, 0.5, spikes).unwrap();
    assert_eq!(app.drain_probes(), 1);

    let r = app.plot(raster).unwrap();
    assert_eq!(r.surface().event_rows[1].times, vec![0.0]);
    assert!(r.surface().redraw_pending());
    assert!(app.plot(series).unwrap().surface().lines.is_empty());
}

#[test]
fn plots_see_a_bounded_window_of_history() {
    let cfg = VisualizerConfig {
        max_window_size: 3,
        ..Default::default()
    };
    let (mut app, sink) = app_with(cfg);
    for start in [0u64, 2, 4] {
        let block = SampleBlock::from_rows(&[[start as f64, 0.0], [start as f64 + 1.0, 0.0]]).unwrap();
        sink.send_batch("ens", "voltages", start, 1.0, block).unwrap();
    }
    app.drain_probes();

    // Added after the data arrived; starts from the buffered window.
    let id = app.add_plot("TimeSeriesPlot", "ens", "voltages").unwrap();
    let line = &app.plot(id).unwrap().surface().lines[0];
    let ys: Vec<f64> = line.points.iter().map(|p| p[1]).collect();
    assert_eq!(ys, vec![3.0, 4.0, 5.0]);
    assert_eq!(line.points[0][0], 3.0);
}

#[test]
fn remove_request_detaches_plot() {
    let (mut app, _sink) = app();
    let id = app.add_plot("RasterSpikePlot", "ens", "spikes").unwrap();
    app.plot(id).unwrap().request_customize();
    app.drain_requests();
    assert!(app.customize_window(id).is_some());

    app.plot(id).unwrap().remove_plot();
    app.drain_requests();
    assert!(app.plot(id).is_none());
    assert!(app.customize_window(id).is_none());
    assert!(app.hub().is_empty());
    assert!(!app.remove_plot_for(id));
}

#[test]
fn customize_request_opens_one_window() {
    let (mut app, _sink) = app();
    let id = app.add_plot("TimeSeriesPlot", "ens", "voltages").unwrap();
    app.plot(id).unwrap().request_customize();
    app.plot(id).unwrap().request_customize();
    app.drain_requests();
    let w = app.customize_window(id).unwrap();
    assert_eq!(w.title(), "Customize ens - voltages");
}

#[test]
fn export_request_writes_chosen_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().to_path_buf();
    let (app, _sink) = app();
    let mut app = app.with_export_path_chooser(move |suggested| Some(out.join(suggested)));
    let id = app.add_plot("RasterSpikePlot", "ens", "spikes").unwrap();
    app.plot(id).unwrap().on_export();
    app.drain_requests();

    let written: Vec<PathBuf> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    assert_eq!(written.len(), 1);
    let name = written[0].file_name().and_then(|n| n.to_str()).unwrap();
    assert!(name.ends_with("_ens_-_spikes.png"), "{name}");
    let img = image::open(&written[0]).unwrap();
    assert_eq!((img.width(), img.height()), (1024, 768));
}

#[test]
fn export_request_to_pdf_path_writes_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("raster.pdf");
    let (app, _sink) = app();
    let mut app = app.with_export_path_chooser(move |_| Some(out.clone()));
    let id = app.add_plot("RasterSpikePlot", "ens", "spikes").unwrap();
    app.plot(id).unwrap().on_export();
    app.drain_requests();

    let bytes = std::fs::read(dir.path().join("raster.pdf")).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn export_file_names_are_sanitized() {
    assert_eq!(export_file_name("ens - spikes"), "ens_-_spikes.png");
    assert_eq!(export_file_name("a/b:c"), "a_b_c.png");
    assert_eq!(export_file_name("{}"), "plot.png");
}
