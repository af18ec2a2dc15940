//! Demo: a small leaky integrate-and-fire network probed into live plots.
//!
//! Usage: `neuroscope [config.yaml|config.json]`

use std::path::PathBuf;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use neuroscope::{
    channel, run_app, NamedTarget, Probe, ProbeCapability, ProbeSink, SampleBlock,
    VisualizerApp, VisualizerConfig,
};

const NEURONS: usize = 24;
const DT: f64 = 0.001;
const STEPS_PER_BATCH: usize = 20;

const TAU_M: f64 = 0.02;
const V_THRESHOLD: f64 = 1.0;
const V_RESET: f64 = 0.0;
const REFRACTORY_STEPS: u32 = 2;

/// Leaky integrate-and-fire ensemble driven by a slow sine plus noise.
struct Network {
    v: Vec<f64>,
    refractory: Vec<u32>,
    gain: Vec<f64>,
    rng: StdRng,
    step: u64,
}

impl Network {
    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let gain = (0..NEURONS).map(|_| rng.gen_range(0.8..1.6)).collect();
        Self {
            v: vec![V_RESET; NEURONS],
            refractory: vec![0; NEURONS],
            gain,
            rng,
            step: 0,
        }
    }

    fn input(&self) -> f64 {
        let t = self.step as f64 * DT;
        1.1 + 0.6 * (2.0 * std::f64::consts::PI * 1.5 * t).sin()
    }

    /// Advance one step; returns the input, and fills `spikes`/`volts`.
    fn tick(&mut self, spikes: &mut [f64], volts: &mut [f64]) -> f64 {
        let drive = self.input();
        for i in 0..NEURONS {
            spikes[i] = 0.0;
            if self.refractory[i] > 0 {
                self.refractory[i] -= 1;
                self.v[i] = V_RESET;
            } else {
                let noise: f64 = self.rng.gen_range(-0.5..0.5);
                let current = drive * self.gain[i] + noise;
                self.v[i] += DT / TAU_M * (current - self.v[i]);
                if self.v[i] >= V_THRESHOLD {
                    spikes[i] = 1.0 / DT;
                    self.v[i] = V_RESET;
                    self.refractory[i] = REFRACTORY_STEPS;
                }
            }
            volts[i] = self.v[i];
        }
        self.step += 1;
        drive
    }
}

fn simulate(sink: ProbeSink) {
    let mut net = Network::new(7);
    loop {
        let start = net.step;
        let mut spikes = SampleBlock::zeros(STEPS_PER_BATCH, NEURONS);
        let mut volts = SampleBlock::zeros(STEPS_PER_BATCH, NEURONS);
        let mut input = SampleBlock::zeros(STEPS_PER_BATCH, 1);
        let mut s = vec![0.0; NEURONS];
        let mut v = vec![0.0; NEURONS];
        for row in 0..STEPS_PER_BATCH {
            let drive = net.tick(&mut s, &mut v);
            for i in 0..NEURONS {
                spikes.set(row, i, s[i]);
                volts.set(row, i, v[i]);
            }
            input.set(row, 0, drive);
        }
        let sent = sink
            .send_batch("ensemble", "spikes", start, DT, spikes)
            .and_then(|_| sink.send_batch("ensemble", "voltages", start, DT, volts))
            .and_then(|_| sink.send_batch("stimulus", "output", start, DT, input));
        if sent.is_err() {
            log::info!("visualizer closed, stopping simulation at step {}", net.step);
            return;
        }
        thread::sleep(Duration::from_secs_f64(DT * STEPS_PER_BATCH as f64));
    }
}

fn load_config() -> VisualizerConfig {
    let loaded = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => VisualizerConfig::load(&path),
        None => VisualizerConfig::load_from_default_path(),
    };
    loaded.unwrap_or_else(|e| {
        log::warn!("using default configuration: {e}");
        VisualizerConfig::default()
    })
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = load_config();
    let (sink, rx) = channel();

    let ensemble = Rc::new(NamedTarget::new("ensemble"));
    let stimulus = Rc::new(NamedTarget::new("stimulus"));
    let probes = vec![
        Probe::new(ensemble.clone(), Rc::new(ProbeCapability::new("spikes", NEURONS))),
        Probe::new(ensemble, Rc::new(ProbeCapability::new("voltages", NEURONS))),
        Probe::new(stimulus, Rc::new(ProbeCapability::new("output", 1))),
    ];

    let mut app = VisualizerApp::new(cfg, rx, probes);
    for (plot_type, target, capability) in [
        ("RasterSpikePlot", "ensemble", "spikes"),
        ("TimeSeriesPlot", "stimulus", "output"),
    ] {
        if let Err(e) = app.add_plot(plot_type, target, capability) {
            log::error!("{e}");
        }
    }

    thread::spawn(move || simulate(sink));
    run_app(app)
}
