use clap::Parser;
use log;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use rusty_spike_sort::core::noise::NoiseEstimator;
use rusty_spike_sort::error::SortError;
use rusty_spike_sort::sorter::{SortingConfig, SpikeSorter, ThresholdPolicy};
use rusty_spike_sort::synth::{SyntheticRecording, SyntheticUnit};

#[derive(Parser, Debug)]
struct Args {
    /// The seed used for sampling the recording
    #[arg(long, default_value = "42")]
    seed: u64,
    /// The duration of the recording, in seconds
    #[arg(short = 'T', long, default_value = "10.0")]
    duration: f64,
    /// The sampling frequency, in Hz
    #[arg(long, default_value = "30000.0")]
    sampling_frequency: f64,
    /// The standard deviation of the background noise, in volts
    #[arg(long, default_value = "10e-6")]
    noise_std: f64,
    /// A sorting configuration file (JSON), the default configuration is used otherwise
    #[arg(long)]
    config: Option<String>,
    /// The noise estimator for the threshold, must be one of: std, mad
    #[arg(long, default_value = "std")]
    estimator: String,
    /// Where to save the sorting result (JSON)
    #[arg(short = 'o', long, default_value = "sorting.json")]
    output: String,
}

fn main() -> Result<(), SortError> {
    let args = Args::parse();

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .map_err(|e| SortError::IOError(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| SortError::IOError(e.to_string()))?;

    log::info!("{:?}", args);

    // Two units, a large one and a smaller one firing twice as often
    let recording = SyntheticRecording {
        duration: args.duration,
        sampling_frequency: args.sampling_frequency,
        noise_std: args.noise_std,
        units: vec![
            SyntheticUnit {
                amplitude: 20.0 * args.noise_std,
                firing_rate: 5.0,
            },
            SyntheticUnit {
                amplitude: 8.0 * args.noise_std,
                firing_rate: 10.0,
            },
        ],
    };
    let (signal, ground_truth) = recording.generate(args.seed)?;
    log::info!(
        "Recording sampling: done! {} samples, {} ground truth spikes",
        signal.len(),
        ground_truth.iter().map(|troughs| troughs.len()).sum::<usize>()
    );

    let mut sorting_config = match &args.config {
        Some(path) => SortingConfig::load_from(path)?,
        None => SortingConfig::default(),
    };
    if args.config.is_none() {
        let estimator = match args.estimator.as_str() {
            "std" => NoiseEstimator::Std,
            "mad" => NoiseEstimator::Mad,
            other => {
                return Err(SortError::InvalidParameter(format!(
                    "unknown noise estimator: {}",
                    other
                )))
            }
        };
        sorting_config.threshold = ThresholdPolicy::Noise {
            estimator,
            factor: rusty_spike_sort::DEFAULT_THRESHOLD_FACTOR,
        };
    }

    let sorter = SpikeSorter::build(sorting_config)?;
    let result = sorter.sort(&signal)?;
    log::info!(
        "Sorting: done! Threshold {:.3e} V, {} spikes, {} waveforms",
        result.threshold,
        result.num_spikes(),
        result.waveforms.len()
    );

    // A crude split of the (min, max) plane, halfway between the two unit amplitudes
    let split = -14.0 * args.noise_std;
    let (large, small): (Vec<f64>, Vec<f64>) =
        result.features.min.iter().partition(|&&min| min < split);
    log::info!(
        "Features: {} waveforms deeper than {:.3e} V (large unit, {} expected), {} others ({} expected)",
        large.len(),
        split,
        ground_truth[0].len(),
        small.len(),
        ground_truth[1].len()
    );

    result.save_to(&args.output)?;
    log::info!("Result saving: done! Saved to {}", args.output);

    Ok(())
}
