//! This crate provides tools for threshold-based spike sorting of extracellular recordings in Rust.
//!
//! A single channel of raw voltage samples (e.g., one electrode of an NWB `ElectricalSeries`) goes through four stages:
//! threshold crossing detection, alignment to the negative peak, waveform extraction and feature extraction.
//!
//! # Sorting a Channel
//!
//! ```rust
//! use rusty_spike_sort::core::signal::Signal;
//! use rusty_spike_sort::sorter::{SortingConfig, SpikeSorter};
//! use rusty_spike_sort::synth::{SyntheticRecording, SyntheticUnit};
//!
//! // Generate half a second of recording at 30 kHz with a single unit
//! let recording = SyntheticRecording {
//!     duration: 0.5,
//!     sampling_frequency: 30000.0,
//!     noise_std: 1.0,
//!     units: vec![SyntheticUnit { amplitude: 30.0, firing_rate: 20.0 }],
//! };
//! let (signal, _) = recording.generate(42).unwrap();
//!
//! // Sort it with the default configuration, i.e., a threshold 5 standard deviations below zero,
//! // a dead time of 3 ms, a search range of 2 ms, and cutouts from 1 ms before to 2 ms after each spike
//! let sorter = SpikeSorter::build(SortingConfig::default()).unwrap();
//! let result = sorter.sort(&signal).unwrap();
//!
//! assert_eq!(result.features.len(), result.waveforms.len());
//! ```
//!
//! # Step by Step
//!
//! See the [`core`] module for the individual stages.

pub mod core;
pub mod error;
pub mod sorter;
pub mod synth;

/// The default dead time between two detections, in seconds.
pub const DEFAULT_DEAD_TIME: f64 = 0.003;
/// The default time to search for the negative peak after a crossing, in seconds.
pub const DEFAULT_SEARCH_RANGE: f64 = 0.002;
/// The default duration of the cutout before a spike, in seconds.
pub const DEFAULT_PRE: f64 = 0.001;
/// The default duration of the cutout after a spike, in seconds.
pub const DEFAULT_POST: f64 = 0.002;
/// The default number of noise standard deviations below zero for the detection threshold.
pub const DEFAULT_THRESHOLD_FACTOR: f64 = 5.0;
