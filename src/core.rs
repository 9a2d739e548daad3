//! Core module defining the spike detection stages of the Rusty Spike Sort library.
//!
//! The stages are pure functions meant to be chained, each consuming the output of the previous one:
//!
//! - [`crossing`]: Detects (negative) threshold crossings, enforcing a dead time between detections
//! - [`alignment`]: Moves every crossing to the next negative peak of the signal
//! - [`waveform`]: Cuts out a fixed-length window of samples around every spike
//! - [`features`]: Reduces every waveform to its minimum and maximum voltage
//!
//! They operate on a [`signal::Signal`], i.e., a single channel of samples with its sampling frequency.
//! The [`noise`] module provides the usual noise estimates to derive a detection threshold.
//!
//! # Examples
//!
//! ```
//! use rusty_spike_sort::core::signal::Signal;
//! use rusty_spike_sort::core::crossing::detect_threshold_crossings;
//! use rusty_spike_sort::core::alignment::align_to_minimum;
//! use rusty_spike_sort::core::waveform::extract_waveforms;
//! use rusty_spike_sort::core::features::summarize;
//!
//! // A flat signal with two dips, sampled at 1 kHz
//! let mut samples = vec![0.0; 40];
//! samples[10] = -6.0;
//! samples[11] = -9.0;
//! samples[25] = -7.0;
//! let signal = Signal::build(samples, 1000.0).unwrap();
//!
//! // Detect the crossings below -5.0 with a 3 ms dead time
//! let crossings = detect_threshold_crossings(&signal, -5.0, 0.003).unwrap();
//! assert_eq!(crossings, vec![10, 25]);
//!
//! // Align every crossing to the minimum within the next 2 ms
//! let spikes = align_to_minimum(&signal, &crossings, 0.002).unwrap();
//! assert_eq!(spikes, vec![11, 25]);
//!
//! // Cut out 5 ms before and 5 ms after every spike
//! let waveforms = extract_waveforms(&signal, &spikes, 0.005, 0.005).unwrap();
//! assert_eq!(waveforms.num_waveforms(), 2);
//! assert_eq!(waveforms.num_samples(), 10);
//!
//! // Summarize every waveform by its minimum and maximum
//! let features = summarize(&waveforms);
//! assert_eq!(features.min, vec![-9.0, -7.0]);
//! assert_eq!(features.max, vec![0.0, 0.0]);
//! ```
pub mod alignment;
pub mod crossing;
pub mod features;
pub mod noise;
pub mod signal;
pub mod utils;
pub mod waveform;
