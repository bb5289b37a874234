// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe sequencing and interpolation engine.
//!
//! This crate provides looping keyframe playback and value blending:
//! - Pairwise blending of continuous and discrete values
//! - Fractional sampling and resampling of value sequences
//! - A looping sequence with direction detection, reversal and rotation
//! - A tick-based controller with deferred commands and lifecycle callbacks
//!
//! ## Architecture
//!
//! The engine is built on:
//! - [`Mix`] as the single blend capability, tagged by [`BlendCategory`]
//! - Storage-order rotation: the current keyframe is always position 0
//! - Deferred commands merged once per tick by the [`Controller`]
//! - Host-owned [`PlaybackConfig`], no global state

pub mod config;
pub mod controller;
pub mod keyframe;
pub mod mix;
pub mod sampling;
pub mod sequence;

pub use config::PlaybackConfig;
pub use controller::{Command, CommandKind, Controller, SequenceCallback};
pub use keyframe::{distance, Key, Keyframe};
pub use mix::{mix, BlendCategory, Mix, MixError, Value};
pub use sampling::{at, mapped_index, resample, ResampleError};
pub use sequence::{DataTrack, Direction, Sequence, SequenceError, SequenceId};
