// SPDX-License-Identifier: MIT OR Apache-2.0
//! Positional sampling and resampling of value sequences.
//!
//! Positions are storage-order offsets, not keys: `1.5` is halfway between
//! the second and third element. Callers working in key space map keys to
//! indices first.

use crate::mix::{mix, Mix};

/// Error raised by [`resample`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResampleError {
    /// Fewer than two output samples were requested
    #[error("Resampling needs at least 2 samples, got {requested}")]
    TooFewSamples {
        /// Requested output length
        requested: usize,
    },
}

/// Sample `values` at a fractional `position`.
///
/// Empty input yields `T::default()`. Positions outside the sequence clamp
/// to the first or last element; integral positions return the element
/// itself with no blending.
pub fn at<T: Mix + Default>(values: &[T], position: f32) -> T {
    sample_by(values.len(), |i| &values[i], position)
}

/// Sampling over any indexed storage.
pub(crate) fn sample_by<'a, T, F>(len: usize, value_at: F, position: f32) -> T
where
    T: Mix + Default + 'a,
    F: Fn(usize) -> &'a T,
{
    match len {
        0 => T::default(),
        1 => value_at(0).clone(),
        _ => {
            if position.is_nan() || position <= 0.0 {
                return value_at(0).clone();
            }
            let last = len - 1;
            if position >= last as f32 {
                return value_at(last).clone();
            }

            let index = (position.floor() as usize).min(last - 1);
            let t = position - index as f32;
            mix(value_at(index), value_at(index + 1), t)
        }
    }
}

/// Output slot that original element `index` lands on when a sequence of
/// `original_len` elements is resampled to `new_len` elements.
pub fn mapped_index(index: usize, original_len: usize, new_len: usize) -> usize {
    if original_len < 2 {
        return 0;
    }
    index * new_len.saturating_sub(1) / (original_len - 1)
}

/// Build a new sequence of `new_size` elements from `values`.
///
/// Output element `i` samples the input at `(len - 1) * i / (new_size - 1)`.
/// Every original element is then written back verbatim at its
/// [`mapped_index`], so interpolation never alters a value that already
/// existed. Two originals mapping to the same slot: the later one wins.
pub fn resample<T: Mix + Default>(values: &[T], new_size: usize) -> Result<Vec<T>, ResampleError> {
    if new_size < 2 {
        return Err(ResampleError::TooFewSamples { requested: new_size });
    }

    let span = values.len().saturating_sub(1);
    let steps = new_size - 1;

    let mut resampled: Vec<T> = (0..new_size)
        .map(|i| at(values, (span * i) as f32 / steps as f32))
        .collect();

    for (index, value) in values.iter().enumerate() {
        resampled[mapped_index(index, values.len(), new_size)] = value.clone();
    }

    tracing::debug!(from = values.len(), to = new_size, "Resampled sequence");
    Ok(resampled)
}
