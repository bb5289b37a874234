// SPDX-License-Identifier: MIT OR Apache-2.0
//! Looping keyframe sequence.
//!
//! A [`Sequence`] stores keyframes in *storage order*: position 0 is the
//! current keyframe, position 1 the next one, and so on. Playback advances
//! by rotating storage order; key values never change. Direction is not
//! stored but read back from the relative order of the first three keys,
//! which works wherever the cursor sits on the circular timeline.

use crate::keyframe::{distance, Key, Keyframe};
use crate::mix::Mix;
use crate::sampling::sample_by;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceId(pub Uuid);

impl SequenceId {
    /// Create a new random sequence ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SequenceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Playback direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Keys ascend (with wrap-around)
    Forward,
    /// Keys descend (with wrap-around)
    Backward,
}

/// Error raised by sequence operations called outside their contract
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// The sequence has no keyframes
    #[error("Sequence is empty")]
    Empty,

    /// The sequence has too few keyframes for this operation
    #[error("Sequence has {len} keyframe(s), operation needs at least 2")]
    TooShort {
        /// Current length
        len: usize,
    },

    /// No keyframe carries the requested key
    #[error("Key not found: {0}")]
    KeyNotFound(Key),
}

/// Ordered, looping list of keyframes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence<V> {
    /// Unique sequence ID
    pub id: SequenceId,
    /// Keyframes in storage order
    frames: Vec<Keyframe<V>>,
}

/// Auxiliary data (audio cues, triggers) sharing a sequence's key space
pub type DataTrack<D> = Sequence<D>;

impl<V> Sequence<V> {
    /// Create a sequence from keyframes, keeping their order
    pub fn new(frames: impl IntoIterator<Item = Keyframe<V>>) -> Self {
        Self {
            id: SequenceId::new(),
            frames: frames.into_iter().collect(),
        }
    }

    /// Create a sequence from `(key, value)` pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Key, V)>) -> Self {
        Self::new(pairs.into_iter().map(Keyframe::from))
    }

    /// Append a keyframe at the end of storage order
    pub fn push(&mut self, keyframe: Keyframe<V>) {
        self.frames.push(keyframe);
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence has no keyframes
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get the current keyframe
    pub fn current(&self) -> Option<&Keyframe<V>> {
        self.frames.first()
    }

    /// Get the keyframe at a storage position
    pub fn get(&self, index: usize) -> Option<&Keyframe<V>> {
        self.frames.get(index)
    }

    /// Get the keyframe at a storage position, wrapping around both ends.
    ///
    /// `-1` is the last keyframe, `len()` the first one again.
    pub fn frame_at(&self, position: isize) -> Option<&Keyframe<V>> {
        if self.frames.is_empty() {
            return None;
        }
        let len = self.frames.len() as isize;
        self.frames.get(position.rem_euclid(len) as usize)
    }

    /// Iterate keyframes in storage order
    pub fn iter(&self) -> impl Iterator<Item = &Keyframe<V>> {
        self.frames.iter()
    }

    /// Iterate keys in storage order
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.frames.iter().map(|kf| kf.key)
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe<V>] {
        &self.frames
    }

    /// Smallest key
    pub fn min_key(&self) -> Option<Key> {
        self.keys().min()
    }

    /// Largest key
    pub fn max_key(&self) -> Option<Key> {
        self.keys().max()
    }

    /// Distance between the smallest and largest key (0 when empty)
    pub fn key_span(&self) -> Key {
        match (self.min_key(), self.max_key()) {
            (Some(min), Some(max)) => max - min,
            _ => 0,
        }
    }

    /// Playback direction read from the first three keys.
    ///
    /// Of the six relative orders three keys can take on a circle, the three
    /// with an odd number of ascending pairs run forward. Sequences of two or
    /// fewer keyframes are forward.
    pub fn direction(&self) -> Direction {
        let [a, b, c, ..] = self.frames.as_slice() else {
            return Direction::Forward;
        };
        let (k1, k2, k3) = (a.key, b.key, c.key);
        let ascending = u8::from(k1 < k2) + u8::from(k2 < k3) + u8::from(k1 < k3);
        if ascending % 2 == 1 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Whether playback runs forward
    pub fn is_forward(&self) -> bool {
        self.direction() == Direction::Forward
    }

    /// Whether playback runs backward
    pub fn is_backward(&self) -> bool {
        self.direction() == Direction::Backward
    }

    /// Flip playback direction.
    ///
    /// The current keyframe stays in place and the rest of the chain is
    /// reversed: `4 5 0 1 2 3` becomes `4 3 2 1 0 5`.
    pub fn reverse(&mut self) {
        if self.frames.len() > 2 {
            self.frames[1..].reverse();
            tracing::debug!(sequence = ?self.id, direction = ?self.direction(), "Reversed sequence");
        }
    }

    /// Play forward, reversing only if currently backward
    pub fn forward(&mut self) {
        if self.is_backward() {
            self.reverse();
        }
    }

    /// Play backward, reversing only if currently forward
    pub fn backward(&mut self) {
        if self.is_forward() {
            self.reverse();
        }
    }

    /// Advance playback by rotating `steps` keyframes from front to back.
    ///
    /// `cycle(0)` freezes playback for this step.
    pub fn cycle(&mut self, steps: usize) {
        if self.frames.is_empty() {
            return;
        }
        let steps = steps % self.frames.len();
        self.frames.rotate_left(steps);
        tracing::trace!(sequence = ?self.id, steps, current = ?self.current().map(|kf| kf.key), "Cycled sequence");
    }

    /// Rotate until the keyframe with key `target` is current.
    ///
    /// Targets at or beyond `len()` are ignored: the bound is the sequence
    /// length, not the key range. A target in range that no keyframe carries
    /// is an error and leaves the order untouched.
    pub fn reposition(&mut self, target: Key) -> Result<(), SequenceError> {
        if target as usize >= self.frames.len() {
            tracing::debug!(sequence = ?self.id, target, len = self.frames.len(), "Reposition target out of range, ignored");
            return Ok(());
        }

        let Some(index) = self.frames.iter().position(|kf| kf.key == target) else {
            return Err(SequenceError::KeyNotFound(target));
        };
        self.frames.rotate_left(index);
        tracing::debug!(sequence = ?self.id, target, "Repositioned sequence");
        Ok(())
    }

    /// Rotate back to key 0
    pub fn restart(&mut self) -> Result<(), SequenceError> {
        self.reposition(0)
    }

    /// Check that the sequence loops without a gap.
    ///
    /// Three or more keyframes always pass. Two keyframes pass when their
    /// keys are adjacent or span the whole key range. A failure is a soft
    /// signal: it is logged and nothing changes.
    pub fn check_continuity(&self) -> Result<bool, SequenceError> {
        match self.frames.as_slice() {
            [] => Err(SequenceError::Empty),
            [_] => Err(SequenceError::TooShort { len: 1 }),
            [a, b] => {
                let gap = distance(a.key, b.key);
                let continuous = gap <= 1 || gap == self.key_span();
                if !continuous {
                    tracing::warn!(sequence = ?self.id, from = a.key, to = b.key, "Continuity failed");
                }
                Ok(continuous)
            }
            _ => Ok(true),
        }
    }
}

impl<V: Mix + Default> Sequence<V> {
    /// Sample keyframe values at a fractional storage position
    pub fn sample(&self, position: f32) -> V {
        sample_by(self.frames.len(), |i| &self.frames[i].value, position)
    }
}

impl<V> Default for Sequence<V> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<V> FromIterator<Keyframe<V>> for Sequence<V> {
    fn from_iter<I: IntoIterator<Item = Keyframe<V>>>(iter: I) -> Self {
        Self::new(iter)
    }
}
