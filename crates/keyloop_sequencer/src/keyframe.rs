// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for the sequencer.

use serde::{Deserialize, Serialize};

/// Position of a keyframe along the timeline (timestamp or ordinal)
pub type Key = u32;

/// A keyframe: a key paired with its payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keyframe<V> {
    /// Key of this keyframe
    pub key: Key,
    /// Payload at this key
    pub value: V,
}

impl<V> Keyframe<V> {
    /// Create a new keyframe
    pub fn new(key: Key, value: V) -> Self {
        Self { key, value }
    }
}

impl<V> From<(Key, V)> for Keyframe<V> {
    fn from((key, value): (Key, V)) -> Self {
        Self::new(key, value)
    }
}

/// Absolute distance between two keys
pub fn distance(a: Key, b: Key) -> Key {
    a.abs_diff(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        assert_eq!(distance(3, 7), 4);
        assert_eq!(distance(7, 3), 4);
        assert_eq!(distance(5, 5), 0);
        assert_eq!(distance(0, Key::MAX), Key::MAX);
    }

    #[test]
    fn test_from_pair() {
        let kf: Keyframe<&str> = (2, "-").into();
        assert_eq!(kf, Keyframe::new(2, "-"));
    }
}
