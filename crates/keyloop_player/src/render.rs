// SPDX-License-Identifier: MIT OR Apache-2.0
//! Console status line for a sequence.

use keyloop_sequencer::Sequence;
use std::fmt::{Display, Write};

/// Format the current keyframe, the upcoming ones and the playback flags
pub fn status_line<V: Display>(seq: &Sequence<V>, delay_ms: u32, blend_weight: f32) -> String {
    let mut line = String::from("   current frame[ ");
    if let Some(current) = seq.current() {
        let _ = write!(line, "{:>3}.{}", current.key, current.value);
    }
    line.push_str(" ] << next[ ");
    for kf in seq.iter().skip(1) {
        let _ = write!(line, "{:>3}.{:>3},", kf.key, kf.value);
    }
    let _ = write!(
        line,
        "],is_forward={},is_backward={},delay={:>4},blending_weight={:>4.2}",
        u8::from(seq.is_forward()),
        u8::from(seq.is_backward()),
        delay_ms,
        blend_weight,
    );
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        let seq = Sequence::from_pairs([(0, "|"), (1, "/"), (2, "-")]);
        let line = status_line(&seq, 160, 0.0);
        assert_eq!(
            line,
            "   current frame[   0.| ] << next[   1.  /,  2.  -,],is_forward=1,is_backward=0,delay= 160,blending_weight=0.00"
        );
    }

    #[test]
    fn test_status_line_empty() {
        let seq = Sequence::<char>::default();
        assert!(status_line(&seq, 1, 0.5).starts_with("   current frame[  ] << next[ ]"));
    }
}
