// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input events and their mapping onto controller commands.
//!
//! Events arrive from a script, one character per tick:
//!
//! | char | event    | effect                       |
//! |------|----------|------------------------------|
//! | `<`  | backward | play backward                |
//! | `>`  | forward  | play forward                 |
//! | `+`  | slower   | delay + 1 ms                 |
//! | `-`  | faster   | delay - 1 ms                 |
//! | `!`  | restart  | rotate back to key 0         |
//! | ` `  | freeze   | skip this tick's advance     |
//! | `.`  | none     | plain tick                   |

use keyloop_sequencer::{Controller, PlaybackConfig};

/// A host input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Play backward
    Backward,
    /// Play forward
    Forward,
    /// Increase the delay
    Slower,
    /// Decrease the delay
    Faster,
    /// Restart from key 0
    Restart,
    /// Hold the current keyframe for this tick
    Freeze,
}

impl InputEvent {
    /// Parse a script character. `Ok(None)` is an idle tick.
    pub fn from_char(c: char) -> Result<Option<Self>, char> {
        match c {
            '<' => Ok(Some(Self::Backward)),
            '>' => Ok(Some(Self::Forward)),
            '+' => Ok(Some(Self::Slower)),
            '-' => Ok(Some(Self::Faster)),
            '!' => Ok(Some(Self::Restart)),
            ' ' => Ok(Some(Self::Freeze)),
            '.' => Ok(None),
            other => Err(other),
        }
    }
}

/// Parse a script into per-tick events, skipping unknown characters
pub fn parse_script(script: &str) -> Vec<Option<InputEvent>> {
    script
        .chars()
        .filter_map(|c| match InputEvent::from_char(c) {
            Ok(event) => Some(event),
            Err(unknown) => {
                tracing::warn!("Ignoring unknown script character {unknown:?}");
                None
            }
        })
        .collect()
}

/// Queue the commands for one tick.
///
/// Every tick advances by one keyframe unless it is frozen.
pub fn dispatch<V, D: Clone>(
    event: Option<InputEvent>,
    player: &mut Controller<V, D>,
    config: &mut PlaybackConfig,
) {
    match event {
        Some(InputEvent::Backward) => player.backward(),
        Some(InputEvent::Forward) => player.forward(),
        Some(InputEvent::Slower) => config.slower(),
        Some(InputEvent::Faster) => config.faster(),
        Some(InputEvent::Restart) => player.restart(),
        Some(InputEvent::Freeze) | None => {}
    }

    if event == Some(InputEvent::Freeze) {
        player.freeze();
    } else {
        player.cycle(1);
    }
}
