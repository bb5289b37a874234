// SPDX-License-Identifier: MIT OR Apache-2.0
//! `keyloop` - console player for looping keyframe sequences
//!
//! Plays a four-frame spinner through a [`Controller`], driven by a
//! scripted input string instead of a keyboard:
//! - `<` / `>` flow backward / forward
//! - `+` / `-` slower / faster
//! - space freezes, `!` restarts
//!
//! Usage: `keyloop [--config <file.ron>] [--script <events>] [--no-sleep]`

mod input;
mod render;

use clap::Parser;
use keyloop_sequencer::{resample, Controller, DataTrack, Mix, PlaybackConfig, Sequence, Value};
use std::cell::Cell;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_SCRIPT: &str = "........<<......>>....  ..!.....++++----";

/// Status line redraws per tick
const RENDER_SLICES: u32 = 4;

/// Console player for looping keyframe sequences
#[derive(Parser, Debug)]
#[command(name = "keyloop", about = "Play a looping keyframe sequence on the console")]
struct Options {
    /// Path to a RON playback config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input events, one character per tick.
    #[arg(long, default_value = DEFAULT_SCRIPT)]
    script: String,

    /// Run the ticks back to back without waiting for the delay.
    #[arg(long)]
    no_sleep: bool,
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("keyloop=info".parse().unwrap())
        .add_directive("keyloop_sequencer=info".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting keyloop v{}", env!("CARGO_PKG_VERSION"));

    let options = Options::parse();

    let config = match &options.config {
        Some(path) => match PlaybackConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load config {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => PlaybackConfig::default(),
    };

    log_blend_showcase();
    run(config, &options);
}

/// Log a few blends and a resample, as a quick sanity check of the mixer
fn log_blend_showcase() {
    tracing::info!(
        text = %keyloop_sequencer::mix(&"hello", &"world", 0.5),
        float = keyloop_sequencer::mix(&-100.0f64, &0.0, 0.5),
        size = keyloop_sequencer::mix(&0usize, &75, 0.5),
        "Midpoint blends"
    );

    let flags: Vec<bool> = [0.0, 0.25, 0.5, 0.75, 1.0]
        .iter()
        .map(|t| keyloop_sequencer::mix(&false, &true, *t))
        .collect();
    tracing::info!(?flags, "Boolean blends at 0, 0.25, 0.5, 0.75, 1");

    let wave = [10, 20, 40, 20, 10];
    match resample(&wave, 16) {
        Ok(resampled) => tracing::info!(?wave, ?resampled, "Resampled to 16"),
        Err(e) => tracing::warn!("{e}"),
    }

    match Value::Vec2([0.0, 1.0]).try_mix(&Value::Bool(true), 0.5) {
        Ok(value) => tracing::info!(?value, "Mixed dynamic values"),
        Err(e) => tracing::info!("Rejected dynamic blend: {e}"),
    }

    let category = <[f32; 3] as Mix>::CATEGORY;
    tracing::debug!(?category, "Vector blend category");
}

/// Progress through the current step, in `[0, 1]`
fn blend_weight(elapsed: Duration, delay: Duration) -> f32 {
    if delay.is_zero() {
        return 0.0;
    }
    (elapsed.as_secs_f32() / delay.as_secs_f32()).clamp(0.0, 1.0)
}

/// Elapsed time and blend weight at each intermediate redraw of a step
fn substeps(delay: Duration) -> impl Iterator<Item = (Duration, f32)> {
    let slice = delay / RENDER_SLICES;
    (1..RENDER_SLICES).map(move |i| {
        let elapsed = slice * i;
        (elapsed, blend_weight(elapsed, delay))
    })
}

fn show_status(line: &str) {
    print!("{line}\r");
    if let Err(e) = std::io::stdout().flush() {
        tracing::debug!("Failed to flush status line: {e}");
    }
}

fn run(mut config: PlaybackConfig, options: &Options) {
    let spinner = Sequence::from_pairs([
        (0, "|"),
        (1, "/"),
        (2, "-"),
        (3, "\\"),
    ]);
    match spinner.check_continuity() {
        Ok(true) => {}
        Ok(false) => tracing::warn!("Spinner does not loop cleanly"),
        Err(e) => tracing::warn!("Cannot check continuity: {e}"),
    }

    let cues = DataTrack::from_pairs([(0, "tick".to_string())]);
    let mut player = Controller::new(spinner).with_data(cues);

    let shown_delay = Rc::new(Cell::new(config.delay_ms));
    let delay = Rc::clone(&shown_delay);
    player.on_render(move |seq| {
        show_status(&render::status_line(seq, delay.get(), 0.0));
    });
    player.on_begin(|_| tracing::debug!("Loop begins :)"));
    player.on_end(|_| tracing::debug!("Loop ends :D"));

    let script = input::parse_script(&options.script);
    tracing::info!(ticks = script.len(), delay_ms = config.delay_ms, "Playing script");

    show_status(&render::status_line(&player.anim, config.delay_ms, 0.0));

    for event in script {
        input::dispatch(event, &mut player, &mut config);
        shown_delay.set(config.delay_ms);
        // Queued after the input so it draws the keyframe this step holds.
        player.render();

        player.update();
        for cue in player.take_triggers() {
            tracing::debug!(key = cue.key, cue = %cue.value, "Cue");
        }

        // Redraw within the step with the progress toward the next key.
        let step = config.delay();
        let mut slept = Duration::ZERO;
        for (elapsed, weight) in substeps(step) {
            if !options.no_sleep {
                std::thread::sleep(elapsed - slept);
                slept = elapsed;
            }
            show_status(&render::status_line(&player.anim, config.delay_ms, weight));
        }
        if !options.no_sleep {
            std::thread::sleep(step.saturating_sub(slept));
        }
    }

    println!();
    tracing::info!(
        current = ?player.anim.current().map(|kf| kf.key),
        direction = ?player.anim.direction(),
        delay_ms = config.delay_ms,
        steps_per_delay = config.ms_to_steps(config.delay_ms),
        "Playback finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let options = Options::try_parse_from(["keyloop", "--script", "<>", "--no-sleep"]).unwrap();
        assert_eq!(options.script, "<>");
        assert!(options.no_sleep);
        assert!(options.config.is_none());

        let options = Options::try_parse_from(["keyloop", "--config", "play.ron"]).unwrap();
        assert_eq!(options.config, Some(PathBuf::from("play.ron")));
        assert_eq!(options.script, DEFAULT_SCRIPT);
        assert!(!options.no_sleep);
    }

    #[test]
    fn test_parse_options_errors() {
        assert!(Options::try_parse_from(["keyloop", "--config"]).is_err());
        assert!(Options::try_parse_from(["keyloop", "--loud"]).is_err());
    }

    #[test]
    fn test_blend_weight() {
        let delay = Duration::from_secs(2);
        assert_eq!(blend_weight(Duration::ZERO, delay), 0.0);
        assert_eq!(blend_weight(Duration::from_millis(500), delay), 0.25);
        assert_eq!(blend_weight(Duration::from_secs(5), delay), 1.0);
        assert_eq!(blend_weight(Duration::from_millis(5), Duration::ZERO), 0.0);
    }

    #[test]
    fn test_substeps_render_partial_weights() {
        let steps: Vec<_> = substeps(Duration::from_secs(2)).collect();
        assert_eq!(
            steps,
            vec![
                (Duration::from_millis(500), 0.25),
                (Duration::from_millis(1000), 0.5),
                (Duration::from_millis(1500), 0.75),
            ]
        );

        let seq = Sequence::from_pairs([(0, "|"), (1, "/")]);
        let line = render::status_line(&seq, 160, steps[1].1);
        assert!(line.ends_with("delay= 160,blending_weight=0.50"), "{line}");
    }
}
