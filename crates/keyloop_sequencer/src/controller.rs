// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tick-based playback controller.
//!
//! Collaborators queue [`Command`]s at any time during a tick; nothing
//! touches the sequence until [`Controller::update`] applies the queue in
//! order. Queuing a command of a kind that is already pending replaces it,
//! so the latest request of each kind wins.

use crate::keyframe::{Key, Keyframe};
use crate::sequence::{DataTrack, Sequence};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A deferred mutation of the controller's sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Advance by a number of keyframes (0 freezes)
    Cycle(usize),
    /// Hand the sequence to the render callback
    Render,
    /// Rotate back to key 0
    Restart,
    /// Play forward
    Forward,
    /// Play backward
    Backward,
    /// Flip direction
    Reverse,
    /// Rotate until the given key is current
    Reposition(Key),
}

/// Kind of a command, used as its queue slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// [`Command::Cycle`]
    Cycle,
    /// [`Command::Render`]
    Render,
    /// [`Command::Restart`]
    Restart,
    /// [`Command::Forward`]
    Forward,
    /// [`Command::Backward`]
    Backward,
    /// [`Command::Reverse`]
    Reverse,
    /// [`Command::Reposition`]
    Reposition,
}

impl Command {
    /// Get the kind of this command
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Cycle(_) => CommandKind::Cycle,
            Command::Render => CommandKind::Render,
            Command::Restart => CommandKind::Restart,
            Command::Forward => CommandKind::Forward,
            Command::Backward => CommandKind::Backward,
            Command::Reverse => CommandKind::Reverse,
            Command::Reposition(_) => CommandKind::Reposition,
        }
    }
}

/// Callback receiving the controller's sequence
pub type SequenceCallback<V> = Box<dyn FnMut(&Sequence<V>)>;

/// Owns a sequence and applies queued commands once per tick
pub struct Controller<V, D = String> {
    /// Animated sequence
    pub anim: Sequence<V>,
    /// Auxiliary data sharing the sequence's key space
    pub data: DataTrack<D>,
    on_begin: SequenceCallback<V>,
    on_end: SequenceCallback<V>,
    on_render: SequenceCallback<V>,
    /// Pending commands, one per kind, in queue order
    pending: IndexMap<CommandKind, Command>,
    /// Data entries reached by the last update
    triggers: Vec<Keyframe<D>>,
}

impl<V, D: Clone> Controller<V, D> {
    /// Create a controller for a sequence
    pub fn new(anim: Sequence<V>) -> Self {
        Self {
            anim,
            data: DataTrack::default(),
            on_begin: Box::new(|_| {}),
            on_end: Box::new(|_| {}),
            on_render: Box::new(|_| {}),
            pending: IndexMap::new(),
            triggers: Vec::new(),
        }
    }

    /// Attach a data track
    pub fn with_data(mut self, data: DataTrack<D>) -> Self {
        self.data = data;
        self
    }

    /// Called after an update that leaves the smallest key current
    pub fn on_begin(&mut self, callback: impl FnMut(&Sequence<V>) + 'static) {
        self.on_begin = Box::new(callback);
    }

    /// Called after an update that leaves the largest key current
    pub fn on_end(&mut self, callback: impl FnMut(&Sequence<V>) + 'static) {
        self.on_end = Box::new(callback);
    }

    /// Called when a queued [`Command::Render`] is applied
    pub fn on_render(&mut self, callback: impl FnMut(&Sequence<V>) + 'static) {
        self.on_render = Box::new(callback);
    }

    /// Queue a command for the next update.
    ///
    /// A pending command of the same kind is replaced and keeps its slot.
    pub fn queue(&mut self, command: Command) {
        if let Some(previous) = self.pending.insert(command.kind(), command) {
            tracing::trace!(?previous, ?command, "Replaced pending command");
        }
    }

    /// Queue an advance by `steps` keyframes
    pub fn cycle(&mut self, steps: usize) {
        self.queue(Command::Cycle(steps));
    }

    /// Queue a freeze (advance by zero)
    pub fn freeze(&mut self) {
        self.cycle(0);
    }

    /// Queue a render request
    pub fn render(&mut self) {
        self.queue(Command::Render);
    }

    /// Queue a restart
    pub fn restart(&mut self) {
        self.queue(Command::Restart);
    }

    /// Queue forward playback
    pub fn forward(&mut self) {
        self.queue(Command::Forward);
    }

    /// Queue backward playback
    pub fn backward(&mut self) {
        self.queue(Command::Backward);
    }

    /// Queue a direction flip
    pub fn reverse(&mut self) {
        self.queue(Command::Reverse);
    }

    /// Queue a reposition to `key`
    pub fn reposition(&mut self, key: Key) {
        self.queue(Command::Reposition(key));
    }

    /// Pending commands in the order they will run
    pub fn pending(&self) -> impl Iterator<Item = &Command> {
        self.pending.values()
    }

    /// Apply queued commands, then fire lifecycle callbacks
    pub fn update(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for command in pending.into_values() {
            self.apply(command);
        }

        self.triggers.clear();
        let Some(current) = self.anim.current().map(|kf| kf.key) else {
            return;
        };

        if Some(current) == self.anim.min_key() {
            (self.on_begin)(&self.anim);
        }
        if Some(current) == self.anim.max_key() {
            (self.on_end)(&self.anim);
        }

        self.collect_triggers(current);
    }

    fn apply(&mut self, command: Command) {
        let result = match command {
            Command::Cycle(steps) => {
                self.anim.cycle(steps);
                Ok(())
            }
            Command::Render => {
                (self.on_render)(&self.anim);
                Ok(())
            }
            Command::Restart => self.anim.restart(),
            Command::Forward => {
                self.anim.forward();
                Ok(())
            }
            Command::Backward => {
                self.anim.backward();
                Ok(())
            }
            Command::Reverse => {
                self.anim.reverse();
                Ok(())
            }
            Command::Reposition(key) => self.anim.reposition(key),
        };

        if let Err(e) = result {
            tracing::warn!(?command, "Command failed: {e}");
        }
    }

    /// Collect data entries whose key is current
    fn collect_triggers(&mut self, current: Key) {
        self.triggers.extend(
            self.data
                .iter()
                .filter(|entry| entry.key == current)
                .cloned(),
        );
    }

    /// Get data entries reached by the last update and clear them
    pub fn take_triggers(&mut self) -> Vec<Keyframe<D>> {
        std::mem::take(&mut self.triggers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn spinner() -> Controller<&'static str> {
        Controller::new(Sequence::from_pairs([(0, "|"), (1, "/"), (2, "-"), (3, "\\")]))
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnMut(&Sequence<&'static str>) + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, move |_: &Sequence<&'static str>| handle.set(handle.get() + 1))
    }

    #[test]
    fn test_commands_are_deferred() {
        let mut player = spinner();
        player.cycle(1);
        player.reverse();
        assert_eq!(player.anim.keys().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(player.pending().count(), 2);

        player.update();
        assert_eq!(player.anim.keys().collect::<Vec<_>>(), vec![1, 0, 3, 2]);
        assert_eq!(player.pending().count(), 0);
    }

    #[test]
    fn test_latest_command_of_a_kind_wins() {
        let mut player = spinner();
        player.cycle(1);
        player.render();
        player.cycle(2);
        assert_eq!(
            player.pending().copied().collect::<Vec<_>>(),
            vec![Command::Cycle(2), Command::Render]
        );

        player.update();
        assert_eq!(player.anim.current().map(|kf| kf.key), Some(2));
    }

    #[test]
    fn test_render_sees_state_at_its_slot() {
        let mut player = spinner();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        player.on_render(move |seq| log.borrow_mut().push(seq.current().map(|kf| kf.value)));

        player.render();
        player.cycle(1);
        player.update();
        assert_eq!(*seen.borrow(), vec![Some("|")]);

        // The render slot is freed after the tick, so it now runs after cycle.
        player.cycle(1);
        player.render();
        player.update();
        assert_eq!(*seen.borrow(), vec![Some("|"), Some("-")]);
    }

    #[test]
    fn test_lifecycle_callbacks() {
        let mut player = spinner();
        let (begins, on_begin) = counter();
        let (ends, on_end) = counter();
        player.on_begin(on_begin);
        player.on_end(on_end);

        // Full loop: keys 1, 2, 3, 0.
        for _ in 0..4 {
            player.cycle(1);
            player.update();
        }
        assert_eq!(begins.get(), 1);
        assert_eq!(ends.get(), 1);

        // Freezing on key 0 keeps firing begin.
        player.freeze();
        player.update();
        assert_eq!(begins.get(), 2);
        assert_eq!(ends.get(), 1);
    }

    #[test]
    fn test_single_keyframe_fires_both() {
        let mut player: Controller<&'static str> = Controller::new(Sequence::from_pairs([(7, "*")]));
        let (begins, on_begin) = counter();
        let (ends, on_end) = counter();
        player.on_begin(on_begin);
        player.on_end(on_end);

        player.update();
        assert_eq!((begins.get(), ends.get()), (1, 1));
    }

    #[test]
    fn test_empty_sequence_fires_nothing() {
        let mut player: Controller<&'static str> = Controller::new(Sequence::default());
        let (begins, on_begin) = counter();
        player.on_begin(on_begin);
        player.cycle(1);
        player.restart();
        player.update();
        assert_eq!(begins.get(), 0);
    }

    #[test]
    fn test_failed_command_does_not_stop_the_tick() {
        let mut player: Controller<char> =
            Controller::new(Sequence::from_pairs([(0, 'a'), (2, 'b'), (4, 'c'), (6, 'd')]));
        player.reposition(1);
        player.cycle(1);
        player.update();
        assert_eq!(player.anim.keys().collect::<Vec<_>>(), vec![2, 4, 6, 0]);
    }

    #[test]
    fn test_restart_and_direction_commands() {
        let mut player = spinner();
        player.cycle(2);
        player.backward();
        player.update();
        assert_eq!(player.anim.keys().collect::<Vec<_>>(), vec![2, 1, 0, 3]);
        assert!(player.anim.is_backward());

        player.restart();
        player.forward();
        player.update();
        assert_eq!(player.anim.keys().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_data_triggers() {
        let mut player = spinner()
            .with_data(DataTrack::from_pairs([(0, "click.wav".to_string()), (2, "tock.wav".to_string())]));

        player.update();
        let triggers = player.take_triggers();
        assert_eq!(triggers, vec![Keyframe::new(0, "click.wav".to_string())]);
        assert!(player.take_triggers().is_empty());

        player.cycle(1);
        player.update();
        assert!(player.take_triggers().is_empty());

        player.cycle(1);
        player.update();
        assert_eq!(player.take_triggers()[0].value, "tock.wav");
    }
}
