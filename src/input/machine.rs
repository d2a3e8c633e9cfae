use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::input::keymap::{Action, DELETE_KEY, Keymap, LEADER_KEY, LeaderMatch};

pub const DEFAULT_LEADER_TIMEOUT: Duration = Duration::from_millis(1000);
pub const DEFAULT_DELETE_TIMEOUT: Duration = Duration::from_millis(600);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    None,
    Help,
    Error(String),
    Message(String),
}

impl Overlay {
    pub fn is_active(&self) -> bool {
        *self != Overlay::None
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputState {
    Idle,
    LeaderPending { sequence: String, started: Instant },
    DeleteArmed { started: Instant },
}

/// Outcome of feeding one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A semantic action for the view controller.
    Action(Action),
    /// The key started or extended a pending sequence.
    Pending,
    /// The key changed machine state only (overlay dismissed, sequence
    /// cancelled).
    Consumed,
    /// Nothing bound to the key.
    Ignored,
}

impl Dispatch {
    pub fn needs_redraw(self) -> bool {
        self != Dispatch::Ignored
    }
}

/// Turns raw key presses into actions. Owns the leader sequence, the
/// two-press delete confirmation and the overlay that sits above the views.
#[derive(Clone, Debug)]
pub struct InputMachine {
    keymap: Keymap,
    state: InputState,
    overlay: Overlay,
    leader_timeout: Duration,
    delete_timeout: Duration,
}

impl Default for InputMachine {
    fn default() -> Self {
        Self::new(DEFAULT_LEADER_TIMEOUT, DEFAULT_DELETE_TIMEOUT)
    }
}

fn is_plain_char(key: &KeyEvent, ch: char) -> bool {
    key.code == KeyCode::Char(ch)
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

impl InputMachine {
    pub fn new(leader_timeout: Duration, delete_timeout: Duration) -> Self {
        Self {
            keymap: Keymap::new(),
            state: InputState::Idle,
            overlay: Overlay::None,
            leader_timeout,
            delete_timeout,
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn set_overlay(&mut self, overlay: Overlay) {
        self.overlay = overlay;
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.overlay = Overlay::Error(message.into());
    }

    pub fn show_message(&mut self, message: impl Into<String>) {
        self.overlay = Overlay::Message(message.into());
    }

    /// Drop back to `Idle` without side effects.
    pub fn reset(&mut self) {
        self.state = InputState::Idle;
    }

    /// Short text for the footer while a sequence is pending.
    pub fn pending_label(&self) -> Option<String> {
        match &self.state {
            InputState::Idle => None,
            InputState::LeaderPending { sequence, .. } => Some(format!("{LEADER_KEY}{sequence}")),
            InputState::DeleteArmed { .. } => Some(DELETE_KEY.to_string()),
        }
    }

    /// Expire pending sequences whose window has passed. Returns true when
    /// the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = match &self.state {
            InputState::Idle => false,
            InputState::LeaderPending { started, .. } => {
                now.saturating_duration_since(*started) > self.leader_timeout
            }
            InputState::DeleteArmed { started } => {
                now.saturating_duration_since(*started) > self.delete_timeout
            }
        };
        if expired {
            debug!(state = ?self.state, "pending key sequence timed out");
            self.state = InputState::Idle;
        }
        expired
    }

    pub fn feed(&mut self, key: KeyEvent, now: Instant) -> Dispatch {
        self.tick(now);

        match self.overlay {
            Overlay::Error(_) | Overlay::Message(_) => {
                self.overlay = Overlay::None;
                return Dispatch::Consumed;
            }
            Overlay::Help if key.code == KeyCode::Esc || is_plain_char(&key, '?') => {
                self.overlay = Overlay::None;
                self.state = InputState::Idle;
                return Dispatch::Consumed;
            }
            // Help stays up while navigating underneath it.
            Overlay::Help | Overlay::None => {}
        }

        match std::mem::replace(&mut self.state, InputState::Idle) {
            InputState::LeaderPending { mut sequence, started } => {
                let ch = match key.code {
                    KeyCode::Char(ch)
                        if !key
                            .modifiers
                            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                    {
                        ch
                    }
                    _ => {
                        debug!("leader sequence cancelled");
                        return Dispatch::Consumed;
                    }
                };
                sequence.push(ch);
                return match self.keymap.leader(&sequence) {
                    LeaderMatch::Complete(action) => Dispatch::Action(action),
                    LeaderMatch::Prefix => {
                        self.state = InputState::LeaderPending { sequence, started };
                        Dispatch::Pending
                    }
                    LeaderMatch::NoMatch => {
                        debug!(%sequence, "unknown leader sequence");
                        Dispatch::Consumed
                    }
                };
            }
            InputState::DeleteArmed { .. } if is_plain_char(&key, DELETE_KEY) => {
                return Dispatch::Action(Action::Delete);
            }
            // Any other key disarms and is handled normally.
            InputState::DeleteArmed { .. } | InputState::Idle => {}
        }

        if is_plain_char(&key, LEADER_KEY) {
            self.state = InputState::LeaderPending {
                sequence: String::new(),
                started: now,
            };
            return Dispatch::Pending;
        }
        if is_plain_char(&key, DELETE_KEY) {
            self.state = InputState::DeleteArmed { started: now };
            return Dispatch::Pending;
        }
        if key.code == KeyCode::Esc {
            return Dispatch::Action(Action::Cancel);
        }

        match self.keymap.lookup(&key) {
            Some(action) => Dispatch::Action(action),
            None => Dispatch::Ignored,
        }
    }
}
