use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const LEADER_KEY: char = ',';
pub const DELETE_KEY: char = 'd';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Back,
    Forward,
}

impl Step {
    pub fn delta(self) -> i64 {
        match self {
            Step::Back => -1,
            Step::Forward => 1,
        }
    }

    pub fn is_forward(self) -> bool {
        self == Step::Forward
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JumpUnit {
    Day,
    Week,
    Month,
    Year,
}

/// What a key press means, independent of the view it lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveSelection(Step),
    MoveColumn(Step),
    Jump(JumpUnit, Step),
    ToggleRowExpansion,
    ToggleExpandAll,
    ToggleView,
    ShowAgenda,
    ShowMonth,
    Edit,
    Create,
    Today,
    ToggleHelp,
    Quit,
    CycleBucket(Step),
    ToggleFocus,
    Cancel,
    Delete,
}

/// A key with the modifiers that matter for lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(ch: char) -> Self {
        Self::key(KeyCode::Char(ch))
    }

    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    /// Shift is already folded into the character (`J` vs `j`) and into
    /// `BackTab`, so it is dropped for those keys.
    pub fn from_event(key: &KeyEvent) -> Self {
        let mut modifiers = key.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
        if matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        let code = match key.code {
            KeyCode::Char(c) if modifiers.contains(KeyModifiers::CONTROL) => {
                KeyCode::Char(c.to_ascii_lowercase())
            }
            other => other,
        };
        Self { code, modifiers }
    }
}

use Action::*;
use JumpUnit::*;
use Step::*;

const NORMAL_BINDINGS: &[(KeyChord, Action)] = &[
    (KeyChord::ch('q'), Quit),
    (KeyChord::ch('Q'), Quit),
    (KeyChord::ch('?'), ToggleHelp),
    (KeyChord::ch('t'), Today),
    (KeyChord::ch('i'), Edit),
    (KeyChord::ch('a'), ToggleView),
    (KeyChord::ch('j'), MoveSelection(Forward)),
    (KeyChord::key(KeyCode::Down), MoveSelection(Forward)),
    (KeyChord::ch('k'), MoveSelection(Back)),
    (KeyChord::key(KeyCode::Up), MoveSelection(Back)),
    (KeyChord::ch('l'), MoveColumn(Forward)),
    (KeyChord::key(KeyCode::Right), MoveColumn(Forward)),
    (KeyChord::ch('h'), MoveColumn(Back)),
    (KeyChord::key(KeyCode::Left), MoveColumn(Back)),
    (KeyChord::ch('J'), Jump(Day, Forward)),
    (KeyChord::ch('K'), Jump(Day, Back)),
    (KeyChord::ch('w'), Jump(Week, Forward)),
    (KeyChord::ch('b'), Jump(Week, Back)),
    (KeyChord::ctrl('l'), Jump(Month, Forward)),
    (KeyChord::ctrl('h'), Jump(Month, Back)),
    // Many terminals deliver Ctrl-h as Backspace.
    (KeyChord::key(KeyCode::Backspace), Jump(Month, Back)),
    (KeyChord::ctrl('j'), Jump(Year, Forward)),
    (KeyChord::ctrl('k'), Jump(Year, Back)),
    (KeyChord::ch('o'), ToggleRowExpansion),
    (KeyChord::ch('O'), ToggleExpandAll),
    (KeyChord::key(KeyCode::Tab), CycleBucket(Forward)),
    (KeyChord::key(KeyCode::BackTab), CycleBucket(Back)),
    (KeyChord::key(KeyCode::Enter), ToggleFocus),
];

const LEADER_BINDINGS: &[(&str, Action)] = &[
    ("a", ShowAgenda),
    ("m", ShowMonth),
    ("n", Create),
    ("xr", ToggleRowExpansion),
    ("xa", ToggleExpandAll),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaderMatch {
    Complete(Action),
    Prefix,
    NoMatch,
}

/// Key table built once at startup.
#[derive(Clone, Debug)]
pub struct Keymap {
    normal: HashMap<KeyChord, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl Keymap {
    pub fn new() -> Self {
        Self {
            normal: NORMAL_BINDINGS.iter().copied().collect(),
        }
    }

    pub fn lookup(&self, key: &KeyEvent) -> Option<Action> {
        self.normal.get(&KeyChord::from_event(key)).copied()
    }

    pub fn leader(&self, sequence: &str) -> LeaderMatch {
        if let Some((_, action)) = LEADER_BINDINGS.iter().find(|(seq, _)| *seq == sequence) {
            return LeaderMatch::Complete(*action);
        }
        if LEADER_BINDINGS
            .iter()
            .any(|(seq, _)| seq.starts_with(sequence))
        {
            LeaderMatch::Prefix
        } else {
            LeaderMatch::NoMatch
        }
    }

    pub fn leader_bindings() -> &'static [(&'static str, Action)] {
        LEADER_BINDINGS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_shifted_letters_resolve_without_shift() {
        let map = Keymap::new();
        assert_eq!(
            map.lookup(&key(KeyCode::Char('J'), KeyModifiers::SHIFT)),
            Some(Jump(Day, Forward))
        );
        assert_eq!(
            map.lookup(&key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(CycleBucket(Back))
        );
    }

    #[test]
    fn test_control_chords_are_distinct_from_plain_keys() {
        let map = Keymap::new();
        assert_eq!(
            map.lookup(&key(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Some(Jump(Month, Forward))
        );
        assert_eq!(
            map.lookup(&key(KeyCode::Char('l'), KeyModifiers::NONE)),
            Some(MoveColumn(Forward))
        );
        assert_eq!(map.lookup(&key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_leader_prefix_and_complete() {
        let map = Keymap::new();
        assert_eq!(map.leader("x"), LeaderMatch::Prefix);
        assert_eq!(map.leader("xr"), LeaderMatch::Complete(ToggleRowExpansion));
        assert_eq!(map.leader("a"), LeaderMatch::Complete(ShowAgenda));
        assert_eq!(map.leader("xz"), LeaderMatch::NoMatch);
        assert_eq!(map.leader("q"), LeaderMatch::NoMatch);
    }
}
