use crate::input::{Action, Keymap};

/// Body of the help overlay.
pub const HELP_LINES: &[&str] = &[
    "Shortcuts",
    "",
    "q Q          quit",
    "?            toggle this help",
    "t            jump to today",
    "i            edit selected record (or create one)",
    "dd           delete selected record",
    "h j k l      agenda: column / row   month: day / week",
    "J K          next / previous day",
    "w b          next / previous week",
    "Ctrl+h/l     previous / next month",
    "Ctrl+j/k     next / previous year",
    "o O          toggle row / toggle all rows",
    "a            toggle agenda / month",
    "Tab S-Tab    cycle bucket filter",
    "Enter        month view: grid <-> records",
    "Esc          cancel pending keys, dismiss overlays",
    "",
    "Leader (,)",
    "",
];

fn leader_description(action: Action) -> &'static str {
    match action {
        Action::ShowAgenda => "agenda view",
        Action::ShowMonth => "month view",
        Action::Create => "new record",
        Action::ToggleRowExpansion => "toggle current row",
        Action::ToggleExpandAll => "toggle all rows",
        _ => "",
    }
}

/// Full help text, leader bindings listed from the keymap.
pub fn help_lines() -> Vec<String> {
    let mut lines: Vec<String> = HELP_LINES.iter().map(|l| l.to_string()).collect();
    for (sequence, action) in Keymap::leader_bindings() {
        lines.push(format!(",{sequence:<12}{}", leader_description(*action)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_leader_binding() {
        let lines = help_lines();
        for (sequence, _) in Keymap::leader_bindings() {
            assert!(lines.iter().any(|l| l.starts_with(&format!(",{sequence} "))));
        }
    }
}
