//! Key mapping for the terminal host.
//!
//! Bindings come from the `[keys]` config table and are parsed once into a
//! [Keymap]. Keys that map to no [Action] are treated as text input.

use crate::config::Keys;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Everything a key can trigger in the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Select,
    CustomCommand,
    CustomInput,
    Next,
    Previous,
    Cancel,
    Up,
    Down,
}

/// Key + modifiers as used in the keymap
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

pub struct Keymap {
    map: HashMap<Key, Action>,
}

impl Keymap {
    #[rustfmt::skip]
    pub fn from_keys(keys: &Keys) -> Self {
        let mut map = HashMap::new();

        macro_rules! bind {
            ($keys:expr, $action:expr) => {
                bind($keys, $action, &mut map);
            };
        }

        bind!(keys.select(),          Action::Select);
        bind!(keys.custom_command(),  Action::CustomCommand);
        bind!(keys.custom_input(),    Action::CustomInput);
        bind!(keys.next(),            Action::Next);
        bind!(keys.previous(),        Action::Previous);
        bind!(keys.cancel(),          Action::Cancel);
        bind!(keys.up(),              Action::Up);
        bind!(keys.down(),            Action::Down);

        Keymap { map }
    }

    /// Looks up the action for a given key event
    pub fn lookup(&self, key: KeyEvent) -> Option<Action> {
        let k = Key {
            code: key.code,
            modifiers: key.modifiers,
        };

        if let Some(action) = self.map.get(&k).copied() {
            return Some(action);
        }

        // Terminals report shifted characters with and without the SHIFT flag.
        if matches!(key.code, KeyCode::Char(_)) && key.modifiers.contains(KeyModifiers::SHIFT) {
            let k2 = Key {
                code: key.code,
                modifiers: key.modifiers - KeyModifiers::SHIFT,
            };
            return self.map.get(&k2).copied();
        }
        None
    }
}

/// Parse a key description: "Enter", "Ctrl+o", "alt-enter", "<c-t>", "Shift+Right".
pub fn parse_key(s: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut code: Option<KeyCode> = None;

    let bracketed = s.starts_with('<') && s.ends_with('>') && s.len() > 2;
    let inner = if bracketed { &s[1..s.len() - 1] } else { s };

    let parts: Vec<&str> = if bracketed {
        inner.split('-').collect()
    } else {
        inner.split(['+', '-']).collect()
    };
    let (last, prefixes) = parts.split_last()?;

    for prefix in prefixes {
        match prefix.to_lowercase().as_str() {
            "c" | "ctrl" | "control" if bracketed || prefix.len() > 1 => {
                modifiers |= KeyModifiers::CONTROL
            }
            "a" | "m" | "alt" | "meta" if bracketed || prefix.len() > 1 => {
                modifiers |= KeyModifiers::ALT
            }
            "s" | "shift" if bracketed || prefix.len() > 1 => modifiers |= KeyModifiers::SHIFT,
            "" => continue,
            _ => return None,
        }
    }

    let low = last.to_lowercase();
    match low.as_str() {
        "up" => code = Some(KeyCode::Up),
        "down" => code = Some(KeyCode::Down),
        "left" => code = Some(KeyCode::Left),
        "right" => code = Some(KeyCode::Right),
        "enter" | "return" | "cr" => code = Some(KeyCode::Enter),
        "esc" | "escape" => code = Some(KeyCode::Esc),
        "backspace" | "back" => code = Some(KeyCode::Backspace),
        "tab" => code = Some(KeyCode::Tab),
        "space" | "spc" => code = Some(KeyCode::Char(' ')),
        _ => {
            let mut chars = last.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                let c = if modifiers.contains(KeyModifiers::SHIFT) {
                    c.to_ascii_uppercase()
                } else {
                    c
                };
                code = Some(KeyCode::Char(c));
            } else if low.len() > 1
                && low.starts_with('f')
                && low[1..].chars().all(|c| c.is_ascii_digit())
            {
                code = Some(KeyCode::F(low[1..].parse().ok()?));
            }
        }
    }

    Some(Key {
        code: code?,
        modifiers,
    })
}

fn bind(key_list: &[String], action: Action, map: &mut HashMap<Key, Action>) {
    for k in key_list {
        match parse_key(k) {
            Some(key) => {
                map.insert(key, action);
            }
            None => tracing::warn!("ignoring unknown key binding '{k}' for {action:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Key {
        Key { code, modifiers }
    }

    #[test]
    fn parses_plain_and_modified_keys() {
        assert_eq!(parse_key("Enter"), Some(key(KeyCode::Enter, KeyModifiers::NONE)));
        assert_eq!(parse_key("Ctrl+o"), Some(key(KeyCode::Char('o'), KeyModifiers::CONTROL)));
        assert_eq!(
            parse_key("Alt+Enter"),
            Some(key(KeyCode::Enter, KeyModifiers::ALT))
        );
        assert_eq!(
            parse_key("Shift+Right"),
            Some(key(KeyCode::Right, KeyModifiers::SHIFT))
        );
        assert_eq!(parse_key("F5"), Some(key(KeyCode::F(5), KeyModifiers::NONE)));
    }

    #[test]
    fn parses_bracketed_shorthand() {
        assert_eq!(parse_key("<c-t>"), Some(key(KeyCode::Char('t'), KeyModifiers::CONTROL)));
        assert_eq!(
            parse_key("<m-enter>"),
            Some(key(KeyCode::Enter, KeyModifiers::ALT))
        );
        assert_eq!(parse_key("<s-x>"), Some(key(KeyCode::Char('X'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_key("Hyper+x"), None);
        assert_eq!(parse_key("enterr"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn default_bindings_resolve() {
        let keymap = Keymap::from_keys(&Keys::default());
        let ev = |code, modifiers| KeyEvent::new(code, modifiers);

        assert_eq!(keymap.lookup(ev(KeyCode::Enter, KeyModifiers::NONE)), Some(Action::Select));
        assert_eq!(
            keymap.lookup(ev(KeyCode::Enter, KeyModifiers::ALT)),
            Some(Action::CustomCommand)
        );
        assert_eq!(
            keymap.lookup(ev(KeyCode::Char('t'), KeyModifiers::CONTROL)),
            Some(Action::CustomInput)
        );
        assert_eq!(keymap.lookup(ev(KeyCode::Esc, KeyModifiers::NONE)), Some(Action::Cancel));
        assert_eq!(keymap.lookup(ev(KeyCode::Right, KeyModifiers::SHIFT)), Some(Action::Next));
        assert_eq!(keymap.lookup(ev(KeyCode::Char('a'), KeyModifiers::NONE)), None);
    }
}
