use std::str::FromStr;

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

/// Identifier for a physical keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
    Digit(u8),
}

impl KeyCode {
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(key) = parse_named_key(name) {
            return Some(key);
        }
        let mut chars = name.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return None;
        };
        if ch == ' ' {
            return Some(Self::Named(NamedKey::Space));
        }
        if let Some(digit) = ch.to_digit(10) {
            return Some(Self::Digit(digit as u8));
        }
        if ch.is_ascii_alphabetic() {
            return Some(Self::Character(ch.to_ascii_uppercase()));
        }
        None
    }
}

fn parse_named_key(name: &str) -> Option<KeyCode> {
    use NamedKey::*;
    let key = match name {
        "Space" => Space,
        "Enter" | "Return" => Enter,
        "Left" | "ArrowLeft" => Left,
        "Right" | "ArrowRight" => Right,
        "Escape" | "Esc" => Escape,
        "Backspace" => Backspace,
        "Home" => Home,
        _ => return None,
    };
    Some(KeyCode::Named(key))
}

/// Friendly names for the keys the player uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Space,
    Enter,
    Left,
    Right,
    Escape,
    Backspace,
    Home,
}

/// Discrete player input understood by a [`Session`](crate::session::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gesture {
    /// Follow the default edge of the current scene.
    Advance,
    /// Pick the choice at this zero-based index.
    Choose(usize),
    Back,
    /// Return to the first scene and forget history.
    Menu,
    Quit,
}

impl Gesture {
    /// Maps a key press to a gesture. Digit keys select choices counting from one.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Named(NamedKey::Right | NamedKey::Space | NamedKey::Enter) => {
                Some(Self::Advance)
            }
            KeyCode::Named(NamedKey::Left | NamedKey::Backspace) => Some(Self::Back),
            KeyCode::Named(NamedKey::Escape | NamedKey::Home) => Some(Self::Menu),
            KeyCode::Digit(digit @ 1..=9) => Some(Self::Choose(digit as usize - 1)),
            KeyCode::Character('Q') => Some(Self::Quit),
            _ => None,
        }
    }
}

impl FromStr for Gesture {
    type Err = Error;

    /// Parses a text command: `next`, `back`, `menu`, `quit`, `choose N` or a
    /// bare choice number. Choice numbers count from one.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let mut words = input.split_whitespace();
        let command = words.next().unwrap_or_default().to_ascii_lowercase();
        let argument = words.next();
        let gesture = match (command.as_str(), argument) {
            ("" | "next" | "n", None) => Self::Advance,
            ("back" | "b" | "prev", None) => Self::Back,
            ("menu" | "restart" | "m", None) => Self::Menu,
            ("quit" | "exit" | "q", None) => Self::Quit,
            ("choose" | "c", Some(number)) => Self::Choose(parse_choice_number(number)?),
            (number, None) if number.starts_with(|c: char| c.is_ascii_digit()) => {
                Self::Choose(parse_choice_number(number)?)
            }
            _ => return Err(anyhow!("unknown command: {input:?}")),
        };
        if words.next().is_some() {
            return Err(anyhow!("unexpected trailing input in command: {input:?}"));
        }
        Ok(gesture)
    }
}

fn parse_choice_number(text: &str) -> Result<usize, Error> {
    match text.parse::<usize>() {
        Ok(number) if number >= 1 => Ok(number - 1),
        _ => Err(anyhow!("choice numbers start at 1, got {text:?}")),
    }
}
