//! Keyboard chords bound to "verify current selection".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClaimcheckError;

/// A key plus modifier set, written as e.g. `"Ctrl+Shift+V"`.
///
/// The key is stored lowercase and compared case-insensitively, because
/// terminals report `Shift+v` as either `'v'` or `'V'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyChord {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub key: char,
}

impl KeyChord {
    pub fn new(ctrl: bool, alt: bool, shift: bool, key: char) -> Self {
        Self {
            ctrl,
            alt,
            shift,
            key: key.to_ascii_lowercase(),
        }
    }

    /// True if a pressed key with these modifiers triggers this chord.
    pub fn matches(&self, ctrl: bool, alt: bool, shift: bool, key: char) -> bool {
        self.ctrl == ctrl
            && self.alt == alt
            && self.shift == shift
            && self.key == key.to_ascii_lowercase()
    }
}

impl Default for KeyChord {
    fn default() -> Self {
        Self::new(true, false, true, 'v')
    }
}

impl FromStr for KeyChord {
    type Err = ClaimcheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| ClaimcheckError::Config {
            reason: format!("invalid key chord '{s}': {why}"),
        };

        let (mut ctrl, mut alt, mut shift) = (false, false, false);
        let mut key = None;
        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "alt" | "option" => alt = true,
                "shift" => shift = true,
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next(), key) {
                        (Some(c), None, None) => key = Some(c),
                        (_, _, Some(_)) => return Err(invalid("more than one key")),
                        _ => return Err(invalid("expected a single character key")),
                    }
                }
            }
        }

        let key = key.ok_or_else(|| invalid("no key given"))?;
        if !(ctrl || alt) {
            return Err(invalid("a chord needs Ctrl or Alt"));
        }
        Ok(Self::new(ctrl, alt, shift, key))
    }
}

impl TryFrom<String> for KeyChord {
    type Error = ClaimcheckError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<KeyChord> for String {
    fn from(chord: KeyChord) -> Self {
        chord.to_string()
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        write!(f, "{}", self.key.to_ascii_uppercase())
    }
}
