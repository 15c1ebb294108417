//! Keyboard shortcut types for menu commands.
//!
//! Shortcuts are declarative: the core records them on commands, and native
//! backends translate them to toolkit accelerators during menu rebuild. A
//! shortcut a backend cannot express is a non-fatal configuration problem:
//! it is logged and omitted.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// Modifier keys held as part of a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mods {
    /// Control (or the platform primary modifier).
    pub ctrl: bool,
    /// Alt/Option.
    pub alt: bool,
    /// Shift.
    pub shift: bool,
}

impl Mods {
    /// True if no modifier is held.
    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift)
    }
}

/// A keyboard shortcut: a set of modifiers plus a printable key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    /// Modifier keys.
    pub mods: Mods,
    /// The non-modifier key, lowercased.
    pub key: char,
}

impl Shortcut {
    /// Construct a shortcut with the primary modifier held.
    pub fn ctrl(key: char) -> Self {
        Self {
            mods: Mods {
                ctrl: true,
                ..Mods::default()
            },
            key: key.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.ctrl {
            write!(f, "ctrl+")?;
        }
        if self.mods.alt {
            write!(f, "alt+")?;
        }
        if self.mods.shift {
            write!(f, "shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for Shortcut {
    type Err = Error;

    /// Parse a shortcut of the form `"ctrl+shift+s"`. Segment order is
    /// free, but exactly one segment must be a single non-modifier key.
    fn from_str(s: &str) -> Result<Self, Error> {
        let mut mods = Mods::default();
        let mut key = None;
        for segment in s.split('+') {
            match segment.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "cmd" | "mod" => mods.ctrl = true,
                "alt" | "opt" => mods.alt = true,
                "shift" => mods.shift = true,
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) if key.is_none() => key = Some(c),
                        _ => {
                            return Err(Error::Shortcut(format!("invalid shortcut segment: {other:?}")));
                        }
                    }
                }
            }
        }
        match key {
            Some(key) => Ok(Self { mods, key }),
            None => Err(Error::Shortcut(format!("shortcut has no key: {s:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() -> crate::Result<()> {
        let sc: Shortcut = "ctrl+q".parse()?;
        assert_eq!(sc, Shortcut::ctrl('q'));

        let sc: Shortcut = "Ctrl+Shift+S".parse()?;
        assert!(sc.mods.ctrl && sc.mods.shift && !sc.mods.alt);
        assert_eq!(sc.key, 's');
        Ok(())
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("ctrl+".parse::<Shortcut>().is_err());
        assert!("ctrl+enter+q".parse::<Shortcut>().is_err());
        assert!("ctrl+shift".parse::<Shortcut>().is_err());
    }

    #[test]
    fn display_round_trip() -> crate::Result<()> {
        let sc: Shortcut = "ctrl+shift+p".parse()?;
        assert_eq!(sc.to_string().parse::<Shortcut>()?, sc);
        Ok(())
    }
}
