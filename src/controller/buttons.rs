//! # Button Masks
//!
//! A [`ButtonMask`] is a set of button indices (0-63) packed into a `u64`.
//! Presets key discrete actions by mask, so a binding may require several
//! buttons held together.
//!
//! Masks persist as a sorted list of button indices. TOML integers are signed
//! 64-bit, so the raw `u64` is never written directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest number of buttons a mask can address.
pub const MAX_BUTTONS: usize = 64;

/// Set of pressed (or required) buttons.
///
/// # Examples
///
/// ```
/// use flybywire::controller::ButtonMask;
///
/// let combo = ButtonMask::single(0).with(4);
/// let held = ButtonMask::from_buttons(&[0, 2, 4]);
///
/// assert!(held.contains(combo));
/// assert!(!combo.contains(held));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", try_from = "Vec<u8>")]
pub struct ButtonMask(u64);

impl ButtonMask {
    /// Mask with no buttons.
    pub const EMPTY: ButtonMask = ButtonMask(0);

    /// Mask holding a single button. Indices past [`MAX_BUTTONS`] are ignored.
    #[must_use]
    pub fn single(button: usize) -> Self {
        Self::EMPTY.with(button)
    }

    #[must_use]
    pub fn from_buttons(buttons: &[usize]) -> Self {
        buttons.iter().fold(Self::EMPTY, |mask, &b| mask.with(b))
    }

    /// Returns a copy with `button` set.
    #[must_use]
    pub fn with(self, button: usize) -> Self {
        if button >= MAX_BUTTONS {
            return self;
        }
        Self(self.0 | (1u64 << button))
    }

    /// Returns a copy with `button` cleared.
    #[must_use]
    pub fn without(self, button: usize) -> Self {
        if button >= MAX_BUTTONS {
            return self;
        }
        Self(self.0 & !(1u64 << button))
    }

    #[must_use]
    pub fn is_set(self, button: usize) -> bool {
        button < MAX_BUTTONS && self.0 & (1u64 << button) != 0
    }

    /// True if every button in `other` is also set here.
    #[must_use]
    pub fn contains(self, other: ButtonMask) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[must_use]
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Buttons whose state differs between `self` and `other`.
    #[must_use]
    pub fn changed(self, other: ButtonMask) -> ButtonMask {
        ButtonMask(self.0 ^ other.0)
    }

    /// Set button indices in ascending order.
    pub fn buttons(self) -> impl Iterator<Item = usize> {
        (0..MAX_BUTTONS).filter(move |&b| self.is_set(b))
    }
}

impl fmt::Display for ButtonMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.buttons().map(|b| b.to_string()).collect();
        write!(f, "[{}]", names.join("+"))
    }
}

impl From<ButtonMask> for Vec<u8> {
    fn from(mask: ButtonMask) -> Self {
        mask.buttons().map(|b| b as u8).collect()
    }
}

impl TryFrom<Vec<u8>> for ButtonMask {
    type Error = String;

    fn try_from(buttons: Vec<u8>) -> std::result::Result<Self, Self::Error> {
        let mut mask = ButtonMask::EMPTY;
        for b in buttons {
            let index = usize::from(b);
            if index >= MAX_BUTTONS {
                return Err(format!("button index {} is out of bounds (must be 0-63)", index));
            }
            mask = mask.with(index);
        }
        Ok(mask)
    }
}
