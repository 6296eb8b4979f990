/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    /// `mod`: Cmd on Mac, Ctrl elsewhere.
    pub fn primary(is_mac: bool) -> Self {
        Self {
            ctrl: !is_mac,
            meta: is_mac,
            ..Self::NONE
        }
    }
}

/// A key plus the modifiers held with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    pub fn from_keyboard_event(ev: &web_sys::KeyboardEvent) -> Self {
        Self {
            key: ev.key(),
            modifiers: Modifiers {
                ctrl: ev.ctrl_key(),
                alt: ev.alt_key(),
                shift: ev.shift_key(),
                meta: ev.meta_key(),
            },
        }
    }
}

/// The symbolic shortcuts the editor binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hotkey {
    /// mod+b
    Bold,
    /// mod+i
    Italic,
    /// mod+u
    Underlined,
    /// mod+`
    Code,
    Tab,
    ShiftTab,
}

impl Hotkey {
    pub const ALL: [Hotkey; 6] = [
        Hotkey::Bold,
        Hotkey::Italic,
        Hotkey::Underlined,
        Hotkey::Code,
        Hotkey::Tab,
        Hotkey::ShiftTab,
    ];

    fn binding(self, is_mac: bool) -> (&'static str, Modifiers) {
        match self {
            Hotkey::Bold => ("b", Modifiers::primary(is_mac)),
            Hotkey::Italic => ("i", Modifiers::primary(is_mac)),
            Hotkey::Underlined => ("u", Modifiers::primary(is_mac)),
            Hotkey::Code => ("`", Modifiers::primary(is_mac)),
            Hotkey::Tab => ("Tab", Modifiers::NONE),
            Hotkey::ShiftTab => ("Tab", Modifiers::SHIFT),
        }
    }

    /// Modifiers must match exactly; letters compare case-insensitively.
    pub fn matches(self, combo: &KeyCombo, is_mac: bool) -> bool {
        let (key, modifiers) = self.binding(is_mac);
        combo.modifiers == modifiers && combo.key.eq_ignore_ascii_case(key)
    }

    pub fn from_combo(combo: &KeyCombo, is_mac: bool) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.matches(combo, is_mac))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(key: &str) -> KeyCombo {
        KeyCombo::new(
            key,
            Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        )
    }

    #[test]
    fn test_mod_is_ctrl_off_mac_and_meta_on_mac() {
        assert_eq!(Hotkey::from_combo(&ctrl("b"), false), Some(Hotkey::Bold));
        assert_eq!(Hotkey::from_combo(&ctrl("b"), true), None);

        let cmd_i = KeyCombo::new(
            "i",
            Modifiers {
                meta: true,
                ..Modifiers::NONE
            },
        );
        assert_eq!(Hotkey::from_combo(&cmd_i, true), Some(Hotkey::Italic));
        assert_eq!(Hotkey::from_combo(&ctrl("`"), false), Some(Hotkey::Code));
    }

    #[test]
    fn test_extra_modifiers_do_not_match() {
        let ctrl_shift_b = KeyCombo::new(
            "B",
            Modifiers {
                ctrl: true,
                shift: true,
                ..Modifiers::NONE
            },
        );
        assert_eq!(Hotkey::from_combo(&ctrl_shift_b, false), None);

        let ctrl_tab = ctrl("Tab");
        assert_eq!(Hotkey::from_combo(&ctrl_tab, false), None);
    }

    #[test]
    fn test_tab_and_shift_tab() {
        assert_eq!(
            Hotkey::from_combo(&KeyCombo::new("Tab", Modifiers::NONE), false),
            Some(Hotkey::Tab)
        );
        assert_eq!(
            Hotkey::from_combo(&KeyCombo::new("Tab", Modifiers::SHIFT), true),
            Some(Hotkey::ShiftTab)
        );
        assert_eq!(
            Hotkey::from_combo(&KeyCombo::new("a", Modifiers::NONE), false),
            None
        );
    }
}
