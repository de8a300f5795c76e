//! Keyboard shortcuts.

/// A key press with its modifier state, as seen by a `keydown` listener.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyChord {
    /// `KeyboardEvent.key`.
    pub key: String,
    /// Control held.
    pub ctrl: bool,
    /// Shift held.
    pub shift: bool,
    /// Alt/Option held.
    pub alt: bool,
    /// Meta/Command held.
    pub meta: bool,
}

impl KeyChord {
    /// Bare key with no modifiers.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Adds Control.
    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Adds Shift.
    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Adds Alt.
    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Adds Meta.
    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Control on Windows/Linux, Command on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    fn is(&self, letter: char) -> bool {
        let mut chars = self.key.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&letter))
    }

    /// What this chord would trigger in a stock browser, if anything the
    /// exam page suppresses.
    pub fn classify(&self) -> Option<Guard> {
        if self.key == "F12" {
            return Some(Guard::DevTools);
        }
        if self.key == "F5" {
            return Some(Guard::Reload);
        }
        if self.alt && (self.key == "ArrowLeft" || self.key == "ArrowRight") {
            return Some(Guard::History);
        }
        if !self.command() {
            return None;
        }
        if self.shift && (self.is('i') || self.is('j') || self.is('c')) {
            return Some(Guard::DevTools);
        }
        [
            ('u', Guard::ViewSource),
            ('p', Guard::Print),
            ('s', Guard::Save),
            ('o', Guard::Open),
            ('n', Guard::NewWindow),
            ('r', Guard::Reload),
        ]
        .into_iter()
        .find_map(|(letter, guard)| self.is(letter).then_some(guard))
    }
}

/// Browser feature a suppressed shortcut would reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Guard {
    /// F12, Ctrl/Cmd+Shift+I/J/C.
    DevTools,
    /// Ctrl/Cmd+U.
    ViewSource,
    /// Ctrl/Cmd+P.
    Print,
    /// Ctrl/Cmd+S.
    Save,
    /// Ctrl/Cmd+O.
    Open,
    /// Ctrl/Cmd+N.
    NewWindow,
    /// Alt+ArrowLeft/ArrowRight.
    History,
    /// F5, Ctrl/Cmd+R.
    Reload,
}

impl Guard {
    /// Whether the guard protects page internals rather than browser chrome.
    pub fn is_inspection(self) -> bool {
        matches!(self, Guard::DevTools | Guard::ViewSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_enumerated_chord_is_classified() {
        let cases = [
            (KeyChord::key("F12"), Guard::DevTools),
            (KeyChord::key("I").ctrl().shift(), Guard::DevTools),
            (KeyChord::key("j").meta().shift(), Guard::DevTools),
            (KeyChord::key("C").ctrl().shift(), Guard::DevTools),
            (KeyChord::key("u").ctrl(), Guard::ViewSource),
            (KeyChord::key("P").meta(), Guard::Print),
            (KeyChord::key("s").ctrl(), Guard::Save),
            (KeyChord::key("o").ctrl(), Guard::Open),
            (KeyChord::key("N").ctrl(), Guard::NewWindow),
            (KeyChord::key("ArrowLeft").alt(), Guard::History),
            (KeyChord::key("ArrowRight").alt(), Guard::History),
            (KeyChord::key("F5"), Guard::Reload),
            (KeyChord::key("r").meta(), Guard::Reload),
        ];
        for (chord, guard) in cases {
            assert_eq!(chord.classify(), Some(guard), "{chord:?}");
        }
    }

    #[test]
    fn ordinary_editing_keys_pass_through() {
        let allowed = [
            KeyChord::key("c").ctrl(),
            KeyChord::key("v").ctrl(),
            KeyChord::key("a").meta(),
            KeyChord::key("i").ctrl(),
            KeyChord::key("ArrowLeft"),
            KeyChord::key("u"),
            KeyChord::key("F11"),
            KeyChord::key("Unidentified").ctrl(),
        ];
        for chord in allowed {
            assert_eq!(chord.classify(), None, "{chord:?}");
        }
    }

    #[test]
    fn inspection_guards() {
        assert!(Guard::DevTools.is_inspection());
        assert!(Guard::ViewSource.is_inspection());
        assert!(!Guard::Reload.is_inspection());
    }
}
