use serde::{Deserialize, Serialize};

use crate::{KeyChord, PointerGesture};

/// Feature switches for the lockdown installer.
///
/// The default enables everything except the context-menu block, which the
/// exam page leaves available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LockdownPolicy {
    /// Block developer tools and view-source shortcuts.
    pub dev_tools: bool,
    /// Block print/save/open/new-window/history/reload shortcuts, zoom,
    /// pinch and file drops. Also injects the no-select stylesheet and the
    /// fixed viewport.
    pub browser_shortcuts: bool,
    /// Block the right-click menu.
    pub context_menu: bool,
    /// Keep password managers away from password inputs.
    pub password_manager: bool,
}

impl Default for LockdownPolicy {
    fn default() -> Self {
        Self {
            dev_tools: true,
            browser_shortcuts: true,
            context_menu: false,
            password_manager: true,
        }
    }
}

impl LockdownPolicy {
    /// Everything off.
    pub fn disabled() -> Self {
        Self {
            dev_tools: false,
            browser_shortcuts: false,
            context_menu: false,
            password_manager: false,
        }
    }

    /// Everything on, including the context-menu block.
    pub fn strict() -> Self {
        Self {
            context_menu: true,
            ..Self::default()
        }
    }

    /// Whether a `keydown` with `chord` should be cancelled.
    pub fn blocks_key(&self, chord: &KeyChord) -> bool {
        match chord.classify() {
            Some(guard) if guard.is_inspection() => self.dev_tools,
            Some(_) => self.browser_shortcuts,
            None => false,
        }
    }

    /// Whether `gesture` should be cancelled.
    pub fn blocks_gesture(&self, gesture: PointerGesture) -> bool {
        match gesture {
            PointerGesture::Wheel { zoom } => zoom && self.browser_shortcuts,
            PointerGesture::Pinch | PointerGesture::DragOver | PointerGesture::Drop => {
                self.browser_shortcuts
            }
            PointerGesture::ContextMenu => self.context_menu,
        }
    }

    /// Whether any keyboard listener is needed.
    pub fn needs_key_listener(&self) -> bool {
        self.dev_tools || self.browser_shortcuts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_policy_leaves_context_menu_alone() {
        let policy = LockdownPolicy::default();
        assert!(policy.blocks_key(&KeyChord::key("F12")));
        assert!(policy.blocks_key(&KeyChord::key("p").ctrl()));
        assert!(policy.blocks_gesture(PointerGesture::Wheel { zoom: true }));
        assert!(!policy.blocks_gesture(PointerGesture::Wheel { zoom: false }));
        assert!(policy.blocks_gesture(PointerGesture::Drop));
        assert!(!policy.blocks_gesture(PointerGesture::ContextMenu));
        assert!(LockdownPolicy::strict().blocks_gesture(PointerGesture::ContextMenu));
    }

    #[test]
    fn switches_are_independent() {
        let inspection_only = LockdownPolicy {
            dev_tools: true,
            ..LockdownPolicy::disabled()
        };
        assert!(inspection_only.blocks_key(&KeyChord::key("U").meta()));
        assert!(!inspection_only.blocks_key(&KeyChord::key("F5")));
        assert!(!inspection_only.blocks_gesture(PointerGesture::Pinch));
        assert!(!LockdownPolicy::disabled().needs_key_listener());
    }

    #[test]
    fn partial_options_fill_from_default() {
        let policy: LockdownPolicy = serde_json::from_value(json!({ "contextMenu": true })).unwrap();
        assert_eq!(policy, LockdownPolicy::strict());

        let policy: LockdownPolicy = serde_json::from_value(json!({})).unwrap();
        assert_eq!(policy, LockdownPolicy::default());
    }
}
