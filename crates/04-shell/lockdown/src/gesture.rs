/// Pointer and drag interactions the page may suppress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerGesture {
    /// Wheel scroll; `zoom` when Ctrl/Cmd is held.
    Wheel {
        /// Ctrl/Cmd held during the scroll.
        zoom: bool,
    },
    /// Trackpad pinch (`gesturestart`, `gesturechange`, `gestureend`).
    Pinch,
    /// `dragover`.
    DragOver,
    /// `drop`.
    Drop,
    /// `contextmenu`.
    ContextMenu,
}

impl PointerGesture {
    /// DOM event types the installer listens to.
    pub const EVENT_TYPES: [&'static str; 7] = [
        "wheel",
        "gesturestart",
        "gesturechange",
        "gestureend",
        "dragover",
        "drop",
        "contextmenu",
    ];

    /// Gesture for a DOM event type; `zoom` is only read for `wheel`.
    pub fn from_event_type(kind: &str, zoom: bool) -> Option<Self> {
        Some(match kind {
            "wheel" => PointerGesture::Wheel { zoom },
            "gesturestart" | "gesturechange" | "gestureend" => PointerGesture::Pinch,
            "dragover" => PointerGesture::DragOver,
            "drop" => PointerGesture::Drop,
            "contextmenu" => PointerGesture::ContextMenu,
            _ => return None,
        })
    }
}
