pub const LOADING_TEXT: &str = "Loading models…";

/// Fixed message shown for every terminal load failure.
pub const LOAD_FAILED_TEXT: &str = "Failed to load models!";

pub const PREVIOUS_BUTTON_TEXT: &str = "◀";
pub const NEXT_BUTTON_TEXT: &str = "▶";

/// Title of the native window.
pub const WINDOW_TITLE: &str = "Snapshot Viewer";
