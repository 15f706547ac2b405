/// Marker prepended to stored access levels (`@member`, `@sbx`).
pub const ACCESS_SIGIL: char = '@';

/// Rows shown per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Period between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: &str = "60s";

/// Idle window after which an unanswered flow step is abandoned.
pub const DEFAULT_FLOW_TIMEOUT: &str = "2m";

pub const DEFAULT_EVENTS_FILE: &str = "events.json";
pub const DEFAULT_ITEMS_FILE: &str = "garapan.json";

/// Longest value accepted by a single form input.
pub const MAX_INPUT_LEN: usize = 100;
