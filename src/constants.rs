/// Constants used throughout examtag
/// Defaults here are overridable through `config/settings.toml`

/// Gemini model used when the config does not name one
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL of the Gemini REST API
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Request timeout for the generation call, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variables checked for the API key, in order
pub const API_KEY_ENV_VARS: &[&str] = &["API_KEY", "GEMINI_API_KEY"];

/// Example text is cut to this many characters before it goes into the prompt
pub const EXAMPLE_CHAR_LIMIT: usize = 300;

/// Keyword-count guidance given to the model (not enforced on the result)
pub const MIN_KEYWORDS: usize = 5;
pub const MAX_KEYWORDS: usize = 10;

/// How many prior tagged questions are sent as few-shot examples by default
pub const DEFAULT_MAX_EXAMPLES: usize = 5;

/// Concurrent suggestion requests issued by `examtag-batch` by default
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// Config file locations tried by `Config::load`, in order
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config/settings.toml",
    "./config/settings.toml",
    "~/.config/examtag/settings.toml",
];
