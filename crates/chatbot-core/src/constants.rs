/// Chatbot — centralized constants.
/// Magic numbers, strings, and limits live here.

// ─── Endpoints ────────────────────────────────────────────────────────────────

pub mod endpoints {
    /// Where a local llama-cpp-python server listens unless told otherwise.
    pub const DEFAULT_MODEL_ENDPOINT: &str = "http://localhost:8001";
    /// Path appended to the endpoint base for readiness checks.
    pub const MODELS_PATH: &str = "/v1/models";
    pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
}

// ─── Environment ──────────────────────────────────────────────────────────────

pub mod env {
    pub const MODEL_ENDPOINT: &str = "MODEL_ENDPOINT";
}

// ─── Model ────────────────────────────────────────────────────────────────────

pub mod model {
    /// Local OpenAI-compatible servers ignore the model name, but the field is required.
    pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
    /// Placeholder bearer token; local servers do not check it.
    pub const PLACEHOLDER_API_KEY: &str = "EMPTY";
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
}

// ─── Probe ────────────────────────────────────────────────────────────────────

pub mod probe {
    pub const MAX_ATTEMPTS: u32 = 30;
    pub const INITIAL_DELAY_MS: u64 = 250;
    pub const MAX_DELAY_MS: u64 = 5_000;
    pub const MULTIPLIER: f64 = 2.0;
    pub const MAX_ELAPSED_SECS: u64 = 120;
    pub const REQUEST_TIMEOUT_MS: u64 = 3_000;
}

// ─── Prompts ──────────────────────────────────────────────────────────────────

pub mod prompts {
    pub const SYSTEM_INSTRUCTION: &str = "You are a helpful chat agent. \
        Answer any questions asked but if you are not certain of the answer say so. \
        Answer only with plain answer do not include any annotations or qualifiers.";

    pub const CHECKING_MODEL_SERVICE: &str = "Checking Model Service Availability...";
    pub const GREETING: &str = "How can I help you ?";
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "chatbot";
    pub const CONFIG_FILE: &str = "config.toml";
}
