use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    // --- History Store Args ---
    /// Conversation history store type (memory)
    #[arg(long, env = "HISTORY_TYPE", default_value = "memory")]
    pub history_type: String,

    /// Maximum number of turns kept per conversation; oldest are evicted first.
    #[arg(long, env = "HISTORY_LIMIT", default_value = "10")]
    pub history_limit: usize,

    // --- Remote Assistant Args ---
    /// URL of the hosted assistant completion endpoint. When unset the agent
    /// answers from the FAQ table only.
    #[arg(long, env = "ASSISTANT_BASE_URL")]
    pub assistant_base_url: Option<String>,

    /// API key for the assistant endpoint, sent as a Bearer token.
    #[arg(long, env = "ASSISTANT_API_KEY", default_value = "")]
    pub assistant_api_key: String,

    /// Timeout in seconds for one assistant round trip; expiry triggers the
    /// FAQ fallback.
    #[arg(long, env = "ASSISTANT_TIMEOUT_SECS", default_value = "8")]
    pub assistant_timeout_secs: u64,

    // --- Content Args ---
    /// Path to the FAQ table definition file.
    #[arg(long, env = "FAQ_PATH", default_value = "json/faq.json")]
    pub faq_path: String,

    /// Path to the fleet catalog file.
    #[arg(long, env = "FLEET_PATH", default_value = "json/fleet.json")]
    pub fleet_path: String,

    // --- Lead Handoff Args ---
    /// WhatsApp number bookings and fallback apologies direct users to.
    #[arg(long, env = "WHATSAPP_NUMBER", default_value = "089620928296")]
    pub whatsapp_number: String,

    /// Optional endpoint bookings are persisted to, best effort. Failures are
    /// logged and ignored.
    #[arg(long, env = "BOOKING_ENDPOINT")]
    pub booking_endpoint: Option<String>,

    /// Default language tag for responses (id, en).
    #[arg(long, env = "DEFAULT_LANGUAGE", default_value = "id")]
    pub default_language: String,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
