pub mod assistant;
pub mod booking;
pub mod cli;
pub mod config;
pub mod history;
pub mod i18n;
pub mod models;
pub mod resolver;
pub mod server;

use assistant::AssistantConfig;
use cli::Args;
use i18n::Lang;
use log::info;
use resolver::ChatAgent;
use server::Server;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("History Store Type: {}", args.history_type);
    info!("History Limit: {} turns", args.history_limit);
    info!("Assistant Endpoint: {}", args.assistant_base_url.as_deref().unwrap_or("(none, FAQ-only)"));
    info!("Assistant Timeout: {}s", args.assistant_timeout_secs);
    info!("FAQ Path: {}", args.faq_path);
    info!("Fleet Path: {}", args.fleet_path);
    info!("WhatsApp Number: {}", args.whatsapp_number);
    info!("Booking Endpoint: {}", args.booking_endpoint.as_deref().unwrap_or("(none)"));
    info!("Default Language: {}", args.default_language);
    info!("-------------------------");

    let default_lang = args.default_language
        .parse::<Lang>()
        .map_err(|e| format!("Invalid default language: {}", e))?;
    i18n::init_default_lang(default_lang);

    let faq = config::faq::load_faq(&args.faq_path)?;
    let fleet = config::fleet::load_fleet(&args.fleet_path)?;
    let history = history::initialize_history_store(&args)?;

    let assistant = match &args.assistant_base_url {
        Some(base_url) => {
            let config = AssistantConfig {
                base_url: base_url.clone(),
                api_key: Some(args.assistant_api_key.clone()).filter(|k| !k.is_empty()),
                timeout: Duration::from_secs(args.assistant_timeout_secs),
            };
            Some(assistant::new_client(&config)?)
        }
        None => None,
    };

    let agent = Arc::new(
        ChatAgent::new(assistant, history, faq, args.whatsapp_number.clone())
    );

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, fleet, args);
    server.run().await?;

    Ok(())
}
