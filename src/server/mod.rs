pub mod api;

use std::error::Error;
use std::sync::Arc;
use crate::cli::Args;
use crate::config::fleet::FleetConfig;
use crate::resolver::ChatAgent;

pub struct Server {
    addr: String,
    agent: Arc<ChatAgent>,
    fleet: Arc<FleetConfig>,
    args: Args,
}

impl Server {
    pub fn new(addr: String, agent: Arc<ChatAgent>, fleet: Arc<FleetConfig>, args: Args) -> Self {
        Self {
            addr,
            agent,
            fleet,
            args,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::serve(&self.addr, self.agent.clone(), self.fleet.clone(), self.args.clone()).await
    }
}
