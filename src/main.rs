//! Entry point: wires configuration, the database, and the HTTP server.

use actix_web::{HttpServer, web};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use couponly::inbound::http::health::HealthState;
use couponly::outbound::persistence;
use couponly::server::{self, Cli};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();

    // Explicit initialisation before serving traffic: pool, migrations, seed.
    let pool = persistence::initialise(&cli.database_url).map_err(std::io::Error::other)?;

    let state = web::Data::new(server::build_state(pool));
    let health_state = web::Data::new(HealthState::new());

    let server = {
        let state = state.clone();
        let health_state = health_state.clone();
        HttpServer::new(move || server::build_app(state.clone(), health_state.clone()))
            .bind(cli.bind_addr)?
    };

    health_state.mark_ready();
    info!(addr = %cli.bind_addr, database_url = %cli.database_url, "listening");
    server.run().await
}
