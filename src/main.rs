use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{error, info};

use ledger_node::api;
use ledger_node::config::Config;
use ledger_node::ledger::Ledger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    info!(
        "⛓️ Starting ledger node {} at http://{}:{} (difficulty={})",
        config.ledger.node_id, config.host, config.port, config.ledger.pow.difficulty
    );

    let state = web::Data::new(Ledger::new(config.ledger.clone()));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
