use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenvy::dotenv;
use log::info;

use td_api::app::{self, AppState};
use td_api::config::{AppConfig, DeliveryMode};
use td_api::middleware::{create_cors, AccessGate};
use td_core::repositories::VerificationStore;
use td_core::services::verification::{CodeDelivery, VerificationService};
use td_infra::{ConsoleDelivery, InMemoryVerificationStore, MockDelivery};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env()?;
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting TextDesk API on {}", bind_address);

    // All collaborators are constructed here once and injected; no
    // ambient singletons.
    let store = Arc::new(InMemoryVerificationStore::new());
    match config.delivery_mode {
        DeliveryMode::Console => {
            serve(store, Arc::new(ConsoleDelivery::new()), config, &bind_address).await
        }
        DeliveryMode::Mock => {
            serve(store, Arc::new(MockDelivery::new()), config, &bind_address).await
        }
    }
}

async fn serve<D>(
    store: Arc<InMemoryVerificationStore>,
    delivery: Arc<D>,
    config: AppConfig,
    bind_address: &str,
) -> anyhow::Result<()>
where
    D: CodeDelivery + 'static,
{
    let verification = Arc::new(VerificationService::new(
        delivery,
        Arc::clone(&store),
        config.verification.clone(),
    ));
    let state = web::Data::new(AppState::new(verification));
    let default_country_code = config.verification.default_country_code.clone();

    HttpServer::new(move || {
        let gate = AccessGate::new(
            Arc::clone(&store) as Arc<dyn VerificationStore>,
            default_country_code.clone(),
        );
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .configure(|cfg| app::configure(cfg, state.clone(), gate))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
