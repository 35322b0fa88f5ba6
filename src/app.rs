use crate::{
    config::Config,
    error::Result,
    routes::api_routes,
    services::{MovieApi, OmdbClient, PostgresDocumentStore, Recommender, StorageGateway},
};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::info;
use std::{net::TcpListener, sync::Arc};

pub struct Application {
    port: u16,
    host: String,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        Self {
            port: config.port,
            host: config.host.clone(),
            config: config.clone(),
        }
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        let bind_address = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&bind_address)?;
        info!("Starting server at http://{}", bind_address);

        self.run_with_listener(listener).await
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        let api: Arc<dyn MovieApi> =
            Arc::new(OmdbClient::new(&self.config.api_uri, &self.config.api_key));

        let store = PostgresDocumentStore::connect(&self.config.database_url)
            .await
            .map_err(anyhow::Error::from)
            .context("Failed to connect to the document store")?;
        info!("Connected to the document store");

        let recommender = web::Data::new(Recommender::new(api));
        let storage = web::Data::new(StorageGateway::new(Arc::new(store)));
        let server_storage = storage.clone();

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header();

            App::new()
                .wrap(cors)
                .wrap(Logger::default())
                .app_data(recommender.clone())
                .app_data(server_storage.clone())
                .configure(api_routes)
        })
        .listen(listener)?
        .run()
        .await?;

        info!("Server stopped, closing document store connection");
        storage.close().await;

        Ok(())
    }
}
