//! src/startup.rs

use crate::configuration::Settings;
use crate::notifier::SignupNotifier;
use crate::routes::{beta_signup, health_check, json_error_handler};
use actix_web::{dev::Server, web, web::Data, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

/// Holds the newly built server, and some useful properties
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> anyhow::Result<Self> {
        let notifier = build_notifier(&configuration)?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, notifier)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// A more expressive name that makes it clear that
    /// this function only returns when the application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Wire the configured channels into a notifier.
pub fn build_notifier(configuration: &Settings) -> anyhow::Result<SignupNotifier> {
    let email_client = configuration.email_client.client()?;
    let telegram_client = configuration.telegram.client()?;
    if email_client.is_none() {
        tracing::warn!("Email channel disabled, credentials not configured");
    }
    if telegram_client.is_none() {
        tracing::warn!("Telegram channel disabled, credentials not configured");
    }
    Ok(SignupNotifier::new(
        email_client,
        telegram_client,
        configuration.application.product_name.clone(),
    ))
}

pub fn run(listener: TcpListener, notifier: SignupNotifier) -> Result<Server, std::io::Error> {
    // Wrap the notifier in a smart pointer
    let notifier = Data::new(notifier);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/health_check", web::get().to(health_check))
            .route("/beta_signup", web::post().to(beta_signup))
            .app_data(notifier.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
