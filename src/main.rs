use std::{fs::create_dir_all, process};

use env_logger::Env;
use image_api::{app, config::Settings, util::path::get_image_path, ServerState};
use tokio::{net::TcpListener, signal};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = match Settings::load() {
        Err(err) => {
            log::error!("Failed to load configuration: {}", err);
            process::exit(1);
        }
        Ok(settings) => settings,
    };
    log::info!("Loaded {} API keys", settings.api_keys.len());

    let image_dir = get_image_path();
    if let Err(err) = create_dir_all(&image_dir) {
        log::error!("Failed to create upload directory {:?}: {}", image_dir, err);
        process::exit(1);
    }

    let listen_addr = format!("0.0.0.0:{}", settings.port);
    let listener = match TcpListener::bind(&listen_addr).await {
        Err(err) => {
            log::error!("Unable to listen on {}: {}", listen_addr, err);
            process::exit(1);
        }
        Ok(listener) => listener,
    };

    let router = app(ServerState::new(settings, image_dir));

    log::info!("Server starting on {}", listen_addr);
    if let Err(err) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("Server error: {}", err);
        process::exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            log::error!("Unable to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                log::error!("Unable to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("Shutting down");
}
