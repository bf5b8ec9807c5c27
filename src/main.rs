use std::sync::Arc;

use authapp::config::{load_config, print_schema};
use authapp::startup::run;
use authapp::utils::logger::init_logging;

#[tokio::main]
async fn main() {
    if std::env::args().skip(1).any(|arg| arg == "--schema") {
        if let Err(e) = print_schema() {
            eprintln!("Failed to render configuration schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = Arc::new(load_config());

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Error initialising logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
