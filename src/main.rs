use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;
mod storage;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg.logging)?;

    // Build the Tokio runtime, honouring the configured worker count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Chosen once; the process never switches backends afterwards
    let store = storage::select(&cfg.storage);
    logger::log_storage_selected(store.backend(), &cfg);
    if let Err(e) = store.ensure_schema().await {
        logger::log_error(&format!("Failed to prepare message storage: {e}"));
        return Err(e.into());
    }

    let listener = server::bind_listener(addr)?;
    logger::log_server_start(&addr, &cfg, store.backend());

    let state = Arc::new(config::AppState::new(cfg, store));
    server::run_server(listener, state, server::shutdown_signal()).await;

    Ok(())
}
