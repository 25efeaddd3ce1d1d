use std::time::Duration;

use anyhow::Context;
use dotenvy::dotenv;
use gatehouse::router::init_router;
use gatehouse::shutdown::ShutdownCoordinator;
use gatehouse::state::init_app_state;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let state = init_app_state().context("invalid configuration")?;
    let server_config = state.config.server.clone();

    let log_guards = gatehouse_observability::init_tracing(&server_config.log_dir)?;

    let coordinator = ShutdownCoordinator::new();
    coordinator.add_task("flush logs", move || async move {
        drop(log_guards);
        Ok(())
    });

    let app = init_router(state);
    let listener = tokio::net::TcpListener::bind(&server_config.addr)
        .await
        .with_context(|| format!("failed to bind {}", server_config.addr))?;

    tracing::info!(addr = %server_config.addr, "Server listening");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    coordinator.add_task("http server", move || async move {
        let _ = stop_tx.send(());
        server.await??;
        tracing::info!("Server shutdown complete");
        Ok(())
    });

    let failed = coordinator
        .run(Duration::from_secs(server_config.shutdown_timeout))
        .await;
    if !failed.is_empty() {
        anyhow::bail!("shutdown tasks did not complete: {}", failed.join(", "));
    }

    Ok(())
}
