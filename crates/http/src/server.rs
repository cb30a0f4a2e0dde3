//! Server bootstrap.

use axum::Router;

/// Resolve the listen port from `PORT`, falling back to the service default.
pub fn port_from_env(default: u16) -> u16 {
    match std::env::var("PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("PORT={raw} is not a valid port; using {default}");
            default
        }),
        Err(_) => default,
    }
}

/// Bind `0.0.0.0:<port>` and serve the router until the process exits.
pub async fn serve(app: Router, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
