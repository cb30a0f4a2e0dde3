#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let port = storefront_http::port_from_env(3001);
    let app = storefront_user_service::app::build_default_app();

    tracing::info!("user service starting on port {port}");
    storefront_http::serve(app, port).await
}
