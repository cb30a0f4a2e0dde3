use storefront_order_service::config::OrderServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = OrderServiceConfig::from_env();
    let port = storefront_http::port_from_env(3003);
    let app = storefront_order_service::app::build_app(&config)?;

    tracing::info!("order service starting on port {port}");
    storefront_http::serve(app, port).await
}
