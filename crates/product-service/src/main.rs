#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let port = storefront_http::port_from_env(3002);
    let app = storefront_product_service::app::build_default_app();

    tracing::info!("product service starting on port {port}");
    storefront_http::serve(app, port).await
}
