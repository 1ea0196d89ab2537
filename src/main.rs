use actix_web::HttpServer;
use ecowatch_api::create_base_app;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize loggers (make sure to run with RUST_LOG=info, for example):
    // env_logger carries `log` records, the subscriber carries tracing events
    env_logger::init();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Print a startup message for convenience.
    println!("EcoWatch API running at http://127.0.0.1:8080");
    println!("Remember: the OpenWeatherMap key is read from OWM_API_KEY.");

    HttpServer::new(create_base_app)
        .bind("127.0.0.1:8080")?
        .run()
        .await
}
