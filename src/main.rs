// --- Proyección curricular - Archivo principal ---

use proyeccion::{run_server, PlannerConfig};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match PlannerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("configuración inválida: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    log::info!("=== Proyección curricular (API) ===");
    run_server(config).await
}
