use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::api_json::{responder_plan, responder_validacion, PlanRequest, ValidateRequest};
use crate::config::PlannerConfig;
use crate::error::EngineError;

/// Estado compartido por los handlers: configuración y el semáforo que
/// limita cuántas proyecciones corren a la vez en el pool bloqueante.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PlannerConfig>,
    pub jobs: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: PlannerConfig) -> Self {
        let permits = std::cmp::max(1, config.max_concurrent_jobs);
        AppState {
            config: Arc::new(config),
            jobs: Arc::new(Semaphore::new(permits)),
        }
    }
}

fn engine_error_response(e: &EngineError) -> HttpResponse {
    match e {
        EngineError::Shape(err) => HttpResponse::BadRequest().json(json!({"error": err.to_string()})),
        EngineError::Graph(err) => {
            log::error!("{}", err);
            HttpResponse::UnprocessableEntity().json(json!({"error": err.to_string()}))
        }
    }
}

/// Corre `job` en `spawn_blocking` con un permiso del semáforo.
async fn run_job<T, F>(state: &AppState, job: F) -> HttpResponse
where
    T: Serialize + Send + 'static,
    F: FnOnce(&PlannerConfig) -> Result<T, EngineError> + Send + 'static,
{
    let permit = match state.jobs.clone().acquire_owned().await {
        Ok(p) => p,
        Err(_) => return HttpResponse::InternalServerError().json(json!({"error": "failed to acquire semaphore"})),
    };

    let config = state.config.clone();
    let start = std::time::Instant::now();
    let blocking = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        job(&config)
    });

    let result = match blocking.await {
        Ok(r) => r,
        Err(e) => return HttpResponse::InternalServerError().json(json!({"error": format!("task join error: {}", e)})),
    };
    log::debug!("trabajo terminado en {} ms", start.elapsed().as_millis());

    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => engine_error_response(&e),
    }
}

/// POST /proyeccion/plan
async fn plan_handler(state: web::Data<AppState>, body: web::Json<serde_json::Value>) -> impl Responder {
    let req: PlanRequest = match serde_json::from_value(body.into_inner()) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e)})),
    };
    run_job(&state, move |config| responder_plan(&req, config)).await
}

/// POST /proyeccion/validar
async fn validar_handler(state: web::Data<AppState>, body: web::Json<serde_json::Value>) -> impl Responder {
    let req: ValidateRequest = match serde_json::from_value(body.into_inner()) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e)})),
    };
    run_job(&state, move |config| responder_validacion(&req, config)).await
}

async fn help_handler(state: web::Data<AppState>) -> impl Responder {
    let caps = state.config.caps;
    let help = json!({
        "description": "API de proyección curricular. POST /proyeccion/plan genera semestres a partir de la malla y el avance; POST /proyeccion/validar revisa una proyección armada por el estudiante.",
        "plan_example": {
            "malla": [
                {"codigo": "DCCB-00107", "asignatura": "Cálculo I", "creditos": 6, "nivel": 1, "prereq": "-"},
                {"codigo": "DCCB-00264", "asignatura": "Cálculo II", "creditos": 6, "nivel": 2, "prereq": "DCCB-00107"}
            ],
            "avance": [{"course": "DCCB-00107", "status": "INSCRITO", "period": "202410"}],
            "caps": {"regularCap": caps.regular, "overloadCap": caps.overload}
        },
        "validar_example": {
            "malla": "(igual que plan_example)",
            "plan": [{"semesterIndex": 1, "courseCodes": ["DCCB-00264"]}]
        },
        "defaults": {
            "regularCap": caps.regular,
            "overloadCap": caps.overload,
            "maxCycleIterations": state.config.max_cycle_iterations,
            "sinPrerrequisito": state.config.no_prereq_sentinel
        }
    });
    HttpResponse::Ok().json(help)
}

/// Registra las rutas; lo usa `run_server` y los tests de integración.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/proyeccion/plan", web::post().to(plan_handler))
        .route("/proyeccion/validar", web::post().to(validar_handler))
        .route("/help", web::get().to(help_handler));
}

pub async fn run_server(config: PlannerConfig) -> std::io::Result<()> {
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config);
    log::info!(
        "escuchando en http://{} (topes {}/{}, {} trabajos simultáneos)",
        bind_addr,
        state.config.caps.regular,
        state.config.caps.overload,
        state.config.max_concurrent_jobs
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .configure(configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
