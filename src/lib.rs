// Biblioteca raíz del crate `proyeccion`.
// Motor de proyección curricular: ingesta de malla y avance, grafo de
// prerrequisitos con reparación de ciclos, planificador de semestres y
// validador de proyecciones. El servidor HTTP es una capa delgada encima.
pub mod error;
pub mod models;
pub mod config;
pub mod malla;
pub mod algorithm;
pub mod api_json;
pub mod server;

pub use algorithm::{
    ejecutar_proyeccion, ejecutar_validacion, plan_semesters, resolve_cycles, validate_projection,
};
pub use config::PlannerConfig;
pub use error::{ConfigError, DataError, EngineError, GraphError, ShapeError};
pub use models::{
    CompletionRecord, CompletionState, CompletionStatus, Course, CreditCaps, CurriculumCatalog,
    Plan, Semester,
};

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
