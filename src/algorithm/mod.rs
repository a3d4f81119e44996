// Motor de proyección curricular.
// Submódulos en orden de dependencia: grafo -> ciclos -> (planificador | validador),
// y `ruta` como orquestador.
pub mod graph;
pub mod cycles;
pub mod stats;
pub mod scheduler;
pub mod validator;
pub mod ruta;

pub use graph::{
    build_dependency_graph, build_graph, find_dangling, Exclusion, ExclusionReason, ExclusionSet,
    Graph, GraphBuild, GraphNode,
};
pub use cycles::{kahn, resolve_cycles, KahnOutcome, Resolution, DEFAULT_MAX_ITERATIONS};
pub use stats::{PlanStats, SemesterLoad, BALANCE_THRESHOLD};
pub use scheduler::{plan_semesters, ScheduleOutcome, SchedulingIssue};
pub use validator::{
    validate_projection, ErrorKind, ValidationError, ValidationResult, ValidationSummary,
    ValidationWarning, WarningKind,
};
pub use ruta::{ejecutar_proyeccion, ejecutar_validacion, ProjectionReport, ValidationReport};
