// ruta.rs - Orquestador del motor de proyección
//
// Pipeline:
// FASE 1: resolver la malla
//   - Detectar prerrequisitos colgantes
//   - Reparar ciclos (Kahn iterativo, acotado)
//   - Output: grafo acíclico + exclusiones para auditoría
//
// FASE 2a (proyección): planificar semestres con el grafo resuelto
// FASE 2b (validación): validar una proyección armada por el estudiante
//
// Ambas fases 2 son consumidores independientes del mismo grafo.

use serde::Serialize;

use crate::algorithm::cycles::{resolve_cycles, Resolution};
use crate::algorithm::graph::ExclusionSet;
use crate::algorithm::scheduler::{plan_semesters, ScheduleOutcome};
use crate::algorithm::validator::{validate_projection, ValidationResult};
use crate::error::{EngineError, GraphError};
use crate::models::{CompletionState, CreditCaps, CurriculumCatalog, Plan};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionReport {
    #[serde(flatten)]
    pub schedule: ScheduleOutcome,
    pub exclusions: ExclusionSet,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    #[serde(flatten)]
    pub result: ValidationResult,
    pub exclusions: ExclusionSet,
}

fn resolver(catalog: &CurriculumCatalog, max_iterations: usize) -> Result<Resolution, GraphError> {
    let res = resolve_cycles(catalog, max_iterations)?;
    log::info!(
        "malla resuelta: {} ramos ({} cr), {} aristas, {} exclusiones ({} colgantes, {} por ciclo)",
        res.graph.len(),
        catalog.total_credits(),
        res.graph.edge_count(),
        res.exclusions.len(),
        res.dangling_exclusions().count(),
        res.cycle_exclusions().count()
    );
    Ok(res)
}

/// Resuelve la malla y genera la proyección greedy.
pub fn ejecutar_proyeccion(
    catalog: &CurriculumCatalog,
    completion: &CompletionState,
    caps: CreditCaps,
    max_iterations: usize,
) -> Result<ProjectionReport, GraphError> {
    let Resolution { graph, exclusions, .. } = resolver(catalog, max_iterations)?;
    let schedule = plan_semesters(&graph, completion, caps);
    Ok(ProjectionReport { schedule, exclusions })
}

/// Resuelve la malla y valida `plan`. Los códigos del plan se normalizan
/// como los de la malla. Un plan con índices de semestre inválidos se
/// rechaza antes de tocar el grafo.
pub fn ejecutar_validacion(
    catalog: &CurriculumCatalog,
    completion: &CompletionState,
    caps: CreditCaps,
    plan: &Plan,
    max_iterations: usize,
) -> Result<ValidationReport, EngineError> {
    plan.check_shape()?;
    let plan = plan.normalized();
    let Resolution { graph, exclusions, .. } = resolver(catalog, max_iterations)?;
    let result = validate_projection(&graph, completion, caps, &plan);
    Ok(ValidationReport { result, exclusions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShapeError;
    use crate::models::{Course, Semester};

    #[test]
    fn proyeccion_con_ciclo_y_colgante() {
        let cat = CurriculumCatalog::from_courses(vec![
            Course::new("A", "a", 3, 1, &["B"]),
            Course::new("B", "b", 3, 1, &["A"]),
            Course::new("C", "c", 3, 2, &["NO-EXISTE"]),
        ]);
        let rep = ejecutar_proyeccion(&cat, &CompletionState::default(), CreditCaps::default(), 100).unwrap();
        assert_eq!(rep.exclusions.dangling().count(), 1);
        assert!(rep.exclusions.cycles().count() >= 1);
        assert!(rep.schedule.is_complete());
        assert_eq!(rep.schedule.plan.codes().count(), 3);

        let v = serde_json::to_value(&rep).unwrap();
        assert!(v.get("plan").is_some());
        assert!(v["exclusions"].is_array());
        assert_eq!(v["stats"]["totalCredits"], 9);
    }

    #[test]
    fn validacion_normaliza_codigos_del_plan() {
        let cat = CurriculumCatalog::from_courses(vec![
            Course::new("A", "a", 3, 1, &[]),
            Course::new("B", "b", 3, 2, &["A"]),
        ]);
        let plan = Plan::new(vec![
            Semester { index: 1, course_codes: vec![" a ".into()], total_credits: 0 },
            Semester { index: 2, course_codes: vec!["b".into()], total_credits: 0 },
        ]);
        let rep = ejecutar_validacion(&cat, &CompletionState::default(), CreditCaps::default(), &plan, 100).unwrap();
        assert!(rep.result.valid, "{:?}", rep.result.errors);
        assert!(rep.result.warnings.is_empty());
    }

    #[test]
    fn validacion_rechaza_forma_invalida() {
        let cat = CurriculumCatalog::from_courses(vec![Course::new("A", "a", 3, 1, &[])]);
        let plan = Plan::new(vec![Semester { index: 0, course_codes: vec!["A".into()], total_credits: 0 }]);
        let err = ejecutar_validacion(&cat, &CompletionState::default(), CreditCaps::default(), &plan, 100).unwrap_err();
        assert_eq!(err, EngineError::Shape(ShapeError::InvalidSemesterIndex(0)));
    }
}
