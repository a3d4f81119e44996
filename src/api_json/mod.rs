use serde::{Deserialize, Serialize};

use crate::algorithm::{
    ejecutar_proyeccion, ejecutar_validacion, ExclusionSet, ScheduleOutcome, ValidationResult,
};
use crate::config::PlannerConfig;
use crate::error::{DataError, EngineError, ShapeError};
use crate::malla::{
    completion_state_from_rows, normalize_catalog, RawCompletionRow, RawCourseRow,
};
use crate::models::{CompletionState, CreditCaps, CurriculumCatalog, Plan};

/// Topes opcionales de la solicitud. Lo que falte se toma de la
/// configuración del servicio.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsInput {
    #[serde(default)]
    pub regular_cap: Option<u32>,
    #[serde(default)]
    pub overload_cap: Option<u32>,
}

impl CapsInput {
    pub fn resolve(&self, defaults: CreditCaps) -> Result<CreditCaps, ShapeError> {
        CreditCaps::new(
            self.regular_cap.unwrap_or(defaults.regular),
            self.overload_cap.unwrap_or(defaults.overload),
        )
    }
}

/// Parámetros de entrada para generar una proyección
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "malla": [
///     {"codigo": "DCCB-00107", "asignatura": "Cálculo I", "creditos": 6, "nivel": 1, "prereq": "-"},
///     {"codigo": "DCCB-00264", "asignatura": "Cálculo II", "creditos": 6, "nivel": 2, "prereq": "DCCB-00107"}
///   ],
///   "avance": [
///     {"course": "DCCB-00107", "status": "APROBADO", "period": "202310"}
///   ],
///   "caps": {"regularCap": 30, "overloadCap": 35}
/// }
/// ```
///
/// # Campos:
/// - `malla` (o `catalog`): filas crudas de la malla
/// - `avance` (o `completion`): filas crudas del avance; se colapsan a un
///   registro por ramo antes de llamar al motor
/// - `caps`: topes de créditos (opcional)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(alias = "malla")]
    pub catalog: Vec<RawCourseRow>,
    #[serde(alias = "avance", default)]
    pub completion: Vec<RawCompletionRow>,
    #[serde(default)]
    pub caps: CapsInput,
}

/// Igual que `PlanRequest` más la proyección a validar en `plan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    #[serde(alias = "malla")]
    pub catalog: Vec<RawCourseRow>,
    #[serde(alias = "avance", default)]
    pub completion: Vec<RawCompletionRow>,
    #[serde(default)]
    pub caps: CapsInput,
    pub plan: Plan,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    #[serde(flatten)]
    pub schedule: ScheduleOutcome,
    pub caps: CreditCaps,
    pub exclusions: ExclusionSet,
    pub data_errors: Vec<DataError>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    #[serde(flatten)]
    pub result: ValidationResult,
    pub exclusions: ExclusionSet,
    pub data_errors: Vec<DataError>,
}

struct Prepared {
    catalog: CurriculumCatalog,
    data_errors: Vec<DataError>,
    completion: CompletionState,
    caps: CreditCaps,
}

fn preparar(
    catalog: &[RawCourseRow],
    completion: &[RawCompletionRow],
    caps: &CapsInput,
    config: &PlannerConfig,
) -> Result<Prepared, ShapeError> {
    let caps = caps.resolve(config.caps)?;
    let normalized = normalize_catalog(catalog, &config.no_prereq_sentinel);
    Ok(Prepared {
        catalog: normalized.catalog,
        data_errors: normalized.errors,
        completion: completion_state_from_rows(completion),
        caps,
    })
}

/// Normaliza la solicitud y ejecuta la proyección.
pub fn responder_plan(req: &PlanRequest, config: &PlannerConfig) -> Result<PlanResponse, EngineError> {
    let p = preparar(&req.catalog, &req.completion, &req.caps, config)?;
    let report = ejecutar_proyeccion(&p.catalog, &p.completion, p.caps, config.max_cycle_iterations)?;
    Ok(PlanResponse {
        schedule: report.schedule,
        caps: p.caps,
        exclusions: report.exclusions,
        data_errors: p.data_errors,
    })
}

/// Normaliza la solicitud y valida la proyección entregada.
pub fn responder_validacion(req: &ValidateRequest, config: &PlannerConfig) -> Result<ValidateResponse, EngineError> {
    let p = preparar(&req.catalog, &req.completion, &req.caps, config)?;
    let report = ejecutar_validacion(
        &p.catalog,
        &p.completion,
        p.caps,
        &req.plan,
        config.max_cycle_iterations,
    )?;
    Ok(ValidateResponse {
        result: report.result,
        exclusions: report.exclusions,
        data_errors: p.data_errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malla_json() -> &'static str {
        r#"[
            {"codigo": "A", "asignatura": "Álgebra", "creditos": 6, "nivel": 1, "prereq": "-"},
            {"codigo": "B", "asignatura": "Cálculo", "creditos": 6, "nivel": 2, "prereq": "A"},
            {"codigo": "b", "asignatura": "Repetido", "creditos": 6, "nivel": 2, "prereq": ""}
        ]"#
    }

    #[test]
    fn plan_desde_json_de_origen() {
        let body = format!(
            r#"{{"malla": {}, "avance": [{{"course": "A", "status": "INSCRITO", "period": "202410"}}]}}"#,
            malla_json()
        );
        let req: PlanRequest = serde_json::from_str(&body).unwrap();
        let resp = responder_plan(&req, &PlannerConfig::default()).unwrap();
        assert_eq!(resp.data_errors.len(), 1);
        assert_eq!(resp.schedule.plan.semesters[0].course_codes, vec!["B"]);

        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["dataErrors"][0]["kind"], "DUPLICATE_CODE");
        assert_eq!(v["plan"][0]["semesterIndex"], 1);
        assert_eq!(v["caps"]["overloadCap"], 35);
        assert_eq!(v["stats"]["totalSemesters"], 1);
        assert_eq!(v["stats"]["heaviest"]["totalCredits"], 6);
    }

    #[test]
    fn topes_invalidos_son_error_de_forma() {
        let body = format!(r#"{{"malla": {}, "caps": {{"regularCap": 0}}}}"#, malla_json());
        let req: PlanRequest = serde_json::from_str(&body).unwrap();
        let err = responder_plan(&req, &PlannerConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::Shape(ShapeError::InvalidCaps { .. })));
    }

    #[test]
    fn validacion_aplana_el_resultado() {
        let body = format!(
            r#"{{"catalog": {}, "plan": [{{"semesterIndex": 1, "courseCodes": [" b "]}}]}}"#,
            malla_json()
        );
        let req: ValidateRequest = serde_json::from_str(&body).unwrap();
        let resp = responder_validacion(&req, &PlannerConfig::default()).unwrap();
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["valid"], false);
        assert_eq!(v["errors"][0]["kind"], "PRERREQUISITOS_NO_CUMPLIDOS");
        assert_eq!(v["errors"][0]["missingCodes"][0], "A");
    }
}
