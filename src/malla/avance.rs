//! Avance curricular: colapso de intentos repetidos a un registro por ramo.
//!
//! El sistema de avance entrega una fila por inscripción, así que un mismo
//! ramo puede aparecer reprobado, inscrito y aprobado en distintos periodos.
//! El motor espera un único registro por código con prioridad
//! APROBADO > INSCRITO > REPROBADO.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::malla::normalize_code;
use crate::models::{CompletionRecord, CompletionState, CompletionStatus};

/// Fila cruda del avance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCompletionRow {
    #[serde(alias = "codigo", alias = "course")]
    pub code: String,
    pub status: String,
    #[serde(alias = "period", alias = "periodo", default)]
    pub term: Option<String>,
}

impl RawCompletionRow {
    pub fn new(code: &str, status: &str, term: Option<&str>) -> Self {
        RawCompletionRow {
            code: code.to_string(),
            status: status.to_string(),
            term: term.map(str::to_string),
        }
    }
}

/// Deja un registro por código. Ante igual prioridad gana el periodo más
/// reciente. Filas con estado desconocido o sin código se descartan.
pub fn collapse_completion(rows: &[RawCompletionRow]) -> Vec<CompletionRecord> {
    let mut best: BTreeMap<String, CompletionRecord> = BTreeMap::new();

    for row in rows {
        let code = normalize_code(&row.code);
        if code.is_empty() {
            continue;
        }
        let Some(status) = CompletionStatus::from_label(&row.status) else {
            log::warn!("avance: estado '{}' desconocido para {}, se ignora", row.status, code);
            continue;
        };
        let candidate = CompletionRecord {
            code: code.clone(),
            status,
            term: row.term.as_deref().map(str::trim).map(str::to_string),
        };

        if best.get(&code).is_none_or(|current| supersedes(&candidate, current)) {
            best.insert(code, candidate);
        }
    }

    best.into_values().collect()
}

fn supersedes(candidate: &CompletionRecord, current: &CompletionRecord) -> bool {
    let (p_new, p_old) = (candidate.status.priority(), current.status.priority());
    p_new > p_old || (p_new == p_old && candidate.term > current.term)
}

/// Atajo: colapsa y arma los conjuntos aprobado / inscrito.
pub fn completion_state_from_rows(rows: &[RawCompletionRow]) -> CompletionState {
    CompletionState::from_records(&collapse_completion(rows))
}
