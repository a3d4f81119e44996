//! Validación de una proyección armada por el estudiante.
//!
//! No genera nada: recorre los semestres en orden y reporta errores y
//! advertencias como datos. Una proyección con errores sigue siendo una
//! respuesta válida con `valid: false`.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::algorithm::graph::Graph;
use crate::models::{CompletionState, CreditCaps, Plan, Semester};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    AsignaturaInexistente,
    PrerrequisitosNoCumplidos,
    ExcedeCreditosMaximo,
    AsignaturaDuplicada,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    YaAprobada,
    YaInscrita,
    ExcedeCreditosRegular,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_codes: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub kind: WarningKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub regular_cap: u32,
    pub overload_cap: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub summary: ValidationSummary,
}

impl ValidationResult {
    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

struct Collector {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl Collector {
    fn error(
        &mut self,
        kind: ErrorKind,
        semester: u32,
        code: Option<&str>,
        name: Option<&str>,
        message: String,
        missing: Option<Vec<String>>,
    ) {
        self.errors.push(ValidationError {
            kind,
            semester_index: Some(semester),
            code: code.map(str::to_string),
            name: name.map(str::to_string),
            message,
            missing_codes: missing,
        });
    }

    fn warning(&mut self, kind: WarningKind, semester: u32, code: Option<&str>, name: Option<&str>, message: String) {
        self.warnings.push(ValidationWarning {
            kind,
            semester_index: Some(semester),
            code: code.map(str::to_string),
            name: name.map(str::to_string),
            message,
        });
    }
}

/// Valida `plan` contra el grafo resuelto. Aprobados e inscritos cuentan
/// como cumplidos desde el primer semestre; cada semestre suma sus ramos a
/// los cumplidos antes de pasar al siguiente.
pub fn validate_projection(
    graph: &Graph,
    completion: &CompletionState,
    caps: CreditCaps,
    plan: &Plan,
) -> ValidationResult {
    let mut out = Collector {
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    let mut terms: Vec<&Semester> = plan.semesters.iter().collect();
    terms.sort_by_key(|s| s.index);

    let mut satisfied: BTreeSet<&str> = completion.satisfied().collect();
    let mut placed: BTreeSet<&str> = BTreeSet::new();

    for term in terms {
        let sem = term.index;
        // suma en u64: no desborda con créditos u32
        let mut credits: u64 = 0;
        let mut this_term: Vec<&str> = Vec::new();

        for code in &term.course_codes {
            let code = code.as_str();
            let Some(node) = graph.get(code) else {
                out.error(
                    ErrorKind::AsignaturaInexistente,
                    sem,
                    Some(code),
                    None,
                    format!("La asignatura {} no existe en la malla", code),
                    None,
                );
                continue;
            };
            let name = Some(node.course.name.as_str());

            credits += u64::from(node.course.credits);

            if !placed.insert(code) {
                out.error(
                    ErrorKind::AsignaturaDuplicada,
                    sem,
                    Some(code),
                    name,
                    format!("{} ya está asignada en otro semestre de la proyección", code),
                    None,
                );
                continue;
            }
            this_term.push(code);

            if completion.is_approved(code) {
                out.warning(
                    WarningKind::YaAprobada,
                    sem,
                    Some(code),
                    name,
                    format!("{} ya está aprobada", code),
                );
            } else if completion.is_in_progress(code) {
                out.warning(
                    WarningKind::YaInscrita,
                    sem,
                    Some(code),
                    name,
                    format!("{} ya está inscrita en el periodo actual", code),
                );
            }

            let missing: Vec<String> = node
                .prerequisites
                .iter()
                .filter(|p| !satisfied.contains(p.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                out.error(
                    ErrorKind::PrerrequisitosNoCumplidos,
                    sem,
                    Some(code),
                    name,
                    format!("Faltan prerrequisitos para {}: {}", code, missing.join(", ")),
                    Some(missing),
                );
            }
        }

        if credits > u64::from(caps.overload) {
            out.error(
                ErrorKind::ExcedeCreditosMaximo,
                sem,
                None,
                None,
                format!(
                    "Semestre {}: {} créditos superan el máximo permitido ({})",
                    sem, credits, caps.overload
                ),
                None,
            );
        } else if credits > u64::from(caps.regular) {
            out.warning(
                WarningKind::ExcedeCreditosRegular,
                sem,
                None,
                None,
                format!(
                    "Semestre {}: {} créditos superan la carga regular ({}), requiere sobrecupo",
                    sem, credits, caps.regular
                ),
            );
        }

        log::debug!("validación semestre {}: {} cr", sem, credits);
        satisfied.extend(this_term);
    }

    let summary = ValidationSummary {
        error_count: out.errors.len(),
        warning_count: out.warnings.len(),
        regular_cap: caps.regular,
        overload_cap: caps.overload,
    };
    log::info!(
        "validación: {} errores, {} advertencias",
        summary.error_count,
        summary.warning_count
    );

    ValidationResult {
        valid: out.errors.is_empty(),
        errors: out.errors,
        warnings: out.warnings,
        summary,
    }
}
