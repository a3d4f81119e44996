//! Normalización de filas crudas de malla a `Course` canónicos.
//!
//! El campo de prerrequisitos llega a veces como cadena separada por comas y
//! a veces como lista; aquí se resuelve a un único conjunto de códigos para
//! que ningún componente posterior tenga que distinguir la forma.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::DataError;
use crate::models::{Course, CurriculumCatalog};

/// Marcador convencional de "sin prerrequisito"
pub const DEFAULT_SENTINEL: &str = "-";

/// Campo numérico tal como llega (JSON numérico, texto de planilla, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    /// Entero representado, si lo hay. `6.0` y `" 6 "` valen 6; `6.5` no.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawNumber::Int(i) => Some(*i),
            RawNumber::Float(f) => float_to_int(*f),
            RawNumber::Text(s) => {
                let t = s.trim().replace(',', ".");
                t.parse::<i64>()
                    .ok()
                    .or_else(|| t.parse::<f64>().ok().and_then(float_to_int))
            }
        }
    }

    fn display(&self) -> String {
        match self {
            RawNumber::Int(i) => i.to_string(),
            RawNumber::Float(f) => f.to_string(),
            RawNumber::Text(s) => s.clone(),
        }
    }
}

fn float_to_int(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// Campo de prerrequisitos en cualquiera de sus formas de origen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrereqField {
    Text(String),
    List(Vec<String>),
    #[default]
    Missing,
}

/// Fila cruda de la malla (API de mallas o planilla).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCourseRow {
    #[serde(alias = "codigo", default)]
    pub code: Option<String>,
    #[serde(alias = "asignatura", alias = "nombre", default)]
    pub name: Option<String>,
    #[serde(alias = "creditos", default)]
    pub credits: Option<RawNumber>,
    #[serde(alias = "nivel", default)]
    pub level: Option<RawNumber>,
    #[serde(alias = "prereq", alias = "prerequisiteCodes", default)]
    pub prereq: PrereqField,
}

/// Resultado de normalizar: la malla y los errores por fila.
#[derive(Debug, Clone, Default)]
pub struct NormalizedCatalog {
    pub catalog: CurriculumCatalog,
    pub errors: Vec<DataError>,
}

/// Recorta, colapsa espacios internos y pasa a mayúsculas.
pub fn normalize_code(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Lista canónica de prerrequisitos: sin vacíos, sin el centinela y sin
/// repetidos.
pub fn normalize_prereqs(field: &PrereqField, sentinel: &str) -> BTreeSet<String> {
    let sentinel = normalize_code(sentinel);
    let keep = |p: &String| !p.is_empty() && *p != sentinel;
    match field {
        PrereqField::Text(s) => s.split(',').map(normalize_code).filter(keep).collect(),
        PrereqField::List(items) => items.iter().map(|p| normalize_code(p)).filter(keep).collect(),
        PrereqField::Missing => BTreeSet::new(),
    }
}

/// Normaliza todas las filas. Las filas con campos obligatorios faltantes o
/// inválidos se rechazan; ante un código repetido se conserva la primera
/// aparición y se reporta la colisión.
pub fn normalize_catalog(rows: &[RawCourseRow], sentinel: &str) -> NormalizedCatalog {
    let mut out = NormalizedCatalog::default();

    for (idx, raw) in rows.iter().enumerate() {
        let row = idx + 1;
        let course = match normalize_row(raw, row, sentinel) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("malla: {}", e);
                out.errors.push(e);
                continue;
            }
        };
        if let Err(dup) = out.catalog.insert(course) {
            let e = DataError::DuplicateCode { row, code: dup.code };
            log::warn!("malla: {}", e);
            out.errors.push(e);
        }
    }

    log::debug!(
        "malla normalizada: {} ramos, {} filas con error",
        out.catalog.len(),
        out.errors.len()
    );
    out
}

fn normalize_row(raw: &RawCourseRow, row: usize, sentinel: &str) -> Result<Course, DataError> {
    let code = raw.code.as_deref().map(normalize_code).unwrap_or_default();
    if code.is_empty() {
        return Err(DataError::MissingField { row, field: "code" });
    }

    let name = raw.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(DataError::MissingField { row, field: "name" });
    }

    let credits = required_integer(raw.credits.as_ref(), row, "credits")?;
    let credits = u32::try_from(credits).map_err(|_| DataError::InvalidField {
        row,
        field: "credits",
        value: credits.to_string(),
    })?;

    let level = required_integer(raw.level.as_ref(), row, "level")?;
    let level = u32::try_from(level)
        .ok()
        .filter(|l| *l >= 1)
        .ok_or_else(|| DataError::InvalidField {
            row,
            field: "level",
            value: level.to_string(),
        })?;

    Ok(Course {
        code,
        name: name.to_string(),
        credits,
        level,
        prerequisite_codes: normalize_prereqs(&raw.prereq, sentinel),
    })
}

fn required_integer(
    value: Option<&RawNumber>,
    row: usize,
    field: &'static str,
) -> Result<i64, DataError> {
    let v = value.ok_or(DataError::MissingField { row, field })?;
    if let RawNumber::Text(s) = v {
        if s.trim().is_empty() {
            return Err(DataError::MissingField { row, field });
        }
    }
    v.as_integer().ok_or_else(|| DataError::InvalidField {
        row,
        field,
        value: v.display(),
    })
}
