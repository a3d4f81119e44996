//! Módulo `malla`: ingesta de la malla curricular y del avance del estudiante.
//!
//! Submódulos:
//! - `normalizer`: filas crudas -> `CurriculumCatalog` canónico
//! - `io`: helpers de lectura de planillas (calamine)
//! - `excel`: malla desde planilla, columnas por encabezado
//! - `json`: malla y avance desde el JSON de las APIs de origen
//! - `avance`: colapso de intentos repetidos a un registro por ramo

pub mod normalizer;

mod io;

pub mod excel;

pub mod json;

pub mod avance;

pub use normalizer::{
    normalize_catalog, normalize_code, normalize_prereqs, NormalizedCatalog, PrereqField,
    RawCourseRow, RawNumber, DEFAULT_SENTINEL,
};
pub use excel::leer_malla_excel;
pub use json::{leer_avance_json, leer_malla_json, parse_avance_json, parse_malla_json};
pub use avance::{collapse_completion, completion_state_from_rows, RawCompletionRow};
