use std::fs;
use std::path::Path;

use crate::malla::avance::RawCompletionRow;
use crate::malla::normalizer::RawCourseRow;

/// Parsea el arreglo JSON que entrega la API de mallas.
pub fn parse_malla_json(json_str: &str) -> Result<Vec<RawCourseRow>, serde_json::Error> {
    serde_json::from_str::<Vec<RawCourseRow>>(json_str)
}

/// Parsea el arreglo JSON del avance curricular.
pub fn parse_avance_json(json_str: &str) -> Result<Vec<RawCompletionRow>, serde_json::Error> {
    serde_json::from_str::<Vec<RawCompletionRow>>(json_str)
}

/// Lee una malla guardada en disco como JSON.
pub fn leer_malla_json<P: AsRef<Path>>(path: P) -> Result<Vec<RawCourseRow>, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("no se pudo leer la malla '{}': {}", path.display(), e))?;
    let rows = parse_malla_json(&contents)?;
    log::info!("malla '{}': {} filas leídas", path.display(), rows.len());
    Ok(rows)
}

/// Lee el avance guardado en disco como JSON.
pub fn leer_avance_json<P: AsRef<Path>>(path: P) -> Result<Vec<RawCompletionRow>, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("no se pudo leer el avance '{}': {}", path.display(), e))?;
    Ok(parse_avance_json(&contents)?)
}
