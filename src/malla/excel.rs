//! Lectura de la malla desde planilla (xlsx/xls/ods) vía calamine.
//!
//! Las columnas se ubican por encabezado, no por posición: las planillas de
//! distintas carreras no comparten orden.

use crate::malla::io::{normalize_header, read_sheet};
use crate::malla::normalizer::{PrereqField, RawCourseRow, RawNumber};

/// Posición de cada columna relevante dentro de la fila de encabezados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnasMalla {
    pub codigo: usize,
    pub nombre: usize,
    pub creditos: Option<usize>,
    pub nivel: Option<usize>,
    pub prereq: Option<usize>,
}

/// Ubica las columnas de la malla. Devuelve `None` si falta código o nombre.
pub fn detectar_columnas(headers: &[String]) -> Option<ColumnasMalla> {
    let mut codigo = None;
    let mut nombre = None;
    let mut creditos = None;
    let mut nivel = None;
    let mut prereq = None;

    for (i, raw) in headers.iter().enumerate() {
        let h = normalize_header(raw);
        if h.contains("prereq") || h.contains("prerreq") || h.contains("requisito") {
            prereq.get_or_insert(i);
        } else if h.starts_with("codigo") || h == "code" || h == "sigla" {
            codigo.get_or_insert(i);
        } else if h == "asignatura" || h.starts_with("nombre") || h == "name" {
            nombre.get_or_insert(i);
        } else if h.contains("credit") {
            creditos.get_or_insert(i);
        } else if h == "nivel" || h == "level" || h == "semestre" {
            nivel.get_or_insert(i);
        }
    }

    Some(ColumnasMalla {
        codigo: codigo?,
        nombre: nombre?,
        creditos,
        nivel,
        prereq,
    })
}

/// Convierte filas de texto (la primera es de encabezados) a filas crudas.
/// Las filas totalmente vacías se saltan; el resto pasa al normalizador, que
/// decide si faltan campos.
pub fn filas_a_ramos(rows: &[Vec<String>]) -> Result<Vec<RawCourseRow>, String> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let cols = detectar_columnas(header)
        .ok_or_else(|| format!("encabezados de malla no reconocidos: {:?}", header))?;

    let cell = |row: &Vec<String>, idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| row.get(i))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    Ok(body
        .iter()
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .map(|row| RawCourseRow {
            code: cell(row, Some(cols.codigo)),
            name: cell(row, Some(cols.nombre)),
            credits: cell(row, cols.creditos).map(RawNumber::Text),
            level: cell(row, cols.nivel).map(RawNumber::Text),
            prereq: cell(row, cols.prereq)
                .map(PrereqField::Text)
                .unwrap_or_default(),
        })
        .collect())
}

/// Lee la malla desde una planilla. `sheet` elige una hoja interna; por
/// defecto se usa la primera.
pub fn leer_malla_excel(path: &str, sheet: Option<&str>) -> Result<Vec<RawCourseRow>, Box<dyn std::error::Error>> {
    let rows = read_sheet(path, sheet.unwrap_or(""))?;
    let ramos = filas_a_ramos(&rows)?;
    log::info!("malla '{}': {} filas leídas", path, ramos.len());
    Ok(ramos)
}
