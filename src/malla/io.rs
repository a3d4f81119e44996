use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Texto de una celda. Los flotantes enteros se imprimen sin decimales (los
/// créditos suelen venir como 6.0); errores de fórmula quedan vacíos.
pub fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(d) => d.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}

/// Normaliza encabezados: minúsculas, sin espacios ni tildes.
pub fn normalize_header(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Lee una hoja del libro como filas de texto. Si `sheet_name` es vacío o no
/// existe se usa la primera hoja.
pub fn read_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Vec<Vec<String>>, Box<dyn std::error::Error>> {
    let mut workbook = open_workbook_auto(path)?;

    let names = workbook.sheet_names().to_owned();
    let sheet_to_use = names
        .iter()
        .find(|s| !sheet_name.is_empty() && s.as_str() == sheet_name)
        .or_else(|| names.first())
        .cloned()
        .ok_or("No se encontraron hojas en el archivo Excel")?;

    let range = workbook.worksheet_range(&sheet_to_use)?;
    Ok(range
        .rows()
        .map(|r| r.iter().map(cell_to_string).collect())
        .collect())
}
