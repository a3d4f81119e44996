//! Tipos de error del motor de proyección.
//!
//! Las condiciones esperadas del dominio (ciclos reparados, atascos del
//! planificador, prerrequisitos no cumplidos) viajan como datos en los
//! resultados; aquí solo viven los errores de ingesta, los fatales del grafo
//! y los de forma de la entrada.

use serde::Serialize;
use thiserror::Error;

/// Error de ingesta de la malla. Se reporta por fila: la fila se rechaza y el
/// resto del catálogo se sigue procesando.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataError {
    #[error("fila {row}: código duplicado '{code}' (se conserva la primera aparición)")]
    DuplicateCode { row: usize, code: String },

    #[error("fila {row}: falta el campo obligatorio '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("fila {row}: valor inválido '{value}' en el campo '{field}'")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Error fatal del grafo de prerrequisitos.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// El resolvedor agotó su cota de iteraciones. Para un grafo finito esto
    /// indica un bug del resolvedor, no datos malos.
    #[error(
        "ciclo de prerrequisitos sin resolver tras {iterations} iteraciones: {}",
        .members.join(", ")
    )]
    UnresolvableCycle {
        iterations: usize,
        members: Vec<String>,
    },
}

/// Entrada con forma inválida en el borde (topes, índices de semestre).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("topes de créditos inválidos: regular={regular}, máximo={overload} (se exige 0 < regular <= máximo)")]
    InvalidCaps { regular: u32, overload: u32 },

    #[error("índice de semestre inválido: {0} (debe ser >= 1)")]
    InvalidSemesterIndex(u32),

    #[error("el semestre {0} aparece más de una vez en la proyección")]
    RepeatedSemester(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("variable {var}={value:?} inválida: {reason}")]
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Caps(#[from] ShapeError),
}

/// Error de las funciones orquestadoras (`algorithm::ruta`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
