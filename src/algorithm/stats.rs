//! Estadísticas de carga de una proyección: promedio, semestres extremos y
//! dispersión de créditos.

use serde::Serialize;

use crate::models::Plan;

/// Desviación estándar (en créditos) bajo la cual un plan se considera
/// equilibrado.
pub const BALANCE_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterLoad {
    #[serde(rename = "semesterIndex")]
    pub index: u32,
    pub total_credits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStats {
    pub total_semesters: usize,
    pub total_credits: u64,
    pub average_credits: f64,
    /// Primer semestre con la mayor carga.
    pub heaviest: Option<SemesterLoad>,
    /// Primer semestre con la menor carga.
    pub lightest: Option<SemesterLoad>,
    /// Desviación estándar poblacional de los créditos por semestre.
    pub std_dev: f64,
    pub balanced: bool,
}

impl Default for PlanStats {
    fn default() -> Self {
        PlanStats {
            total_semesters: 0,
            total_credits: 0,
            average_credits: 0.0,
            heaviest: None,
            lightest: None,
            std_dev: 0.0,
            balanced: true,
        }
    }
}

impl PlanStats {
    /// Calcula sobre `total_credits` de cada semestre. Un plan vacío da
    /// ceros, sin extremos, y cuenta como equilibrado.
    pub fn from_plan(plan: &Plan) -> Self {
        if plan.is_empty() {
            return Self::default();
        }

        let n = plan.len() as f64;
        let total_credits: u64 = plan.semesters.iter().map(|s| u64::from(s.total_credits)).sum();
        let average_credits = total_credits as f64 / n;

        let mut heaviest: Option<SemesterLoad> = None;
        let mut lightest: Option<SemesterLoad> = None;
        for s in &plan.semesters {
            let load = SemesterLoad {
                index: s.index,
                total_credits: s.total_credits,
            };
            if heaviest.is_none_or(|h| load.total_credits > h.total_credits) {
                heaviest = Some(load);
            }
            if lightest.is_none_or(|l| load.total_credits < l.total_credits) {
                lightest = Some(load);
            }
        }

        let variance = plan
            .semesters
            .iter()
            .map(|s| (f64::from(s.total_credits) - average_credits).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        PlanStats {
            total_semesters: plan.len(),
            total_credits,
            average_credits,
            heaviest,
            lightest,
            std_dev,
            balanced: std_dev < BALANCE_THRESHOLD,
        }
    }
}
