//! Planificador greedy de semestres sobre el grafo ya acíclico.
//!
//! Cada semestre toma los ramos desbloqueados ordenados por
//! (nivel, créditos, código) y los va metiendo mientras quepan en el tope
//! con sobrecupo. Un ramo que no cabe no corta el recorrido: otro más chico
//! puede caber todavía.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::algorithm::graph::{Graph, GraphNode};
use crate::algorithm::stats::PlanStats;
use crate::models::{CompletionState, CreditCaps, Plan, Semester};

/// Problemas no fatales de la planificación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulingIssue {
    /// No se pudo ubicar ningún ramo en `semester` aunque había ramos
    /// desbloqueados (`pending`), p. ej. todos superan el tope por sí solos.
    Stall { semester: u32, pending: Vec<String> },
    /// Ramos sin atasco que igual quedaron fuera del plan: su único camino
    /// fue cortado.
    Unreachable { codes: Vec<String> },
}

impl fmt::Display for SchedulingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingIssue::Stall { semester, pending } => write!(
                f,
                "No se pueden asignar cursos en semestre {} (revisa el tope de créditos o cursos con créditos muy altos): {}",
                semester,
                pending.join(", ")
            ),
            SchedulingIssue::Unreachable { codes } => {
                write!(f, "Ramos inalcanzables: {}", codes.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutcome {
    pub plan: Plan,
    /// Ramos de la malla que no quedaron ni cumplidos ni planificados.
    pub remaining: Vec<String>,
    pub issues: Vec<SchedulingIssue>,
    /// Semestres sobre el tope regular (dentro del tope con sobrecupo).
    pub overloaded_semesters: Vec<u32>,
    pub stats: PlanStats,
}

impl ScheduleOutcome {
    pub fn stalled(&self) -> bool {
        self.issues
            .iter()
            .any(|i| matches!(i, SchedulingIssue::Stall { .. }))
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty() && self.issues.is_empty()
    }
}

fn candidate_order(a: &&GraphNode, b: &&GraphNode) -> std::cmp::Ordering {
    a.course
        .level
        .cmp(&b.course.level)
        .then(a.course.credits.cmp(&b.course.credits))
        .then_with(|| a.course.code.cmp(&b.course.code))
}

/// Genera la proyección semestre a semestre. Determinista: mismas entradas,
/// mismo plan.
pub fn plan_semesters(graph: &Graph, completion: &CompletionState, caps: CreditCaps) -> ScheduleOutcome {
    let mut indeg: BTreeMap<&str, i64> = graph.iter().map(|(c, n)| (c, n.in_degree as i64)).collect();

    // aprobados e inscritos: liberan a sus dependientes y no se reprograman
    let satisfied: BTreeSet<&str> = completion.satisfied().filter(|c| graph.contains(c)).collect();
    for done in &satisfied {
        let Some(node) = graph.get(done) else { continue };
        for dep in &node.dependents {
            if let Some(d) = indeg.get_mut(dep.as_str()) {
                *d -= 1;
            }
        }
    }

    let mut available: BTreeSet<&str> = indeg
        .iter()
        .filter(|(c, d)| **d <= 0 && !satisfied.contains(**c))
        .map(|(c, _)| *c)
        .collect();

    let mut scheduled: BTreeMap<&str, u32> = BTreeMap::new();
    let mut outcome = ScheduleOutcome::default();
    let mut semester: u32 = 1;

    while !available.is_empty() {
        let mut candidates: Vec<&GraphNode> = available.iter().filter_map(|c| graph.get(c)).collect();
        candidates.sort_by(candidate_order);

        let mut credits: u32 = 0;
        let mut selected: Vec<&str> = Vec::new();

        for node in candidates {
            let code = node.course.code.as_str();
            if scheduled.contains_key(code) || satisfied.contains(code) {
                continue;
            }

            // la inscripción dentro de un semestre es simultánea: solo cuentan
            // prerrequisitos de semestres anteriores
            let unmet = node.prerequisites.iter().any(|p| {
                !(satisfied.contains(p.as_str())
                    || scheduled.get(p.as_str()).is_some_and(|s| *s < semester))
            });
            if unmet {
                continue;
            }

            // un desborde tampoco cabe
            let Some(total) = credits
                .checked_add(node.course.credits)
                .filter(|t| *t <= caps.overload)
            else {
                log::debug!(
                    "semestre {}: {} ({} cr) no cabe ({} + {} > {})",
                    semester,
                    code,
                    node.course.credits,
                    credits,
                    node.course.credits,
                    caps.overload
                );
                continue;
            };

            credits = total;
            selected.push(code);
        }

        if selected.is_empty() {
            let issue = SchedulingIssue::Stall {
                semester,
                pending: available.iter().map(|c| c.to_string()).collect(),
            };
            log::warn!("{}", issue);
            outcome.issues.push(issue);
            break;
        }

        for code in &selected {
            scheduled.insert(code, semester);
            available.remove(code);
        }
        for code in &selected {
            let Some(node) = graph.get(code) else { continue };
            for dep in &node.dependents {
                let dep = dep.as_str();
                if let Some(d) = indeg.get_mut(dep) {
                    *d -= 1;
                    if *d <= 0 && !satisfied.contains(dep) && !scheduled.contains_key(dep) {
                        available.insert(dep);
                    }
                }
            }
        }

        log::debug!("semestre {}: {} ({} cr)", semester, selected.join(", "), credits);
        if credits > caps.regular {
            outcome.overloaded_semesters.push(semester);
        }
        outcome.plan.semesters.push(Semester {
            index: semester,
            course_codes: selected.iter().map(|c| c.to_string()).collect(),
            total_credits: credits,
        });
        semester += 1;
    }

    outcome.remaining = graph
        .codes()
        .filter(|c| !satisfied.contains(c) && !scheduled.contains_key(c))
        .map(str::to_string)
        .collect();

    if !outcome.remaining.is_empty() && !outcome.stalled() {
        let issue = SchedulingIssue::Unreachable {
            codes: outcome.remaining.clone(),
        };
        log::warn!("{}", issue);
        outcome.issues.push(issue);
    }

    outcome.stats = PlanStats::from_plan(&outcome.plan);
    log::info!(
        "proyección: {} semestres, {} ramos planificados, {} pendientes, promedio {:.1} cr",
        outcome.plan.len(),
        scheduled.len(),
        outcome.remaining.len(),
        outcome.stats.average_credits
    );
    outcome
}
