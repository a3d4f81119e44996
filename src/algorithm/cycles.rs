//! Detección y reparación de ciclos de prerrequisitos.
//!
//! Las mallas de origen traen ciclos espurios (errores de digitación, no
//! restricciones académicas reales). En cada pasada se ejecuta Kahn; los
//! nodos que nunca quedan con grado cero son miembros de ciclo, y todo
//! prerrequisito de un miembro que también es miembro se excluye. La
//! heurística no busca el conjunto mínimo de aristas: puede podar de más,
//! pero el ciclo restante se achica estrictamente en cada pasada.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::algorithm::graph::{
    build_dependency_graph, build_graph, Exclusion, ExclusionReason, ExclusionSet, Graph,
    GraphBuild,
};
use crate::error::GraphError;
use crate::models::CurriculumCatalog;

/// Cota de pasadas del resolvedor.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KahnOutcome {
    /// Orden topológico de los nodos removidos.
    pub order: Vec<String>,
    /// Nodos nunca removidos: miembros de ciclo (o dependientes de uno).
    pub stuck: BTreeSet<String>,
}

impl KahnOutcome {
    pub fn is_acyclic(&self) -> bool {
        self.stuck.is_empty()
    }
}

/// Algoritmo de Kahn. La cola se siembra en orden de código, así que el
/// orden resultante es determinista.
pub fn kahn(graph: &Graph) -> KahnOutcome {
    let mut indeg: BTreeMap<&str, usize> = graph.iter().map(|(c, n)| (c, n.in_degree)).collect();
    let mut queue: VecDeque<&str> = indeg
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(c, _)| *c)
        .collect();
    let mut order = Vec::with_capacity(graph.len());

    while let Some(cur) = queue.pop_front() {
        order.push(cur.to_string());
        let Some(node) = graph.get(cur) else { continue };
        for dep in &node.dependents {
            if let Some(d) = indeg.get_mut(dep.as_str()) {
                *d = d.saturating_sub(1);
                if *d == 0 {
                    queue.push_back(dep.as_str());
                }
            }
        }
    }

    let removed: BTreeSet<&str> = order.iter().map(String::as_str).collect();
    let stuck = graph
        .codes()
        .filter(|c| !removed.contains(c))
        .map(str::to_string)
        .collect();

    KahnOutcome { order, stuck }
}

/// Prerrequisitos de miembros de ciclo que también son miembros.
fn culprit_codes(graph: &Graph, stuck: &BTreeSet<String>) -> BTreeSet<String> {
    stuck
        .iter()
        .filter_map(|member| graph.get(member))
        .flat_map(|node| node.prerequisites.iter())
        .filter(|p| stuck.contains(p.as_str()))
        .cloned()
        .collect()
}

/// Resultado del resolvedor: grafo acíclico y exclusiones aplicadas
/// (colgantes + ciclos).
#[derive(Debug, Clone)]
pub struct Resolution {
    pub graph: Graph,
    pub exclusions: ExclusionSet,
    /// Pasadas de Kahn ejecutadas (1 si la malla ya era acíclica).
    pub iterations: usize,
}

impl Resolution {
    pub fn cycle_exclusions(&self) -> impl Iterator<Item = &Exclusion> {
        self.exclusions.cycles()
    }

    pub fn dangling_exclusions(&self) -> impl Iterator<Item = &Exclusion> {
        self.exclusions.dangling()
    }
}

/// Repara la malla hasta obtener un grafo acíclico o agotar
/// `max_iterations` pasadas, en cuyo caso devuelve
/// `GraphError::UnresolvableCycle`.
pub fn resolve_cycles(catalog: &CurriculumCatalog, max_iterations: usize) -> Result<Resolution, GraphError> {
    let GraphBuild { mut graph, dangling } = build_dependency_graph(catalog);
    let mut exclusions = dangling;
    let mut last_stuck: BTreeSet<String> = BTreeSet::new();

    for iteration in 1..=max_iterations {
        let outcome = kahn(&graph);
        if outcome.is_acyclic() {
            let n_cycle = exclusions.cycles().count();
            if n_cycle > 0 {
                log::info!(
                    "ciclos resueltos en {} pasadas: {} prerrequisitos excluidos por ciclo ({})",
                    iteration,
                    n_cycle,
                    exclusions.cycles().map(|e| e.code.as_str()).collect::<Vec<_>>().join(", ")
                );
            }
            debug_assert!(graph.is_acyclic());
            return Ok(Resolution { graph, exclusions, iterations: iteration });
        }

        let culprits = culprit_codes(&graph, &outcome.stuck);
        log::debug!(
            "pasada {}: {} nodos en ciclo, {} prerrequisitos culpables",
            iteration,
            outcome.stuck.len(),
            culprits.len()
        );
        if culprits.is_empty() {
            // Sin culpables no hay forma de achicar el ciclo.
            return Err(GraphError::UnresolvableCycle {
                iterations: iteration,
                members: outcome.stuck.into_iter().collect(),
            });
        }

        for code in culprits {
            let referenced_by: Vec<String> = graph
                .get(&code)
                .map(|n| n.dependents.clone())
                .unwrap_or_default();
            log::warn!(
                "prerrequisito {} excluido por ciclo (pasada {}), afectaba a {}",
                code,
                iteration,
                referenced_by.join(", ")
            );
            exclusions.insert(Exclusion {
                code,
                reason: ExclusionReason::Cycle { iteration },
                referenced_by,
            });
        }

        last_stuck = outcome.stuck;
        graph = build_graph(catalog, &exclusions);
    }

    log::error!(
        "resolvedor de ciclos agotó {} pasadas; {} nodos siguen en ciclo",
        max_iterations,
        last_stuck.len()
    );
    Err(GraphError::UnresolvableCycle {
        iterations: max_iterations,
        members: last_stuck.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;

    fn malla(courses: Vec<Course>) -> CurriculumCatalog {
        CurriculumCatalog::from_courses(courses)
    }

    #[test]
    fn kahn_orden_determinista() {
        let cat = malla(vec![
            Course::new("C", "c", 1, 1, &["A"]),
            Course::new("B", "b", 1, 1, &[]),
            Course::new("A", "a", 1, 1, &[]),
        ]);
        let g = build_dependency_graph(&cat).graph;
        let out = kahn(&g);
        assert_eq!(out.order, vec!["A", "B", "C"]);
        assert!(out.is_acyclic());
    }

    #[test]
    fn kahn_marca_dependientes_de_ciclo() {
        let cat = malla(vec![
            Course::new("A", "a", 1, 1, &["B"]),
            Course::new("B", "b", 1, 1, &["A"]),
            Course::new("D", "d", 1, 2, &["B"]),
            Course::new("E", "e", 1, 1, &[]),
        ]);
        let out = kahn(&build_dependency_graph(&cat).graph);
        assert_eq!(out.order, vec!["E"]);
        assert_eq!(out.stuck.len(), 3);
        // D no es culpable: solo A y B se listan entre sí
        let g = build_dependency_graph(&cat).graph;
        let culpables = culprit_codes(&g, &out.stuck);
        assert_eq!(culpables.into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn malla_aciclica_no_cambia() {
        let cat = malla(vec![
            Course::new("A", "a", 3, 1, &[]),
            Course::new("B", "b", 4, 2, &["A"]),
        ]);
        let res = resolve_cycles(&cat, DEFAULT_MAX_ITERATIONS).unwrap();
        assert!(res.exclusions.is_empty());
        assert_eq!(res.iterations, 1);
        assert_eq!(res.graph, build_dependency_graph(&cat).graph);
    }

    #[test]
    fn autoprerrequisito_se_excluye() {
        let cat = malla(vec![Course::new("A", "a", 3, 1, &["A"])]);
        let res = resolve_cycles(&cat, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(res.cycle_exclusions().count(), 1);
        assert_eq!(res.graph.get("A").unwrap().in_degree, 0);
    }

    #[test]
    fn cota_cero_es_fatal() {
        let cat = malla(vec![Course::new("A", "a", 3, 1, &[])]);
        assert!(matches!(
            resolve_cycles(&cat, 0),
            Err(GraphError::UnresolvableCycle { iterations: 0, .. })
        ));
    }
}
