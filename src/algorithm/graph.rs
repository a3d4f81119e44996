//! Grafo de prerrequisitos de la malla.
//!
//! Una arista `p -> c` significa "p es prerrequisito de c". Los códigos
//! excluidos (colgantes o culpables de ciclos) se ignoran como prerrequisito
//! en toda la malla; cada exclusión guarda su motivo para auditoría.

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

use crate::models::{Course, CurriculumCatalog};

/// Motivo por el que un código dejó de contar como prerrequisito.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum ExclusionReason {
    /// El código no existe en la malla.
    Dangling,
    /// El código participaba en un ciclo; `iteration` es la pasada del
    /// resolvedor que lo excluyó.
    Cycle { iteration: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exclusion {
    pub code: String,
    #[serde(flatten)]
    pub reason: ExclusionReason,
    /// Ramos que listaban este código como prerrequisito.
    pub referenced_by: Vec<String>,
}

/// Conjunto de exclusiones indexado por código. Se serializa como lista.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    entries: BTreeMap<String, Exclusion>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Si el código ya estaba excluido se mantiene el motivo original.
    pub fn insert(&mut self, exclusion: Exclusion) -> bool {
        if self.entries.contains_key(&exclusion.code) {
            return false;
        }
        self.entries.insert(exclusion.code.clone(), exclusion);
        true
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn get(&self, code: &str) -> Option<&Exclusion> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exclusion> {
        self.entries.values()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn dangling(&self) -> impl Iterator<Item = &Exclusion> {
        self.iter().filter(|e| e.reason == ExclusionReason::Dangling)
    }

    pub fn cycles(&self) -> impl Iterator<Item = &Exclusion> {
        self.iter()
            .filter(|e| matches!(e.reason, ExclusionReason::Cycle { .. }))
    }
}

impl Serialize for ExclusionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub course: Course,
    /// Prerrequisitos efectivos: existen en la malla y no están excluidos.
    pub prerequisites: Vec<String>,
    pub in_degree: usize,
    /// Ramos que tienen a este como prerrequisito efectivo.
    pub dependents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: BTreeMap<String, GraphNode>,
}

impl Graph {
    pub fn get(&self, code: &str) -> Option<&GraphNode> {
        self.nodes.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.nodes.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GraphNode)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.in_degree).sum()
    }

    /// Exporta a petgraph (pesos = códigos) junto al índice código -> nodo.
    pub fn to_digraph(&self) -> (DiGraph<String, ()>, HashMap<String, NodeIndex>) {
        let mut g: DiGraph<String, ()> = DiGraph::with_capacity(self.len(), self.edge_count());
        let mut index: HashMap<String, NodeIndex> = HashMap::new();
        for code in self.nodes.keys() {
            index.insert(code.clone(), g.add_node(code.clone()));
        }
        for (code, node) in &self.nodes {
            for dep in &node.dependents {
                if let (Some(&from), Some(&to)) = (index.get(code), index.get(dep)) {
                    g.add_edge(from, to, ());
                }
            }
        }
        (g, index)
    }

    /// Verificación independiente de aciclicidad vía petgraph.
    pub fn is_acyclic(&self) -> bool {
        let (g, _) = self.to_digraph();
        !petgraph::algo::is_cyclic_directed(&g)
    }
}

/// Salida del constructor: el grafo y las referencias colgantes detectadas.
#[derive(Debug, Clone)]
pub struct GraphBuild {
    pub graph: Graph,
    pub dangling: ExclusionSet,
}

/// Prerrequisitos que apuntan a ramos ausentes de la malla.
pub fn find_dangling(catalog: &CurriculumCatalog) -> ExclusionSet {
    let mut referenced: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for course in catalog.iter() {
        for p in &course.prerequisite_codes {
            if !catalog.contains(p) {
                referenced.entry(p.as_str()).or_default().push(course.code.clone());
            }
        }
    }

    let mut out = ExclusionSet::new();
    for (code, referenced_by) in referenced {
        log::warn!(
            "prerrequisito {} no existe en la malla (referido por {}); se excluye",
            code,
            referenced_by.join(", ")
        );
        out.insert(Exclusion {
            code: code.to_string(),
            reason: ExclusionReason::Dangling,
            referenced_by,
        });
    }
    out
}

/// Construye el grafo aplicando `exclusions`. Un prerrequisito ausente de la
/// malla nunca suma grado de entrada aunque no figure en `exclusions`.
pub fn build_graph(catalog: &CurriculumCatalog, exclusions: &ExclusionSet) -> Graph {
    let mut nodes: BTreeMap<String, GraphNode> = catalog
        .iter()
        .map(|c| {
            (
                c.code.clone(),
                GraphNode {
                    course: c.clone(),
                    prerequisites: Vec::new(),
                    in_degree: 0,
                    dependents: Vec::new(),
                },
            )
        })
        .collect();

    for course in catalog.iter() {
        for p in &course.prerequisite_codes {
            if exclusions.contains(p) || !catalog.contains(p) {
                continue;
            }
            if let Some(prereq_node) = nodes.get_mut(p) {
                prereq_node.dependents.push(course.code.clone());
            }
            if let Some(node) = nodes.get_mut(&course.code) {
                node.prerequisites.push(p.clone());
                node.in_degree += 1;
            }
        }
    }

    Graph { nodes }
}

/// Grafo sin más exclusiones que las colgantes.
pub fn build_dependency_graph(catalog: &CurriculumCatalog) -> GraphBuild {
    let dangling = find_dangling(catalog);
    let graph = build_graph(catalog, &dangling);
    GraphBuild { graph, dangling }
}
