use proyeccion::algorithm::{plan_semesters, resolve_cycles, Graph, SchedulingIssue, DEFAULT_MAX_ITERATIONS};
use proyeccion::models::{CompletionState, Course, CreditCaps, CurriculumCatalog};
use std::collections::BTreeMap;

/// Malla de juguete con forma de malla real: 5 niveles, cadenas de
/// prerrequisitos y un par de ramos sin prerrequisitos.
fn malla_ingenieria() -> CurriculumCatalog {
    CurriculumCatalog::from_courses(vec![
        Course::new("CAL1", "Cálculo I", 6, 1, &[]),
        Course::new("ALG", "Álgebra", 6, 1, &[]),
        Course::new("PROG", "Programación", 5, 1, &[]),
        Course::new("COM", "Comunicación", 3, 1, &[]),
        Course::new("CAL2", "Cálculo II", 6, 2, &["CAL1"]),
        Course::new("ALGL", "Álgebra Lineal", 6, 2, &["ALG"]),
        Course::new("ED", "Estructuras de Datos", 5, 2, &["PROG"]),
        Course::new("FIS1", "Física I", 6, 2, &["CAL1"]),
        Course::new("CAL3", "Cálculo III", 6, 3, &["CAL2", "ALGL"]),
        Course::new("EDO", "Ecuaciones Diferenciales", 5, 3, &["CAL2"]),
        Course::new("ALGO", "Algoritmos", 5, 3, &["ED", "ALG"]),
        Course::new("FIS2", "Física II", 6, 3, &["FIS1", "CAL2"]),
        Course::new("BD", "Bases de Datos", 5, 4, &["ALGO"]),
        Course::new("SO", "Sistemas Operativos", 5, 4, &["ALGO"]),
        Course::new("PROB", "Probabilidades", 5, 4, &["CAL3"]),
        Course::new("TIT", "Proyecto de Título", 10, 5, &["BD", "SO", "PROB"]),
    ])
}

fn grafo(cat: &CurriculumCatalog) -> Graph {
    resolve_cycles(cat, DEFAULT_MAX_ITERATIONS).unwrap().graph
}

#[test]
fn test_prerrequisitos_en_semestres_anteriores() {
    let cat = malla_ingenieria();
    let g = grafo(&cat);
    let st = CompletionState::new(["CAL1"], ["PROG"]);
    let out = plan_semesters(&g, &st, CreditCaps::new(18, 22).unwrap());

    let mut donde: BTreeMap<&str, u32> = BTreeMap::new();
    for s in &out.plan.semesters {
        for c in &s.course_codes {
            assert!(donde.insert(c.as_str(), s.index).is_none(), "{} planificado dos veces", c);
        }
    }
    for (code, sem) in &donde {
        for p in &g.get(code).unwrap().prerequisites {
            let ok = st.is_satisfied(p) || donde.get(p.as_str()).is_some_and(|ps| ps < sem);
            assert!(ok, "{} (sem {}) requiere {} antes", code, sem, p);
        }
    }
    assert!(out.is_complete());
}

#[test]
fn test_no_reprograma_aprobados_ni_inscritos() {
    let cat = malla_ingenieria();
    let st = CompletionState::new(["CAL1", "ALG", "CAL2"], ["PROG", "ED"]);
    let out = plan_semesters(&grafo(&cat), &st, CreditCaps::default());
    for code in out.plan.codes() {
        assert!(!st.is_satisfied(code), "{} ya estaba cumplido", code);
    }
    assert_eq!(out.plan.codes().count() + 5, cat.len());
}

#[test]
fn test_creditos_nunca_superan_sobrecupo() {
    let cat = malla_ingenieria();
    for (regular, overload) in [(10, 12), (15, 20), (30, 35)] {
        let caps = CreditCaps::new(regular, overload).unwrap();
        let out = plan_semesters(&grafo(&cat), &CompletionState::default(), caps);
        for s in &out.plan.semesters {
            let suma: u32 = s.course_codes.iter().map(|c| cat.get(c).unwrap().credits).sum();
            assert_eq!(suma, s.total_credits);
            assert!(s.total_credits <= overload);
            assert_eq!(s.total_credits > regular, out.overloaded_semesters.contains(&s.index));
        }
    }
}

#[test]
fn test_determinismo() {
    let cat = malla_ingenieria();
    let st = CompletionState::new(["ALG"], Vec::<String>::new());
    let a = plan_semesters(&grafo(&cat), &st, CreditCaps::default());
    let b = plan_semesters(&grafo(&cat), &st, CreditCaps::default());
    assert_eq!(a, b);
}

#[test]
fn test_primer_semestre_prioriza_nivel_y_creditos() {
    let out = plan_semesters(&grafo(&malla_ingenieria()), &CompletionState::default(), CreditCaps::new(14, 14).unwrap());
    // nivel 1 ordenado por créditos: COM(3), PROG(5), ALG(6), CAL1(6)
    assert_eq!(out.plan.semesters[0].course_codes, vec!["COM", "PROG", "ALG"]);
    assert_eq!(out.plan.semesters[0].total_credits, 14);
}

#[test]
fn test_atasco_deja_plan_parcial() {
    let cat = CurriculumCatalog::from_courses(vec![
        Course::new("A", "a", 5, 1, &[]),
        Course::new("B", "b", 5, 2, &["A"]),
        Course::new("PRACTICA", "Práctica", 40, 3, &["B"]),
        Course::new("TESIS", "Tesis", 5, 4, &["PRACTICA"]),
    ]);
    let out = plan_semesters(&grafo(&cat), &CompletionState::default(), CreditCaps::default());
    assert_eq!(out.plan.len(), 2);
    assert_eq!(out.remaining, vec!["PRACTICA", "TESIS"]);
    assert_eq!(out.issues, vec![SchedulingIssue::Stall { semester: 3, pending: vec!["PRACTICA".into()] }]);
}
