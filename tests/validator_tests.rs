use proyeccion::algorithm::{
    build_dependency_graph, resolve_cycles, validate_projection, ErrorKind, WarningKind,
    DEFAULT_MAX_ITERATIONS,
};
use proyeccion::models::{CompletionState, Course, CreditCaps, CurriculumCatalog, Plan, Semester};

fn sem(index: u32, codes: &[&str]) -> Semester {
    Semester {
        index,
        course_codes: codes.iter().map(|c| c.to_string()).collect(),
        total_credits: 0,
    }
}

fn malla() -> CurriculumCatalog {
    CurriculumCatalog::from_courses(vec![
        Course::new("A", "Álgebra", 6, 1, &[]),
        Course::new("B", "Cálculo", 6, 2, &["A"]),
        Course::new("C", "Física", 6, 3, &["B", "INEXISTENTE"]),
    ])
}

#[test]
fn test_prerrequisito_en_semestre_posterior() {
    let g = build_dependency_graph(&malla()).graph;
    let plan = Plan::new(vec![sem(1, &["B"]), sem(2, &["A"])]);
    let r = validate_projection(&g, &CompletionState::default(), CreditCaps::default(), &plan);
    assert!(r.has_error(ErrorKind::PrerrequisitosNoCumplidos));
    assert_eq!(r.errors[0].semester_index, Some(1));
    assert_eq!(r.errors[0].code.as_deref(), Some("B"));
}

#[test]
fn test_prerrequisito_ausente_del_plan() {
    let g = build_dependency_graph(&malla()).graph;
    let plan = Plan::new(vec![sem(1, &["C"])]);
    let r = validate_projection(&g, &CompletionState::default(), CreditCaps::default(), &plan);
    // la colgante no se exige
    assert_eq!(r.errors[0].missing_codes, Some(vec!["B".to_string()]));
}

#[test]
fn test_inscritos_cuentan_como_cumplidos() {
    let g = build_dependency_graph(&malla()).graph;
    let st = CompletionState::new(["A"], ["B"]);
    let plan = Plan::new(vec![sem(1, &["C"])]);
    let r = validate_projection(&g, &st, CreditCaps::default(), &plan);
    assert!(r.valid);
}

#[test]
fn test_prerrequisito_excluido_por_ciclo_no_se_exige() {
    let cat = CurriculumCatalog::from_courses(vec![
        Course::new("X", "x", 3, 1, &["Y"]),
        Course::new("Y", "y", 3, 1, &["X"]),
    ]);
    let g = resolve_cycles(&cat, DEFAULT_MAX_ITERATIONS).unwrap().graph;
    let plan = Plan::new(vec![sem(1, &["X", "Y"])]);
    let r = validate_projection(&g, &CompletionState::default(), CreditCaps::default(), &plan);
    assert!(r.valid);
}

#[test]
fn test_advertencias_no_bloquean() {
    let g = build_dependency_graph(&malla()).graph;
    let st = CompletionState::new(["A"], Vec::<String>::new());
    let plan = Plan::new(vec![sem(1, &["A", "B"])]);
    let r = validate_projection(&g, &st, CreditCaps::new(10, 12).unwrap(), &plan);
    assert!(r.valid);
    assert!(r.has_warning(WarningKind::YaAprobada));
    assert!(r.has_warning(WarningKind::ExcedeCreditosRegular));
    assert_eq!(r.summary.warning_count, 2);
    assert_eq!(r.summary.error_count, 0);
}

#[test]
fn test_duplicada_en_el_mismo_semestre() {
    let g = build_dependency_graph(&malla()).graph;
    let plan = Plan::new(vec![sem(1, &["A", "A"])]);
    let r = validate_projection(&g, &CompletionState::default(), CreditCaps::default(), &plan);
    assert!(r.has_error(ErrorKind::AsignaturaDuplicada));
    assert_eq!(r.summary.error_count, 1);
}

#[test]
fn test_resultado_en_json() {
    let g = build_dependency_graph(&malla()).graph;
    let plan = Plan::new(vec![sem(1, &["B"])]);
    let r = validate_projection(&g, &CompletionState::default(), CreditCaps::default(), &plan);
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["valid"], false);
    assert_eq!(v["errors"][0]["missingCodes"], serde_json::json!(["A"]));
    assert_eq!(v["errors"][0]["name"], "Cálculo");
    assert_eq!(v["summary"]["regularCap"], 30);
    assert_eq!(v["summary"]["overloadCap"], 35);
    assert_eq!(v["warnings"], serde_json::json!([]));
}
