// Estructuras de datos principales

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ShapeError;
use crate::malla::normalize_code;

/// Ramo canónico de la malla: código normalizado y prerrequisitos como
/// conjunto de códigos normalizados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credits: u32,
    /// Semestre sugerido por la malla (>= 1)
    pub level: u32,
    pub prerequisite_codes: BTreeSet<String>,
}

impl Course {
    /// Constructor de conveniencia: normaliza el código y los prerrequisitos.
    pub fn new(code: &str, name: &str, credits: u32, level: u32, prereqs: &[&str]) -> Self {
        Course {
            code: normalize_code(code),
            name: name.trim().to_string(),
            credits,
            level,
            prerequisite_codes: prereqs
                .iter()
                .map(|p| normalize_code(p))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }
}

/// Malla curricular: código -> ramo. Inmutable durante una sesión de
/// planificación; el orden de iteración es el orden de los códigos.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CurriculumCatalog {
    courses: BTreeMap<String, Course>,
}

impl CurriculumCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construye la malla conservando la primera aparición de cada código.
    /// Para reportar colisiones usar `malla::normalize_catalog`.
    pub fn from_courses<I: IntoIterator<Item = Course>>(courses: I) -> Self {
        let mut catalog = Self::new();
        for c in courses {
            if let Err(dup) = catalog.insert(c) {
                log::warn!("código duplicado {} ignorado al construir la malla", dup.code);
            }
        }
        catalog
    }

    /// Inserta un ramo; si el código ya existe no sobrescribe y devuelve el
    /// ramo rechazado.
    pub fn insert(&mut self, course: Course) -> Result<(), Course> {
        if self.courses.contains_key(&course.code) {
            return Err(course);
        }
        self.courses.insert(course.code.clone(), course);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<&Course> {
        self.courses.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.courses.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.courses.keys().map(String::as_str)
    }

    pub fn total_credits(&self) -> u64 {
        self.courses.values().map(|c| u64::from(c.credits)).sum()
    }
}

/// Estado de un ramo en el avance curricular del estudiante.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionStatus {
    Approved,
    InProgress,
    Failed,
}

impl CompletionStatus {
    /// Prioridad usada al colapsar intentos repetidos de un mismo ramo.
    pub fn priority(self) -> u8 {
        match self {
            CompletionStatus::Approved => 3,
            CompletionStatus::InProgress => 2,
            CompletionStatus::Failed => 1,
        }
    }

    /// Acepta tanto las etiquetas del sistema de avance (APROBADO, INSCRITO,
    /// REPROBADO) como las canónicas.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "APROBADO" | "APPROVED" => Some(CompletionStatus::Approved),
            "INSCRITO" | "IN_PROGRESS" => Some(CompletionStatus::InProgress),
            "REPROBADO" | "FAILED" => Some(CompletionStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub code: String,
    pub status: CompletionStatus,
    #[serde(default)]
    pub term: Option<String>,
}

/// Conjuntos derivados del avance: aprobados e inscritos (disjuntos).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionState {
    approved: BTreeSet<String>,
    in_progress: BTreeSet<String>,
}

impl CompletionState {
    /// Si un código aparece en ambos conjuntos prevalece el aprobado.
    pub fn new<A, I>(approved: A, in_progress: I) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let approved: BTreeSet<String> = approved
            .into_iter()
            .map(|c| normalize_code(c.as_ref()))
            .collect();
        let in_progress = in_progress
            .into_iter()
            .map(|c| normalize_code(c.as_ref()))
            .filter(|c| !approved.contains(c))
            .collect();
        CompletionState { approved, in_progress }
    }

    /// Espera registros ya colapsados (uno por código); los reprobados no
    /// aportan a ningún conjunto.
    pub fn from_records<'a, I: IntoIterator<Item = &'a CompletionRecord>>(records: I) -> Self {
        let mut approved = Vec::new();
        let mut in_progress = Vec::new();
        for r in records {
            match r.status {
                CompletionStatus::Approved => approved.push(r.code.as_str()),
                CompletionStatus::InProgress => in_progress.push(r.code.as_str()),
                CompletionStatus::Failed => {}
            }
        }
        Self::new(approved, in_progress)
    }

    pub fn approved(&self) -> &BTreeSet<String> {
        &self.approved
    }

    pub fn in_progress(&self) -> &BTreeSet<String> {
        &self.in_progress
    }

    pub fn is_approved(&self, code: &str) -> bool {
        self.approved.contains(code)
    }

    pub fn is_in_progress(&self, code: &str) -> bool {
        self.in_progress.contains(code)
    }

    /// Aprobado o inscrito: cuenta como cumplido para los dependientes desde
    /// el primer semestre proyectado.
    pub fn is_satisfied(&self, code: &str) -> bool {
        self.is_approved(code) || self.is_in_progress(code)
    }

    pub fn satisfied(&self) -> impl Iterator<Item = &str> {
        self.approved
            .iter()
            .chain(self.in_progress.iter())
            .map(String::as_str)
    }
}

/// Tope regular y tope con sobrecupo de créditos por semestre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCaps {
    #[serde(rename = "regularCap")]
    pub regular: u32,
    #[serde(rename = "overloadCap")]
    pub overload: u32,
}

impl CreditCaps {
    pub const DEFAULT_REGULAR: u32 = 30;
    pub const DEFAULT_OVERLOAD: u32 = 35;

    pub fn new(regular: u32, overload: u32) -> Result<Self, ShapeError> {
        if regular == 0 || overload < regular {
            return Err(ShapeError::InvalidCaps { regular, overload });
        }
        Ok(CreditCaps { regular, overload })
    }
}

impl Default for CreditCaps {
    fn default() -> Self {
        CreditCaps {
            regular: Self::DEFAULT_REGULAR,
            overload: Self::DEFAULT_OVERLOAD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    #[serde(rename = "semesterIndex")]
    pub index: u32,
    pub course_codes: Vec<String>,
    #[serde(default)]
    pub total_credits: u32,
}

/// Proyección: lista ordenada de semestres.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    pub semesters: Vec<Semester>,
}

impl Plan {
    pub fn new(semesters: Vec<Semester>) -> Self {
        Plan { semesters }
    }

    pub fn len(&self) -> usize {
        self.semesters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty()
    }

    /// Semestre donde aparece `code` por primera vez.
    pub fn semester_of(&self, code: &str) -> Option<u32> {
        self.semesters
            .iter()
            .filter(|s| s.course_codes.iter().any(|c| c == code))
            .map(|s| s.index)
            .min()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.semesters
            .iter()
            .flat_map(|s| s.course_codes.iter().map(String::as_str))
    }

    /// Copia con los códigos normalizados igual que los de la malla.
    pub fn normalized(&self) -> Plan {
        Plan::new(
            self.semesters
                .iter()
                .map(|s| Semester {
                    index: s.index,
                    course_codes: s.course_codes.iter().map(|c| normalize_code(c)).collect(),
                    total_credits: s.total_credits,
                })
                .collect(),
        )
    }

    /// Verifica la forma: índices >= 1 y sin repetir.
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        let mut seen = BTreeSet::new();
        for s in &self.semesters {
            if s.index == 0 {
                return Err(ShapeError::InvalidSemesterIndex(s.index));
            }
            if !seen.insert(s.index) {
                return Err(ShapeError::RepeatedSemester(s.index));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_no_sobrescribe_duplicados() {
        let mut cat = CurriculumCatalog::new();
        assert!(cat.insert(Course::new("a1", "Primero", 3, 1, &[])).is_ok());
        let rechazado = cat.insert(Course::new(" A1 ", "Segundo", 5, 2, &[]));
        assert_eq!(rechazado.unwrap_err().name, "Segundo");
        assert_eq!(cat.get("A1").unwrap().name, "Primero");
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn creditos_totales_de_la_malla() {
        let cat = CurriculumCatalog::from_courses(vec![
            Course::new("A", "a", 6, 1, &[]),
            Course::new("B", "b", u32::MAX, 1, &[]),
        ]);
        assert_eq!(cat.total_credits(), u64::from(u32::MAX) + 6);
        assert_eq!(CurriculumCatalog::new().total_credits(), 0);
    }

    #[test]
    fn plan_normalizado() {
        let plan = Plan::new(vec![Semester { index: 1, course_codes: vec![" dccb-00107 ".into()], total_credits: 6 }]);
        let n = plan.normalized();
        assert_eq!(n.semesters[0].course_codes, vec!["DCCB-00107"]);
        assert_eq!(n.semesters[0].total_credits, 6);
    }

    #[test]
    fn completion_state_es_disjunto() {
        let st = CompletionState::new(["x1", "Y2"], ["y2", "z3"]);
        assert!(st.is_approved("Y2"));
        assert!(!st.is_in_progress("Y2"));
        assert!(st.is_in_progress("Z3"));
        assert!(st.is_satisfied("X1"));
    }

    #[test]
    fn status_desde_etiquetas_del_avance() {
        assert_eq!(CompletionStatus::from_label(" aprobado "), Some(CompletionStatus::Approved));
        assert_eq!(CompletionStatus::from_label("INSCRITO"), Some(CompletionStatus::InProgress));
        assert_eq!(CompletionStatus::from_label("reprobado"), Some(CompletionStatus::Failed));
        assert_eq!(CompletionStatus::from_label("PENDIENTE"), None);
        assert!(CompletionStatus::Approved.priority() > CompletionStatus::InProgress.priority());
    }

    #[test]
    fn caps_invalidos() {
        assert!(CreditCaps::new(0, 10).is_err());
        assert!(CreditCaps::new(30, 20).is_err());
        assert_eq!(CreditCaps::new(30, 30).unwrap().overload, 30);
        assert_eq!(CreditCaps::default(), CreditCaps::new(30, 35).unwrap());
    }

    #[test]
    fn plan_forma_y_json() {
        let json = r#"[{"semesterIndex": 2, "courseCodes": ["B"]}, {"semesterIndex": 1, "courseCodes": ["A"], "totalCredits": 3}]"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.semesters[0].total_credits, 0);
        assert_eq!(plan.semester_of("A"), Some(1));
        assert!(plan.check_shape().is_ok());

        let repetido = Plan::new(vec![
            Semester { index: 1, course_codes: vec![], total_credits: 0 },
            Semester { index: 1, course_codes: vec![], total_credits: 0 },
        ]);
        assert_eq!(repetido.check_shape(), Err(ShapeError::RepeatedSemester(1)));

        let cero = Plan::new(vec![Semester { index: 0, course_codes: vec![], total_credits: 0 }]);
        assert_eq!(cero.check_shape(), Err(ShapeError::InvalidSemesterIndex(0)));
    }
}
