//! Configuración del servicio, leída del entorno (con `.env` opcional).
//!
//! | variable                    | campo                  | default          |
//! |-----------------------------|------------------------|------------------|
//! | `GA_CREDITOS_REGULAR`       | `caps.regular`         | 30               |
//! | `GA_CREDITOS_MAXIMO`        | `caps.overload`        | 35               |
//! | `GA_MAX_ITERACIONES_CICLOS` | `max_cycle_iterations` | 100              |
//! | `GA_BIND`                   | `bind_addr`            | `127.0.0.1:8080` |
//! | `GA_SIN_PRERREQUISITO`      | `no_prereq_sentinel`   | `-`              |
//! | `GA_MAX_TRABAJOS`           | `max_concurrent_jobs`  | nº de CPUs       |

use std::env;
use std::str::FromStr;

use crate::algorithm::DEFAULT_MAX_ITERATIONS;
use crate::error::ConfigError;
use crate::malla::DEFAULT_SENTINEL;
use crate::models::CreditCaps;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub caps: CreditCaps,
    pub max_cycle_iterations: usize,
    pub bind_addr: String,
    pub no_prereq_sentinel: String,
    pub max_concurrent_jobs: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            caps: CreditCaps::default(),
            max_cycle_iterations: DEFAULT_MAX_ITERATIONS,
            bind_addr: DEFAULT_BIND.to_string(),
            no_prereq_sentinel: DEFAULT_SENTINEL.to_string(),
            max_concurrent_jobs: std::cmp::max(1, num_cpus::get()),
        }
    }
}

fn parse_var<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) if !value.trim().is_empty() => match value.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(e) => Err(ConfigError::InvalidVar {
                var,
                reason: e.to_string(),
                value,
            }),
        },
        _ => Ok(default),
    }
}

impl PlannerConfig {
    /// Carga `.env` si existe y lee las variables `GA_*` del proceso.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            log::debug!("variables cargadas desde {}", path.display());
        }
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let def = Self::default();

        let regular = parse_var("GA_CREDITOS_REGULAR", lookup("GA_CREDITOS_REGULAR"), def.caps.regular)?;
        let overload = parse_var("GA_CREDITOS_MAXIMO", lookup("GA_CREDITOS_MAXIMO"), def.caps.overload)?;
        let caps = CreditCaps::new(regular, overload)?;

        let max_cycle_iterations = parse_var(
            "GA_MAX_ITERACIONES_CICLOS",
            lookup("GA_MAX_ITERACIONES_CICLOS"),
            def.max_cycle_iterations,
        )?;

        let max_concurrent_jobs = parse_var("GA_MAX_TRABAJOS", lookup("GA_MAX_TRABAJOS"), def.max_concurrent_jobs)?;
        if max_concurrent_jobs == 0 {
            return Err(ConfigError::InvalidVar {
                var: "GA_MAX_TRABAJOS",
                value: "0".to_string(),
                reason: "debe ser al menos 1".to_string(),
            });
        }

        let bind_addr = lookup("GA_BIND")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(def.bind_addr);

        // el centinela se respeta tal cual, salvo vacío
        let no_prereq_sentinel = lookup("GA_SIN_PRERREQUISITO")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(def.no_prereq_sentinel);

        Ok(PlannerConfig {
            caps,
            max_cycle_iterations,
            bind_addr,
            no_prereq_sentinel,
            max_concurrent_jobs,
        })
    }
}
