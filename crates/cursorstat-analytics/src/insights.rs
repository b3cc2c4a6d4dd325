//! Narrative texts of the report
//!
//! Three rule-based products: comparative insights, KPI captions and
//! strategic recommendations. All of them are deterministic functions of
//! the computed metrics. Texts may carry inline HTML (`<strong>`); any
//! data-derived fragment embedded in them is sanitized first.

use crate::cohort::CohortAnalysis;
use crate::metrics::PeriodMetrics;
use crate::rankings::Rankings;
use cursorstat_core::format::format_number;
use cursorstat_core::sanitize::sanitize_html;

/// Threshold test of a caption tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// value > x
    Above(f64),
    /// value <= x
    AtMost(f64),
    /// value == x
    Equals(f64),
}

impl Bound {
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Bound::Above(x) => value > x,
            Bound::AtMost(x) => value <= x,
            Bound::Equals(x) => value == x,
        }
    }
}

/// One caption and the bound that selects it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub bound: Bound,
    pub text: &'static str,
}

/// Ordered tiers for one KPI placeholder; the first match wins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionTable {
    pub key: &'static str,
    pub tiers: &'static [Tier],
    pub fallback: &'static str,
}

impl CaptionTable {
    pub fn caption(&self, value: f64) -> &'static str {
        self.tiers
            .iter()
            .find(|tier| tier.bound.matches(value))
            .map_or(self.fallback, |tier| tier.text)
    }
}

const fn above(x: f64, text: &'static str) -> Tier {
    Tier {
        bound: Bound::Above(x),
        text,
    }
}

const fn at_most(x: f64, text: &'static str) -> Tier {
    Tier {
        bound: Bound::AtMost(x),
        text,
    }
}

const fn equals(x: f64, text: &'static str) -> Tier {
    Tier {
        bound: Bound::Equals(x),
        text,
    }
}

pub const LINES_CAPTIONS: CaptionTable = CaptionTable {
    key: "LINEAS_TEXTO",
    tiers: &[
        above(100_000.0, "Productividad excepcional - superando las 100K líneas"),
        above(50_000.0, "Alta productividad - más de 50K líneas generadas"),
        above(10_000.0, "Productividad sólida - más de 10K líneas"),
    ],
    fallback: "Fase inicial de adopción",
};

pub const ACCEPTANCE_CAPTIONS: CaptionTable = CaptionTable {
    key: "TASA_TEXTO",
    tiers: &[
        above(70.0, "Excelente calidad - alta precisión de sugerencias"),
        above(50.0, "Buena calidad - sugerencias relevantes"),
        above(30.0, "Calidad aceptable - margen de mejora"),
    ],
    fallback: "Requiere optimización de prompts y configuración",
};

pub const TABS_CAPTIONS: CaptionTable = CaptionTable {
    key: "TABS_TEXTO",
    tiers: &[
        above(5_000.0, "Uso intensivo del autocompletado inteligente"),
        above(1_000.0, "Buen aprovechamiento del autocompletado"),
        above(100.0, "Uso moderado del autocompletado"),
    ],
    fallback: "Oportunidad de aumentar uso de autocompletado",
};

pub const TAB_EFFICIENCY_CAPTIONS: CaptionTable = CaptionTable {
    key: "EFICIENCIA_TEXTO",
    tiers: &[
        above(30.0, "Autocompletado muy efectivo"),
        above(20.0, "Autocompletado efectivo"),
        above(10.0, "Autocompletado moderadamente efectivo"),
    ],
    fallback: "Autocompletado requiere ajustes",
};

pub const REQUESTS_CAPTIONS: CaptionTable = CaptionTable {
    key: "PETICIONES_TEXTO",
    tiers: &[
        above(20_000.0, "Interacción muy activa con IA"),
        above(10_000.0, "Interacción activa con modelos de IA"),
        above(5_000.0, "Interacción moderada con IA"),
    ],
    fallback: "Potencial para mayor interacción",
};

pub const AVERAGE_CAPTIONS: CaptionTable = CaptionTable {
    key: "PROMEDIO_TEXTO",
    tiers: &[
        above(2_000.0, "Productividad individual excepcional"),
        above(1_000.0, "Buena productividad individual"),
        above(500.0, "Productividad individual moderada"),
    ],
    fallback: "Oportunidad de mejora individual",
};

pub const ADOPTION_CAPTIONS: CaptionTable = CaptionTable {
    key: "USUARIOS_TEXTO",
    tiers: &[
        above(90.0, "Adopción casi universal - excelente"),
        above(80.0, "Alta adopción - muy buena cobertura"),
        above(60.0, "Adopción aceptable - margen de crecimiento"),
    ],
    fallback: "Adopción inicial - gran potencial",
};

pub const INACTIVE_CAPTIONS: CaptionTable = CaptionTable {
    key: "INACTIVOS_TEXTO",
    tiers: &[
        equals(0.0, "¡Adopción completa! Todos los usuarios activos"),
        at_most(5.0, "Muy pocos usuarios sin actividad"),
        at_most(15.0, "Grupo pequeño requiere atención"),
    ],
    fallback: "Oportunidad significativa de activación",
};

pub const RETAINED_CAPTIONS: CaptionTable = CaptionTable {
    key: "CONSISTENTES_TEXTO",
    tiers: &[
        above(90.0, "Base sólida de usuarios fieles"),
        above(75.0, "Buena base de usuarios regulares"),
    ],
    fallback: "Oportunidad de fidelización",
};

pub const NEW_USERS_CAPTIONS: CaptionTable = CaptionTable {
    key: "NUEVOS_TEXTO",
    tiers: &[
        above(10.0, "Excelente crecimiento orgánico"),
        above(5.0, "Buen crecimiento de usuarios"),
        above(0.0, "Crecimiento moderado pero positivo"),
    ],
    fallback: "Sin nuevos usuarios en este período",
};

pub const REACTIVATED_CAPTIONS: CaptionTable = CaptionTable {
    key: "REACTIVADOS_TEXTO",
    tiers: &[
        above(10.0, "Excelente recuperación de usuarios"),
        above(5.0, "Buena reactivación de usuarios"),
        above(0.0, "Algunos usuarios han vuelto"),
    ],
    fallback: "Sin reactivaciones en este período",
};

pub const CHURNED_CAPTIONS: CaptionTable = CaptionTable {
    key: "PERDIDOS_TEXTO",
    tiers: &[
        equals(0.0, "¡Retención perfecta! Sin pérdidas"),
        at_most(3.0, "Pérdida mínima de usuarios"),
        at_most(10.0, "Pérdida controlada de usuarios"),
    ],
    fallback: "Atención: pérdida significativa",
};

pub const RETENTION_CAPTIONS: CaptionTable = CaptionTable {
    key: "RETENCION_TEXTO",
    tiers: &[
        above(95.0, "Retención excepcional"),
        above(85.0, "Muy buena retención"),
        above(70.0, "Retención aceptable"),
    ],
    fallback: "Requiere plan de retención",
};

/// Values the KPI captions are selected from
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KpiInputs {
    pub accepted_lines: f64,
    pub acceptance_rate: f64,
    pub tabs_accepted: f64,
    pub tab_acceptance_rate: f64,
    pub total_requests: f64,
    pub avg_lines_per_user: f64,
    pub adoption_rate: f64,
    pub inactive_users: f64,
    pub new_users: f64,
    pub reactivated_users: f64,
    pub churned_users: f64,
    pub retention_rate: f64,
}

impl KpiInputs {
    pub fn new(
        current: &PeriodMetrics,
        cohorts: &CohortAnalysis,
        adoption_rate: f64,
        inactive_users: usize,
    ) -> Self {
        Self {
            accepted_lines: current.accepted_lines as f64,
            acceptance_rate: current.acceptance_rate,
            tabs_accepted: current.tabs_accepted as f64,
            tab_acceptance_rate: current.tab_acceptance_rate,
            total_requests: current.total_requests as f64,
            avg_lines_per_user: current.avg_lines_per_user,
            adoption_rate,
            inactive_users: inactive_users as f64,
            new_users: cohorts.new_users.len() as f64,
            reactivated_users: cohorts.reactivated.len() as f64,
            churned_users: cohorts.churned.len() as f64,
            retention_rate: cohorts.retention_rate,
        }
    }
}

/// Caption per KPI placeholder, in a fixed order
pub fn kpi_captions(inputs: &KpiInputs) -> Vec<(&'static str, &'static str)> {
    [
        (LINES_CAPTIONS, inputs.accepted_lines),
        (ACCEPTANCE_CAPTIONS, inputs.acceptance_rate),
        (TABS_CAPTIONS, inputs.tabs_accepted),
        (TAB_EFFICIENCY_CAPTIONS, inputs.tab_acceptance_rate),
        (REQUESTS_CAPTIONS, inputs.total_requests),
        (AVERAGE_CAPTIONS, inputs.avg_lines_per_user),
        (ADOPTION_CAPTIONS, inputs.adoption_rate),
        (INACTIVE_CAPTIONS, inputs.inactive_users),
        (RETAINED_CAPTIONS, inputs.retention_rate),
        (NEW_USERS_CAPTIONS, inputs.new_users),
        (REACTIVATED_CAPTIONS, inputs.reactivated_users),
        (CHURNED_CAPTIONS, inputs.churned_users),
        (RETENTION_CAPTIONS, inputs.retention_rate),
    ]
    .into_iter()
    .map(|(table, value)| (table.key, table.caption(value)))
    .collect()
}

pub const BASELINE_INSIGHT: &str =
    "📊 <strong>Análisis Base:</strong> Dataset inicial para establecer métricas de referencia.";

/// Period-over-period observations, most important first
///
/// A non-comparative run yields only [`BASELINE_INSIGHT`].
pub fn comparative_insights(
    current: &PeriodMetrics,
    previous: &PeriodMetrics,
    cohorts: &CohortAnalysis,
    comparison_valid: bool,
) -> Vec<String> {
    if !comparison_valid {
        return vec![BASELINE_INSIGHT.to_string()];
    }

    let mut insights = Vec::new();

    if previous.accepted_lines > 0 {
        let growth = (current.accepted_lines as f64 - previous.accepted_lines as f64)
            / previous.accepted_lines as f64
            * 100.0;
        let pct = format_number(growth);
        insights.push(if growth > 20.0 {
            format!(
                "🚀 <strong>Crecimiento Acelerado:</strong> Productividad aumentó {pct}%. \
                 Excelente momento para escalar la adopción."
            )
        } else if growth > 5.0 {
            format!(
                "📈 <strong>Crecimiento Sostenido:</strong> Mejora del {pct}% indica adopción exitosa."
            )
        } else if growth < -10.0 {
            format!(
                "⚠️ <strong>Alerta de Descenso:</strong> Caída del {}%. Revisar posibles causas.",
                format_number(growth.abs())
            )
        } else {
            format!("📊 <strong>Estabilidad:</strong> Variación del {pct}% indica uso consistente.")
        });
    }

    let retention = format_number(cohorts.retention_rate);
    insights.push(if cohorts.retention_rate > 90.0 {
        format!("💎 <strong>Retención Excelente:</strong> {retention}% de usuarios mantienen actividad.")
    } else if cohorts.retention_rate < 70.0 {
        format!(
            "🔄 <strong>Oportunidad de Retención:</strong> Solo {retention}% mantienen actividad. \
             Plan de re-engagement necesario."
        )
    } else {
        format!("👥 <strong>Retención Aceptable:</strong> {retention}% de retención con margen de mejora.")
    });

    if !cohorts.new_users.is_empty() {
        insights.push(format!(
            "🌟 <strong>Expansión Activa:</strong> {} nuevos usuarios adoptaron la herramienta.",
            cohorts.new_users.len()
        ));
    }

    if !cohorts.reactivated.is_empty() {
        insights.push(format!(
            "🔄 <strong>Reactivación Exitosa:</strong> {} usuarios volvieron a usar la herramienta.",
            cohorts.reactivated.len()
        ));
    }

    if current.acceptance_rate > previous.acceptance_rate + 5.0 {
        insights.push(format!(
            "⚡ <strong>Mejora en Calidad:</strong> Tasa de aceptación subió a {}%.",
            format_number(current.acceptance_rate)
        ));
    } else if current.acceptance_rate < previous.acceptance_rate - 5.0 {
        insights.push(format!(
            "🔍 <strong>Revisar Calidad:</strong> Tasa de aceptación bajó a {}%.",
            format_number(current.acceptance_rate)
        ));
    }

    if current.avg_lines_per_user > 1000.0 {
        insights.push(format!(
            "💰 <strong>Alto ROI:</strong> Promedio de {} líneas por usuario justifica inversión.",
            format_number(current.avg_lines_per_user)
        ));
    }

    insights
}

/// Share below which the leading client version signals fragmentation
pub const VERSION_FRAGMENTATION_SHARE: f64 = 50.0;

const FIXED_RECOMMENDATIONS: [&str; 5] = [
    "<strong>🚀 Expansión Inmediata:</strong> Aumentar cobertura al 100% en equipos de desarrollo. \
     La alta tasa de adopción actual justifica plenamente la inversión adicional en licencias.",
    "<strong>🎓 Centro de Excelencia IA:</strong> Crear programa de formación interno liderado por \
     los 'Campeones de Productividad' identificados.",
    "<strong>📊 Dashboard Ejecutivo:</strong> Implementar métricas en tiempo real de productividad \
     para seguimiento continuo.",
    "<strong>🤝 Red de Embajadores:</strong> Formalizar red de 'AI Champions' que promuevan mejores \
     prácticas entre equipos.",
    "<strong>🔄 Optimización Continua:</strong> Revisiones trimestrales para evaluar nuevos modelos \
     y optimizar costes.",
];

/// Strategic recommendations, version fragmentation first when present
pub fn recommendations(rankings: &Rankings, inactive_users: usize) -> Vec<String> {
    let mut items = Vec::with_capacity(FIXED_RECOMMENDATIONS.len() + 2);

    let leading = rankings
        .leading_version()
        .zip(rankings.leading_version_share());
    if let Some((leading, share)) = leading
        && share < VERSION_FRAGMENTATION_SHARE
    {
        items.push(format!(
            "<strong>🔄 Actualización de Versiones:</strong> Estandarizar en la versión {} para \
             optimizar compatibilidad y soporte. Actualmente hay fragmentación de versiones.",
            sanitize_html(&leading.value)
        ));
    }

    items.extend(FIXED_RECOMMENDATIONS.iter().map(|s| s.to_string()));
    items.push(format!(
        "<strong>👥 Atención Personalizada:</strong> Plan específico para los {inactive_users} \
         usuarios inactivos con formación y soporte dedicado."
    ));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{percentage, round1};
    use crate::rankings::ValueCount;
    use cursorstat_core::UserEmail;

    fn metrics(accepted: u64, rate: f64, avg: f64) -> PeriodMetrics {
        PeriodMetrics {
            accepted_lines: accepted,
            acceptance_rate: rate,
            avg_lines_per_user: avg,
            ..Default::default()
        }
    }

    fn cohorts(retention: f64, new: usize, reactivated: usize) -> CohortAnalysis {
        let users = |prefix: &str, n: usize| {
            (0..n)
                .map(|i| UserEmail::new(format!("{prefix}{i}@x.io")))
                .collect()
        };
        CohortAnalysis {
            new_users: users("n", new),
            reactivated: users("r", reactivated),
            retention_rate: retention,
            ..Default::default()
        }
    }

    #[test]
    fn test_caption_boundaries_are_exclusive() {
        assert_eq!(LINES_CAPTIONS.caption(100_001.0), LINES_CAPTIONS.tiers[0].text);
        assert_eq!(LINES_CAPTIONS.caption(100_000.0), LINES_CAPTIONS.tiers[1].text);
        assert_eq!(LINES_CAPTIONS.caption(10_000.0), "Fase inicial de adopción");
        assert_eq!(ACCEPTANCE_CAPTIONS.caption(70.0), "Buena calidad - sugerencias relevantes");
    }

    #[test]
    fn test_count_captions_use_at_most() {
        assert_eq!(
            INACTIVE_CAPTIONS.caption(0.0),
            "¡Adopción completa! Todos los usuarios activos"
        );
        assert_eq!(INACTIVE_CAPTIONS.caption(5.0), "Muy pocos usuarios sin actividad");
        assert_eq!(INACTIVE_CAPTIONS.caption(15.0), "Grupo pequeño requiere atención");
        assert_eq!(INACTIVE_CAPTIONS.caption(16.0), "Oportunidad significativa de activación");
        assert_eq!(CHURNED_CAPTIONS.caption(3.0), "Pérdida mínima de usuarios");
        assert_eq!(CHURNED_CAPTIONS.caption(11.0), "Atención: pérdida significativa");
    }

    #[test]
    fn test_kpi_captions_cover_every_key() {
        let captions = kpi_captions(&KpiInputs::default());
        let keys: Vec<&str> = captions.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                "LINEAS_TEXTO",
                "TASA_TEXTO",
                "TABS_TEXTO",
                "EFICIENCIA_TEXTO",
                "PETICIONES_TEXTO",
                "PROMEDIO_TEXTO",
                "USUARIOS_TEXTO",
                "INACTIVOS_TEXTO",
                "CONSISTENTES_TEXTO",
                "NUEVOS_TEXTO",
                "REACTIVADOS_TEXTO",
                "PERDIDOS_TEXTO",
                "RETENCION_TEXTO",
            ]
        );
        assert_eq!(captions[9].1, "Sin nuevos usuarios en este período");
    }

    #[test]
    fn test_baseline_only_when_not_comparative() {
        let insights = comparative_insights(
            &metrics(5000, 90.0, 5000.0),
            &metrics(100, 10.0, 10.0),
            &cohorts(100.0, 3, 2),
            false,
        );
        assert_eq!(insights, vec![BASELINE_INSIGHT.to_string()]);
    }

    #[test]
    fn test_growth_tiers() {
        let c = cohorts(80.0, 0, 0);
        let first = |cur: u64| {
            comparative_insights(&metrics(cur, 0.0, 0.0), &metrics(100, 0.0, 0.0), &c, true)
                .remove(0)
        };
        assert!(first(150).contains("Crecimiento Acelerado"));
        assert!(first(150).contains("50%"));
        assert!(first(110).contains("Crecimiento Sostenido"));
        assert!(first(80).contains("Alerta de Descenso"));
        assert!(first(80).contains("Caída del 20%"));
        assert!(first(95).contains("Estabilidad"));
    }

    #[test]
    fn test_growth_skipped_without_previous_lines() {
        let insights = comparative_insights(
            &metrics(100, 0.0, 0.0),
            &metrics(0, 0.0, 0.0),
            &cohorts(95.0, 0, 0),
            true,
        );
        assert_eq!(insights.len(), 1);
        assert!(insights[0].contains("Retención Excelente"));
    }

    #[test]
    fn test_full_insight_sequence() {
        let insights = comparative_insights(
            &metrics(3000, 60.0, 1500.0),
            &metrics(1000, 40.0, 500.0),
            &cohorts(60.0, 2, 1),
            true,
        );
        assert_eq!(insights.len(), 6);
        assert!(insights[1].contains("Oportunidad de Retención"));
        assert!(insights[2].contains("2 nuevos usuarios"));
        assert!(insights[3].contains("1 usuarios volvieron"));
        assert!(insights[4].contains("subió a 60%"));
        assert!(insights[5].contains("1.500 líneas"));
    }

    #[test]
    fn test_quality_drop() {
        let insights = comparative_insights(
            &metrics(100, 30.0, 0.0),
            &metrics(100, 40.0, 0.0),
            &cohorts(75.0, 0, 0),
            true,
        );
        assert!(insights.iter().any(|i| i.contains("bajó a 30%")));
        assert!(insights.iter().any(|i| i.contains("Retención Aceptable")));
    }

    #[test]
    fn test_recommendations_with_fragmentation() {
        let rankings = Rankings {
            client_versions: vec![
                ValueCount {
                    value: "<1.2>".to_string(),
                    count: 4,
                    share: 40.0,
                },
                ValueCount {
                    value: "1.1".to_string(),
                    count: 6,
                    share: 60.0,
                },
            ],
            ..Default::default()
        };
        let items = recommendations(&rankings, 7);
        assert_eq!(items.len(), 7);
        assert!(items[0].contains("versión &lt;1.2&gt;"));
        assert!(items[6].contains("los 7 usuarios inactivos"));
    }

    fn versions(counts: &[(&str, usize)]) -> Rankings {
        let listed: usize = counts.iter().map(|(_, count)| count).sum();
        Rankings {
            client_versions: counts
                .iter()
                .map(|(value, count)| ValueCount {
                    value: value.to_string(),
                    count: *count,
                    share: round1(percentage(*count as f64, listed as f64)),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fragmentation_uses_unrounded_share() {
        let rankings = versions(&[("1.0", 4996), ("0.9", 4995), ("0.8", 9)]);
        assert_eq!(rankings.client_versions[0].share, 50.0);

        let items = recommendations(&rankings, 0);
        assert!(items[0].contains("Actualización de Versiones"));
        assert!(items[0].contains("versión 1.0"));
    }

    #[test]
    fn test_no_fragmentation_at_exactly_half() {
        let items = recommendations(&versions(&[("1.0", 5), ("0.9", 5)]), 0);
        assert_eq!(items.len(), 6);
        assert!(items[0].contains("Expansión Inmediata"));
    }

    #[test]
    fn test_recommendations_without_versions() {
        let items = recommendations(&Rankings::default(), 0);
        assert_eq!(items.len(), 6);
        assert!(items[0].contains("Expansión Inmediata"));
    }
}
