use credit_risk_core::explain::{Direction, Explanation, ExplanationEntry};
use credit_risk_core::present::{RiskPresentation, GAUGE_REFERENCE_PERCENT};
use credit_risk_core::session::Assessment;
use std::fmt::Write;

const GAUGE_WIDTH: usize = 50;
const BAR_WIDTH: usize = 30;

pub fn status_line(healthy: bool, base_url: &str) -> String {
    if healthy {
        format!("API status: connected ({base_url})")
    } else {
        format!("API status: not connected ({base_url})")
    }
}

pub fn report(assessment: &Assessment) -> String {
    let mut out = String::new();
    out.push_str(&gauge(&assessment.risk));
    out.push('\n');
    out.push_str(&badge(&assessment.risk));
    out.push('\n');
    out.push_str(&chart(&assessment.explanation));
    out.push('\n');
    out.push_str(&table(&assessment.explanation.table));
    out.push('\n');
    out.push_str(LEGEND);
    out
}

const LEGEND: &str = "\
How to interpret SHAP values:
  + positive values increase default probability
  - negative values decrease default probability
  larger absolute values have a bigger impact
";

pub fn gauge(risk: &RiskPresentation) -> String {
    let filled = ((risk.percent / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    let filled = filled.min(GAUGE_WIDTH);
    let delta = risk.delta_from_reference();
    format!(
        "Default probability: {:.1}% ({:+.1} vs {:.0}%)\n[{}{}] {}\n",
        risk.percent,
        delta,
        GAUGE_REFERENCE_PERCENT,
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH - filled),
        risk.band.color(),
    )
}

pub fn badge(risk: &RiskPresentation) -> String {
    format!(
        "Risk level: {} ({})\nRecommendation: {}\n",
        risk.risk_level,
        risk.bucket.label(),
        risk.recommendation
    )
}

/// Horizontal bars, largest magnitude on top.
pub fn chart(explanation: &Explanation) -> String {
    let entries = &explanation.chart;
    let mut out = String::from("Top feature impacts (positive increases default risk)\n");
    if entries.is_empty() {
        out.push_str("  (no feature attributions returned)\n");
        return out;
    }

    let max = explanation.max_abs_impact();
    let name_width = name_width(entries);
    for entry in entries.iter().rev() {
        let len = if max > 0.0 {
            ((entry.abs_impact / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let mark = match entry.direction() {
            Direction::IncreasesRisk => "+",
            Direction::DecreasesRisk => "-",
            Direction::Neutral => "",
        };
        let _ = writeln!(
            out,
            "  {:<name_width$}  {:>+9.4}  {}",
            entry.feature,
            entry.impact,
            mark.repeat(len)
        );
    }
    out
}

pub fn table(entries: &[ExplanationEntry]) -> String {
    let mut out = String::from("Detailed feature analysis\n");
    if entries.is_empty() {
        out.push_str("  (no feature attributions returned)\n");
        return out;
    }

    let name_width = name_width(entries).max("Feature".len());
    let _ = writeln!(
        out,
        "  {:<name_width$}  {:>9}  {:>15}",
        "Feature", "Impact", "Absolute impact"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "  {:<name_width$}  {:>+9.4}  {:>15.4}",
            entry.feature, entry.impact, entry.abs_impact
        );
    }
    out
}

fn name_width(entries: &[ExplanationEntry]) -> usize {
    entries.iter().map(|e| e.feature.len()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_risk_core::domain::application::LoanApplicationInput;
    use credit_risk_core::domain::scoring::{RiskLevel, ScoringResult};
    use uuid::Uuid;

    fn assessment() -> Assessment {
        let result = ScoringResult {
            default_probability: 0.82,
            risk_level: RiskLevel::High,
            shap_values: [("dti", 0.3), ("fico_avg", -0.5), ("pub_rec", 0.0)]
                .into_iter()
                .collect(),
        };
        Assessment::new(
            Uuid::nil(),
            LoanApplicationInput::default().build().unwrap(),
            result,
        )
    }

    #[test]
    fn status_line_is_binary() {
        assert_eq!(
            status_line(true, "http://127.0.0.1:8000"),
            "API status: connected (http://127.0.0.1:8000)"
        );
        assert!(status_line(false, "http://x").contains("not connected"));
    }

    #[test]
    fn gauge_and_badge_show_probability_and_recommendation() {
        let a = assessment();
        let gauge = gauge(&a.risk);
        assert!(gauge.starts_with("Default probability: 82.0% (+32.0 vs 50%)"), "{gauge}");
        assert!(gauge.contains(&format!("[{}{}] red", "#".repeat(41), "-".repeat(9))));

        let badge = badge(&a.risk);
        assert!(badge.contains("Risk level: HIGH (elevated)"));
        assert!(badge.contains("Consider declining or requesting additional collateral"));
    }

    #[test]
    fn chart_puts_largest_magnitude_first_with_sign_marks() {
        let a = assessment();
        let chart = chart(&a.explanation);
        let lines: Vec<&str> = chart.lines().skip(1).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  fico_avg"), "{chart}");
        assert!(lines[0].ends_with(&"-".repeat(BAR_WIDTH)));
        assert!(lines[1].starts_with("  dti"));
        assert!(lines[1].ends_with(&"+".repeat(18)));
        assert!(lines[2].starts_with("  pub_rec"));
    }

    #[test]
    fn table_lists_largest_first() {
        let a = assessment();
        let table = table(&a.explanation.table);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[1].contains("Absolute impact"));
        assert!(lines[2].contains("fico_avg") && lines[2].contains("-0.5000"));
        assert!(lines[3].contains("dti") && lines[3].contains("+0.3000"));
    }

    #[test]
    fn empty_explanation_is_rendered_explicitly() {
        let empty = Explanation {
            chart: Vec::new(),
            table: Vec::new(),
        };
        assert!(chart(&empty).contains("no feature attributions"));
        assert!(table(&[]).contains("no feature attributions"));
        assert!(report(&assessment()).ends_with(LEGEND));
    }
}
