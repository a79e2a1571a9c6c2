//! Text and JSON presentation of the dashboard
//!
//! Money is formatted the Brazilian way: `R$ 1.234,56`.

use num_format::{Locale, ToFormattedString};
use std::fmt::Write as _;

use crate::dashboard::DashboardState;
use crate::model::Category;
use crate::view_model::DashboardViewModel;

/// Output format for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Format an amount as BRL currency
pub fn format_brl(amount: f64) -> String {
    if !amount.is_finite() {
        return "R$ -".to_string();
    }

    let cents = (amount.abs() * 100.0).round() as i64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    format!(
        "{}R$ {},{:02}",
        sign,
        (cents / 100).to_formatted_string(&Locale::pt),
        cents % 100
    )
}

/// Render the whole dashboard as plain text
pub fn render_text(state: &DashboardState, top_categories: usize) -> String {
    let mut out = String::new();
    let vm = &state.view_model;

    let _ = writeln!(out, "{}", state.greeting());
    let _ = writeln!(out, "Aqui está o resumo das suas finanças");
    if let Some(error) = &state.error {
        let _ = writeln!(out, "(dados indisponíveis: {})", error);
    }
    let _ = writeln!(out);

    render_summary(&mut out, vm);
    let _ = writeln!(out);
    render_monthly(&mut out, vm);
    let _ = writeln!(out);
    render_categories(&mut out, vm, top_categories);

    out
}

fn render_summary(out: &mut String, vm: &DashboardViewModel) {
    let summary = &vm.summary;
    let _ = writeln!(out, "{:<12} {:>18}", "Receitas", format_brl(summary.income));
    let _ = writeln!(out, "{:<12} {:>18}", "Despesas", format_brl(summary.expenses));
    let _ = writeln!(out, "{:<12} {:>18}", "Saldo", format_brl(summary.balance));
    let _ = writeln!(out, "{:<12} {:>18}", "Transações", summary.count);
}

fn render_monthly(out: &mut String, vm: &DashboardViewModel) {
    let _ = writeln!(out, "Comparativo Mensal");
    let _ = writeln!(out, "{:<6} {:>18} {:>18}", "Mês", "Receitas", "Despesas");
    for bucket in &vm.monthly {
        let _ = writeln!(
            out,
            "{:<6} {:>18} {:>18}",
            bucket.month,
            format_brl(bucket.income),
            format_brl(bucket.expenses)
        );
    }
}

fn render_categories(out: &mut String, vm: &DashboardViewModel, top: usize) {
    let _ = writeln!(out, "Despesas por Categoria");
    if vm.categories.is_empty() {
        let _ = writeln!(out, "Nenhuma despesa registrada");
        return;
    }

    for item in vm.categories.iter().take(top) {
        let _ = writeln!(
            out,
            "{} {:<16} {:>18}",
            Category::icon_for(&item.category),
            Category::label_for(&item.category),
            format_brl(item.total)
        );
    }
}

/// Render the state as pretty JSON
pub fn render_json(state: &DashboardState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Transaction;
    use crate::view_model::ViewModelBuilder;
    use chrono::{TimeZone, Utc};

    fn state(transactions: &[Transaction]) -> DashboardState {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        DashboardState {
            view_model: ViewModelBuilder::default().build(transactions, now),
            user_name: "Ana".to_string(),
            loading: false,
            error: None,
            request_id: 1,
        }
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(40.0), "R$ 40,00");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(-60.5), "-R$ 60,50");
        assert_eq!(format_brl(-0.001), "R$ 0,00");
        assert_eq!(format_brl(f64::NAN), "R$ -");
    }

    #[test]
    fn test_render_text_sections() {
        let text = render_text(
            &state(&[
                Transaction::credit("1", 100.0, "2024-05-02"),
                Transaction::debit("2", 40.0, "2024-05-03").category("alimentacao"),
            ]),
            5,
        );

        assert!(text.starts_with("Olá, Ana!"));
        assert!(text.contains("R$ 100,00"));
        assert!(text.contains("R$ 60,00"));
        assert!(text.contains("Comparativo Mensal"));
        assert!(text.contains("mai."));
        assert!(text.contains("🍽️ Alimentação"));
    }

    #[test]
    fn test_render_text_limits_categories() {
        let transactions: Vec<_> = ["lazer", "saude", "compras"]
            .iter()
            .enumerate()
            .map(|(i, c)| Transaction::debit(i.to_string(), 10.0 * (i + 1) as f64, "").category(*c))
            .collect();

        let text = render_text(&state(&transactions), 2);
        assert!(text.contains("Compras"));
        assert!(text.contains("Saúde"));
        assert!(!text.contains("Lazer"));
    }

    #[test]
    fn test_render_text_empty() {
        let mut empty = state(&[]);
        empty.error = Some("Service unavailable".to_string());

        let text = render_text(&empty, 5);
        assert!(text.contains("dados indisponíveis"));
        assert!(text.contains("Nenhuma despesa registrada"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&state(&[Transaction::credit("1", 5.0, "2024-05-01")])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["view_model"]["summary"]["income"], 5.0);
        assert_eq!(value["view_model"]["monthly"].as_array().unwrap().len(), 6);
        assert_eq!(value["user_name"], "Ana");
    }
}
