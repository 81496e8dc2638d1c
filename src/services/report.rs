//! Renders the interactive HTML dashboard.
//!
//! The figure is assembled as plain Plotly JSON (traces + layout) and
//! inlined into the page template next to a CDN reference to the Plotly
//! runtime, so the generated file is self-contained apart from that one
//! script tag.

use askama::Template;
use serde_json::{json, Value};
use std::path::Path;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::filters::{cents_to_units, format_brl};
use crate::models::Transaction;
use crate::services::aggregates::Aggregates;

#[derive(Template)]
#[template(path = "pages/report.html")]
struct ReportTemplate {
    period_range: String,
    months_count: usize,
    income_display: String,
    income_count: usize,
    expense_display: String,
    expense_count: usize,
    balance_display: String,
    balance_positive: bool,
    top_payee: String,
    top_payee_display: String,
    top_payer: String,
    top_payer_display: String,
    top_category: String,
    top_category_display: String,
    figure_json: String,
}

/// Build the dashboard and write it to `path`, overwriting any prior
/// version.
pub fn render_dashboard(
    transactions: &[Transaction],
    aggregates: &Aggregates,
    path: &Path,
) -> AppResult<()> {
    let figure = build_figure(aggregates);

    let first = transactions.iter().map(|t| t.date).min();
    let last = transactions.iter().map(|t| t.date).max();
    let period_range = match (first, last) {
        (Some(a), Some(b)) => format!("{} a {}", a.format("%d/%m/%Y"), b.format("%d/%m/%Y")),
        _ => String::new(),
    };

    let top_payee = &aggregates.top_payees[0];
    let top_payer = &aggregates.top_payers[0];
    let top_category = &aggregates.by_category[0];

    let template = ReportTemplate {
        period_range,
        months_count: aggregates.monthly_flow.len(),
        income_display: format_brl(aggregates.totals.income_cents),
        income_count: aggregates.totals.income_count,
        expense_display: format_brl(aggregates.totals.expense_cents),
        expense_count: aggregates.totals.expense_count,
        balance_display: format_brl(aggregates.totals.balance_cents),
        balance_positive: aggregates.totals.balance_cents >= 0,
        top_payee: top_payee.name.clone(),
        top_payee_display: format_brl(top_payee.total_cents),
        top_payer: top_payer.name.clone(),
        top_payer_display: format_brl(top_payer.total_cents),
        top_category: top_category.category.clone(),
        top_category_display: format_brl(top_category.total_cents),
        figure_json: figure.to_string(),
    };

    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("Template error: {}", e)))?;

    std::fs::write(path, html).map_err(|source| AppError::OutputWrite {
        artifact: "dashboard",
        source,
    })?;

    debug!(path = %path.display(), "dashboard written");
    Ok(())
}

/// The six-panel figure: monthly flow, category donut, top payees, top
/// payers, and the monthly evolution of the leading expense categories
/// spanning the bottom row.
fn build_figure(aggregates: &Aggregates) -> Value {
    let periods: Vec<&str> = aggregates
        .monthly_flow
        .iter()
        .map(|m| m.period.as_str())
        .collect();
    let expenses: Vec<f64> = aggregates
        .monthly_flow
        .iter()
        .map(|m| cents_to_units(m.expense_cents))
        .collect();
    let incomes: Vec<f64> = aggregates
        .monthly_flow
        .iter()
        .map(|m| cents_to_units(m.income_cents))
        .collect();

    let mut traces = vec![
        json!({
            "type": "scatter",
            "mode": "lines+markers",
            "name": "Gastos",
            "x": periods,
            "y": expenses,
            "line": {"color": "red"},
            "xaxis": "x",
            "yaxis": "y",
        }),
        json!({
            "type": "scatter",
            "mode": "lines+markers",
            "name": "Receitas",
            "x": periods,
            "y": incomes,
            "line": {"color": "green"},
            "xaxis": "x",
            "yaxis": "y",
        }),
        json!({
            "type": "pie",
            "name": "Categorias",
            "hole": 0.4,
            "labels": aggregates.by_category.iter().map(|c| c.category.as_str()).collect::<Vec<_>>(),
            "values": aggregates.by_category.iter().map(|c| cents_to_units(c.total_cents)).collect::<Vec<_>>(),
            "domain": {"x": [0.55, 1.0], "y": [0.74, 1.0]},
        }),
        json!({
            "type": "bar",
            "orientation": "h",
            "name": "Destinatários",
            "marker": {"color": "coral"},
            "x": aggregates.top_payees.iter().map(|p| cents_to_units(p.total_cents)).collect::<Vec<_>>(),
            "y": aggregates.top_payees.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            "xaxis": "x2",
            "yaxis": "y2",
        }),
        json!({
            "type": "bar",
            "orientation": "h",
            "name": "Fontes Pagadoras",
            "marker": {"color": "lightgreen"},
            "x": aggregates.top_payers.iter().map(|p| cents_to_units(p.total_cents)).collect::<Vec<_>>(),
            "y": aggregates.top_payers.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            "xaxis": "x3",
            "yaxis": "y3",
        }),
    ];

    let matrix = &aggregates.chart_category_matrix;
    for (col, category) in matrix.categories.iter().enumerate() {
        let values: Vec<f64> = matrix
            .values
            .iter()
            .map(|row| cents_to_units(row[col]))
            .collect();
        traces.push(json!({
            "type": "scatter",
            "mode": "lines+markers",
            "name": category,
            "x": matrix.periods,
            "y": values,
            "xaxis": "x4",
            "yaxis": "y4",
        }));
    }

    json!({
        "data": traces,
        "layout": {
            "height": 1400,
            "title": {"text": "Dashboard Financeiro - Análise Completa dos Extratos"},
            "showlegend": true,
            "plot_bgcolor": "#ffffff",
            "paper_bgcolor": "#ffffff",
            "xaxis": {"domain": [0.0, 0.45], "anchor": "y"},
            "yaxis": {"domain": [0.74, 1.0], "anchor": "x"},
            "xaxis2": {"domain": [0.0, 0.45], "anchor": "y2"},
            "yaxis2": {"domain": [0.37, 0.63], "anchor": "x2", "automargin": true},
            "xaxis3": {"domain": [0.55, 1.0], "anchor": "y3"},
            "yaxis3": {"domain": [0.37, 0.63], "anchor": "x3", "automargin": true},
            "xaxis4": {"domain": [0.0, 1.0], "anchor": "y4"},
            "yaxis4": {"domain": [0.0, 0.26], "anchor": "x4"},
            "annotations": [
                subplot_title("Evolução Mensal - Gastos vs Receitas", 0.225, 1.0),
                subplot_title("Distribuição de Gastos por Categoria", 0.775, 1.0),
                subplot_title("Principais Destinatários de Gastos", 0.225, 0.66),
                subplot_title("Principais Fontes de Receitas", 0.775, 0.66),
                subplot_title("Evolução Mensal das Principais Categorias de Gastos", 0.5, 0.29),
            ],
        },
    })
}

fn subplot_title(text: &str, x: f64, y: f64) -> Value {
    json!({
        "text": text,
        "x": x,
        "y": y,
        "xref": "paper",
        "yref": "paper",
        "xanchor": "center",
        "yanchor": "bottom",
        "showarrow": false,
        "font": {"size": 14},
    })
}
