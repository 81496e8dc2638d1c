//! Writes the seven-sheet summary workbook.

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use tracing::debug;

use crate::error::AppResult;
use crate::filters::cents_to_units;
use crate::models::Transaction;
use crate::services::aggregates::{Aggregates, CounterpartyTotal};

/// Export every aggregate view to `path`, overwriting any prior version.
/// Sheet order is part of the output contract.
pub fn export_workbook(
    transactions: &[Transaction],
    aggregates: &Aggregates,
    path: &Path,
) -> AppResult<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    write_monthly_summary(&mut workbook, aggregates, &header)?;
    write_category_totals(&mut workbook, aggregates, &header)?;
    write_counterparties(
        &mut workbook,
        "Principais Destinatários",
        &aggregates.export_payees,
        &header,
    )?;
    write_counterparties(
        &mut workbook,
        "Fontes Pagadoras",
        &aggregates.export_payers,
        &header,
    )?;
    write_category_evolution(&mut workbook, aggregates, &header)?;
    write_top_transactions(&mut workbook, aggregates, &header)?;
    write_full_table(&mut workbook, transactions, &header)?;

    workbook.save(path)?;
    debug!(path = %path.display(), "summary workbook written");
    Ok(())
}

fn write_monthly_summary(
    workbook: &mut Workbook,
    aggregates: &Aggregates,
    header: &Format,
) -> AppResult<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Resumo Mensal")?;
    write_headers(
        sheet,
        &["Ano", "Mês", "Período", "Gasto", "Receita", "Saldo"],
        header,
    )?;

    for (i, row) in aggregates.monthly_summary.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write(r, 0, row.year)?;
        sheet.write(r, 1, row.month)?;
        sheet.write(r, 2, row.period.as_str())?;
        sheet.write(r, 3, cents_to_units(row.expense_cents))?;
        sheet.write(r, 4, cents_to_units(row.income_cents))?;
        sheet.write(r, 5, cents_to_units(row.balance_cents))?;
    }
    Ok(())
}

fn write_category_totals(
    workbook: &mut Workbook,
    aggregates: &Aggregates,
    header: &Format,
) -> AppResult<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Gastos por Categoria")?;
    write_headers(sheet, &["Categoria", "Valor"], header)?;

    for (i, total) in aggregates.by_category.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write(r, 0, total.category.as_str())?;
        sheet.write(r, 1, cents_to_units(total.total_cents))?;
    }
    Ok(())
}

fn write_counterparties(
    workbook: &mut Workbook,
    name: &str,
    totals: &[CounterpartyTotal],
    header: &Format,
) -> AppResult<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;
    write_headers(sheet, &["Destinatário/Pagador", "Valor"], header)?;

    for (i, total) in totals.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write(r, 0, total.name.as_str())?;
        sheet.write(r, 1, cents_to_units(total.total_cents))?;
    }
    Ok(())
}

fn write_category_evolution(
    workbook: &mut Workbook,
    aggregates: &Aggregates,
    header: &Format,
) -> AppResult<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Evolução Categorias")?;

    let matrix = &aggregates.export_category_matrix;
    sheet.write_with_format(0, 0, "Período", header)?;
    for (c, category) in matrix.categories.iter().enumerate() {
        sheet.write_with_format(0, (c + 1) as u16, category.as_str(), header)?;
    }

    for (i, period) in matrix.periods.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write(r, 0, period.as_str())?;
        for (c, cents) in matrix.values[i].iter().enumerate() {
            sheet.write(r, (c + 1) as u16, cents_to_units(*cents))?;
        }
    }
    Ok(())
}

fn write_top_transactions(
    workbook: &mut Workbook,
    aggregates: &Aggregates,
    header: &Format,
) -> AppResult<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Top Transações")?;
    write_headers(
        sheet,
        &[
            "Data",
            "Tipo",
            "Destinatário/Pagador",
            "Valor",
            "Categoria",
            "Mês/Ano",
        ],
        header,
    )?;

    for (i, t) in aggregates.top_transactions.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write(r, 0, t.date.format("%Y-%m-%d").to_string())?;
        sheet.write(r, 1, t.type_raw.as_str())?;
        sheet.write(r, 2, t.counterparty.as_str())?;
        sheet.write(r, 3, cents_to_units(t.value_cents))?;
        sheet.write(r, 4, t.category.as_str())?;
        sheet.write(r, 5, t.period_label.as_str())?;
    }
    Ok(())
}

/// The full normalized table, derived fields included.
fn write_full_table(
    workbook: &mut Workbook,
    transactions: &[Transaction],
    header: &Format,
) -> AppResult<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Dados Completos")?;
    write_headers(
        sheet,
        &[
            "Data",
            "Tipo",
            "Valor",
            "Destinatário/Pagador",
            "Origem",
            "Mês/Ano",
            "Tipo Movimentação",
            "Valor Absoluto",
            "Mês",
            "Ano",
            "Período",
            "Categoria",
        ],
        header,
    )?;

    for (i, t) in transactions.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write(r, 0, t.date.format("%Y-%m-%d").to_string())?;
        sheet.write(r, 1, t.type_raw.as_str())?;
        sheet.write(r, 2, cents_to_units(t.value_cents))?;
        sheet.write(r, 3, t.counterparty.as_str())?;
        sheet.write(r, 4, t.source_sheet.as_str())?;
        sheet.write(r, 5, t.period_label.as_str())?;
        sheet.write(r, 6, t.movement.label())?;
        sheet.write(r, 7, cents_to_units(t.abs_cents))?;
        sheet.write(r, 8, t.month)?;
        sheet.write(r, 9, t.year)?;
        sheet.write(r, 10, t.period.as_str())?;
        sheet.write(r, 11, t.category.as_str())?;
    }
    Ok(())
}

fn write_headers(sheet: &mut Worksheet, names: &[&str], format: &Format) -> AppResult<()> {
    for (c, name) in names.iter().enumerate() {
        sheet.write_with_format(0, c as u16, *name, format)?;
    }
    Ok(())
}
