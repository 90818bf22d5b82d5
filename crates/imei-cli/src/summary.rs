use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use imei_export::DateFormatter;
use imei_model::{Estado, Record};
use imei_view::InventoryState;

/// Filtered view as a table, followed by totals.
pub fn render_inventory(state: &InventoryState, dates: &DateFormatter) -> String {
    let visible = state.visible();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("IMEI"),
        header_cell("ESTADO"),
        header_cell("FECHA DE INGRESO"),
        header_cell("FECHA DE ACTUALIZACIÓN"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for record in &visible {
        table.add_row(record_row(record, dates));
    }

    let filter = state.filter();
    let mut lines = vec![table.to_string()];
    lines.push(format!(
        "Mostrando {} de {} | Vendidos: {} | Filtro: {}",
        visible.len(),
        state.records().len(),
        state.sold_count(),
        filter.state.label(),
    ));
    if !filter.search_term().is_empty() {
        lines.push(format!("Búsqueda: *{}", filter.search_term()));
    }
    lines.join("\n")
}

pub fn print_inventory(state: &InventoryState, dates: &DateFormatter) {
    println!("{}", render_inventory(state, dates));
}

pub fn print_notice(state: &InventoryState) {
    if let Some(notice) = state.notice() {
        println!("{notice}");
    }
}

pub fn print_export(path: &Path, records: usize) {
    println!("Exportado: {} ({} registros)", path.display(), records);
}

fn record_row(record: &Record, dates: &DateFormatter) -> Vec<Cell> {
    vec![
        dim_cell(record.id.as_str()),
        Cell::new(&record.imei),
        estado_cell(record.estado),
        Cell::new(dates.format(&record.created_at)),
        Cell::new(dates.format(&record.updated_at)),
    ]
}

fn estado_cell(estado: Estado) -> Cell {
    match estado {
        Estado::Free => Cell::new(estado.label()).fg(Color::Green),
        Estado::Sold => Cell::new(estado.label())
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
