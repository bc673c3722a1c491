use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use navstate_cli::script::StepReport;
use navstate_core::BackTarget;
use navstate_model::{PersistedBlob, RoutePath};

pub fn print_replay(reports: &[StepReport], session: Option<&std::path::Path>) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Step"),
        header_cell("Detail"),
        header_cell("Location"),
        header_cell("Depth"),
        header_cell("Back"),
    ]);
    apply_replay_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for report in reports {
        table.add_row(vec![
            dim_cell(report.index),
            step_cell(report.step),
            text_or_dash(&report.detail),
            Cell::new(&report.location),
            Cell::new(report.depth),
            Cell::new(&report.back),
        ]);
    }
    println!("{table}");
    match session {
        Some(path) => println!("Session: {}", path.display()),
        None => println!("Session: in-memory (not persisted)"),
    }
}

pub fn print_resolution(current: &RoutePath, target: &BackTarget, history: &[RoutePath]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Current"),
        header_cell("Back target"),
        header_cell("Decided by"),
    ]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new(current),
        Cell::new(target.path())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Cell::new(target.source_label()),
    ]);
    println!("{table}");
    if !history.is_empty() {
        let joined: Vec<&str> = history.iter().map(RoutePath::as_str).collect();
        println!("History: {}", joined.join(" -> "));
    }
}

pub fn print_blob(blob: &PersistedBlob, source_id: Option<&str>) {
    println!(
        "Navigation source: {}",
        blob.navigation_source.as_deref().unwrap_or("-")
    );
    println!("Source entity id: {}", source_id.unwrap_or("-"));

    let mut history = Table::new();
    history.set_header(vec![header_cell("#"), header_cell("History")]);
    apply_table_style(&mut history);
    align_column(&mut history, 0, CellAlignment::Right);
    let last = blob.navigation_history.len().saturating_sub(1);
    for (index, path) in blob.navigation_history.iter().enumerate() {
        let cell = if index == last {
            Cell::new(path).add_attribute(Attribute::Bold)
        } else {
            Cell::new(path)
        };
        history.add_row(vec![dim_cell(index), cell]);
    }
    println!("{history}");

    if blob.page_states.is_empty() {
        println!("Page states: none");
        return;
    }
    let mut states = Table::new();
    states.set_header(vec![header_cell("Page"), header_cell("Snapshot")]);
    apply_table_style(&mut states);
    for (page_id, snapshot) in &blob.page_states {
        states.add_row(vec![
            Cell::new(page_id).fg(Color::Blue),
            Cell::new(snapshot.to_string()),
        ]);
    }
    println!("{states}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_replay_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn step_cell(step: &str) -> Cell {
    let color = match step {
        "back" => Color::Yellow,
        "navbar" => Color::Magenta,
        "mount" | "unmount" | "write" | "list-nav" => Color::Blue,
        _ => Color::Reset,
    };
    Cell::new(step).fg(color).add_attribute(Attribute::Bold)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn text_or_dash(value: &str) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
