use crate::core::DayResult;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Success,
    Error,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Success => style(text).green(),
        StyleType::Error => style(text).for_stderr().red(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<f64>` rate into a `Cell`. `None` is displayed as "N/A".
pub fn rate_cell(value: Option<f64>) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format!("{v:.4}")).set_alignment(CellAlignment::Right),
    )
}

/// Renders fetched days as a table, one row per currency.
pub fn rates_table(results: &[DayResult]) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Date"),
        header_cell("Currency"),
        header_cell("Purchase"),
        header_cell("Sale"),
    ]);

    for day in results {
        if day.rates.is_empty() {
            table.add_row(vec![
                Cell::new(day.date.to_string()),
                Cell::new("-").fg(Color::DarkGrey),
                rate_cell(None),
                rate_cell(None),
            ]);
            continue;
        }
        for (code, rate) in &day.rates {
            table.add_row(vec![
                Cell::new(day.date.to_string()),
                Cell::new(code.as_str()),
                rate_cell(rate.purchase_rate),
                rate_cell(rate.sale_rate),
            ]);
        }
    }

    format!(
        "{}\n\n{}",
        style_text("Exchange rates (UAH)", StyleType::Title),
        table
    )
}
