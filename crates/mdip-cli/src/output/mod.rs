use serde::Serialize;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;
mod views;

pub use table::{Cell, Table};

/// A response that knows its own table layout.
///
/// JSON and raw output come straight from `Serialize`; only the table form
/// needs this.
pub trait Render: Serialize {
    fn to_table(&self) -> Table;
}

/// One line of a list view.
pub trait Row {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<Cell>;
}

impl<T: Row + Serialize> Render for Vec<T> {
    fn to_table(&self) -> Table {
        let mut table = Table::new(T::HEADERS);
        for item in self {
            table.push(item.cells());
        }
        table
    }
}

/// Render a response to a string in the requested format.
pub fn render<T: Render>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => {
            let prefs = ui::prefs();
            Ok(value.to_table().render(prefs.term_width, prefs.table_color))
        }
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a response in the requested format.
pub fn output<T: Render>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}
