//! Console summary of the written tables.

use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use skipbench_core::{AggregatedRow, COLUMNS, VariantTable};
use std::io::Write;

/// Render one table per (benchmark, variant) in write order.
pub fn render_summary<W: Write>(
    writer: &mut W,
    tables: &[VariantTable],
    color: bool,
) -> std::io::Result<()> {
    for table in tables {
        let title = format!(" {} / {} ", table.benchmark, table.variant);
        if color {
            writeln!(writer, "\x1b[1;33m{title:=^60}\x1b[0m")?;
        } else {
            writeln!(writer, "{title:=^60}")?;
        }
        writeln!(writer, "{}", build_table(&table.rows, color))?;
        writeln!(writer, "Written to {}", table.path.display())?;
        writeln!(writer)?;
    }
    Ok(())
}

fn build_table(rows: &[AggregatedRow], color: bool) -> Table {
    let arrangement = if color {
        ContentArrangement::Dynamic
    } else {
        ContentArrangement::Disabled
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(arrangement)
        .set_header(COLUMNS.iter().map(|c| {
            let cell = Cell::new(c);
            if color {
                cell.add_attribute(Attribute::Bold)
            } else {
                cell
            }
        }));

    let best = rows
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.throughput.total_cmp(&b.throughput))
        .map(|(i, _)| i);

    for (i, row) in rows.iter().enumerate() {
        let throughput = Cell::new(format_ops(row.throughput));
        let throughput = if color && best == Some(i) && rows.len() > 1 {
            throughput.fg(Color::Green)
        } else {
            throughput
        };

        let mut cells = vec![Cell::new(row.threads)];
        cells.extend(
            [
                row.successful_adds,
                row.failed_adds,
                row.successful_contains,
                row.failed_contains,
                row.successful_removes,
                row.failed_removes,
                row.total_operations,
            ]
            .into_iter()
            .map(|v| Cell::new(format_count(v))),
        );
        cells.push(Cell::new(format!("{:.3}s", row.elapsed_secs)));
        cells.push(throughput);

        table.add_row(
            cells
                .into_iter()
                .map(|c| c.set_alignment(CellAlignment::Right)),
        );
    }

    table
}

/// Averaged counter, one decimal.
fn format_count(value: f64) -> String {
    format!("{value:.1}")
}

/// Operations per second with a K/M suffix.
fn format_ops(ops_per_sec: f64) -> String {
    if ops_per_sec >= 1_000_000.0 {
        format!("{:.2} M/s", ops_per_sec / 1_000_000.0)
    } else if ops_per_sec >= 1_000.0 {
        format!("{:.2} K/s", ops_per_sec / 1_000.0)
    } else {
        format!("{ops_per_sec:.1} /s")
    }
}
