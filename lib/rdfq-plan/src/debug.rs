use crate::Schema;
use rdfq_model::{Row, VariablesTable};
use std::io::{self, Write};

/// The shared row-sequence printer spec §4.7 calls out by name
/// ("the framework provides `print_row_sequence` for debugging; all row
/// sources use the same printing"). Prints a header of variable names
/// followed by one line per row, each value rendered through
/// `Literal`'s `Display` impl or `-` for unbound.
pub fn print_row_sequence(
    out: &mut dyn Write,
    variables: &VariablesTable,
    schema: &Schema,
    rows: &[Row],
) -> io::Result<()> {
    let names: Vec<&str> = schema
        .variables()
        .iter()
        .map(|h| variables.variable(*h).name())
        .collect();
    writeln!(out, "{}", names.join("\t"))?;
    for row in rows {
        writeln!(out, "{row}")?;
    }
    Ok(())
}
