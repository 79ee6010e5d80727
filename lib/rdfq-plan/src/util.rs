use crate::Schema;
use rdfq_model::{Literal, Row, VariableHandle, VariablesTable};
use std::cell::RefCell;

/// The union of two schemas, outer columns first, then any inner column not
/// already in the outer schema (spec §4.7, "`Join`... Output schema is
/// union of outer and inner schemas").
pub fn union_schema(outer: &Schema, inner: &Schema) -> Schema {
    let mut variables = outer.variables().to_vec();
    for handle in inner.variables() {
        if !variables.contains(handle) {
            variables.push(*handle);
        }
    }
    Schema::new(variables)
}

/// Re-positions `row` (laid out per `from`) into `to`'s column order,
/// leaving any column `to` has that `from` doesn't as unbound.
pub fn reposition(row: &Row, from: &Schema, to: &Schema) -> Row {
    let mut out = Row::with_width(to.width());
    for (i, handle) in to.variables().iter().enumerate() {
        if let Some(pos) = from.position(*handle) {
            out.set(i, row.get(pos).cloned());
        }
    }
    out
}

/// Whether two rows agree on every variable shared between `left_schema`
/// and `right_schema` (spec §4.7, "a binding is compatible iff every shared
/// variable has the same value in both rows"). Unbound vs. unbound counts
/// as agreeing (neither side constrains that variable); unbound vs. bound
/// is also compatible (the shared variable just isn't bound by the side
/// that hasn't matched it yet) — incompatibility only arises when both
/// sides bind the variable to different RDF terms.
pub fn rows_compatible(
    left: &Row,
    left_schema: &Schema,
    right: &Row,
    right_schema: &Schema,
) -> bool {
    for (i, handle) in left_schema.variables().iter().enumerate() {
        if let Some(j) = right_schema.position(*handle) {
            if let (Some(a), Some(b)) = (left.get(i), right.get(j)) {
                if !a.same_term(b) {
                    return false;
                }
            }
        }
    }
    true
}

/// Merges two compatible rows into `out_schema`'s column order. Panics only
/// if called on incompatible rows — callers must check
/// [`rows_compatible`] first.
pub fn merge_rows(
    left: &Row,
    left_schema: &Schema,
    right: &Row,
    right_schema: &Schema,
    out_schema: &Schema,
) -> Row {
    let mut out = Row::with_width(out_schema.width());
    for (i, handle) in out_schema.variables().iter().enumerate() {
        let value = left_schema
            .position(*handle)
            .and_then(|p| left.get(p).cloned())
            .or_else(|| right_schema.position(*handle).and_then(|p| right.get(p).cloned()));
        out.set(i, value);
    }
    out
}

/// Writes `row`'s bindings into `vars`' current-value slots for the
/// duration of an expression evaluation, returning the previous values so
/// the caller can restore them afterwards (spec §5, "Shared resources" —
/// row sources write into a variable's current value before evaluating
/// expressions, then restore).
pub fn bind_row(
    vars: &RefCell<VariablesTable>,
    schema: &Schema,
    row: &Row,
) -> Vec<(VariableHandle, Option<Literal>)> {
    let mut previous = Vec::with_capacity(schema.width());
    let mut table = vars.borrow_mut();
    for (i, handle) in schema.variables().iter().enumerate() {
        let prev = table.set_current_value(*handle, row.get(i).cloned());
        previous.push((*handle, prev));
    }
    previous
}

pub fn unbind_row(vars: &RefCell<VariablesTable>, previous: Vec<(VariableHandle, Option<Literal>)>) {
    let mut table = vars.borrow_mut();
    for (handle, prev) in previous {
        table.set_current_value(handle, prev);
    }
}
