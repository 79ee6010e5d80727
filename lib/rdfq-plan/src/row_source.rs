use rdfq_model::{Row, VariableHandle};

/// A row source's schema: the ordered list of variable handles its rows are
/// positioned by, plus how many leading columns (if any) are order-by keys
/// (spec §4.7, "`ensure_variables` ... computes the schema ... and optional
/// order-size"). `order_size` is informational — row sources downstream of
/// `Sort` don't need to re-derive it, they just trust the row is already in
/// order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    variables: Vec<VariableHandle>,
    order_size: Option<usize>,
}

impl Schema {
    pub fn new(variables: Vec<VariableHandle>) -> Self {
        Self {
            variables,
            order_size: None,
        }
    }

    pub fn with_order_size(mut self, order_size: usize) -> Self {
        self.order_size = Some(order_size);
        self
    }

    pub fn variables(&self) -> &[VariableHandle] {
        &self.variables
    }

    pub fn width(&self) -> usize {
        self.variables.len()
    }

    pub fn order_size(&self) -> Option<usize> {
        self.order_size
    }

    pub fn position(&self, handle: VariableHandle) -> Option<usize> {
        self.variables.iter().position(|v| *v == handle)
    }
}

/// The pull-iterator contract every concrete row source implements (spec
/// §4.7): `init`/`ensure_variables` run once before the first pull,
/// `read_row` yields `None` exactly once at end-of-stream, and `reset`
/// restarts iteration from the top. Modeled as a trait with object-safe
/// methods (Design Notes §9, "row source as trait... seven methods"),
/// rather than the source's handler-struct-with-function-pointers, so
/// `Box<dyn RowSource>` composes the execution tree the way `rdfq`'s plan
/// builder needs to.
///
/// There is no explicit `finish` method (spec §4.7 names one): Rust's
/// `Drop` already propagates cleanup through a boxed tree in reverse
/// construction order when the root is dropped (spec §5, "Cancellation" —
/// "cleanup is tied to destruction"), so row sources that hold a
/// [`crate::MatchCursor`] or other owned resource release it from their own
/// `Drop` impl instead of a separate call every row source would otherwise
/// have to remember to make.
pub trait RowSource {
    /// Prepares this row source (and transitively, its inputs) to be read,
    /// computing the schema every row from [`RowSource::read_row`] is
    /// positioned by. Must be called (and return successfully) before the
    /// first `read_row`.
    fn ensure_variables(&mut self) -> &Schema;

    /// Pulls the next row, or `None` at end-of-stream. Callers MUST NOT call
    /// this again after it returns `None` without an intervening `reset`
    /// (spec §4.9, "calling `next_row` after `finished` is a no-op" — here
    /// modeled by `None` being sticky until reset rather than a separate
    /// `finished` flag every row source would have to track).
    fn read_row(&mut self) -> Option<Row>;

    /// Restarts iteration from the beginning (spec §4.7).
    fn reset(&mut self);

    /// A default, schema-driven full materialization: `init` then loop
    /// `read_row` until `None` (Design Notes §9, "provide a default
    /// `read_all_rows` that loops over `read_row`").
    fn read_all_rows(&mut self) -> Vec<Row> {
        self.ensure_variables();
        let mut out = Vec::new();
        while let Some(row) = self.read_row() {
            out.push(row);
        }
        out
    }

    /// Access to the `i`th direct input row source, for tree introspection
    /// (debugging, `print_row_sequence`). Row sources with no inputs (e.g.
    /// `TriplesMatch`, `RowSequence`) return `None` for every index.
    fn get_inner(&self, index: usize) -> Option<&dyn RowSource>;
}
