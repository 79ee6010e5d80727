//! Cross-module row-source invariants (spec §8): `read_all_rows` matches
//! repeated `read_row` calls, `Distinct` drops value-equal rows, `Sort`
//! yields a permutation in order, `Slice` yields exactly `input[O..O+L]`.

use rdfq_algebra::OrderCondition;
use rdfq_expr::Expression;
use rdfq_model::{Literal, Row, Variable, VariablesTable};
use rdfq_plan::sources::{Distinct, RowSequence, Slice, Sort};
use rdfq_plan::RowSource;
use std::cell::RefCell;
use std::rc::Rc;

fn row_of(values: &[i64]) -> Row {
    let mut row = Row::with_width(values.len());
    for (i, v) in values.iter().enumerate() {
        row.set(i, Some(Literal::from_i64(*v)));
    }
    row
}

#[test]
fn read_all_rows_matches_successive_read_row_calls() {
    let mut vars = VariablesTable::new();
    let x = vars.get_or_insert(Variable::new("x"));
    let rows = vec![row_of(&[1]), row_of(&[2]), row_of(&[3])];

    let mut via_all = RowSequence::new(vec![x], rows.clone());
    via_all.ensure_variables();
    let all = via_all.read_all_rows();

    let mut via_loop = RowSequence::new(vec![x], rows);
    via_loop.ensure_variables();
    let mut manual = Vec::new();
    while let Some(row) = via_loop.read_row() {
        manual.push(row);
    }

    assert_eq!(all.len(), manual.len());
    for (a, b) in all.iter().zip(manual.iter()) {
        assert!(a.get(0).unwrap().same_term(b.get(0).unwrap()));
    }
}

#[test]
fn distinct_drops_value_equal_rows() {
    let mut vars = VariablesTable::new();
    let x = vars.get_or_insert(Variable::new("x"));
    let rows = vec![row_of(&[1]), row_of(&[1]), row_of(&[2]), row_of(&[1])];
    let inner = Box::new(RowSequence::new(vec![x], rows));
    let mut distinct = Distinct::new(inner);
    distinct.ensure_variables();
    let out = distinct.read_all_rows();
    assert_eq!(out.len(), 2);
    assert!(out[0].get(0).unwrap().same_term(&Literal::from_i64(1)));
    assert!(out[1].get(0).unwrap().same_term(&Literal::from_i64(2)));
}

#[test]
fn sort_output_is_sorted_and_a_permutation_of_the_input() {
    let mut table = VariablesTable::new();
    let x = table.get_or_insert(Variable::new("x"));
    let vars = Rc::new(RefCell::new(table));

    let rows = vec![row_of(&[3]), row_of(&[1]), row_of(&[2])];
    let inner = Box::new(RowSequence::new(vec![x], rows));
    let condition = OrderCondition {
        expression: Expression::Variable(Variable::new("x")),
        descending: false,
    };
    let mut sort = Sort::new(inner, vec![condition], Rc::clone(&vars));
    sort.ensure_variables();
    let out = sort.read_all_rows();

    let values: Vec<i64> = out
        .iter()
        .map(|r| {
            if let rdfq_model::LiteralKind::Integer(n) = r.get(0).unwrap().kind() {
                n.as_i64()
            } else {
                panic!("expected integer")
            }
        })
        .collect();
    assert_eq!(values, vec![1, 2, 3]);

    let mut sorted_expected = values.clone();
    sorted_expected.sort_unstable();
    assert_eq!(values, sorted_expected);
}

#[test]
fn slice_yields_exactly_the_offset_limit_window() {
    let mut vars = VariablesTable::new();
    let x = vars.get_or_insert(Variable::new("x"));
    let rows: Vec<Row> = (0..5).map(|n| row_of(&[n])).collect();
    let inner = Box::new(RowSequence::new(vec![x], rows));
    let mut slice = Slice::new(inner, 1, Some(2));
    slice.ensure_variables();
    let out = slice.read_all_rows();
    assert_eq!(out.len(), 2);
    assert!(out[0].get(0).unwrap().same_term(&Literal::from_i64(1)));
    assert!(out[1].get(0).unwrap().same_term(&Literal::from_i64(2)));
}
