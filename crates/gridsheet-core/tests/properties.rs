//! Randomized edit sequences checking the sheet's structural invariants.

use std::collections::BTreeSet;

use gridsheet_core::{CellValue, Position, Sheet, SheetError, Size};
use proptest::prelude::*;

const ROWS: usize = 4;
const COLS: usize = 4;

#[derive(Clone, Debug)]
enum Op {
    Set(Position, String),
    Clear(Position),
}

fn position() -> impl Strategy<Value = Position> {
    (0..ROWS, 0..COLS).prop_map(|(row, col)| Position::new(row, col))
}

fn reference() -> impl Strategy<Value = String> {
    position().prop_map(|p| p.to_string())
}

fn input() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        (0..100i32).prop_map(|n| n.to_string()),
        Just("'42".to_string()),
        Just("text".to_string()),
        Just("=1/0".to_string()),
        Just("=1+".to_string()),
        reference().prop_map(|r| format!("={}", r)),
        (reference(), reference()).prop_map(|(a, b)| format!("={}+{}", a, b)),
        (reference(), reference(), 1..5i32)
            .prop_map(|(a, b, n)| format!("=({}-{})*{}", a, b, n)),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (position(), input()).prop_map(|(p, s)| Op::Set(p, s)),
        1 => position().prop_map(Op::Clear),
    ]
}

type CellSnapshot = (Position, String, Vec<Position>, Vec<Position>);

/// Texts and edges of every cell, in a comparable form.
fn snapshot(sheet: &Sheet) -> (Size, Vec<CellSnapshot>) {
    let cells = sheet
        .iter()
        .map(|view| {
            let mut deps: Vec<Position> = view.dependencies().collect();
            deps.sort();
            let mut dependents: Vec<Position> = view.dependents().collect();
            dependents.sort();
            (view.position(), view.text(), deps, dependents)
        })
        .collect();
    (sheet.printable_size(), cells)
}

/// Values of every cell, in row-major order.
fn values(sheet: &Sheet) -> Vec<(Position, CellValue)> {
    sheet.iter().map(|view| (view.position(), view.value())).collect()
}

/// Rebuild the sheet from its texts alone, so no cache can carry over.
/// Formulas re-create cleared targets as empty cells, which read the same.
fn rebuilt(sheet: &Sheet) -> Sheet {
    let mut fresh = Sheet::new();
    for view in sheet.iter() {
        fresh.set_cell(view.position(), &view.text()).unwrap();
    }
    fresh
}

proptest! {
    #[test]
    fn test_edit_sequences_keep_invariants(ops in prop::collection::vec(op(), 1..40)) {
        let mut sheet = Sheet::new();

        for op in ops {
            match op {
                Op::Set(pos, text) => {
                    let before = snapshot(&sheet);
                    match sheet.set_cell(pos, &text) {
                        Ok(()) => {}
                        Err(SheetError::CircularDependency { cell, path }) => {
                            prop_assert_eq!(cell, pos);
                            prop_assert_eq!(path.first(), Some(&pos));
                            prop_assert_eq!(path.last(), Some(&pos));
                            prop_assert_eq!(snapshot(&sheet), before);
                        }
                        Err(SheetError::MalformedFormula(_)) => {
                            prop_assert_eq!(snapshot(&sheet), before);
                        }
                        Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                    }
                }
                Op::Clear(pos) => sheet.clear_cell(pos).unwrap(),
            }

            sheet.assert_consistent();
            let fresh = rebuilt(&sheet);
            for (pos, value) in values(&sheet) {
                let expected = fresh.cell(pos).unwrap().map(|view| view.value());
                prop_assert_eq!(Some(value), expected);
            }
        }
    }

    #[test]
    fn test_extent_is_tight_bounding_box(ops in prop::collection::vec(op(), 1..40)) {
        let mut sheet = Sheet::new();
        // Positions that should hold a cell: written ones plus the cells
        // their formulas created, minus cleared ones.
        let mut occupied: BTreeSet<Position> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Set(pos, text) => {
                    if sheet.set_cell(pos, &text).is_ok() {
                        occupied.insert(pos);
                        let view = sheet.cell(pos).unwrap().unwrap();
                        occupied.extend(view.referenced_cells().iter().copied());
                    }
                }
                Op::Clear(pos) => {
                    sheet.clear_cell(pos).unwrap();
                    occupied.remove(&pos);
                }
            }

            let present: BTreeSet<Position> = sheet.iter().map(|view| view.position()).collect();
            prop_assert_eq!(&present, &occupied);

            let expected = Size::new(
                occupied.iter().map(|p| p.row + 1).max().unwrap_or(0),
                occupied.iter().map(|p| p.col + 1).max().unwrap_or(0),
            );
            prop_assert_eq!(sheet.printable_size(), expected);
        }
        sheet.assert_consistent();
    }
}
