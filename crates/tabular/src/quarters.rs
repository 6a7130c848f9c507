#![forbid(unsafe_code)]

use crate::schema::{Column, Schema};
use crate::value::{parse_score, parse_yes_no, score_text, yes_no};
use ct_core::{Quarter, QuarterRecord, TestingStatus};

/// Append the fixed per-quarter column block to a schema: for each of
/// Q1..Q4, the eight sub-columns in worksheet order. The block is generated in a
/// loop so adding a period or a per-quarter field is a single edit here, not
/// four hand-written column sets.
pub fn quarter_block<T, G, M>(schema: &mut Schema<T>, get: G, get_mut: M)
where
    T: Default,
    G: Fn(&T, Quarter) -> &QuarterRecord + Clone + Send + Sync + 'static,
    M: Fn(&mut T, Quarter) -> &mut QuarterRecord + Clone + Send + Sync + 'static,
{
    for quarter in Quarter::ALL {
        let label = quarter.label();

        let g = get.clone();
        let m = get_mut.clone();
        schema.push(Column::new(
            format!("{label} Actual Score"),
            move |row: &T| score_text(g(row, quarter).actual_score),
            move |row: &mut T, value| m(row, quarter).actual_score = parse_score(value),
        ));

        let g = get.clone();
        let m = get_mut.clone();
        schema.push(Column::new(
            format!("{label} Target Score"),
            move |row: &T| score_text(g(row, quarter).target_score),
            move |row: &mut T, value| m(row, quarter).target_score = parse_score(value),
        ));

        let g = get.clone();
        let m = get_mut.clone();
        schema.push(Column::new(
            format!("{label} Observations"),
            move |row: &T| g(row, quarter).observations.clone(),
            move |row: &mut T, value| m(row, quarter).observations = value.trim().to_string(),
        ));

        let g = get.clone();
        let m = get_mut.clone();
        schema.push(Column::new(
            format!("{label} Observation Date"),
            move |row: &T| g(row, quarter).observation_date.clone(),
            move |row: &mut T, value| m(row, quarter).observation_date = value.trim().to_string(),
        ));

        let g = get.clone();
        let m = get_mut.clone();
        schema.push(Column::new(
            format!("{label} Testing Status"),
            move |row: &T| g(row, quarter).testing_status.as_str().to_string(),
            move |row: &mut T, value| m(row, quarter).testing_status = TestingStatus::parse(value),
        ));

        let g = get.clone();
        let m = get_mut.clone();
        schema.push(Column::new(
            format!("{label} Examine"),
            move |row: &T| yes_no(g(row, quarter).examine).to_string(),
            move |row: &mut T, value| m(row, quarter).examine = parse_yes_no(value),
        ));

        let g = get.clone();
        let m = get_mut.clone();
        schema.push(Column::new(
            format!("{label} Interview"),
            move |row: &T| yes_no(g(row, quarter).interview).to_string(),
            move |row: &mut T, value| m(row, quarter).interview = parse_yes_no(value),
        ));

        let g = get.clone();
        let m = get_mut.clone();
        schema.push(Column::new(
            format!("{label} Test"),
            move |row: &T| yes_no(g(row, quarter).test).to_string(),
            move |row: &mut T, value| m(row, quarter).test = parse_yes_no(value),
        ));
    }
}
