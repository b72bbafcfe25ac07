use std::collections::HashMap;

use super::model::{Group, Row};

/// Partition rows by EAN.
///
/// Groups come out in first-seen order and each group keeps its rows in
/// input order. No row is dropped or duplicated.
pub fn group_rows(rows: &[Row]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        match index.get(&row.ean) {
            Some(&pos) => groups[pos].rows.push(row.clone()),
            None => {
                index.insert(row.ean, groups.len());
                groups.push(Group {
                    ean: row.ean,
                    rows: vec![row.clone()],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn sample() -> Vec<Row> {
        vec![
            Row::new(3, "c1", 10.0, "A"),
            Row::new(1, "a1", 50.0, "B"),
            Row::new(3, "c2", 8.0, "A"),
            Row::new(2, "b1", 5.0, ""),
            Row::new(1, "a2", 45.0, "C"),
            Row::new(3, "c3", 12.0, "A"),
        ]
    }

    #[test]
    fn grouping_is_a_partition() {
        let rows = sample();
        let groups = group_rows(&rows);

        let total: usize = groups.iter().map(|g| g.rows.len()).sum();
        assert_eq!(total, rows.len());

        let eans: HashSet<i64> = groups.iter().map(|g| g.ean).collect();
        assert_eq!(eans.len(), groups.len());
        for g in &groups {
            assert!(g.rows.iter().all(|r| r.ean == g.ean));
        }
    }

    #[test]
    fn first_seen_order_and_insertion_order() {
        let groups = group_rows(&sample());
        let order: Vec<i64> = groups.iter().map(|g| g.ean).collect();
        assert_eq!(order, vec![3, 1, 2]);

        let names: Vec<&str> = groups[0].rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn grouping_is_idempotent() {
        let rows = sample();
        assert_eq!(group_rows(&rows), group_rows(&rows));
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(group_rows(&[]).is_empty());
    }
}
