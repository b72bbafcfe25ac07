use super::group::group_rows;
use super::model::{ExportRow, Group, Row};

// ---------------------------------------------------------------------------
// Analysis configuration
// ---------------------------------------------------------------------------

/// How the `diff` value is applied to a group's maximum price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffType {
    /// `threshold = (1 - diff) * max`. `diff` is used as a raw fraction.
    #[default]
    Percent,
    /// `threshold = max - diff`, in currency units.
    Absolute,
}

impl DiffType {
    pub fn label(self) -> &'static str {
        match self {
            DiffType::Percent => "Difference in percent",
            DiffType::Absolute => "Difference in zł",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub diff_type: DiffType,
    pub diff: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            diff_type: DiffType::Percent,
            diff: 15.0,
        }
    }
}

impl AnalysisConfig {
    /// Price cutoff for a group whose maximum price is `max_price`.
    pub fn threshold(&self, max_price: f64) -> f64 {
        match self.diff_type {
            DiffType::Percent => (1.0 - self.diff) * max_price,
            DiffType::Absolute => max_price - self.diff,
        }
    }

    /// Percent mode with `diff > 1` makes the multiplier negative, so no
    /// positive price can ever match.
    pub fn percent_out_of_range(&self) -> bool {
        self.diff_type == DiffType::Percent && self.diff > 1.0
    }
}

// ---------------------------------------------------------------------------
// Threshold filter
// ---------------------------------------------------------------------------

/// Round to two decimals and append the currency suffix.
///
/// Uses the shortest decimal representation, so `20.0` renders as `20 zł`.
pub fn format_difference(diff: f64) -> String {
    let rounded = (diff * 100.0).round() / 100.0;
    format!("{rounded} zł")
}

/// Sort the group ascending by price and return the rows at or below the
/// threshold, annotated with their distance from the group maximum.
pub fn filter_group(group: &mut Group, config: &AnalysisConfig) -> Vec<ExportRow> {
    group.rows.sort_by(|a, b| a.price.total_cmp(&b.price));

    let Some(max_price) = group.max_price() else {
        return Vec::new();
    };
    let threshold = config.threshold(max_price);

    group
        .rows
        .iter()
        .filter(|row| row.price <= threshold)
        .map(|row| ExportRow {
            ean: row.ean.to_string(),
            name: row.name.clone(),
            price: row.price,
            tag: row.tag.clone(),
            difference: format_difference(max_price - row.price),
        })
        .collect()
}

/// Filter every group in place and concatenate the results in group order.
pub fn analyze_groups(groups: &mut [Group], config: &AnalysisConfig) -> Vec<ExportRow> {
    groups
        .iter_mut()
        .flat_map(|group| filter_group(group, config))
        .collect()
}

/// Full pipeline: group, filter and flatten.
pub fn analyze(rows: &[Row], config: &AnalysisConfig) -> Vec<ExportRow> {
    if rows.is_empty() {
        return Vec::new();
    }
    let mut groups = group_rows(rows);
    analyze_groups(&mut groups, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percent(diff: f64) -> AnalysisConfig {
        AnalysisConfig { diff_type: DiffType::Percent, diff }
    }

    fn absolute(diff: f64) -> AnalysisConfig {
        AnalysisConfig { diff_type: DiffType::Absolute, diff }
    }

    fn three_offers() -> Vec<Row> {
        vec![
            Row::new(100, "shop a", 100.0, "X"),
            Row::new(100, "shop b", 80.0, "Y"),
            Row::new(100, "shop c", 70.0, "Z"),
        ]
    }

    #[test]
    fn defaults_match_the_form() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.diff_type, DiffType::Percent);
        assert_eq!(cfg.diff, 15.0);
        assert!(cfg.percent_out_of_range());
    }

    #[test]
    fn percent_mode_keeps_cheaper_rows() {
        let out = analyze(&three_offers(), &percent(0.15));
        let prices: Vec<f64> = out.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![70.0, 80.0]);
        assert_eq!(out[0].difference, "30 zł");
        assert_eq!(out[1].difference, "20 zł");
        assert_eq!(out[0].ean, "100");
        assert_eq!(out[1].name, "shop b");
        assert_eq!(out[1].tag, "Y");
    }

    #[test]
    fn absolute_mode_keeps_same_rows() {
        let out = analyze(&three_offers(), &absolute(15.0));
        let prices: Vec<f64> = out.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![70.0, 80.0]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let rows = vec![Row::new(1, "a", 100.0, ""), Row::new(1, "b", 85.0, "")];
        let out = analyze(&rows, &absolute(15.0));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].difference, "15 zł");
    }

    #[test]
    fn single_row_group_never_qualifies_with_positive_percent() {
        let rows = vec![Row::new(7, "only", 49.99, "")];
        assert!(analyze(&rows, &percent(0.15)).is_empty());
        assert!(analyze(&rows, &percent(15.0)).is_empty());
    }

    #[test]
    fn zero_diff_admits_every_row() {
        let rows = vec![Row::new(7, "only", 49.99, "")];
        let out = analyze(&rows, &percent(0.0));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].difference, "0 zł");

        let out = analyze(&three_offers(), &absolute(0.0));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn ties_are_all_kept() {
        let rows = vec![
            Row::new(1, "a", 100.0, ""),
            Row::new(1, "b", 60.0, ""),
            Row::new(1, "c", 60.0, ""),
        ];
        let out = analyze(&rows, &absolute(10.0));
        let names: Vec<&str> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn output_follows_group_discovery_then_price() {
        let rows = vec![
            Row::new(2, "b-high", 20.0, ""),
            Row::new(1, "a-high", 10.0, ""),
            Row::new(2, "b-mid", 12.0, ""),
            Row::new(1, "a-low", 2.0, ""),
            Row::new(2, "b-low", 5.0, ""),
        ];
        let out = analyze(&rows, &absolute(5.0));
        let names: Vec<&str> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b-low", "b-mid", "a-low"]);
    }

    #[test]
    fn row_count_matches_predicate() {
        let rows = vec![
            Row::new(1, "a", 10.0, ""),
            Row::new(1, "b", 9.0, ""),
            Row::new(2, "c", 4.0, ""),
            Row::new(2, "d", 1.0, ""),
            Row::new(3, "e", 3.0, ""),
        ];
        let cfg = absolute(2.0);
        let expected: usize = group_rows(&rows)
            .iter()
            .map(|g| {
                let max = g.max_price().unwrap_or(f64::NAN);
                g.rows.iter().filter(|r| r.price <= cfg.threshold(max)).count()
            })
            .sum();
        assert_eq!(analyze(&rows, &cfg).len(), expected);
        assert_eq!(expected, 1);
    }

    #[test]
    fn difference_is_rounded_to_cents() {
        assert_eq!(format_difference(12.5), "12.5 zł");
        assert_eq!(format_difference(0.1 + 0.2), "0.3 zł");
        assert_eq!(format_difference(3.14159), "3.14 zł");
    }

    #[test]
    fn empty_input_is_a_no_op() {
        assert!(analyze(&[], &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn filter_sorts_group_by_price() {
        let mut groups = group_rows(&three_offers());
        analyze_groups(&mut groups, &percent(0.15));
        let prices: Vec<f64> = groups[0].rows.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![70.0, 80.0, 100.0]);
    }
}
