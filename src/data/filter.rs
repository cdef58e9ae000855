use super::model::{LaunchDataset, LaunchRecord, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Payload / site filter for the scatter chart
// ---------------------------------------------------------------------------

/// Return indices of launches that pass the payload and site filters.
///
/// A launch passes when:
/// * `range.low <= payload <= range.high` (an inverted range passes nothing)
/// * the selection is `All`, or the launch site equals the selected site
///
/// Indices come back in ascending order.
pub fn filtered_indices(
    dataset: &LaunchDataset,
    selection: &SiteSelection,
    range: PayloadRange,
) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| range.contains(rec.payload_mass_kg))
        .filter(|(_, rec)| selection.matches(&rec.launch_site))
        .map(|(i, _)| i)
        .collect()
}

/// The launches feeding the scatter chart, as an order-preserving
/// subsequence of the dataset.
pub fn compute_filtered_scatter<'a>(
    dataset: &'a LaunchDataset,
    selection: &SiteSelection,
    range: PayloadRange,
) -> Vec<&'a LaunchRecord> {
    filtered_indices(dataset, selection, range)
        .into_iter()
        .map(|i| &dataset.records[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            LaunchRecord::new("KSC LC-39A", 3000.0, 1, "FT").unwrap(),
            LaunchRecord::new("KSC LC-39A", 5000.0, 0, "FT").unwrap(),
            LaunchRecord::new("CCAFS LC-40", 2000.0, 1, "B5").unwrap(),
        ])
    }

    #[test]
    fn test_scenario_all_sites() {
        let ds = scenario();
        let out = compute_filtered_scatter(&ds, &SiteSelection::All, PayloadRange::new(0.0, 4000.0));
        assert_eq!(out, vec![&ds.records[0], &ds.records[2]]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let ds = scenario();
        let out = filtered_indices(&ds, &SiteSelection::All, PayloadRange::new(2000.0, 3000.0));
        assert_eq!(out, vec![0, 2]);
        let out = filtered_indices(&ds, &SiteSelection::All, PayloadRange::new(5000.0, 5000.0));
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn test_site_filter() {
        let ds = scenario();
        let site = SiteSelection::Site("KSC LC-39A".into());
        let out = filtered_indices(&ds, &site, PayloadRange::new(0.0, 10_000.0));
        assert_eq!(out, vec![0, 1]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let ds = scenario();
        for (low, high) in [(4000.0, 3000.0), (10_000.0, 0.0), (5000.1, 5000.0)] {
            let out = compute_filtered_scatter(&ds, &SiteSelection::All, PayloadRange::new(low, high));
            assert!(out.is_empty(), "range {low}..{high} should match nothing");
        }
    }

    #[test]
    fn test_unknown_site_is_empty() {
        let ds = scenario();
        let site = SiteSelection::Site("Boca Chica".into());
        assert!(compute_filtered_scatter(&ds, &site, PayloadRange::new(0.0, 10_000.0)).is_empty());
    }

    #[test]
    fn test_result_is_ordered_subsequence_within_bounds() {
        let ds = LaunchDataset::from_records(
            (0..40)
                .map(|i| {
                    let site = if i % 3 == 0 { "VAFB SLC-4E" } else { "CCAFS SLC-40" };
                    LaunchRecord::new(site, (i * 250) as f64, i % 2, "FT").unwrap()
                })
                .collect(),
        );
        let range = PayloadRange::new(1200.0, 7300.0);
        let idx = filtered_indices(&ds, &SiteSelection::All, range);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
        for &i in &idx {
            assert!(range.contains(ds.records[i].payload_mass_kg));
        }
        let expected = ds
            .records
            .iter()
            .filter(|r| r.payload_mass_kg >= 1200.0 && r.payload_mass_kg <= 7300.0)
            .count();
        assert_eq!(idx.len(), expected);
    }

    #[test]
    fn test_idempotent() {
        let ds = scenario();
        let range = PayloadRange::new(0.0, 6000.0);
        let a = compute_filtered_scatter(&ds, &SiteSelection::All, range);
        let b = compute_filtered_scatter(&ds, &SiteSelection::All, range);
        assert_eq!(a, b);
    }
}
