use crate::{ride::TableRow, safety::is_safe_path};

/// Share of the distance, in percent, ridden on safe paths.
///
/// Uses the table distances, not the reconstructed segments. Returns `None`
/// when there is no distance to weigh: no data is not 0% safe.
pub fn safe_percentage<'a, I>(rows: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a TableRow>,
{
    let (safe_distance, total_distance) = rows.into_iter().fold((0.0, 0.0), |(safe, total), row| {
        if is_safe_path(&row.tags) {
            (safe + row.distance, total + row.distance)
        } else {
            (safe, total + row.distance)
        }
    });

    if total_distance > 0.0 {
        Some(100.0 * safe_distance / total_distance)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::row;

    #[test]
    fn test_distance_weighted() {
        let rows = [
            row(0, 0, 300.0, "highway=cycleway"),
            row(0, 0, 100.0, "highway=primary"),
        ];

        assert_eq!(safe_percentage(&rows), Some(75.0));
    }

    #[test]
    fn test_bounds() {
        let all_safe = [row(0, 0, 42.0, "highway=cycleway")];
        let all_unsafe = [row(0, 0, 42.0, "highway=primary"), row(0, 0, 1.0, "")];

        assert_eq!(safe_percentage(&all_safe), Some(100.0));
        assert_eq!(safe_percentage(&all_unsafe), Some(0.0));

        let mixed: Vec<_> = (0..50_i32)
            .map(|i| {
                let tags = if i % 3 == 0 { "highway=cycleway" } else { "highway=tertiary" };
                row(0, 0, f64::from(i) * 7.5, tags)
            })
            .collect();
        let score = safe_percentage(&mixed).unwrap();
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn test_no_distance_is_undefined() {
        let no_rows: [TableRow; 0] = [];
        assert_eq!(safe_percentage(&no_rows), None);
        assert_eq!(
            safe_percentage(&[row(0, 0, 0.0, "highway=cycleway"), row(0, 0, 0.0, "")]),
            None
        );
    }
}
