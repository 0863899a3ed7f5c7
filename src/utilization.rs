use crate::types::{PlacedPanel, SheetSpec};

/// Highest sheet index plus one, or 0 when nothing was placed.
pub fn sheets_used(placed: &[PlacedPanel]) -> usize {
    placed
        .iter()
        .map(|p| p.sheet_index + 1)
        .max()
        .unwrap_or(0)
}

/// Placed cut area as a percentage of the stock consumed.
pub fn utilization_pct(placed: &[PlacedPanel], sheet: &SheetSpec) -> f64 {
    let sheets = sheets_used(placed);
    if sheets == 0 {
        return 0.0;
    }
    let used_area: f64 = placed.iter().map(|p| p.area()).sum();
    used_area / (sheets as f64 * sheet.area()) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn placed(w: f64, h: f64, sheet_index: usize) -> PlacedPanel {
        PlacedPanel {
            name: "P".to_string(),
            x: 0.0,
            y: 0.0,
            width: w,
            height: h,
            rotated: false,
            sheet_index,
            panel_index: 0,
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(sheets_used(&[]), 0);
        assert_eq!(utilization_pct(&[], &SheetSpec::default()), 0.0);
    }

    #[test]
    fn test_full_sheet() {
        let sheet = SheetSpec::default();
        let pct = utilization_pct(&[placed(96.0, 48.0, 0)], &sheet);
        assert!(approx_eq!(f64, pct, 100.0, epsilon = 1e-9));
    }

    #[test]
    fn test_counts_highest_sheet_index() {
        let sheet = SheetSpec::default();
        let ps = [placed(48.0, 48.0, 2), placed(48.0, 48.0, 0)];
        assert_eq!(sheets_used(&ps), 3);
        // 2 * 2304 / (3 * 4608)
        let pct = utilization_pct(&ps, &sheet);
        assert!(approx_eq!(f64, pct, 100.0 / 3.0, epsilon = 1e-9));
    }
}
