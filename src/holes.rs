//! Driver hole positions on the front panel.
//!
//! Hole offsets are given relative to the panel centre. The output uses
//! absolute coordinates from the panel's top-left corner, clamped so that
//! every hole stays on the panel.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ensure_positive};

/// Cut diameter as a fraction of nominal driver size when no explicit cut is given.
pub const NOMINAL_CUT_RATIO: f64 = 0.93;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleSpec {
    pub dx: f64,
    pub dy: f64,
    pub nominal: f64,
    #[serde(default)]
    pub cut: Option<f64>,
}

impl HoleSpec {
    pub fn diameter(&self) -> f64 {
        match self.cut {
            Some(cut) if cut > 0.0 => cut,
            _ => self.nominal * NOMINAL_CUT_RATIO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleLayoutRequest {
    pub panel_width: f64,
    pub panel_height: f64,
    pub holes: Vec<HoleSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HolePosition {
    pub cx: f64,
    pub cy: f64,
    pub dia: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoleLayout {
    pub panel_width: f64,
    pub panel_height: f64,
    pub hole_count: usize,
    pub holes: Vec<HolePosition>,
}

pub fn layout_holes(request: &HoleLayoutRequest) -> Result<HoleLayout> {
    let width = ensure_positive("panel_width", request.panel_width)?;
    let height = ensure_positive("panel_height", request.panel_height)?;

    let holes: Vec<HolePosition> = request
        .holes
        .iter()
        .map(|hole| {
            let dia = hole.diameter();
            let r = dia / 2.0;
            // min then max: a hole wider than the panel sits at r.
            let cx = (width / 2.0 + hole.dx).min(width - r).max(r);
            let cy = (height / 2.0 + hole.dy).min(height - r).max(r);
            HolePosition {
                cx: round4(cx),
                cy: round4(cy),
                dia: round4(dia),
            }
        })
        .collect();

    tracing::debug!(count = holes.len(), "hole layout");
    Ok(HoleLayout {
        panel_width: width,
        panel_height: height,
        hole_count: holes.len(),
        holes,
    })
}

/// Four decimal places, ties to even.
fn round4(v: f64) -> f64 {
    (v * 10_000.0).round_ties_even() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CutSheetError;
    use float_cmp::approx_eq;

    fn request(holes: Vec<HoleSpec>) -> HoleLayoutRequest {
        HoleLayoutRequest {
            panel_width: 30.0,
            panel_height: 20.0,
            holes,
        }
    }

    #[test]
    fn test_diameters() {
        let layout = layout_holes(&request(vec![
            HoleSpec { dx: 0.0, dy: 0.0, nominal: 12.0, cut: None },
            HoleSpec { dx: -5.0, dy: 3.0, nominal: 8.0, cut: Some(7.5) },
            HoleSpec { dx: 6.0, dy: -4.0, nominal: 10.0, cut: None },
        ]))
        .unwrap();
        assert_eq!(layout.hole_count, 3);
        assert!(approx_eq!(f64, layout.holes[0].dia, 11.16, epsilon = 1e-9));
        assert!(approx_eq!(f64, layout.holes[1].dia, 7.5, epsilon = 1e-9));
        assert!(approx_eq!(f64, layout.holes[2].dia, 9.3, epsilon = 1e-9));
    }

    #[test]
    fn test_centres_from_offsets() {
        let layout = layout_holes(&request(vec![HoleSpec {
            dx: -5.0,
            dy: 3.0,
            nominal: 8.0,
            cut: Some(7.5),
        }]))
        .unwrap();
        assert_eq!((layout.holes[0].cx, layout.holes[0].cy), (10.0, 13.0));
    }

    #[test]
    fn test_zero_cut_uses_nominal() {
        let hole = HoleSpec { dx: 0.0, dy: 0.0, nominal: 10.0, cut: Some(0.0) };
        assert!(approx_eq!(f64, hole.diameter(), 9.3, epsilon = 1e-9));
    }

    #[test]
    fn test_clamped_inside_panel() {
        let layout = layout_holes(&request(vec![
            HoleSpec { dx: 40.0, dy: -40.0, nominal: 6.0, cut: Some(6.0) },
            HoleSpec { dx: 0.0, dy: 0.0, nominal: 40.0, cut: Some(40.0) },
        ]))
        .unwrap();
        assert_eq!((layout.holes[0].cx, layout.holes[0].cy), (27.0, 3.0));
        // Wider than the panel: lower bound wins.
        assert_eq!((layout.holes[1].cx, layout.holes[1].cy), (20.0, 20.0));
    }

    #[test]
    fn test_round4_ties_to_even() {
        // Binary fractions that land exactly on a half at four places.
        assert_eq!(round4(0.03125), 0.0312);
        assert_eq!(round4(0.15625), 0.1562);
        assert_eq!(round4(0.09375), 0.0938);
        assert_eq!(round4(-0.03125), -0.0312);
        assert_eq!(round4(11.16), 11.16);
    }

    #[test]
    fn test_clamped_tie_rounds_to_even() {
        let layout = layout_holes(&request(vec![HoleSpec {
            dx: -40.0,
            dy: -40.0,
            nominal: 1.0,
            cut: Some(0.0625),
        }]))
        .unwrap();
        // Clamped to the radius 0.03125.
        assert_eq!((layout.holes[0].cx, layout.holes[0].cy), (0.0312, 0.0312));
        assert_eq!(layout.holes[0].dia, 0.0625);
    }

    #[test]
    fn test_rejects_bad_panel() {
        let bad = HoleLayoutRequest {
            panel_width: 0.0,
            panel_height: 20.0,
            holes: vec![],
        };
        assert!(matches!(layout_holes(&bad), Err(CutSheetError::InvalidDimension(_))));
    }

    #[test]
    fn test_from_json() {
        let req: HoleLayoutRequest = serde_json::from_str(
            r#"{"panel_width": 30.0, "panel_height": 20.0,
                "holes": [{"dx": 0.0, "dy": 0.0, "nominal": 12.0, "cut": null}]}"#,
        )
        .unwrap();
        let layout = layout_holes(&req).unwrap();
        assert_eq!((layout.holes[0].cx, layout.holes[0].cy), (15.0, 10.0));
    }
}
