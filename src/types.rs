use serde::{Deserialize, Serialize};

use crate::error::{CutSheetError, Result, ensure_positive};

pub const DEFAULT_SHEET_WIDTH: f64 = 96.0;
pub const DEFAULT_SHEET_HEIGHT: f64 = 48.0;
pub const DEFAULT_KERF: f64 = 0.125;
pub const DEFAULT_MATERIAL: &str = "MDF";

/// Width/height pair in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn max_side(&self) -> f64 {
        self.w.max(self.h)
    }

    /// True when this rect plus `kerf` spacing on both axes fits inside `other`.
    pub fn fits_in(&self, other: &Rect, kerf: f64) -> bool {
        self.w + kerf <= other.w && self.h + kerf <= other.h
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// A flat part to be cut from sheet stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_true")]
    pub can_rotate: bool,
    #[serde(default = "default_material")]
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_material() -> String {
    DEFAULT_MATERIAL.to_string()
}

impl Panel {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Result<Self> {
        let name = name.into();
        ensure_positive(&format!("{name} width"), width)?;
        ensure_positive(&format!("{name} height"), height)?;
        Ok(Self {
            name,
            width,
            height,
            can_rotate: true,
            material: default_material(),
            notes: None,
        })
    }

    pub fn fixed_orientation(mut self) -> Self {
        self.can_rotate = false;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn size(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Fixed sheet stock shared by every placement of one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub width: f64,
    pub height: f64,
    pub kerf: f64,
}

impl Default for SheetSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_SHEET_WIDTH,
            height: DEFAULT_SHEET_HEIGHT,
            kerf: DEFAULT_KERF,
        }
    }
}

impl SheetSpec {
    pub fn new(width: f64, height: f64, kerf: f64) -> Result<Self> {
        ensure_positive("sheet width", width)?;
        ensure_positive("sheet height", height)?;
        if !kerf.is_finite() || kerf < 0.0 {
            return Err(CutSheetError::InvalidDimension(format!(
                "kerf must be >= 0, got {kerf}"
            )));
        }
        Ok(Self {
            width,
            height,
            kerf,
        })
    }

    pub fn size(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Where a panel ended up. `width`/`height` are the cut size after rotation,
/// never inflated by kerf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedPanel {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
    pub sheet_index: usize,
    /// Position of the source panel in the packed panel list.
    pub panel_index: usize,
}

impl PlacedPanel {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area of the intersection with `other`; zero when on different sheets.
    pub fn overlap_area(&self, other: &PlacedPanel) -> f64 {
        if self.sheet_index != other.sheet_index {
            return 0.0;
        }
        let ix = self.right().min(other.right()) - self.x.max(other.x);
        let iy = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if ix > 0.0 && iy > 0.0 { ix * iy } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_fits_with_kerf() {
        let sheet = Rect::new(96.0, 48.0);
        assert!(Rect::new(50.0, 40.0).fits_in(&sheet, 0.125));
        assert!(Rect::new(96.0, 48.0).fits_in(&sheet, 0.0));
        assert!(!Rect::new(96.0, 48.0).fits_in(&sheet, 0.125));
        assert!(!Rect::new(40.0, 50.0).fits_in(&sheet, 0.0));
        assert!(Rect::new(40.0, 50.0).rotated().fits_in(&sheet, 0.0));
    }

    #[test]
    fn test_rect_display() {
        assert_eq!(Rect::new(18.0, 12.5).to_string(), "18x12.5");
    }

    #[test]
    fn test_panel_rejects_bad_dimensions() {
        assert!(Panel::new("Front", 0.0, 10.0).is_err());
        assert!(Panel::new("Front", 10.0, -2.0).is_err());
        let p = Panel::new("Front", 10.0, 12.0).unwrap();
        assert!(p.can_rotate);
        assert_eq!(p.material, "MDF");
        assert!(!p.fixed_orientation().can_rotate);
    }

    #[test]
    fn test_sheet_spec_validation() {
        let d = SheetSpec::default();
        assert_eq!((d.width, d.height, d.kerf), (96.0, 48.0, 0.125));
        assert!(SheetSpec::new(96.0, 48.0, 0.0).is_ok());
        assert!(SheetSpec::new(96.0, 48.0, -0.1).is_err());
        assert!(SheetSpec::new(0.0, 48.0, 0.1).is_err());
        assert!(SheetSpec::new(96.0, 48.0, f64::NAN).is_err());
    }

    #[test]
    fn test_overlap_area() {
        let a = PlacedPanel {
            name: "A".into(),
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            rotated: false,
            sheet_index: 0,
            panel_index: 0,
        };
        let touching = PlacedPanel {
            name: "B".into(),
            x: 10.0,
            ..a.clone()
        };
        let crossing = PlacedPanel {
            name: "C".into(),
            x: 5.0,
            y: 5.0,
            ..a.clone()
        };
        let other_sheet = PlacedPanel {
            sheet_index: 1,
            ..a.clone()
        };
        assert_eq!(a.overlap_area(&touching), 0.0);
        assert_eq!(a.overlap_area(&crossing), 25.0);
        assert_eq!(a.overlap_area(&other_sheet), 0.0);
    }
}
