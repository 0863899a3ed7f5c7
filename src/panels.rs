//! Enclosure geometry to panel list.
//!
//! Dimensions are exterior. The join style decides which panels run the full
//! width of the box and which sit between them.

use std::str::FromStr;

use crate::error::{CutSheetError, Result, ensure_positive};
use crate::types::Panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStyle {
    /// Front and back cover the full width; sides sit between them.
    OverlapFrontBack,
    /// Sides cover the full depth; front, back, top and bottom are inset.
    OverlapSides,
}

impl JoinStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinStyle::OverlapFrontBack => "front_back_overlap",
            JoinStyle::OverlapSides => "side_overlap",
        }
    }
}

impl FromStr for JoinStyle {
    type Err = CutSheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "front_back_overlap" | "overlap_front_back" | "overlapFrontBack" => {
                Ok(JoinStyle::OverlapFrontBack)
            }
            "side_overlap" | "overlap_sides" | "overlapSides" => Ok(JoinStyle::OverlapSides),
            other => Err(CutSheetError::UnsupportedJoinStyle(other.to_string())),
        }
    }
}

impl std::fmt::Display for JoinStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exterior box dimensions plus material thickness, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enclosure {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub wall_thickness: f64,
}

impl Enclosure {
    fn validate(&self) -> Result<()> {
        ensure_positive("width", self.width)?;
        ensure_positive("height", self.height)?;
        ensure_positive("depth", self.depth)?;
        ensure_positive("wall_thickness", self.wall_thickness)?;
        Ok(())
    }
}

/// Tall divider walls forming slot ports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortDividers {
    pub slot_height: f64,
    pub slot_width: f64,
    pub count: u32,
}

/// Vertical brace strips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracing {
    pub strip_width: f64,
    pub count: u32,
}

pub fn derive_panels(
    enclosure: &Enclosure,
    join_style: JoinStyle,
    ports: Option<PortDividers>,
    bracing: Option<Bracing>,
) -> Result<Vec<Panel>> {
    enclosure.validate()?;
    let Enclosure {
        width: w,
        height: h,
        depth: d,
        wall_thickness: t,
    } = *enclosure;

    // Width used by front/back/top/bottom.
    let span = match join_style {
        JoinStyle::OverlapFrontBack => w,
        JoinStyle::OverlapSides => {
            let inner = w - 2.0 * t;
            if inner <= 0.0 {
                return Err(CutSheetError::InvalidDimension(format!(
                    "width {w} too small for {join_style} with wall thickness {t} (inner width {inner})"
                )));
            }
            inner
        }
    };

    let mut panels = vec![
        Panel::new("Front", span, h)?
            .fixed_orientation()
            .with_notes("Driver cutouts here"),
        Panel::new("Back", span, h)?,
        Panel::new("Left", d, h)?,
        Panel::new("Right", d, h)?,
        Panel::new("Top", span, d)?,
        Panel::new("Bottom", span, d)?,
    ];

    if let Some(ports) = ports.filter(|p| p.count > 0) {
        ensure_positive("slot_port_width", ports.slot_width)?;
        ensure_positive("slot_port_height", ports.slot_height)?;
        for i in 1..=ports.count {
            panels.push(
                Panel::new(format!("SlotPortWall{i}"), ports.slot_width, ports.slot_height)?
                    .with_notes("Slot port divider"),
            );
        }
    }

    if let Some(bracing) = bracing.filter(|b| b.count > 0) {
        ensure_positive("brace_strip_width", bracing.strip_width)?;
        let mut brace_height = h - 2.0 * t;
        if brace_height <= 0.0 {
            brace_height = h;
        }
        for i in 1..=bracing.count {
            panels.push(
                Panel::new(format!("Brace{i}"), bracing.strip_width, brace_height)?
                    .with_notes("Vertical brace strip"),
            );
        }
    }

    tracing::debug!(
        join_style = %join_style,
        count = panels.len(),
        "derived panels"
    );
    Ok(panels)
}
