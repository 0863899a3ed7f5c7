//! Request → panels → packing → verified, immutable result.

use serde::{Deserialize, Serialize};

use crate::error::{CutSheetError, Result};
use crate::panels::{Bracing, Enclosure, JoinStyle, PortDividers, derive_panels};
use crate::solver::{PackStats, Solver};
use crate::types::{
    DEFAULT_KERF, DEFAULT_SHEET_HEIGHT, DEFAULT_SHEET_WIDTH, Panel, PlacedPanel, SheetSpec,
};
use crate::utilization::{sheets_used, utilization_pct};

/// Absorbs float accumulation in the layout checks.
const EPSILON: f64 = 1e-9;

/// Geometry request as accepted from JSON or the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutSheetRequest {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness: f64,
    #[serde(default = "default_join_style")]
    pub join_style: String,
    #[serde(default)]
    pub include_ports: bool,
    #[serde(default)]
    pub slot_port_height: Option<f64>,
    #[serde(default)]
    pub slot_port_width: Option<f64>,
    #[serde(default)]
    pub num_slot_ports: Option<u32>,
    #[serde(default)]
    pub include_bracing: bool,
    #[serde(default = "default_brace_strip_width")]
    pub brace_strip_width: f64,
    #[serde(default)]
    pub brace_count: u32,
    #[serde(default = "default_kerf")]
    pub kerf_thickness: f64,
    #[serde(default = "default_sheet_width")]
    pub sheet_width: f64,
    #[serde(default = "default_sheet_height")]
    pub sheet_height: f64,
}

fn default_wall_thickness() -> f64 {
    0.75
}

fn default_join_style() -> String {
    JoinStyle::OverlapFrontBack.as_str().to_string()
}

fn default_brace_strip_width() -> f64 {
    2.0
}

fn default_kerf() -> f64 {
    DEFAULT_KERF
}

fn default_sheet_width() -> f64 {
    DEFAULT_SHEET_WIDTH
}

fn default_sheet_height() -> f64 {
    DEFAULT_SHEET_HEIGHT
}

impl CutSheetRequest {
    /// Request for an exterior box with every other field at its default.
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
            wall_thickness: default_wall_thickness(),
            join_style: default_join_style(),
            include_ports: false,
            slot_port_height: None,
            slot_port_width: None,
            num_slot_ports: None,
            include_bracing: false,
            brace_strip_width: default_brace_strip_width(),
            brace_count: 0,
            kerf_thickness: default_kerf(),
            sheet_width: default_sheet_width(),
            sheet_height: default_sheet_height(),
        }
    }

    pub fn enclosure(&self) -> Enclosure {
        Enclosure {
            width: self.width,
            height: self.height,
            depth: self.depth,
            wall_thickness: self.wall_thickness,
        }
    }

    pub fn join_style(&self) -> Result<JoinStyle> {
        self.join_style.parse()
    }

    /// Port dividers, when requested with every field present and a non-zero count.
    pub fn port_dividers(&self) -> Option<PortDividers> {
        if !self.include_ports {
            return None;
        }
        match (self.slot_port_height, self.slot_port_width, self.num_slot_ports) {
            (Some(slot_height), Some(slot_width), Some(count)) if count > 0 => Some(PortDividers {
                slot_height,
                slot_width,
                count,
            }),
            _ => None,
        }
    }

    pub fn bracing(&self) -> Option<Bracing> {
        (self.include_bracing && self.brace_count > 0).then_some(Bracing {
            strip_width: self.brace_strip_width,
            count: self.brace_count,
        })
    }

    pub fn sheet(&self) -> Result<SheetSpec> {
        SheetSpec::new(self.sheet_width, self.sheet_height, self.kerf_thickness)
    }
}

/// Finished layout handed to printers and renderers. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutSheetResult {
    panels: Vec<Panel>,
    placements: Vec<PlacedPanel>,
    sheets_used: usize,
    utilization_pct: f64,
    sheet_width: f64,
    sheet_height: f64,
    kerf: f64,
}

impl CutSheetResult {
    /// Checks the layout invariants and computes the summary figures.
    pub fn assemble(
        panels: Vec<Panel>,
        placements: Vec<PlacedPanel>,
        sheet: SheetSpec,
    ) -> Result<Self> {
        verify_layout(&panels, &placements, &sheet)?;
        let sheets_used = sheets_used(&placements);
        let utilization_pct = utilization_pct(&placements, &sheet);
        Ok(Self {
            panels,
            placements,
            sheets_used,
            utilization_pct,
            sheet_width: sheet.width,
            sheet_height: sheet.height,
            kerf: sheet.kerf,
        })
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn placements(&self) -> &[PlacedPanel] {
        &self.placements
    }

    /// Placements on one sheet, in placement order.
    pub fn sheet_placements(&self, sheet_index: usize) -> impl Iterator<Item = &PlacedPanel> {
        self.placements
            .iter()
            .filter(move |p| p.sheet_index == sheet_index)
    }

    pub fn sheets_used(&self) -> usize {
        self.sheets_used
    }

    pub fn utilization_pct(&self) -> f64 {
        self.utilization_pct
    }

    pub fn sheet_width(&self) -> f64 {
        self.sheet_width
    }

    pub fn sheet_height(&self) -> f64 {
        self.sheet_height
    }

    pub fn kerf(&self) -> f64 {
        self.kerf
    }
}

fn verify_layout(panels: &[Panel], placements: &[PlacedPanel], sheet: &SheetSpec) -> Result<()> {
    if placements.len() != panels.len() {
        return Err(CutSheetError::LayoutInvariant(format!(
            "{} panels but {} placements",
            panels.len(),
            placements.len()
        )));
    }

    let mut placed = vec![false; panels.len()];
    for p in placements {
        let Some(source) = panels.get(p.panel_index) else {
            return Err(CutSheetError::LayoutInvariant(format!(
                "'{}' refers to panel {} of {}",
                p.name,
                p.panel_index,
                panels.len()
            )));
        };
        if std::mem::replace(&mut placed[p.panel_index], true) {
            return Err(CutSheetError::LayoutInvariant(format!(
                "panel {} ('{}') placed twice",
                p.panel_index, p.name
            )));
        }
        if p.x < -EPSILON
            || p.y < -EPSILON
            || p.right() > sheet.width + EPSILON
            || p.bottom() > sheet.height + EPSILON
        {
            return Err(CutSheetError::LayoutInvariant(format!(
                "'{}' at ({}, {}) size {}x{} leaves sheet {}",
                p.name, p.x, p.y, p.width, p.height, p.sheet_index
            )));
        }
        if !source.can_rotate && p.rotated {
            return Err(CutSheetError::LayoutInvariant(format!(
                "fixed-orientation panel '{}' was rotated",
                p.name
            )));
        }
    }

    for (i, a) in placements.iter().enumerate() {
        for b in &placements[i + 1..] {
            if a.overlap_area(b) > EPSILON {
                return Err(CutSheetError::LayoutInvariant(format!(
                    "'{}' overlaps '{}' on sheet {}",
                    a.name, b.name, a.sheet_index
                )));
            }
        }
    }
    Ok(())
}

/// Derives, packs and assembles a cut sheet for one request.
pub fn generate_cut_sheet(request: &CutSheetRequest) -> Result<CutSheetResult> {
    let sheet = request.sheet()?;
    let join_style = request.join_style()?;
    let panels = derive_panels(
        &request.enclosure(),
        join_style,
        request.port_dividers(),
        request.bracing(),
    )?;
    let (result, stats) = pack_panels(panels, sheet)?;
    tracing::info!(
        join_style = %join_style,
        panels = result.panels().len(),
        sheets = result.sheets_used(),
        utilization_pct = result.utilization_pct(),
        "cut sheet generated"
    );
    tracing::debug!(?stats, "pack stats");
    Ok(result)
}

/// Packs an arbitrary panel list and assembles the result.
pub fn pack_panels(panels: Vec<Panel>, sheet: SheetSpec) -> Result<(CutSheetResult, PackStats)> {
    let packing = Solver::new(sheet, &panels).solve()?;
    let result = CutSheetResult::assemble(panels, packing.placements, sheet)?;
    Ok((result, packing.stats))
}
