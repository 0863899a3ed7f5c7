use std::cmp::Ordering;

use crate::error::{CutSheetError, Result};
use crate::guillotine::GuillotineSheets;
use crate::types::{Panel, PlacedPanel, SheetSpec};

/// Counters for a single packing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackStats {
    pub sheets_opened: usize,
    pub peak_free_rects: usize,
    pub rotated: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Packing {
    pub placements: Vec<PlacedPanel>,
    pub stats: PackStats,
}

/// Greedy largest-first guillotine packer.
pub struct Solver<'a> {
    sheet: SheetSpec,
    panels: &'a [Panel],
}

impl<'a> Solver<'a> {
    pub fn new(sheet: SheetSpec, panels: &'a [Panel]) -> Self {
        Self { sheet, panels }
    }

    pub fn solve(&self) -> Result<Packing> {
        let order = self.packing_order();
        let mut sheets = GuillotineSheets::new(self.sheet);
        let mut placements = Vec::with_capacity(order.len());
        let mut stats = PackStats::default();

        for (panel_index, panel) in order {
            let fit = match sheets.find_first(panel) {
                Some(fit) => fit,
                None => {
                    if !sheets.fits_empty_sheet(panel) {
                        tracing::warn!(panel = %panel.name, size = %panel.size(), "panel larger than sheet");
                        return Err(CutSheetError::SizeExceedsSheet {
                            panel: panel.name.clone(),
                            width: panel.width,
                            height: panel.height,
                            sheet_width: self.sheet.width,
                            sheet_height: self.sheet.height,
                            kerf: self.sheet.kerf,
                        });
                    }
                    let index = sheets.open_sheet();
                    tracing::debug!(panel = %panel.name, sheet = index, "opened sheet");
                    sheets.find_first(panel).ok_or_else(|| {
                        CutSheetError::LayoutInvariant(format!(
                            "panel '{}' rejected by a fresh sheet",
                            panel.name
                        ))
                    })?
                }
            };

            let placed = sheets.place(fit, panel, panel_index);
            tracing::debug!(
                panel = %placed.name,
                x = placed.x,
                y = placed.y,
                rotated = placed.rotated,
                sheet = placed.sheet_index,
                "placed panel"
            );
            if placed.rotated {
                stats.rotated += 1;
            }
            stats.peak_free_rects = stats.peak_free_rects.max(sheets.free_rects.len());
            placements.push(placed);
        }

        stats.sheets_opened = sheets.sheets_opened();
        Ok(Packing { placements, stats })
    }

    /// Area descending, then longest side descending. Full ties keep input
    /// order.
    fn packing_order(&self) -> Vec<(usize, &'a Panel)> {
        let mut order: Vec<(usize, &Panel)> = self.panels.iter().enumerate().collect();
        order.sort_by(|(_, a), (_, b)| by_area_then_longest_side(a, b));
        order
    }
}

fn by_area_then_longest_side(a: &Panel, b: &Panel) -> Ordering {
    b.area()
        .total_cmp(&a.area())
        .then_with(|| b.size().max_side().total_cmp(&a.size().max_side()))
}
