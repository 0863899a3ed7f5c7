use crate::types::{Panel, PlacedPanel, Rect, SheetSpec};

/// Unused region of a sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub rect: Rect,
    pub sheet_index: usize,
}

/// Free-rectangle bookkeeping across every open sheet. Rectangles from
/// earlier sheets stay available, so small panels can back-fill them.
#[derive(Debug, Clone)]
pub struct GuillotineSheets {
    sheet: SheetSpec,
    pub free_rects: Vec<FreeRect>,
    sheets_opened: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fit {
    pub free_idx: usize,
    pub rotated: bool,
}

impl GuillotineSheets {
    pub fn new(sheet: SheetSpec) -> Self {
        Self {
            sheet,
            free_rects: vec![Self::full_sheet(sheet, 0)],
            sheets_opened: 1,
        }
    }

    fn full_sheet(sheet: SheetSpec, sheet_index: usize) -> FreeRect {
        FreeRect {
            x: 0.0,
            y: 0.0,
            rect: sheet.size(),
            sheet_index,
        }
    }

    pub fn sheets_opened(&self) -> usize {
        self.sheets_opened
    }

    /// First free rectangle, in list order, that admits the panel. The
    /// unrotated orientation is tried before the rotated one.
    pub fn find_first(&self, panel: &Panel) -> Option<Fit> {
        let size = panel.size();
        let kerf = self.sheet.kerf;
        self.free_rects.iter().enumerate().find_map(|(idx, free)| {
            if size.fits_in(&free.rect, kerf) {
                Some(Fit {
                    free_idx: idx,
                    rotated: false,
                })
            } else if panel.can_rotate && size.rotated().fits_in(&free.rect, kerf) {
                Some(Fit {
                    free_idx: idx,
                    rotated: true,
                })
            } else {
                None
            }
        })
    }

    /// Whether the panel fits a fresh sheet in some permitted orientation.
    pub fn fits_empty_sheet(&self, panel: &Panel) -> bool {
        let size = panel.size();
        let stock = self.sheet.size();
        size.fits_in(&stock, self.sheet.kerf)
            || (panel.can_rotate && size.rotated().fits_in(&stock, self.sheet.kerf))
    }

    /// Appends a full-size free rectangle for the next sheet index.
    pub fn open_sheet(&mut self) -> usize {
        let index = self.sheets_opened;
        self.free_rects.push(Self::full_sheet(self.sheet, index));
        self.sheets_opened += 1;
        index
    }

    pub fn place(&mut self, fit: Fit, panel: &Panel, panel_index: usize) -> PlacedPanel {
        let free = self.free_rects[fit.free_idx];
        let placed = if fit.rotated {
            panel.size().rotated()
        } else {
            panel.size()
        };

        // Order-preserving removal keeps the first-fit scan order stable.
        self.free_rects.remove(fit.free_idx);
        self.split(free, placed);

        PlacedPanel {
            name: panel.name.clone(),
            x: free.x,
            y: free.y,
            width: placed.w,
            height: placed.h,
            rotated: fit.rotated,
            sheet_index: free.sheet_index,
            panel_index,
        }
    }

    fn split(&mut self, free: FreeRect, placed: Rect) {
        let used_w = placed.w + self.sheet.kerf;
        let used_h = placed.h + self.sheet.kerf;

        // Right remainder spans only the placed row.
        let right = FreeRect {
            x: free.x + used_w,
            y: free.y,
            rect: Rect::new(free.rect.w - used_w, used_h),
            sheet_index: free.sheet_index,
        };
        // Bottom remainder spans the full free width.
        let bottom = FreeRect {
            x: free.x,
            y: free.y + used_h,
            rect: Rect::new(free.rect.w, free.rect.h - used_h),
            sheet_index: free.sheet_index,
        };

        for remainder in [right, bottom] {
            if remainder.rect.w > 0.0 && remainder.rect.h > 0.0 {
                self.free_rects.push(remainder);
            }
        }
    }
}
