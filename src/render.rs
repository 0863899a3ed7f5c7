use crate::cutsheet::CutSheetResult;
use crate::types::{PlacedPanel, Rect};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// ASCII sketch of one sheet: border plus every placement, labelled with
/// name and cut size.
pub fn render_sheet(result: &CutSheetResult, sheet_index: usize) -> String {
    let scale = f64::min(
        MAX_WIDTH / result.sheet_width(),
        MAX_HEIGHT / result.sheet_height(),
    );
    let grid_w = (result.sheet_width() * scale).round() as usize;
    let grid_h = (result.sheet_height() * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for p in result.sheet_placements(sheet_index) {
        let sx = (p.x * scale).round() as usize;
        let sy = (p.y * scale).round() as usize;
        let sw = (p.width * scale).round() as usize;
        let sh = (p.height * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);

        if sw > 2 && sh > 0 {
            let label = panel_label(p, sw - 1);
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            let start_x = cx.saturating_sub(label.len() / 2);

            for (i, &ch) in label.iter().enumerate() {
                let x = start_x + i;
                if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                    grid[cy][x] = ch;
                }
            }
        }
    }

    let mut out = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// `Name WxH`, suffixed ` R` when rotated; only the name when that is wider
/// than `room` cells.
fn panel_label(p: &PlacedPanel, room: usize) -> Vec<char> {
    let rot = if p.rotated { " R" } else { "" };
    let full = format!("{} {}{}", p.name, Rect::new(p.width, p.height), rot);
    if full.chars().count() <= room {
        full.chars().collect()
    } else {
        p.name.chars().collect()
    }
}

fn edge(current: char, crossing: char, own: char) -> char {
    if current == crossing || current == '+' {
        '+'
    } else {
        own
    }
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = match grid.first() {
        Some(row) => row.len(),
        None => return,
    };

    for i in (x..=x + w).filter(|&i| i < cols) {
        for j in [y, y + h] {
            if j < rows {
                grid[j][i] = edge(grid[j][i], '|', '-');
            }
        }
    }

    for j in (y..=y + h).filter(|&j| j < rows) {
        for i in [x, x + w] {
            if i < cols {
                grid[j][i] = edge(grid[j][i], '-', '|');
            }
        }
    }

    for cx in [x, x + w] {
        for cy in [y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}
