use crate::types::Layout;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

struct Canvas {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
}

impl Canvas {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![' '; cols * rows],
        }
    }

    fn get(&self, x: usize, y: usize) -> char {
        if x < self.cols && y < self.rows {
            self.cells[y * self.cols + x]
        } else {
            ' '
        }
    }

    fn put(&mut self, x: usize, y: usize, ch: char) {
        if x < self.cols && y < self.rows {
            self.cells[y * self.cols + x] = ch;
        }
    }

    fn hline(&mut self, x0: usize, x1: usize, y: usize) {
        for x in x0..=x1 {
            let c = self.get(x, y);
            self.put(x, y, if c == '|' || c == '+' { '+' } else { '-' });
        }
    }

    fn vline(&mut self, x: usize, y0: usize, y1: usize) {
        for y in y0..=y1 {
            let c = self.get(x, y);
            self.put(x, y, if c == '-' || c == '+' { '+' } else { '|' });
        }
    }

    fn frame(&mut self, x: usize, y: usize, w: usize, h: usize) {
        self.hline(x, x + w, y);
        self.hline(x, x + w, y + h);
        self.vline(x, y, y + h);
        self.vline(x + w, y, y + h);
        for cx in [x, x + w] {
            for cy in [y, y + h] {
                self.put(cx, cy, '+');
            }
        }
    }

    // Centered label, clipped to the frame interior.
    fn label(&mut self, text: &str, x: usize, y: usize, w: usize, h: usize) {
        let chars: Vec<char> = text.chars().collect();
        let cx = x + w / 2;
        let cy = y + h / 2;
        let start = cx.saturating_sub(chars.len() / 2);
        for (i, ch) in chars.into_iter().enumerate() {
            let px = start + i;
            if px > x && px < x + w && cy > y && cy < y + h {
                self.put(px, cy, ch);
            }
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for row in self.cells.chunks(self.cols) {
            let line: String = row.iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// ASCII diagram of one sheet, scaled to fit an 80x40 grid. Pieces are
/// framed and labelled with their reference, rotated ones with an extra R.
/// An out-of-range sheet index renders nothing.
pub fn render_sheet(layout: &Layout, sheet: usize) -> String {
    let Some(instance) = layout.sheets.get(sheet) else {
        return String::new();
    };
    let usable = instance.usable;
    let scale = f64::min(MAX_WIDTH / usable.w as f64, MAX_HEIGHT / usable.h as f64);
    let grid_w = (usable.w as f64 * scale).round() as usize;
    let grid_h = (usable.h as f64 * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut canvas = Canvas::new(grid_w + 1, grid_h + 1);
    canvas.frame(0, 0, grid_w, grid_h);

    for p in layout.placements_on(sheet) {
        let sx = (p.x as f64 * scale).round() as usize;
        let sy = (p.y as f64 * scale).round() as usize;
        let sw = (p.size.w as f64 * scale).round() as usize;
        let sh = (p.size.h as f64 * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }
        canvas.frame(sx, sy, sw, sh);

        let label = if p.rotated {
            format!("{} R", p.piece.reference)
        } else {
            p.piece.reference.clone()
        };
        canvas.label(&label, sx, sy, sw, sh);
    }

    canvas.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MaterialSignature, PieceRequest, Placement, Rect, SheetInstance};

    fn one_sheet_layout(placements: Vec<Placement>) -> Layout {
        Layout {
            sheets: vec![SheetInstance {
                signature: MaterialSignature {
                    thickness: 19,
                    color: "White".to_string(),
                    grained: true,
                },
                raw: Rect::new(1000, 500),
                usable: Rect::new(1000, 500),
            }],
            placements,
            unfit: vec![],
        }
    }

    fn placement(reference: &str, x: u32, y: u32, w: u32, h: u32, rotated: bool) -> Placement {
        Placement {
            piece: PieceRequest {
                name: reference.to_string(),
                reference: reference.to_string(),
                size: Rect::new(w, h),
                signature: MaterialSignature {
                    thickness: 19,
                    color: "White".to_string(),
                    grained: true,
                },
                grain_locked: false,
            },
            sheet: 0,
            x,
            y,
            size: Rect::new(w, h),
            rotated,
        }
    }

    #[test]
    fn test_render_draws_sheet_border() {
        let output = render_sheet(&one_sheet_layout(vec![]), 0);
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.lines().all(|l| l.len() <= 81));
    }

    #[test]
    fn test_render_labels_piece_reference() {
        let layout = one_sheet_layout(vec![placement("P1/U1/N01", 2, 2, 600, 400, false)]);
        let output = render_sheet(&layout, 0);
        assert!(output.contains("P1/U1/N01"));
    }

    #[test]
    fn test_render_marks_rotated_pieces() {
        let layout = one_sheet_layout(vec![placement("N02", 2, 2, 600, 400, true)]);
        let output = render_sheet(&layout, 0);
        assert!(output.contains("N02 R"));
    }

    #[test]
    fn test_render_unknown_sheet_is_empty() {
        assert_eq!(render_sheet(&Layout::default(), 0), "");
    }
}
