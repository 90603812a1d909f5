use crate::types::Rect;

#[derive(Debug, Clone, Copy)]
pub struct FreeRect {
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub free_idx: usize,
    pub rotated: bool,
    pub leftover: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct SeatedFootprint {
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
    pub rotated: bool,
}

/// Free-space bookkeeping for one stock sheet instance. Works entirely in
/// footprint coordinates; trim accounting belongs to the caller.
///
/// `free_rects` is kept sorted top-to-bottom then left-to-right, which is
/// the scan order tie-breaking relies on.
#[derive(Debug, Clone)]
pub struct SheetBin {
    kerf: u32,
    pub free_rects: Vec<FreeRect>,
}

impl SheetBin {
    pub fn new(usable: Rect, kerf: u32) -> Self {
        Self {
            kerf,
            free_rects: vec![FreeRect {
                x: 0,
                y: 0,
                rect: usable,
            }],
        }
    }

    /// Best-area-fit scan over the free rectangles. The score is the
    /// leftover area alone; scanning in list order with strict improvement
    /// keeps the earlier rectangle and the unrotated orientation on ties.
    pub fn find_best(&self, footprint: Rect, allow_rotate: bool) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for (idx, free) in self.free_rects.iter().enumerate() {
            if footprint.fits_in(&free.rect) {
                let leftover = free.rect.area() - footprint.area();
                if best.is_none() || leftover < best.unwrap().leftover {
                    best = Some(Candidate {
                        free_idx: idx,
                        rotated: false,
                        leftover,
                    });
                }
            }
            if allow_rotate {
                let rotated = footprint.rotated();
                if rotated.fits_in(&free.rect) {
                    let leftover = free.rect.area() - rotated.area();
                    if best.is_none() || leftover < best.unwrap().leftover {
                        best = Some(Candidate {
                            free_idx: idx,
                            rotated: true,
                            leftover,
                        });
                    }
                }
            }
        }

        best
    }

    pub fn place(&mut self, chosen: Candidate, footprint: Rect) -> SeatedFootprint {
        // Ordered removal keeps the remaining rectangles in scan order.
        let free = self.free_rects.remove(chosen.free_idx);
        let seated = if chosen.rotated {
            footprint.rotated()
        } else {
            footprint
        };

        self.split(free, seated);

        SeatedFootprint {
            x: free.x,
            y: free.y,
            rect: seated,
            rotated: chosen.rotated,
        }
    }

    /// Guillotine split of `free` around `seated`, reserving the kerf on
    /// both axes beyond the footprint. The cut axis maximizing the larger
    /// remnant is chosen; ties prefer the horizontal cut.
    fn split(&mut self, free: FreeRect, seated: Rect) {
        let right_w = free.rect.w.saturating_sub(seated.w + self.kerf);
        let below_h = free.rect.h.saturating_sub(seated.h + self.kerf);

        // Horizontal cut: the strip below spans the full width.
        let horizontal = [
            FreeRect {
                x: free.x + seated.w + self.kerf,
                y: free.y,
                rect: Rect::new(right_w, seated.h),
            },
            FreeRect {
                x: free.x,
                y: free.y + seated.h + self.kerf,
                rect: Rect::new(free.rect.w, below_h),
            },
        ];
        // Vertical cut: the strip to the right spans the full height.
        let vertical = [
            FreeRect {
                x: free.x + seated.w + self.kerf,
                y: free.y,
                rect: Rect::new(right_w, free.rect.h),
            },
            FreeRect {
                x: free.x,
                y: free.y + seated.h + self.kerf,
                rect: Rect::new(seated.w, below_h),
            },
        ];

        let larger_h = horizontal[0].rect.area().max(horizontal[1].rect.area());
        let larger_v = vertical[0].rect.area().max(vertical[1].rect.area());
        let remnants = if larger_h >= larger_v {
            horizontal
        } else {
            vertical
        };

        for remnant in remnants {
            if remnant.rect.w > 0 && remnant.rect.h > 0 {
                self.free_rects.push(remnant);
            }
        }
        self.free_rects.sort_by_key(|f| (f.y, f.x));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_single_piece() {
        let mut bin = SheetBin::new(Rect::new(100, 100), 0);
        let footprint = Rect::new(50, 30);
        let chosen = bin.find_best(footprint, false).unwrap();
        let seated = bin.place(chosen, footprint);
        assert_eq!(seated.x, 0);
        assert_eq!(seated.y, 0);
        assert_eq!(seated.rect.w, 50);
        assert_eq!(seated.rect.h, 30);
        assert!(!seated.rotated);
        assert!(!bin.free_rects.is_empty());
    }

    #[test]
    fn test_piece_too_large() {
        let bin = SheetBin::new(Rect::new(100, 100), 0);
        assert!(bin.find_best(Rect::new(200, 50), false).is_none());
    }

    #[test]
    fn test_rotation_fit() {
        let bin = SheetBin::new(Rect::new(100, 50), 0);
        let footprint = Rect::new(50, 100);
        // Doesn't fit without rotation
        assert!(bin.find_best(footprint, false).is_none());
        // Fits with rotation
        let chosen = bin.find_best(footprint, true).unwrap();
        assert!(chosen.rotated);
        assert_eq!(chosen.leftover, 0);
    }

    #[test]
    fn test_kerf_consumes_free_space() {
        let mut bin = SheetBin::new(Rect::new(100, 100), 5);
        let footprint = Rect::new(50, 100);
        let chosen = bin.find_best(footprint, false).unwrap();
        bin.place(chosen, footprint);
        // Remaining width should be 100 - 50 - 5 = 45
        let has_45_wide = bin.free_rects.iter().any(|f| f.rect.w == 45);
        assert!(has_45_wide);
    }

    #[test]
    fn test_fill_exact() {
        let mut bin = SheetBin::new(Rect::new(100, 100), 0);
        let footprint = Rect::new(100, 100);
        let chosen = bin.find_best(footprint, false).unwrap();
        bin.place(chosen, footprint);
        assert!(bin.free_rects.is_empty());
    }

    #[test]
    fn test_best_area_fit_prefers_tightest_rectangle() {
        let mut bin = SheetBin::new(Rect::new(300, 300), 0);
        bin.free_rects = vec![
            FreeRect {
                x: 0,
                y: 0,
                rect: Rect::new(100, 100),
            },
            FreeRect {
                x: 0,
                y: 150,
                rect: Rect::new(60, 60),
            },
        ];
        let chosen = bin.find_best(Rect::new(50, 50), false).unwrap();
        assert_eq!(chosen.free_idx, 1);
        assert_eq!(chosen.leftover, 60 * 60 - 50 * 50);
    }

    #[test]
    fn test_equal_score_keeps_earlier_rectangle() {
        let mut bin = SheetBin::new(Rect::new(300, 100), 0);
        bin.free_rects = vec![
            FreeRect {
                x: 0,
                y: 0,
                rect: Rect::new(80, 80),
            },
            FreeRect {
                x: 100,
                y: 0,
                rect: Rect::new(80, 80),
            },
        ];
        let chosen = bin.find_best(Rect::new(50, 50), false).unwrap();
        assert_eq!(chosen.free_idx, 0);
    }

    #[test]
    fn test_equal_score_keeps_unrotated() {
        let bin = SheetBin::new(Rect::new(100, 100), 0);
        let chosen = bin.find_best(Rect::new(60, 40), true).unwrap();
        assert!(!chosen.rotated);
    }

    #[test]
    fn test_split_tie_prefers_full_width_strip() {
        let mut bin = SheetBin::new(Rect::new(100, 100), 0);
        let footprint = Rect::new(40, 40);
        let chosen = bin.find_best(footprint, false).unwrap();
        bin.place(chosen, footprint);
        // Horizontal and vertical cuts both yield a 6000-area remnant; the
        // horizontal cut wins, so the lower strip spans the full width.
        assert_eq!(bin.free_rects.len(), 2);
        let below = bin
            .free_rects
            .iter()
            .find(|f| f.y == 40)
            .expect("missing lower strip");
        assert_eq!(below.x, 0);
        assert_eq!(below.rect, Rect::new(100, 60));
    }

    #[test]
    fn test_split_favors_larger_remnant() {
        let mut bin = SheetBin::new(Rect::new(100, 200), 0);
        let footprint = Rect::new(40, 40);
        let chosen = bin.find_best(footprint, false).unwrap();
        bin.place(chosen, footprint);
        // Below strip 100x160 (horizontal cut) beats right strip 60x200
        // (vertical cut), so the full-width cut is taken.
        assert!(bin
            .free_rects
            .iter()
            .any(|f| f.x == 0 && f.y == 40 && f.rect == Rect::new(100, 160)));
        assert!(bin
            .free_rects
            .iter()
            .any(|f| f.x == 40 && f.y == 0 && f.rect == Rect::new(60, 40)));
    }

    #[test]
    fn test_free_rects_stay_in_scan_order() {
        let mut bin = SheetBin::new(Rect::new(200, 200), 0);
        for footprint in [Rect::new(120, 60), Rect::new(50, 50)] {
            let chosen = bin.find_best(footprint, false).unwrap();
            bin.place(chosen, footprint);
        }
        let keys: Vec<(u32, u32)> = bin.free_rects.iter().map(|f| (f.y, f.x)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
