use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Grouping key for packing runs: pieces and stock sheets are only ever
/// matched within the same signature. `grained` marks a directional decor
/// and is the default grain lock for pieces of this material.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaterialSignature {
    pub thickness: u32,
    pub color: String,
    pub grained: bool,
}

impl std::fmt::Display for MaterialSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}mm", self.color, self.thickness)
    }
}

/// One physical panel to cut. Quantities are expanded before packing, so a
/// request never stands for more than one panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRequest {
    pub name: String,
    pub reference: String,
    /// Finished dimensions, before trim allowance.
    pub size: Rect,
    pub signature: MaterialSignature,
    pub grain_locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockSheetSpec {
    /// Raw sheet dimensions, before edge squaring.
    pub size: Rect,
    /// Cap on sheet instances per material group; `None` is unbounded.
    pub max_sheets: Option<u32>,
}

impl Default for StockSheetSpec {
    fn default() -> Self {
        Self {
            size: Rect::new(2800, 2070),
            max_sheets: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackParams {
    /// Material consumed by the saw blade between adjacent pieces.
    pub kerf_width: u32,
    /// Allowance added to each of the four edges of a piece before cutting.
    pub trim_per_edge: u32,
    /// One-time deduction from the raw sheet width to true up an edge.
    pub edge_squaring: u32,
    /// When true, each piece's own grain lock governs rotation; when false,
    /// every piece may rotate freely.
    pub respect_grain: bool,
}

impl Default for PackParams {
    fn default() -> Self {
        Self {
            kerf_width: 4,
            trim_per_edge: 2,
            edge_squaring: 10,
            respect_grain: true,
        }
    }
}

/// A piece seated on a sheet instance. Position and extent are the finished
/// dimensions; the trim and kerf margins have already been consumed from the
/// surrounding free space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub piece: PieceRequest,
    pub sheet: usize,
    pub x: u32,
    pub y: u32,
    pub size: Rect,
    pub rotated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetInstance {
    pub signature: MaterialSignature,
    pub raw: Rect,
    /// Raw dimensions minus the edge-squaring deduction on the width axis.
    /// Placement coordinates are relative to the squared corner.
    pub usable: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnfitReason {
    /// No legal orientation of the footprint fits an empty sheet.
    Oversize,
    /// The material group's sheet cap was reached before this piece.
    CapacityReached,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfitPiece {
    pub piece: PieceRequest,
    pub reason: UnfitReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub sheets: Vec<SheetInstance>,
    pub placements: Vec<Placement>,
    pub unfit: Vec<UnfitPiece>,
}

impl Layout {
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn placements_on(&self, sheet: usize) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.sheet == sheet)
    }

    /// Appends another fragment, re-offsetting its sheet indices so they
    /// stay absolute within the combined layout.
    pub fn merge(&mut self, fragment: Layout) {
        let offset = self.sheets.len();
        self.sheets.extend(fragment.sheets);
        self.placements
            .extend(fragment.placements.into_iter().map(|mut p| {
                p.sheet += offset;
                p
            }));
        self.unfit.extend(fragment.unfit);
    }
}

pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative number, got {value}"
        )));
    }
    Ok(value.round() as u32)
}
