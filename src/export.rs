use serde::Serialize;

use crate::types::{Layout, Rect};

/// One placed piece flattened for drawing: absolute sheet index, finished
/// geometry and enough material context to label a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderableRect {
    pub reference: String,
    pub name: String,
    pub sheet: usize,
    pub x: u32,
    pub y: u32,
    pub size: Rect,
    pub rotated: bool,
    pub color: String,
    pub thickness: u32,
}

pub fn export(layout: &Layout) -> Vec<RenderableRect> {
    layout
        .placements
        .iter()
        .map(|p| {
            let signature = &layout.sheets[p.sheet].signature;
            RenderableRect {
                reference: p.piece.reference.clone(),
                name: p.piece.name.clone(),
                sheet: p.sheet,
                x: p.x,
                y: p.y,
                size: p.size,
                rotated: p.rotated,
                color: signature.color.clone(),
                thickness: signature.thickness,
            }
        })
        .collect()
}
