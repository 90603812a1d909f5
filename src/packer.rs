use std::collections::BTreeMap;

use crate::catalog::StockCatalog;
use crate::error::{Error, Result};
use crate::guillotine::{Candidate, SheetBin};
use crate::types::{
    Layout, MaterialSignature, PackParams, PieceRequest, Placement, Rect, SheetInstance,
    StockSheetSpec, UnfitPiece, UnfitReason,
};

struct WorkItem {
    piece: PieceRequest,
    footprint: Rect,
    rotatable: bool,
}

fn validate(spec: &StockSheetSpec, params: &PackParams) -> Result<()> {
    if spec.size.w == 0 || spec.size.h == 0 {
        return Err(Error::EmptyStock { size: spec.size });
    }
    if params.edge_squaring >= spec.size.w {
        return Err(Error::SquaringExceedsStock {
            squaring: params.edge_squaring,
            size: spec.size,
        });
    }
    Ok(())
}

/// Packs one material group onto as many stock sheets as needed.
///
/// Pieces are seated largest-first (footprint height, then width) into the
/// tightest free rectangle across all open sheets; a new sheet is opened
/// only when nothing fits. Pieces that cannot fit even an empty sheet, or
/// that arrive after the sheet cap is exhausted, are set aside rather than
/// failing the run.
pub fn pack(pieces: &[PieceRequest], spec: &StockSheetSpec, params: &PackParams) -> Result<Layout> {
    validate(spec, params)?;
    if pieces.is_empty() {
        return Ok(Layout::default());
    }

    // The squaring cut re-edges the raw sheet along its width.
    let usable = Rect::new(spec.size.w - params.edge_squaring, spec.size.h);
    let signature = pieces[0].signature.clone();

    let mut work: Vec<WorkItem> = pieces
        .iter()
        .map(|piece| WorkItem {
            piece: piece.clone(),
            footprint: Rect::new(
                piece.size.w + 2 * params.trim_per_edge,
                piece.size.h + 2 * params.trim_per_edge,
            ),
            rotatable: if params.respect_grain {
                !piece.grain_locked
            } else {
                true
            },
        })
        .collect();
    // Stable sort, so equal footprints keep their authored order.
    work.sort_by(|a, b| (b.footprint.h, b.footprint.w).cmp(&(a.footprint.h, a.footprint.w)));

    let mut bins: Vec<SheetBin> = Vec::new();
    let mut placements: Vec<Placement> = Vec::new();
    let mut unfit: Vec<UnfitPiece> = Vec::new();

    for item in work {
        let mut target: Option<(usize, Candidate)> = None;
        for (sheet, bin) in bins.iter().enumerate() {
            if let Some(candidate) = bin.find_best(item.footprint, item.rotatable) {
                if target.is_none() || candidate.leftover < target.unwrap().1.leftover {
                    target = Some((sheet, candidate));
                }
            }
        }

        if target.is_none() {
            let fits_fresh = item.footprint.fits_in(&usable)
                || (item.rotatable && item.footprint.rotated().fits_in(&usable));
            if !fits_fresh {
                tracing::warn!(
                    "piece {} exceeds the {} usable sheet, set aside",
                    item.piece.reference,
                    usable
                );
                unfit.push(UnfitPiece {
                    piece: item.piece,
                    reason: UnfitReason::Oversize,
                });
                continue;
            }
            if let Some(cap) = spec.max_sheets {
                if bins.len() as u32 >= cap {
                    tracing::warn!(
                        "piece {} set aside, sheet cap of {} reached",
                        item.piece.reference,
                        cap
                    );
                    unfit.push(UnfitPiece {
                        piece: item.piece,
                        reason: UnfitReason::CapacityReached,
                    });
                    continue;
                }
            }
            bins.push(SheetBin::new(usable, params.kerf_width));
            let sheet = bins.len() - 1;
            target = bins[sheet]
                .find_best(item.footprint, item.rotatable)
                .map(|candidate| (sheet, candidate));
        }

        if let Some((sheet, chosen)) = target {
            let seated = bins[sheet].place(chosen, item.footprint);
            let finished = if seated.rotated {
                item.piece.size.rotated()
            } else {
                item.piece.size
            };
            placements.push(Placement {
                piece: item.piece,
                sheet,
                x: seated.x + params.trim_per_edge,
                y: seated.y + params.trim_per_edge,
                size: finished,
                rotated: seated.rotated,
            });
        }
    }

    let sheets = bins
        .iter()
        .map(|_| SheetInstance {
            signature: signature.clone(),
            raw: spec.size,
            usable,
        })
        .collect();

    tracing::info!(
        "packed {}: {} sheet(s), {} placed, {} unfit",
        signature,
        bins.len(),
        placements.len(),
        unfit.len()
    );

    Ok(Layout {
        sheets,
        placements,
        unfit,
    })
}

/// Packs every material group against its catalog stock and merges the
/// per-group layouts into one, with sheet indices running across groups.
/// Catalog and stock problems fail the whole run before any packing.
pub fn optimize(
    groups: &BTreeMap<MaterialSignature, Vec<PieceRequest>>,
    catalog: &StockCatalog,
    params: &PackParams,
) -> Result<Layout> {
    let mut resolved = Vec::new();
    for (signature, pieces) in groups {
        let spec = catalog.spec_for(signature)?;
        validate(&spec, params)?;
        resolved.push((pieces, spec));
    }

    let mut layout = Layout::default();
    for (pieces, spec) in resolved {
        let fragment = pack(pieces, &spec, params)?;
        layout.merge(fragment);
    }
    Ok(layout)
}
