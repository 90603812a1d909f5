use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{Layout, MaterialSignature};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetStats {
    pub sheet: usize,
    pub signature: MaterialSignature,
    pub pieces: usize,
    pub used_area: u64,
    pub usable_area: u64,
    pub waste: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureStats {
    pub signature: MaterialSignature,
    pub sheets: usize,
    pub used_area: u64,
    pub usable_area: u64,
    pub waste: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub per_sheet: Vec<SheetStats>,
    pub per_signature: Vec<SignatureStats>,
    pub sheet_count: usize,
    pub placed_count: usize,
    pub unfit_count: usize,
    pub used_area: u64,
    pub usable_area: u64,
    pub waste: f64,
}

fn waste_fraction(used: u64, usable: u64) -> f64 {
    if usable == 0 {
        return 0.0;
    }
    1.0 - used as f64 / usable as f64
}

/// Waste accounting over a layout. Used area counts the finished faces of
/// the placed pieces, so kerf and trim losses show up as waste.
pub fn report(layout: &Layout) -> Stats {
    let mut per_sheet = Vec::with_capacity(layout.sheet_count());
    for (sheet, instance) in layout.sheets.iter().enumerate() {
        let mut used_area = 0;
        let mut pieces = 0;
        for p in layout.placements_on(sheet) {
            used_area += p.size.area();
            pieces += 1;
        }
        let usable_area = instance.usable.area();
        per_sheet.push(SheetStats {
            sheet,
            signature: instance.signature.clone(),
            pieces,
            used_area,
            usable_area,
            waste: waste_fraction(used_area, usable_area),
        });
    }

    let mut grouped: BTreeMap<MaterialSignature, (usize, u64, u64)> = BTreeMap::new();
    for stats in &per_sheet {
        let entry = grouped.entry(stats.signature.clone()).or_default();
        entry.0 += 1;
        entry.1 += stats.used_area;
        entry.2 += stats.usable_area;
    }
    let per_signature = grouped
        .into_iter()
        .map(|(signature, (sheets, used, usable))| SignatureStats {
            signature,
            sheets,
            used_area: used,
            usable_area: usable,
            waste: waste_fraction(used, usable),
        })
        .collect();

    let used_area: u64 = per_sheet.iter().map(|s| s.used_area).sum();
    let usable_area: u64 = per_sheet.iter().map(|s| s.usable_area).sum();

    Stats {
        sheet_count: layout.sheet_count(),
        placed_count: layout.placements.len(),
        unfit_count: layout.unfit.len(),
        used_area,
        usable_area,
        waste: waste_fraction(used_area, usable_area),
        per_sheet,
        per_signature,
    }
}
