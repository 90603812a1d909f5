use clap::Parser;
use cutplan::aggregate::{aggregate, PanelSpec, SourceUnit};
use cutplan::catalog::StockCatalog;
use cutplan::packer;
use cutplan::render;
use cutplan::report;
use cutplan::types::{PackParams, Rect, StockSheetSpec, UnfitReason};

#[derive(Parser)]
#[command(
    name = "cutplan",
    about = "Guillotine cutting-stock optimizer for sheet goods"
)]
struct Cli {
    /// Stock sheet dimensions (WxH, e.g. 2800x2070)
    #[arg(long, default_value = "2800x2070")]
    stock: String,

    /// Panels as WxH:qty with an optional :locked or :free grain suffix
    #[arg(long, num_args = 1..)]
    pieces: Vec<String>,

    /// Saw kerf width in mm
    #[arg(long, default_value_t = 4)]
    kerf: u32,

    /// Finishing trim per edge in mm
    #[arg(long, default_value_t = 2)]
    trim: u32,

    /// Edge squaring cut off the sheet width in mm
    #[arg(long, default_value_t = 10)]
    squaring: u32,

    /// Ignore grain direction and rotate pieces freely
    #[arg(long)]
    free_rotation: bool,

    /// Panel thickness in mm
    #[arg(long, default_value_t = 19)]
    thickness: u32,

    /// Panel color
    #[arg(long, default_value = "Standard")]
    color: String,

    /// Cap on stock sheets per material
    #[arg(long)]
    max_sheets: Option<u32>,

    /// Show ASCII layout of each sheet
    #[arg(long)]
    layout: bool,
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let w = parts[0]
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let h = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if w == 0 || h == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(Rect::new(w, h))
}

fn parse_piece(s: &str, seq: usize, thickness: u32, color: &str) -> Result<PanelSpec, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(format!(
            "invalid piece '{}', expected WxH:qty[:locked|:free]",
            s
        ));
    }
    let size = parse_dimensions(parts[0])?;
    let qty = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if qty == 0 {
        return Err(format!("quantity must be non-zero in '{}'", s));
    }
    let grain_lock = match parts.get(2) {
        None => None,
        Some(&"locked") => Some(true),
        Some(&"free") => Some(false),
        Some(other) => {
            return Err(format!("invalid grain '{}', expected locked or free", other));
        }
    };

    Ok(PanelSpec {
        name: format!("piece {}", seq + 1),
        reference: None,
        size,
        thickness,
        color: color.to_string(),
        grained: true,
        grain_lock,
        qty,
    })
}

fn main() {
    let cli = Cli::parse();

    let stock = parse_dimensions(&cli.stock).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let panels: Vec<PanelSpec> = cli
        .pieces
        .iter()
        .enumerate()
        .map(|(seq, p)| parse_piece(p, seq, cli.thickness, &cli.color))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let groups = aggregate(&[SourceUnit {
        project: 1,
        unit: 1,
        panels,
    }]);
    let catalog = StockCatalog::new().with_default(StockSheetSpec {
        size: stock,
        max_sheets: cli.max_sheets,
    });
    let params = PackParams {
        kerf_width: cli.kerf,
        trim_per_edge: cli.trim,
        edge_squaring: cli.squaring,
        respect_grain: !cli.free_rotation,
    };

    let layout = packer::optimize(&groups, &catalog, &params).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    for sheet in 0..layout.sheet_count() {
        println!("Sheet {} ({}):", sheet + 1, layout.sheets[sheet].signature);
        for p in layout.placements_on(sheet) {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!("  {} {} @ ({}, {}){}", p.piece.reference, p.size, p.x, p.y, rot);
        }
        if cli.layout {
            print!("{}", render::render_sheet(&layout, sheet));
        }
        println!();
    }

    for u in &layout.unfit {
        let why = match u.reason {
            UnfitReason::Oversize => "too large for the stock sheet",
            UnfitReason::CapacityReached => "sheet cap reached",
        };
        println!("Set aside: {} {} ({})", u.piece.reference, u.piece.size, why);
    }

    let stats = report::report(&layout);
    println!(
        "Summary: {} sheet{} used, {:.1}% waste",
        stats.sheet_count,
        if stats.sheet_count == 1 { "" } else { "s" },
        stats.waste * 100.0,
    );
}
