use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use cutplan::aggregate::{PanelSpec, SourceUnit, aggregate};
use cutplan::catalog::StockCatalog;
use cutplan::export::{RenderableRect, export};
use cutplan::packer;
use cutplan::report::{self, Stats};
use cutplan::types::{PackParams, SheetInstance, StockSheetSpec, UnfitPiece};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct OptimizeRequest {
    #[serde(default)]
    stock: StockSheetSpec,
    panels: Vec<PanelSpec>,
    #[serde(default)]
    params: PackParams,
    #[serde(default)]
    project: u32,
    #[serde(default)]
    unit: u32,
}

#[derive(Serialize)]
struct OptimizeResponse {
    sheets: Vec<SheetInstance>,
    placements: Vec<RenderableRect>,
    unfit: Vec<UnfitPiece>,
    stats: Stats,
}

async fn optimize(
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    if req.stock.size.w == 0 || req.stock.size.h == 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "stock dimensions must be non-zero".to_string(),
        ));
    }
    for panel in &req.panels {
        if panel.size.w == 0 || panel.size.h == 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("panel '{}' has zero dimensions", panel.name),
            ));
        }
    }

    let groups = aggregate(&[SourceUnit {
        project: req.project,
        unit: req.unit,
        panels: req.panels,
    }]);
    let catalog = StockCatalog::new().with_default(req.stock);
    let layout = packer::optimize(&groups, &catalog, &req.params)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(OptimizeResponse {
        stats: report::report(&layout),
        placements: export(&layout),
        unfit: layout.unfit.clone(),
        sheets: layout.sheets,
    }))
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
