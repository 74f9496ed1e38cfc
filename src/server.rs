use crate::config::SolverConfig;
use crate::data::{Instance, InstanceInput, SchedulingOutput};
use crate::solver;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::info;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Body of a solve request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub instance: InstanceInput,
    #[serde(default)]
    pub config: SolverConfig,
}

async fn solve_handler(
    Json(request): Json<SolveRequest>,
) -> Result<Json<SchedulingOutput>, (StatusCode, String)> {
    let instance =
        Instance::try_from(request.instance).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let config = request.config;

    // the search is compute-bound, keep it off the async workers
    let solved = tokio::task::spawn_blocking(move || solver::solve(&instance, &config))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    match solved {
        Ok(solved) => Ok(Json(solved.output)),
        Err(e) => Err((StatusCode::BAD_REQUEST, e.to_string())),
    }
}

pub fn router() -> Router {
    Router::new().route("/v1/timetable/solve", post(solve_handler))
}

pub async fn run_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, router()).await
}
