use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use crate::error::{AppError, AppResult, SwarmError};
use crate::swarm::{
    ControlTransport, HttpControlTransport, print_report, run_attack, write_json,
    write_timeline_csv,
};

use super::types::AttackRun;

pub(crate) async fn execute_plan(run: &AttackRun) -> AppResult<()> {
    let workers = run.roster.resolve().await?;
    if workers.is_empty() {
        error!("No workers are ready to attack.");
        return Err(AppError::swarm(SwarmError::NoWorkers));
    }

    let transport: Arc<dyn ControlTransport> =
        Arc::new(HttpControlTransport::new(&run.transport)?);
    let report = run_attack(&run.plan, &workers, &transport, run.options).await?;
    print_report(&report);

    if let Some(path) = run.export_json.as_deref() {
        write_json(Path::new(path), &run.plan, &report).await?;
        info!("Wrote JSON report to {}", path);
    }
    if let Some(path) = run.export_csv.as_deref() {
        write_timeline_csv(Path::new(path), &report).await?;
        info!("Wrote timeline CSV to {}", path);
    }
    Ok(())
}
