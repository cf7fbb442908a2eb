use crate::swarm::{AttackOptions, TransportSettings, WorkLoadPlan, WorkerRoster};

/// Everything one CLI invocation needs once arguments and config are merged.
pub(in crate::entry) struct AttackRun {
    pub(in crate::entry) plan: WorkLoadPlan,
    pub(in crate::entry) roster: Box<dyn WorkerRoster>,
    pub(in crate::entry) transport: TransportSettings,
    pub(in crate::entry) options: AttackOptions,
    pub(in crate::entry) export_json: Option<String>,
    pub(in crate::entry) export_csv: Option<String>,
    pub(in crate::entry) verbose: bool,
    pub(in crate::entry) no_color: bool,
}
