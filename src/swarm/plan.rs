use serde::Serialize;

use crate::error::{PlanField, SwarmError};

/// One distributed attack, as the caller asked for it.
///
/// The plan is fixed for the whole attack. Each worker receives an even
/// slice of it through [`WorkLoadPlan::share_for`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkLoadPlan {
    pub hosts: Vec<String>,
    pub port: u16,
    pub number: u64,
    pub duration_secs: Option<u64>,
    pub concurrent: u64,
    pub ramp_up_secs: Option<u64>,
    pub rate: Option<u64>,
    pub no_ssl: bool,
}

/// The slice of a [`WorkLoadPlan`] carried by one worker's start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerShare {
    pub host: String,
    pub port: u16,
    pub concurrent: u64,
    pub number: u64,
    pub ramp_up_secs: Option<u64>,
    pub no_ssl: bool,
    pub rate: Option<u64>,
    pub duration_secs: Option<u64>,
}

impl WorkLoadPlan {
    /// Checks the plan against the swarm it is about to be split across.
    ///
    /// # Errors
    ///
    /// Returns an error when no worker or host is available, a counted field
    /// is zero, or a divided field would leave some worker with a zero share.
    pub fn validate(&self, workers: usize) -> Result<(), SwarmError> {
        if workers == 0 {
            return Err(SwarmError::NoWorkers);
        }
        if self.hosts.is_empty() || self.hosts.iter().any(|host| host.trim().is_empty()) {
            return Err(SwarmError::MissingHost);
        }
        if self.concurrent == 0 {
            return Err(SwarmError::FieldMustBePositive {
                field: PlanField::Concurrent,
            });
        }
        if self.rate == Some(0) {
            return Err(SwarmError::FieldMustBePositive {
                field: PlanField::Rate,
            });
        }
        let has_duration = self.duration_secs.is_some_and(|secs| secs > 0);
        if self.number == 0 && !has_duration {
            return Err(SwarmError::MissingLoad);
        }

        ensure_share(PlanField::Concurrent, self.concurrent, workers)?;
        if !has_duration {
            ensure_share(PlanField::Number, self.number, workers)?;
        }
        if let Some(rate) = self.rate {
            ensure_share(PlanField::Rate, rate, workers)?;
        }
        Ok(())
    }

    /// Builds the start parameters for worker `index` out of `workers`.
    ///
    /// Counts are divided with integer division; the remainder is dropped.
    /// With several target hosts the workers are spread over them in turn.
    #[must_use]
    pub fn share_for(&self, index: usize, workers: usize) -> WorkerShare {
        let host = index
            .checked_rem(self.hosts.len())
            .and_then(|slot| self.hosts.get(slot))
            .cloned()
            .unwrap_or_default();
        WorkerShare {
            host,
            port: self.port,
            concurrent: split_even(self.concurrent, workers),
            number: split_even(self.number, workers),
            ramp_up_secs: self.ramp_up_secs,
            no_ssl: self.no_ssl,
            rate: self.rate.map(|rate| split_even(rate, workers)),
            duration_secs: self.duration_secs,
        }
    }

    /// Distinct target hosts, in the order they were given.
    #[must_use]
    pub fn distinct_hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = Vec::with_capacity(self.hosts.len());
        for host in &self.hosts {
            let host = host.trim();
            if !hosts.contains(&host) {
                hosts.push(host);
            }
        }
        hosts
    }
}

pub(crate) fn split_even(total: u64, workers: usize) -> u64 {
    let Ok(workers) = u64::try_from(workers) else {
        return 0;
    };
    total.checked_div(workers).unwrap_or(0)
}

fn ensure_share(field: PlanField, total: u64, workers: usize) -> Result<(), SwarmError> {
    if split_even(total, workers) == 0 {
        return Err(SwarmError::ShareTooSmall {
            field,
            total,
            workers,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};

    fn plan() -> WorkLoadPlan {
        WorkLoadPlan {
            hosts: vec!["target.example".to_owned()],
            port: 443,
            number: 1_000,
            duration_secs: None,
            concurrent: 100,
            ramp_up_secs: Some(10),
            rate: Some(50),
            no_ssl: false,
        }
    }

    #[test]
    fn share_drops_remainder() -> AppResult<()> {
        let plan = WorkLoadPlan {
            number: 1_001,
            concurrent: 10,
            rate: Some(7),
            ..plan()
        };
        let share = plan.share_for(0, 3);
        if share.number != 333 || share.concurrent != 3 || share.rate != Some(2) {
            return Err(AppError::swarm(format!("Unexpected share: {:?}", share)));
        }
        if share.ramp_up_secs != Some(10) {
            return Err(AppError::swarm("Ramp-up must not be divided"));
        }
        Ok(())
    }

    #[test]
    fn dispatched_total_stays_within_one_share_of_plan() -> AppResult<()> {
        for workers in 1..=17usize {
            let total = 1_000u64;
            let share = split_even(total, workers);
            let workers_u64 = u64::try_from(workers)
                .map_err(|err| AppError::swarm(format!("worker count: {}", err)))?;
            let dispatched = share.saturating_mul(workers_u64);
            if dispatched > total || total.saturating_sub(dispatched) >= workers_u64 {
                return Err(AppError::swarm(format!(
                    "Bad split for {} workers: dispatched {}",
                    workers, dispatched
                )));
            }
            if share == 0 {
                return Err(AppError::swarm("Share must be positive when N <= total"));
            }
        }
        Ok(())
    }

    #[test]
    fn hosts_rotate_across_workers() -> AppResult<()> {
        let plan = WorkLoadPlan {
            hosts: vec!["a".to_owned(), "b".to_owned()],
            ..plan()
        };
        let hosts: Vec<String> = (0..4).map(|idx| plan.share_for(idx, 4).host).collect();
        if hosts != ["a", "b", "a", "b"] {
            return Err(AppError::swarm(format!("Unexpected hosts: {:?}", hosts)));
        }
        Ok(())
    }

    #[test]
    fn validate_rejects_zero_share() -> AppResult<()> {
        let plan = WorkLoadPlan {
            concurrent: 2,
            ..plan()
        };
        match plan.validate(3) {
            Err(SwarmError::ShareTooSmall {
                field: PlanField::Concurrent,
                total: 2,
                workers: 3,
            }) => Ok(()),
            other => Err(AppError::swarm(format!("Unexpected result: {:?}", other))),
        }
    }

    #[test]
    fn validate_requires_number_or_duration() -> AppResult<()> {
        let missing = WorkLoadPlan {
            number: 0,
            ..plan()
        };
        if !matches!(missing.validate(1), Err(SwarmError::MissingLoad)) {
            return Err(AppError::swarm("Expected MissingLoad"));
        }
        let timed = WorkLoadPlan {
            number: 0,
            duration_secs: Some(60),
            ..plan()
        };
        timed.validate(4)?;
        Ok(())
    }

    #[test]
    fn validate_rejects_empty_swarm_and_hosts() -> AppResult<()> {
        if !matches!(plan().validate(0), Err(SwarmError::NoWorkers)) {
            return Err(AppError::swarm("Expected NoWorkers"));
        }
        let hostless = WorkLoadPlan {
            hosts: vec![],
            ..plan()
        };
        if !matches!(hostless.validate(1), Err(SwarmError::MissingHost)) {
            return Err(AppError::swarm("Expected MissingHost"));
        }
        Ok(())
    }

    #[test]
    fn distinct_hosts_keeps_first_appearance() -> AppResult<()> {
        let plan = WorkLoadPlan {
            hosts: vec!["b".to_owned(), "a".to_owned(), "b".to_owned()],
            ..plan()
        };
        if plan.distinct_hosts() != ["b", "a"] {
            return Err(AppError::swarm(format!(
                "Unexpected hosts: {:?}",
                plan.distinct_hosts()
            )));
        }
        Ok(())
    }
}
