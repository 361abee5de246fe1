/// Dashboard analytics
///
/// Per-status task counts for the caller's scope. Managers additionally get a
/// breakdown for every account, computed from one grouped count plus one
/// account listing regardless of how many accounts exist.
///
/// Statuses with no tasks are left out of every `tasksByStatus` map rather
/// than reported as zero.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use uuid::Uuid;

use crate::auth::authorization::scope_for;
use crate::auth::middleware::AuthContext;
use crate::error::ServiceResult;
use crate::models::task::TaskStatus;
use crate::store::Store;

/// Task totals for one account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_tasks: i64,
    pub tasks_by_status: BTreeMap<TaskStatus, i64>,
}

impl UserStats {
    fn record(&mut self, status: TaskStatus, count: i64) {
        self.total_tasks += count;
        *self.tasks_by_status.entry(status).or_insert(0) += count;
    }
}

/// Analytics as returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_tasks: i64,
    pub tasks_by_status: BTreeMap<TaskStatus, i64>,

    /// Username -> stats for every account; managers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_users_stats: Option<BTreeMap<String, UserStats>>,
}

/// Computes the analytics report for a caller
pub async fn get_analytics(store: &dyn Store, caller: &AuthContext) -> ServiceResult<AnalyticsReport> {
    let scope = scope_for(caller);

    let mut totals = UserStats::default();
    for bucket in store.count_by_status(&scope).await? {
        if bucket.count > 0 {
            totals.record(bucket.status, bucket.count);
        }
    }

    let all_users_stats = if caller.is_manager() {
        Some(per_account_stats(store).await?)
    } else {
        None
    };

    debug!(
        user_id = %caller.user_id,
        total_tasks = totals.total_tasks,
        manager = caller.is_manager(),
        "Computed analytics"
    );

    Ok(AnalyticsReport {
        total_tasks: totals.total_tasks,
        tasks_by_status: totals.tasks_by_status,
        all_users_stats,
    })
}

async fn per_account_stats(store: &dyn Store) -> ServiceResult<BTreeMap<String, UserStats>> {
    let mut by_owner: HashMap<Uuid, UserStats> = HashMap::new();
    for bucket in store.count_by_owner_and_status().await? {
        if bucket.count > 0 {
            by_owner
                .entry(bucket.owner_id)
                .or_default()
                .record(bucket.status, bucket.count);
        }
    }

    let accounts = store.list_accounts().await?;
    Ok(accounts
        .into_iter()
        .map(|account| {
            let stats = by_owner.remove(&account.id).unwrap_or_default();
            (account.username, stats)
        })
        .collect())
}
