use crate::app::use_cases::{
    CheckWarmupHealth, GetWarmupStatus, HealthCheckOutcome, SchedulePreview, SendWarmupBatch,
    StartWarmup, TickResult, WarmupStatusView,
};
use crate::domain::ports::{
    CampaignStore, ContactSource, DeliveryEvents, EmailProvider, ExecutionLog,
};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::sync::Arc;

/// 把四個用例組裝成單一入口，UI / 排程器只跟這個 facade 打交道。
pub struct WarmupEngine {
    start: StartWarmup,
    batch: SendWarmupBatch,
    health: CheckWarmupHealth,
    status: GetWarmupStatus,
    monitor: SystemMonitor,
}

impl WarmupEngine {
    pub fn new(
        contacts: Arc<dyn ContactSource>,
        campaigns: Arc<dyn CampaignStore>,
        provider: Arc<dyn EmailProvider>,
        log: Arc<dyn ExecutionLog>,
        events: Arc<dyn DeliveryEvents>,
    ) -> Self {
        Self::new_with_monitoring(contacts, campaigns, provider, log, events, false)
    }

    pub fn new_with_monitoring(
        contacts: Arc<dyn ContactSource>,
        campaigns: Arc<dyn CampaignStore>,
        provider: Arc<dyn EmailProvider>,
        log: Arc<dyn ExecutionLog>,
        events: Arc<dyn DeliveryEvents>,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            start: StartWarmup::new(campaigns.clone(), contacts.clone()),
            batch: SendWarmupBatch::new(
                contacts.clone(),
                campaigns.clone(),
                provider,
                log.clone(),
            ),
            health: CheckWarmupHealth::new(campaigns.clone(), events.clone()),
            status: GetWarmupStatus::new(campaigns, contacts, log, events),
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn start(&self, user_id: &str, campaign_id: &str) -> Result<SchedulePreview> {
        self.start.execute(user_id, campaign_id).await
    }

    /// 一個排程 tick。呼叫端負責同一 campaign 的 tick 序列化。
    pub async fn tick(&self, user_id: &str, campaign_id: &str) -> Result<TickResult> {
        if self.monitor.is_enabled() {
            self.monitor.log_stats("Warm-up tick started");
        }

        let result = self.batch.execute(user_id, campaign_id).await;

        if self.monitor.is_enabled() {
            self.monitor.log_stats("Warm-up tick finished");
        }

        result
    }

    pub async fn check_health(
        &self,
        user_id: &str,
        campaign_id: &str,
    ) -> Result<HealthCheckOutcome> {
        self.health.check_and_enforce(user_id, campaign_id).await
    }

    pub async fn status(&self, user_id: &str, campaign_id: &str) -> Result<WarmupStatusView> {
        self.status.execute(user_id, campaign_id).await
    }

    pub fn log_final_stats(&self) {
        self.monitor.log_final_stats();
    }
}
