use crate::core::health::HealthAssessment;
use crate::core::schedule::{DayQuota, WarmupSchedule};
use crate::domain::model::CampaignStatus;
use crate::domain::ports::{CampaignStore, ContactSource, DeliveryEvents, ExecutionLog};
use crate::utils::error::{Result, WarmupError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use super::check_health::CheckWarmupHealth;

/// 給 UI 的複合狀態物件。未啟動時一律回傳歸零的進度欄位，
/// 只有 campaign 本身不存在才會失敗。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarmupStatusView {
    pub campaign_id: String,
    pub subject: String,
    pub status: CampaignStatus,
    pub warmup_enabled: bool,
    pub warmup_paused: bool,
    pub pause_reason: Option<String>,
    pub current_day: u32,
    pub schedule_days: u32,
    pub completed: bool,
    pub total_contacts: u64,
    pub emails_sent: u64,
    pub progress_percent: f64,
    pub next_batch_quota: u64,
    pub daily_quotas: Vec<DayQuota>,
    pub started_at: Option<DateTime<Utc>>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub health: HealthAssessment,
}

pub struct GetWarmupStatus {
    campaigns: Arc<dyn CampaignStore>,
    contacts: Arc<dyn ContactSource>,
    log: Arc<dyn ExecutionLog>,
    health: CheckWarmupHealth,
}

impl GetWarmupStatus {
    pub fn new(
        campaigns: Arc<dyn CampaignStore>,
        contacts: Arc<dyn ContactSource>,
        log: Arc<dyn ExecutionLog>,
        events: Arc<dyn DeliveryEvents>,
    ) -> Self {
        let health = CheckWarmupHealth::new(campaigns.clone(), events);
        Self {
            campaigns,
            contacts,
            log,
            health,
        }
    }

    /// 純聚合讀取，不做任何寫入
    pub async fn execute(&self, user_id: &str, campaign_id: &str) -> Result<WarmupStatusView> {
        let campaign = self
            .campaigns
            .find_by_id(campaign_id, user_id)
            .await?
            .ok_or_else(|| WarmupError::not_found("Campaign", campaign_id))?;

        let total_contacts = self.contacts.count_subscribed(user_id).await?;
        let emails_sent = self.log.sent_count(campaign_id).await?;
        let health = self.health.check(user_id, campaign_id).await?;

        let schedule = WarmupSchedule::new(total_contacts);
        let started_at = campaign.warmup_started_at();

        let progress_percent = if total_contacts == 0 {
            0.0
        } else {
            emails_sent as f64 / total_contacts as f64 * 100.0
        };

        Ok(WarmupStatusView {
            campaign_id: campaign.id.clone(),
            subject: campaign.subject.clone(),
            status: campaign.status,
            warmup_enabled: campaign.is_warmup_enabled(),
            warmup_paused: campaign.is_warmup_paused(),
            pause_reason: campaign.warmup_pause_reason().map(str::to_string),
            current_day: campaign.warmup_day(),
            schedule_days: schedule.day_count(),
            completed: campaign.is_warmup_complete(),
            total_contacts,
            emails_sent,
            progress_percent,
            // 未啟動 (day 0) 與已完成 (day 8) 的下一批配額都是 0
            next_batch_quota: schedule.quota_for_day(campaign.warmup_day()),
            daily_quotas: schedule.daily_quotas(),
            started_at,
            estimated_completion: started_at.map(|s| schedule.estimated_completion(s)),
            health,
        })
    }
}
