use crate::core::schedule::{DayQuota, WarmupSchedule};
use crate::domain::ports::{CampaignStore, ContactSource};
use crate::utils::error::{Result, WarmupError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// 啟動成功後回給 UI 的排程預覽
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulePreview {
    pub campaign_id: String,
    pub total_contacts: u64,
    pub estimated_days: u32,
    pub daily_quotas: Vec<DayQuota>,
    pub estimated_completion: DateTime<Utc>,
}

pub struct StartWarmup {
    campaigns: Arc<dyn CampaignStore>,
    contacts: Arc<dyn ContactSource>,
}

impl StartWarmup {
    pub fn new(campaigns: Arc<dyn CampaignStore>, contacts: Arc<dyn ContactSource>) -> Self {
        Self { campaigns, contacts }
    }

    /// 所有前置檢查通過之前不做任何寫入，失敗時沒有半套狀態
    pub async fn execute(&self, user_id: &str, campaign_id: &str) -> Result<SchedulePreview> {
        let mut campaign = self
            .campaigns
            .find_by_id(campaign_id, user_id)
            .await?
            .ok_or_else(|| WarmupError::not_found("Campaign", campaign_id))?;

        if campaign.status != crate::domain::model::CampaignStatus::Draft {
            return Err(WarmupError::validation(
                "campaign has already been sent; only drafts can be warmed up",
            ));
        }

        if campaign.is_warmup_enabled() {
            return Err(WarmupError::state_conflict(format!(
                "warm-up already started for campaign {} (day {})",
                campaign.id,
                campaign.warmup_day()
            )));
        }

        if campaign.subject.trim().is_empty() {
            return Err(WarmupError::validation("campaign subject is empty"));
        }

        if campaign.html_body.trim().is_empty() {
            return Err(WarmupError::validation(
                "campaign has no compiled HTML body",
            ));
        }

        let total_contacts = self.contacts.count_subscribed(user_id).await?;
        if total_contacts == 0 {
            return Err(WarmupError::validation(
                "no subscribed contacts; import or collect fans before warming up",
            ));
        }

        let now = Utc::now();
        campaign.enable_warmup(now)?;
        self.campaigns.update(&campaign).await?;

        let schedule = WarmupSchedule::new(total_contacts);

        tracing::info!(
            campaign_id = %campaign.id,
            total_contacts,
            "Warm-up started, day 1 of {}",
            schedule.day_count()
        );

        Ok(SchedulePreview {
            campaign_id: campaign.id,
            total_contacts,
            estimated_days: schedule.day_count(),
            daily_quotas: schedule.daily_quotas(),
            estimated_completion: schedule.estimated_completion(now),
        })
    }
}
