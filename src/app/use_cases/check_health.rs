use crate::core::health::{assess, HealthAssessment};
use crate::domain::ports::{CampaignStore, DeliveryEvents};
use crate::utils::error::{Result, WarmupError};
use serde::Serialize;
use std::sync::Arc;

/// check_and_enforce 的結果：評估內容加上是否真的寫入了暫停
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCheckOutcome {
    pub campaign_id: String,
    pub assessment: HealthAssessment,
    pub pause_applied: bool,
}

/// 健康檢查分成兩半：check 是純查詢（分類 + should_pause 建議），
/// check_and_enforce 才把 critical 的建議落實成暫停寫入。
/// 控制迴圈的決策點因此可以獨立測試。
pub struct CheckWarmupHealth {
    campaigns: Arc<dyn CampaignStore>,
    events: Arc<dyn DeliveryEvents>,
}

impl CheckWarmupHealth {
    pub fn new(campaigns: Arc<dyn CampaignStore>, events: Arc<dyn DeliveryEvents>) -> Self {
        Self { campaigns, events }
    }

    /// 純查詢，不寫任何東西
    pub async fn check(&self, user_id: &str, campaign_id: &str) -> Result<HealthAssessment> {
        if self
            .campaigns
            .find_by_id(campaign_id, user_id)
            .await?
            .is_none()
        {
            return Err(WarmupError::not_found("Campaign", campaign_id));
        }

        let stats = self.events.stats_for_campaign(campaign_id).await?;
        Ok(assess(&stats))
    }

    /// 引擎在寄送迴圈之外唯一的自動寫入。
    /// 已暫停或未啟動時不再寫，重複的 critical 檢查是冪等的。
    pub async fn check_and_enforce(
        &self,
        user_id: &str,
        campaign_id: &str,
    ) -> Result<HealthCheckOutcome> {
        let mut campaign = self
            .campaigns
            .find_by_id(campaign_id, user_id)
            .await?
            .ok_or_else(|| WarmupError::not_found("Campaign", campaign_id))?;

        let stats = self.events.stats_for_campaign(campaign_id).await?;
        let assessment = assess(&stats);

        let mut pause_applied = false;
        if assessment.should_pause
            && campaign.is_warmup_enabled()
            && !campaign.is_warmup_complete()
            && !campaign.is_warmup_paused()
        {
            let reason = assessment
                .pause_reason
                .clone()
                .unwrap_or_else(|| "Auto-paused: deliverability threshold breached".to_string());

            tracing::warn!(
                campaign_id,
                bounce_rate = assessment.bounce_rate,
                complaint_rate = assessment.complaint_rate,
                "🛑 Auto-pausing warm-up: {}",
                reason
            );

            campaign.pause_warmup(reason);
            self.campaigns.update(&campaign).await?;
            pause_applied = true;
        }

        Ok(HealthCheckOutcome {
            campaign_id: campaign_id.to_string(),
            assessment,
            pause_applied,
        })
    }
}
