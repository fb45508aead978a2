use crate::core::advance::should_advance_day;
use crate::core::schedule::WarmupSchedule;
use crate::domain::model::{Campaign, OutgoingEmail, SendLogEntry, SendStatus};
use crate::domain::ports::{CampaignStore, ContactSource, EmailProvider, ExecutionLog, SendOutcome};
use crate::utils::error::Result;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendFailure {
    pub email: String,
    pub error: String,
}

/// 一個 tick 的結果信封。個別收件人失敗收集在 failures，
/// 不會讓整個 tick 變成錯誤。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub campaign_id: String,
    pub day: u32,
    pub batch_sent: u64,
    pub batch_failed: u64,
    pub failures: Vec<SendFailure>,
    pub completed: bool,
    pub next_quota: Option<u64>,
}

impl BatchReport {
    fn empty(campaign_id: &str, day: u32, completed: bool, next_quota: Option<u64>) -> Self {
        Self {
            campaign_id: campaign_id.to_string(),
            day,
            batch_sent: 0,
            batch_failed: 0,
            failures: Vec::new(),
            completed,
            next_quota,
        }
    }
}

/// 前置條件不成立時的略過原因。排程器無人值守地呼叫
/// 這個用例，所以這些都是資料而不是錯誤。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    CampaignNotFound,
    WarmupNotEnabled,
    WarmupPaused { reason: String },
}

impl SkipReason {
    pub fn message(&self) -> String {
        match self {
            Self::CampaignNotFound => "campaign not found for this account".to_string(),
            Self::WarmupNotEnabled => "warm-up has not been started for this campaign".to_string(),
            Self::WarmupPaused { reason } => {
                format!("warm-up is paused: {}", reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickResult {
    Ran(BatchReport),
    Skipped { reason: SkipReason },
}

/// 核心迴圈：每個排程 tick 寄出當天配額內、尚未寄過的聯絡人。
///
/// 呼叫端契約：同一個 campaign 的 tick 必須由外部排程器序列化，
/// 引擎不自帶鎖。配額每個 tick 都從當下訂閱數重新計算。
pub struct SendWarmupBatch {
    contacts: Arc<dyn ContactSource>,
    campaigns: Arc<dyn CampaignStore>,
    provider: Arc<dyn EmailProvider>,
    log: Arc<dyn ExecutionLog>,
}

impl SendWarmupBatch {
    pub fn new(
        contacts: Arc<dyn ContactSource>,
        campaigns: Arc<dyn CampaignStore>,
        provider: Arc<dyn EmailProvider>,
        log: Arc<dyn ExecutionLog>,
    ) -> Self {
        Self {
            contacts,
            campaigns,
            provider,
            log,
        }
    }

    pub async fn execute(&self, user_id: &str, campaign_id: &str) -> Result<TickResult> {
        // 前置檢查全部不寫入
        let Some(mut campaign) = self.campaigns.find_by_id(campaign_id, user_id).await? else {
            return Ok(TickResult::Skipped {
                reason: SkipReason::CampaignNotFound,
            });
        };

        if !campaign.is_warmup_enabled() {
            return Ok(TickResult::Skipped {
                reason: SkipReason::WarmupNotEnabled,
            });
        }

        if let Some(reason) = campaign.warmup_pause_reason() {
            tracing::info!(campaign_id, "⏭️ Tick skipped, warm-up paused: {}", reason);
            return Ok(TickResult::Skipped {
                reason: SkipReason::WarmupPaused {
                    reason: reason.to_string(),
                },
            });
        }

        // 完成後的 tick 是無害的 no-op
        if campaign.is_warmup_complete() {
            return Ok(TickResult::Ran(BatchReport::empty(
                campaign_id,
                campaign.warmup_day(),
                true,
                None,
            )));
        }

        let day = campaign.warmup_day();

        // 每個 tick 重新取訂閱數，名單被匯入/退訂後排程自動跟上
        let total_subscribed = self.contacts.count_subscribed(user_id).await?;
        let schedule = WarmupSchedule::new(total_subscribed);
        let quota = schedule.quota_for_day(day);

        if quota == 0 {
            // 當天配額為零（小名單的前幾天），直接換日
            campaign.advance_warmup_day();
            self.campaigns.update(&campaign).await?;
            return Ok(TickResult::Ran(build_report(
                campaign_id,
                &campaign,
                &schedule,
                0,
                Vec::new(),
            )));
        }

        let batch = self
            .contacts
            .unsent_for_campaign(user_id, campaign_id, quota)
            .await?;
        let available = batch.len() as u64;

        if available == 0 {
            // 沒有未寄送的聯絡人了，換日避免卡死
            campaign.advance_warmup_day();
            self.campaigns.update(&campaign).await?;
            return Ok(TickResult::Ran(build_report(
                campaign_id,
                &campaign,
                &schedule,
                0,
                Vec::new(),
            )));
        }

        tracing::debug!(
            campaign_id,
            day,
            quota,
            available,
            "Dispatching warm-up batch"
        );

        // 逐封循序寄送：限制對 provider 的出站速率，
        // 也讓單封失敗的隔離保持簡單
        let mut successful: u64 = 0;
        let mut failures: Vec<SendFailure> = Vec::new();

        for contact in &batch {
            let email = OutgoingEmail {
                to: contact.email.clone(),
                subject: campaign.subject.clone(),
                html: campaign.html_body.clone(),
                unsubscribe_token: contact.unsubscribe_token.clone(),
            };

            match self.provider.send(&email).await {
                SendOutcome::Accepted { message_id } => {
                    successful += 1;
                    self.log
                        .record(&SendLogEntry {
                            campaign_id: campaign_id.to_string(),
                            contact_id: contact.id,
                            email: contact.email.clone(),
                            status: SendStatus::Sent,
                            provider_message_id: Some(message_id),
                            error: None,
                            occurred_at: Utc::now(),
                        })
                        .await?;
                }
                SendOutcome::Rejected { error } => {
                    tracing::warn!(campaign_id, email = %contact.email, "Send rejected: {}", error);
                    self.log
                        .record(&SendLogEntry {
                            campaign_id: campaign_id.to_string(),
                            contact_id: contact.id,
                            email: contact.email.clone(),
                            status: SendStatus::Failed,
                            provider_message_id: None,
                            error: Some(error.clone()),
                            occurred_at: Utc::now(),
                        })
                        .await?;
                    failures.push(SendFailure {
                        email: contact.email.clone(),
                        error,
                    });
                }
            }
        }

        if should_advance_day(successful, quota, available) {
            campaign.advance_warmup_day();
            self.campaigns.update(&campaign).await?;
        }

        let report = build_report(
            campaign_id,
            &campaign,
            &schedule,
            successful,
            failures,
        );

        tracing::info!(
            campaign_id,
            day = report.day,
            sent = report.batch_sent,
            failed = report.batch_failed,
            completed = report.completed,
            "Warm-up tick finished"
        );

        Ok(TickResult::Ran(report))
    }

}

/// 回報用的快照：換日（若有）之後的天數、完成旗標與下個 tick 會用的配額
fn build_report(
    campaign_id: &str,
    campaign: &Campaign,
    schedule: &WarmupSchedule,
    successful: u64,
    failures: Vec<SendFailure>,
) -> BatchReport {
    let completed = campaign.is_warmup_complete();
    let next_quota = if completed {
        None
    } else {
        Some(schedule.quota_for_day(campaign.warmup_day()))
    };

    BatchReport {
        campaign_id: campaign_id.to_string(),
        day: campaign.warmup_day(),
        batch_sent: successful,
        batch_failed: failures.len() as u64,
        failures,
        completed,
        next_quota,
    }
}
