use crate::utils::error::{Result, WarmupError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 暖機排程固定為 7 天
pub const WARMUP_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub email: String,
    pub unsubscribe_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Sent,
}

/// 暖機狀態機：NotStarted -> Active(day 1..=7) -> Complete，
/// Paused 是 Active 上的附加旗標，保存暫停原因。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WarmupState {
    NotStarted,
    Active {
        day: u32,
        started_at: DateTime<Utc>,
        paused: Option<String>,
    },
    Complete {
        started_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub html_body: String,
    pub status: CampaignStatus,
    pub warmup: WarmupState,
}

impl Campaign {
    pub fn draft(
        id: impl Into<String>,
        user_id: impl Into<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            subject: subject.into(),
            html_body: html_body.into(),
            status: CampaignStatus::Draft,
            warmup: WarmupState::NotStarted,
        }
    }

    /// 啟動暖機：只允許 Draft 且尚未啟動過的 campaign
    pub fn enable_warmup(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.status != CampaignStatus::Draft {
            return Err(WarmupError::state_conflict(
                "campaign has already been sent; warm-up applies to drafts only",
            ));
        }

        match self.warmup {
            WarmupState::NotStarted => {
                self.warmup = WarmupState::Active {
                    day: 1,
                    started_at: now,
                    paused: None,
                };
                Ok(())
            }
            WarmupState::Active { day, .. } => Err(WarmupError::state_conflict(format!(
                "warm-up is already running (day {})",
                day
            ))),
            WarmupState::Complete { .. } => Err(WarmupError::state_conflict(
                "warm-up already completed for this campaign",
            )),
        }
    }

    /// 推進一天。暫停或已完成時為 no-op，保證重放安全。
    pub fn advance_warmup_day(&mut self) {
        if let WarmupState::Active {
            day,
            started_at,
            paused: None,
        } = self.warmup
        {
            if day >= WARMUP_DAYS {
                self.warmup = WarmupState::Complete { started_at };
            } else {
                self.warmup = WarmupState::Active {
                    day: day + 1,
                    started_at,
                    paused: None,
                };
            }
        }
    }

    /// 暫停暖機。重複暫停時以最新原因覆蓋。
    pub fn pause_warmup(&mut self, reason: impl Into<String>) {
        if let WarmupState::Active { paused, .. } = &mut self.warmup {
            *paused = Some(reason.into());
        }
    }

    /// 恢復由外部動作觸發，引擎本身永遠不會呼叫
    pub fn resume_warmup(&mut self) {
        if let WarmupState::Active { paused, .. } = &mut self.warmup {
            *paused = None;
        }
    }

    pub fn is_warmup_enabled(&self) -> bool {
        !matches!(self.warmup, WarmupState::NotStarted)
    }

    pub fn is_warmup_paused(&self) -> bool {
        matches!(
            self.warmup,
            WarmupState::Active { paused: Some(_), .. }
        )
    }

    pub fn is_warmup_complete(&self) -> bool {
        matches!(self.warmup, WarmupState::Complete { .. })
    }

    /// 0 = 未啟動；1..=7 = 進行中；WARMUP_DAYS + 1 = 已完成
    pub fn warmup_day(&self) -> u32 {
        match self.warmup {
            WarmupState::NotStarted => 0,
            WarmupState::Active { day, .. } => day,
            WarmupState::Complete { .. } => WARMUP_DAYS + 1,
        }
    }

    pub fn warmup_started_at(&self) -> Option<DateTime<Utc>> {
        match self.warmup {
            WarmupState::NotStarted => None,
            WarmupState::Active { started_at, .. } | WarmupState::Complete { started_at } => {
                Some(started_at)
            }
        }
    }

    pub fn warmup_pause_reason(&self) -> Option<&str> {
        match &self.warmup {
            WarmupState::Active { paused, .. } => paused.as_deref(),
            _ => None,
        }
    }
}

/// 持久化的扁平欄位形狀。合法性在轉回 Campaign 時檢查，
/// 引擎內部一律使用 WarmupState。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub html_body: String,
    pub status: CampaignStatus,
    pub warmup_enabled: bool,
    pub warmup_current_day: u32,
    pub warmup_started_at: Option<DateTime<Utc>>,
    pub warmup_paused: bool,
    pub warmup_pause_reason: Option<String>,
}

impl From<&Campaign> for CampaignRecord {
    fn from(campaign: &Campaign) -> Self {
        let (enabled, day, started_at, paused, pause_reason) = match &campaign.warmup {
            WarmupState::NotStarted => (false, 0, None, false, None),
            WarmupState::Active {
                day,
                started_at,
                paused,
            } => (
                true,
                *day,
                Some(*started_at),
                paused.is_some(),
                paused.clone(),
            ),
            WarmupState::Complete { started_at } => {
                (true, WARMUP_DAYS + 1, Some(*started_at), false, None)
            }
        };

        Self {
            id: campaign.id.clone(),
            user_id: campaign.user_id.clone(),
            subject: campaign.subject.clone(),
            html_body: campaign.html_body.clone(),
            status: campaign.status,
            warmup_enabled: enabled,
            warmup_current_day: day,
            warmup_started_at: started_at,
            warmup_paused: paused,
            warmup_pause_reason: pause_reason,
        }
    }
}

impl TryFrom<CampaignRecord> for Campaign {
    type Error = WarmupError;

    fn try_from(record: CampaignRecord) -> Result<Self> {
        let warmup = if !record.warmup_enabled {
            // 不變式：未啟動時不得殘留天數或暫停原因
            if record.warmup_current_day != 0
                || record.warmup_paused
                || record.warmup_pause_reason.is_some()
            {
                return Err(WarmupError::storage(format!(
                    "campaign {}: warm-up disabled but day/pause fields are set",
                    record.id
                )));
            }
            WarmupState::NotStarted
        } else {
            let started_at = record.warmup_started_at.ok_or_else(|| {
                WarmupError::storage(format!(
                    "campaign {}: warm-up enabled without a start timestamp",
                    record.id
                ))
            })?;

            match record.warmup_current_day {
                1..=WARMUP_DAYS => WarmupState::Active {
                    day: record.warmup_current_day,
                    started_at,
                    paused: if record.warmup_paused {
                        Some(record.warmup_pause_reason.unwrap_or_default())
                    } else {
                        None
                    },
                },
                day if day > WARMUP_DAYS => {
                    if record.warmup_paused {
                        return Err(WarmupError::storage(format!(
                            "campaign {}: completed warm-up cannot be paused",
                            record.id
                        )));
                    }
                    WarmupState::Complete { started_at }
                }
                _ => {
                    return Err(WarmupError::storage(format!(
                        "campaign {}: warm-up enabled with day 0",
                        record.id
                    )));
                }
            }
        };

        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            subject: record.subject,
            html_body: record.html_body,
            status: record.status,
            warmup,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Sent,
    Failed,
}

/// 每次寄送嘗試的審計紀錄，同時是「已寄出」事實的唯一來源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendLogEntry {
    pub campaign_id: String,
    pub contact_id: i64,
    pub email: String,
    pub status: SendStatus,
    pub provider_message_id: Option<String>,
    pub error: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStats {
    pub total_sent: u64,
    pub total_bounced: u64,
    pub total_complaints: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub unsubscribe_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_campaign(day: u32) -> Campaign {
        let mut campaign = Campaign::draft("c1", "u1", "New single out!", "<p>listen</p>");
        campaign.enable_warmup(Utc::now()).unwrap();
        for _ in 1..day {
            campaign.advance_warmup_day();
        }
        campaign
    }

    #[test]
    fn test_enable_warmup_from_draft() {
        let mut campaign = Campaign::draft("c1", "u1", "Subject", "<p>hi</p>");
        assert!(!campaign.is_warmup_enabled());

        campaign.enable_warmup(Utc::now()).unwrap();

        assert!(campaign.is_warmup_enabled());
        assert_eq!(campaign.warmup_day(), 1);
        assert!(!campaign.is_warmup_paused());
        assert!(campaign.warmup_started_at().is_some());
    }

    #[test]
    fn test_enable_warmup_twice_is_state_conflict() {
        let mut campaign = active_campaign(3);

        let err = campaign.enable_warmup(Utc::now()).unwrap_err();

        assert!(matches!(err, WarmupError::StateConflictError { .. }));
        // 第二次呼叫不得動到天數
        assert_eq!(campaign.warmup_day(), 3);
    }

    #[test]
    fn test_enable_warmup_rejects_sent_campaign() {
        let mut campaign = Campaign::draft("c1", "u1", "Subject", "<p>hi</p>");
        campaign.status = CampaignStatus::Sent;

        assert!(campaign.enable_warmup(Utc::now()).is_err());
        assert!(!campaign.is_warmup_enabled());
    }

    #[test]
    fn test_advance_through_schedule_reaches_complete() {
        let mut campaign = active_campaign(1);

        for expected_day in 2..=WARMUP_DAYS {
            campaign.advance_warmup_day();
            assert_eq!(campaign.warmup_day(), expected_day);
        }

        campaign.advance_warmup_day();
        assert!(campaign.is_warmup_complete());
        assert_eq!(campaign.warmup_day(), WARMUP_DAYS + 1);

        // 完成後再推進是 no-op
        campaign.advance_warmup_day();
        assert!(campaign.is_warmup_complete());
    }

    #[test]
    fn test_advance_is_noop_while_paused() {
        let mut campaign = active_campaign(2);
        campaign.pause_warmup("bounce rate too high");

        campaign.advance_warmup_day();

        assert_eq!(campaign.warmup_day(), 2);
        assert!(campaign.is_warmup_paused());
    }

    #[test]
    fn test_pause_updates_reason_and_resume_clears_it() {
        let mut campaign = active_campaign(4);

        campaign.pause_warmup("first reason");
        campaign.pause_warmup("latest reason");
        assert_eq!(campaign.warmup_pause_reason(), Some("latest reason"));

        campaign.resume_warmup();
        assert!(!campaign.is_warmup_paused());
        assert_eq!(campaign.warmup_day(), 4);
    }

    #[test]
    fn test_pause_before_start_is_noop() {
        let mut campaign = Campaign::draft("c1", "u1", "Subject", "<p>hi</p>");
        campaign.pause_warmup("should not stick");
        assert!(!campaign.is_warmup_paused());
        assert!(campaign.warmup_pause_reason().is_none());
    }

    #[test]
    fn test_record_round_trip_active_paused() {
        let mut campaign = active_campaign(5);
        campaign.pause_warmup("complaint rate 0.2% exceeds limit");

        let record = CampaignRecord::from(&campaign);
        assert!(record.warmup_enabled);
        assert_eq!(record.warmup_current_day, 5);
        assert!(record.warmup_paused);

        let restored = Campaign::try_from(record).unwrap();
        assert_eq!(restored, campaign);
    }

    #[test]
    fn test_record_round_trip_not_started_and_complete() {
        let campaign = Campaign::draft("c1", "u1", "Subject", "<p>hi</p>");
        let restored = Campaign::try_from(CampaignRecord::from(&campaign)).unwrap();
        assert_eq!(restored, campaign);

        let mut done = active_campaign(WARMUP_DAYS);
        done.advance_warmup_day();
        let record = CampaignRecord::from(&done);
        assert_eq!(record.warmup_current_day, WARMUP_DAYS + 1);
        let restored = Campaign::try_from(record).unwrap();
        assert!(restored.is_warmup_complete());
    }

    #[test]
    fn test_record_rejects_illegal_combinations() {
        let mut record = CampaignRecord::from(&Campaign::draft("c1", "u1", "S", "<p></p>"));

        // 未啟動卻有暫停原因
        record.warmup_pause_reason = Some("stale".to_string());
        assert!(Campaign::try_from(record.clone()).is_err());

        // 啟動但缺 started_at
        record.warmup_pause_reason = None;
        record.warmup_enabled = true;
        record.warmup_current_day = 3;
        record.warmup_started_at = None;
        assert!(Campaign::try_from(record.clone()).is_err());

        // 啟動但天數為 0
        record.warmup_started_at = Some(Utc::now());
        record.warmup_current_day = 0;
        assert!(Campaign::try_from(record).is_err());
    }
}
