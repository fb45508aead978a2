use crate::domain::model::{Campaign, Contact, DeliveryStats, OutgoingEmail, SendLogEntry};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Provider 的寄送結果。失敗以資料回傳而不是 Err，
/// 單一收件人失敗不能中斷整批寄送。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Accepted { message_id: String },
    Rejected { error: String },
}

impl SendOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// 聯絡人來源（匯入、訂閱管理屬於平台其他子系統）
#[async_trait]
pub trait ContactSource: Send + Sync {
    async fn count_subscribed(&self, user_id: &str) -> Result<u64>;

    /// 回傳尚未寄出的聯絡人，依 id 遞增排序，最多 limit 筆。
    /// 「已寄出」以 ExecutionLog 的成功紀錄為準。
    async fn unsent_for_campaign(
        &self,
        user_id: &str,
        campaign_id: &str,
        limit: u64,
    ) -> Result<Vec<Contact>>;
}

/// Campaign 儲存。update 是整筆覆寫（last-writer-wins）。
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn find_by_id(&self, campaign_id: &str, user_id: &str) -> Result<Option<Campaign>>;

    async fn update(&self, campaign: &Campaign) -> Result<()>;
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> SendOutcome;
}

/// 寄送紀錄：審計軌跡，也是重試時排除已寄出聯絡人的依據
#[async_trait]
pub trait ExecutionLog: Send + Sync {
    async fn record(&self, entry: &SendLogEntry) -> Result<()>;

    async fn sent_count(&self, campaign_id: &str) -> Result<u64>;
}

/// 投遞事件聚合（bounce / complaint 由外部投遞引擎回報）
#[async_trait]
pub trait DeliveryEvents: Send + Sync {
    async fn stats_for_campaign(&self, campaign_id: &str) -> Result<DeliveryStats>;
}
