use crate::domain::model::{
    Campaign, CampaignRecord, Contact, DeliveryStats, OutgoingEmail, SendLogEntry, SendStatus,
};
use crate::domain::ports::{
    CampaignStore, ContactSource, DeliveryEvents, EmailProvider, ExecutionLog, SendOutcome,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// 單機記憶體版的平台儲存，CLI demo 與測試共用。
/// 同一個 Arc 可以同時充當四種 port。
/// Campaign 以扁平的 CampaignRecord 形狀存放，
/// 讀寫都經過 storage boundary 的合法性轉換。
#[derive(Default)]
pub struct MemoryPlatform {
    contacts: RwLock<HashMap<String, Vec<Contact>>>,
    campaigns: RwLock<HashMap<String, CampaignRecord>>,
    send_log: RwLock<Vec<SendLogEntry>>,
    delivery_stats: RwLock<HashMap<String, DeliveryStats>>,
}

impl MemoryPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert_campaign(&self, campaign: &Campaign) {
        self.campaigns
            .write()
            .expect("campaign store poisoned")
            .insert(campaign.id.clone(), CampaignRecord::from(campaign));
    }

    pub fn add_contact(&self, user_id: &str, contact: Contact) {
        let mut contacts = self.contacts.write().expect("contact store poisoned");
        contacts.entry(user_id.to_string()).or_default().push(contact);
    }

    /// 建立 n 個測試聯絡人：fan1@example.com .. fanN@example.com
    pub fn seed_contacts(&self, user_id: &str, count: u64) {
        for i in 1..=count {
            self.add_contact(
                user_id,
                Contact {
                    id: i as i64,
                    email: format!("fan{}@example.com", i),
                    unsubscribe_token: format!("tok-{:06}", i),
                },
            );
        }
    }

    pub fn set_delivery_stats(&self, campaign_id: &str, stats: DeliveryStats) {
        self.delivery_stats
            .write()
            .expect("stats store poisoned")
            .insert(campaign_id.to_string(), stats);
    }

    // ---- 測試輔助 ----

    pub fn campaign(&self, campaign_id: &str) -> Option<Campaign> {
        self.campaigns
            .read()
            .expect("campaign store poisoned")
            .get(campaign_id)
            .cloned()
            .map(|record| Campaign::try_from(record).expect("stored record is valid"))
    }

    pub fn log_entries(&self, campaign_id: &str) -> Vec<SendLogEntry> {
        self.send_log
            .read()
            .expect("send log poisoned")
            .iter()
            .filter(|entry| entry.campaign_id == campaign_id)
            .cloned()
            .collect()
    }

    pub fn sent_count_sync(&self, campaign_id: &str) -> u64 {
        self.log_entries(campaign_id)
            .iter()
            .filter(|entry| entry.status == SendStatus::Sent)
            .count() as u64
    }

    /// 模擬名單縮水：只留下 id 最小的 keep 個訂閱者
    pub fn truncate_contacts(&self, user_id: &str, keep: usize) {
        let mut contacts = self.contacts.write().expect("contact store poisoned");
        if let Some(list) = contacts.get_mut(user_id) {
            list.sort_by_key(|c| c.id);
            list.truncate(keep);
        }
    }

    /// 直接塞成功寄送紀錄，讓測試不經過寄送迴圈就有進度
    pub fn mark_sent(&self, campaign_id: &str, contact_ids: &[i64]) {
        let mut log = self.send_log.write().expect("send log poisoned");
        for id in contact_ids {
            log.push(SendLogEntry {
                campaign_id: campaign_id.to_string(),
                contact_id: *id,
                email: format!("fan{}@example.com", id),
                status: SendStatus::Sent,
                provider_message_id: Some(format!("seeded-{}", id)),
                error: None,
                occurred_at: chrono::Utc::now(),
            });
        }
    }

    fn sent_ids(&self, campaign_id: &str) -> HashSet<i64> {
        self.send_log
            .read()
            .expect("send log poisoned")
            .iter()
            .filter(|entry| entry.campaign_id == campaign_id && entry.status == SendStatus::Sent)
            .map(|entry| entry.contact_id)
            .collect()
    }
}

#[async_trait]
impl ContactSource for MemoryPlatform {
    async fn count_subscribed(&self, user_id: &str) -> Result<u64> {
        Ok(self
            .contacts
            .read()
            .expect("contact store poisoned")
            .get(user_id)
            .map(|list| list.len() as u64)
            .unwrap_or(0))
    }

    async fn unsent_for_campaign(
        &self,
        user_id: &str,
        campaign_id: &str,
        limit: u64,
    ) -> Result<Vec<Contact>> {
        let sent = self.sent_ids(campaign_id);
        let mut unsent: Vec<Contact> = self
            .contacts
            .read()
            .expect("contact store poisoned")
            .get(user_id)
            .map(|list| {
                list.iter()
                    .filter(|contact| !sent.contains(&contact.id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // 穩定排序讓重試後的 tick 不會亂跳或重複
        unsent.sort_by_key(|contact| contact.id);
        unsent.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(unsent)
    }
}

#[async_trait]
impl CampaignStore for MemoryPlatform {
    async fn find_by_id(&self, campaign_id: &str, user_id: &str) -> Result<Option<Campaign>> {
        let record = self
            .campaigns
            .read()
            .expect("campaign store poisoned")
            .get(campaign_id)
            .cloned();

        match record {
            Some(record) if record.user_id == user_id => Ok(Some(Campaign::try_from(record)?)),
            _ => Ok(None),
        }
    }

    async fn update(&self, campaign: &Campaign) -> Result<()> {
        self.insert_campaign(campaign);
        Ok(())
    }
}

#[async_trait]
impl ExecutionLog for MemoryPlatform {
    async fn record(&self, entry: &SendLogEntry) -> Result<()> {
        self.send_log
            .write()
            .expect("send log poisoned")
            .push(entry.clone());
        Ok(())
    }

    async fn sent_count(&self, campaign_id: &str) -> Result<u64> {
        Ok(self.sent_count_sync(campaign_id))
    }
}

#[async_trait]
impl DeliveryEvents for MemoryPlatform {
    async fn stats_for_campaign(&self, campaign_id: &str) -> Result<DeliveryStats> {
        if let Some(stats) = self
            .delivery_stats
            .read()
            .expect("stats store poisoned")
            .get(campaign_id)
        {
            return Ok(*stats);
        }

        // 沒有外部事件時退回寄送紀錄：零 bounce、零 complaint
        Ok(DeliveryStats {
            total_sent: self.sent_count_sync(campaign_id),
            total_bounced: 0,
            total_complaints: 0,
        })
    }
}

/// 不真的打 provider 的寄送器，demo 和測試用
#[derive(Default)]
pub struct DryRunProvider {
    counter: AtomicU64,
}

impl DryRunProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmailProvider for DryRunProvider {
    async fn send(&self, email: &OutgoingEmail) -> SendOutcome {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(to = %email.to, "Dry-run send #{}", n);
        SendOutcome::Accepted {
            message_id: format!("dry-run-{:06}", n),
        }
    }
}
