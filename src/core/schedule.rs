use crate::domain::model::WARMUP_DAYS;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 每日配額占比 (%)。遞增爬坡，總和 100，最後一天吸收尾差。
const RAMP_PERCENTS: [u64; WARMUP_DAYS as usize] = [5, 8, 11, 14, 17, 20, 25];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayQuota {
    pub day: u32,
    pub quota: u64,
}

/// 純計算的暖機排程，從訂閱總數推導，永不持久化。
/// 每個 tick 用當下的訂閱數重新建立，名單變動時排程自動適應。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmupSchedule {
    total_recipients: u64,
    quotas: [u64; WARMUP_DAYS as usize],
}

impl WarmupSchedule {
    pub fn new(total_recipients: u64) -> Self {
        let mut quotas = [0u64; WARMUP_DAYS as usize];
        let mut remaining = total_recipients;

        // 前六天四捨五入，且不超過剩餘量
        for (slot, pct) in quotas
            .iter_mut()
            .zip(RAMP_PERCENTS.iter())
            .take(WARMUP_DAYS as usize - 1)
        {
            let quota = ((total_recipients * pct + 50) / 100).min(remaining);
            *slot = quota;
            remaining -= quota;
        }

        // 尾差全部落在最後一天，保證配額總和等於收件人總數
        quotas[WARMUP_DAYS as usize - 1] = remaining;

        Self {
            total_recipients,
            quotas,
        }
    }

    /// day 超出排程（0 或 > 7）回傳 0，呼叫端以此判斷推進/完成
    pub fn quota_for_day(&self, day: u32) -> u64 {
        if day == 0 || day > WARMUP_DAYS {
            return 0;
        }
        self.quotas[(day - 1) as usize]
    }

    pub fn daily_quotas(&self) -> Vec<DayQuota> {
        self.quotas
            .iter()
            .enumerate()
            .map(|(i, quota)| DayQuota {
                day: (i + 1) as u32,
                quota: *quota,
            })
            .collect()
    }

    pub fn total_recipients(&self) -> u64 {
        self.total_recipients
    }

    pub fn day_count(&self) -> u32 {
        WARMUP_DAYS
    }

    /// 第 1 天從 started_at 起算，最後一天落在 started_at + 6 天
    pub fn estimated_completion(&self, started_at: DateTime<Utc>) -> DateTime<Utc> {
        started_at + Duration::days(i64::from(WARMUP_DAYS - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quota_sum(schedule: &WarmupSchedule) -> u64 {
        schedule.daily_quotas().iter().map(|q| q.quota).sum()
    }

    #[test]
    fn test_quotas_sum_to_total_for_small_totals() {
        for total in 0..=200 {
            let schedule = WarmupSchedule::new(total);
            assert_eq!(
                quota_sum(&schedule),
                total,
                "quota sum mismatch for total={}",
                total
            );
        }
    }

    #[test]
    fn test_quotas_sum_to_total_for_large_totals() {
        for total in [1_000, 12_345, 70_000, 1_000_000] {
            let schedule = WarmupSchedule::new(total);
            assert_eq!(quota_sum(&schedule), total);
        }
    }

    #[test]
    fn test_quota_outside_schedule_is_zero() {
        let schedule = WarmupSchedule::new(500);
        assert_eq!(schedule.quota_for_day(0), 0);
        for day in (WARMUP_DAYS + 1)..=(WARMUP_DAYS + 5) {
            assert_eq!(schedule.quota_for_day(day), 0);
        }
    }

    #[test]
    fn test_zero_recipients_yields_all_zero_schedule() {
        let schedule = WarmupSchedule::new(0);
        assert!(schedule.daily_quotas().iter().all(|q| q.quota == 0));
    }

    #[test]
    fn test_seventy_recipients_ramp() {
        // 5% of 70 = 3.5，四捨五入為 4
        let schedule = WarmupSchedule::new(70);
        assert_eq!(schedule.quota_for_day(1), 4);

        let quotas: Vec<u64> = schedule.daily_quotas().iter().map(|q| q.quota).collect();
        assert_eq!(quotas, vec![4, 6, 8, 10, 12, 14, 16]);
    }

    #[test]
    fn test_exact_percentages_at_hundred() {
        let schedule = WarmupSchedule::new(100);
        let quotas: Vec<u64> = schedule.daily_quotas().iter().map(|q| q.quota).collect();
        assert_eq!(quotas, vec![5, 8, 11, 14, 17, 20, 25]);
    }

    #[test]
    fn test_tiny_totals_distribute_without_negative_quotas() {
        for total in 1..WARMUP_DAYS as u64 {
            let schedule = WarmupSchedule::new(total);
            assert_eq!(quota_sum(&schedule), total);
            // 爬坡曲線遞增，小名單的配額集中在後段
            let quotas = schedule.daily_quotas();
            for window in quotas.windows(2) {
                assert!(window[0].quota <= window[1].quota);
            }
        }
    }

    #[test]
    fn test_ramp_is_non_decreasing_for_representative_totals() {
        for total in [10, 70, 100, 999, 5_000] {
            let quotas = WarmupSchedule::new(total).daily_quotas();
            for window in quotas.windows(2) {
                assert!(
                    window[0].quota <= window[1].quota,
                    "ramp decreased for total={}: {:?}",
                    total,
                    quotas
                );
            }
        }
    }

    #[test]
    fn test_estimated_completion_is_six_days_out() {
        let started_at = "2026-03-01T09:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let schedule = WarmupSchedule::new(70);
        let expected = "2026-03-07T09:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(schedule.estimated_completion(started_at), expected);
    }
}
