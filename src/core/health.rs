use crate::domain::model::DeliveryStats;
use serde::Serialize;

// 固定門檻 (%)。critical 觸發自動暫停，warning 只提示。
pub const BOUNCE_RATE_CRITICAL: f64 = 5.0;
pub const COMPLAINT_RATE_CRITICAL: f64 = 0.1;
pub const BOUNCE_RATE_WARNING: f64 = 3.0;
pub const COMPLAINT_RATE_WARNING: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Healthy,
    Warning,
    Critical,
}

/// 純查詢結果：分類加上 should_pause 建議。
/// 是否真的暫停由呼叫端（check_and_enforce）決定並寫回。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthAssessment {
    pub total_sent: u64,
    pub total_bounced: u64,
    pub total_complaints: u64,
    pub bounce_rate: f64,
    pub complaint_rate: f64,
    pub level: HealthLevel,
    pub should_pause: bool,
    pub pause_reason: Option<String>,
}

pub fn assess(stats: &DeliveryStats) -> HealthAssessment {
    let (bounce_rate, complaint_rate) = if stats.total_sent == 0 {
        // 零寄送量時視為健康，不做除以零
        (0.0, 0.0)
    } else {
        let sent = stats.total_sent as f64;
        (
            stats.total_bounced as f64 / sent * 100.0,
            stats.total_complaints as f64 / sent * 100.0,
        )
    };

    let level = if bounce_rate > BOUNCE_RATE_CRITICAL || complaint_rate > COMPLAINT_RATE_CRITICAL {
        HealthLevel::Critical
    } else if bounce_rate >= BOUNCE_RATE_WARNING || complaint_rate >= COMPLAINT_RATE_WARNING {
        HealthLevel::Warning
    } else {
        HealthLevel::Healthy
    };

    let pause_reason = if level == HealthLevel::Critical {
        Some(critical_reason(bounce_rate, complaint_rate))
    } else {
        None
    };

    HealthAssessment {
        total_sent: stats.total_sent,
        total_bounced: stats.total_bounced,
        total_complaints: stats.total_complaints,
        bounce_rate,
        complaint_rate,
        level,
        should_pause: level == HealthLevel::Critical,
        pause_reason,
    }
}

/// 暫停原因必須點名觸發的指標，UI 直接顯示這段文字
fn critical_reason(bounce_rate: f64, complaint_rate: f64) -> String {
    let mut triggers = Vec::new();
    if bounce_rate > BOUNCE_RATE_CRITICAL {
        triggers.push(format!(
            "bounce rate {:.1}% exceeds the {:.0}% limit",
            bounce_rate, BOUNCE_RATE_CRITICAL
        ));
    }
    if complaint_rate > COMPLAINT_RATE_CRITICAL {
        triggers.push(format!(
            "complaint rate {:.2}% exceeds the {:.1}% limit",
            complaint_rate, COMPLAINT_RATE_CRITICAL
        ));
    }
    format!("Auto-paused: {}", triggers.join("; "))
}
