pub mod advance;
pub mod engine;
pub mod health;
pub mod schedule;

pub use crate::domain::model::{
    Campaign, CampaignRecord, CampaignStatus, Contact, DeliveryStats, OutgoingEmail, SendLogEntry,
    SendStatus, WarmupState, WARMUP_DAYS,
};
pub use crate::domain::ports::{
    CampaignStore, ContactSource, DeliveryEvents, EmailProvider, ExecutionLog, SendOutcome,
};
pub use crate::utils::error::Result;
