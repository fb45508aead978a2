pub mod check_health;
pub mod send_batch;
pub mod start_warmup;
pub mod warmup_status;

pub use self::check_health::{CheckWarmupHealth, HealthCheckOutcome};
pub use self::send_batch::{BatchReport, SendFailure, SendWarmupBatch, SkipReason, TickResult};
pub use self::start_warmup::{SchedulePreview, StartWarmup};
pub use self::warmup_status::{GetWarmupStatus, WarmupStatusView};
