/// 換日決策表：配額達成 或 名單耗盡 -> 推進。
/// 名單耗盡條件看的是取批前的可用數，可用數小於配額時
/// 不論成功幾封都推進，避免名單比排程小的時候卡在同一天。
pub fn should_advance_day(successful_sends: u64, day_quota: u64, available_before_batch: u64) -> bool {
    let quota_met = successful_sends >= day_quota;
    let pool_exhausted = available_before_batch < day_quota;
    quota_met || pool_exhausted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advances_when_quota_met() {
        assert!(should_advance_day(10, 10, 50));
        assert!(should_advance_day(12, 10, 50));
    }

    #[test]
    fn test_advances_when_pool_smaller_than_quota() {
        // 可用只剩 3，配額 10：不管成功數都要推進
        assert!(should_advance_day(3, 10, 3));
        assert!(should_advance_day(0, 10, 3));
    }

    #[test]
    fn test_holds_day_on_partial_failure_with_pool_remaining() {
        // 名單夠、但這批有失敗沒達標：留在同一天等下個 tick 補寄
        assert!(!should_advance_day(8, 10, 10));
        assert!(!should_advance_day(0, 10, 25));
    }

    #[test]
    fn test_zero_quota_always_advances() {
        assert!(should_advance_day(0, 0, 0));
        assert!(should_advance_day(0, 0, 100));
    }
}
