// Subscription-gate evaluator.
//
// Maps the subscription's days-remaining figure to an urgency tier and two
// independent display decisions (blocking modal, banner), with a
// once-per-calendar-day suppression rule for the modal. The evaluation is
// pure; reading and persisting the "last shown day" marker is the job of
// the `SubscriptionGate` wrapper and its injected store/clock.

use std::sync::Arc;

use crate::model::SUBSCRIPTION_SENTINEL;
use crate::storage::{Clock, KeyValueStore, GATE_MARKER_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyTier {
    Expired,
    ExpiresToday,
    ExpiresTomorrow,
    FewDaysLeft,
    UpcomingExpiry,
    NoAction,
}

impl UrgencyTier {
    pub fn from_days_remaining(days: i32) -> Self {
        match days {
            d if d < 0 => UrgencyTier::Expired,
            0 => UrgencyTier::ExpiresToday,
            1 => UrgencyTier::ExpiresTomorrow,
            2..=3 => UrgencyTier::FewDaysLeft,
            4..=7 => UrgencyTier::UpcomingExpiry,
            _ => UrgencyTier::NoAction,
        }
    }
}

/// What the shell should render, and whether to persist today's marker.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDecision {
    pub tier: UrgencyTier,
    pub show_modal: bool,
    pub show_banner: bool,
    pub banner_dismissible: bool,
    /// True when the caller owns persisting `today_marker` as the new
    /// "last shown day". Always false when the modal is not shown and when
    /// the tier is Expired (the expired modal ignores suppression, so
    /// recording the day would be meaningless).
    pub mark_shown: bool,
}

impl GateDecision {
    fn nothing(tier: UrgencyTier) -> Self {
        Self {
            tier,
            show_modal: false,
            show_banner: false,
            banner_dismissible: false,
            mark_shown: false,
        }
    }
}

/// Pure evaluation given the inputs of the day. The sentinel (-999) means
/// "no subscription data"; nothing is rendered and no marker is written.
///
/// Markers are compared for string equality only. A marker in an old or
/// foreign format simply never equals today's and the modal shows again.
pub fn evaluate(
    days_remaining: i32,
    last_shown_marker: Option<&str>,
    today_marker: &str,
) -> GateDecision {
    if days_remaining == SUBSCRIPTION_SENTINEL {
        return GateDecision::nothing(UrgencyTier::NoAction);
    }

    let tier = UrgencyTier::from_days_remaining(days_remaining);
    match tier {
        UrgencyTier::Expired => GateDecision {
            tier,
            // The lockout modal ignores the once-per-day rule entirely.
            show_modal: true,
            show_banner: true,
            banner_dismissible: false,
            mark_shown: false,
        },
        UrgencyTier::NoAction => GateDecision::nothing(tier),
        _ => {
            let already_shown_today = last_shown_marker == Some(today_marker);
            GateDecision {
                tier,
                show_modal: !already_shown_today,
                show_banner: tier == UrgencyTier::ExpiresToday,
                banner_dismissible: tier == UrgencyTier::ExpiresToday,
                mark_shown: !already_shown_today,
            }
        }
    }
}

/// Stateful wrapper wiring the evaluator to the persisted marker.
pub struct SubscriptionGate {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl SubscriptionGate {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Evaluate for today and persist the marker when the decision says so.
    pub fn decide(&self, days_remaining: i32) -> GateDecision {
        let today = self.clock.today_marker();
        let last_shown = self.store.get(GATE_MARKER_KEY);
        let decision = evaluate(days_remaining, last_shown.as_deref(), &today);
        if decision.mark_shown {
            self.store.set(GATE_MARKER_KEY, &today);
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FixedClock, MemoryStore};
    use test_case::test_case;

    #[test_case(-30, UrgencyTier::Expired)]
    #[test_case(-1, UrgencyTier::Expired)]
    #[test_case(0, UrgencyTier::ExpiresToday)]
    #[test_case(1, UrgencyTier::ExpiresTomorrow)]
    #[test_case(2, UrgencyTier::FewDaysLeft)]
    #[test_case(3, UrgencyTier::FewDaysLeft)]
    #[test_case(4, UrgencyTier::UpcomingExpiry)]
    #[test_case(7, UrgencyTier::UpcomingExpiry)]
    #[test_case(8, UrgencyTier::NoAction)]
    #[test_case(365, UrgencyTier::NoAction)]
    fn tier_mapping(days: i32, expected: UrgencyTier) {
        assert_eq!(UrgencyTier::from_days_remaining(days), expected);
    }

    #[test]
    fn sentinel_renders_nothing() {
        let decision = evaluate(SUBSCRIPTION_SENTINEL, None, "2025-06-01");
        assert!(!decision.show_modal);
        assert!(!decision.show_banner);
        assert!(!decision.mark_shown);
    }

    #[test]
    fn expired_always_shows_modal_and_sticky_banner() {
        // Marker already set to today; the expired modal ignores it.
        let decision = evaluate(-1, Some("2025-06-01"), "2025-06-01");
        assert_eq!(decision.tier, UrgencyTier::Expired);
        assert!(decision.show_modal);
        assert!(decision.show_banner);
        assert!(!decision.banner_dismissible);
    }

    #[test]
    fn expires_today_banner_is_dismissible() {
        let decision = evaluate(0, None, "2025-06-01");
        assert!(decision.show_banner);
        assert!(decision.banner_dismissible);
        assert!(decision.show_modal);
    }

    #[test_case(1)]
    #[test_case(3)]
    #[test_case(5)]
    fn countdown_tiers_show_no_banner(days: i32) {
        let decision = evaluate(days, None, "2025-06-01");
        assert!(!decision.show_banner);
        assert!(decision.show_modal);
    }

    #[test]
    fn modal_suppressed_after_first_show_of_the_day() {
        let shown = evaluate(5, Some("2025-05-31"), "2025-06-01");
        assert!(shown.show_modal);
        assert!(shown.mark_shown);

        let suppressed = evaluate(5, Some("2025-06-01"), "2025-06-01");
        assert!(!suppressed.show_modal);
        assert!(!suppressed.mark_shown);
    }

    #[test]
    fn unparseable_marker_just_fails_the_equality_check() {
        let decision = evaluate(5, Some("31/05/2025, weird locale"), "2025-06-01");
        assert!(decision.show_modal);
    }

    #[test]
    fn healthy_subscription_renders_nothing() {
        let decision = evaluate(10, None, "2025-06-01");
        assert_eq!(decision.tier, UrgencyTier::NoAction);
        assert!(!decision.show_modal);
        assert!(!decision.show_banner);
    }

    #[test]
    fn gate_persists_the_marker_once_per_day() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock("2025-06-01".to_string()));
        let gate = SubscriptionGate::new(store.clone(), clock);

        assert!(gate.decide(5).show_modal);
        assert_eq!(store.get(GATE_MARKER_KEY).as_deref(), Some("2025-06-01"));

        // Second evaluation on the same day stays quiet.
        assert!(!gate.decide(5).show_modal);
    }

    #[test]
    fn gate_shows_again_on_the_next_day() {
        let store = Arc::new(MemoryStore::new());
        store.set(GATE_MARKER_KEY, "2025-05-31");
        let clock = Arc::new(FixedClock("2025-06-01".to_string()));
        let gate = SubscriptionGate::new(store.clone(), clock);

        assert!(gate.decide(5).show_modal);
        assert_eq!(store.get(GATE_MARKER_KEY).as_deref(), Some("2025-06-01"));
    }

    #[test]
    fn expired_does_not_touch_the_marker() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock("2025-06-01".to_string()));
        let gate = SubscriptionGate::new(store.clone(), clock);

        assert!(gate.decide(-3).show_modal);
        assert_eq!(store.get(GATE_MARKER_KEY), None);
    }
}
