use proptest::prelude::*;

use ballotbox_types::{SessionId, Timestamp, VoterId, SECS_PER_MINUTE};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// A deadline built from minutes passes exactly one second after it is reached.
    #[test]
    fn deadline_passes_after_full_duration(
        start in 0u64..1_000_000,
        minutes in 1u64..10_000,
        offset in 0u64..1_000_000,
    ) {
        let deadline = Timestamp::new(start).plus_minutes(minutes);
        let now = Timestamp::new(start + offset);
        prop_assert_eq!(deadline.has_passed(now), offset > minutes * SECS_PER_MINUTE);
    }

    /// secs_until and has_passed never disagree.
    #[test]
    fn secs_until_zero_when_passed(deadline in 0u64..1_000_000, now in 0u64..1_000_000) {
        let d = Timestamp::new(deadline);
        let n = Timestamp::new(now);
        if d.has_passed(n) {
            prop_assert_eq!(d.secs_until(n), 0);
        } else {
            prop_assert_eq!(d.secs_until(n), deadline - now);
        }
    }

    /// Session ids order the same way as the numbers they wrap.
    #[test]
    fn session_id_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        prop_assert_eq!(SessionId::new(a) < SessionId::new(b), a < b);
    }

    /// Any trimmed, non-empty identity parses and keeps its text.
    #[test]
    fn identity_parse_keeps_text(raw in "[a-zA-Z0-9x]{1,42}") {
        let id = VoterId::parse(raw.clone()).unwrap();
        prop_assert_eq!(id.as_str(), raw.as_str());
    }

    /// Identities with surrounding whitespace are rejected.
    #[test]
    fn identity_parse_rejects_padding(raw in "[a-z0-9]{1,20}") {
        let padded = format!(" {raw}");
        prop_assert!(VoterId::parse(padded).is_err());
    }
}
