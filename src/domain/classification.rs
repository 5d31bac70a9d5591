//! Scam classification over accumulated session intelligence.

use super::intelligence::Intelligence;

/// Distinct suspicious keywords required to flag a session when no harder
/// evidence (payment identifier or phishing link) is present.
pub const DISTINCT_KEYWORD_THRESHOLD: usize = 2;

/// Pure decision function over a session's accumulated intelligence.
///
/// The classifier only inspects append-only sets, so its verdict is
/// monotonic: once a session classifies as a scam, later messages can
/// never flip it back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier;

impl Classifier {
    /// Creates a classifier.
    pub fn new() -> Self {
        Self
    }

    /// Decides whether the conversation is a confirmed scam attempt.
    ///
    /// Flags on any of:
    /// - a payment handle or bank account number was extracted
    /// - a phishing link was extracted
    /// - at least [`DISTINCT_KEYWORD_THRESHOLD`] distinct suspicious
    ///   keywords accumulated across the session
    pub fn classify(&self, intelligence: &Intelligence) -> bool {
        intelligence.has_payment_identifier()
            || intelligence.has_phishing_link()
            || intelligence.distinct_keyword_count() >= DISTINCT_KEYWORD_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intelligence::{Finding, FindingKind};
    use proptest::prelude::*;

    fn intel_with(findings: &[Finding]) -> Intelligence {
        let mut intel = Intelligence::new();
        intel.merge(findings);
        intel
    }

    #[test]
    fn empty_intelligence_is_not_a_scam() {
        assert!(!Classifier::new().classify(&Intelligence::new()));
    }

    #[test]
    fn payment_handle_alone_flags() {
        let intel = intel_with(&[Finding::new(FindingKind::UpiId, "raj@upi")]);
        assert!(Classifier::new().classify(&intel));
    }

    #[test]
    fn bank_account_alone_flags() {
        let intel = intel_with(&[Finding::new(FindingKind::BankAccount, "123456789012")]);
        assert!(Classifier::new().classify(&intel));
    }

    #[test]
    fn phishing_link_alone_flags() {
        let intel = intel_with(&[Finding::new(
            FindingKind::PhishingLink,
            "http://scam.example/pay",
        )]);
        assert!(Classifier::new().classify(&intel));
    }

    #[test]
    fn phone_number_alone_does_not_flag() {
        let intel = intel_with(&[Finding::new(FindingKind::PhoneNumber, "9876543210")]);
        assert!(!Classifier::new().classify(&intel));
    }

    #[test]
    fn single_keyword_does_not_flag() {
        let intel = intel_with(&[Finding::new(FindingKind::SuspiciousKeyword, "urgent")]);
        assert!(!Classifier::new().classify(&intel));
    }

    #[test]
    fn keyword_threshold_flags() {
        let intel = intel_with(&[
            Finding::new(FindingKind::SuspiciousKeyword, "urgent"),
            Finding::new(FindingKind::SuspiciousKeyword, "otp"),
        ]);
        assert!(Classifier::new().classify(&intel));
    }

    #[test]
    fn repeated_keyword_does_not_reach_threshold() {
        let mut intel = Intelligence::new();
        intel.merge(&[Finding::new(FindingKind::SuspiciousKeyword, "urgent")]);
        intel.merge(&[Finding::new(FindingKind::SuspiciousKeyword, "urgent")]);
        assert!(!Classifier::new().classify(&intel));
    }

    proptest! {
        /// Adding findings can only turn the verdict on, never off.
        #[test]
        fn verdict_is_monotonic(
            seed in prop::collection::vec("[a-z0-9@.]{1,10}", 0..8),
            extra in prop::collection::vec("[a-z0-9@.]{1,10}", 0..8),
        ) {
            let classifier = Classifier::new();
            let mut intel = Intelligence::new();

            let seed_findings: Vec<_> = seed
                .iter()
                .map(|v| Finding::new(FindingKind::UpiId, v.clone()))
                .collect();
            intel.merge(&seed_findings);
            let before = classifier.classify(&intel);

            let extra_findings: Vec<_> = extra
                .iter()
                .map(|v| Finding::new(FindingKind::SuspiciousKeyword, v.clone()))
                .collect();
            intel.merge(&extra_findings);
            let after = classifier.classify(&intel);

            prop_assert!(!before || after, "verdict flipped from true to false");
        }
    }
}
