//! Accumulated intelligence for one session.
//!
//! The extractor emits transient [`Finding`]s per message; the session
//! merges them into its [`Intelligence`], which is five deduplicated,
//! insertion-ordered sets. Entries are append-only; nothing is removed
//! except by discarding the whole session.

use serde::{Deserialize, Serialize};

/// The five categories of extracted intelligence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Bank account number (9-18 digit run).
    BankAccount,
    /// UPI-style payment handle (`local@provider`).
    UpiId,
    /// Phishing or otherwise suspicious URL.
    PhishingLink,
    /// Phone number, normalized to the bare subscriber digits.
    PhoneNumber,
    /// Suspicious vocabulary hit (urgency/fraud framing).
    SuspiciousKeyword,
}

/// A single structured fact extracted from one message's text.
///
/// Findings are transient: they exist only between extraction and the
/// merge into session [`Intelligence`], and are never stored as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Which category the fact belongs to.
    pub kind: FindingKind,
    /// Normalized matched text.
    pub value: String,
}

impl Finding {
    /// Creates a finding with an already-normalized value.
    pub fn new(kind: FindingKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Deduplicated, insertion-ordered intelligence for one session.
///
/// Serializes with the wire contract's camelCase keys (`bankAccounts`,
/// `upiIds`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intelligence {
    bank_accounts: Vec<String>,
    upi_ids: Vec<String>,
    phishing_links: Vec<String>,
    phone_numbers: Vec<String>,
    suspicious_keywords: Vec<String>,
}

impl Intelligence {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges findings into the accumulator.
    ///
    /// Preserves insertion order for new entries and drops values already
    /// present in the category. Returns the number of newly added entries.
    pub fn merge(&mut self, findings: &[Finding]) -> usize {
        let mut added = 0;
        for finding in findings {
            let set = self.set_mut(finding.kind);
            if !set.iter().any(|v| v == &finding.value) {
                set.push(finding.value.clone());
                added += 1;
            }
        }
        added
    }

    /// Extracted bank account numbers.
    pub fn bank_accounts(&self) -> &[String] {
        &self.bank_accounts
    }

    /// Extracted payment handles.
    pub fn upi_ids(&self) -> &[String] {
        &self.upi_ids
    }

    /// Extracted phishing links.
    pub fn phishing_links(&self) -> &[String] {
        &self.phishing_links
    }

    /// Extracted phone numbers.
    pub fn phone_numbers(&self) -> &[String] {
        &self.phone_numbers
    }

    /// Matched suspicious keywords.
    pub fn suspicious_keywords(&self) -> &[String] {
        &self.suspicious_keywords
    }

    /// Count of distinct suspicious keywords seen so far.
    pub fn distinct_keyword_count(&self) -> usize {
        self.suspicious_keywords.len()
    }

    /// True if any payment identifier (handle or account) was extracted.
    pub fn has_payment_identifier(&self) -> bool {
        !self.upi_ids.is_empty() || !self.bank_accounts.is_empty()
    }

    /// True if any phishing link was extracted.
    pub fn has_phishing_link(&self) -> bool {
        !self.phishing_links.is_empty()
    }

    /// True if nothing has been extracted in any category.
    pub fn is_empty(&self) -> bool {
        self.bank_accounts.is_empty()
            && self.upi_ids.is_empty()
            && self.phishing_links.is_empty()
            && self.phone_numbers.is_empty()
            && self.suspicious_keywords.is_empty()
    }

    /// Total entries across all categories.
    pub fn total_entries(&self) -> usize {
        self.bank_accounts.len()
            + self.upi_ids.len()
            + self.phishing_links.len()
            + self.phone_numbers.len()
            + self.suspicious_keywords.len()
    }

    fn set_mut(&mut self, kind: FindingKind) -> &mut Vec<String> {
        match kind {
            FindingKind::BankAccount => &mut self.bank_accounts,
            FindingKind::UpiId => &mut self.upi_ids,
            FindingKind::PhishingLink => &mut self.phishing_links,
            FindingKind::PhoneNumber => &mut self.phone_numbers,
            FindingKind::SuspiciousKeyword => &mut self.suspicious_keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn merge_adds_new_entries_in_order() {
        let mut intel = Intelligence::new();
        let added = intel.merge(&[
            Finding::new(FindingKind::UpiId, "raj@upi"),
            Finding::new(FindingKind::UpiId, "scam@ybl"),
            Finding::new(FindingKind::PhoneNumber, "9876543210"),
        ]);

        assert_eq!(added, 3);
        assert_eq!(intel.upi_ids(), &["raj@upi", "scam@ybl"]);
        assert_eq!(intel.phone_numbers(), &["9876543210"]);
    }

    #[test]
    fn merge_is_idempotent_per_value() {
        let mut intel = Intelligence::new();
        let finding = Finding::new(FindingKind::UpiId, "raj@upi");

        assert_eq!(intel.merge(&[finding.clone()]), 1);
        assert_eq!(intel.merge(&[finding]), 0);
        assert_eq!(intel.upi_ids().len(), 1);
    }

    #[test]
    fn categories_do_not_cross_contaminate() {
        let mut intel = Intelligence::new();
        intel.merge(&[
            Finding::new(FindingKind::BankAccount, "123456789012"),
            Finding::new(FindingKind::PhoneNumber, "9876543210"),
        ]);

        assert!(intel.upi_ids().is_empty());
        assert_eq!(intel.bank_accounts(), &["123456789012"]);
        assert!(intel.has_payment_identifier());
        assert!(!intel.has_phishing_link());
    }

    #[test]
    fn serializes_with_wire_keys() {
        let mut intel = Intelligence::new();
        intel.merge(&[Finding::new(FindingKind::UpiId, "raj@upi")]);

        let json = serde_json::to_value(&intel).unwrap();
        assert_eq!(json["upiIds"][0], "raj@upi");
        assert!(json["bankAccounts"].as_array().unwrap().is_empty());
        assert!(json["phishingLinks"].as_array().unwrap().is_empty());
        assert!(json["phoneNumbers"].as_array().unwrap().is_empty());
        assert!(json["suspiciousKeywords"].as_array().unwrap().is_empty());
    }

    #[test]
    fn empty_accumulator_reports_empty() {
        let intel = Intelligence::new();
        assert!(intel.is_empty());
        assert_eq!(intel.total_entries(), 0);
        assert_eq!(intel.distinct_keyword_count(), 0);
    }

    fn arb_finding() -> impl Strategy<Value = Finding> {
        let kind = prop_oneof![
            Just(FindingKind::BankAccount),
            Just(FindingKind::UpiId),
            Just(FindingKind::PhishingLink),
            Just(FindingKind::PhoneNumber),
            Just(FindingKind::SuspiciousKeyword),
        ];
        (kind, "[a-z0-9@.]{1,12}").prop_map(|(kind, value)| Finding::new(kind, value))
    }

    proptest! {
        /// No category ever holds a duplicate, no matter the merge order.
        #[test]
        fn sets_never_hold_duplicates(findings in prop::collection::vec(arb_finding(), 0..64)) {
            let mut intel = Intelligence::new();
            intel.merge(&findings);
            intel.merge(&findings);

            for set in [
                intel.bank_accounts(),
                intel.upi_ids(),
                intel.phishing_links(),
                intel.phone_numbers(),
                intel.suspicious_keywords(),
            ] {
                let mut seen = std::collections::HashSet::new();
                for value in set {
                    prop_assert!(seen.insert(value), "duplicate entry: {}", value);
                }
            }
        }

        /// Merging never removes entries: totals are non-decreasing.
        #[test]
        fn merge_is_append_only(
            first in prop::collection::vec(arb_finding(), 0..32),
            second in prop::collection::vec(arb_finding(), 0..32),
        ) {
            let mut intel = Intelligence::new();
            intel.merge(&first);
            let before = intel.total_entries();
            intel.merge(&second);
            prop_assert!(intel.total_entries() >= before);
        }
    }
}
