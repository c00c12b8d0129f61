//! Account and authentication model tests
//!
//! Role and token vocabularies plus the mail bodies the auth flows send.
//! Flows that need a live database are covered by the service layer and
//! exercised in deployment smoke tests.

use proptest::prelude::*;

use portal_backend::services::mail::{password_reset_mail, verification_mail};
use shared::models::{AccountTokenKind, BusinessRole};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_role_parsing_accepts_any_casing() {
        assert_eq!(BusinessRole::parse("seller"), Some(BusinessRole::Seller));
        assert_eq!(BusinessRole::parse("SUPPLIER"), Some(BusinessRole::Supplier));
        assert_eq!(BusinessRole::parse("  Buyer "), Some(BusinessRole::Buyer));
        assert_eq!(BusinessRole::parse("admin"), None);
        assert_eq!(BusinessRole::parse(""), None);
    }

    #[test]
    fn test_token_lifetimes() {
        // Verification links live a day, reset links an hour
        assert_eq!(AccountTokenKind::EmailVerification.lifetime_secs(), 86_400);
        assert_eq!(AccountTokenKind::PasswordReset.lifetime_secs(), 3_600);
    }

    #[test]
    fn test_token_kinds_have_distinct_storage_names() {
        assert_ne!(
            AccountTokenKind::EmailVerification.as_str(),
            AccountTokenKind::PasswordReset.as_str()
        );
    }

    #[test]
    fn test_verification_mail_addresses_recipient() {
        let mail = verification_mail("owner@shop.example", "https://portal.example", "tok");
        assert_eq!(mail.to, "owner@shop.example");
        assert!(mail.subject.to_lowercase().contains("verify"));
    }

    #[test]
    fn test_reset_mail_never_leaks_other_tokens() {
        let mail = password_reset_mail("owner@shop.example", "https://portal.example", "tok-r");
        assert!(mail.body.contains("tok-r"));
        assert!(!mail.body.contains("verify-email"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn role_strategy() -> impl Strategy<Value = BusinessRole> {
        prop::sample::select(vec![
            BusinessRole::Seller,
            BusinessRole::Supplier,
            BusinessRole::Buyer,
        ])
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Role serialization round-trips through parse
        #[test]
        fn prop_role_round_trips(role in role_strategy()) {
            prop_assert_eq!(BusinessRole::parse(role.as_str()), Some(role));
        }

        /// Every token embedded in a mail body appears exactly once
        #[test]
        fn prop_mail_embeds_token_once(token in "[a-f0-9-]{8,36}") {
            let mail = verification_mail("a@b.example", "https://portal.example", &token);
            prop_assert_eq!(mail.body.matches(&token).count(), 1);
        }
    }
}
