//! Property-based tests for password fingerprints and the new-password
//! policy.

use linksafe::services::crypto_service::{hash_password, verify_password};
use linksafe::services::password_policy::{hash_new_password, MIN_PASSWORD_LENGTH};
use linksafe::types::errors::ValidationError;
use proptest::prelude::*;

// **Property 3: Hash determinism and verification**
//
// *For any* password `p`, hashing twice SHALL give the same 64-character
// lowercase hex digest, and `p` SHALL verify against it.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn hash_is_deterministic_and_verifies(p in "\\PC{0,64}") {
        let a = hash_password(&p);
        let b = hash_password(&p);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.len(), 64);
        prop_assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        prop_assert!(verify_password(&p, &a));
    }
}

// **Property 4: Distinct passwords do not verify**
//
// *For any* two different passwords, neither SHALL verify against the
// other's hash.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn wrong_password_does_not_verify(p1 in "\\PC{1,32}", p2 in "\\PC{1,32}") {
        prop_assume!(p1 != p2);
        let h1 = hash_password(&p1);
        prop_assert_ne!(&h1, &hash_password(&p2));
        prop_assert!(!verify_password(&p2, &h1));
    }
}

// **Property 5: Policy accepts exactly long-enough matching passwords**
//
// *For any* non-blank password of at least the minimum length that equals
// its confirmation, the policy SHALL return its hash; shorter ones SHALL be
// rejected as too short.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn policy_accepts_long_enough_passwords(p in "[a-zA-Z0-9]{4,24}") {
        let hash = hash_new_password(&p, &p).expect("valid password should hash");
        prop_assert!(verify_password(&p, &hash));
    }

    #[test]
    fn policy_rejects_short_passwords(p in "[a-zA-Z0-9]{1,3}") {
        prop_assert_eq!(
            hash_new_password(&p, &p),
            Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LENGTH })
        );
    }
}
