//! # Registry Invariants
//!
//! Property tests over arbitrary identifiers and callers, plus a threaded
//! run checking that concurrent writers never double-insert a key.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use fcr_core::{AdminIdentity, BlockHeight, ErrorCode, ManualHeight, Principal};
use fcr_registry::{FacilityRecord, Registry};

const ADMIN: &str = "admin";

fn admin() -> Principal {
    Principal::new(ADMIN)
}

fn registry() -> Registry {
    Registry::new(
        AdminIdentity::new(ADMIN).unwrap(),
        Arc::new(ManualHeight::new(1)),
    )
}

fn key() -> impl Strategy<Value = String> {
    "[a-z0-9-]{0,16}"
}

fn outsider() -> impl Strategy<Value = AdminIdentity> {
    "[a-z]{1,12}"
        .prop_filter("must differ from the admin", |s| s != ADMIN)
        .prop_map(|s| AdminIdentity::new(s).unwrap())
}

fn any_caller() -> impl Strategy<Value = Principal> {
    "[ a-z]{0,12}"
        .prop_filter("must differ from the admin", |s| s != ADMIN)
        .prop_map(Principal::from)
}

fn doc_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9-]{1,12}", 0..6)
}

proptest! {
    /// A second registration under the same id fails and leaves the first
    /// record exactly as it was.
    #[test]
    fn duplicate_registration_preserves_first(
        id in key(),
        first in "[A-Za-z ]{1,20}",
        second in "[A-Za-z ]{1,20}",
    ) {
        let reg = registry();
        let facilities = reg.facilities();
        facilities.register_facility(id.as_str(), first.as_str(), "here", &admin()).unwrap();
        let before = facilities.get_facility(&id).unwrap();

        let err = facilities
            .register_facility(id.as_str(), second.as_str(), "there", &admin())
            .unwrap_err();
        prop_assert_eq!(err.code(), ErrorCode::AlreadyExists);
        prop_assert_eq!(facilities.get_facility(&id), Some(before));
    }

    /// Every gated operation rejects a non-admin, blank callers included,
    /// and changes nothing.
    #[test]
    fn non_admin_mutations_change_nothing(
        caller in any_caller(),
        id in key(),
        height in any::<u64>(),
        docs in doc_list(),
    ) {
        let reg = registry();
        reg.facilities().register_facility("seed", "Seed", "here", &admin()).unwrap();
        let seed_before = reg.facilities().get_facility("seed");

        let results = [
            reg.facilities().register_facility(id.as_str(), "n", "l", &caller),
            reg.facilities().verify_facility("seed", &caller, height),
            reg.compliance().add_requirement(id.as_str(), "t", "d", docs, &caller),
            reg.transfer_admin(AdminIdentity::new("usurper").unwrap(), &caller),
        ];
        for result in results {
            prop_assert_eq!(result.unwrap_err().code(), ErrorCode::Unauthorized);
        }

        prop_assert_eq!(reg.facilities().get_facility("seed"), seed_before);
        prop_assert_eq!(reg.facilities().len(), 1);
        prop_assert_eq!(reg.compliance().requirement_count(), 0);
        prop_assert_eq!(reg.admin(), admin());
    }

    /// Verification stamps exactly the supplied height.
    #[test]
    fn verification_records_height(id in key(), height in any::<u64>()) {
        let reg = registry();
        let facilities = reg.facilities();
        facilities.register_facility(id.as_str(), "n", "l", &admin()).unwrap();
        facilities.verify_facility(&id, &admin(), height).unwrap();

        prop_assert_eq!(facilities.is_facility_verified(&id), Ok(true));
        let record: FacilityRecord = facilities.get_facility(&id).unwrap();
        prop_assert_eq!(record.verification_date, BlockHeight(height));
    }

    /// After a transfer, the new admin passes every gate and the old one
    /// fails every gate.
    #[test]
    fn transfer_moves_every_gate(successor in outsider(), id in key()) {
        let reg = registry();
        reg.transfer_admin(successor.clone(), &admin()).unwrap();

        let old = reg.facilities().register_facility(id.as_str(), "n", "l", &admin());
        prop_assert_eq!(old.unwrap_err().code(), ErrorCode::Unauthorized);
        let old = reg.compliance().add_requirement(id.as_str(), "t", "d", Vec::new(), &admin());
        prop_assert_eq!(old.unwrap_err().code(), ErrorCode::Unauthorized);

        reg.facilities().register_facility(id.as_str(), "n", "l", successor.as_principal()).unwrap();
        reg.facilities().verify_facility(&id, successor.as_principal(), 3u64).unwrap();
        reg.compliance().add_requirement(id.as_str(), "t", "d", Vec::new(), successor.as_principal()).unwrap();
    }

    /// Compliance against a missing requirement is rejected and writes
    /// nothing.
    #[test]
    fn missing_requirement_writes_nothing(product in key(), requirement in key(), docs in doc_list()) {
        let reg = registry();
        let err = reg
            .compliance()
            .update_product_compliance(product.as_str(), &requirement, docs)
            .unwrap_err();
        prop_assert_eq!(err.code(), ErrorCode::NotFound);
        prop_assert!(reg.compliance().get_product_compliance(&product, &requirement).is_none());
        prop_assert_eq!(reg.compliance().compliance_record_count(), 0);
    }

    /// The latest submission replaces the earlier one wholesale.
    #[test]
    fn latest_submission_wins(product in key(), first in doc_list(), second in doc_list()) {
        let reg = registry();
        let compliance = reg.compliance();
        compliance.add_requirement("req", "t", "d", Vec::new(), &admin()).unwrap();
        compliance.update_product_compliance(product.as_str(), "req", first).unwrap();
        compliance.update_product_compliance(product.as_str(), "req", second.clone()).unwrap();

        let record = compliance.get_product_compliance(&product, "req").unwrap();
        prop_assert!(record.compliant);
        prop_assert_eq!(record.documents, second);
    }
}

#[test]
fn concurrent_registration_inserts_once() {
    let reg = registry();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let reg = reg.clone();
            thread::spawn(move || {
                reg.facilities()
                    .register_facility("contested", format!("Plant {i}"), "here", &admin())
                    .is_ok()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1);
    assert_eq!(reg.facilities().len(), 1);
}

#[test]
fn concurrent_transfer_and_writes_stay_consistent() {
    let reg = registry();
    let successor = AdminIdentity::new("successor").unwrap();

    let writer = {
        let reg = reg.clone();
        thread::spawn(move || {
            (0..200)
                .filter(|i| {
                    reg.facilities()
                        .register_facility(format!("f-{i}"), "n", "l", &admin())
                        .is_ok()
                })
                .count()
        })
    };
    reg.transfer_admin(successor.clone(), &admin()).unwrap();
    let accepted = writer.join().unwrap();

    // Every accepted write happened under the old admin; nothing else landed.
    assert_eq!(reg.facilities().len(), accepted);
    assert_eq!(reg.admin(), successor);
}
