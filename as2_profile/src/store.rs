//! Profile lookup.
//!
//! `FindOrganization`/`FindPartner` return absence as data (`Ok(None)`), not an error — callers
//! classify a miss into `As2PartnerNotFound` themselves, since "not found" during inbound
//! identity resolution is an ordinary, expected outcome rather than a store fault.

use crate::{org::Organization, partner::Partner};

use as2_core::prelude::*;

use std::{
    collections::HashMap,
    sync::RwLock,
};

pub trait ProfileStore: Send + Sync {
    fn find_organization(&self, as2_name: &str) -> Outcome<Option<Organization>>;
    fn find_partner(&self, as2_name: &str) -> Outcome<Option<Partner>>;
}

/// A lock-guarded in-process profile store, suitable for tests and the reference server binary.
/// A production deployment would back `ProfileStore` with a persistent table instead; the trait
/// is the seam.
#[derive(Default)]
pub struct MemoryProfileStore {
    orgs:       RwLock<HashMap<String, Organization>>,
    partners:   RwLock<HashMap<String, Partner>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_organization(&self, org: Organization) {
        res_ignore(self.orgs.write(), |mut guard| {
            guard.insert(org.as2_name.clone(), org);
        });
    }

    pub fn add_partner(&self, partner: Partner) {
        res_ignore(self.partners.write(), |mut guard| {
            guard.insert(partner.as2_name.clone(), partner);
        });
    }
}

fn res_ignore<T, F: FnOnce(T)>(result: Result<T, std::sync::PoisonError<T>>, f: F) {
    match result {
        Ok(guard) => f(guard),
        Err(poisoned) => f(poisoned.into_inner()),
    }
}

impl ProfileStore for MemoryProfileStore {
    fn find_organization(&self, as2_name: &str) -> Outcome<Option<Organization>> {
        let guard = res!(self.orgs.read());
        Ok(guard.get(as2_name).cloned())
    }

    fn find_partner(&self, as2_name: &str) -> Outcome<Option<Partner>> {
        let guard = res!(self.partners.read());
        Ok(guard.get(as2_name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_resolve_to_none_not_an_error() -> Outcome<()> {
        let store = MemoryProfileStore::new();
        assert!(res!(store.find_organization("nobody")).is_none());
        assert!(res!(store.find_partner("nobody")).is_none());
        Ok(())
    }

    #[test]
    fn added_profiles_are_found_by_as2_name() -> Outcome<()> {
        let store = MemoryProfileStore::new();
        store.add_organization(Organization::new("AcmeOrg"));
        let found = res!(store.find_organization("AcmeOrg"));
        assert!(found.is_some());
        Ok(())
    }
}
