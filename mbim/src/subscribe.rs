use crate::service::Service;
use std::collections::HashSet;

/// One service's notification subscription: an empty `cids` set means "all
/// notifications of this service" (spec.md §4.7).
#[derive(Debug, Clone)]
pub struct SubscriptionEntry {
    pub service: Service,
    pub cids: HashSet<u32>,
}

/// A subscription list compared structurally and order-independently (spec.md §4.7:
/// "Equality is structural (order independent)").
#[derive(Debug, Clone, Default)]
pub struct SubscriptionList {
    entries: Vec<SubscriptionEntry>,
}

impl PartialEq for SubscriptionList {
    fn eq(&self, other: &Self) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.entries.iter().all(|entry| {
            other
                .entries
                .iter()
                .any(|candidate| candidate.service == entry.service && candidate.cids == entry.cids)
        })
    }
}
impl Eq for SubscriptionList {}

impl SubscriptionList {
    pub fn new(entries: Vec<SubscriptionEntry>) -> SubscriptionList {
        SubscriptionList { entries }
    }

    pub fn entries(&self) -> &[SubscriptionEntry] {
        &self.entries
    }

    fn entry_mut(&mut self, service: Service) -> Option<&mut SubscriptionEntry> {
        self.entries.iter_mut().find(|e| e.service == service)
    }

    /// The fixed canonical standard-service subscription (spec.md §4.7: "a fixed
    /// canonical list of (basic-connect, sms, ussd, phonebook, stk) with hard-coded
    /// cids"). Each standard service subscribes its sole well-known instance, cid 0.
    pub fn standard() -> SubscriptionList {
        SubscriptionList::new(
            [Service::BasicConnect, Service::Sms, Service::Ussd, Service::Phonebook, Service::Stk]
                .iter()
                .map(|&service| SubscriptionEntry {
                    service,
                    cids: std::iter::once(0).collect(),
                })
                .collect(),
        )
    }

    /// Merges `addition` into `self` (spec.md §4.7 merge rules): standard-service
    /// entries in `addition` are never merged in (the aggregator owns its own standard
    /// subscription); non-standard entries are unioned or appended; an "all cids"
    /// addition (empty set) clears an existing entry's set to also mean "all".
    pub fn merge(mut self, addition: &SubscriptionList) -> SubscriptionList {
        for added in &addition.entries {
            if added.service.is_standard() {
                continue;
            }

            match self.entry_mut(added.service) {
                Some(existing) => {
                    if added.cids.is_empty() {
                        existing.cids.clear();
                    } else if !existing.cids.is_empty() {
                        existing.cids.extend(added.cids.iter().copied());
                    }
                    // existing.cids already empty ("all") absorbs any further addition
                }
                None => self.entries.push(added.clone()),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(service: Service, cids: &[u32]) -> SubscriptionEntry {
        SubscriptionEntry {
            service,
            cids: cids.iter().copied().collect(),
        }
    }

    #[test]
    fn standard_services_are_never_merged_from_additions() {
        let base = SubscriptionList::standard();
        let addition = SubscriptionList::new(vec![entry(Service::BasicConnect, &[99])]);
        let merged = base.clone().merge(&addition);
        assert_eq!(merged, base, "a standard-service addition must be ignored entirely");
    }

    #[test]
    fn non_standard_entry_extends_or_appends() {
        let custom_a = Service::Custom("11111111-1111-1111-1111-111111111111".parse().unwrap());
        let base = SubscriptionList::new(vec![entry(custom_a, &[1])]);
        let addition = SubscriptionList::new(vec![entry(custom_a, &[2])]);

        let merged = base.merge(&addition);
        assert_eq!(merged.entries().len(), 1);
        assert_eq!(merged.entries()[0].cids, [1, 2].iter().copied().collect());
    }

    #[test]
    fn all_cids_addition_clears_existing_set() {
        let custom = Service::Custom("22222222-2222-2222-2222-222222222222".parse().unwrap());
        let base = SubscriptionList::new(vec![entry(custom, &[1, 2])]);
        let addition = SubscriptionList::new(vec![entry(custom, &[])]);

        let merged = base.merge(&addition);
        assert!(merged.entries()[0].cids.is_empty(), "empty set means 'all'");
    }

    #[test]
    fn merge_is_associative_for_non_standard_additions() {
        let custom = Service::Custom("33333333-3333-3333-3333-333333333333".parse().unwrap());
        let a = SubscriptionList::standard();
        let b = SubscriptionList::new(vec![entry(custom, &[1])]);
        let c = SubscriptionList::new(vec![entry(custom, &[2])]);

        let left = a.clone().merge(&b).merge(&c);
        let right = a.merge(&b.clone().merge(&c));

        assert_eq!(left, right);
    }

    #[test]
    fn equality_is_order_independent() {
        let x = SubscriptionList::new(vec![entry(Service::Sms, &[1]), entry(Service::Ussd, &[2])]);
        let y = SubscriptionList::new(vec![entry(Service::Ussd, &[2]), entry(Service::Sms, &[1])]);
        assert_eq!(x, y);
    }
}
