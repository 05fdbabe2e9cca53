//! Customer id collection over the services in view.

use crate::domain::{CustomerId, Floor};
use crate::models::{CustomerSummary, ServiceRecord};
use std::collections::{HashMap, HashSet};

/// An insertion-ordered set of customer ids.
///
/// Equality compares the ordered contents, so two sets built from the same
/// services in the same order are equal.
#[derive(Debug, Clone, Default)]
pub struct OrderedIdSet {
    order: Vec<CustomerId>,
    seen: HashSet<CustomerId>,
}

impl OrderedIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an id, keeping its first-seen position. Returns false if it
    /// was already present.
    pub fn insert(&mut self, id: CustomerId) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id.clone());
        self.order.push(id);
        true
    }

    pub fn contains(&self, id: &CustomerId) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CustomerId> {
        self.order.iter()
    }

    pub fn as_slice(&self) -> &[CustomerId] {
        &self.order
    }
}

impl PartialEq for OrderedIdSet {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for OrderedIdSet {}

impl FromIterator<CustomerId> for OrderedIdSet {
    fn from_iter<I: IntoIterator<Item = CustomerId>>(iter: I) -> Self {
        let mut set = OrderedIdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a OrderedIdSet {
    type Item = &'a CustomerId;
    type IntoIter = std::slice::Iter<'a, CustomerId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

/// Services whose floor matches the filter, or all services without one.
pub fn services_in_view(
    services: &[ServiceRecord],
    floor_filter: Option<Floor>,
) -> impl Iterator<Item = &ServiceRecord> {
    services
        .iter()
        .filter(move |service| floor_filter.map_or(true, |floor| service.floor == floor))
}

/// Collect the distinct customer ids of the services in view, in the order
/// they are first seen.
///
/// An empty service list, or a filter that matches nothing, yields an empty
/// set.
pub fn recompute_id_set(services: &[ServiceRecord], floor_filter: Option<Floor>) -> OrderedIdSet {
    services_in_view(services, floor_filter)
        .flat_map(|service| service.customers_list.ids().cloned())
        .collect()
}

/// Inline summaries for the customers in view. When a customer appears in
/// several services, the last one seen wins.
pub fn collect_summaries(
    services: &[ServiceRecord],
    floor_filter: Option<Floor>,
) -> HashMap<CustomerId, CustomerSummary> {
    let mut summaries = HashMap::new();
    for service in services_in_view(services, floor_filter) {
        for (id, summary) in service.customers_list.iter() {
            summaries.insert(id.clone(), summary.clone());
        }
    }
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CustomerId {
        CustomerId::new(s).unwrap()
    }

    fn two_floor_services() -> Vec<ServiceRecord> {
        vec![
            ServiceRecord::new(1, Floor::new(1)).with_customer(id("c1"), CustomerSummary::named("A")),
            ServiceRecord::new(2, Floor::new(2))
                .with_customer(id("c1"), CustomerSummary::named("A2"))
                .with_customer(id("c2"), CustomerSummary::named("B")),
        ]
    }

    #[test]
    fn test_ordered_set_keeps_first_position() {
        let mut set = OrderedIdSet::new();
        assert!(set.insert(id("b")));
        assert!(set.insert(id("a")));
        assert!(!set.insert(id("b")));
        assert_eq!(set.as_slice(), &[id("b"), id("a")]);
    }

    #[test]
    fn test_recompute_without_filter() {
        let ids = recompute_id_set(&two_floor_services(), None);
        assert_eq!(ids.as_slice(), &[id("c1"), id("c2")]);
    }

    #[test]
    fn test_recompute_with_filter() {
        let services = two_floor_services();
        assert_eq!(
            recompute_id_set(&services, Some(Floor::new(2))).as_slice(),
            &[id("c1"), id("c2")]
        );
        assert_eq!(
            recompute_id_set(&services, Some(Floor::new(1))).as_slice(),
            &[id("c1")]
        );
        assert!(recompute_id_set(&services, Some(Floor::new(9))).is_empty());
    }

    #[test]
    fn test_recompute_empty_services() {
        assert!(recompute_id_set(&[], None).is_empty());
        assert!(recompute_id_set(&[], Some(Floor::new(1))).is_empty());
    }

    #[test]
    fn test_last_seen_summary_wins() {
        let summaries = collect_summaries(&two_floor_services(), None);
        assert_eq!(summaries[&id("c1")].name.as_deref(), Some("A2"));

        let floor_one = collect_summaries(&two_floor_services(), Some(Floor::new(1)));
        assert_eq!(floor_one[&id("c1")].name.as_deref(), Some("A"));
        assert!(!floor_one.contains_key(&id("c2")));
    }
}
