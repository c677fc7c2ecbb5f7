use crate::domain::order::NormalizedOrder;
use crate::domain::restaurant::RestaurantTag;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestaurantGroup {
    pub restaurant: RestaurantTag,
    pub orders: Vec<NormalizedOrder>,
}

/// Orders partitioned by restaurant, groups in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantGroups {
    groups: Vec<RestaurantGroup>,
}

impl RestaurantGroups {
    pub fn iter(&self) -> impl Iterator<Item = &RestaurantGroup> {
        self.groups.iter()
    }

    pub fn get(&self, restaurant: &RestaurantTag) -> Option<&RestaurantGroup> {
        self.groups
            .iter()
            .find(|group| &group.restaurant == restaurant)
    }

    pub fn restaurants(&self) -> impl Iterator<Item = &RestaurantTag> {
        self.groups.iter().map(|group| &group.restaurant)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn order_count(&self) -> usize {
        self.groups.iter().map(|group| group.orders.len()).sum()
    }
}

impl IntoIterator for RestaurantGroups {
    type Item = RestaurantGroup;
    type IntoIter = std::vec::IntoIter<RestaurantGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Stable partition by restaurant tag; no sorting.
pub fn group_by_restaurant<I>(orders: I) -> RestaurantGroups
where
    I: IntoIterator<Item = NormalizedOrder>,
{
    let mut groups: Vec<RestaurantGroup> = Vec::new();
    let mut index: HashMap<RestaurantTag, usize> = HashMap::new();

    for order in orders {
        match index.get(&order.restaurant) {
            Some(&slot) => groups[slot].orders.push(order),
            None => {
                index.insert(order.restaurant.clone(), groups.len());
                groups.push(RestaurantGroup {
                    restaurant: order.restaurant.clone(),
                    orders: vec![order],
                });
            }
        }
    }

    RestaurantGroups { groups }
}

#[cfg(test)]
mod tests {
    use super::group_by_restaurant;
    use crate::domain::order::{normalize_orders, RawOrder};

    fn order(email: &str, meal: &str) -> RawOrder {
        RawOrder::new()
            .with_field("Email Address", email)
            .with_field("meal", meal)
    }

    #[test]
    fn groups_follow_first_appearance_and_input_order() {
        let orders = normalize_orders(&[
            order("a@x.com", "[Sushi] Maki"),
            order("b@x.com", "[Fafa] Salad"),
            order("c@x.com", "[SUSHI] Nigiri"),
            order("d@x.com", "Soup"),
        ]);
        let groups = group_by_restaurant(orders);

        let names: Vec<&str> = groups.restaurants().map(|tag| tag.as_str()).collect();
        assert_eq!(names, vec!["[sushi]", "[fafa]", "[unknown_restaurant]"]);

        let sushi: Vec<&str> = groups
            .iter()
            .next()
            .unwrap()
            .orders
            .iter()
            .map(|o| o.requested_by.as_str())
            .collect();
        assert_eq!(sushi, vec!["a", "c"]);
        assert_eq!(groups.order_count(), 4);
    }

    #[test]
    fn every_order_lands_in_exactly_one_group() {
        let orders = normalize_orders(&[
            order("a@x.com", "[A] one"),
            order("b@x.com", "[B] two"),
            order("c@x.com", "[A] three"),
        ]);
        let total = orders.len();
        let groups = group_by_restaurant(orders);
        assert_eq!(groups.order_count(), total);
        assert!(groups.iter().all(|g| !g.restaurant.as_str().is_empty()));
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(group_by_restaurant(Vec::new()).is_empty());
    }
}
