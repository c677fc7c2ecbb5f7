use crate::domain::order::{normalize_orders, RawOrder};
use crate::domain::restaurant::RestaurantTag;
use crate::rules::grouping::{group_by_restaurant, RestaurantGroups};
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealCount {
    pub meal: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantTally {
    pub restaurant: RestaurantTag,
    pub meals: Vec<MealCount>,
}

impl RestaurantTally {
    pub fn total(&self) -> usize {
        self.meals.iter().map(|meal| meal.count).sum()
    }

    pub fn count_of(&self, meal: &str) -> Option<usize> {
        self.meals
            .iter()
            .find(|entry| entry.meal == meal)
            .map(|entry| entry.count)
    }
}

/// Per-restaurant meal counts. Serializes as `{ "[tag]": { "meal": n } }`
/// keeping first-seen order for both levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealTally {
    pub restaurants: Vec<RestaurantTally>,
}

impl MealTally {
    pub fn get(&self, restaurant: &str) -> Option<&RestaurantTally> {
        self.restaurants
            .iter()
            .find(|entry| entry.restaurant.as_str() == restaurant)
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    pub fn total_meals(&self) -> usize {
        self.restaurants.iter().map(RestaurantTally::total).sum()
    }
}

pub fn tally_meals(groups: &RestaurantGroups) -> MealTally {
    let restaurants = groups
        .iter()
        .map(|group| {
            let mut meals: Vec<MealCount> = Vec::new();
            for order in &group.orders {
                match meals.iter_mut().find(|entry| entry.meal == order.dish) {
                    Some(entry) => entry.count += 1,
                    None => meals.push(MealCount {
                        meal: order.dish.clone(),
                        count: 1,
                    }),
                }
            }
            RestaurantTally {
                restaurant: group.restaurant.clone(),
                meals,
            }
        })
        .collect();

    MealTally { restaurants }
}

/// Normalize, group and count in one pass over raw rows.
pub fn tally_orders(orders: &[RawOrder]) -> MealTally {
    tally_meals(&group_by_restaurant(normalize_orders(orders)))
}

struct MealsMap<'a>(&'a [MealCount]);

impl Serialize for MealsMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(&entry.meal, &entry.count)?;
        }
        map.end()
    }
}

impl Serialize for MealTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.restaurants.len()))?;
        for entry in &self.restaurants {
            map.serialize_entry(entry.restaurant.as_str(), &MealsMap(&entry.meals))?;
        }
        map.end()
    }
}
