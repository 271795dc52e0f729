use crate::engine::view_state::{SortKey, SortOrder, Tab};
use crate::models::Property;
use serde::Serialize;

/// Badge counts for each tab, over the whole loaded set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TabCounts {
    pub all: usize,
    pub liked: usize,
    pub disliked: usize,
}

fn matches_tab(property: &Property, tab: Tab) -> bool {
    match tab {
        Tab::All => !property.disliked,
        Tab::Liked => property.liked,
        Tab::Disliked => property.disliked,
    }
}

/// Missing values sort as 0
fn sort_value(property: &Property, key: SortKey) -> f64 {
    match key {
        SortKey::Price => property.price.unwrap_or(0) as f64,
        SortKey::Beds => property.beds.unwrap_or(0) as f64,
        SortKey::SquareFeet => property.square_feet.unwrap_or(0) as f64,
    }
}

/// Filter `properties` to `tab` and sort by `sort_by`.
///
/// The sort is stable, so ties keep their loaded order in both directions.
pub fn derive_view(
    properties: &[Property],
    tab: Tab,
    sort_by: SortKey,
    sort_order: SortOrder,
) -> Vec<&Property> {
    let mut view: Vec<&Property> = properties.iter().filter(|p| matches_tab(p, tab)).collect();

    view.sort_by(|a, b| {
        let (a, b) = (sort_value(a, sort_by), sort_value(b, sort_by));
        match sort_order {
            SortOrder::Asc => a.total_cmp(&b),
            SortOrder::Desc => b.total_cmp(&a),
        }
    });
    view
}

pub fn tab_counts(properties: &[Property]) -> TabCounts {
    properties.iter().fold(TabCounts::default(), |mut counts, p| {
        if matches_tab(p, Tab::All) {
            counts.all += 1;
        }
        if p.liked {
            counts.liked += 1;
        }
        if p.disliked {
            counts.disliked += 1;
        }
        counts
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(id: &str, price: Option<i64>) -> Property {
        let mut p = Property::new(id, format!("{} Main St", id));
        p.price = price;
        p
    }

    fn ids(view: &[&Property]) -> Vec<String> {
        view.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn sorts_by_price_both_ways() {
        let props = vec![priced("1", Some(500_000)), priced("2", Some(300_000))];

        let asc = derive_view(&props, Tab::All, SortKey::Price, SortOrder::Asc);
        assert_eq!(ids(&asc), vec!["2", "1"]);

        let desc = derive_view(&props, Tab::All, SortKey::Price, SortOrder::Desc);
        assert_eq!(ids(&desc), vec!["1", "2"]);
    }

    #[test]
    fn missing_values_sort_as_zero() {
        let mut a = Property::new("a", "a");
        a.square_feet = Some(1200);
        let b = Property::new("b", "b");
        let props = vec![a, b];

        let asc = derive_view(&props, Tab::All, SortKey::SquareFeet, SortOrder::Asc);
        assert_eq!(ids(&asc), vec!["b", "a"]);
    }

    #[test]
    fn asc_and_desc_reverse_non_tied_elements() {
        let props = vec![
            priced("1", Some(10)),
            priced("2", Some(30)),
            priced("3", Some(20)),
            priced("4", None),
        ];
        let asc = ids(&derive_view(&props, Tab::All, SortKey::Price, SortOrder::Asc));
        let mut desc = ids(&derive_view(&props, Tab::All, SortKey::Price, SortOrder::Desc));
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn flag_tabs_hold_exactly_their_subset_under_every_sort() {
        let mut props = Vec::new();
        for (i, price) in [400_000, 250_000, 610_000, 330_000, 180_000].iter().enumerate() {
            let mut p = priced(&i.to_string(), Some(*price));
            p.beds = Some(5 - i as u32);
            p.square_feet = Some(900 + 150 * i as u32);
            match i % 3 {
                0 => p.set_liked(true),
                1 => p.set_disliked(true),
                _ => {}
            }
            props.push(p);
        }

        for sort_by in [SortKey::Price, SortKey::Beds, SortKey::SquareFeet] {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let mut liked = ids(&derive_view(&props, Tab::Liked, sort_by, order));
                liked.sort();
                assert_eq!(liked, vec!["0", "3"], "{:?} {:?}", sort_by, order);

                let mut disliked = ids(&derive_view(&props, Tab::Disliked, sort_by, order));
                disliked.sort();
                assert_eq!(disliked, vec!["1", "4"], "{:?} {:?}", sort_by, order);
            }
        }
    }

    #[test]
    fn tabs_filter_by_flags() {
        let mut liked = priced("liked", Some(1));
        liked.set_liked(true);
        let mut disliked = priced("disliked", Some(2));
        disliked.set_disliked(true);
        let neutral = priced("neutral", Some(3));
        let props = vec![liked, disliked, neutral];

        let all = derive_view(&props, Tab::All, SortKey::Price, SortOrder::Asc);
        assert!(all.iter().all(|p| !p.disliked));
        assert_eq!(ids(&all), vec!["liked", "neutral"]);

        let only_liked = derive_view(&props, Tab::Liked, SortKey::Beds, SortOrder::Desc);
        assert_eq!(ids(&only_liked), vec!["liked"]);

        let only_disliked = derive_view(&props, Tab::Disliked, SortKey::Price, SortOrder::Asc);
        assert_eq!(ids(&only_disliked), vec!["disliked"]);

        assert_eq!(
            tab_counts(&props),
            TabCounts {
                all: 2,
                liked: 1,
                disliked: 1
            }
        );
    }
}
