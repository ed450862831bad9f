use crate::models::Order;
use std::collections::BTreeSet;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please select at least one ticket to cancel.")]
    Empty,
}

/// Parse raw form values into position identifiers.
///
/// Values that do not parse as integers are dropped rather than failing the
/// whole request.
pub fn parse_position_ids(raw: &[String]) -> BTreeSet<u64> {
    raw.iter()
        .filter_map(|value| value.trim().parse::<u64>().ok())
        .collect()
}

/// Resolve identifiers against the order's current non-canceled positions,
/// keeping position order. Unknown identifiers are dropped.
pub fn resolve_selection(order: &Order, ids: &BTreeSet<u64>) -> Vec<u64> {
    order
        .live_positions()
        .filter(|p| ids.contains(&p.id))
        .map(|p| p.id)
        .collect()
}

/// Remove add-ons whose parent is also selected.
///
/// Canceling the parent cascades to its add-ons on the host side; listing
/// them directly would request the same cancellation twice. An add-on whose
/// parent is not selected stays and is canceled directly.
pub fn strip_implied_addons(order: &Order, selected: &[u64]) -> Vec<u64> {
    let mut implied = BTreeSet::new();
    for id in selected {
        if let Some(pos) = order.position(*id) {
            if !pos.is_addon() {
                implied.extend(order.addons_of(*id).map(|addon| addon.id));
            }
        }
    }
    selected
        .iter()
        .copied()
        .filter(|id| !implied.contains(id))
        .collect()
}

/// Full pipeline from raw form input to the direct-cancel set.
pub fn build_cancel_set(order: &Order, raw: &[String]) -> Result<Vec<u64>, SelectionError> {
    let ids = parse_position_ids(raw);
    let selected = resolve_selection(order, &ids);
    if selected.is_empty() {
        return Err(SelectionError::Empty);
    }
    let direct = strip_implied_addons(order, &selected);
    if direct.is_empty() {
        return Err(SelectionError::Empty);
    }
    Ok(direct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    /// A parent, one add-on of the parent, and a standalone position.
    fn addon_order() -> (Order, u64, u64, u64) {
        let mut order = Order::new("democon", "AB1CD", "z9x8c7");
        let parent = order.add_position("Standard ticket", Decimal::ZERO, None);
        let addon = order.add_position("Workshop", Decimal::ZERO, Some(parent));
        let standalone = order.add_position("Standard ticket", Decimal::ZERO, None);
        (order, parent, addon, standalone)
    }

    #[test]
    fn test_malformed_ids_are_dropped() {
        let ids = parse_position_ids(&strings(&["abc", "5", "", " 7 ", "-3"]));
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![5, 7]);
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let (order, parent, _, _) = addon_order();
        let ids = parse_position_ids(&strings(&["999", &parent.to_string()]));
        assert_eq!(resolve_selection(&order, &ids), vec![parent]);
    }

    #[test]
    fn test_canceled_positions_are_not_resolvable() {
        let (mut order, parent, _, standalone) = addon_order();
        order.positions[0].canceled = true;
        let ids = [parent, standalone].into_iter().collect();
        assert_eq!(resolve_selection(&order, &ids), vec![standalone]);
    }

    #[test]
    fn test_selected_addon_of_selected_parent_is_stripped() {
        let (order, parent, addon, standalone) = addon_order();
        let direct = strip_implied_addons(&order, &[parent, addon, standalone]);
        assert_eq!(direct, vec![parent, standalone]);
    }

    #[test]
    fn test_strip_is_idempotent() {
        let (order, parent, addon, standalone) = addon_order();
        let once = strip_implied_addons(&order, &[parent, addon, standalone]);
        let twice = strip_implied_addons(&order, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_addon_without_selected_parent_stays() {
        let (order, _, addon, _) = addon_order();
        let direct = strip_implied_addons(&order, &[addon]);
        assert_eq!(direct, vec![addon]);
    }

    #[test]
    fn test_already_canceled_addons_are_not_stripped_targets() {
        let (mut order, parent, addon, _) = addon_order();
        order.positions[1].canceled = true;
        // the canceled add-on no longer resolves, and the parent has no live
        // add-ons left to imply
        let ids = [parent, addon].into_iter().collect();
        let selected = resolve_selection(&order, &ids);
        assert_eq!(selected, vec![parent]);
        assert_eq!(strip_implied_addons(&order, &selected), vec![parent]);
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let (order, _, _, _) = addon_order();
        assert_eq!(
            build_cancel_set(&order, &strings(&[])),
            Err(SelectionError::Empty)
        );
        assert_eq!(
            build_cancel_set(&order, &strings(&["abc", "999"])),
            Err(SelectionError::Empty)
        );
    }

    #[test]
    fn test_full_pipeline_mixed_input() {
        let (order, parent, addon, standalone) = addon_order();
        let raw = strings(&[
            "abc",
            &parent.to_string(),
            &addon.to_string(),
            &standalone.to_string(),
            "424242",
        ]);
        assert_eq!(build_cancel_set(&order, &raw), Ok(vec![parent, standalone]));
    }
}
