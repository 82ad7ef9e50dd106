use std::cmp::Ordering;

use shuen_common::{Entity, EntityId};

/// Back-to-front comparator: lower layers first, then higher world Y first.
pub fn draw_cmp(a: &Entity, b: &Entity) -> Ordering {
    // `+ 0.0` folds -0.0 into 0.0 so the two tie.
    let (ay, by) = (a.position.y + 0.0, b.position.y + 0.0);
    a.layer.cmp(&b.layer).then_with(|| by.total_cmp(&ay))
}

/// Reorder `entities` into draw order. Stable: ties keep their relative
/// order, so repeated sorts of an unchanged registry change nothing.
pub fn sort_for_drawing(entities: &mut [(EntityId, Entity)]) {
    entities.sort_by(|(_, a), (_, b)| draw_cmp(a, b));
}

/// Draw order as indices into `entities`, without reordering them.
pub fn draw_order(entities: &[(EntityId, Entity)]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entities.len()).collect();
    order.sort_by(|&a, &b| draw_cmp(&entities[a].1, &entities[b].1));
    order
}
