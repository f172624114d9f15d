use std::collections::BTreeMap;

use foundation::geo::LatLng;

use crate::tile::{TileId, TileRecord};
use crate::visible_set::VisibleSet;

/// Immutable per-task tile store (the geometry index).
///
/// Built once from a decoded feature collection; every per-frame computation
/// reads the cached bounds boxes, nothing is derived from geometry again.
///
/// Ordering contract:
/// - `iter` yields tiles in ingestion order.
/// - `tile_at` resolves ties (overlapping boxes) to the lowest tile id.
#[derive(Debug, Default)]
pub struct TileIndex {
    tiles: Vec<TileRecord>,
    by_id: BTreeMap<TileId, usize>,
}

impl TileIndex {
    /// `tiles` must be in ingestion order (`ingestion_index` == position).
    /// On duplicate ids the first record wins, matching upstream lookups
    /// that stop at the first feature.
    pub fn new(tiles: Vec<TileRecord>) -> Self {
        let mut by_id = BTreeMap::new();
        for (pos, tile) in tiles.iter().enumerate() {
            by_id.entry(tile.id.clone()).or_insert(pos);
        }
        Self { tiles, by_id }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileRecord> {
        self.tiles.iter()
    }

    pub fn get(&self, id: &TileId) -> Option<&TileRecord> {
        self.by_id.get(id).map(|pos| &self.tiles[*pos])
    }

    pub fn by_ingestion_index(&self, index: u32) -> Option<&TileRecord> {
        self.tiles.get(index as usize)
    }

    /// The visible tile under a geographic point, if any.
    ///
    /// Hover re-validation calls this after rebuilds: only tiles currently in
    /// the visible set count, so a focus on a just-hidden tile resolves to
    /// `None` instead of a stale reference.
    pub fn tile_at(&self, point: LatLng, visible: &VisibleSet) -> Option<&TileRecord> {
        for id in visible.iter() {
            let Some(tile) = self.get(id) else {
                continue;
            };
            if tile.bounds.contains(point) {
                return Some(tile);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use foundation::geo::{GeoBounds, LatLng};

    use super::TileIndex;
    use crate::tile::{TileId, TileProperties, TileRecord};
    use crate::visible_set::VisibleSet;

    fn tile(id: &str, index: u32, bounds: GeoBounds) -> TileRecord {
        TileRecord {
            id: TileId::new(id),
            bounds,
            properties: TileProperties::default(),
            ingestion_index: index,
        }
    }

    #[test]
    fn lookup_by_id_and_ingestion_index() {
        let index = TileIndex::new(vec![
            tile("a", 0, GeoBounds::new(0.0, 0.0, 1.0, 1.0)),
            tile("b", 1, GeoBounds::new(1.0, 1.0, 2.0, 2.0)),
        ]);

        assert_eq!(index.get(&TileId::new("b")).unwrap().ingestion_index, 1);
        assert_eq!(index.by_ingestion_index(0).unwrap().id, TileId::new("a"));
        assert!(index.get(&TileId::new("c")).is_none());
    }

    #[test]
    fn tile_at_ignores_tiles_outside_visible_set() {
        let index = TileIndex::new(vec![
            tile("a", 0, GeoBounds::new(0.0, 0.0, 10.0, 10.0)),
            tile("b", 1, GeoBounds::new(0.0, 0.0, 10.0, 10.0)),
        ]);

        let only_b: VisibleSet = [TileId::new("b")].into_iter().collect();
        let hit = index.tile_at(LatLng::new(5.0, 5.0), &only_b).unwrap();
        assert_eq!(hit.id, TileId::new("b"));

        let none = VisibleSet::new();
        assert!(index.tile_at(LatLng::new(5.0, 5.0), &none).is_none());
    }

    #[test]
    fn tile_at_tie_breaks_by_lowest_id() {
        let index = TileIndex::new(vec![
            tile("z", 0, GeoBounds::new(0.0, 0.0, 10.0, 10.0)),
            tile("m", 1, GeoBounds::new(0.0, 0.0, 10.0, 10.0)),
        ]);
        let both: VisibleSet = [TileId::new("z"), TileId::new("m")].into_iter().collect();
        let hit = index.tile_at(LatLng::new(5.0, 5.0), &both).unwrap();
        assert_eq!(hit.id, TileId::new("m"));
    }
}
