//! Specialized collection types
//!
//! Stable handles are slot-map keys. Holders of a handle never own the value
//! it refers to, which keeps the scene tree free of back-references.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a mesh resident in a render backend
    pub struct MeshId;

    /// Handle to a track stored in the scene's track table
    pub struct TrackId;
}

/// Handle-based map keyed by a typed slot-map key
pub type HandleMap<K, T> = SlotMap<K, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_handle_does_not_resolve() {
        let mut map: HandleMap<TrackId, &str> = HandleMap::with_key();
        let a = map.insert("loop");
        let b = map.insert("figure eight");
        assert_eq!(map.remove(a), Some("loop"));
        assert!(map.get(a).is_none());
        assert_eq!(map.get(b), Some(&"figure eight"));
    }
}
