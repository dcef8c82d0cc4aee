//! # Host Handle Types
//!
//! Lightweight views of host objects passed into event contexts.
//! Handles are cheap to clone: names are shared `Arc<str>`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A player known to the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayerRef {
    /// Host entity id.
    pub entity_id: u64,
    /// Display name.
    pub name: Arc<str>,
}

impl PlayerRef {
    /// Creates a player handle.
    #[must_use]
    pub fn new(entity_id: u64, name: impl Into<Arc<str>>) -> Self {
        Self {
            entity_id,
            name: name.into(),
        }
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (entity {})", self.name, self.entity_id)
    }
}

/// A level (world dimension) known to the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LevelRef {
    /// Dimension identifier, e.g. `minecraft:overworld`.
    pub dimension: Arc<str>,
    /// Whether this level lives on the logical client.
    pub is_client: bool,
}

impl LevelRef {
    /// Creates a server-side level handle.
    #[must_use]
    pub fn new(dimension: impl Into<Arc<str>>) -> Self {
        Self {
            dimension: dimension.into(),
            is_client: false,
        }
    }

    /// Marks the level as client-side.
    #[must_use]
    pub const fn client(mut self) -> Self {
        self.is_client = true;
        self
    }
}

/// Integer block coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    /// East/west.
    pub x: i32,
    /// Up/down.
    pub y: i32,
    /// North/south.
    pub z: i32,
}

impl BlockPos {
    /// World origin.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Creates a position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position directly below.
    #[inline]
    #[must_use]
    pub const fn below(self) -> Self {
        Self::new(self.x, self.y - 1, self.z)
    }

    /// Position directly above.
    #[inline]
    #[must_use]
    pub const fn above(self) -> Self {
        Self::new(self.x, self.y + 1, self.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Namespaced block identifier, e.g. `minecraft:bedrock`.
///
/// An identifier without a colon belongs to the `minecraft` namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(Arc<str>);

impl BlockId {
    /// Namespace assumed when none is given.
    pub const DEFAULT_NAMESPACE: &'static str = "minecraft";

    /// Creates an identifier.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace part.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.0
            .split_once(':')
            .map_or(Self::DEFAULT_NAMESPACE, |(namespace, _)| namespace)
    }

    /// Path part.
    #[must_use]
    pub fn path(&self) -> &str {
        self.0.split_once(':').map_or(&self.0, |(_, path)| path)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace(), self.path())
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A block state: the block type plus its property values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockState {
    block: BlockId,
    properties: BTreeMap<String, String>,
}

impl BlockState {
    /// Default state of `block`.
    #[must_use]
    pub fn new(block: impl Into<BlockId>) -> Self {
        Self {
            block: block.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Sets a property value.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Block type of this state.
    #[must_use]
    pub const fn block(&self) -> &BlockId {
        &self.block
    }

    /// Value of one property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// All properties, sorted by key.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.block)?;
        if !self.properties.is_empty() {
            let props: Vec<String> = self
                .properties
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, "[{}]", props.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_namespace() {
        let stone = BlockId::new("stone");
        assert_eq!(stone.namespace(), "minecraft");
        assert_eq!(stone.path(), "stone");
        assert_eq!(stone.to_string(), "minecraft:stone");

        let ore = BlockId::new("felis:catnip_ore");
        assert_eq!(ore.namespace(), "felis");
        assert_eq!(ore.path(), "catnip_ore");
    }

    #[test]
    fn test_block_state_display() {
        let state = BlockState::new("minecraft:oak_log").with_property("axis", "y");
        assert_eq!(state.property("axis"), Some("y"));
        assert_eq!(state.property("waterlogged"), None);
        assert_eq!(state.to_string(), "minecraft:oak_log[axis=y]");
        assert_eq!(BlockState::new("dirt").to_string(), "minecraft:dirt");
    }

    #[test]
    fn test_block_pos_neighbours() {
        let pos = BlockPos::from([4, 64, -2]);
        assert_eq!(pos.below(), BlockPos::new(4, 63, -2));
        assert_eq!(pos.above().below(), pos);
        assert_eq!(pos.to_string(), "(4, 64, -2)");
    }
}
