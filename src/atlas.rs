use std::collections::HashMap;

/// One named tile strip registered with the atlas. Animated tiles occupy
/// `frames` consecutive indices starting at their assigned base index.
#[derive(Debug, Clone)]
pub struct TileEntry {
    pub name: String,
    pub frames: u32,
    pub speed: f32,
}

impl TileEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            frames: 1,
            speed: 0.0,
        }
    }

    pub fn animated(name: &str, frames: u32, speed: f32) -> Self {
        Self {
            name: name.to_string(),
            frames,
            speed,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AtlasAnimation {
    pub start_index: u32,
    pub frame_count: u32,
    pub speed: f32,
}

impl AtlasAnimation {
    pub fn animated(&self) -> bool {
        self.frame_count > 1
    }
}

/// Name-to-tile-index table for the texture atlas.
///
/// Image decoding and physical packing live outside the engine; the mesher
/// only ever needs the index a name resolves to plus animation metadata, so
/// that is all this type carries.
#[derive(Debug, Default)]
pub struct TextureAtlas {
    name_to_index: HashMap<String, u32>,
    animations: HashMap<String, AtlasAnimation>,
    tile_count: u32,
}

impl TextureAtlas {
    pub fn build(tiles: &[TileEntry]) -> Self {
        let mut atlas = Self::default();
        for tile in tiles {
            let start = atlas.tile_count;
            atlas.name_to_index.insert(tile.name.clone(), start);
            if tile.frames > 1 {
                atlas.animations.insert(
                    tile.name.clone(),
                    AtlasAnimation {
                        start_index: start,
                        frame_count: tile.frames,
                        speed: tile.speed,
                    },
                );
            }
            atlas.tile_count += tile.frames.max(1);
        }
        atlas
    }

    /// The standard tile set every world build expects to exist.
    pub fn with_default_tiles() -> Self {
        let tiles = [
            TileEntry::new("grass_top"),
            TileEntry::new("grass_side"),
            TileEntry::new("dirt"),
            TileEntry::new("stone"),
            TileEntry::new("sand"),
            TileEntry::new("gravel"),
            TileEntry::new("snow"),
            TileEntry::animated("water", 32, 0.6),
            TileEntry::new("oak_log"),
            TileEntry::new("oak_log_top"),
            TileEntry::new("oak_leaves"),
            TileEntry::new("oak_planks"),
            TileEntry::new("glass"),
            TileEntry::new("poppy"),
            TileEntry::new("dandelion"),
            TileEntry::new("tall_grass"),
            TileEntry::new("dead_bush"),
            TileEntry::new("blue_orchid"),
            TileEntry::new("allium"),
            TileEntry::new("azure_bluet"),
            TileEntry::new("red_tulip"),
            TileEntry::new("orange_tulip"),
            TileEntry::new("white_tulip"),
            TileEntry::new("pink_tulip"),
            TileEntry::new("oxeye_daisy"),
            TileEntry::new("cornflower"),
            TileEntry::new("lily_of_the_valley"),
            TileEntry::new("cactus_side"),
            TileEntry::new("cactus_top"),
            TileEntry::new("cactus_bottom"),
        ];
        Self::build(&tiles)
    }

    pub fn tile_index(&self, name: &str) -> Option<u32> {
        self.name_to_index.get(name).copied()
    }

    pub fn animation_info(&self, name: &str) -> AtlasAnimation {
        self.animations.get(name).copied().unwrap_or(AtlasAnimation {
            start_index: self.tile_index(name).unwrap_or(0),
            frame_count: 1,
            speed: 0.0,
        })
    }

    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }
}
