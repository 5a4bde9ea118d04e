use glam::Vec3;
use thiserror::Error;

use crate::atlas::TextureAtlas;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("missing texture: {0}")]
    MissingTexture(String),
}

/// Block type id. One byte per voxel; everything else hangs off the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BlockId {
    #[default]
    Air = 0,
    Grass,
    Dirt,
    Stone,
    Sand,
    Gravel,
    Snow,
    Water,
    OakLog,
    OakLeaves,
    OakPlanks,
    Glass,
    Poppy,
    Dandelion,
    TallGrass,
    DeadBush,
    BlueOrchid,
    Allium,
    AzureBluet,
    RedTulip,
    OrangeTulip,
    WhiteTulip,
    PinkTulip,
    OxeyeDaisy,
    Cornflower,
    LilyOfTheValley,
    Cactus,
}

pub const BLOCK_COUNT: usize = BlockId::Cactus as usize + 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct BlockAnimation {
    pub start: i32,
    pub frames: u32,
    pub speed: f32,
}

impl BlockAnimation {
    pub fn animated(&self) -> bool {
        self.frames > 1
    }
}

#[derive(Debug, Clone)]
pub struct BlockInfo {
    pub solid: bool,
    pub transparent: bool,
    pub selectable: bool,
    pub liquid: bool,
    pub billboard: bool,
    pub biome_tint: bool,
    /// Atlas tile per cardinal face: +X, -X, +Y, -Y, +Z, -Z.
    pub faces: [u32; 6],
    pub tint: Vec3,
    pub emission: f32,
    /// Shading-path selector forwarded untouched to the vertex stream.
    pub material: f32,
    pub animation: BlockAnimation,
}

impl Default for BlockInfo {
    fn default() -> Self {
        Self {
            solid: false,
            transparent: false,
            selectable: false,
            liquid: false,
            billboard: false,
            biome_tint: false,
            faces: [0; 6],
            tint: Vec3::ONE,
            emission: 0.0,
            material: 0.0,
            animation: BlockAnimation::default(),
        }
    }
}

/// Fixed attribute table, one slot per `BlockId`. Built once at startup from
/// the texture atlas and read-only afterwards.
#[derive(Debug)]
pub struct BlockRegistry {
    blocks: Vec<BlockInfo>,
}

impl BlockRegistry {
    pub fn build(atlas: &TextureAtlas) -> Result<Self, RegistryError> {
        let texture = |name: &str| -> Result<u32, RegistryError> {
            atlas
                .tile_index(name)
                .ok_or_else(|| RegistryError::MissingTexture(name.to_string()))
        };

        let mut blocks = vec![BlockInfo::default(); BLOCK_COUNT];
        let mut slot = |id: BlockId, info: BlockInfo| {
            blocks[id as usize] = info;
        };

        let cube = |tile: u32| [tile; 6];

        slot(
            BlockId::Air,
            BlockInfo {
                transparent: true,
                ..Default::default()
            },
        );

        let grass_side = texture("grass_side")?;
        slot(
            BlockId::Grass,
            BlockInfo {
                solid: true,
                selectable: true,
                biome_tint: true,
                faces: [
                    grass_side,
                    grass_side,
                    texture("grass_top")?,
                    texture("dirt")?,
                    grass_side,
                    grass_side,
                ],
                tint: Vec3::new(0.48, 0.65, 0.36),
                ..Default::default()
            },
        );

        slot(
            BlockId::Dirt,
            BlockInfo {
                solid: true,
                selectable: true,
                faces: cube(texture("dirt")?),
                ..Default::default()
            },
        );
        slot(
            BlockId::Stone,
            BlockInfo {
                solid: true,
                selectable: true,
                faces: cube(texture("stone")?),
                ..Default::default()
            },
        );
        slot(
            BlockId::Sand,
            BlockInfo {
                solid: true,
                selectable: true,
                tint: Vec3::new(1.0, 0.95, 0.82),
                faces: cube(texture("sand")?),
                ..Default::default()
            },
        );
        slot(
            BlockId::Gravel,
            BlockInfo {
                solid: true,
                selectable: true,
                faces: cube(texture("gravel")?),
                ..Default::default()
            },
        );
        slot(
            BlockId::Snow,
            BlockInfo {
                solid: true,
                selectable: true,
                faces: cube(texture("snow")?),
                ..Default::default()
            },
        );

        let water_anim = atlas.animation_info("water");
        slot(
            BlockId::Water,
            BlockInfo {
                transparent: true,
                selectable: true,
                liquid: true,
                material: 1.0,
                tint: Vec3::new(0.2, 0.35, 0.65),
                faces: cube(texture("water")?),
                animation: BlockAnimation {
                    start: water_anim.start_index as i32,
                    frames: water_anim.frame_count,
                    speed: if water_anim.speed > 0.0 {
                        water_anim.speed
                    } else {
                        1.0
                    },
                },
                ..Default::default()
            },
        );

        let log_side = texture("oak_log")?;
        let log_top = texture("oak_log_top")?;
        slot(
            BlockId::OakLog,
            BlockInfo {
                solid: true,
                selectable: true,
                faces: [log_side, log_side, log_top, log_top, log_side, log_side],
                ..Default::default()
            },
        );
        slot(
            BlockId::OakLeaves,
            BlockInfo {
                solid: true,
                selectable: true,
                biome_tint: true,
                faces: cube(texture("oak_leaves")?),
                ..Default::default()
            },
        );
        slot(
            BlockId::OakPlanks,
            BlockInfo {
                solid: true,
                selectable: true,
                faces: cube(texture("oak_planks")?),
                ..Default::default()
            },
        );
        slot(
            BlockId::Glass,
            BlockInfo {
                solid: true,
                transparent: true,
                selectable: true,
                material: 1.1,
                faces: cube(texture("glass")?),
                ..Default::default()
            },
        );

        let billboard = |tile: u32, biome_tint: bool| BlockInfo {
            transparent: true,
            selectable: true,
            billboard: true,
            biome_tint,
            faces: cube(tile),
            ..Default::default()
        };

        slot(BlockId::Poppy, billboard(texture("poppy")?, false));
        slot(BlockId::Dandelion, billboard(texture("dandelion")?, false));
        slot(BlockId::TallGrass, billboard(texture("tall_grass")?, true));
        slot(BlockId::DeadBush, billboard(texture("dead_bush")?, false));
        slot(BlockId::BlueOrchid, billboard(texture("blue_orchid")?, false));
        slot(BlockId::Allium, billboard(texture("allium")?, false));
        slot(BlockId::AzureBluet, billboard(texture("azure_bluet")?, false));
        slot(BlockId::RedTulip, billboard(texture("red_tulip")?, false));
        slot(
            BlockId::OrangeTulip,
            billboard(texture("orange_tulip")?, false),
        );
        slot(
            BlockId::WhiteTulip,
            billboard(texture("white_tulip")?, false),
        );
        slot(BlockId::PinkTulip, billboard(texture("pink_tulip")?, false));
        slot(
            BlockId::OxeyeDaisy,
            billboard(texture("oxeye_daisy")?, false),
        );
        slot(BlockId::Cornflower, billboard(texture("cornflower")?, false));
        slot(
            BlockId::LilyOfTheValley,
            billboard(texture("lily_of_the_valley")?, false),
        );

        let cactus_side = texture("cactus_side")?;
        slot(
            BlockId::Cactus,
            BlockInfo {
                solid: true,
                // Narrower than a full block, so neighbors must not be culled
                // against it.
                transparent: true,
                selectable: true,
                faces: [
                    cactus_side,
                    cactus_side,
                    texture("cactus_top")?,
                    texture("cactus_bottom")?,
                    cactus_side,
                    cactus_side,
                ],
                ..Default::default()
            },
        );

        Ok(Self { blocks })
    }

    pub fn info(&self, id: BlockId) -> &BlockInfo {
        &self.blocks[id as usize]
    }

    /// Whether a block of this type hides the face of an adjacent block.
    pub fn occludes(&self, id: BlockId) -> bool {
        let info = self.info(id);
        info.solid && !info.transparent && !info.billboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::TileEntry;

    #[test]
    fn air_has_no_presence() {
        let atlas = TextureAtlas::with_default_tiles();
        let registry = BlockRegistry::build(&atlas).unwrap();
        let air = registry.info(BlockId::Air);
        assert!(!air.solid);
        assert!(!air.selectable);
        assert!(!registry.occludes(BlockId::Air));
    }

    #[test]
    fn occlusion_follows_flags() {
        let atlas = TextureAtlas::with_default_tiles();
        let registry = BlockRegistry::build(&atlas).unwrap();
        assert!(registry.occludes(BlockId::Stone));
        // Transparent and billboard blocks never occlude.
        assert!(!registry.occludes(BlockId::Glass));
        assert!(!registry.occludes(BlockId::Water));
        assert!(!registry.occludes(BlockId::Poppy));
    }

    #[test]
    fn missing_texture_fails_build() {
        let atlas = TextureAtlas::build(&[TileEntry::new("grass_top")]);
        let err = BlockRegistry::build(&atlas).unwrap_err();
        assert!(matches!(err, RegistryError::MissingTexture(_)));
    }

    #[test]
    fn water_carries_animation() {
        let atlas = TextureAtlas::with_default_tiles();
        let registry = BlockRegistry::build(&atlas).unwrap();
        let water = registry.info(BlockId::Water);
        assert!(water.animation.animated());
        assert!(water.animation.speed > 0.0);
    }
}
