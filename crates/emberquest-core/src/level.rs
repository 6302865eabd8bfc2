//! The map: named object layers and the description they load from.
//!
//! Layers are static rectangles. The only runtime mutation is renaming
//! collision objects, which is how gates open.

use emberquest_logic::collision::MapObject;
use emberquest_logic::constants::OPEN_TAG;
use emberquest_logic::geometry::{nearest_point, Rect, Vec2};
use emberquest_logic::items::ItemKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Collision,
    /// Building interiors.
    Interaction,
    EnemyZone,
    Graveyard,
    /// Named areas of the map.
    Zones,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Enemy class code.
    pub class: i32,
    pub at: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub kind: i32,
    pub unit_id: u32,
    pub at: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpawn {
    pub item_id: u32,
    #[serde(flatten)]
    pub kind: ItemKind,
    pub at: Vec2,
}

/// Everything a level file holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDesc {
    pub collision: Vec<MapObject>,
    pub interaction: Vec<MapObject>,
    pub enemy_zones: Vec<MapObject>,
    pub graveyards: Vec<MapObject>,
    pub zones: Vec<MapObject>,
    pub enemies: Vec<EnemySpawn>,
    pub npcs: Vec<NpcSpawn>,
    pub items: Vec<ItemSpawn>,
    pub player_start: Option<Vec2>,
}

impl LevelDesc {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Level {
    collision: Vec<MapObject>,
    interaction: Vec<MapObject>,
    enemy_zones: Vec<MapObject>,
    graveyards: Vec<MapObject>,
    zones: Vec<MapObject>,
}

impl Level {
    pub fn new(desc: &LevelDesc) -> Self {
        Self {
            collision: desc.collision.clone(),
            interaction: desc.interaction.clone(),
            enemy_zones: desc.enemy_zones.clone(),
            graveyards: desc.graveyards.clone(),
            zones: desc.zones.clone(),
        }
    }

    pub fn layer(&self, layer: Layer) -> &[MapObject] {
        match layer {
            Layer::Collision => &self.collision,
            Layer::Interaction => &self.interaction,
            Layer::EnemyZone => &self.enemy_zones,
            Layer::Graveyard => &self.graveyards,
            Layer::Zones => &self.zones,
        }
    }

    /// Objects on `layer` intersecting `region`.
    pub fn objects_in<'a>(&'a self, layer: Layer, region: &'a Rect) -> impl Iterator<Item = &'a MapObject> + 'a {
        self.layer(layer)
            .iter()
            .filter(move |o| o.bounds.intersects(region))
    }

    /// Rename every collision object called `name` to the open tag.
    /// Returns how many were renamed.
    pub fn open(&mut self, name: &str) -> usize {
        let mut opened = 0;
        for obj in self.collision.iter_mut().filter(|o| o.name == name) {
            obj.name = OPEN_TAG.to_string();
            opened += 1;
        }
        opened
    }

    /// First enemy zone overlapping `bounds`.
    pub fn enemy_zone_for(&self, bounds: &Rect) -> Option<Rect> {
        self.objects_in(Layer::EnemyZone, bounds)
            .next()
            .map(|z| z.bounds)
    }

    pub fn is_indoors(&self, bounds: &Rect) -> bool {
        self.objects_in(Layer::Interaction, bounds).next().is_some()
    }

    /// Name of the zone containing `point`.
    pub fn zone_at(&self, point: Vec2) -> Option<&str> {
        self.zones
            .iter()
            .find(|z| z.bounds.contains_point(point))
            .map(|z| z.name.as_str())
    }

    pub fn nearest_graveyard(&self, from: Vec2) -> Option<Vec2> {
        let points: Vec<Vec2> = self.graveyards.iter().map(|g| g.bounds.location()).collect();
        nearest_point(from, &points).map(|i| points[i])
    }
}
