//! Spawning individual units and items with their starting stats.

use crate::components::*;
use emberquest_logic::config::SimConfig;
use emberquest_logic::constants::sizes;
use emberquest_logic::geometry::{Rect, Vec2};
use emberquest_logic::items::{ItemKind, QuestItemKind};
use emberquest_logic::regen::Vitals;
use emberquest_logic::units::{EnemyClass, NpcKind, PlayerClass};
use hecs::{Entity, World};

pub const PLAYER_HP: f32 = 100.0;
pub const PLAYER_MANA: f32 = 50.0;
pub const PLAYER_AUTOHIT: i32 = 10;
pub const NPC_HP: f32 = 10.0;

pub fn spawn_player(world: &mut World, class: PlayerClass, at: Vec2, cfg: &SimConfig) -> Entity {
    let bounds = Rect::at(at, sizes::PLAYER, sizes::PLAYER);
    let unit = Unit::new(
        0,
        UnitKind::Player(class),
        bounds,
        Vitals::new(PLAYER_HP, PLAYER_MANA),
        cfg.player_move_speed,
    );
    world.spawn((
        unit,
        Combat::new(PLAYER_AUTOHIT),
        Player::new(class, at, cfg.player_respawn_seconds),
        Backpack::default(),
        CharacterPanel::default(),
    ))
}

/// Spawn a fresh enemy at `spawn_bounds`. Bosses carry an enemy head.
pub fn spawn_enemy(
    world: &mut World,
    unit_id: u32,
    class: EnemyClass,
    spawn_bounds: Rect,
    zone: Rect,
    cfg: &SimConfig,
) -> Entity {
    let stats = class.stats();
    let mut unit = Unit::new(
        unit_id,
        UnitKind::Enemy(class),
        spawn_bounds,
        Vitals::new(stats.total_hp, stats.total_mana),
        stats.move_speed,
    );
    unit.can_add_to_quest = true;

    let mut combat = Combat::new(stats.autohit_damage);
    combat.spell_power = stats.spell_power;
    combat.global_cooldown = cfg.enemy_start_global_cooldown;

    let enemy = Enemy {
        class,
        spawn_bounds,
        zone,
        is_evading: false,
        is_active: false,
        spawn_timer: 0,
        target_offset: Vec2::ZERO,
    };

    let entity = world.spawn((unit, combat, enemy, Backpack::default()));
    if stats.carries_head {
        let head = spawn_item(
            world,
            unit_id,
            ItemKind::Quest {
                item: QuestItemKind::EnemyHead,
            },
            spawn_bounds,
            ItemLocation::Backpack(entity),
        );
        if let Ok(mut pack) = world.get::<&mut Backpack>(entity) {
            pack.items.push(head);
        }
    }
    entity
}

pub fn spawn_npc(world: &mut World, unit_id: u32, kind: NpcKind, at: Vec2) -> Entity {
    let unit = Unit::new(
        unit_id,
        UnitKind::Npc(kind),
        Rect::at(at, sizes::NPC, sizes::NPC),
        Vitals::new(NPC_HP, 0.0),
        0.0,
    );
    world.spawn((
        unit,
        Npc {
            kind,
            can_interact: false,
        },
    ))
}

pub fn spawn_item(
    world: &mut World,
    item_id: u32,
    kind: ItemKind,
    bounds: Rect,
    location: ItemLocation,
) -> Entity {
    world.spawn((Item::new(item_id, kind, bounds, location),))
}
