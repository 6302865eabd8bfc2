//! Simulation engine - main entry point for running the simulation

use crate::components::*;
use crate::content::Content;
use crate::error::{ContentError, SimError};
use crate::events::{EventQueue, SimEvent};
use crate::generation::populate;
use crate::input::{PlayerCommand, PlayerInput};
use crate::level::{Level, LevelDesc};
use crate::systems::*;
use emberquest_logic::config::SimConfig;
use emberquest_logic::geometry::Rect;
use emberquest_logic::units::PlayerClass;
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world holding every unit and item
    pub world: World,
    level: Level,
    spells: SpellEngine,
    enemies: EnemyRoster,
    npcs: Vec<Entity>,
    ground_items: Vec<Entity>,
    quests: QuestTracker,
    events: EventQueue,
    player: Entity,
    config: SimConfig,
    rng: StdRng,
    viewport: Option<Rect>,
    /// Seconds simulated since start
    sim_time: f64,
    tick: u64,
    time_scale: f32,
}

impl SimulationEngine {
    /// Build a running simulation from a level and its content, with a
    /// Templar player.
    pub fn new(desc: &LevelDesc, content: Content, config: SimConfig) -> Result<Self, ContentError> {
        Self::with_class(desc, content, config, PlayerClass::default())
    }

    pub fn with_class(
        desc: &LevelDesc,
        content: Content,
        config: SimConfig,
        class: PlayerClass,
    ) -> Result<Self, ContentError> {
        let problems = config.validate();
        if !problems.is_empty() {
            return Err(ContentError::Config(problems.join("; ")));
        }
        content.validate()?;

        let level = Level::new(desc);
        let mut world = World::new();
        let population = populate(&mut world, desc, &level, class, &config).ok_or(ContentError::MissingPlayerStart)?;

        let mut engine = Self {
            world,
            level,
            spells: SpellEngine::new(),
            enemies: EnemyRoster::new(population.enemies),
            npcs: population.npcs,
            ground_items: population.ground_items,
            quests: QuestTracker::new(content),
            events: EventQueue::new(),
            player: population.player,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            viewport: None,
            sim_time: 0.0,
            tick: 0,
            time_scale: 1.0,
        };
        if let Some(event) = engine.quests.start() {
            engine.handle_quest_event(event);
        }
        Ok(engine)
    }

    /// Parse a level and content file and build the simulation.
    pub fn from_json(level_json: &str, content_json: &str, config: SimConfig) -> Result<Self, ContentError> {
        let desc = LevelDesc::from_json(level_json)?;
        let content = Content::from_json(content_json)?;
        Self::new(&desc, content, config)
    }

    /// Advance one tick of `delta_seconds` with this tick's input.
    pub fn update(&mut self, delta_seconds: f32, input: &PlayerInput) {
        let delta = delta_seconds.max(0.0) * self.time_scale;
        self.sim_time += delta as f64;
        self.tick += 1;

        visibility_system(&mut self.world, self.viewport.as_ref());
        refresh_npc_interaction(&mut self.world, &self.quests);

        for &command in &input.commands {
            if let Err(reason) = self.apply_command(command) {
                debug!(?command, %reason, "command rejected");
                self.events.push(SimEvent::CommandRejected { command, reason });
            }
        }
        item_system(&self.world, self.player, &mut self.ground_items, &self.config, &mut self.events);

        player_movement_system(&mut self.world, self.player, input, delta, &self.config);
        collision_system(&mut self.world, self.player, &self.level, &self.config);
        player_combat_system(
            &mut self.world,
            self.player,
            &self.level,
            delta,
            &self.config,
            &mut self.rng,
            &mut self.events,
        );
        enemy_system(
            &mut self.world,
            &mut self.enemies,
            self.player,
            &mut self.spells,
            &self.config,
            &mut self.rng,
            &mut self.events,
        );
        self.spells.update(&self.world, delta, &self.config, &mut self.events);
        regen_system(&mut self.world, delta, &self.config);

        if let Some(event) = self.quests.update(&self.world, &self.enemies.spawn_pending, self.player) {
            self.handle_quest_event(event);
        }
        close_stale_loot(&self.world, self.player);
    }

    /// Act on one player command right away. Item moves are queued for
    /// the item step of the current tick.
    pub fn apply_command(&mut self, command: PlayerCommand) -> Result<(), SimError> {
        match command {
            PlayerCommand::SelectTarget(target) => {
                if !is_alive(&self.world, target) {
                    return Err(SimError::TargetInvalid);
                }
                self.with_combat(|c| c.target = Some(target))
            }
            PlayerCommand::Attack(target) => {
                self.require_player_alive()?;
                let enemy = self.world.get::<&Unit>(target).map_or(false, |u| u.is_enemy() && u.is_alive());
                if !enemy {
                    return Err(SimError::TargetInvalid);
                }
                self.with_combat(|c| {
                    c.target = Some(target);
                    c.is_attacking = true;
                })
            }
            PlayerCommand::ClearTarget => self.with_combat(Combat::stop_attacking),
            PlayerCommand::ActionBar(1) => {
                let target = self.combat(self.player).and_then(|c| c.target);
                let on_enemy = target
                    .and_then(|t| self.unit(t))
                    .map_or(false, |u| u.is_enemy());
                if !on_enemy {
                    return Err(SimError::TargetInvalid);
                }
                self.cast(SpellKind::Smite)
            }
            PlayerCommand::ActionBar(2) => self.cast(SpellKind::InstantHeal),
            PlayerCommand::ActionBar(slot) => Err(SimError::UnknownAction(slot)),
            PlayerCommand::OpenLoot(corpse) => open_loot(&self.world, self.player, corpse),
            PlayerCommand::CloseLoot => {
                close_loot(&self.world, self.player);
                Ok(())
            }
            PlayerCommand::LootItem(item) | PlayerCommand::PickUp(item) => {
                self.with_player(|p| p.item_target = Some(item))
            }
            PlayerCommand::Equip(item) => self.with_player(|p| p.backpack_target = Some(item)),
            PlayerCommand::Unequip(item) => self.with_player(|p| p.char_panel_target = Some(item)),
            PlayerCommand::AcceptQuest => Ok(self.quests.accept()?),
            PlayerCommand::TurnInQuest => {
                let event = self.quests.turn_in()?;
                self.handle_quest_event(event);
                Ok(())
            }
        }
    }

    /// Start casting `kind` as the player.
    pub fn cast(&mut self, kind: SpellKind) -> Result<(), SimError> {
        let unit = self.unit(self.player).ok_or(SimError::TargetInvalid)?;
        let mut combat = self.combat(self.player).ok_or(SimError::TargetInvalid)?;
        self.spells
            .try_cast(&self.world, self.player, &unit, &mut combat, kind, &self.config)?;
        if let Ok(mut slot) = self.world.get::<&mut Combat>(self.player) {
            *slot = combat;
        }
        self.events.push(SimEvent::SpellCast {
            caster: self.player,
            kind,
        });
        Ok(())
    }

    fn require_player_alive(&self) -> Result<(), SimError> {
        if is_alive(&self.world, self.player) {
            Ok(())
        } else {
            Err(SimError::PlayerDead)
        }
    }

    fn with_combat(&mut self, f: impl FnOnce(&mut Combat)) -> Result<(), SimError> {
        let mut combat = self.world.get::<&mut Combat>(self.player).map_err(|_| SimError::TargetInvalid)?;
        f(&mut *combat);
        Ok(())
    }

    fn with_player(&mut self, f: impl FnOnce(&mut Player)) -> Result<(), SimError> {
        let mut state = self.world.get::<&mut Player>(self.player).map_err(|_| SimError::TargetInvalid)?;
        f(&mut *state);
        Ok(())
    }

    /// Publish a quest milestone and open any gates tied to it.
    fn handle_quest_event(&mut self, event: QuestEvent) {
        match event {
            QuestEvent::Activated { index, quest_id } => {
                self.events.push(SimEvent::QuestActivated { index, quest_id });
                for rule in self.config.gate_rules.iter().filter(|r| r.quest_index == index) {
                    if self.level.open(&rule.object_name) > 0 {
                        info!(gate = %rule.object_name, "gate opened");
                        self.events.push(SimEvent::GateOpened {
                            name: rule.object_name.clone(),
                        });
                    }
                }
            }
            QuestEvent::Completed { quest_id } => self.events.push(SimEvent::QuestCompleted { quest_id }),
            QuestEvent::ChainCompleted => self.events.push(SimEvent::AllQuestsCompleted),
        }
    }

    /// Visible area for this and later ticks; `None` treats everything as
    /// on screen.
    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.viewport = viewport;
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn unit(&self, entity: Entity) -> Option<Unit> {
        self.world.get::<&Unit>(entity).ok().map(|u| *u)
    }

    pub fn combat(&self, entity: Entity) -> Option<Combat> {
        self.world.get::<&Combat>(entity).ok().map(|c| *c)
    }

    pub fn player_state(&self) -> Option<Player> {
        self.world.get::<&Player>(self.player).ok().map(|p| *p)
    }

    pub fn item(&self, entity: Entity) -> Option<Item> {
        self.world.get::<&Item>(entity).ok().map(|i| *i)
    }

    pub fn backpack(&self, owner: Entity) -> Vec<Entity> {
        self.world
            .get::<&Backpack>(owner)
            .map(|b| b.items.clone())
            .unwrap_or_default()
    }

    pub fn equipped(&self) -> Vec<Entity> {
        self.world
            .get::<&CharacterPanel>(self.player)
            .map(|p| p.equipped.clone())
            .unwrap_or_default()
    }

    /// Enemies currently alive, in update order.
    pub fn enemies(&self) -> &[Entity] {
        &self.enemies.live
    }

    /// Dead enemies waiting to respawn.
    pub fn spawn_pending(&self) -> &[Entity] {
        &self.enemies.spawn_pending
    }

    pub fn npcs(&self) -> &[Entity] {
        &self.npcs
    }

    pub fn ground_items(&self) -> &[Entity] {
        &self.ground_items
    }

    pub fn spells(&self) -> &SpellEngine {
        &self.spells
    }

    pub fn quests(&self) -> &QuestTracker {
        &self.quests
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Events pushed since the last drain.
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Whether the player stands inside a building.
    pub fn player_is_indoors(&self) -> bool {
        self.unit(self.player)
            .map_or(false, |u| self.level.is_indoors(&u.bounds))
    }

    /// Name of the map zone under the player's centre.
    pub fn current_zone(&self) -> Option<&str> {
        let center = self.unit(self.player)?.center();
        self.level.zone_at(center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::EnemySpawn;
    use emberquest_logic::collision::MapObject;
    use emberquest_logic::geometry::Vec2;
    use emberquest_logic::quest::{Quest, QuestStatus};

    fn quest(id: u32) -> Quest {
        Quest {
            id,
            pickup_npc: 1,
            turn_in_npc: 1,
            status: QuestStatus::Pre,
            pre_message: String::new(),
            mid_message: String::new(),
            end_message: String::new(),
            objectives: vec![],
        }
    }

    fn desc() -> LevelDesc {
        LevelDesc {
            collision: vec![MapObject::new("Gate1", Rect::new(500.0, 0.0, 10.0, 100.0))],
            enemy_zones: vec![MapObject::new("Camp", Rect::new(200.0, 200.0, 400.0, 400.0))],
            zones: vec![MapObject::new("Meadow", Rect::new(0.0, 0.0, 150.0, 150.0))],
            enemies: vec![EnemySpawn {
                class: 3,
                at: Vec2::new(300.0, 300.0),
            }],
            player_start: Some(Vec2::ZERO),
            ..LevelDesc::default()
        }
    }

    fn content(n: u32) -> Content {
        Content {
            quests: (1..=n).map(quest).collect(),
            dialogues: vec![],
        }
    }

    #[test]
    fn test_engine_creation() {
        let mut engine = SimulationEngine::new(&desc(), content(3), SimConfig::default()).unwrap();
        assert_eq!(engine.enemies().len(), 1);
        assert_eq!(engine.tick_count(), 0);
        assert_eq!(engine.current_zone(), Some("Meadow"));
        assert!(!engine.player_is_indoors());
        assert_eq!(
            engine.drain_events(),
            vec![SimEvent::QuestActivated { index: 0, quest_id: 1 }]
        );
    }

    #[test]
    fn test_missing_start_and_bad_config() {
        let no_start = LevelDesc {
            player_start: None,
            ..desc()
        };
        assert!(matches!(
            SimulationEngine::new(&no_start, content(1), SimConfig::default()),
            Err(ContentError::MissingPlayerStart)
        ));

        let cfg = SimConfig {
            player_move_speed: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            SimulationEngine::new(&desc(), content(1), cfg),
            Err(ContentError::Config(_))
        ));
        assert!(matches!(
            SimulationEngine::new(&desc(), content(0), SimConfig::default()),
            Err(ContentError::EmptyQuestChain)
        ));
    }

    #[test]
    fn test_gate_opens_on_third_quest() {
        let mut engine = SimulationEngine::new(&desc(), content(3), SimConfig::default()).unwrap();
        let idle = PlayerInput::idle();
        let turn_in = PlayerInput::with_command(PlayerCommand::TurnInQuest);

        engine.update(0.016, &idle);
        engine.update(0.016, &turn_in);
        assert_eq!(engine.quests().current_index(), 1);
        assert!(!engine.level().layer(crate::level::Layer::Collision)[0].is_open());

        engine.update(0.016, &idle);
        engine.update(0.016, &turn_in);
        assert_eq!(engine.quests().current_index(), 2);
        assert!(engine.level().layer(crate::level::Layer::Collision)[0].is_open());
        assert!(engine
            .drain_events()
            .contains(&SimEvent::GateOpened { name: "Gate1".into() }));
    }

    #[test]
    fn test_rejected_commands_become_events() {
        let mut engine = SimulationEngine::new(&desc(), content(1), SimConfig::default()).unwrap();
        engine.drain_events();
        engine.update(0.016, &PlayerInput::with_command(PlayerCommand::ActionBar(7)));
        assert!(engine.drain_events().contains(&SimEvent::CommandRejected {
            command: PlayerCommand::ActionBar(7),
            reason: SimError::UnknownAction(7),
        }));

        assert_eq!(
            engine.apply_command(PlayerCommand::ActionBar(1)),
            Err(SimError::TargetInvalid)
        );
    }

    #[test]
    fn test_time_scale() {
        let mut engine = SimulationEngine::new(&desc(), content(1), SimConfig::default()).unwrap();
        engine.set_time_scale(2.0);
        engine.update(0.5, &PlayerInput::idle());
        assert!((engine.sim_time() - 1.0).abs() < 1e-6);
        engine.set_time_scale(-3.0);
        assert_eq!(engine.time_scale(), 0.0);
    }
}
