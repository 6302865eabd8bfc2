//! EmberQuest Headless Simulation Harness
//!
//! Loads the bundled level and quest chain and plays scripted scenarios
//! against the engine. Runs entirely in-process, no window, no audio.
//!
//! Usage:
//!   cargo run -p emberquest-simtest
//!   cargo run -p emberquest-simtest -- --verbose
//!   RUST_LOG=emberquest_core=trace cargo run -p emberquest-simtest

use anyhow::{ensure, Context};
use emberquest_core::level::Layer;
use emberquest_core::prelude::*;
use emberquest_logic::geometry::Vec2;
use emberquest_logic::items::{ArmorSlot, ItemKind};
use emberquest_logic::quest::QuestStatus;
use emberquest_logic::units::EnemyClass;
use hecs::Entity;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ── Bundled data (same files a game client would ship) ──────────────────
const LEVEL_JSON: &str = include_str!("../../../data/level.json");
const CONTENT_JSON: &str = include_str!("../../../data/content.json");

const DT: f32 = 1.0 / 60.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_target(false)
        .init();

    println!("=== EmberQuest Simulation Harness ===\n");

    let level = LevelDesc::from_json(LEVEL_JSON).context("parsing bundled level")?;
    let content = Content::from_json(CONTENT_JSON).context("parsing bundled quest content")?;
    let config = SimConfig::default();
    if verbose {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    let mut results = Vec::new();

    // 1. Bundled data
    results.extend(validate_data(&level, &content, &config));

    // 2. Full quest chain, played through commands
    results.extend(play_quest_chain(&level, &content, &config)?);

    // 3. Spells
    results.extend(validate_spells(&level, &content, &config)?);

    // 4. Respawn timing
    results.extend(validate_respawn(&level, &content, &config)?);

    // 5. Determinism
    results.extend(validate_determinism(&level, &content, &config)?);

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!("\n=== RESULT: {}/{} passed, {} failed ===", passed, results.len(), failed);

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn new_engine(level: &LevelDesc, content: &Content, config: &SimConfig) -> anyhow::Result<SimulationEngine> {
    let engine = SimulationEngine::new(level, content.clone(), config.clone()).context("building engine")?;
    Ok(engine)
}

fn idle(engine: &mut SimulationEngine, ticks: usize) {
    let input = PlayerInput::idle();
    for _ in 0..ticks {
        engine.update(DT, &input);
    }
}

fn command(engine: &mut SimulationEngine, command: PlayerCommand) {
    engine.update(DT, &PlayerInput::with_command(command));
}

/// Place the player at `to` without walking there.
fn teleport(engine: &mut SimulationEngine, to: Vec2) {
    let player = engine.player();
    if let Ok(mut unit) = engine.world.get::<&mut Unit>(player) {
        unit.bounds.set_location(to);
        unit.move_to = None;
    }
    if let Ok(mut state) = engine.world.get::<&mut Player>(player) {
        state.last_position = to;
    }
}

fn first_of(engine: &SimulationEngine, class: EnemyClass) -> Option<Entity> {
    engine
        .enemies()
        .iter()
        .copied()
        .find(|&e| engine.unit(e).map_or(false, |u| u.kind == UnitKind::Enemy(class)))
}

fn count_of(engine: &SimulationEngine, class: EnemyClass) -> usize {
    engine
        .enemies()
        .iter()
        .filter(|&&e| engine.unit(e).map_or(false, |u| u.kind == UnitKind::Enemy(class)))
        .count()
}

/// Stand on `target` and melee it until it dies. Returns the ticks spent.
fn fight(engine: &mut SimulationEngine, target: Entity, max_ticks: usize) -> Option<usize> {
    let spot = engine.unit(target)?.bounds.location() + Vec2::new(8.0, 8.0);
    teleport(engine, spot);
    command(engine, PlayerCommand::Attack(target));
    for tick in 0..max_ticks {
        if !engine.unit(target).map_or(false, |u| u.is_alive()) {
            return Some(tick);
        }
        if !engine.unit(engine.player()).map_or(false, |u| u.is_alive()) {
            return None;
        }
        idle(engine, 1);
    }
    None
}

/// Walk toward `dest` by click-to-move until arrival or `max_ticks`.
fn walk(engine: &mut SimulationEngine, dest: Vec2, max_ticks: usize) -> bool {
    engine.update(DT, &PlayerInput::move_to(dest));
    for _ in 0..max_ticks {
        let arrived = engine.unit(engine.player()).map_or(false, |u| u.move_to.is_none());
        if arrived {
            return true;
        }
        idle(engine, 1);
    }
    false
}

fn quest_status(engine: &SimulationEngine) -> Option<QuestStatus> {
    engine.quests().current().map(|q| q.status)
}

// ── 1. Bundled data ─────────────────────────────────────────────────────

fn validate_data(level: &LevelDesc, content: &Content, config: &SimConfig) -> Vec<TestResult> {
    println!("--- Bundled Data ---");
    let mut results = Vec::new();

    let known = level
        .enemies
        .iter()
        .filter(|e| EnemyClass::from_code(e.class).is_some())
        .count();
    results.push(TestResult::check(
        "level_enemy_classes",
        known == level.enemies.len(),
        format!("{known}/{} spawns have a known class", level.enemies.len()),
    ));

    let gate_names: Vec<&str> = config.gate_rules.iter().map(|r| r.object_name.as_str()).collect();
    let gated = level.collision.iter().any(|o| gate_names.contains(&o.name.as_str()));
    results.push(TestResult::check(
        "level_has_gate",
        gated,
        format!("gate objects {:?} present: {gated}", gate_names),
    ));

    results.push(TestResult::check(
        "level_graveyards",
        !level.graveyards.is_empty(),
        format!("{} graveyards", level.graveyards.len()),
    ));

    let givers_exist = content.quests.iter().all(|q| {
        level.npcs.iter().any(|n| n.unit_id == q.pickup_npc) && level.npcs.iter().any(|n| n.unit_id == q.turn_in_npc)
    });
    results.push(TestResult::check(
        "content_npcs_exist",
        givers_exist,
        format!("{} quests, every pickup and turn-in npc placed: {givers_exist}", content.quests.len()),
    ));

    let problems = config.validate();
    results.push(TestResult::check(
        "config_valid",
        problems.is_empty(),
        if problems.is_empty() {
            "default config is valid".to_string()
        } else {
            problems.join("; ")
        },
    ));

    results
}

// ── 2. Quest chain ──────────────────────────────────────────────────────

fn play_quest_chain(level: &LevelDesc, content: &Content, config: &SimConfig) -> anyhow::Result<Vec<TestResult>> {
    println!("--- Quest Chain ---");
    let mut results = Vec::new();
    let mut engine = new_engine(level, content, config)?;

    results.push(TestResult::check(
        "quest1_offered",
        quest_status(&engine) == Some(QuestStatus::Pre) && engine.quests().active_npc() == Some(1),
        engine.quests().current_message().to_string(),
    ));
    command(&mut engine, PlayerCommand::AcceptQuest);

    // Gear up from the ground.
    for &(slot, at) in &[(ArmorSlot::Head, Vec2::new(320.0, 300.0)), (ArmorSlot::Chest, Vec2::new(150.0, 450.0))] {
        let reached = walk(&mut engine, at, 600);
        let item = engine
            .ground_items()
            .iter()
            .copied()
            .find(|&i| matches!(engine.item(i).map(|i| i.kind), Some(ItemKind::Armor { slot: s, .. }) if s == slot));
        ensure!(item.is_some(), "no {slot:?} armor on the ground");
        if let Some(item) = item {
            command(&mut engine, PlayerCommand::PickUp(item));
            command(&mut engine, PlayerCommand::Equip(item));
            results.push(TestResult::check(
                &format!("equip_{slot:?}").to_lowercase(),
                reached && engine.equipped().contains(&item),
                format!("walked: {reached}, armor now {}", engine.combat(engine.player()).map_or(0.0, |c| c.armor)),
            ));
        }
    }

    idle(&mut engine, 2);
    results.push(TestResult::check(
        "quest1_complete",
        quest_status(&engine) == Some(QuestStatus::End),
        format!("status {:?}", quest_status(&engine)),
    ));
    command(&mut engine, PlayerCommand::TurnInQuest);
    command(&mut engine, PlayerCommand::AcceptQuest);
    info!(quest = engine.quests().current().map_or(0, |q| q.id), "second quest accepted");

    // Two goblins past the gate.
    let mut kills = Vec::new();
    for _ in 0..2 {
        let Some(goblin) = first_of(&engine, EnemyClass::Goblin) else {
            break;
        };
        kills.push(fight(&mut engine, goblin, 3000));
    }
    idle(&mut engine, 2);
    results.push(TestResult::check(
        "goblins_slain",
        kills.len() == 2 && kills.iter().all(Option::is_some),
        format!("ticks per kill {:?}", kills),
    ));
    results.push(TestResult::check(
        "quest2_complete",
        quest_status(&engine) == Some(QuestStatus::End),
        format!("status {:?}", quest_status(&engine)),
    ));

    engine.drain_events();
    command(&mut engine, PlayerCommand::TurnInQuest);
    let events = engine.drain_events();
    let gate_open = engine
        .level()
        .layer(Layer::Collision)
        .iter()
        .all(|o| o.name != "Gate1");
    results.push(TestResult::check(
        "gate_opened",
        gate_open && events.iter().any(|e| matches!(e, SimEvent::GateOpened { .. })),
        format!("quest index {}, gate open: {gate_open}", engine.quests().current_index()),
    ));
    command(&mut engine, PlayerCommand::AcceptQuest);

    // The chieftain and his head. He starts the fight wounded.
    let boss = first_of(&engine, EnemyClass::Boss).context("level has no boss")?;
    if let Ok(mut unit) = engine.world.get::<&mut Unit>(boss) {
        unit.vitals.current_hp = 20.0;
    }
    let boss_ticks = fight(&mut engine, boss, 6000);
    let corpse_at = engine.unit(boss).map(|u| u.bounds.location()).unwrap_or(Vec2::ZERO);
    teleport(&mut engine, corpse_at);
    let head = engine.backpack(boss).first().copied();
    command(&mut engine, PlayerCommand::OpenLoot(boss));
    if let Some(head) = head {
        command(&mut engine, PlayerCommand::LootItem(head));
    }
    let looted = head.map_or(false, |h| engine.backpack(engine.player()).contains(&h));
    results.push(TestResult::check(
        "boss_looted",
        boss_ticks.is_some() && looted,
        format!("boss fell after {:?} ticks, head looted: {looted}", boss_ticks),
    ));

    idle(&mut engine, 2);
    command(&mut engine, PlayerCommand::TurnInQuest);
    results.push(TestResult::check(
        "chain_complete",
        engine.quests().all_completed(),
        format!("all quests completed: {}", engine.quests().all_completed()),
    ));

    debug!(ticks = engine.tick_count(), "quest chain finished");
    Ok(results)
}

// ── 3. Spells ───────────────────────────────────────────────────────────

fn validate_spells(level: &LevelDesc, content: &Content, config: &SimConfig) -> anyhow::Result<Vec<TestResult>> {
    println!("--- Spells ---");
    let mut results = Vec::new();
    let mut engine = new_engine(level, content, config)?;
    let player = engine.player();

    if let Ok(mut unit) = engine.world.get::<&mut Unit>(player) {
        unit.vitals.current_hp = 40.0;
    }
    command(&mut engine, PlayerCommand::ActionBar(2));
    idle(&mut engine, 70);
    let hp = engine.unit(player).map_or(0.0, |u| u.vitals.current_hp);
    results.push(TestResult::check(
        "instant_heal",
        (65.0..66.0).contains(&hp),
        format!("hp 40 -> {hp}"),
    ));

    let mut engine = new_engine(level, content, config)?;
    let player = engine.player();
    let goblin = first_of(&engine, EnemyClass::Goblin).context("level has no goblin")?;
    let near = engine.unit(goblin).map_or(Vec2::ZERO, |u| u.bounds.location()) - Vec2::new(300.0, 0.0);
    teleport(&mut engine, near);
    let mana_before = engine.unit(player).map_or(0.0, |u| u.vitals.current_mana);
    engine.update(
        DT,
        &PlayerInput {
            commands: vec![PlayerCommand::SelectTarget(goblin), PlayerCommand::ActionBar(1)],
            ..PlayerInput::default()
        },
    );
    let goblin_hp = engine.unit(goblin).map_or(0.0, |u| u.vitals.current_hp);
    let mana_after = engine.unit(player).map_or(0.0, |u| u.vitals.current_mana);
    let provoked = engine.combat(goblin).map_or(false, |c| c.is_attacking && c.target == Some(player));
    results.push(TestResult::check(
        "smite",
        goblin_hp == 70.0 && mana_before - mana_after >= 10.0 && provoked,
        format!("goblin hp {goblin_hp}, mana {mana_before} -> {mana_after}, provoked: {provoked}"),
    ));

    Ok(results)
}

// ── 4. Respawn ──────────────────────────────────────────────────────────

fn validate_respawn(level: &LevelDesc, content: &Content, config: &SimConfig) -> anyhow::Result<Vec<TestResult>> {
    println!("--- Respawn ---");
    let mut results = Vec::new();
    let mut engine = new_engine(level, content, config)?;

    let goblins = count_of(&engine, EnemyClass::Goblin);
    let goblin = first_of(&engine, EnemyClass::Goblin).context("level has no goblin")?;
    if let Ok(mut unit) = engine.world.get::<&mut Unit>(goblin) {
        unit.vitals.current_hp = 0.0;
    }
    idle(&mut engine, 1);
    let after_death = count_of(&engine, EnemyClass::Goblin);
    idle(&mut engine, config.goblin_respawn_ticks as usize);
    let after_respawn = count_of(&engine, EnemyClass::Goblin);
    results.push(TestResult::check(
        "goblin_respawn",
        after_death + 1 == goblins && after_respawn == goblins,
        format!("{goblins} -> {after_death} -> {after_respawn}"),
    ));

    Ok(results)
}

// ── 5. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(level: &LevelDesc, content: &Content, config: &SimConfig) -> anyhow::Result<Vec<TestResult>> {
    println!("--- Determinism ---");
    let mut runs = Vec::new();
    for _ in 0..2 {
        let mut engine = new_engine(level, content, config)?;
        teleport(&mut engine, Vec2::new(880.0, 160.0));
        idle(&mut engine, 900);
        let snapshot: Vec<Option<Unit>> = std::iter::once(engine.player())
            .chain(engine.enemies().iter().copied())
            .map(|e| engine.unit(e))
            .collect();
        runs.push(snapshot);
    }
    Ok(vec![TestResult::check(
        "same_seed_same_world",
        runs[0] == runs[1],
        format!("{} units compared after 900 ticks", runs[0].len()),
    )])
}
