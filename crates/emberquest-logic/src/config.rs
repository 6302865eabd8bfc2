//! Simulation tuning.
//!
//! Every knob the rules read lives in [`SimConfig`]. A partial JSON file
//! overrides only the fields it names:
//!
//! ```
//! use emberquest_logic::config::SimConfig;
//!
//! let cfg = SimConfig::from_json(r#"{ "seed": 7, "player_move_speed": 6.0 }"#).unwrap();
//! assert_eq!(cfg.seed, 7);
//! assert_eq!(cfg.arrival_accuracy, 5.0);
//! assert!(cfg.validate().is_empty());
//! ```

use serde::{Deserialize, Serialize};

/// Renames a collision object to the open tag once a quest index becomes current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRule {
    pub quest_index: usize,
    pub object_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for crit rolls and attack-point displacement.
    pub seed: u64,
    /// Distance from a rectangle centre at which a mover counts as arrived.
    pub arrival_accuracy: f32,

    // Regeneration
    pub regen_interval: f32,
    pub hp_regen_amount: f32,
    pub mana_regen_amount: f32,
    /// Global cooldown applied on cast, and again on resolution or fireball launch.
    pub global_cooldown: f32,

    // Melee
    pub player_swing_reset: f32,
    pub enemy_swing_reset: f32,
    /// A crit lands on a 1-in-N roll.
    pub crit_one_in: u32,
    pub crit_bonus_min: i32,
    pub crit_bonus_max: i32,

    // Enemy behaviour
    pub aggro_radius: f32,
    pub mage_aggro_radius: f32,
    /// Attack points are offset by 0..=N on each axis.
    pub target_displacement_max: u32,
    pub goblin_respawn_ticks: u32,
    pub enemy_respawn_ticks: u32,
    pub enemy_start_global_cooldown: f32,

    // Player
    pub player_move_speed: f32,
    /// Keyboard stepping speed, in units per second.
    pub key_move_speed: f32,
    pub player_respawn_seconds: f32,
    pub interaction_margin: f32,
    pub max_range_margin: f32,

    // Fireball flight
    pub fireball_step: f32,
    pub fireball_spawn_offset: f32,

    pub gate_rules: Vec<GateRule>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arrival_accuracy: 5.0,
            regen_interval: 1.0,
            hp_regen_amount: 0.5,
            mana_regen_amount: 1.5,
            global_cooldown: 0.2,
            player_swing_reset: 50.0,
            enemy_swing_reset: 20.0,
            crit_one_in: 9,
            crit_bonus_min: 2,
            crit_bonus_max: 6,
            aggro_radius: 200.0,
            mage_aggro_radius: 300.0,
            target_displacement_max: 48,
            goblin_respawn_ticks: 2000,
            enemy_respawn_ticks: 10000,
            enemy_start_global_cooldown: 0.5,
            player_move_speed: 4.0,
            key_move_speed: 200.0,
            player_respawn_seconds: 2.0,
            interaction_margin: 30.0,
            max_range_margin: 150.0,
            fireball_step: 5.0,
            fireball_spawn_offset: 8.0,
            gate_rules: vec![GateRule {
                quest_index: 2,
                object_name: "Gate1".to_string(),
            }],
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Human-readable problems with this configuration. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let positive = [
            ("arrival_accuracy", self.arrival_accuracy),
            ("regen_interval", self.regen_interval),
            ("player_move_speed", self.player_move_speed),
            ("key_move_speed", self.key_move_speed),
            ("fireball_step", self.fireball_step),
            ("player_swing_reset", self.player_swing_reset),
            ("enemy_swing_reset", self.enemy_swing_reset),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                problems.push(format!("{name} must be positive, got {value}"));
            }
        }
        let non_negative = [
            ("hp_regen_amount", self.hp_regen_amount),
            ("mana_regen_amount", self.mana_regen_amount),
            ("global_cooldown", self.global_cooldown),
            ("aggro_radius", self.aggro_radius),
            ("mage_aggro_radius", self.mage_aggro_radius),
            ("player_respawn_seconds", self.player_respawn_seconds),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                problems.push(format!("{name} must not be negative, got {value}"));
            }
        }
        if self.crit_one_in == 0 {
            problems.push("crit_one_in must be at least 1".to_string());
        }
        if self.crit_bonus_min > self.crit_bonus_max {
            problems.push(format!(
                "crit bonus range is empty: {}..={}",
                self.crit_bonus_min, self.crit_bonus_max
            ));
        }
        for rule in &self.gate_rules {
            if rule.object_name.is_empty() {
                problems.push(format!(
                    "gate rule for quest {} has an empty object name",
                    rule.quest_index
                ));
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = SimConfig::from_json(r#"{"goblin_respawn_ticks": 10}"#).unwrap();
        assert_eq!(cfg.goblin_respawn_ticks, 10);
        assert_eq!(cfg.enemy_respawn_ticks, 10000);
        assert_eq!(cfg.gate_rules.len(), 1);
        assert_eq!(cfg.gate_rules[0].object_name, "Gate1");
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let cfg = SimConfig {
            player_move_speed: 0.0,
            crit_one_in: 0,
            crit_bonus_min: 7,
            crit_bonus_max: 2,
            ..SimConfig::default()
        };
        let problems = cfg.validate();
        assert_eq!(problems.len(), 3);
        assert!(problems[0].contains("player_move_speed"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(SimConfig::from_json("{ not json").is_err());
    }
}
