//! Quest chain tracking: objective progress, status changes and the
//! milestones other systems react to.

use super::read;
use crate::components::{Backpack, Enemy, Item, Npc, Unit};
use crate::content::Content;
use crate::error::QuestError;
use emberquest_logic::items::ItemKind;
use emberquest_logic::quest::{Dialogue, ObjectiveKind, Quest, QuestStatus};
use hecs::{Entity, World};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestEvent {
    /// A quest became current.
    Activated { index: usize, quest_id: u32 },
    /// Every objective of the current quest is met.
    Completed { quest_id: u32 },
    /// The last quest was turned in.
    ChainCompleted,
}

#[derive(Debug, Clone)]
pub struct QuestTracker {
    quests: Vec<Quest>,
    dialogues: Vec<Dialogue>,
    current: usize,
    all_completed: bool,
}

impl QuestTracker {
    pub fn new(content: Content) -> Self {
        Self {
            quests: content.quests,
            dialogues: content.dialogues,
            current: 0,
            all_completed: false,
        }
    }

    /// Make the first quest current.
    pub fn start(&mut self) -> Option<QuestEvent> {
        self.current = 0;
        self.all_completed = false;
        self.activate()
    }

    fn activate(&mut self) -> Option<QuestEvent> {
        let quest = self.quests.get_mut(self.current)?;
        quest.reset_progress();
        info!(index = self.current, quest = quest.id, "quest activated");
        Some(QuestEvent::Activated {
            index: self.current,
            quest_id: quest.id,
        })
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn current(&self) -> Option<&Quest> {
        self.quests.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn all_completed(&self) -> bool {
        self.all_completed
    }

    pub fn current_message(&self) -> &str {
        self.current().map_or("", Quest::message)
    }

    /// NPC that speaks for the current quest, if the chain is still running.
    pub fn active_npc(&self) -> Option<u32> {
        if self.all_completed {
            return None;
        }
        self.current().map(Quest::active_npc)
    }

    pub fn dialogue(&self, npc_id: u32) -> Option<&Dialogue> {
        self.dialogues.iter().find(|d| d.npc_id == npc_id)
    }

    fn current_status(&self) -> Result<QuestStatus, QuestError> {
        if self.all_completed {
            return Err(QuestError::ChainComplete);
        }
        self.current()
            .map(|q| q.status)
            .ok_or(QuestError::ChainComplete)
    }

    /// Take the current quest: PRE becomes MID.
    pub fn accept(&mut self) -> Result<(), QuestError> {
        let status = self.current_status()?;
        if status != QuestStatus::Pre {
            return Err(QuestError::WrongStatus {
                expected: QuestStatus::Pre,
                actual: status,
            });
        }
        if let Some(quest) = self.quests.get_mut(self.current) {
            quest.status = QuestStatus::Mid;
        }
        Ok(())
    }

    /// Hand in a finished quest and move to the next one.
    pub fn turn_in(&mut self) -> Result<QuestEvent, QuestError> {
        let status = self.current_status()?;
        if status != QuestStatus::End {
            return Err(QuestError::WrongStatus {
                expected: QuestStatus::End,
                actual: status,
            });
        }
        Ok(self.activate_next())
    }

    /// Advance the chain. Past the last quest the chain is marked complete
    /// and the index stays where it is.
    pub fn activate_next(&mut self) -> QuestEvent {
        if self.current + 1 >= self.quests.len() {
            self.all_completed = true;
            info!("all quests completed");
            return QuestEvent::ChainCompleted;
        }
        self.current += 1;
        self.activate().unwrap_or(QuestEvent::ChainCompleted)
    }

    /// One tracker pass. An incomplete quest has its objectives updated;
    /// a complete one is moved to END.
    ///
    /// `fallen` is the spawn-pending enemy list: each flagged enemy there
    /// of the right class counts once and loses its flag.
    pub fn update(&mut self, world: &World, fallen: &[Entity], player: Entity) -> Option<QuestEvent> {
        if self.all_completed {
            return None;
        }
        let quest = self.quests.get_mut(self.current)?;

        if quest.is_complete() {
            if quest.status == QuestStatus::End {
                return None;
            }
            quest.status = QuestStatus::End;
            info!(quest = quest.id, "quest completed");
            return Some(QuestEvent::Completed { quest_id: quest.id });
        }

        let carried: Vec<ItemKind> = world
            .get::<&Backpack>(player)
            .map(|b| b.items.clone())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|i| read::<Item>(world, i).map(|it| it.kind))
            .collect();

        for objective in &mut quest.objectives {
            match objective.kind {
                ObjectiveKind::Friend => {
                    let seen = world
                        .query::<(&Unit, &Npc)>()
                        .iter()
                        .any(|(_, (u, _))| u.unit_id as i32 == objective.target_type && u.can_add_to_quest);
                    objective.current = u32::from(seen);
                }
                _ if objective.is_met() => {}
                ObjectiveKind::Enemy => {
                    for &enemy in fallen {
                        let class = read::<Enemy>(world, enemy).map(|e| e.class.code());
                        if class != Some(objective.target_type) {
                            continue;
                        }
                        if let Ok(mut unit) = world.get::<&mut Unit>(enemy) {
                            if unit.can_add_to_quest {
                                unit.can_add_to_quest = false;
                                objective.current += 1;
                            }
                        }
                    }
                }
                ObjectiveKind::Armor => {
                    objective.current = carried
                        .iter()
                        .filter(|k| k.is_armor() && k.type_code() == objective.target_type)
                        .count() as u32;
                }
                ObjectiveKind::QuestItem => {
                    objective.current = carried
                        .iter()
                        .filter(|k| !k.is_armor() && k.type_code() == objective.target_type)
                        .count() as u32;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ItemLocation;
    use crate::generation::{spawn_enemy, spawn_item, spawn_npc, spawn_player};
    use emberquest_logic::config::SimConfig;
    use emberquest_logic::geometry::{Rect, Vec2};
    use emberquest_logic::items::QuestItemKind;
    use emberquest_logic::quest::Objective;
    use emberquest_logic::units::{EnemyClass, NpcKind, PlayerClass};

    fn quest(id: u32, objectives: Vec<Objective>) -> Quest {
        Quest {
            id,
            pickup_npc: 10,
            turn_in_npc: 11,
            status: QuestStatus::Pre,
            pre_message: format!("pre {id}"),
            mid_message: format!("mid {id}"),
            end_message: format!("end {id}"),
            objectives,
        }
    }

    fn objective(kind: ObjectiveKind, target_type: i32, required: u32) -> Objective {
        Objective {
            kind,
            target_type,
            required,
            current: 0,
            name: String::new(),
        }
    }

    fn tracker(quests: Vec<Quest>) -> QuestTracker {
        let mut t = QuestTracker::new(Content {
            quests,
            dialogues: vec![Dialogue {
                npc_id: 20,
                messages: vec!["Hello".into()],
            }],
        });
        t.start();
        t
    }

    fn setup() -> (World, Entity) {
        let mut world = World::new();
        let player = spawn_player(&mut world, PlayerClass::Templar, Vec2::ZERO, &SimConfig::default());
        (world, player)
    }

    fn dead_goblin(world: &mut World, id: u32) -> Entity {
        let r = Rect::new(0.0, 0.0, 64.0, 64.0);
        let g = spawn_enemy(world, id, EnemyClass::Goblin, r, r, &SimConfig::default());
        world.get::<&mut Unit>(g).unwrap().vitals.current_hp = 0.0;
        g
    }

    #[test]
    fn test_status_flow_and_messages() {
        let mut t = tracker(vec![quest(1, vec![]), quest(2, vec![])]);
        assert_eq!(t.current_message(), "pre 1");
        assert_eq!(t.active_npc(), Some(10));
        assert!(matches!(t.turn_in(), Err(QuestError::WrongStatus { .. })));

        t.accept().unwrap();
        assert_eq!(t.current_message(), "mid 1");
        assert!(t.accept().is_err());
    }

    #[test]
    fn test_completion_lands_on_next_pass() {
        let (mut world, player) = setup();
        let mut t = tracker(vec![quest(1, vec![objective(ObjectiveKind::Enemy, 3, 2)]), quest(2, vec![])]);
        t.accept().unwrap();
        let fallen = vec![dead_goblin(&mut world, 1), dead_goblin(&mut world, 2)];

        assert_eq!(t.update(&world, &fallen, player), None);
        assert_eq!(t.current().unwrap().objectives[0].current, 2);
        assert_eq!(t.current().unwrap().status, QuestStatus::Mid);

        assert_eq!(t.update(&world, &fallen, player), Some(QuestEvent::Completed { quest_id: 1 }));
        assert_eq!(t.current().unwrap().status, QuestStatus::End);
        assert_eq!(t.active_npc(), Some(11));
        assert_eq!(t.update(&world, &fallen, player), None);
    }

    #[test]
    fn test_flagged_enemy_counts_once() {
        let (mut world, player) = setup();
        let mut t = tracker(vec![quest(1, vec![objective(ObjectiveKind::Enemy, 3, 5)])]);
        let fallen = vec![dead_goblin(&mut world, 1)];
        t.update(&world, &fallen, player);
        t.update(&world, &fallen, player);
        assert_eq!(t.current().unwrap().objectives[0].current, 1);
        assert!(!world.get::<&Unit>(fallen[0]).unwrap().can_add_to_quest);
    }

    #[test]
    fn test_friend_objective_follows_visibility() {
        let (mut world, player) = setup();
        let npc = spawn_npc(&mut world, 20, NpcKind::OldMan, Vec2::new(100.0, 0.0));
        let mut t = tracker(vec![quest(
            1,
            vec![objective(ObjectiveKind::Friend, 20, 1), objective(ObjectiveKind::Enemy, 3, 1)],
        )]);

        world.get::<&mut Unit>(npc).unwrap().can_add_to_quest = true;
        t.update(&world, &[], player);
        assert_eq!(t.current().unwrap().objectives[0].current, 1);

        world.get::<&mut Unit>(npc).unwrap().can_add_to_quest = false;
        t.update(&world, &[], player);
        assert_eq!(t.current().unwrap().objectives[0].current, 0);
    }

    #[test]
    fn test_item_objective_is_recounted() {
        let (mut world, player) = setup();
        let mut t = tracker(vec![quest(1, vec![objective(ObjectiveKind::QuestItem, 1, 2)])]);
        let head = spawn_item(
            &mut world,
            5,
            ItemKind::Quest {
                item: QuestItemKind::EnemyHead,
            },
            Rect::new(0.0, 0.0, 48.0, 48.0),
            ItemLocation::Backpack(player),
        );
        world.get::<&mut Backpack>(player).unwrap().items.push(head);
        t.update(&world, &[], player);
        assert_eq!(t.current().unwrap().objectives[0].current, 1);

        world.get::<&mut Backpack>(player).unwrap().take(head);
        t.update(&world, &[], player);
        assert_eq!(t.current().unwrap().objectives[0].current, 0);
    }

    #[test]
    fn test_chain_advances_and_completes() {
        let (world, player) = setup();
        let mut t = tracker(vec![quest(1, vec![]), quest(2, vec![])]);
        assert_eq!(t.update(&world, &[], player), Some(QuestEvent::Completed { quest_id: 1 }));
        assert_eq!(t.turn_in(), Ok(QuestEvent::Activated { index: 1, quest_id: 2 }));
        assert_eq!(t.current().unwrap().status, QuestStatus::Pre);

        t.update(&world, &[], player);
        assert_eq!(t.turn_in(), Ok(QuestEvent::ChainCompleted));
        assert!(t.all_completed());
        assert_eq!(t.active_npc(), None);
        assert_eq!(t.turn_in(), Err(QuestError::ChainComplete));
        assert_eq!(t.update(&world, &[], player), None);
    }

    #[test]
    fn test_dialogue_lookup() {
        let t = tracker(vec![quest(1, vec![])]);
        assert_eq!(t.dialogue(20).unwrap().messages[0], "Hello");
        assert!(t.dialogue(99).is_none());
    }
}
