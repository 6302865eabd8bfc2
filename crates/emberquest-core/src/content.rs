//! Quest chain and dialogue content.

use crate::error::ContentError;
use emberquest_logic::quest::{Dialogue, Quest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub dialogues: Vec<Dialogue>,
}

impl Content {
    /// Parse and validate a content file.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let content: Content = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.quests.is_empty() {
            return Err(ContentError::EmptyQuestChain);
        }
        for quest in &self.quests {
            if let Some(index) = quest.objectives.iter().position(|o| o.required == 0) {
                return Err(ContentError::InvalidObjective {
                    quest_id: quest.id,
                    index,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chain_rejected() {
        let err = Content::from_json(r#"{ "quests": [] }"#).unwrap_err();
        assert!(matches!(err, ContentError::EmptyQuestChain));
    }

    #[test]
    fn test_zero_requirement_rejected() {
        let json = r#"{ "quests": [{
            "id": 9, "pickup_npc": 1, "turn_in_npc": 1,
            "pre_message": "", "mid_message": "", "end_message": "",
            "objectives": [{ "kind": "enemy", "target_type": 3, "required": 0 }]
        }] }"#;
        let err = Content::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ContentError::InvalidObjective { quest_id: 9, index: 0 }
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Content::from_json("[").unwrap_err(),
            ContentError::Json(_)
        ));
    }
}
