//! Quest eligibility, lifecycle transitions, and statistics.
//!
//! Per (character, quest) pair the lifecycle is
//! `NotStarted -> Active -> Completed`, with `Active -> NotStarted` on
//! abandon. `Completed` is terminal.

use super::types::{Quest, QuestReward, QuestStatus};
use crate::character::{gain_experience, is_dead, Character};
use crate::core::{GameError, GameResult};
use crate::data::QuestCatalog;
use log::{debug, warn};
use std::collections::HashSet;

pub fn is_quest_active(character: &Character, quest_id: &str) -> bool {
    character.active_quests.iter().any(|id| id == quest_id)
}

pub fn is_quest_completed(character: &Character, quest_id: &str) -> bool {
    character.completed_quests.iter().any(|id| id == quest_id)
}

pub fn quest_status(character: &Character, quest_id: &str) -> QuestStatus {
    if is_quest_completed(character, quest_id) {
        QuestStatus::Completed
    } else if is_quest_active(character, quest_id) {
        QuestStatus::Active
    } else {
        QuestStatus::NotStarted
    }
}

fn prerequisite_met(character: &Character, quest: &Quest) -> bool {
    quest
        .prerequisite
        .as_deref()
        .map_or(true, |prereq| is_quest_completed(character, prereq))
}

/// Runs accept's checks in order without changing anything.
fn check_can_accept<'a>(
    character: &Character,
    quest_id: &str,
    catalog: &'a QuestCatalog,
) -> GameResult<&'a Quest> {
    let quest = catalog
        .get(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;

    if character.level < quest.required_level {
        return Err(GameError::InsufficientLevel {
            quest_id: quest_id.to_string(),
            required: quest.required_level,
            level: character.level,
        });
    }
    if !prerequisite_met(character, quest) {
        return Err(GameError::PrerequisiteNotMet {
            quest_id: quest_id.to_string(),
            prerequisite: quest.prerequisite.clone().unwrap_or_default(),
        });
    }
    if is_quest_completed(character, quest_id) {
        return Err(GameError::AlreadyCompleted(quest_id.to_string()));
    }
    if is_quest_active(character, quest_id) {
        return Err(GameError::AlreadyActive(quest_id.to_string()));
    }

    Ok(quest)
}

pub fn can_accept_quest(character: &Character, quest_id: &str, catalog: &QuestCatalog) -> bool {
    check_can_accept(character, quest_id, catalog).is_ok()
}

pub fn accept_quest(
    character: &mut Character,
    quest_id: &str,
    catalog: &QuestCatalog,
) -> GameResult<()> {
    check_can_accept(character, quest_id, catalog)?;
    character.active_quests.push(quest_id.to_string());
    debug!("{} accepted quest {}", character.name, quest_id);
    Ok(())
}

/// Moves an active quest to completed and pays out its rewards.
pub fn complete_quest(
    character: &mut Character,
    quest_id: &str,
    catalog: &QuestCatalog,
) -> GameResult<QuestReward> {
    let quest = catalog
        .get(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;
    let Some(position) = character.active_quests.iter().position(|id| id == quest_id) else {
        return Err(GameError::NotActive(quest_id.to_string()));
    };
    // Checked up front so the XP grant below cannot fail after the quest moves.
    if is_dead(character) {
        return Err(GameError::CharacterDead(character.name.clone()));
    }

    character.active_quests.remove(position);
    character.completed_quests.push(quest_id.to_string());
    gain_experience(character, quest.reward_xp)?;
    character.gold = character.gold.saturating_add(quest.reward_gold);

    debug!(
        "{} completed quest {} (+{} xp, +{} gold)",
        character.name, quest_id, quest.reward_xp, quest.reward_gold
    );

    Ok(QuestReward {
        xp: quest.reward_xp,
        gold: quest.reward_gold,
    })
}

/// Drops an active quest. It can be accepted again later.
pub fn abandon_quest(character: &mut Character, quest_id: &str) -> GameResult<()> {
    let Some(position) = character.active_quests.iter().position(|id| id == quest_id) else {
        return Err(GameError::NotActive(quest_id.to_string()));
    };
    character.active_quests.remove(position);
    debug!("{} abandoned quest {}", character.name, quest_id);
    Ok(())
}

/// Quests the character could accept right now, in catalog order.
pub fn available_quests<'a>(character: &Character, catalog: &'a QuestCatalog) -> Vec<&'a Quest> {
    catalog
        .iter()
        .filter(|quest| {
            character.level >= quest.required_level
                && prerequisite_met(character, quest)
                && !is_quest_active(character, &quest.id)
                && !is_quest_completed(character, &quest.id)
        })
        .collect()
}

fn resolve_ids<'a>(ids: &[String], catalog: &'a QuestCatalog) -> Vec<&'a Quest> {
    ids.iter()
        .filter_map(|id| {
            let quest = catalog.get(id);
            if quest.is_none() {
                warn!("quest {} is not in the catalog", id);
            }
            quest
        })
        .collect()
}

/// Full records for the active quests. Unknown ids are skipped.
pub fn active_quests<'a>(character: &Character, catalog: &'a QuestCatalog) -> Vec<&'a Quest> {
    resolve_ids(&character.active_quests, catalog)
}

/// Full records for the completed quests. Unknown ids are skipped.
pub fn completed_quests<'a>(character: &Character, catalog: &'a QuestCatalog) -> Vec<&'a Quest> {
    resolve_ids(&character.completed_quests, catalog)
}

/// Quest ids from the root of `quest_id`'s prerequisite chain down to
/// `quest_id` itself, earliest first.
pub fn prerequisite_chain(quest_id: &str, catalog: &QuestCatalog) -> GameResult<Vec<String>> {
    let mut chain: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(quest_id.to_string());

    while let Some(id) = current {
        if !seen.insert(id.clone()) {
            // The loop runs from the first visit of `id` to the current step.
            let start = chain.iter().position(|c| *c == id).unwrap_or(0);
            let mut path: Vec<String> = chain[start..].to_vec();
            path.push(id);
            return Err(GameError::PrerequisiteCycle { path });
        }
        let quest = catalog
            .get(&id)
            .ok_or_else(|| GameError::QuestNotFound(id.clone()))?;
        current = quest.prerequisite.clone();
        chain.push(id);
    }

    chain.reverse();
    Ok(chain)
}

/// Percentage of catalog quests the character has completed, to 2 decimals.
pub fn completion_percentage(character: &Character, catalog: &QuestCatalog) -> f64 {
    if catalog.is_empty() {
        return 0.0;
    }
    let completed = character
        .completed_quests
        .iter()
        .filter(|id| catalog.contains(id))
        .count();
    let percentage = completed as f64 / catalog.len() as f64 * 100.0;
    (percentage * 100.0).round() / 100.0
}

/// Sum of rewards over every completed quest still in the catalog.
pub fn total_rewards_earned(character: &Character, catalog: &QuestCatalog) -> QuestReward {
    completed_quests(character, catalog)
        .into_iter()
        .fold(QuestReward::default(), |total, quest| QuestReward {
            xp: total.xp.saturating_add(quest.reward_xp),
            gold: total.gold.saturating_add(quest.reward_gold),
        })
}

/// Quests whose required level falls within `min_level..=max_level`.
pub fn quests_by_level(catalog: &QuestCatalog, min_level: u32, max_level: u32) -> Vec<&Quest> {
    catalog
        .iter()
        .filter(|quest| (min_level..=max_level).contains(&quest.required_level))
        .collect()
}

/// Checks that every prerequisite names a catalog quest and that no
/// prerequisite chain loops back on itself.
pub fn validate_prerequisites(catalog: &QuestCatalog) -> GameResult<()> {
    for quest in catalog.iter() {
        if let Some(prereq) = &quest.prerequisite {
            if !catalog.contains(prereq) {
                return Err(GameError::QuestNotFound(format!(
                    "{} (prerequisite of {})",
                    prereq, quest.id
                )));
            }
        }
    }
    for quest in catalog.iter() {
        prerequisite_chain(&quest.id, catalog)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;

    fn quest(id: &str, level: u32, prereq: Option<&str>) -> Quest {
        Quest {
            id: id.to_string(),
            title: format!("Quest {}", id),
            description: String::new(),
            reward_xp: 50,
            reward_gold: 20,
            required_level: level,
            prerequisite: prereq.map(str::to_string),
        }
    }

    fn catalog() -> QuestCatalog {
        QuestCatalog::from_entries(vec![
            quest("a", 1, None),
            quest("b", 1, Some("a")),
            quest("c", 3, Some("b")),
            quest("side", 1, None),
        ])
        .unwrap()
    }

    fn hero() -> Character {
        Character::new("Hero", CharacterClass::Warrior)
    }

    #[test]
    fn test_accept_and_status() {
        let catalog = catalog();
        let mut c = hero();
        assert_eq!(quest_status(&c, "a"), QuestStatus::NotStarted);
        accept_quest(&mut c, "a", &catalog).unwrap();
        assert_eq!(quest_status(&c, "a"), QuestStatus::Active);
        assert_eq!(c.active_quests, vec!["a".to_string()]);
    }

    #[test]
    fn test_accept_unknown_quest() {
        let mut c = hero();
        assert!(matches!(
            accept_quest(&mut c, "zzz", &catalog()),
            Err(GameError::QuestNotFound(_))
        ));
    }

    #[test]
    fn test_accept_insufficient_level() {
        let catalog = QuestCatalog::from_entries(vec![quest("hard", 3, None)]).unwrap();
        let mut c = hero();
        c.level = 2;
        assert!(matches!(
            accept_quest(&mut c, "hard", &catalog),
            Err(GameError::InsufficientLevel {
                required: 3,
                level: 2,
                ..
            })
        ));
        assert!(c.active_quests.is_empty());
    }

    #[test]
    fn test_accept_prerequisite_not_met() {
        let mut c = hero();
        let err = accept_quest(&mut c, "b", &catalog()).unwrap_err();
        assert!(matches!(err, GameError::PrerequisiteNotMet { ref prerequisite, .. } if prerequisite == "a"));
    }

    #[test]
    fn test_accept_twice() {
        let catalog = catalog();
        let mut c = hero();
        accept_quest(&mut c, "a", &catalog).unwrap();
        assert!(matches!(
            accept_quest(&mut c, "a", &catalog),
            Err(GameError::AlreadyActive(_))
        ));
        assert_eq!(c.active_quests.len(), 1);
    }

    #[test]
    fn test_complete_grants_rewards() {
        let catalog = catalog();
        let mut c = hero();
        accept_quest(&mut c, "a", &catalog).unwrap();
        let reward = complete_quest(&mut c, "a", &catalog).unwrap();

        assert_eq!(reward, QuestReward { xp: 50, gold: 20 });
        assert_eq!(c.experience, 50);
        assert_eq!(c.gold, 120);
        assert!(c.active_quests.is_empty());
        assert_eq!(c.completed_quests, vec!["a".to_string()]);
        assert!(matches!(
            accept_quest(&mut c, "a", &catalog),
            Err(GameError::AlreadyCompleted(_))
        ));
    }

    #[test]
    fn test_complete_not_active() {
        let mut c = hero();
        assert!(matches!(
            complete_quest(&mut c, "a", &catalog()),
            Err(GameError::NotActive(_))
        ));
    }

    #[test]
    fn test_complete_while_dead_changes_nothing() {
        let catalog = catalog();
        let mut c = hero();
        accept_quest(&mut c, "a", &catalog).unwrap();
        c.health = 0;
        let before = c.clone();
        assert!(matches!(
            complete_quest(&mut c, "a", &catalog),
            Err(GameError::CharacterDead(_))
        ));
        assert_eq!(c, before);
    }

    #[test]
    fn test_abandon_allows_reaccept() {
        let catalog = catalog();
        let mut c = hero();
        accept_quest(&mut c, "a", &catalog).unwrap();
        abandon_quest(&mut c, "a").unwrap();
        assert_eq!(quest_status(&c, "a"), QuestStatus::NotStarted);
        accept_quest(&mut c, "a", &catalog).unwrap();
        assert!(matches!(
            abandon_quest(&mut c, "side"),
            Err(GameError::NotActive(_))
        ));
    }

    #[test]
    fn test_available_quests() {
        let catalog = catalog();
        let mut c = hero();
        let ids = |c: &Character| -> Vec<String> {
            available_quests(c, &catalog)
                .iter()
                .map(|q| q.id.clone())
                .collect()
        };
        assert_eq!(ids(&c), vec!["a", "side"]);

        accept_quest(&mut c, "a", &catalog).unwrap();
        assert_eq!(ids(&c), vec!["side"]);

        complete_quest(&mut c, "a", &catalog).unwrap();
        assert_eq!(ids(&c), vec!["b", "side"]);

        c.completed_quests.push("b".to_string());
        assert_eq!(ids(&c), vec!["side"]);
        c.level = 3;
        assert_eq!(ids(&c), vec!["c", "side"]);
    }

    #[test]
    fn test_can_accept_quest() {
        let catalog = catalog();
        let c = hero();
        assert!(can_accept_quest(&c, "a", &catalog));
        assert!(!can_accept_quest(&c, "b", &catalog));
        assert!(!can_accept_quest(&c, "missing", &catalog));
    }

    #[test]
    fn test_prerequisite_chain() {
        let catalog = catalog();
        assert_eq!(prerequisite_chain("c", &catalog).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(prerequisite_chain("a", &catalog).unwrap(), vec!["a"]);
        assert!(matches!(
            prerequisite_chain("nope", &catalog),
            Err(GameError::QuestNotFound(_))
        ));
    }

    #[test]
    fn test_prerequisite_chain_broken_link() {
        let catalog =
            QuestCatalog::from_entries(vec![quest("b", 1, Some("ghost"))]).unwrap();
        assert!(matches!(
            prerequisite_chain("b", &catalog),
            Err(GameError::QuestNotFound(ref id)) if id == "ghost"
        ));
    }

    #[test]
    fn test_prerequisite_chain_cycle() {
        let catalog = QuestCatalog::from_entries(vec![
            quest("start", 1, Some("x")),
            quest("x", 1, Some("y")),
            quest("y", 1, Some("x")),
        ])
        .unwrap();
        let err = prerequisite_chain("start", &catalog).unwrap_err();
        match err {
            GameError::PrerequisiteCycle { path } => assert_eq!(path, vec!["x", "y", "x"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_prerequisite_is_cycle() {
        let catalog = QuestCatalog::from_entries(vec![quest("loop", 1, Some("loop"))]).unwrap();
        assert!(matches!(
            prerequisite_chain("loop", &catalog),
            Err(GameError::PrerequisiteCycle { .. })
        ));
    }

    #[test]
    fn test_completion_percentage() {
        let catalog = catalog();
        let mut c = hero();
        assert_eq!(completion_percentage(&c, &catalog), 0.0);
        c.completed_quests = vec!["a".to_string()];
        assert_eq!(completion_percentage(&c, &catalog), 25.0);

        let three = QuestCatalog::from_entries(vec![
            quest("a", 1, None),
            quest("b", 1, None),
            quest("c", 1, None),
        ])
        .unwrap();
        assert_eq!(completion_percentage(&c, &three), 33.33);
        assert_eq!(completion_percentage(&c, &QuestCatalog::new()), 0.0);
    }

    #[test]
    fn test_total_rewards_and_lists() {
        let catalog = catalog();
        let mut c = hero();
        c.completed_quests = vec!["a".to_string(), "b".to_string(), "retired".to_string()];
        c.active_quests = vec!["side".to_string()];

        assert_eq!(
            total_rewards_earned(&c, &catalog),
            QuestReward { xp: 100, gold: 40 }
        );
        assert_eq!(completed_quests(&c, &catalog).len(), 2);
        assert_eq!(active_quests(&c, &catalog)[0].id, "side");
    }

    #[test]
    fn test_total_rewards_saturate() {
        let mut huge = quest("huge", 1, None);
        huge.reward_xp = u64::MAX;
        huge.reward_gold = u64::MAX - 1;
        let catalog = QuestCatalog::from_entries(vec![huge, quest("a", 1, None)]).unwrap();
        let mut c = hero();
        c.completed_quests = vec!["huge".to_string(), "a".to_string()];

        assert_eq!(
            total_rewards_earned(&c, &catalog),
            QuestReward {
                xp: u64::MAX,
                gold: u64::MAX
            }
        );
    }

    #[test]
    fn test_quests_by_level() {
        let catalog = catalog();
        assert_eq!(quests_by_level(&catalog, 1, 1).len(), 3);
        assert_eq!(quests_by_level(&catalog, 2, 5)[0].id, "c");
        assert!(quests_by_level(&catalog, 4, 9).is_empty());
    }

    #[test]
    fn test_validate_prerequisites() {
        assert!(validate_prerequisites(&catalog()).is_ok());

        let broken = QuestCatalog::from_entries(vec![quest("b", 1, Some("ghost"))]).unwrap();
        assert!(matches!(
            validate_prerequisites(&broken),
            Err(GameError::QuestNotFound(_))
        ));

        let cyclic = QuestCatalog::from_entries(vec![
            quest("x", 1, Some("y")),
            quest("y", 1, Some("x")),
        ])
        .unwrap();
        assert!(matches!(
            validate_prerequisites(&cyclic),
            Err(GameError::PrerequisiteCycle { .. })
        ));
    }
}
