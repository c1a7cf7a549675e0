//! Integration test: a played session survives a save and reload
//!
//! Covers the data files written by `init-data`, the session helpers,
//! and the flat-text save format together.

use chronicles::character::SaveStore;
use chronicles::combat::BattleAction;
use chronicles::data::write_default_data;
use chronicles::session::load_catalogs;
use chronicles::{Character, CharacterClass, Enemy, EquipmentSlot, GameError, GameSession};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_session_survives_save_and_reload() {
    let tmp = TempDir::new().unwrap();
    let data_dir = tmp.path().join("data");
    assert_eq!(write_default_data(&data_dir).unwrap(), 2);
    assert_eq!(write_default_data(&data_dir).unwrap(), 0);

    let (quests, items) = load_catalogs(&data_dir).unwrap();
    let mut session = GameSession::new(
        Character::new("Brina", CharacterClass::Cleric),
        quests.clone(),
        items.clone(),
    );

    session.accept_quest("first_quest").unwrap();
    session.accept_quest("lost_tome").unwrap();
    session.complete_quest("first_quest").unwrap();
    session.purchase("leather_armor").unwrap();
    session.purchase("potion_small").unwrap();
    session.equip("leather_armor", EquipmentSlot::Armor).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut attack = |_: &Character, _: &Enemy, _: u32| BattleAction::Attack;
    session.explore(&mut attack, &mut rng).unwrap();

    let store = SaveStore::new(tmp.path().join("saves"));
    store.save(session.character()).unwrap();
    let reloaded = store.load("Brina").unwrap();

    assert_eq!(&reloaded, session.character());
    assert_eq!(reloaded.equipped(EquipmentSlot::Armor), Some("leather_armor"));
    assert_eq!(reloaded.active_quests, vec!["lost_tome"]);

    // The reloaded character keeps playing with the same rules.
    let mut resumed = GameSession::new(reloaded, quests, items);
    assert!(matches!(
        resumed.accept_quest("first_quest"),
        Err(GameError::AlreadyCompleted(_))
    ));
    resumed.complete_quest("lost_tome").unwrap();
    assert_eq!(resumed.completion_percentage(), 40.0);
}

#[test]
fn test_corrupt_save_is_reported() {
    let tmp = TempDir::new().unwrap();
    let store = SaveStore::new(tmp.path());
    store
        .save(&Character::new("Glitch", CharacterClass::Rogue))
        .unwrap();

    let path = store.save_path("Glitch");
    let text = fs::read_to_string(&path).unwrap();
    fs::write(&path, text.replace("GOLD: 100", "GOLD: lots")).unwrap();

    assert!(matches!(
        store.load("Glitch"),
        Err(GameError::InvalidSaveData(_))
    ));
    assert!(store.list().unwrap().is_empty());
}
