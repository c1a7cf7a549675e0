//! Line-based menu loop behind the `play` subcommand.

use anyhow::Result;
use chronicles::character::SaveStore;
use chronicles::combat::{BattleAction, BattleController, BattleState, SpecialAbility};
use chronicles::items::{sell_price, EquipmentSlot, ItemType};
use chronicles::quest::{prerequisite_chain, quest_status, QuestStatus};
use chronicles::{Character, Enemy, GameSession};
use rand::Rng;
use std::io::{BufRead, Write};

/// Asks the player for each battle action.
struct PromptController<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<R: BufRead, W: Write> BattleController for PromptController<'_, R, W> {
    fn choose_action(&mut self, character: &Character, enemy: &Enemy, turn: u32) -> BattleAction {
        let ability = SpecialAbility::for_class(character.class);
        loop {
            // Write failures surface on the next menu prompt.
            let _ = write!(
                self.output,
                "\n--- Turn {} ---\n{}: {}/{} HP | {}: {}/{} HP\n\
                 1. Attack  2. {}  3. Run\n> ",
                turn,
                character.name,
                character.health,
                character.max_health,
                enemy.name,
                enemy.health,
                enemy.max_health,
                ability.name()
            );
            let _ = self.output.flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return BattleAction::Escape,
                Ok(_) => {}
            }
            match line.trim() {
                "1" => return BattleAction::Attack,
                "2" => return BattleAction::Special,
                "3" => return BattleAction::Escape,
                _ => {
                    let _ = writeln!(self.output, "Choose 1, 2 or 3.");
                }
            }
        }
    }
}

pub struct Menu<R, W> {
    session: GameSession,
    store: SaveStore,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(session: GameSession, store: SaveStore, input: R, output: W) -> Self {
        Self {
            session,
            store,
            input,
            output,
        }
    }

    /// Runs until the player quits or input ends. Returns the session so the
    /// caller can inspect the final state.
    pub fn run(mut self, rng: &mut impl Rng) -> Result<GameSession> {
        writeln!(
            self.output,
            "Welcome back, {} the {}!",
            self.session.character().name,
            self.session.character().class
        )?;

        loop {
            writeln!(
                self.output,
                "\n=== Main Menu ===\n1. Character\n2. Inventory\n3. Quests\n4. Explore\n\
                 5. Shop\n6. Revive ({} gold)\n7. Save\n0. Save and quit",
                self.session.revive_cost()
            )?;
            let Some(choice) = self.prompt("> ")? else {
                break;
            };
            match choice.as_str() {
                "1" => self.show_character()?,
                "2" => self.inventory_menu()?,
                "3" => self.quest_menu()?,
                "4" => self.explore(rng)?,
                "5" => self.shop_menu()?,
                "6" => self.revive()?,
                "7" => self.save()?,
                "0" => {
                    self.save()?;
                    break;
                }
                _ => writeln!(self.output, "Unknown option.")?,
            }
        }

        Ok(self.session)
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report<T>(&mut self, result: chronicles::GameResult<T>, on_ok: impl FnOnce(T) -> String) -> Result<()> {
        match result {
            Ok(value) => writeln!(self.output, "{}", on_ok(value))?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(())
    }

    fn show_character(&mut self) -> Result<()> {
        let c = self.session.character();
        let next = chronicles::character::xp_for_next_level(c.level);
        writeln!(
            self.output,
            "\n{} the {} (level {})\nHP: {}/{}  STR: {}  MAG: {}\nXP: {}/{}  Gold: {}\n\
             Weapon: {}  Armor: {}\nQuests completed: {:.2}%",
            c.name,
            c.class,
            c.level,
            c.health,
            c.max_health,
            c.strength,
            c.magic,
            c.experience,
            next,
            c.gold,
            c.equipped(EquipmentSlot::Weapon).unwrap_or("-"),
            c.equipped(EquipmentSlot::Armor).unwrap_or("-"),
            self.session.completion_percentage()
        )?;
        Ok(())
    }

    fn inventory_menu(&mut self) -> Result<()> {
        let inventory = self.session.character().inventory.clone();
        if inventory.is_empty() {
            writeln!(self.output, "Your pack is empty.")?;
        }
        for (i, id) in inventory.iter().enumerate() {
            let name = self.session.items().get(id).map_or(id.as_str(), |item| item.name.as_str());
            writeln!(self.output, "{}. {}", i + 1, name)?;
        }
        writeln!(
            self.output,
            "u <n>: use  e <n>: equip  s <n>: sell  uw/ua: unequip weapon/armor  b: back"
        )?;

        let Some(command) = self.prompt("> ")? else {
            return Ok(());
        };
        let mut parts = command.split_whitespace();
        let verb = parts.next().unwrap_or("");
        let picked = parts
            .next()
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| inventory.get(i))
            .cloned();

        match (verb, picked) {
            ("u", Some(id)) => {
                let result = self.session.use_consumable(&id);
                self.report(result, |msg| msg)?;
            }
            ("e", Some(id)) => {
                let slot = match self.session.items().get(&id).map(|item| item.item_type) {
                    Some(ItemType::Armor) => EquipmentSlot::Armor,
                    _ => EquipmentSlot::Weapon,
                };
                let result = self.session.equip(&id, slot);
                self.report(result, |outcome| match outcome.replaced {
                    Some(old) => format!("Equipped {} (returned {} to your pack).", outcome.equipped, old),
                    None => format!("Equipped {}.", outcome.equipped),
                })?;
            }
            ("s", Some(id)) => {
                let result = self.session.sell(&id);
                self.report(result, |price| format!("Sold {} for {} gold.", id, price))?;
            }
            ("uw", _) | ("ua", _) => {
                let slot = if verb == "uw" {
                    EquipmentSlot::Weapon
                } else {
                    EquipmentSlot::Armor
                };
                let result = self.session.unequip(slot);
                self.report(result, |removed| match removed {
                    Some(id) => format!("Unequipped {}.", id),
                    None => "Nothing equipped there.".to_string(),
                })?;
            }
            ("b", _) | ("", _) => {}
            _ => writeln!(self.output, "Unknown command.")?,
        }
        Ok(())
    }

    fn quest_menu(&mut self) -> Result<()> {
        let character = self.session.character();
        let lines: Vec<String> = self
            .session
            .quests()
            .iter()
            .map(|q| {
                let status = match quest_status(character, &q.id) {
                    QuestStatus::NotStarted => "",
                    QuestStatus::Active => " [active]",
                    QuestStatus::Completed => " [done]",
                };
                format!(
                    "{} - {} (level {}, {} xp, {} gold){}",
                    q.id, q.title, q.required_level, q.reward_xp, q.reward_gold, status
                )
            })
            .collect();
        let available: Vec<String> = self
            .session
            .available_quests()
            .iter()
            .map(|q| q.id.clone())
            .collect();

        writeln!(self.output, "\n=== Quests ===")?;
        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        writeln!(self.output, "Available now: {}", available.join(", "))?;
        writeln!(
            self.output,
            "a <id>: accept  c <id>: complete  x <id>: abandon  p <id>: prerequisites  b: back"
        )?;

        let Some(command) = self.prompt("> ")? else {
            return Ok(());
        };
        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("a"), Some(id)) => {
                let result = self.session.accept_quest(id);
                self.report(result, |_| format!("Accepted {}.", id))?;
            }
            (Some("c"), Some(id)) => {
                let result = self.session.complete_quest(id);
                self.report(result, |reward| {
                    format!("Completed {}! +{} XP, +{} gold.", id, reward.xp, reward.gold)
                })?;
            }
            (Some("x"), Some(id)) => {
                let result = self.session.abandon_quest(id);
                self.report(result, |_| format!("Abandoned {}.", id))?;
            }
            (Some("p"), Some(id)) => {
                let result = prerequisite_chain(id, self.session.quests());
                self.report(result, |chain| chain.join(" -> "))?;
            }
            (Some("b"), _) | (None, _) => {}
            _ => writeln!(self.output, "Unknown command.")?,
        }
        Ok(())
    }

    fn explore(&mut self, rng: &mut impl Rng) -> Result<()> {
        let mut controller = PromptController {
            input: &mut self.input,
            output: &mut self.output,
        };
        let result = self.session.explore(&mut controller, rng);

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                return Ok(());
            }
        };
        for event in &outcome.events {
            writeln!(self.output, ">>> {}", event)?;
        }
        if outcome.state == BattleState::EnemyWon {
            writeln!(
                self.output,
                "You have fallen. Revive from the main menu for {} gold.",
                self.session.revive_cost()
            )?;
        }
        Ok(())
    }

    fn shop_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n=== Shop === (gold: {})", self.session.character().gold)?;
        let ids: Vec<String> = self.session.items().iter().map(|item| item.id.clone()).collect();
        for (i, item) in self.session.items().iter().enumerate() {
            writeln!(
                self.output,
                "{}. {} [{}] {} - {} gold (sells for {})",
                i + 1,
                item.name,
                item.item_type,
                item.effect,
                item.cost,
                sell_price(item)
            )?;
        }
        let Some(choice) = self.prompt("Buy which? (b: back) > ")? else {
            return Ok(());
        };
        let picked = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| ids.get(i))
            .cloned();
        match picked {
            Some(id) => {
                let result = self.session.purchase(&id);
                self.report(result, |left| format!("Bought {}. {} gold left.", id, left))?;
            }
            None if choice == "b" || choice.is_empty() => {}
            None => writeln!(self.output, "No such item.")?,
        }
        Ok(())
    }

    fn revive(&mut self) -> Result<()> {
        let result = self.session.revive_for_gold();
        self.report(result, |revived| {
            if revived {
                "You return to life.".to_string()
            } else {
                "You are not dead.".to_string()
            }
        })
    }

    fn save(&mut self) -> Result<()> {
        let result = self.store.save(self.session.character());
        self.report(result, |path| format!("Saved to {}.", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicles::data::{parse_items, parse_quests, DEFAULT_ITEMS, DEFAULT_QUESTS};
    use chronicles::CharacterClass;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn play(script: &str) -> (GameSession, String, TempDir) {
        let dir = TempDir::new().unwrap();
        let session = GameSession::new(
            Character::new("Hero", CharacterClass::Warrior),
            parse_quests(DEFAULT_QUESTS).unwrap(),
            parse_items(DEFAULT_ITEMS).unwrap(),
        );
        let mut output = Vec::new();
        let menu = Menu::new(
            session,
            SaveStore::new(dir.path()),
            Cursor::new(script.as_bytes().to_vec()),
            &mut output,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let session = menu.run(&mut rng).unwrap();
        (session, String::from_utf8(output).unwrap(), dir)
    }

    #[test]
    fn test_quest_flow_through_menu() {
        let (session, output, dir) = play("3\na first_quest\n3\nc first_quest\n0\n");
        assert_eq!(session.character().level, 2);
        assert!(output.contains("Completed first_quest!"));
        assert!(SaveStore::new(dir.path()).exists("Hero"));
    }

    #[test]
    fn test_buy_and_equip_through_menu() {
        let (session, output, _dir) = play("5\n1\n2\ne 1\n");
        assert_eq!(session.character().equipped(EquipmentSlot::Weapon), Some("sword_basic"));
        assert_eq!(session.character().strength, 20);
        assert!(output.contains("Equipped sword_basic."));
    }

    #[test]
    fn test_battle_through_menu() {
        let (session, output, _dir) = play("4\n1\n1\n1\n1\n");
        assert!(output.contains("Victory!"));
        assert_eq!(session.character().gold, 110);
    }

    #[test]
    fn test_errors_are_reported_not_fatal() {
        let (session, output, _dir) = play("3\nc dragon_lair\n1\n");
        assert!(output.contains("Error: quest not active: dragon_lair"));
        assert!(output.contains("Hero the Warrior (level 1)"));
        assert_eq!(session.character().completed_quests.len(), 0);
    }
}
