//! The top-level game states and the controllers for the screens that are not gameplay.

use std::marker::PhantomData;

use glam::Vec2;
use strum::VariantArray;
use strum_macros::{Display, VariantArray};
use thousands::Separable;
use tracing::debug;

use crate::constants::{ATV_PRICE, HEIGHT, TRUCK_PRICE, WIDTH};
use crate::error::RenderError;
use crate::events::Intent;
use crate::inventory::{PlayerInventory, Vehicle};
use crate::render::{Surface, TextStyle};

use super::session::SessionSummary;

/// Which screen currently receives intents and paint calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum GameState {
    Menu,
    Store,
    Game,
    GameOver,
}

/// What a controller asks the game to do after handling an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    /// Start a fresh session.
    Play,
    Menu,
    Store,
    Exit,
}

/// A non-gameplay screen.
pub trait Controller {
    fn handle_intent(&mut self, intent: Intent, inventory: &mut PlayerInventory) -> Transition;

    fn paint(&self, surface: &mut dyn Surface, inventory: &PlayerInventory) -> Result<(), RenderError>;
}

/// A wrap-around cursor over the entries of an option enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<T> {
    index: usize,
    _marker: PhantomData<T>,
}

impl<T: VariantArray + Copy> Default for Selection<T> {
    fn default() -> Self {
        Self {
            index: 0,
            _marker: PhantomData,
        }
    }
}

impl<T: VariantArray + Copy> Selection<T> {
    /// Option enums always have at least one entry.
    pub fn current(&self) -> T {
        T::VARIANTS[self.index]
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % T::VARIANTS.len();
    }

    pub fn previous(&mut self) {
        let len = T::VARIANTS.len();
        self.index = (self.index + len - 1) % len;
    }

    /// Moves the cursor for `Up`/`Down`. Returns `true` if the intent was navigation.
    fn navigate(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Up => self.previous(),
            Intent::Down => self.next(),
            _ => return false,
        }
        true
    }

    fn paint_entries(
        &self,
        surface: &mut dyn Surface,
        top: f32,
        label: impl Fn(T) -> String,
    ) -> Result<(), RenderError> {
        let current = self.index;
        for (index, &entry) in T::VARIANTS.iter().enumerate() {
            let style = if index == current {
                TextStyle::Highlighted
            } else {
                TextStyle::Normal
            };
            let position = Vec2::new(WIDTH / 3.0, top + index as f32 * 50.0);
            surface.draw_text(&label(entry), position, style)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, VariantArray)]
pub enum MenuOption {
    Play,
    Store,
    Exit,
}

/// The title screen.
#[derive(Debug, Default)]
pub struct MenuController {
    selection: Selection<MenuOption>,
}

impl MenuController {
    pub fn selected(&self) -> MenuOption {
        self.selection.current()
    }
}

impl Controller for MenuController {
    fn handle_intent(&mut self, intent: Intent, _inventory: &mut PlayerInventory) -> Transition {
        if self.selection.navigate(intent) {
            return Transition::Stay;
        }
        match intent {
            Intent::Select => match self.selected() {
                MenuOption::Play => Transition::Play,
                MenuOption::Store => Transition::Store,
                MenuOption::Exit => Transition::Exit,
            },
            _ => Transition::Stay,
        }
    }

    fn paint(&self, surface: &mut dyn Surface, inventory: &PlayerInventory) -> Result<(), RenderError> {
        surface.draw_text("Moose Game", Vec2::new(WIDTH / 3.0, 150.0), TextStyle::Normal)?;
        surface.draw_text(
            &format!("High Score: {}", inventory.high_score().separate_with_commas()),
            Vec2::new(WIDTH / 3.0, 250.0),
            TextStyle::Normal,
        )?;
        self.selection.paint_entries(surface, 350.0, |option| option.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, VariantArray)]
pub enum StoreOption {
    Truck,
    #[strum(serialize = "ATV")]
    Atv,
    Car,
    Back,
}

/// Buy and equip vehicles.
#[derive(Debug, Default)]
pub struct StoreController {
    selection: Selection<StoreOption>,
}

impl StoreController {
    pub fn selected(&self) -> StoreOption {
        self.selection.current()
    }

    /// Equips the vehicle if owned, otherwise tries to buy it first.
    fn purchase(inventory: &mut PlayerInventory, vehicle: Vehicle, price: u32) {
        if !inventory.owns(vehicle) {
            if !inventory.spend_currency(price) {
                debug!(%vehicle, price, currency = inventory.currency(), "Not enough coins");
                return;
            }
            match vehicle {
                Vehicle::Truck => inventory.buy_truck(),
                Vehicle::Atv => inventory.buy_atv(),
                Vehicle::Car => {}
            }
            debug!(%vehicle, price, "Vehicle bought");
        }
        inventory.equip(vehicle);
    }

    fn label(option: StoreOption, inventory: &PlayerInventory) -> String {
        let (vehicle, price) = match option {
            StoreOption::Truck => (Vehicle::Truck, TRUCK_PRICE),
            StoreOption::Atv => (Vehicle::Atv, ATV_PRICE),
            StoreOption::Car => (Vehicle::Car, 0),
            StoreOption::Back => return option.to_string(),
        };
        if inventory.equipped_vehicle() == vehicle {
            format!("{option} (equipped)")
        } else if inventory.owns(vehicle) {
            format!("{option} (owned)")
        } else {
            format!("{option}: {price} coins")
        }
    }
}

impl Controller for StoreController {
    fn handle_intent(&mut self, intent: Intent, inventory: &mut PlayerInventory) -> Transition {
        if self.selection.navigate(intent) {
            return Transition::Stay;
        }
        match intent {
            Intent::Back => Transition::Menu,
            Intent::Select => match self.selected() {
                StoreOption::Truck => {
                    Self::purchase(inventory, Vehicle::Truck, TRUCK_PRICE);
                    Transition::Stay
                }
                StoreOption::Atv => {
                    Self::purchase(inventory, Vehicle::Atv, ATV_PRICE);
                    Transition::Stay
                }
                StoreOption::Car => {
                    inventory.equip(Vehicle::Car);
                    Transition::Stay
                }
                StoreOption::Back => Transition::Menu,
            },
            _ => Transition::Stay,
        }
    }

    fn paint(&self, surface: &mut dyn Surface, inventory: &PlayerInventory) -> Result<(), RenderError> {
        surface.draw_text(
            &format!("Coins: {}", inventory.currency().separate_with_commas()),
            Vec2::new(WIDTH / 3.0, 150.0),
            TextStyle::Normal,
        )?;
        self.selection
            .paint_entries(surface, 250.0, |option| Self::label(option, inventory))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, VariantArray)]
pub enum GameOverOption {
    #[strum(serialize = "Play Again")]
    PlayAgain,
    #[strum(serialize = "Main Menu")]
    MainMenu,
}

/// The results screen after a session ends.
#[derive(Debug)]
pub struct GameOverController {
    summary: SessionSummary,
    new_high_score: bool,
    selection: Selection<GameOverOption>,
}

impl GameOverController {
    pub fn new(summary: SessionSummary, new_high_score: bool) -> Self {
        Self {
            summary,
            new_high_score,
            selection: Selection::default(),
        }
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn selected(&self) -> GameOverOption {
        self.selection.current()
    }
}

impl Controller for GameOverController {
    fn handle_intent(&mut self, intent: Intent, _inventory: &mut PlayerInventory) -> Transition {
        if self.selection.navigate(intent) {
            return Transition::Stay;
        }
        match intent {
            Intent::Back => Transition::Menu,
            Intent::Select => match self.selected() {
                GameOverOption::PlayAgain => Transition::Play,
                GameOverOption::MainMenu => Transition::Menu,
            },
            _ => Transition::Stay,
        }
    }

    fn paint(&self, surface: &mut dyn Surface, inventory: &PlayerInventory) -> Result<(), RenderError> {
        let left = WIDTH / 3.0;
        surface.draw_text("Game Over", Vec2::new(left, 150.0), TextStyle::Normal)?;
        surface.draw_text(
            &format!("Score: {}", self.summary.score.separate_with_commas()),
            Vec2::new(left, 200.0),
            TextStyle::Normal,
        )?;
        surface.draw_text(
            &format!("Coins: {}", self.summary.coins.separate_with_commas()),
            Vec2::new(left, 250.0),
            TextStyle::Normal,
        )?;
        let high_score = format!("High Score: {}", inventory.high_score().separate_with_commas());
        let style = if self.new_high_score {
            TextStyle::Highlighted
        } else {
            TextStyle::Normal
        };
        surface.draw_text(&high_score, Vec2::new(left, 300.0), style)?;
        self.selection
            .paint_entries(surface, HEIGHT / 2.0 + 50.0, |option| option.to_string())
    }
}
