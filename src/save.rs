//! The persisted save record.
//!
//! A single comma-delimited line:
//! `highScore,currency,musicOn,soundsOn,fpsOverlay,equippedVehicle,truckOwned,atvOwned`.
//! It is read and written wholesale; any problem reading it means "no save".

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::error::SaveError;
use crate::inventory::{PlayerInventory, Settings, Vehicle};

const FIELD_COUNT: usize = 8;

/// The fields of the save record, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveRecord {
    pub high_score: u32,
    pub currency: u32,
    pub music_on: bool,
    pub sounds_on: bool,
    pub fps_overlay: bool,
    pub equipped: Vehicle,
    pub truck_owned: bool,
    pub atv_owned: bool,
}

impl SaveRecord {
    pub fn from_inventory(inventory: &PlayerInventory) -> Self {
        Self {
            high_score: inventory.high_score(),
            currency: inventory.currency(),
            music_on: inventory.settings.music_on,
            sounds_on: inventory.settings.sounds_on,
            fps_overlay: inventory.settings.show_fps_overlay,
            equipped: inventory.equipped_vehicle(),
            truck_owned: inventory.is_truck_owned(),
            atv_owned: inventory.is_atv_owned(),
        }
    }

    pub fn into_inventory(self) -> PlayerInventory {
        PlayerInventory::from_persisted(
            self.high_score,
            self.currency,
            Settings {
                music_on: self.music_on,
                sounds_on: self.sounds_on,
                show_fps_overlay: self.fps_overlay,
            },
            self.equipped,
            self.truck_owned,
            self.atv_owned,
        )
    }
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, SaveError> {
    value.trim().parse().map_err(|_| SaveError::InvalidField {
        field,
        value: value.to_string(),
    })
}

impl FromStr for SaveRecord {
    type Err = SaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.lines().next().unwrap_or_default();
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != FIELD_COUNT {
            return Err(SaveError::FieldCount(fields.len()));
        }

        Ok(Self {
            high_score: parse_field("highScore", fields[0])?,
            currency: parse_field("currency", fields[1])?,
            music_on: parse_field("musicOn", fields[2])?,
            sounds_on: parse_field("soundsOn", fields[3])?,
            fps_overlay: parse_field("fpsOverlay", fields[4])?,
            equipped: parse_field("equippedVehicle", fields[5])?,
            truck_owned: parse_field("truckOwned", fields[6])?,
            atv_owned: parse_field("atvOwned", fields[7])?,
        })
    }
}

impl fmt::Display for SaveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{}",
            self.high_score,
            self.currency,
            self.music_on,
            self.sounds_on,
            self.fps_overlay,
            self.equipped,
            self.truck_owned,
            self.atv_owned
        )
    }
}

/// The save record on disk.
#[derive(Debug, Clone)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the record, reporting why it could not be used.
    pub fn read(&self) -> Result<SaveRecord, SaveError> {
        let contents = fs::read_to_string(&self.path)?;
        contents.parse()
    }

    /// Loads the inventory. A missing or malformed record yields the defaults.
    pub fn load(&self) -> PlayerInventory {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No save file present, using defaults");
            return PlayerInventory::default();
        }

        match self.read() {
            Ok(record) => {
                info!(path = %self.path.display(), high_score = record.high_score, "Save loaded");
                record.into_inventory()
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Ignoring unreadable save: {e}");
                PlayerInventory::default()
            }
        }
    }

    /// Writes the record, replacing whatever was there.
    pub fn save(&self, inventory: &PlayerInventory) -> Result<(), SaveError> {
        let record = SaveRecord::from_inventory(inventory);
        fs::write(&self.path, record.to_string())?;
        debug!(path = %self.path.display(), "Save written");
        Ok(())
    }
}
