//! JSON file store: `economy.json`, `inventory.json` and `market.json`
//! under one data directory.
//!
//! Writes go to a sibling `.json.tmp` file which is then renamed over the
//! target, so a crash mid-write never leaves a truncated document.

use super::{Dirty, Inventories, Ledger, LoadedState, StateStore, state::parse_market};
use crate::{
    entities::MarketBook,
    errors::{Error, Result},
    store::EconomyState,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

const LEDGER_FILE_NAME: &str = "economy.json";
const INVENTORY_FILE_NAME: &str = "inventory.json";
const MARKET_FILE_NAME: &str = "market.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// Reads a document; a missing or blank file is `None`.
    fn read_value(&self, file_name: &str) -> Result<Option<Value>> {
        let path = self.path(file_name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "data file missing, starting empty");
                return Ok(None);
            }
            Err(err) => {
                return Err(Error::Persistence {
                    message: format!("read {} failed: {err}", path.display()),
                });
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| Error::Persistence {
                message: format!("parse {} failed: {err}", path.display()),
            })
    }

    fn read_document<T: DeserializeOwned + Default>(&self, file_name: &str) -> Result<T> {
        match self.read_value(file_name)? {
            Some(value) => serde_json::from_value(value).map_err(|err| Error::Persistence {
                message: format!("decode {file_name} failed: {err}"),
            }),
            None => Ok(T::default()),
        }
    }

    fn write_document<T: Serialize>(&self, file_name: &str, document: &T) -> Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|err| Error::Persistence {
            message: format!("create data dir {} failed: {err}", self.data_dir.display()),
        })?;
        let bytes = serde_json::to_vec_pretty(document).map_err(|err| Error::Persistence {
            message: format!("serialize {file_name} failed: {err}"),
        })?;
        let path = self.path(file_name);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, bytes).map_err(|err| Error::Persistence {
            message: format!("write {} failed: {err}", temp_path.display()),
        })?;
        fs::rename(&temp_path, &path).map_err(|err| Error::Persistence {
            message: format!(
                "rename {} -> {} failed: {err}",
                temp_path.display(),
                path.display()
            ),
        })
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<LoadedState> {
        let ledger: Ledger = self.read_document(LEDGER_FILE_NAME)?;
        let inventories: Inventories = self.read_document(INVENTORY_FILE_NAME)?;
        let (market, legacy_market) = match self.read_value(MARKET_FILE_NAME)? {
            Some(value) => parse_market(value)?,
            None => (MarketBook::default(), false),
        };

        info!(
            data_dir = %self.data_dir.display(),
            listings = market.listings.len(),
            "loaded economy data"
        );
        Ok(LoadedState {
            state: EconomyState {
                ledger,
                inventories,
                market,
            },
            migrated: if legacy_market {
                Dirty::MARKET
            } else {
                Dirty::default()
            },
        })
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        self.write_document(LEDGER_FILE_NAME, ledger)
    }

    fn save_inventories(&self, inventories: &Inventories) -> Result<()> {
        self.write_document(INVENTORY_FILE_NAME, inventories)
    }

    fn save_market(&self, market: &MarketBook) -> Result<()> {
        self.write_document(MARKET_FILE_NAME, market)
    }
}
