//! Supported jetton symbols and their master contracts.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Jettons known out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoinSymbol {
    Gm,
    Arbuz,
    Kingyton,
    Dfc,
    M5,
}

impl CoinSymbol {
    pub const ALL: [CoinSymbol; 5] = [
        CoinSymbol::Gm,
        CoinSymbol::Arbuz,
        CoinSymbol::Kingyton,
        CoinSymbol::Dfc,
        CoinSymbol::M5,
    ];

    /// Ticker as shown to users.
    pub fn as_str(self) -> &'static str {
        match self {
            CoinSymbol::Gm => "GM",
            CoinSymbol::Arbuz => "ARBUZ",
            CoinSymbol::Kingyton => "KINGYTON",
            CoinSymbol::Dfc => "DFC",
            CoinSymbol::M5 => "M5",
        }
    }

    /// Raw address of the jetton master contract.
    pub fn master_address(self) -> &'static str {
        match self {
            CoinSymbol::Gm => "0:7d7b64496899d7fed00b0c14b221be688f460724b6bc16772c17ee4c8d7a256d",
            CoinSymbol::Arbuz => "0:0cd8a583a7d94dd18bf1bdf49b234af28c15f033bd2b6a4a4d2076ee1136ad45",
            CoinSymbol::Kingyton => "0:beb5d4638e860ccf7317296e298fde5b35982f4725b0676dc98b1de987b82ebc",
            CoinSymbol::Dfc => "0:f6eb371de82aa9cfb5b22ca547f31fdc0fa0fbb41ae89ba84a73272ff0bf2157",
            CoinSymbol::M5 => "0:5ae8ea1f738bd06755d92d361191b5f8a965160427f4b05060a3491dc5d970ea",
        }
    }
}

impl fmt::Display for CoinSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the built-in symbols.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown coin symbol '{0}'")]
pub struct UnknownSymbol(pub String);

impl FromStr for CoinSymbol {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoinSymbol::ALL
            .into_iter()
            .find(|symbol| symbol.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSymbol(s.to_string()))
    }
}

/// Symbol → jetton master lookup: built-in table plus configured overrides.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    /// Keys are upper-cased symbols.
    entries: BTreeMap<String, String>,
}

impl TokenRegistry {
    /// Registry with only the built-in symbols.
    pub fn builtin() -> Self {
        let entries = CoinSymbol::ALL
            .into_iter()
            .map(|symbol| (symbol.as_str().to_string(), symbol.master_address().to_string()))
            .collect();
        Self { entries }
    }

    /// Built-in symbols, with `overrides` added on top (same symbol replaces).
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut registry = Self::builtin();
        for (symbol, address) in overrides {
            registry
                .entries
                .insert(symbol.trim().to_ascii_uppercase(), address.clone());
        }
        registry
    }

    /// Jetton master for `symbol`, or `None` when the symbol means native TON.
    pub fn resolve(&self, symbol: &str) -> Option<&str> {
        self.entries
            .get(&symbol.trim().to_ascii_uppercase())
            .map(String::as_str)
    }

    /// All entries, ordered by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, a)| (s.as_str(), a.as_str()))
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
