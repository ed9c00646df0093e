//! The supported asset universe.
//!
//! Metadata only - the catalog/search service itself is an external
//! collaborator. The engine uses this table for the correlation matrix
//! and the demo binary.

use serde::{Deserialize, Serialize};

/// Broad asset class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Index,
    Stock,
    Crypto,
}

/// Display metadata for one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetInfo {
    pub symbol: String,
    pub name: String,
    pub kind: AssetKind,
}

impl AssetInfo {
    fn new(symbol: &str, name: &str, kind: AssetKind) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            kind,
        }
    }
}

/// The default universe covered by the correlation matrix.
pub fn default_universe() -> Vec<AssetInfo> {
    use AssetKind::*;
    vec![
        AssetInfo::new("^GSPC", "S&P 500", Index),
        AssetInfo::new("^IXIC", "NASDAQ", Index),
        AssetInfo::new("^DJI", "Dow Jones Industrial Average", Index),
        AssetInfo::new("^GDAXI", "DAX", Index),
        AssetInfo::new("^FTSE", "FTSE 100", Index),
        AssetInfo::new("^N225", "Nikkei 225", Index),
        AssetInfo::new("AAPL", "Apple Inc.", Stock),
        AssetInfo::new("MSFT", "Microsoft Corp.", Stock),
        AssetInfo::new("GOOGL", "Alphabet Inc.", Stock),
        AssetInfo::new("AMZN", "Amazon.com Inc.", Stock),
        AssetInfo::new("TSLA", "Tesla Inc.", Stock),
        AssetInfo::new("NVDA", "NVIDIA Corp.", Stock),
        AssetInfo::new("META", "Meta Platforms", Stock),
        AssetInfo::new("BTC-USD", "Bitcoin", Crypto),
        AssetInfo::new("ETH-USD", "Ethereum", Crypto),
        AssetInfo::new("SOL-USD", "Solana", Crypto),
        AssetInfo::new("XRP-USD", "XRP", Crypto),
        AssetInfo::new("ADA-USD", "Cardano", Crypto),
        AssetInfo::new("DOT-USD", "Polkadot", Crypto),
        AssetInfo::new("LTC-USD", "Litecoin", Crypto),
    ]
}

/// Look up an asset by symbol in the default universe.
pub fn lookup(symbol: &str) -> Option<AssetInfo> {
    default_universe().into_iter().find(|a| a.symbol == symbol)
}
