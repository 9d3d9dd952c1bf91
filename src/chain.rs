//! Target chain descriptors
//!
//! A descriptor is serialized verbatim as the `wallet_addEthereumChain`
//! parameter object, so field names follow the provider wire format
//! (camelCase).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    /// Hex-encoded chain id, e.g. "0x38".
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl ChainDescriptor {
    /// BNB Smart Chain mainnet
    pub fn bsc() -> Self {
        Self {
            chain_id: "0x38".to_string(),
            chain_name: "BNB Smart Chain".to_string(),
            native_currency: NativeCurrency {
                name: "BNB".to_string(),
                symbol: "BNB".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://bsc-dataseed.binance.org/".to_string()],
            block_explorer_urls: vec!["https://bscscan.com".to_string()],
        }
    }

    /// BNB Smart Chain testnet
    pub fn bsc_testnet() -> Self {
        Self {
            chain_id: "0x61".to_string(),
            chain_name: "BNB Smart Chain Testnet".to_string(),
            native_currency: NativeCurrency {
                name: "Test BNB".to_string(),
                symbol: "tBNB".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://data-seed-prebsc-1-s1.binance.org:8545/".to_string()],
            block_explorer_urls: vec!["https://testnet.bscscan.com".to_string()],
        }
    }

    /// Whether a provider-reported chain id refers to this chain.
    pub fn matches(&self, chain_id: &str) -> bool {
        !chain_id.is_empty() && normalize_chain_id(chain_id) == normalize_chain_id(&self.chain_id)
    }
}

/// Lowercase a hex chain id so "0X38" and "0x38" compare equal.
pub fn normalize_chain_id(chain_id: &str) -> String {
    chain_id.trim().to_ascii_lowercase()
}
