use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin};
use cw_storage_plus::Item;

use crate::round::Round;

pub const CONFIG: Item<RaffleConfig> = Item::new("config");
pub const ROUND: Item<Round> = Item::new("round");

#[cw_serde]
pub struct RaffleConfig {
    pub admin: Addr,
    /// Minimum payment per entry. Its denom is also the pot's denom.
    pub entrance_fee: Coin,
    /// Minimum round length before a draw may start
    pub interval_seconds: u64,
    pub vrf_coordinator: Addr,
    /// Beacon chain identifier the coordinator derives words from
    pub key_hash: String,
    pub subscription_id: u64,
    pub request_confirmations: u16,
    /// Gas the coordinator may spend delivering the fulfillment
    pub callback_gas_limit: u64,
}
