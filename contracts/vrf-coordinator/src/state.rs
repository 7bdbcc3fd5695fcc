use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint256};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<CoordinatorConfig> = Item::new("config");
pub const NEXT_SUBSCRIPTION_ID: Item<u64> = Item::new("next_sub_id");
pub const NEXT_REQUEST_ID: Item<u64> = Item::new("next_request_id");
pub const SUBSCRIPTIONS: Map<u64, Subscription> = Map::new("subscriptions");
/// Requests awaiting a beacon. Removed once fulfilled.
pub const REQUESTS: Map<u64, RandomnessRequest> = Map::new("requests");
pub const FULFILLMENTS: Map<u64, Fulfillment> = Map::new("fulfillments");

pub const MAX_CONSUMERS: usize = 100;
pub const MAX_REQUEST_CONFIRMATIONS: u16 = 200;

#[cw_serde]
pub struct CoordinatorConfig {
    pub admin: Addr,
    pub operators: Vec<Addr>,
    /// Quicknet public key, 96 bytes (G2 point)
    pub quicknet_pubkey: Vec<u8>,
    /// Chain hash identifying the drand network. Doubles as the only key hash.
    pub chain_hash: String,
    /// Genesis time of the drand network (unix seconds)
    pub genesis_time: u64,
    /// Period between rounds in seconds (3 for quicknet)
    pub period_seconds: u64,
    pub min_request_confirmations: u16,
    pub max_num_words: u32,
    pub max_callback_gas_limit: u64,
}

#[cw_serde]
pub struct Subscription {
    pub id: u64,
    pub owner: Addr,
    pub consumers: Vec<Addr>,
    pub created_at: Timestamp,
}

#[cw_serde]
pub struct RandomnessRequest {
    pub id: u64,
    pub subscription_id: u64,
    pub consumer: Addr,
    pub num_words: u32,
    pub callback_gas_limit: u64,
    /// The only drand round whose beacon may fulfill this request
    pub target_round: u64,
    pub requested_at: Timestamp,
}

#[cw_serde]
pub struct Fulfillment {
    pub request_id: u64,
    pub consumer: Addr,
    pub round: u64,
    /// sha256(signature), 32 bytes
    pub randomness: Vec<u8>,
    pub random_words: Vec<Uint256>,
    pub callback_gas_limit: u64,
    /// False when the consumer callback failed; such words may be redelivered.
    pub success: bool,
    pub fulfilled_at: Timestamp,
    pub fulfilled_by: Addr,
}
