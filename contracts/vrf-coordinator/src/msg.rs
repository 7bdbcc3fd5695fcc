use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::{CoordinatorConfig, Fulfillment, RandomnessRequest, Subscription};

#[cw_serde]
pub struct InstantiateMsg {
    pub operators: Vec<String>,
    /// Hex-encoded quicknet public key (96 bytes = 192 hex chars)
    pub quicknet_pubkey_hex: String,
    pub chain_hash: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
    pub min_request_confirmations: u16,
    pub max_num_words: u32,
    pub max_callback_gas_limit: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Open a subscription owned by the sender.
    CreateSubscription {},
    /// Allow a contract to request against a subscription. Owner only.
    AddConsumer {
        subscription_id: u64,
        consumer: String,
    },
    /// Owner only.
    RemoveConsumer {
        subscription_id: u64,
        consumer: String,
    },
    /// Request random words. The sender must be a consumer of the subscription.
    /// The assigned id is emitted on the `vrf_random_words_requested` event.
    RequestRandomWords {
        key_hash: String,
        subscription_id: u64,
        request_confirmations: u16,
        callback_gas_limit: u64,
        num_words: u32,
    },
    /// Fulfill a pending request with a drand beacon. Operators only.
    FulfillRequest {
        request_id: u64,
        round: u64,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
    /// Re-send words whose consumer callback failed. Operators only.
    RedeliverRandomWords { request_id: u64 },
    /// Update operator list (admin only).
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(CoordinatorConfig)]
    Config {},

    #[returns(Option<Subscription>)]
    Subscription { subscription_id: u64 },

    #[returns(Option<RandomnessRequest>)]
    Request { request_id: u64 },

    #[returns(Option<Fulfillment>)]
    Fulfillment { request_id: u64 },

    /// Latest drand round published at the current block time
    #[returns(u64)]
    CurrentRound {},
}
