use cosmwasm_std::{to_json_binary, Binary, Deps, Env, StdResult};

use crate::state::{CONFIG, FULFILLMENTS, REQUESTS, SUBSCRIPTIONS};
use crate::verify::current_round;

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_subscription(deps: Deps, subscription_id: u64) -> StdResult<Binary> {
    let subscription = SUBSCRIPTIONS.may_load(deps.storage, subscription_id)?;
    to_json_binary(&subscription)
}

pub fn query_request(deps: Deps, request_id: u64) -> StdResult<Binary> {
    let request = REQUESTS.may_load(deps.storage, request_id)?;
    to_json_binary(&request)
}

pub fn query_fulfillment(deps: Deps, request_id: u64) -> StdResult<Binary> {
    let fulfillment = FULFILLMENTS.may_load(deps.storage, request_id)?;
    to_json_binary(&fulfillment)
}

pub fn query_current_round(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let round = current_round(
        env.block.time.seconds(),
        config.genesis_time,
        config.period_seconds,
    );
    to_json_binary(&round)
}
