use cosmwasm_std::{coin, to_json_binary, Binary, Deps, Env, StdError, StdResult};

use crate::execute::pot_balance;
use crate::msg::{CheckUpkeepResponse, RoundInfoResponse};
use crate::state::{CONFIG, ROUND};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_raffle_state(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round.state)
}

pub fn query_player(deps: Deps, index: u64) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    let player = round
        .player_at(index)
        .map_err(|e| StdError::generic_err(e.to_string()))?;
    to_json_binary(player)
}

pub fn query_number_of_players(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round.num_players())
}

pub fn query_last_timestamp(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round.last_timestamp)
}

pub fn query_recent_winner(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round.recent_winner)
}

pub fn query_entrance_fee(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.entrance_fee)
}

pub fn query_interval(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.interval_seconds)
}

pub fn query_pending_request(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round.pending_request_id)
}

/// Read-only eligibility check polled by the automation network.
pub fn query_check_upkeep(deps: Deps, env: Env, _check_data: Binary) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let round = ROUND.load(deps.storage)?;
    let balance = pot_balance(&deps.querier, &env, &config.entrance_fee.denom)?;

    to_json_binary(&CheckUpkeepResponse {
        upkeep_needed: round.upkeep_needed(env.block.time, config.interval_seconds, balance),
        perform_data: Binary::default(),
    })
}

pub fn query_round_info(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let round = ROUND.load(deps.storage)?;
    let denom = config.entrance_fee.denom;
    let balance = pot_balance(&deps.querier, &env, &denom)?;

    to_json_binary(&RoundInfoResponse {
        state: round.state,
        num_players: round.num_players(),
        last_timestamp: round.last_timestamp,
        pending_request_id: round.pending_request_id,
        recent_winner: round.recent_winner,
        pot: coin(balance.u128(), denom),
    })
}
