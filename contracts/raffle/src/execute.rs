use cosmwasm_std::{
    coins, to_json_binary, BankMsg, Binary, DepsMut, Env, Event, MessageInfo, QuerierWrapper,
    Reply, Response, StdError, StdResult, SubMsg, SubMsgResult, Uint128, Uint256, WasmMsg,
};
use raffle_common::{
    CoordinatorExecuteMsg, RaffleState, RANDOM_WORDS_REQUESTED_EVENT, REQUEST_ID_ATTRIBUTE,
};

use crate::error::ContractError;
use crate::state::{CONFIG, ROUND};

/// Reply to the coordinator request, carrying the assigned request id.
pub const REPLY_REQUEST_RANDOMNESS: u64 = 1;
/// Reply sent only when the winner payout is rejected.
pub const REPLY_PAYOUT: u64 = 2;

/// A draw needs a single word.
pub const NUM_WORDS: u32 = 1;

/// Full balance the contract holds in the fee denom.
pub fn pot_balance(querier: &QuerierWrapper, env: &Env, denom: &str) -> StdResult<Uint128> {
    let balance = querier.query_balance(env.contract.address.as_str(), denom)?;
    Ok(balance.amount)
}

/// Join the current round. Anyone can call with at least the entrance fee,
/// sent in the fee denom only.
pub fn enter(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    // Only the fee denom counts toward the pot
    if let Some(stray) = info
        .funds
        .iter()
        .find(|c| c.denom != config.entrance_fee.denom)
    {
        return Err(ContractError::UnexpectedDenom {
            denom: stray.denom.clone(),
            want: config.entrance_fee.denom,
        });
    }

    let paid = info
        .funds
        .iter()
        .find(|c| c.denom == config.entrance_fee.denom)
        .map(|c| c.amount)
        .unwrap_or(Uint128::zero());

    let mut round = ROUND.load(deps.storage)?;
    round.enter(info.sender.clone(), paid, config.entrance_fee.amount)?;
    ROUND.save(deps.storage, &round)?;

    Ok(Response::new()
        .add_attribute("action", "enter")
        .add_attribute("player", info.sender.to_string())
        .add_attribute("amount", paid.to_string())
        .add_event(
            Event::new("raffle_entered")
                .add_attribute("player", info.sender.to_string())
                .add_attribute("num_players", round.num_players().to_string()),
        ))
}

/// Close the round and ask the coordinator for randomness.
/// The request id arrives in the reply, see [`record_request`].
pub fn perform_upkeep(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    _perform_data: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let balance = pot_balance(&deps.querier, &env, &config.entrance_fee.denom)?;

    let mut round = ROUND.load(deps.storage)?;
    round.close(env.block.time, config.interval_seconds, balance)?;
    ROUND.save(deps.storage, &round)?;

    let request_msg = WasmMsg::Execute {
        contract_addr: config.vrf_coordinator.to_string(),
        msg: to_json_binary(&CoordinatorExecuteMsg::RequestRandomWords {
            key_hash: config.key_hash.clone(),
            subscription_id: config.subscription_id,
            request_confirmations: config.request_confirmations,
            callback_gas_limit: config.callback_gas_limit,
            num_words: NUM_WORDS,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_submessage(SubMsg::reply_on_success(request_msg, REPLY_REQUEST_RANDOMNESS))
        .add_attribute("action", "perform_upkeep")
        .add_attribute("balance", balance.to_string())
        .add_attribute("num_players", round.num_players().to_string()))
}

/// Store the coordinator-assigned request id as the round's pending token.
///
/// The id is read from the coordinator's request event; events emitted by
/// any other contract in the sub-message tree are ignored.
pub fn record_request(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let response = msg.result.into_result().map_err(StdError::generic_err)?;

    let event_type = format!("wasm-{RANDOM_WORDS_REQUESTED_EVENT}");
    let coordinator = config.vrf_coordinator.as_str();
    let request_id = response
        .events
        .iter()
        .filter(|e| e.ty == event_type)
        .filter(|e| {
            e.attributes
                .iter()
                .any(|a| a.key == "_contract_address" && a.value == coordinator)
        })
        .find_map(|e| {
            e.attributes
                .iter()
                .find(|a| a.key == REQUEST_ID_ATTRIBUTE)
                .and_then(|a| a.value.parse::<u64>().ok())
        })
        .ok_or(ContractError::MissingRequestId)?;

    let mut round = ROUND.load(deps.storage)?;
    round.record_request(request_id)?;
    ROUND.save(deps.storage, &round)?;

    Ok(Response::new()
        .add_attribute("action", "record_request")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("raffle_winner_requested")
                .add_attribute("request_id", request_id.to_string()),
        ))
}

/// Randomness callback. Coordinator only.
///
/// Pays the whole pot to `players[random_words[0] % players.len()]` and
/// reopens the round. If the bank transfer is rejected, the payout reply
/// fails and the reset is reverted with it.
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.vrf_coordinator {
        return Err(ContractError::OnlyCoordinatorCanFulfill {
            have: info.sender.to_string(),
            want: config.vrf_coordinator.to_string(),
        });
    }

    let mut round = ROUND.load(deps.storage)?;
    let winner = round.pick_winner(request_id, &random_words)?;

    let denom = config.entrance_fee.denom;
    let pot = pot_balance(&deps.querier, &env, &denom)?;
    if pot.is_zero() {
        return Err(ContractError::TransferFailed {
            winner: winner.to_string(),
            reason: "pot is empty".to_string(),
        });
    }

    round.reset(winner.clone(), env.block.time);
    ROUND.save(deps.storage, &round)?;

    let payout = SubMsg::reply_on_error(
        BankMsg::Send {
            to_address: winner.to_string(),
            amount: coins(pot.u128(), denom.clone()),
        },
        REPLY_PAYOUT,
    )
    .with_payload(winner.as_str().as_bytes().to_vec());

    Ok(Response::new()
        .add_submessage(payout)
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_attribute("amount", pot.to_string())
        .add_event(
            Event::new("raffle_winner_picked")
                .add_attribute("winner", winner.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("amount", pot.to_string())
                .add_attribute("denom", denom)
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// The payout was rejected: fail the whole fulfillment so the round stays
/// in its pre-payout state.
pub fn payout_failed(deps: DepsMut, msg: Reply) -> Result<Response, ContractError> {
    let winner = String::from_utf8(msg.payload.to_vec()).unwrap_or_default();
    let reason = match msg.result {
        SubMsgResult::Err(reason) => reason,
        SubMsgResult::Ok(_) => "unexpected payout reply".to_string(),
    };
    deps.api.debug(&format!("raffle payout to {winner} rejected: {reason}"));

    Err(ContractError::TransferFailed { winner, reason })
}

/// Update fee or interval. Admin only, and only between rounds so the
/// terms never change under existing entrants.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    entrance_fee: Option<Uint128>,
    interval_seconds: Option<u64>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    let round = ROUND.load(deps.storage)?;
    if round.state != RaffleState::Open || !round.players.is_empty() {
        return Err(ContractError::ConfigLocked);
    }

    if let Some(fee) = entrance_fee {
        validate_entrance_fee(fee)?;
        config.entrance_fee.amount = fee;
    }
    if let Some(interval) = interval_seconds {
        validate_interval(interval)?;
        config.interval_seconds = interval;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("entrance_fee", config.entrance_fee.to_string())
        .add_attribute("interval_seconds", config.interval_seconds.to_string()))
}

pub fn validate_entrance_fee(amount: Uint128) -> Result<(), ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidEntranceFee);
    }
    Ok(())
}

pub fn validate_interval(interval_seconds: u64) -> Result<(), ContractError> {
    if interval_seconds == 0 {
        return Err(ContractError::InvalidInterval);
    }
    Ok(())
}
