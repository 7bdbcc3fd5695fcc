use cosmwasm_std::{
    to_json_binary, Addr, DepsMut, Env, Event, MessageInfo, Reply, Response, StdResult, Storage,
    SubMsg, SubMsgResult, WasmMsg,
};
use raffle_common::{
    expand_random_words, ConsumerExecuteMsg, RANDOM_WORDS_REQUESTED_EVENT, REQUEST_ID_ATTRIBUTE,
};

use crate::error::ContractError;
use crate::state::{
    Fulfillment, RandomnessRequest, Subscription, CONFIG, FULFILLMENTS, MAX_CONSUMERS,
    MAX_REQUEST_CONFIRMATIONS, NEXT_REQUEST_ID, NEXT_SUBSCRIPTION_ID, REQUESTS, SUBSCRIPTIONS,
};
use crate::verify::{current_round, verify_quicknet_beacon};

/// Reply for a consumer callback that failed.
pub const REPLY_CALLBACK: u64 = 1;

/// Open a new subscription owned by the sender.
pub fn create_subscription(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let id = NEXT_SUBSCRIPTION_ID.load(deps.storage)?;
    NEXT_SUBSCRIPTION_ID.save(deps.storage, &(id + 1))?;

    let subscription = Subscription {
        id,
        owner: info.sender.clone(),
        consumers: vec![],
        created_at: env.block.time,
    };
    SUBSCRIPTIONS.save(deps.storage, id, &subscription)?;

    Ok(Response::new()
        .add_attribute("action", "create_subscription")
        .add_attribute("subscription_id", id.to_string())
        .add_event(
            Event::new("vrf_subscription_created")
                .add_attribute("subscription_id", id.to_string())
                .add_attribute("owner", info.sender.to_string()),
        ))
}

fn load_owned_subscription(
    storage: &dyn Storage,
    sender: &Addr,
    subscription_id: u64,
) -> Result<Subscription, ContractError> {
    let subscription = SUBSCRIPTIONS
        .may_load(storage, subscription_id)?
        .ok_or(ContractError::SubscriptionNotFound { subscription_id })?;
    if subscription.owner != *sender {
        return Err(ContractError::Unauthorized {
            reason: "only the subscription owner can manage consumers".to_string(),
        });
    }
    Ok(subscription)
}

/// Add a consumer. Subscription owner only. Adding an existing consumer is a no-op.
pub fn add_consumer(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    subscription_id: u64,
    consumer: String,
) -> Result<Response, ContractError> {
    let mut subscription = load_owned_subscription(deps.storage, &info.sender, subscription_id)?;
    let consumer = deps.api.addr_validate(&consumer)?;

    if !subscription.consumers.contains(&consumer) {
        if subscription.consumers.len() >= MAX_CONSUMERS {
            return Err(ContractError::TooManyConsumers { max: MAX_CONSUMERS });
        }
        subscription.consumers.push(consumer.clone());
        SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;
    }

    Ok(Response::new()
        .add_attribute("action", "add_consumer")
        .add_attribute("subscription_id", subscription_id.to_string())
        .add_attribute("consumer", consumer.to_string()))
}

/// Remove a consumer. Subscription owner only.
pub fn remove_consumer(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    subscription_id: u64,
    consumer: String,
) -> Result<Response, ContractError> {
    let mut subscription = load_owned_subscription(deps.storage, &info.sender, subscription_id)?;
    let consumer = deps.api.addr_validate(&consumer)?;

    if !subscription.consumers.contains(&consumer) {
        return Err(ContractError::InvalidConsumer {
            subscription_id,
            consumer: consumer.to_string(),
        });
    }
    subscription.consumers.retain(|c| *c != consumer);
    SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;

    Ok(Response::new()
        .add_attribute("action", "remove_consumer")
        .add_attribute("subscription_id", subscription_id.to_string())
        .add_attribute("consumer", consumer.to_string()))
}

/// Parameters of a `RequestRandomWords` call.
pub struct RequestParams {
    pub key_hash: String,
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u64,
    pub num_words: u32,
}

/// Accept a randomness request from a subscription consumer.
///
/// The request may only be fulfilled by the beacon exactly
/// `request_confirmations` rounds after the one current at request time.
pub fn request_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: RequestParams,
) -> Result<Response, ContractError> {
    let RequestParams {
        key_hash,
        subscription_id,
        request_confirmations,
        callback_gas_limit,
        num_words,
    } = params;

    let config = CONFIG.load(deps.storage)?;

    if key_hash != config.chain_hash {
        return Err(ContractError::InvalidKeyHash { key_hash });
    }

    let subscription = SUBSCRIPTIONS
        .may_load(deps.storage, subscription_id)?
        .ok_or(ContractError::SubscriptionNotFound { subscription_id })?;
    if !subscription.consumers.contains(&info.sender) {
        return Err(ContractError::InvalidConsumer {
            subscription_id,
            consumer: info.sender.to_string(),
        });
    }

    if request_confirmations < config.min_request_confirmations
        || request_confirmations > MAX_REQUEST_CONFIRMATIONS
    {
        return Err(ContractError::InvalidRequestConfirmations {
            have: request_confirmations,
            min: config.min_request_confirmations,
            max: MAX_REQUEST_CONFIRMATIONS,
        });
    }
    if callback_gas_limit > config.max_callback_gas_limit {
        return Err(ContractError::GasLimitTooBig {
            have: callback_gas_limit,
            want: config.max_callback_gas_limit,
        });
    }
    if num_words == 0 || num_words > config.max_num_words {
        return Err(ContractError::InvalidNumWords {
            have: num_words,
            max: config.max_num_words,
        });
    }

    let request_id = NEXT_REQUEST_ID.load(deps.storage)?;
    NEXT_REQUEST_ID.save(deps.storage, &(request_id + 1))?;

    let target_round = current_round(
        env.block.time.seconds(),
        config.genesis_time,
        config.period_seconds,
    ) + u64::from(request_confirmations);

    let request = RandomnessRequest {
        id: request_id,
        subscription_id,
        consumer: info.sender.clone(),
        num_words,
        callback_gas_limit,
        target_round,
        requested_at: env.block.time,
    };
    REQUESTS.save(deps.storage, request_id, &request)?;

    Ok(Response::new()
        .add_attribute("action", "request_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new(RANDOM_WORDS_REQUESTED_EVENT)
                .add_attribute(REQUEST_ID_ATTRIBUTE, request_id.to_string())
                .add_attribute("key_hash", key_hash)
                .add_attribute("subscription_id", subscription_id.to_string())
                .add_attribute("consumer", info.sender.to_string())
                .add_attribute("num_words", num_words.to_string())
                .add_attribute("callback_gas_limit", callback_gas_limit.to_string())
                .add_attribute("target_round", target_round.to_string()),
        ))
}

/// Deliver the words of `fulfillment` to its consumer, capped at the
/// requested gas. Only a failure comes back as a reply.
fn callback_msg(fulfillment: &Fulfillment) -> StdResult<SubMsg> {
    let callback = WasmMsg::Execute {
        contract_addr: fulfillment.consumer.to_string(),
        msg: to_json_binary(&ConsumerExecuteMsg::FulfillRandomWords {
            request_id: fulfillment.request_id,
            random_words: fulfillment.random_words.clone(),
        })?,
        funds: vec![],
    };
    Ok(SubMsg::reply_on_error(callback, REPLY_CALLBACK)
        .with_gas_limit(fulfillment.callback_gas_limit)
        .with_payload(fulfillment.request_id.to_be_bytes().to_vec()))
}

/// Fulfill a pending request with a verified drand beacon. Operators only.
///
/// The request is consumed whether or not the consumer callback succeeds.
pub fn fulfill_request(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    round: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can fulfill requests".to_string(),
        });
    }

    let request = REQUESTS
        .may_load(deps.storage, request_id)?
        .ok_or(ContractError::RequestNotFound { request_id })?;

    // One beacon per request, fixed when the request was made
    if round < request.target_round {
        return Err(ContractError::RoundTooEarly {
            round,
            target_round: request.target_round,
        });
    }
    if round > request.target_round {
        return Err(ContractError::RoundTooLate {
            round,
            target_round: request.target_round,
        });
    }

    let signature = hex::decode(&signature_hex).map_err(|_| ContractError::InvalidHex {
        field: "signature_hex".to_string(),
    })?;

    let randomness = verify_quicknet_beacon(&config.quicknet_pubkey, round, &signature)
        .map_err(|e| ContractError::VerificationFailed {
            reason: e.to_string(),
        })?;

    let fulfillment = Fulfillment {
        request_id,
        consumer: request.consumer.clone(),
        round,
        randomness: randomness.to_vec(),
        random_words: expand_random_words(&randomness, request_id, request.num_words),
        callback_gas_limit: request.callback_gas_limit,
        success: true,
        fulfilled_at: env.block.time,
        fulfilled_by: info.sender.clone(),
    };

    REQUESTS.remove(deps.storage, request_id);
    FULFILLMENTS.save(deps.storage, request_id, &fulfillment)?;

    Ok(Response::new()
        .add_submessage(callback_msg(&fulfillment)?)
        .add_attribute("action", "fulfill_request")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("round", round.to_string())
        .add_event(
            Event::new("vrf_random_words_fulfilled")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("consumer", request.consumer.to_string())
                .add_attribute("round", round.to_string())
                .add_attribute("randomness", hex::encode(randomness))
                .add_attribute("num_words", request.num_words.to_string())
                .add_attribute("fulfilled_by", info.sender.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Re-send stored words after a failed callback. Operators only.
pub fn redeliver_random_words(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    request_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can redeliver random words".to_string(),
        });
    }

    let mut fulfillment = FULFILLMENTS
        .may_load(deps.storage, request_id)?
        .ok_or(ContractError::FulfillmentNotFound { request_id })?;
    if fulfillment.success {
        return Err(ContractError::CallbackAlreadySucceeded { request_id });
    }

    fulfillment.success = true;
    FULFILLMENTS.save(deps.storage, request_id, &fulfillment)?;

    Ok(Response::new()
        .add_submessage(callback_msg(&fulfillment)?)
        .add_attribute("action", "redeliver_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("vrf_random_words_redelivered")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("consumer", fulfillment.consumer.to_string()),
        ))
}

/// Record a failed consumer callback without reverting the fulfillment.
pub fn callback_failed(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    let id_bytes: [u8; 8] = msg
        .payload
        .as_slice()
        .try_into()
        .map_err(|_| ContractError::InvalidReplyPayload)?;
    let request_id = u64::from_be_bytes(id_bytes);

    let reason = match msg.result {
        SubMsgResult::Err(reason) => reason,
        SubMsgResult::Ok(_) => return Ok(Response::new()),
    };

    let mut fulfillment = FULFILLMENTS
        .may_load(deps.storage, request_id)?
        .ok_or(ContractError::FulfillmentNotFound { request_id })?;
    fulfillment.success = false;
    FULFILLMENTS.save(deps.storage, request_id, &fulfillment)?;

    Ok(Response::new()
        .add_attribute("action", "callback_failed")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("vrf_callback_failed")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("consumer", fulfillment.consumer.to_string())
                .add_attribute("reason", reason),
        ))
}

/// Update the operator list. Admin only.
pub fn update_operators(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update operators".to_string(),
        });
    }

    for addr_str in &remove {
        let addr = deps.api.addr_validate(addr_str)?;
        config.operators.retain(|a| *a != addr);
    }

    for addr_str in &add {
        let addr = deps.api.addr_validate(addr_str)?;
        if !config.operators.contains(&addr) {
            config.operators.push(addr);
        }
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_operators")
        .add_attribute("added", add.join(","))
        .add_attribute("removed", remove.join(",")))
}
