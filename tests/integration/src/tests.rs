//! Integration tests for the raffle and its randomness coordinator.
//!
//! Both contracts are driven through their entry points with
//! `cosmwasm_std::testing` mocks. Messages one contract emits are relayed
//! to the other by hand, and the sub-message replies the chain would
//! deliver are rebuilt from the callee's response.
//!
//! Run:
//! ```bash
//! cargo test -p raffle-integration-tests
//! ```

use cosmwasm_std::testing::{
    message_info, mock_dependencies, mock_env, MockApi, MockQuerier, MockStorage,
};
use cosmwasm_std::{
    coin, coins, from_json, Addr, BankMsg, Binary, CosmosMsg, Env, Event, OwnedDeps, Reply,
    ReplyOn, Response, SubMsgResponse, SubMsgResult, Timestamp, WasmMsg,
};
use raffle_common::{expand_random_words, RaffleState};

type TestDeps = OwnedDeps<MockStorage, MockApi, MockQuerier>;

// ─── Constants ───

/// Real drand quicknet public key
const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";
const CHAIN_HASH: &str = "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971";

/// Real quicknet test vector: round 1000
const TEST_ROUND: u64 = 1000;
const TEST_SIG_HEX: &str = "b44679b9a59af2ec876b1a6b1ad52ea9b1615fc3982b19576350f93447cb1125e342b73a8dd2bacbe47e4b6b63ed5e39";
const TEST_RANDOMNESS_HEX: &str =
    "fe290beca10872ef2fb164d2aa4442de4566183ec51c56ff3cd603d930e54fdd";

const GENESIS: u64 = 1692803367;

const DENOM: &str = "uraffle";
const INTERVAL: u64 = 30;

// ─── Harness ───

/// One mock chain per contract. The coordinator lives at `addr_make("coordinator")`,
/// the raffle at the default mock contract address.
struct Harness {
    coordinator: TestDeps,
    raffle: TestDeps,
    coordinator_addr: Addr,
    raffle_addr: Addr,
}

impl Harness {
    fn new() -> Self {
        let mut coordinator = mock_dependencies();
        let mut raffle = mock_dependencies();
        let coordinator_addr = coordinator.api.addr_make("coordinator");
        let raffle_addr = mock_env().contract.address;

        // Coordinator with one operator and subscription 1 funding the raffle
        let admin = coordinator.api.addr_make("admin");
        let operator = coordinator.api.addr_make("operator");
        let msg = vrf_coordinator::msg::InstantiateMsg {
            operators: vec![operator.to_string()],
            quicknet_pubkey_hex: QUICKNET_PK_HEX.to_string(),
            chain_hash: CHAIN_HASH.to_string(),
            genesis_time: GENESIS,
            period_seconds: 3,
            min_request_confirmations: 1,
            max_num_words: 10,
            max_callback_gas_limit: 2_500_000,
        };
        let env = coordinator_env(&coordinator_addr);
        vrf_coordinator::contract::instantiate(
            coordinator.as_mut(),
            env.clone(),
            message_info(&admin, &[]),
            msg,
        )
        .unwrap();

        let owner = coordinator.api.addr_make("owner");
        vrf_coordinator::contract::execute(
            coordinator.as_mut(),
            env.clone(),
            message_info(&owner, &[]),
            vrf_coordinator::msg::ExecuteMsg::CreateSubscription {},
        )
        .unwrap();
        vrf_coordinator::contract::execute(
            coordinator.as_mut(),
            env,
            message_info(&owner, &[]),
            vrf_coordinator::msg::ExecuteMsg::AddConsumer {
                subscription_id: 1,
                consumer: raffle_addr.to_string(),
            },
        )
        .unwrap();

        let admin = raffle.api.addr_make("admin");
        let msg = raffle::msg::InstantiateMsg {
            entrance_fee: coin(1, DENOM),
            interval_seconds: INTERVAL,
            vrf_coordinator: coordinator_addr.to_string(),
            key_hash: CHAIN_HASH.to_string(),
            subscription_id: 1,
            request_confirmations: 3,
            callback_gas_limit: 500_000,
        };
        raffle::contract::instantiate(raffle.as_mut(), mock_env(), message_info(&admin, &[]), msg)
            .unwrap();

        Harness {
            coordinator,
            raffle,
            coordinator_addr,
            raffle_addr,
        }
    }

    fn enter(&mut self, name: &str) -> Addr {
        let player = self.raffle.api.addr_make(name);
        raffle::contract::execute(
            self.raffle.as_mut(),
            mock_env(),
            message_info(&player, &coins(1, DENOM)),
            raffle::msg::ExecuteMsg::Enter {},
        )
        .unwrap();
        player
    }

    /// Mock bank does not credit sent funds, so the pot is set explicitly.
    fn set_pot(&mut self, amount: u128) {
        self.raffle
            .querier
            .bank
            .update_balance(self.raffle_addr.as_str(), coins(amount, DENOM));
    }

    /// Run upkeep on the raffle, relay the request to the coordinator and
    /// deliver the reply back to the raffle. Returns the coordinator response.
    fn perform_upkeep(&mut self) -> Response {
        let keeper = self.raffle.api.addr_make("keeper");
        let res = raffle::contract::execute(
            self.raffle.as_mut(),
            later_env(),
            message_info(&keeper, &[]),
            raffle::msg::ExecuteMsg::PerformUpkeep {
                perform_data: Binary::default(),
            },
        )
        .unwrap();
        assert_eq!(res.messages.len(), 1);
        assert_eq!(res.messages[0].reply_on, ReplyOn::Success);

        let (contract_addr, msg) = wasm_execute(&res.messages[0].msg);
        assert_eq!(contract_addr, self.coordinator_addr.as_str());
        let request: vrf_coordinator::msg::ExecuteMsg = from_json(msg).unwrap();

        let coordinator_res = vrf_coordinator::contract::execute(
            self.coordinator.as_mut(),
            coordinator_env(&self.coordinator_addr),
            message_info(&self.raffle_addr, &[]),
            request,
        )
        .unwrap();

        let reply = Reply {
            id: res.messages[0].id,
            payload: Binary::default(),
            gas_used: 0,
            result: SubMsgResult::Ok(wasm_response(&self.coordinator_addr, &coordinator_res)),
        };
        raffle::contract::reply(self.raffle.as_mut(), later_env(), reply).unwrap();
        coordinator_res
    }

    fn fulfill(&mut self, request_id: u64) -> Response {
        let operator = self.coordinator.api.addr_make("operator");
        vrf_coordinator::contract::execute(
            self.coordinator.as_mut(),
            coordinator_env(&self.coordinator_addr),
            message_info(&operator, &[]),
            vrf_coordinator::msg::ExecuteMsg::FulfillRequest {
                request_id,
                round: TEST_ROUND,
                signature_hex: TEST_SIG_HEX.to_string(),
            },
        )
        .unwrap()
    }

    /// Deliver a coordinator callback sub-message to the raffle.
    fn relay_callback(
        &mut self,
        callback: &CosmosMsg,
    ) -> Result<Response, raffle::ContractError> {
        let (contract_addr, msg) = wasm_execute(callback);
        assert_eq!(contract_addr, self.raffle_addr.as_str());
        let msg: raffle::msg::ExecuteMsg = from_json(msg).unwrap();
        raffle::contract::execute(
            self.raffle.as_mut(),
            later_env(),
            message_info(&self.coordinator_addr, &[]),
            msg,
        )
    }

    fn round_info(&self) -> raffle::msg::RoundInfoResponse {
        let res = raffle::contract::query(
            self.raffle.as_ref(),
            later_env(),
            raffle::msg::QueryMsg::RoundInfo {},
        )
        .unwrap();
        from_json(&res).unwrap()
    }
}

// ─── Helpers ───

/// The coordinator's clock sits at drand round 997, so the raffle's three
/// confirmations bind every request to round 1000, the test vector.
fn coordinator_env(address: &Addr) -> Env {
    let mut env = mock_env();
    env.block.time = Timestamp::from_seconds(GENESIS + 2988);
    env.contract.address = address.clone();
    env
}

fn later_env() -> Env {
    let mut env = mock_env();
    env.block.time = env.block.time.plus_seconds(INTERVAL + 1);
    env
}

fn wasm_execute(msg: &CosmosMsg) -> (&str, &Binary) {
    match msg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr, msg, ..
        }) => (contract_addr.as_str(), msg),
        other => panic!("expected wasm execute, got {other:?}"),
    }
}

/// Events as the chain reports them to the caller: `wasm-` prefixed and
/// tagged with the emitting contract.
fn wasm_response(emitter: &Addr, res: &Response) -> SubMsgResponse {
    let events = res
        .events
        .iter()
        .map(|e| {
            Event::new(format!("wasm-{}", e.ty))
                .add_attribute("_contract_address", emitter.to_string())
                .add_attributes(e.attributes.clone())
        })
        .collect();
    #[allow(deprecated)]
    SubMsgResponse {
        events,
        data: None,
        msg_responses: vec![],
    }
}

fn expected_word(request_id: u64) -> cosmwasm_std::Uint256 {
    let randomness = hex::decode(TEST_RANDOMNESS_HEX).unwrap();
    expand_random_words(&randomness, request_id, 1)[0]
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_draw() {
    let mut h = Harness::new();

    let players: Vec<Addr> = ["alice", "bob", "carol", "dave"]
        .iter()
        .map(|name| h.enter(name))
        .collect();
    h.set_pot(4);

    // 1. Draw is due
    let res = raffle::contract::query(
        h.raffle.as_ref(),
        later_env(),
        raffle::msg::QueryMsg::CheckUpkeep {
            check_data: Binary::default(),
        },
    )
    .unwrap();
    let check: raffle::msg::CheckUpkeepResponse = from_json(&res).unwrap();
    assert!(check.upkeep_needed);

    // 2. Upkeep closes the round and records the coordinator's request id
    h.perform_upkeep();
    let info = h.round_info();
    assert_eq!(info.state, RaffleState::Calculating);
    assert_eq!(info.pending_request_id, Some(1));
    assert_eq!(info.num_players, 4);

    // 3. Operator fulfills with a real beacon
    let res = h.fulfill(1);
    assert_eq!(res.messages.len(), 1);
    assert_eq!(res.messages[0].gas_limit, Some(500_000));

    // 4. Callback pays the whole pot to players[word % 4]
    let res = h.relay_callback(&res.messages[0].msg).unwrap();
    let index = raffle::round::winner_index(expected_word(1), players.len()).unwrap();
    let winner = &players[index];

    assert_eq!(res.messages.len(), 1);
    assert_eq!(res.messages[0].reply_on, ReplyOn::Error);
    match &res.messages[0].msg {
        CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
            assert_eq!(to_address, winner.as_str());
            assert_eq!(amount, &coins(4, DENOM));
        }
        other => panic!("expected bank send, got {other:?}"),
    }

    // 5. Round reopened empty with a fresh timestamp
    let info = h.round_info();
    assert_eq!(info.state, RaffleState::Open);
    assert_eq!(info.num_players, 0);
    assert_eq!(info.pending_request_id, None);
    assert_eq!(info.recent_winner.as_ref(), Some(winner));
    assert_eq!(info.last_timestamp, later_env().block.time);
    assert!(info.last_timestamp > mock_env().block.time);
}

#[test]
fn test_replayed_callback_is_rejected() {
    let mut h = Harness::new();
    h.enter("alice");
    h.enter("bob");
    h.set_pot(2);

    h.perform_upkeep();
    let res = h.fulfill(1);
    let callback = res.messages[0].msg.clone();
    h.relay_callback(&callback).unwrap();

    let err = h.relay_callback(&callback).unwrap_err();
    assert!(matches!(
        err,
        raffle::ContractError::InvalidRequest { request_id: 1 }
    ));
}

#[test]
fn test_direct_fulfillment_is_rejected() {
    let mut h = Harness::new();
    h.enter("alice");
    h.set_pot(1);
    h.perform_upkeep();

    let attacker = h.raffle.api.addr_make("attacker");
    let err = raffle::contract::execute(
        h.raffle.as_mut(),
        later_env(),
        message_info(&attacker, &[]),
        raffle::msg::ExecuteMsg::FulfillRandomWords {
            request_id: 1,
            random_words: vec![expected_word(1)],
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        raffle::ContractError::OnlyCoordinatorCanFulfill { .. }
    ));
    assert_eq!(h.round_info().state, RaffleState::Calculating);
}

#[test]
fn test_failed_callback_is_redelivered() {
    let mut h = Harness::new();
    let alice = h.enter("alice");
    h.set_pot(1);
    h.perform_upkeep();

    // Pot drained before the callback lands: the raffle rejects it
    h.set_pot(0);
    let res = h.fulfill(1);
    let err = h.relay_callback(&res.messages[0].msg).unwrap_err();
    assert!(matches!(err, raffle::ContractError::TransferFailed { .. }));
    assert_eq!(h.round_info().state, RaffleState::Calculating);

    // The chain reports the failure to the coordinator
    let failure = Reply {
        id: res.messages[0].id,
        payload: res.messages[0].payload.clone(),
        gas_used: 0,
        result: SubMsgResult::Err(err.to_string()),
    };
    vrf_coordinator::contract::reply(
        h.coordinator.as_mut(),
        coordinator_env(&h.coordinator_addr),
        failure,
    )
    .unwrap();

    // Once funded again the operator re-sends the same words
    h.set_pot(1);
    let operator = h.coordinator.api.addr_make("operator");
    let res = vrf_coordinator::contract::execute(
        h.coordinator.as_mut(),
        coordinator_env(&h.coordinator_addr),
        message_info(&operator, &[]),
        vrf_coordinator::msg::ExecuteMsg::RedeliverRandomWords { request_id: 1 },
    )
    .unwrap();

    let res = h.relay_callback(&res.messages[0].msg).unwrap();
    match &res.messages[0].msg {
        CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
            assert_eq!(to_address, alice.as_str());
            assert_eq!(amount, &coins(1, DENOM));
        }
        other => panic!("expected bank send, got {other:?}"),
    }
    assert_eq!(h.round_info().recent_winner, Some(alice));
}

#[test]
fn test_second_round_uses_next_request_id() {
    let mut h = Harness::new();
    h.enter("alice");
    h.set_pot(1);
    h.perform_upkeep();
    let res = h.fulfill(1);
    h.relay_callback(&res.messages[0].msg).unwrap();

    // The raffle reopened at later_env time, so the next draw needs another interval
    h.enter("bob");
    h.set_pot(1);
    let keeper = h.raffle.api.addr_make("keeper");
    let err = raffle::contract::execute(
        h.raffle.as_mut(),
        later_env(),
        message_info(&keeper, &[]),
        raffle::msg::ExecuteMsg::PerformUpkeep {
            perform_data: Binary::default(),
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        raffle::ContractError::UpkeepNotNeeded { num_players: 1, .. }
    ));

    let mut env = later_env();
    env.block.time = env.block.time.plus_seconds(INTERVAL + 1);
    let res = raffle::contract::execute(
        h.raffle.as_mut(),
        env,
        message_info(&keeper, &[]),
        raffle::msg::ExecuteMsg::PerformUpkeep {
            perform_data: Binary::default(),
        },
    )
    .unwrap();
    let (_, msg) = wasm_execute(&res.messages[0].msg);
    let request: vrf_coordinator::msg::ExecuteMsg = from_json(msg).unwrap();
    let coordinator_res = vrf_coordinator::contract::execute(
        h.coordinator.as_mut(),
        coordinator_env(&h.coordinator_addr),
        message_info(&h.raffle_addr, &[]),
        request,
    )
    .unwrap();
    assert_eq!(coordinator_res.events[0].attributes[0].value, "2");

    let reply = Reply {
        id: res.messages[0].id,
        payload: Binary::default(),
        gas_used: 0,
        result: SubMsgResult::Ok(wasm_response(&h.coordinator_addr, &coordinator_res)),
    };
    raffle::contract::reply(h.raffle.as_mut(), later_env(), reply).unwrap();
    assert_eq!(h.round_info().pending_request_id, Some(2));
}

#[test]
fn test_request_event_from_other_contract_is_ignored() {
    let mut h = Harness::new();
    h.enter("alice");
    h.set_pot(1);

    let keeper = h.raffle.api.addr_make("keeper");
    let res = raffle::contract::execute(
        h.raffle.as_mut(),
        later_env(),
        message_info(&keeper, &[]),
        raffle::msg::ExecuteMsg::PerformUpkeep {
            perform_data: Binary::default(),
        },
    )
    .unwrap();
    let (_, msg) = wasm_execute(&res.messages[0].msg);
    let request: vrf_coordinator::msg::ExecuteMsg = from_json(msg).unwrap();
    let coordinator_res = vrf_coordinator::contract::execute(
        h.coordinator.as_mut(),
        coordinator_env(&h.coordinator_addr),
        message_info(&h.raffle_addr, &[]),
        request,
    )
    .unwrap();

    // Same events, attributed to an impostor
    let impostor = h.raffle.api.addr_make("impostor");
    let reply = Reply {
        id: res.messages[0].id,
        payload: Binary::default(),
        gas_used: 0,
        result: SubMsgResult::Ok(wasm_response(&impostor, &coordinator_res)),
    };
    let err = raffle::contract::reply(h.raffle.as_mut(), later_env(), reply).unwrap_err();
    assert!(matches!(err, raffle::ContractError::MissingRequestId));
}
