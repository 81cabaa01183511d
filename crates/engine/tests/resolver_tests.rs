//! End-to-end resolution tests against fake hooks, a fake token reader, and
//! a mock catalog server.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use alloy_chains::NamedChain;
use alloy_primitives::{address, Address, U256};
use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use hooks_rs_contracts::{AppTokenState, Erc20Metadata};
use hooks_rs_engine::{
    AppHook, AppInfo, CatalogConfig, EngineError, HookError, HookRegistry, PositionEngine,
    TokenCatalogClient, TokenReader,
};
use hooks_rs_types::{
    AppTokenPositionDefinition, ContractPositionDefinition, DecimalNumber, DisplayProps,
    MaybeComputed, Position, PositionDefinition, Token, TokenCategory, TokenReference,
};

const CUSD: Address = address!("765de816845861e75a25fca122bb6898b8b1282a");
const CEUR: Address = address!("d8763cba276a3738e6de85b4b3bf5fded6d6ca73");
const POOL: Address = address!("1111111111111111111111111111111111111111");
const FARM: Address = address!("2222222222222222222222222222222222222222");
const REWARD: Address = address!("3333333333333333333333333333333333333333");
const VAULT: Address = address!("4444444444444444444444444444444444444444");
const HOLDER: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");

fn dec(s: &str) -> DecimalNumber {
    DecimalNumber::from_str(s).unwrap()
}

fn raw(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(18u64))
}

#[derive(Default)]
struct FakeReader {
    metadata: HashMap<Address, Erc20Metadata>,
    states: HashMap<Address, AppTokenState>,
}

impl FakeReader {
    fn with_metadata(mut self, token: Address, symbol: &str, decimals: u8) -> Self {
        self.metadata.insert(
            token,
            Erc20Metadata {
                symbol: symbol.to_string(),
                decimals,
            },
        );
        self
    }

    fn with_state(mut self, token: Address, symbol: &str, balance: U256, supply: U256) -> Self {
        self.states.insert(
            token,
            AppTokenState {
                balance,
                total_supply: supply,
                symbol: symbol.to_string(),
                decimals: 18,
            },
        );
        self
    }
}

#[async_trait]
impl TokenReader for FakeReader {
    async fn metadata(
        &self,
        network: NamedChain,
        token: Address,
    ) -> hooks_rs_engine::Result<Erc20Metadata> {
        self.metadata
            .get(&token)
            .cloned()
            .ok_or(EngineError::UnsupportedNetwork { network })
    }

    async fn app_token_state(
        &self,
        network: NamedChain,
        token: Address,
        holder: Option<Address>,
    ) -> hooks_rs_engine::Result<AppTokenState> {
        let mut state = self
            .states
            .get(&token)
            .cloned()
            .ok_or(EngineError::UnsupportedNetwork { network })?;
        if holder.is_none() {
            state.balance = U256::ZERO;
        }
        Ok(state)
    }
}

type DefinitionsFn = Box<dyn Fn() -> Result<Vec<PositionDefinition>, HookError> + Send + Sync>;
type AppTokenFn =
    Box<dyn Fn(Address) -> Result<AppTokenPositionDefinition, HookError> + Send + Sync>;

struct FakeHook {
    app_id: &'static str,
    definitions: DefinitionsFn,
    app_token: Option<AppTokenFn>,
}

impl FakeHook {
    fn new(
        app_id: &'static str,
        definitions: impl Fn() -> Result<Vec<PositionDefinition>, HookError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            app_id,
            definitions: Box::new(definitions),
            app_token: None,
        }
    }

    fn with_app_token(
        mut self,
        f: impl Fn(Address) -> Result<AppTokenPositionDefinition, HookError> + Send + Sync + 'static,
    ) -> Self {
        self.app_token = Some(Box::new(f));
        self
    }
}

#[async_trait]
impl AppHook for FakeHook {
    fn info(&self) -> AppInfo {
        AppInfo::new(self.app_id, self.app_id, "fake hook")
    }

    async fn get_position_definitions(
        &self,
        _network: NamedChain,
        _address: Option<Address>,
    ) -> Result<Vec<PositionDefinition>, HookError> {
        (self.definitions)()
    }

    async fn get_app_token_definition(
        &self,
        reference: &TokenReference,
    ) -> Result<AppTokenPositionDefinition, HookError> {
        match &self.app_token {
            Some(f) => f(reference.address),
            None => Err(HookError::UnknownAppToken {
                token_id: reference.token_id(),
            }),
        }
    }
}

/// Catalog with cUSD at $1 and cEUR at $0.50.
fn catalog_body() -> serde_json::Value {
    json!({
        "cusd": {
            "network": "celo",
            "address": format!("{CUSD:#x}"),
            "symbol": "cUSD",
            "decimals": 18,
            "priceUsd": "1"
        },
        "ceur": {
            "network": "celo",
            "address": format!("{CEUR:#x}"),
            "symbol": "cEUR",
            "decimals": 18,
            "priceUsd": "0.5"
        }
    })
}

async fn build_engine(
    hooks: Vec<Arc<dyn AppHook>>,
    reader: FakeReader,
) -> (MockServer, PositionEngine<FakeReader>) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .mount(&server)
        .await;

    let mut registry = HookRegistry::new();
    for hook in hooks {
        registry.register(hook);
    }
    let catalog =
        TokenCatalogClient::with_config(CatalogConfig::new().with_url(server.uri().parse().unwrap()));
    let engine = PositionEngine::new(registry, reader).with_catalog(catalog);
    (server, engine)
}

/// Two-asset pool: pricePerShare [2, 3] over cUSD ($1) and cEUR ($0.50).
fn pool_definition() -> PositionDefinition {
    PositionDefinition::AppToken(AppTokenPositionDefinition {
        network: NamedChain::Celo,
        address: POOL,
        tokens: vec![
            TokenReference::new(NamedChain::Celo, CUSD),
            TokenReference::new(NamedChain::Celo, CEUR),
        ],
        price_per_share: vec![dec("2"), dec("3")].into(),
        display_props: DisplayProps::new("cUSD / cEUR pool", "Two-asset pool").into(),
    })
}

fn farm_definition() -> PositionDefinition {
    PositionDefinition::ContractPosition(ContractPositionDefinition {
        network: NamedChain::Celo,
        address: FARM,
        extra_id: None,
        tokens: vec![
            TokenReference::new(NamedChain::Celo, CUSD),
            TokenReference::new(NamedChain::Celo, CEUR).with_category(TokenCategory::Claimable),
        ],
        balances: vec![dec("1.5"), dec("2")].into(),
        display_props: DisplayProps::new("Farm", "Staked farm").into(),
    })
}

#[tokio::test]
async fn test_app_token_position_prices_from_catalog() {
    let hook = Arc::new(FakeHook::new("pool-app", || Ok(vec![pool_definition()])));
    let reader = FakeReader::default().with_state(POOL, "PLP", raw(2), raw(100));
    let (_server, engine) = build_engine(vec![hook], reader).await;

    let positions = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap();

    assert_eq!(positions.len(), 1);
    let Position::AppToken(pool) = &positions[0] else {
        panic!("expected an app token position")
    };
    // 2 × $1 + 3 × $0.50
    assert_eq!(pool.price_usd, dec("3.5"));
    assert_eq!(pool.symbol, "PLP");
    assert_eq!(pool.balance, dec("2"));
    assert_eq!(pool.supply, dec("100"));
    assert_eq!(pool.balance_usd(), dec("7"));
    assert_eq!(pool.tokens[0].balance(), &dec("4"));
    assert_eq!(pool.tokens[1].balance(), &dec("6"));
}

#[tokio::test]
async fn test_contract_position_sums_balances() {
    let hook = Arc::new(FakeHook::new("farm-app", || Ok(vec![farm_definition()])));
    let (_server, engine) = build_engine(vec![hook], FakeReader::default()).await;

    let positions = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap();

    let Position::Contract(farm) = &positions[0] else {
        panic!("expected a contract position")
    };
    // 1.5 × $1 + 2 × $0.50
    assert_eq!(farm.balance_usd, dec("2.5"));
    assert_eq!(farm.tokens[0].balance(), &dec("1.5"));
    assert_eq!(farm.tokens[0].category(), None);
    assert_eq!(farm.tokens[1].category(), Some(TokenCategory::Claimable));
}

#[tokio::test]
async fn test_extra_id_distinguishes_positions_on_one_address() {
    let hook = Arc::new(FakeHook::new("pool-app", || {
        Ok(vec![
            pool_definition(),
            PositionDefinition::ContractPosition(ContractPositionDefinition {
                network: NamedChain::Celo,
                address: POOL,
                extra_id: Some("rewards".to_string()),
                tokens: vec![TokenReference::new(NamedChain::Celo, CUSD)],
                balances: vec![dec("1")].into(),
                display_props: DisplayProps::new("Pool rewards", "Claimable rewards").into(),
            }),
        ])
    }));
    let reader = FakeReader::default().with_state(POOL, "PLP", raw(2), raw(100));
    let (_server, engine) = build_engine(vec![hook], reader).await;

    let positions = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap();

    assert_eq!(positions.len(), 2);
    assert_eq!(
        positions[1].position_id(),
        format!("{}:rewards", positions[0].position_id())
    );
}

#[tokio::test]
async fn test_intermediary_app_token_resolves_through_hook() {
    let hook = Arc::new(
        FakeHook::new("nested-app", || {
            Ok(vec![PositionDefinition::AppToken(
                AppTokenPositionDefinition {
                    network: NamedChain::Celo,
                    address: FARM,
                    tokens: vec![TokenReference::new(NamedChain::Celo, POOL)],
                    price_per_share: vec![dec("2")].into(),
                    display_props: DisplayProps::new("Farm", "Auto-compounding farm").into(),
                },
            )])
        })
        .with_app_token(|address| {
            assert_eq!(address, POOL);
            Ok(AppTokenPositionDefinition {
                network: NamedChain::Celo,
                address: POOL,
                tokens: vec![TokenReference::new(NamedChain::Celo, CUSD)],
                price_per_share: vec![dec("4")].into(),
                display_props: DisplayProps::new("Pool", "Single-asset pool").into(),
            })
        }),
    );
    let reader = FakeReader::default()
        .with_state(FARM, "FARM", raw(10), raw(1000))
        .with_state(POOL, "PLP", U256::ZERO, raw(1000));
    let (_server, engine) = build_engine(vec![hook], reader).await;

    let positions = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap();

    // Only the directly-defined position comes back; the intermediary pool
    // token resolves as a dependency.
    assert_eq!(positions.len(), 1);
    let Position::AppToken(farm) = &positions[0] else {
        panic!("expected an app token position")
    };
    // 2 × (4 × $1)
    assert_eq!(farm.price_usd, dec("8"));
    assert_eq!(farm.balance, dec("10"));
    let Token::App(pool) = &farm.tokens[0] else {
        panic!("expected a nested app token")
    };
    assert_eq!(pool.balance, dec("20"));
    assert_eq!(pool.tokens[0].balance(), &dec("80"));
}

#[tokio::test]
async fn test_three_level_price_per_share_chain() {
    // vault -> farm -> pool -> cUSD, each level only discoverable from the
    // previous one, so closing the graph takes one generation per level.
    let hook = Arc::new(
        FakeHook::new("stacked-app", || {
            Ok(vec![PositionDefinition::AppToken(
                AppTokenPositionDefinition {
                    network: NamedChain::Celo,
                    address: VAULT,
                    tokens: vec![TokenReference::new(NamedChain::Celo, FARM)],
                    price_per_share: vec![dec("2")].into(),
                    display_props: DisplayProps::new("Vault", "Vault over a farm").into(),
                },
            )])
        })
        .with_app_token(|address| {
            let (underlying, ratio, title) = if address == FARM {
                (POOL, dec("3"), "Farm")
            } else {
                assert_eq!(address, POOL);
                (CUSD, dec("5"), "Pool")
            };
            Ok(AppTokenPositionDefinition {
                network: NamedChain::Celo,
                address,
                tokens: vec![TokenReference::new(NamedChain::Celo, underlying)],
                price_per_share: vec![ratio].into(),
                display_props: DisplayProps::new(title, title).into(),
            })
        }),
    );
    let reader = FakeReader::default()
        .with_state(VAULT, "VLT", raw(2), raw(50))
        .with_state(FARM, "FARM", U256::ZERO, raw(500))
        .with_state(POOL, "PLP", U256::ZERO, raw(5000));
    let (_server, engine) = build_engine(vec![hook], reader).await;

    let positions = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap();

    // The farm and pool tokens only appear as dependencies.
    assert_eq!(positions.len(), 1);
    let Position::AppToken(vault) = &positions[0] else {
        panic!("expected an app token position")
    };
    // 2 × 3 × 5 × $1 through the chain.
    assert_eq!(vault.price_usd, dec("30"));
    assert_eq!(vault.balance, dec("2"));
    let Token::App(farm) = &vault.tokens[0] else {
        panic!("expected a nested farm token")
    };
    assert_eq!(farm.price_usd, dec("15"));
    assert_eq!(farm.balance, dec("4"));
    let Token::App(pool) = &farm.tokens[0] else {
        panic!("expected a nested pool token")
    };
    assert_eq!(pool.price_usd, dec("5"));
    assert_eq!(pool.balance, dec("12"));
    assert_eq!(pool.tokens[0].balance(), &dec("60"));
}

#[tokio::test]
async fn test_unknown_reference_falls_back_to_erc20_read() {
    let hook = Arc::new(FakeHook::new("reward-app", || {
        Ok(vec![PositionDefinition::AppToken(
            AppTokenPositionDefinition {
                network: NamedChain::Celo,
                address: POOL,
                tokens: vec![TokenReference::new(NamedChain::Celo, REWARD)
                    .with_fallback_price_usd(dec("0.25"))],
                price_per_share: vec![dec("1")].into(),
                display_props: DisplayProps::new("Reward pool", "Pool").into(),
            },
        )])
    }));
    let reader = FakeReader::default()
        .with_metadata(REWARD, "RWD", 18)
        .with_state(POOL, "PLP", raw(4), raw(100));
    let (_server, engine) = build_engine(vec![hook], reader).await;

    let positions = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap();

    let Position::AppToken(pool) = &positions[0] else {
        panic!("expected an app token position")
    };
    assert_eq!(pool.price_usd, dec("0.25"));
    let Token::Base(reward) = &pool.tokens[0] else {
        panic!("fallback tokens resolve as base tokens")
    };
    assert_eq!(reward.symbol, "RWD");
}

#[tokio::test]
async fn test_fatal_token_resolution_error_aborts() {
    let hook = Arc::new(
        FakeHook::new("broken-app", || {
            Ok(vec![PositionDefinition::AppToken(
                AppTokenPositionDefinition {
                    network: NamedChain::Celo,
                    address: POOL,
                    tokens: vec![TokenReference::new(NamedChain::Celo, REWARD)],
                    price_per_share: vec![dec("1")].into(),
                    display_props: DisplayProps::new("Pool", "Pool").into(),
                },
            )])
        })
        .with_app_token(|_| Err(HookError::Message("provider exploded".to_string()))),
    );
    let (_server, engine) = build_engine(vec![hook], FakeReader::default()).await;

    let error = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap_err();
    assert!(matches!(error, EngineError::TokenResolution { .. }));
}

#[tokio::test]
async fn test_failing_hook_only_loses_its_own_positions() {
    let good = Arc::new(FakeHook::new("a-good", || Ok(vec![farm_definition()])));
    let bad = Arc::new(FakeHook::new("b-bad", || {
        Err(HookError::Message("rate limited".to_string()))
    }));
    let (_server, engine) = build_engine(vec![good, bad], FakeReader::default()).await;

    let positions = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap();

    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].app_id(), "a-good");
}

#[tokio::test]
async fn test_circular_reference_is_rejected() {
    let hook = Arc::new(
        FakeHook::new("cyclic-app", || {
            Ok(vec![PositionDefinition::AppToken(
                AppTokenPositionDefinition {
                    network: NamedChain::Celo,
                    address: POOL,
                    tokens: vec![TokenReference::new(NamedChain::Celo, FARM)],
                    price_per_share: vec![dec("1")].into(),
                    display_props: DisplayProps::new("Pool", "Pool").into(),
                },
            )])
        })
        .with_app_token(|address| {
            let underlying = if address == FARM { POOL } else { FARM };
            Ok(AppTokenPositionDefinition {
                network: NamedChain::Celo,
                address,
                tokens: vec![TokenReference::new(NamedChain::Celo, underlying)],
                price_per_share: vec![dec("1")].into(),
                display_props: DisplayProps::new("Loop", "Loop").into(),
            })
        }),
    );
    let (_server, engine) = build_engine(vec![hook], FakeReader::default()).await;

    let error = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap_err();
    assert!(matches!(error, EngineError::CircularReference { .. }));
}

#[tokio::test]
async fn test_duplicate_definitions_collapse_to_one_resolution() {
    let hook = Arc::new(FakeHook::new("dup-app", || {
        Ok(vec![pool_definition(), pool_definition()])
    }));
    let reader = FakeReader::default().with_state(POOL, "PLP", raw(2), raw(100));
    let (_server, engine) = build_engine(vec![hook], reader).await;

    let positions = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap();

    // Both input definitions map back to the same resolved record.
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0], positions[1]);
}

#[tokio::test]
async fn test_output_preserves_definition_order() {
    let pool_hook = Arc::new(FakeHook::new("z-pool", || Ok(vec![pool_definition()])));
    let farm_hook = Arc::new(FakeHook::new("a-farm", || Ok(vec![farm_definition()])));
    let reader = FakeReader::default().with_state(POOL, "PLP", raw(2), raw(100));
    let (_server, engine) = build_engine(vec![pool_hook, farm_hook], reader).await;

    let positions = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap();

    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].app_id(), "a-farm");
    assert_eq!(positions[1].app_id(), "z-pool");
}

#[tokio::test]
async fn test_without_holder_balances_are_zero() {
    let hook = Arc::new(FakeHook::new("pool-app", || Ok(vec![pool_definition()])));
    let reader = FakeReader::default().with_state(POOL, "PLP", raw(2), raw(100));
    let (_server, engine) = build_engine(vec![hook], reader).await;

    let positions = engine.get_positions(NamedChain::Celo, None).await.unwrap();

    let Position::AppToken(pool) = &positions[0] else {
        panic!("expected an app token position")
    };
    assert!(pool.balance.is_zero());
    assert_eq!(pool.price_usd, dec("3.5"));
}

#[tokio::test]
async fn test_computed_price_per_share_sees_resolved_tokens() {
    let hook = Arc::new(FakeHook::new("computed-app", || {
        Ok(vec![PositionDefinition::AppToken(
            AppTokenPositionDefinition {
                network: NamedChain::Celo,
                address: POOL,
                tokens: vec![TokenReference::new(NamedChain::Celo, CUSD)],
                price_per_share: MaybeComputed::computed(|tokens| {
                    let cusd = tokens
                        .get("celo:0x765de816845861e75a25fca122bb6898b8b1282a")
                        .ok_or("cUSD not resolved")?;
                    Ok(vec![cusd.price_usd().clone() + DecimalNumber::from(1u64)])
                }),
                display_props: DisplayProps::new("Pool", "Pool").into(),
            },
        )])
    }));
    let reader = FakeReader::default().with_state(POOL, "PLP", raw(1), raw(100));
    let (_server, engine) = build_engine(vec![hook], reader).await;

    let positions = engine
        .get_positions(NamedChain::Celo, Some(HOLDER))
        .await
        .unwrap();

    let Position::AppToken(pool) = &positions[0] else {
        panic!("expected an app token position")
    };
    // (1 + $1) × $1
    assert_eq!(pool.price_usd, dec("2"));
    assert_eq!(pool.price_per_share, vec![dec("2")]);
}
