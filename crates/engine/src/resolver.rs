//! The position resolution engine.
//!
//! Resolution runs in three phases. First every registered hook is asked for
//! its position definitions (concurrently; a failing hook only loses its own
//! positions). Second the engine walks the token reference graph generation
//! by generation until it closes: every reference is either in the base-token
//! catalog, resolvable by its owning hook into a further app-token
//! definition, or readable from the chain as a plain fungible token. Third
//! the closed set of definitions is sorted into dependency order and resolved
//! one at a time into priced, fully decomposed [`Position`] records, returned
//! in the original definition order.

use std::collections::{HashMap, HashSet};

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use futures::future::join_all;

use hooks_rs_types::{
    AppTokenPosition, AppTokenPositionDefinition, BaseToken, ContractPosition,
    ContractPositionDefinition, DecimalNumber, Position, PositionDefinition, ResolvedTokens,
    Token, TokenId, TokenReference,
};

use crate::catalog::TokenCatalogClient;
use crate::error::{EngineError, Result};
use crate::reader::TokenReader;
use crate::registry::HookRegistry;

/// A definition paired with the app that produced it.
#[derive(Debug)]
struct AppDefinition {
    app_id: String,
    definition: PositionDefinition,
}

impl AppDefinition {
    fn key(&self) -> String {
        self.definition.position_id()
    }
}

/// Outcome of resolving one unknown token reference.
enum ReferenceOutcome {
    /// The owning hook produced an app-token definition for it.
    AppToken(AppDefinition),
    /// It turned out to be a plain fungible token.
    Fungible(Token),
}

/// The closed token reference graph produced by the discovery loop.
struct ClosedGraph {
    /// Position keys in discovery order.
    order: Vec<String>,
    /// Every discovered definition, keyed by position key.
    definitions: HashMap<String, AppDefinition>,
    /// Fungible tokens discovered outside the base catalog.
    unlisted_base_tokens: ResolvedTokens,
}

/// The resolution engine. Construct one per deployment; every
/// [`get_positions`](Self::get_positions) call is independent.
pub struct PositionEngine<R> {
    registry: HookRegistry,
    catalog: TokenCatalogClient,
    reader: R,
}

impl<R: TokenReader> PositionEngine<R> {
    pub fn new(registry: HookRegistry, reader: R) -> Self {
        Self {
            registry,
            catalog: TokenCatalogClient::new(),
            reader,
        }
    }

    /// Use a custom catalog client.
    pub fn with_catalog(mut self, catalog: TokenCatalogClient) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Resolve every position offered by the registered hooks on `network`,
    /// scoped to `address` when one is given. Positions are returned in the
    /// order their definitions were produced.
    pub async fn get_positions(
        &self,
        network: NamedChain,
        address: Option<Address>,
    ) -> Result<Vec<Position>> {
        let mut base_tokens = self.catalog.get_base_tokens().await?;
        base_tokens.retain(|_, token| match token {
            Token::Base(t) => t.network == network,
            Token::App(t) => t.network == network,
        });

        let definitions = self.fetch_definitions(network, address).await;
        self.resolve(address, definitions, base_tokens).await
    }

    /// Fan out to every registered hook. A hook failure is logged and costs
    /// only that hook's positions.
    async fn fetch_definitions(
        &self,
        network: NamedChain,
        address: Option<Address>,
    ) -> Vec<AppDefinition> {
        let fetches = self.registry.iter().map(|(app_id, hook)| async move {
            (app_id, hook.get_position_definitions(network, address).await)
        });

        let mut definitions = Vec::new();
        for (app_id, outcome) in join_all(fetches).await {
            match outcome {
                Ok(defs) => {
                    definitions.extend(defs.into_iter().map(|definition| AppDefinition {
                        app_id: app_id.to_string(),
                        definition,
                    }));
                }
                Err(error) => {
                    tracing::warn!(app_id, %error, "hook failed to list positions, skipping");
                }
            }
        }
        definitions
    }

    async fn resolve(
        &self,
        holder: Option<Address>,
        definitions: Vec<AppDefinition>,
        base_tokens: ResolvedTokens,
    ) -> Result<Vec<Position>> {
        // Original, pre-deduplication order: the output maps back onto this.
        let requested: Vec<String> = definitions.iter().map(AppDefinition::key).collect();

        let graph = self.close_graph(definitions, &base_tokens).await?;
        let sorted = dependency_order(&graph.order, &graph.definitions)?;

        let mut resolved_tokens = base_tokens;
        resolved_tokens.extend(graph.unlisted_base_tokens);

        let mut positions: HashMap<String, Position> = HashMap::with_capacity(sorted.len());
        for key in sorted {
            let entry = &graph.definitions[&key];
            let position = match &entry.definition {
                PositionDefinition::AppToken(d) => {
                    let position = self
                        .resolve_app_token(&entry.app_id, d, holder, &resolved_tokens)
                        .await?;
                    resolved_tokens.insert(
                        position.token_id.clone(),
                        Token::App(Box::new(position.clone())),
                    );
                    Position::AppToken(position)
                }
                PositionDefinition::ContractPosition(d) => Position::Contract(
                    self.resolve_contract_position(&entry.app_id, d, &resolved_tokens)?,
                ),
            };
            positions.insert(key, position);
        }

        let mut output = Vec::with_capacity(requested.len());
        for key in requested {
            match positions.get(&key) {
                Some(position) => output.push(position.clone()),
                None => return Err(EngineError::UnresolvedDefinition { position_id: key }),
            }
        }
        Ok(output)
    }

    /// Breadth-first worklist over the token reference graph. Terminates when
    /// a generation references no unknown tokens.
    async fn close_graph(
        &self,
        definitions: Vec<AppDefinition>,
        base_tokens: &ResolvedTokens,
    ) -> Result<ClosedGraph> {
        let mut order: Vec<String> = Vec::new();
        let mut discovered: HashMap<String, AppDefinition> = HashMap::new();
        // Token ids covered by a discovered app-token definition.
        let mut defined_token_ids: HashSet<TokenId> = HashSet::new();
        let mut unlisted_base_tokens = ResolvedTokens::new();

        let mut generation: Vec<String> = Vec::new();
        let admit = |def: AppDefinition,
                         order: &mut Vec<String>,
                         generation: &mut Vec<String>,
                         defined_token_ids: &mut HashSet<TokenId>,
                         discovered: &mut HashMap<String, AppDefinition>| {
            let key = def.key();
            if discovered.contains_key(&key) {
                return;
            }
            if matches!(def.definition, PositionDefinition::AppToken(_)) {
                defined_token_ids.insert(def.definition.token_id());
            }
            order.push(key.clone());
            generation.push(key.clone());
            discovered.insert(key, def);
        };

        for def in definitions {
            admit(
                def,
                &mut order,
                &mut generation,
                &mut defined_token_ids,
                &mut discovered,
            );
        }

        while !generation.is_empty() {
            let mut pending: Vec<(String, TokenReference)> = Vec::new();
            let mut in_flight: HashSet<TokenId> = HashSet::new();
            for key in &generation {
                let def = &discovered[key];
                for reference in def.definition.tokens() {
                    let id = reference.token_id();
                    let known = base_tokens.contains_key(&id)
                        || unlisted_base_tokens.contains_key(&id)
                        || defined_token_ids.contains(&id);
                    if known || !in_flight.insert(id) {
                        continue;
                    }
                    pending.push((def.app_id.clone(), reference.clone()));
                }
            }
            if pending.is_empty() {
                break;
            }

            let outcomes = join_all(
                pending
                    .iter()
                    .map(|(app_id, reference)| self.resolve_reference(app_id, reference)),
            )
            .await;

            generation = Vec::new();
            for outcome in outcomes {
                match outcome? {
                    ReferenceOutcome::Fungible(token) => {
                        unlisted_base_tokens.insert(token.token_id().clone(), token);
                    }
                    ReferenceOutcome::AppToken(def) => {
                        admit(
                            def,
                            &mut order,
                            &mut generation,
                            &mut defined_token_ids,
                            &mut discovered,
                        );
                    }
                }
            }
        }

        Ok(ClosedGraph {
            order,
            definitions: discovered,
            unlisted_base_tokens,
        })
    }

    /// Resolve one unknown token reference through its owning hook, falling
    /// back to a plain ERC-20 read when the hook does not know the token or
    /// the lookup reverted on-chain.
    async fn resolve_reference(
        &self,
        app_id: &str,
        reference: &TokenReference,
    ) -> Result<ReferenceOutcome> {
        let token_id = reference.token_id();
        let hook = self.registry.get(app_id).ok_or_else(|| EngineError::UnknownApp {
            app_id: app_id.to_string(),
        })?;

        match hook.get_app_token_definition(reference).await {
            Ok(definition) => Ok(ReferenceOutcome::AppToken(AppDefinition {
                app_id: app_id.to_string(),
                definition: PositionDefinition::AppToken(definition),
            })),
            Err(error) if error.is_recoverable() => {
                tracing::debug!(
                    %token_id,
                    app_id,
                    %error,
                    "treating reference as a plain fungible token"
                );
                let metadata = self
                    .reader
                    .metadata(reference.network, reference.address)
                    .await?;
                let price_usd = reference
                    .fallback_price_usd
                    .clone()
                    .unwrap_or_else(DecimalNumber::zero);
                Ok(ReferenceOutcome::Fungible(Token::Base(BaseToken {
                    token_id,
                    network: reference.network,
                    address: Some(reference.address),
                    symbol: metadata.symbol,
                    decimals: metadata.decimals,
                    price_usd,
                    balance: DecimalNumber::zero(),
                    category: None,
                })))
            }
            Err(source) => Err(EngineError::TokenResolution {
                app_id: app_id.to_string(),
                token_id,
                source,
            }),
        }
    }

    async fn resolve_app_token(
        &self,
        app_id: &str,
        definition: &AppTokenPositionDefinition,
        holder: Option<Address>,
        resolved_tokens: &ResolvedTokens,
    ) -> Result<AppTokenPosition> {
        let token_id = definition.token_id();
        let position_id = String::from(token_id.clone());

        let price_per_share =
            definition
                .price_per_share
                .resolve(resolved_tokens)
                .map_err(|e| EngineError::Compute {
                    position_id: position_id.clone(),
                    message: e.to_string(),
                })?;
        if price_per_share.len() != definition.tokens.len() {
            return Err(EngineError::TokenCountMismatch {
                position_id,
                field: "price_per_share",
                expected: definition.tokens.len(),
                actual: price_per_share.len(),
            });
        }

        let mut price_usd = DecimalNumber::zero();
        let mut tokens = Vec::with_capacity(definition.tokens.len());
        for (reference, ratio) in definition.tokens.iter().zip(&price_per_share) {
            let id = reference.token_id();
            let underlying = resolved_tokens
                .get(&id)
                .ok_or(EngineError::MissingResolvedToken { token_id: id })?;
            price_usd += ratio * underlying.price_usd();
            tokens.push(underlying.clone().with_category(reference.category));
        }

        let state = self
            .reader
            .app_token_state(definition.network, definition.address, holder)
            .await?;
        let balance = DecimalNumber::from_raw(state.balance, state.decimals);
        let supply = DecimalNumber::from_raw(state.total_supply, state.decimals);

        // Push the held balance down through the price-per-share chain so
        // every nested token carries its absolute share.
        for (token, ratio) in tokens.iter_mut().zip(&price_per_share) {
            token.distribute_balance(&(&balance * ratio));
        }

        let display = definition
            .display_props
            .resolve(resolved_tokens)
            .map_err(|e| EngineError::Compute {
                position_id: position_id.clone(),
                message: e.to_string(),
            })?;

        Ok(AppTokenPosition {
            position_id,
            token_id,
            app_id: app_id.to_string(),
            network: definition.network,
            address: definition.address,
            symbol: state.symbol,
            decimals: state.decimals,
            price_usd,
            balance,
            supply,
            price_per_share,
            tokens,
            display,
            category: None,
        })
    }

    fn resolve_contract_position(
        &self,
        app_id: &str,
        definition: &ContractPositionDefinition,
        resolved_tokens: &ResolvedTokens,
    ) -> Result<ContractPosition> {
        let position_id = definition.position_id();

        let balances = definition
            .balances
            .resolve(resolved_tokens)
            .map_err(|e| EngineError::Compute {
                position_id: position_id.clone(),
                message: e.to_string(),
            })?;
        if balances.len() != definition.tokens.len() {
            return Err(EngineError::TokenCountMismatch {
                position_id,
                field: "balances",
                expected: definition.tokens.len(),
                actual: balances.len(),
            });
        }

        let mut balance_usd = DecimalNumber::zero();
        let mut tokens = Vec::with_capacity(definition.tokens.len());
        for (reference, amount) in definition.tokens.iter().zip(&balances) {
            let id = reference.token_id();
            let underlying = resolved_tokens
                .get(&id)
                .ok_or(EngineError::MissingResolvedToken { token_id: id })?;
            balance_usd += amount * underlying.price_usd();
            let mut token = underlying.clone().with_category(reference.category);
            token.distribute_balance(amount);
            tokens.push(token);
        }

        let display = definition
            .display_props
            .resolve(resolved_tokens)
            .map_err(|e| EngineError::Compute {
                position_id: position_id.clone(),
                message: e.to_string(),
            })?;

        Ok(ContractPosition {
            position_id,
            token_id: definition.token_id(),
            app_id: app_id.to_string(),
            network: definition.network,
            address: definition.address,
            extra_id: definition.extra_id.clone(),
            balance_usd,
            tokens,
            display,
        })
    }
}

enum Mark {
    Visiting,
    Done,
}

/// Order the closed definition set so that every app token precedes anything
/// that references it. Depth-first over reference edges, stable with respect
/// to discovery order among independent definitions. A back edge means the
/// reference graph has a cycle, which would otherwise never resolve.
fn dependency_order(
    order: &[String],
    definitions: &HashMap<String, AppDefinition>,
) -> Result<Vec<String>> {
    // Token id -> position key of the app-token definition that defines it.
    let mut defined_by: HashMap<TokenId, &str> = HashMap::new();
    for key in order {
        if matches!(definitions[key].definition, PositionDefinition::AppToken(_)) {
            defined_by.insert(definitions[key].definition.token_id(), key);
        }
    }

    let mut marks: HashMap<String, Mark> = HashMap::with_capacity(order.len());
    let mut sorted: Vec<String> = Vec::with_capacity(order.len());
    for key in order {
        visit(key, definitions, &defined_by, &mut marks, &mut sorted)?;
    }
    Ok(sorted)
}

fn visit(
    key: &str,
    definitions: &HashMap<String, AppDefinition>,
    defined_by: &HashMap<TokenId, &str>,
    marks: &mut HashMap<String, Mark>,
    sorted: &mut Vec<String>,
) -> Result<()> {
    match marks.get(key) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            return Err(EngineError::CircularReference {
                token_id: definitions[key].definition.token_id(),
            });
        }
        None => {}
    }
    marks.insert(key.to_string(), Mark::Visiting);
    for reference in definitions[key].definition.tokens() {
        if let Some(dependency) = defined_by.get(&reference.token_id()) {
            visit(dependency, definitions, defined_by, marks, sorted)?;
        }
    }
    marks.insert(key.to_string(), Mark::Done);
    sorted.push(key.to_string());
    Ok(())
}
