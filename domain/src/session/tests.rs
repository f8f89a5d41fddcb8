use std::time::Duration;

use crate::*;

#[derive(Default, Clone)]
struct ExpectedSession {
    balance: Option<i64>,
    quantities: Vec<(usize, u32)>,
    elapsed: Option<u64>,
    phase: Option<SessionPhase>,
}

fn session() -> ExpectedSession {
    ExpectedSession::default()
}

impl ExpectedSession {
    fn balance(
        mut self,
        balance: i64,
    ) -> Self {
        self.balance = Some(balance);
        self
    }

    fn qty(
        mut self,
        item_idx: usize,
        quantity: u32,
    ) -> Self {
        self.quantities.push((item_idx, quantity));
        self
    }

    fn elapsed(
        mut self,
        seconds: u64,
    ) -> Self {
        self.elapsed = Some(seconds);
        self
    }

    fn phase(
        mut self,
        phase: SessionPhase,
    ) -> Self {
        self.phase = Some(phase);
        self
    }
}

struct TestHarness {
    state: SessionState,
    launch_effects: Vec<SessionEffect>,
    last_result: Result<Vec<SessionEffect>, SessionError>,
}

impl TestHarness {
    fn new(
        net_worth: i64,
        prices: &[i64],
    ) -> Self {
        let catalog = Catalog::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, &price)| CatalogItem::new(format!("Item {i}"), price, ImageRef::new(format!("item_{i}"))))
                .collect(),
        );
        let persona = Persona::new("Tester", net_worth, ImageRef::new("tester"));
        let (state, launch_effects) = SessionState::launch(persona, catalog, test_config());
        Self {
            state,
            launch_effects,
            last_result: Ok(vec![]),
        }
    }

    fn buy(
        &mut self,
        item_idx: usize,
    ) -> &mut Self {
        self.last_result = self.state.process_action(SessionAction::Buy(ItemId(item_idx)));
        self
    }

    fn sell(
        &mut self,
        item_idx: usize,
    ) -> &mut Self {
        self.last_result = self.state.process_action(SessionAction::Sell(ItemId(item_idx)));
        self
    }

    fn tick(&mut self) -> &mut Self {
        self.last_result = self.state.process_action(SessionAction::Tick);
        self
    }

    fn exit(&mut self) -> &mut Self {
        self.last_result = self.state.process_action(SessionAction::Exit);
        self
    }

    #[track_caller]
    fn check(
        &self,
        expected: ExpectedSession,
    ) -> &Self {
        if let Some(balance) = expected.balance {
            assert_eq!(self.state.balance, balance, "expected balance {}", balance);
        }
        for (item_idx, quantity) in expected.quantities {
            let actual = self.state.purchases.quantity(ItemId(item_idx));
            assert_eq!(actual, quantity, "item {}: expected quantity {}", item_idx, quantity);
        }
        if let Some(elapsed) = expected.elapsed {
            assert_eq!(self.state.elapsed_seconds, elapsed, "expected {}s elapsed", elapsed);
        }
        if let Some(phase) = expected.phase {
            assert_eq!(self.state.phase, phase, "expected phase {:?}", phase);
        }
        self
    }

    #[track_caller]
    fn check_ok(&self) -> &Self {
        assert!(self.last_result.is_ok(), "expected Ok, got {:?}", self.last_result);
        self
    }

    #[track_caller]
    fn check_err(
        &self,
        expected: SessionError,
    ) -> &Self {
        match &self.last_result {
            Err(err) => assert_eq!(*err, expected),
            Ok(effects) => panic!("expected {:?}, got Ok({:?})", expected, effects),
        }
        self
    }

    #[track_caller]
    fn check_invariant(&self) -> &Self {
        let net_worth = self.state.persona().net_worth;
        assert_eq!(
            self.state.balance + self.state.spent(),
            net_worth,
            "balance {} + spent {} != net worth {}",
            self.state.balance,
            self.state.spent(),
            net_worth
        );
        self
    }

    fn completions(effects: &[SessionEffect]) -> Vec<SessionSummary> {
        effects
            .iter()
            .filter_map(|e| match e {
                SessionEffect::Complete(summary) => Some(summary.clone()),
                _ => None,
            })
            .collect()
    }

    fn last_completions(&self) -> Vec<SessionSummary> {
        Self::completions(self.last_result.as_deref().unwrap_or(&[]))
    }

    #[track_caller]
    fn check_schedules_tick(
        &self,
        effects: &[SessionEffect],
    ) -> &Self {
        let found = effects
            .iter()
            .any(|e| matches!(e, SessionEffect::ScheduleTick { delay } if *delay == Duration::from_secs(1)));
        assert!(found, "expected a ScheduleTick effect in {:?}", effects);
        self
    }
}

fn test_config() -> SessionConfig {
    SessionConfig {
        tick_interval: Duration::from_secs(1),
    }
}

#[test]
fn test_buy_sell_scenario() {
    let mut t = TestHarness::new(100, &[60]);

    t.buy(0);
    t.check_ok().check(session().balance(40).qty(0, 1));

    // 40 < 60: rejected, nothing changes
    t.buy(0);
    t.check_err(SessionError::InsufficientFunds {
        available: 40,
        required: 60,
    })
    .check(session().balance(40).qty(0, 1).phase(SessionPhase::Active));

    t.sell(0);
    t.check_ok().check(session().balance(100).qty(0, 0));
}

#[test]
fn test_sell_without_stock_is_noop() {
    let mut t = TestHarness::new(100, &[60, 10]);

    t.sell(1);
    t.check_err(SessionError::NothingToSell { item_id: ItemId(1) })
        .check(session().balance(100).qty(1, 0));
}

#[test]
fn test_zero_net_worth_finishes_immediately() {
    let t = TestHarness::new(0, &[60]);

    t.check(session().phase(SessionPhase::Finished).elapsed(0));
    let completions = TestHarness::completions(&t.launch_effects);
    assert_eq!(completions.len(), 1);
    assert!(completions[0].purchased_items.is_empty());
    assert_eq!(completions[0].elapsed_seconds, 0);
    assert!(
        !t.launch_effects.iter().any(|e| matches!(e, SessionEffect::ScheduleTick { .. })),
        "a finished session must not start its timer"
    );
}

#[test]
fn test_launch_schedules_first_tick() {
    let t = TestHarness::new(100, &[60]);
    t.check(session().phase(SessionPhase::Active))
        .check_schedules_tick(&t.launch_effects);
    assert!(TestHarness::completions(&t.launch_effects).is_empty());
}

#[test]
fn test_spending_to_zero_completes_once() {
    let mut t = TestHarness::new(100, &[60, 40]);

    t.buy(0).check_ok();
    assert!(t.last_completions().is_empty());

    t.buy(1).check_ok().check(session().balance(0).phase(SessionPhase::Finished));
    let completions = t.last_completions();
    assert_eq!(completions.len(), 1);

    // Observing the spent balance again must not produce a second record
    assert!(t.state.settle().is_empty());
    assert!(t.state.settle().is_empty());
}

#[test]
fn test_finished_session_rejects_intents() {
    let mut t = TestHarness::new(60, &[60]);
    t.buy(0).check_ok().check(session().phase(SessionPhase::Finished));

    t.sell(0);
    t.check_err(SessionError::InvalidPhase {
        action: "Sell",
        phase: SessionPhase::Finished,
    })
    .check(session().balance(0).qty(0, 1));

    t.buy(0);
    t.check_err(SessionError::InvalidPhase {
        action: "Buy",
        phase: SessionPhase::Finished,
    });
}

#[test]
fn test_tick_counts_and_reschedules() {
    let mut t = TestHarness::new(100, &[60]);

    t.tick().check_ok();
    let effects = t.last_result.clone().unwrap();
    t.check_schedules_tick(&effects);
    t.tick().tick().check(session().elapsed(3).balance(100));
}

#[test]
fn test_tick_stops_after_finish() {
    let mut t = TestHarness::new(60, &[60]);
    t.tick().tick();
    t.buy(0).check_ok();

    t.tick();
    t.check_err(SessionError::InvalidPhase {
        action: "Tick",
        phase: SessionPhase::Finished,
    })
    .check(session().elapsed(2));
}

#[test]
fn test_summary_lists_purchases_in_catalog_order() {
    let mut t = TestHarness::new(100, &[10, 30, 50]);
    t.buy(2).buy(0).buy(0).tick();
    t.buy(1).check_ok();

    let completions = t.last_completions();
    let summary = completions.first().expect("session should have completed");
    let lines: Vec<(&str, u32)> = summary
        .purchased_items
        .iter()
        .map(|p| (p.name.as_str(), p.quantity))
        .collect();
    assert_eq!(lines, vec![("Item 0", 2), ("Item 1", 1), ("Item 2", 1)]);
    assert_eq!(summary.elapsed_seconds, 1);
    assert_eq!(summary.persona_name, "Tester");
}

#[test]
fn test_exit_abandons_without_completion() {
    let mut t = TestHarness::new(100, &[60]);
    t.buy(0);
    t.exit().check_ok().check(session().phase(SessionPhase::Abandoned));
    assert!(t.last_completions().is_empty());
    assert!(t.state.settle().is_empty());

    t.tick();
    t.check_err(SessionError::InvalidPhase {
        action: "Tick",
        phase: SessionPhase::Abandoned,
    });
}

#[test]
fn test_unknown_item_rejected() {
    let mut t = TestHarness::new(100, &[60]);
    t.buy(7);
    t.check_err(SessionError::UnknownItem(ItemId(7)))
        .check(session().balance(100));
}

#[test]
fn test_balance_plus_holdings_is_invariant() {
    let prices = [1, 7, 13, 40, 95];
    let mut t = TestHarness::new(500, &prices);

    // Deterministic LCG so the sequence is reproducible
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
    for _ in 0..2_000 {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let item = ((seed >> 33) % prices.len() as u64) as usize;
        if (seed >> 17) % 3 == 0 {
            t.sell(item);
        } else {
            t.buy(item);
        }
        t.check_invariant();
        assert!(t.state.balance >= 0);
        if t.state.phase != SessionPhase::Active {
            break;
        }
    }
}

#[test]
fn test_snapshot_reflects_state() {
    let mut t = TestHarness::new(1_000, &[250]);
    t.buy(0).buy(0).tick();

    let snapshot = t.state.snapshot();
    assert_eq!(snapshot.balance, 500);
    assert_eq!(snapshot.balance_display, "$500");
    assert_eq!(snapshot.elapsed_seconds, 1);
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].quantity, 2);
    assert_eq!(snapshot.phase, SessionPhase::Active);
}
