use std::sync::Arc;

use coffer_engine::{ClickKind, DispatchOutcome};
use coffer_ledger::Placeholder;
use coffer_primitives::{ItemIdentity, UserId};
use coffer_registry::{Action, ActionFailed, Menu, MenuItem, SlotIndex};
use pretty_assertions::assert_eq;

use crate::common::{Event, emerald, engine, sword};

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn purchase_consumes_and_gives() {
	let (engine, host) = engine();
	let user = UserId::random();
	engine.ledger().set_quantity(user, &emerald(), 7).unwrap();
	let view = engine.open_menu(user, "shop").unwrap();

	let outcome = engine.on_click(user, view, SlotIndex(13), ClickKind::Left);

	assert_eq!(outcome, DispatchOutcome::Completed { actions: 2 });
	assert_eq!(engine.ledger().get_quantity(user, &emerald()), 2);
	assert_eq!(engine.ledger().get_quantity(user, &sword()), 1);
	assert_eq!(engine.placeholder(Some(user), "amt_nexo-custom-sword"), Placeholder::Value("1".into()));
	assert!(host.messages(user).is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn failed_requirement_runs_deny_actions_only() {
	let (engine, host) = engine();
	let user = UserId::random();
	engine.ledger().set_quantity(user, &emerald(), 4).unwrap();
	let view = engine.open_menu(user, "shop").unwrap();

	let outcome = engine.on_click(user, view, SlotIndex(13), ClickKind::Left);

	assert_eq!(
		outcome,
		DispatchOutcome::Denied {
			index: 0,
			requirement: "item"
		}
	);
	assert_eq!(engine.ledger().get_quantity(user, &emerald()), 4);
	assert_eq!(engine.ledger().get_quantity(user, &sword()), 0);
	assert_eq!(host.messages(user), vec!["Need 5 emeralds"]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn failing_action_stops_without_rollback() {
	let (engine, host) = engine();
	let user = UserId::random();
	engine.ledger().set_quantity(user, &emerald(), 3).unwrap();
	let view = engine.open_menu(user, "shop").unwrap();

	let outcome = engine.on_click(user, view, SlotIndex(14), ClickKind::Left);

	assert_eq!(
		outcome,
		DispatchOutcome::Failed {
			index: 1,
			action: "open_menu",
			error: ActionFailed::MenuNotFound { name: "ghost".into() },
		}
	);
	assert_eq!(engine.ledger().get_quantity(user, &emerald()), 2);
	assert_eq!(engine.ledger().get_quantity(user, &ItemIdentity::vanilla("diamond").unwrap()), 0);
	assert_eq!(host.messages(user), vec!["Something went wrong, nothing further was done."]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn insufficient_consume_reports_quantities() {
	let (engine, _host) = engine();
	let user = UserId::random();
	let menu = Menu::builder("drain")
		.size(9)
		.item(
			[0],
			MenuItem::new("take").action(Action::Consume {
				item: emerald(),
				amount: 10,
			}),
		)
		.build()
		.unwrap();
	engine.ledger().set_quantity(user, &emerald(), 3).unwrap();
	let view = engine.open(user, Arc::new(menu));

	let outcome = engine.on_click(user, view, SlotIndex(0), ClickKind::Left);
	assert_eq!(
		outcome,
		DispatchOutcome::Failed {
			index: 0,
			action: "consume",
			error: ActionFailed::Insufficient {
				item: emerald(),
				needed: 10,
				held: 3
			},
		}
	);
	assert_eq!(engine.ledger().get_quantity(user, &emerald()), 3);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn open_menu_action_switches_view_and_stops_animation() {
	let (engine, host) = engine();
	let user = UserId::random();
	host.grant(user, "shop.vip");
	let shop = engine.open_menu(user, "shop").unwrap();
	assert!(engine.scheduler().is_animating(user));

	let outcome = engine.on_click(user, shop, SlotIndex(15), ClickKind::Left);

	assert_eq!(outcome, DispatchOutcome::Completed { actions: 1 });
	let vault = engine.current_view(user).unwrap();
	assert_eq!(vault.menu.id(), "vault");
	assert!(!engine.scheduler().is_animating(user));

	let outcome = engine.on_click(user, vault.id, SlotIndex(0), ClickKind::Left);
	assert_eq!(outcome, DispatchOutcome::Completed { actions: 1 });
	assert!(host.events().contains(&Event::Storage(user, 0)));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn close_and_command_actions_reach_host() {
	let (engine, host) = engine();
	let user = UserId::random();
	let view = engine.open_menu(user, "shop").unwrap();

	engine.on_click(user, view, SlotIndex(16), ClickKind::Left);
	assert!(host.events().contains(&Event::Command(user, "spawn".into())));

	engine.on_click(user, view, SlotIndex(26), ClickKind::Left);
	assert!(host.events().contains(&Event::Closed(user)));
	assert!(engine.current_view(user).is_none());
	assert!(!engine.scheduler().is_animating(user));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn clicks_on_stale_or_empty_slots_are_ignored() {
	let (engine, _host) = engine();
	let user = UserId::random();
	engine.ledger().set_quantity(user, &emerald(), 50).unwrap();

	let first = engine.open_menu(user, "shop").unwrap();
	let second = engine.open_menu(user, "store").unwrap();
	assert_eq!(engine.on_click(user, first, SlotIndex(13), ClickKind::Left), DispatchOutcome::Ignored);
	assert_eq!(engine.on_click(user, second, SlotIndex(0), ClickKind::Left), DispatchOutcome::Ignored);
	assert_eq!(engine.ledger().get_quantity(user, &emerald()), 50);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn open_view_keeps_replaced_menu_snapshot() {
	let (engine, _host) = engine();
	let user = UserId::random();
	engine.ledger().set_quantity(user, &emerald(), 5).unwrap();
	let view = engine.open_menu(user, "shop").unwrap();

	let previous = engine.registry().replace(Menu::builder("shop").title("Closed for stocktake").build().unwrap());
	assert!(previous.is_some());
	assert!(engine.registry().lookup_by_id("shop").unwrap().item_at(SlotIndex(13)).is_none());

	let outcome = engine.on_click(user, view, SlotIndex(13), ClickKind::Left);
	assert_eq!(outcome, DispatchOutcome::Completed { actions: 2 });
	assert_eq!(engine.ledger().get_quantity(user, &sword()), 1);
}
