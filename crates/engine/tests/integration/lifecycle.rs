use std::sync::Arc;
use std::time::Duration;

use coffer_engine::{EngineConfig, EngineError, Host};
use coffer_ledger::{JsonFileStore, Placeholder};
use coffer_primitives::UserId;
use coffer_registry::{Menu, MenuFile, RegistryError};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::{RecordingHost, emerald, engine, sword};

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn shutdown_stops_every_session_first() {
	let (engine, host) = engine();
	let users: Vec<UserId> = (0..3).map(|_| UserId::random()).collect();
	for user in &users {
		engine.open_menu(*user, "shop").unwrap();
	}
	assert_eq!(engine.scheduler().active_sessions(), 3);

	engine.shutdown();
	host.clear();

	tokio::time::sleep(Duration::from_secs(2)).await;
	assert!(host.events().is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn reload_stops_sessions_and_swaps_menus() {
	let (engine, host) = engine();
	let user = UserId::random();
	let view = engine.open_menu(user, "shop").unwrap();

	let count = engine
		.reload(vec![Menu::builder("fresh").alias("new").build().unwrap()])
		.unwrap();

	assert_eq!(count, 1);
	assert_eq!(engine.scheduler().active_sessions(), 0);
	assert!(engine.registry().resolve("shop").is_none());
	assert_eq!(engine.registry().resolve("new").unwrap().id(), "fresh");
	assert_eq!(engine.current_view(user).unwrap().id, view);

	tokio::time::sleep(Duration::from_secs(1)).await;
	assert!(host.titles(user).is_empty());
}

#[test]
fn duplicate_menu_ids_are_rejected() {
	let (engine, _host) = engine();
	engine.registry().register(Menu::builder("solo").build().unwrap()).unwrap();

	let err = engine.registry().register(Menu::builder("SOLO").build().unwrap()).unwrap_err();
	assert_eq!(err, RegistryError::DuplicateMenuId { id: "SOLO".into() });

	let err = engine
		.reload(vec![Menu::builder("a").build().unwrap(), Menu::builder("a").build().unwrap()])
		.unwrap_err();
	assert!(matches!(err, EngineError::Registry(RegistryError::DuplicateMenuId { .. })));
	assert!(engine.registry().lookup_by_id("solo").is_some());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn rejected_reload_keeps_animations_running() {
	let (engine, host) = engine();
	let user = UserId::random();
	engine.open_menu(user, "shop").unwrap();

	let err = engine
		.reload(vec![Menu::builder("dup").build().unwrap(), Menu::builder("dup").build().unwrap()])
		.unwrap_err();
	assert!(matches!(err, EngineError::Registry(RegistryError::DuplicateMenuId { .. })));
	assert!(engine.scheduler().is_animating(user));
	assert!(engine.registry().lookup_by_id("shop").is_some());

	tokio::time::sleep(Duration::from_millis(150)).await;
	assert_eq!(host.titles(user), vec!["Shop."]);
}

#[test]
fn invalid_menu_file_is_reported() {
	let (engine, _host) = engine();
	let file = MenuFile::from_toml_str("[menus.bad.items.x]\nslot = 60\nsize = 9\n");
	assert!(file.is_err());

	let file = MenuFile::from_toml_str("[menus.bad]\nsize = 9\n[menus.bad.items.x]\nslot = 60\n").unwrap();
	assert!(matches!(engine.load_menus(file), Err(EngineError::Menu(_))));
	assert_eq!(engine.registry().len(), 2);
}

#[rstest]
#[case::custom_prefixed("amt_nexo-custom-sword", Some("3"))]
#[case::vanilla_missing("amt_minecraft-diamond", Some("0"))]
#[case::unknown_vanilla("amt_unknown-token-xyz", Some("0"))]
#[case::bare_prefers_custom("amt_custom-sword", Some("3"))]
#[case::vanilla_held("amt_minecraft-emerald", Some("12"))]
#[case::foreign_family("player_name", None)]
fn placeholders_end_to_end(#[case] token: &str, #[case] expected: Option<&str>) {
	let (engine, _host) = engine();
	let user = UserId::random();
	engine.ledger().set_quantity(user, &sword(), 3).unwrap();
	engine.ledger().set_quantity(user, &emerald(), 12).unwrap();

	let answer = engine.placeholder(Some(user), token);
	assert_eq!(answer.as_value(), expected);
	if expected.is_none() {
		assert_eq!(answer, Placeholder::Unhandled);
	}
}

#[test]
fn placeholder_without_user_is_empty() {
	let (engine, _host) = engine();
	assert_eq!(engine.placeholder(None, "amt_minecraft-diamond"), Placeholder::Value(String::new()));
}

#[test]
fn extra_materials_extend_vanilla_catalog() {
	let host: Arc<dyn Host> = Arc::new(RecordingHost::default());
	let config = EngineConfig::from_toml_str("extra_materials = [\"void_shard\"]").unwrap();
	let engine = coffer_engine::Engine::builder(host).config(config).build();
	let user = UserId::random();
	engine
		.ledger()
		.set_quantity(user, &coffer_primitives::ItemIdentity::vanilla("void_shard").unwrap(), 4)
		.unwrap();

	assert_eq!(engine.placeholder(Some(user), "amt_void-shard").as_value(), Some("4"));
}

#[test]
fn ledger_round_trips_through_store() {
	let dir = tempfile::tempdir().unwrap();
	let store = JsonFileStore::new(dir.path());
	let user = UserId::random();

	let (engine, _host) = engine();
	engine.ledger().set_quantity(user, &sword(), 9).unwrap();
	engine.save_user(&store, user).unwrap();
	engine.shutdown();

	let (engine, _host) = crate::common::engine();
	engine.load_user(&store, user).unwrap();
	assert_eq!(engine.ledger().get_quantity(user, &sword()), 9);
	assert_eq!(engine.placeholder(Some(user), "amt_custom-sword").as_value(), Some("9"));
}
