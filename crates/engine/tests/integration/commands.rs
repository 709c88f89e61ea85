use coffer_engine::{CommandOutcome, CommandSender};
use coffer_primitives::UserId;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::{Event, engine, sword};

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn menu_command_resolves_alias() {
	let (engine, host) = engine();
	let user = UserId::random();
	host.grant(user, "coffer.menu");

	let outcome = engine.execute_command(CommandSender::User(user), "/menu STORE");
	let CommandOutcome::Opened { menu, view } = outcome else {
		panic!("expected the shop to open, got {outcome:?}");
	};
	assert_eq!(menu, "shop");
	assert_eq!(
		host.events(),
		vec![Event::Opened {
			user,
			view,
			menu: "shop".into()
		}]
	);
	assert!(engine.scheduler().is_animating(user));
}

#[test]
fn unknown_menu_echoes_name() {
	let (engine, host) = engine();
	let user = UserId::random();
	host.grant(user, "coffer.menu");

	let outcome = engine.execute_command(CommandSender::User(user), "menu nowhere");
	assert_eq!(outcome, CommandOutcome::MenuNotFound { name: "nowhere".into() });
	assert_eq!(host.messages(user), vec!["Menu 'nowhere' not found."]);
}

#[rstest]
#[case::menu("menu shop")]
#[case::storage("storage")]
fn console_cannot_open_views(#[case] line: &str) {
	let (engine, host) = engine();
	assert_eq!(engine.execute_command(CommandSender::Console, line), CommandOutcome::UsersOnly);
	assert!(host.events().is_empty());
}

#[rstest]
#[case::menu("menu shop")]
#[case::storage("storage")]
fn permission_is_required(#[case] line: &str) {
	let (engine, host) = engine();
	let user = UserId::random();

	assert_eq!(engine.execute_command(CommandSender::User(user), line), CommandOutcome::NoPermission);
	assert_eq!(host.messages(user), vec!["You do not have permission to do that."]);
	assert!(engine.current_view(user).is_none());
}

#[test]
fn menu_without_name_prints_usage() {
	let (engine, host) = engine();
	let user = UserId::random();
	host.grant(user, "coffer.menu");

	assert_eq!(engine.execute_command(CommandSender::User(user), "menu"), CommandOutcome::Usage);
	assert_eq!(host.messages(user), vec!["Usage: /menu <name>"]);
}

#[test]
fn storage_lists_holdings() {
	let (engine, host) = engine();
	let user = UserId::random();
	host.grant(user, "coffer.storage");
	engine.ledger().set_quantity(user, &sword(), 2).unwrap();

	assert_eq!(engine.execute_command(CommandSender::User(user), "storage"), CommandOutcome::StorageOpened);
	assert_eq!(host.events(), vec![Event::Storage(user, 1)]);
}

#[test]
fn foreign_commands_are_not_handled() {
	let (engine, host) = engine();
	let user = UserId::random();
	assert_eq!(engine.execute_command(CommandSender::User(user), "spawn"), CommandOutcome::Unknown);
	assert_eq!(engine.execute_command(CommandSender::User(user), "   "), CommandOutcome::Unknown);
	assert!(host.events().is_empty());
}
