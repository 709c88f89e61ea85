use std::time::Duration;

use coffer_engine::Engine;
use coffer_primitives::{UserId, ViewId};
use coffer_registry::{AnimationSpec, Menu, MenuFile};
use pretty_assertions::assert_eq;

use crate::common::{RecordingHost, engine};

/// Shop frames advance every 2 ticks at 20 ticks per second.
const FRAME: Duration = Duration::from_millis(100);

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn caption_cycles_and_wraps() {
	let (engine, host) = engine();
	let user = UserId::random();
	engine.open_menu(user, "shop").unwrap();

	tokio::time::sleep(FRAME * 3 + FRAME / 2).await;
	assert_eq!(host.titles(user), vec!["Shop.", "Shop..", "Shop"]);
	assert_eq!(engine.scheduler().frame_index(user), Some(0));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn closing_the_view_stops_frames() {
	let (engine, host) = engine();
	let user = UserId::random();
	let view = engine.open_menu(user, "shop").unwrap();

	tokio::time::sleep(FRAME + FRAME / 2).await;
	engine.on_view_close(user, view);
	assert!(!engine.scheduler().is_animating(user));

	tokio::time::sleep(FRAME * 5).await;
	assert_eq!(host.titles(user), vec!["Shop."]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn stale_close_does_not_stop_reopened_menu() {
	let (engine, host) = engine();
	let user = UserId::random();
	let old = engine.open_menu(user, "shop").unwrap();
	let new = engine.open_menu(user, "shop").unwrap();

	engine.on_view_close(user, old);
	assert!(engine.scheduler().is_animating(user));
	assert_eq!(engine.current_view(user).unwrap().id, new);

	tokio::time::sleep(FRAME + FRAME / 2).await;
	assert_eq!(host.titles(user), vec!["Shop."]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn unnotified_disconnect_self_heals() {
	let (engine, host) = engine();
	let user = UserId::random();
	engine.open_menu(user, "shop").unwrap();

	tokio::time::sleep(FRAME + FRAME / 2).await;
	host.set_offline(user);
	tokio::time::sleep(FRAME).await;

	assert!(!engine.scheduler().is_animating(user));
	assert_eq!(host.titles(user), vec!["Shop."]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn disconnect_forgets_view_and_session() {
	let (engine, host) = engine();
	let user = UserId::random();
	let other = UserId::random();
	engine.open_menu(user, "shop").unwrap();
	engine.open_menu(other, "shop").unwrap();

	engine.on_disconnect(user);
	engine.on_disconnect(user);
	assert!(engine.current_view(user).is_none());
	assert_eq!(engine.scheduler().active_sessions(), 1);

	tokio::time::sleep(FRAME * 2 + FRAME / 2).await;
	assert!(host.titles(user).is_empty());
	assert_eq!(host.titles(other), vec!["Shop.", "Shop.."]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn users_animate_independently() {
	let (engine, host) = engine();
	let early = UserId::random();
	let late = UserId::random();

	engine.open_menu(early, "shop").unwrap();
	tokio::time::sleep(FRAME + FRAME / 2).await;
	engine.open_menu(late, "shop").unwrap();
	tokio::time::sleep(FRAME).await;

	assert_eq!(host.titles(early), vec!["Shop.", "Shop.."]);
	assert_eq!(host.titles(late), vec!["Shop."]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn single_frame_menu_never_animates() {
	let (engine, host) = engine();
	let user = UserId::random();
	let file = MenuFile::from_toml_str(
		r#"
		[menus.still]
		animation = { frames = ["Only"], interval_ticks = 1 }
		"#,
	)
	.unwrap();
	engine.load_menus(file).unwrap();

	engine.open_menu(user, "still").unwrap();
	assert!(!engine.scheduler().is_animating(user));
	tokio::time::sleep(Duration::from_secs(1)).await;
	assert!(host.titles(user).is_empty());
}

/// Parks an open of `late_menu` inside the host, opens "shop" to completion, then lets
/// the parked open finish. Returns the shop view.
fn open_shop_past_parked_open(engine: &Engine, host: &RecordingHost, user: UserId, late_menu: &str) -> ViewId {
	let (entered, release) = host.hold_next_open();
	let runtime = tokio::runtime::Handle::current();

	std::thread::scope(|scope| {
		let parked = scope.spawn(|| {
			let _guard = runtime.enter();
			engine.open_menu(user, late_menu).unwrap()
		});
		entered.recv().unwrap();
		let shop = engine.open_menu(user, "shop").unwrap();
		release.send(()).unwrap();

		let parked = parked.join().unwrap();
		assert_ne!(parked, shop);
		shop
	})
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn parked_animated_open_leaves_current_view_animating() {
	let (engine, host) = engine();
	let banner = Menu::builder("banner")
		.title("B1")
		.animation(AnimationSpec::new(["B1", "B2"], 1))
		.build()
		.unwrap();
	engine.registry().register(banner).unwrap();
	let user = UserId::random();

	let shop = open_shop_past_parked_open(&engine, &host, user, "banner");
	assert_eq!(engine.current_view(user).unwrap().id, shop);
	assert_eq!(engine.scheduler().animated_view(user), Some(shop));

	tokio::time::sleep(FRAME * 2 + FRAME / 2).await;
	assert!(engine.scheduler().is_animating(user));
	assert_eq!(host.titles(user), vec!["Shop.", "Shop.."]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn parked_plain_open_does_not_stop_current_animation() {
	let (engine, host) = engine();
	let user = UserId::random();

	let shop = open_shop_past_parked_open(&engine, &host, user, "vault");
	assert_eq!(engine.scheduler().animated_view(user), Some(shop));

	tokio::time::sleep(FRAME + FRAME / 2).await;
	assert_eq!(host.titles(user), vec!["Shop."]);
}
