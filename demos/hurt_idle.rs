//! # Example: hurt_idle
//!
//! Wires a hub, a couple of gameplay channels and a two-state character.
//!
//! Shows how to:
//! - Declare traced channels through a [`Hub`].
//! - Attach the built-in [`LogWriter`] to print every raise.
//! - Drive a [`StateMachine`] from a host tick loop, with a state that
//!   schedules its own exit.
//!
//! ## Flow
//! ```text
//! tick loop ──► hero.tick() ──► Idle.update()
//!                                   └─ damage queued? ─► enter_state(Hurt)
//! Hurt.enter ──► player_hurt.raise((damage, hp))
//! Hurt.update ── 3 ticks later ──► enter_state(Idle)
//! every raise ──► TraceRecorder ──► LogWriter ──► tracing
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example hurt_idle
//! ```

use std::sync::Arc;

use tickwire::{
    Channel0, Channel2, Config, Hub, LogWriter, State, StateContext, StateId, StateMachine,
};
use tracing_subscriber::EnvFilter;

struct Hero {
    hp: i32,
    incoming: Option<i32>,
    player_hurt: Channel2<i32, i32>,
    recovered: Channel0,
}

struct Idle;

struct Hurt {
    damage: i32,
    frames: u32,
}

impl State<Hero> for Idle {
    fn update(&mut self, cx: &mut StateContext<'_, Hero>) {
        if let Some(damage) = cx.owner_mut().incoming.take() {
            cx.enter_state(Hurt { damage, frames: 0 });
        }
    }
}

impl State<Hero> for Hurt {
    fn enter(&mut self, cx: &mut StateContext<'_, Hero>, previous: Option<StateId>) {
        self.frames = 0;
        let hero = cx.owner_mut();
        hero.hp -= self.damage;
        hero.player_hurt.raise((self.damage, hero.hp));
        tracing::info!(from = ?previous, hp = hero.hp, "hero hurt");
    }

    fn update(&mut self, cx: &mut StateContext<'_, Hero>) {
        self.frames += 1;
        if self.frames == 3 {
            cx.enter_state(Idle);
        }
    }

    fn exit(&mut self, cx: &mut StateContext<'_, Hero>) {
        cx.owner().recovered.raise(());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let hub = Hub::new(Config {
        tracing: true,
        ..Config::default()
    });
    hub.recorder().add_observer(Arc::new(LogWriter::new()));

    let player_hurt: Channel2<i32, i32> =
        hub.channel_with_description("player-hurt", "(damage, remaining hp)");
    let recovered: Channel0 = hub.channel("player-recovered");

    player_hurt.subscribe(|(damage, hp): &(i32, i32)| {
        println!("[hud] -{damage} hp, {hp} left");
    });
    recovered.subscribe(|_: &()| println!("[audio] sigh of relief"));

    let mut hero: StateMachine<Hero> = hub.machine(
        "hero",
        Hero {
            hp: 100,
            incoming: None,
            player_hurt,
            recovered,
        },
    );
    hero.enter_state(Idle)?;

    for frame in 0..12 {
        if frame == 2 || frame == 7 {
            hero.owner_mut().incoming = Some(15);
        }
        hero.tick()?;
    }

    println!(
        "final: hp={} state={:?} transitions={}",
        hero.owner().hp,
        hero.current_id(),
        hero.transitions_made()
    );
    for info in hub.channels() {
        println!("channel {info}: {:?}", info.description);
    }
    Ok(())
}
