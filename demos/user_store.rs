//! # Example: user_store
//!
//! A small in-memory user table driven through bridges, the way a screen
//! would drive storage calls.
//!
//! Demonstrates how to:
//! - Run one-shot writes with [`EffectFn`] inside a [`Scope`].
//! - Look rows up with [`SingleFn`] (missing row is an error) and [`MaybeFn`]
//!   (missing row is `Completed`).
//! - Watch the table with a [`StreamFn`] hosted by a [`LiveOutcome`] and stop
//!   the watch by stopping the host.
//!
//! ## Flow
//! ```text
//! scope.launch(EffectFn insert) ──► Completed | Failed(UNIQUE constraint)
//! scope.launch(SingleFn by id)  ──► Value(user) | Failed(no rows)
//! scope.launch(MaybeFn by id)   ──► Value(user) | Completed
//!
//! LiveOutcome(StreamFn users).start()
//!     ├─► Value(snapshot) on every table change
//!     └─► stop() ─► Deactivated ─► Cancelled (stream dropped)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example user_store
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::stream;
use livebridge::{
    Bridge, Config, Context, EffectFn, Handlers, LiveOutcome, MaybeFn, ProducerError, Scope,
    SingleFn, StreamFn,
};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
struct User {
    id: u32,
    name: String,
}

/// In-memory table with a change feed.
struct UserDao {
    rows: Mutex<BTreeMap<u32, User>>,
    changes: watch::Sender<u64>,
}

impl UserDao {
    fn new() -> Arc<Self> {
        let (changes, _) = watch::channel(0);
        Arc::new(Self {
            rows: Mutex::new(BTreeMap::new()),
            changes,
        })
    }

    fn rows(&self) -> std::sync::MutexGuard<'_, BTreeMap<u32, User>> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn insert(&self, user: User) -> Result<(), ProducerError> {
        {
            let mut rows = self.rows();
            if rows.contains_key(&user.id) {
                return Err(ProducerError::fail("UNIQUE constraint failed: users.id"));
            }
            rows.insert(user.id, user);
        }
        self.changes.send_modify(|v| *v += 1);
        Ok(())
    }

    fn update(&self, user: User) -> Result<(), ProducerError> {
        self.rows().insert(user.id, user);
        self.changes.send_modify(|v| *v += 1);
        Ok(())
    }

    fn delete(&self, id: u32) -> Result<(), ProducerError> {
        self.rows().remove(&id);
        self.changes.send_modify(|v| *v += 1);
        Ok(())
    }

    fn find(&self, id: u32) -> Option<User> {
        self.rows().get(&id).cloned()
    }

    fn all(&self) -> Vec<User> {
        self.rows().values().cloned().collect()
    }
}

/// Screen-level facade: every call returns immediately, results arrive through handlers.
struct UserScreen {
    dao: Arc<UserDao>,
    scope: Scope,
}

impl UserScreen {
    fn insert(&self, id: u32, name: &str) {
        let dao = Arc::clone(&self.dao);
        let user = User {
            id,
            name: name.to_string(),
        };
        self.scope.launch(
            EffectFn::from_fn(move || dao.insert(user.clone())),
            Handlers::completable(move || println!("[insert {id}] ok"))
                .on_error(move |e| println!("[insert {id}] {e}")),
        );
    }

    fn rename(&self, id: u32, name: &str) {
        let dao = Arc::clone(&self.dao);
        let user = User {
            id,
            name: name.to_string(),
        };
        self.scope.launch(
            EffectFn::from_fn(move || dao.update(user.clone())),
            Handlers::completable(move || println!("[rename {id}] ok")),
        );
    }

    fn delete(&self, id: u32) {
        let dao = Arc::clone(&self.dao);
        self.scope.launch(
            EffectFn::from_fn(move || dao.delete(id)),
            Handlers::completable(move || println!("[delete {id}] ok")),
        );
    }

    fn show_single(&self, id: u32) {
        let dao = Arc::clone(&self.dao);
        self.scope.launch(
            SingleFn::from_fn(move || {
                dao.find(id)
                    .ok_or_else(|| ProducerError::fail(format!("no row with id {id}")))
            }),
            Handlers::single(|u: &User| println!("[single] {u:?}"))
                .on_error(|e| println!("[single] {e}")),
        );
    }

    fn show_maybe(&self, id: u32) {
        let dao = Arc::clone(&self.dao);
        self.scope.launch(
            MaybeFn::from_fn(move || Ok(dao.find(id))),
            Handlers::maybe(
                |u: &User| println!("[maybe] {u:?}"),
                move || println!("[maybe] no user {id}"),
            ),
        );
    }

    /// Host that lists users on every table change while started.
    fn users(&self, cfg: Config) -> Arc<LiveOutcome<Vec<User>>> {
        let dao = Arc::clone(&self.dao);
        let watch_users = StreamFn::from_stream(move || {
            let dao = Arc::clone(&dao);
            let rx = dao.changes.subscribe();
            stream::unfold((dao, rx, true), |(dao, mut rx, first)| async move {
                if !first && rx.changed().await.is_err() {
                    return None;
                }
                let rows = dao.all();
                Some((Ok(rows), (dao, rx, false)))
            })
        });

        let host = LiveOutcome::new(Bridge::new(watch_users, cfg.named("users")));
        host.observe(Handlers::stream(|users: &Vec<User>| {
            let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
            println!("[users] {names:?}");
        }));
        host
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::on(Context::try_current()?);
    let screen = UserScreen {
        dao: UserDao::new(),
        scope: Scope::new(cfg.clone()),
    };

    let users = screen.users(cfg);
    users.start();
    settle().await;

    screen.insert(1, "ada");
    settle().await;
    screen.insert(1, "ada again");
    screen.insert(2, "grace");
    settle().await;

    screen.show_single(1);
    screen.show_single(7);
    screen.show_maybe(2);
    screen.show_maybe(7);
    settle().await;

    screen.rename(2, "grace hopper");
    settle().await;

    // Stopping the host cancels the watch; this delete is not reported by it.
    users.stop();
    screen.delete(1);
    settle().await;

    let latest = users.latest().map(|s| s.version()).unwrap_or_default();
    println!("[users] stopped at version {latest}");

    screen.scope.clear();
    Ok(())
}
