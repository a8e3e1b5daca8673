//! Test fixtures and instrumented stores for integration testing

#![allow(dead_code)]

use anyhow::anyhow;
use club_ladder::account::{AccountDirectory, InMemoryAccountStore, Session};
use club_ladder::error::Result;
use club_ladder::rating::{InMemoryPlayerStore, PlayerStore};
use club_ladder::types::{PlayerRecord, Role};
use club_ladder::{LadderService, RatingEngine};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Player store that counts writes and can be told to reject them
#[derive(Debug, Default)]
pub struct RecordingPlayerStore {
    inner: InMemoryPlayerStore,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl RecordingPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful write calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("disk full"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl PlayerStore for RecordingPlayerStore {
    fn get_all(&self) -> Result<Vec<PlayerRecord>> {
        self.inner.get_all()
    }

    fn get(&self, name: &str) -> Result<Option<PlayerRecord>> {
        self.inner.get(name)
    }

    fn upsert(&self, record: PlayerRecord) -> Result<()> {
        self.check_writable()?;
        self.inner.upsert(record)
    }

    fn upsert_many(&self, records: Vec<PlayerRecord>) -> Result<()> {
        self.check_writable()?;
        self.inner.upsert_many(records)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        self.check_writable()?;
        self.inner.delete(name)
    }
}

/// A complete in-memory ladder with an admin and an approved member
pub struct TestLadder {
    pub directory: AccountDirectory,
    pub service: LadderService,
    pub players: Arc<RecordingPlayerStore>,
    pub admin: Session,
    pub member: Session,
}

impl TestLadder {
    pub fn new() -> Self {
        Self::with_engine(RatingEngine::default())
    }

    pub fn with_engine(engine: RatingEngine) -> Self {
        let directory = AccountDirectory::new(Arc::new(InMemoryAccountStore::new()));
        directory
            .bootstrap_admin("admin", "Club Admin", "admin-pw")
            .unwrap();
        let admin = directory.login("admin", "admin-pw").unwrap();

        directory.sign_up("member", "Member", "member-pw").unwrap();
        directory.update_role(&admin, "member", Role::User).unwrap();
        let member = directory.login("member", "member-pw").unwrap();

        let players = Arc::new(RecordingPlayerStore::new());
        let service = LadderService::new(engine, players.clone());

        Self {
            directory,
            service,
            players,
            admin,
            member,
        }
    }

    /// Add ranked players and set their points directly
    pub fn seed(&self, players: &[(&str, i64)]) {
        for (name, points) in players {
            self.players
                .upsert(PlayerRecord::new(*name, *points))
                .unwrap();
        }
    }

    pub fn points_of(&self, name: &str) -> i64 {
        self.players.get(name).unwrap().unwrap().ranking_points
    }

    pub fn player(&self, name: &str) -> PlayerRecord {
        self.players.get(name).unwrap().unwrap()
    }
}

/// Fresh scratch directory for file-backed tests
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "club-ladder-it-{}-{}",
        std::process::id(),
        name
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
