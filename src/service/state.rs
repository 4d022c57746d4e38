//! 服務狀態管理
//!
//! 每個玩家一個可設定種子的 RNG session；同一玩家的開包透過 map entry 鎖依序進行。
//! session 數量有上限，滿了就淘汰最久沒用的那一個。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use tracing::debug;

use crate::game::{open_pack, stable_string_hash, Card, CardCatalog};

/// 預設 session 上限
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// 服務錯誤
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("unknown pack id {0}")]
    UnknownPack(u32),
    #[error("unknown card id {0}")]
    UnknownCard(u32),
}

struct Session {
    rng: StdRng,
    last_used: u64,
}

/// 服務狀態
pub struct ServiceState {
    catalog: Arc<CardCatalog>,
    sessions: DashMap<String, Session>,
    max_sessions: usize,
    clock: AtomicU64,
    base_seed: u64,
}

impl ServiceState {
    pub fn new(catalog: Arc<CardCatalog>, base_seed: u64) -> Self {
        Self::with_session_limit(catalog, base_seed, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_session_limit(catalog: Arc<CardCatalog>, base_seed: u64, max_sessions: usize) -> Self {
        Self {
            catalog,
            sessions: DashMap::new(),
            max_sessions: max_sessions.max(1),
            clock: AtomicU64::new(0),
            base_seed,
        }
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn has_session(&self, player_id: &str) -> bool {
        self.sessions.contains_key(player_id)
    }

    /// 玩家第一次開包時使用的種子
    pub fn session_seed(&self, player_id: &str) -> u64 {
        self.base_seed ^ u64::from(stable_string_hash(player_id) as u32)
    }

    /// 以指定種子重置玩家 session
    pub fn reset(&self, player_id: &str, seed: u64) {
        self.make_room_for(player_id);
        let session = Session {
            rng: StdRng::seed_from_u64(seed),
            last_used: self.tick(),
        };
        self.sessions.insert(player_id.to_string(), session);
    }

    pub fn card(&self, type_id: u32) -> Result<&Card, ServiceError> {
        self.catalog
            .card(type_id)
            .ok_or(ServiceError::UnknownCard(type_id))
    }

    /// 開一包，回傳抽到的卡（每個有結果的欄位一張）
    pub fn open_pack(&self, player_id: &str, pack_id: u32) -> Result<Vec<Card>, ServiceError> {
        let pack = self
            .catalog
            .pack(pack_id)
            .ok_or(ServiceError::UnknownPack(pack_id))?;

        self.make_room_for(player_id);
        let now = self.tick();
        let mut session = self
            .sessions
            .entry(player_id.to_string())
            .or_insert_with(|| Session {
                rng: StdRng::seed_from_u64(self.session_seed(player_id)),
                last_used: now,
            });
        session.last_used = now;

        let cards: Vec<Card> = open_pack(&self.catalog, pack, &mut session.rng)
            .into_iter()
            .cloned()
            .collect();

        debug!(player = player_id, pack = %pack.name, drawn = cards.len(), "pack opened");
        Ok(cards)
    }

    /// 連續開 `count` 包
    pub fn open_packs(
        &self,
        player_id: &str,
        pack_id: u32,
        count: usize,
    ) -> Result<Vec<Vec<Card>>, ServiceError> {
        (0..count)
            .map(|_| self.open_pack(player_id, pack_id))
            .collect()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// 新玩家加入前，若已滿則淘汰最久沒用的 session
    ///
    /// 必須在持有任何 entry 鎖之前呼叫。
    fn make_room_for(&self, player_id: &str) {
        if self.sessions.contains_key(player_id) {
            return;
        }
        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.value().last_used)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    debug!(player = %key, "session evicted");
                    self.sessions.remove(&key);
                }
                None => break,
            }
        }
    }
}
