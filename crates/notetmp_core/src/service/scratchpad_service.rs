//! Scratchpad state manager.
//!
//! # Responsibility
//! - Own the in-memory note text and the stamp of its last successful save.
//! - Debounce commits to the key-value store (trailing edge, cancel-and-restart).
//! - Purge expired or malformed records on load.
//! - Keep a remaining-time label fresh through a periodic countdown.
//!
//! # Invariants
//! - `content()` always returns the latest text passed to `update_content`.
//! - At most one commit per idle period; it persists only the latest text.
//! - A failed commit stays pending until a later commit succeeds.
//! - This manager is the only writer of the note key.
//! - The countdown never writes, except for the opt-in live expiry purge.
//! - After `shutdown`, `tick` fires nothing.

use crate::clock::Clock;
use crate::config::{ConfigError, ScratchpadConfig};
use crate::expiry::{self, EXPIRED_LABEL};
use crate::model::note::{NoteRecord, NoteState, TextStats};
use crate::store::{delete_quietly, read_record, write_record, KeyValueStore, RecordRead};
use crate::timer::{DebounceTimer, IntervalTimer};
use log::{debug, info, warn};

const LOG_MODULE: &str = "scratchpad";

/// Stamp of the record currently persisted for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SaveStamp {
    saved_at: i64,
    ttl_hours: u32,
}

/// What a single `tick` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// A debounced commit was attempted.
    pub committed: bool,
    /// The remaining-time label was recomputed by the countdown.
    pub countdown_refreshed: bool,
    /// Live expiry discarded the content during this tick.
    pub expired: bool,
}

/// Core scratchpad state machine.
pub struct ScratchpadManager<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    config: ScratchpadConfig,
    content: String,
    saved: Option<SaveStamp>,
    state: NoteState,
    time_remaining: String,
    debounce: DebounceTimer,
    countdown: IntervalTimer,
    storage_notice: Option<String>,
    shut_down: bool,
}

impl<S: KeyValueStore, C: Clock> ScratchpadManager<S, C> {
    /// Restores the scratchpad from `store`, enforcing expiry.
    ///
    /// Absent, malformed and expired records all yield empty content; the
    /// latter two are deleted from the store.
    ///
    /// # Errors
    /// - Returns an error only when `config` is invalid. Storage failures
    ///   degrade to an empty scratchpad with a storage notice.
    pub fn load(store: S, clock: C, config: ScratchpadConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let now = clock.now_ms();

        let mut manager = Self {
            debounce: DebounceTimer::new(config.debounce),
            countdown: IntervalTimer::new(config.countdown_interval),
            store,
            clock,
            config,
            content: String::new(),
            saved: None,
            state: NoteState::Empty,
            time_remaining: String::new(),
            storage_notice: None,
            shut_down: false,
        };

        manager.restore(now);
        manager.countdown.start(now);
        manager.refresh_time_remaining(now);
        Ok(manager)
    }

    fn restore(&mut self, now: i64) {
        let key = self.config.note_key.as_str();
        let record = match read_record::<NoteRecord, _>(&self.store, key) {
            Ok(RecordRead::Found(record)) => record,
            Ok(RecordRead::Absent) => {
                info!("event=note_load module={LOG_MODULE} status=ok outcome=absent");
                return;
            }
            Ok(RecordRead::Malformed(reason)) => {
                warn!(
                    "event=note_load module={LOG_MODULE} status=recovered outcome=malformed error={reason}"
                );
                delete_quietly(&self.store, key, LOG_MODULE);
                return;
            }
            Err(err) => {
                warn!("event=note_load module={LOG_MODULE} status=error error={err}");
                self.storage_notice = Some(format!("Saved notes could not be read: {err}"));
                return;
            }
        };

        if let Err(err) = record.validate() {
            warn!(
                "event=note_load module={LOG_MODULE} status=recovered outcome=malformed error={err}"
            );
            delete_quietly(&self.store, key, LOG_MODULE);
            return;
        }

        if expiry::is_expired(record.saved_at, record.ttl_hours, now) {
            info!(
                "event=note_load module={LOG_MODULE} status=ok outcome=expired saved_at={}",
                record.saved_at
            );
            delete_quietly(&self.store, key, LOG_MODULE);
            self.state = NoteState::Expired;
            return;
        }

        info!(
            "event=note_load module={LOG_MODULE} status=ok outcome=restored chars={} saved_at={}",
            record.content.chars().count(),
            record.saved_at
        );
        self.saved = Some(SaveStamp {
            saved_at: record.saved_at,
            ttl_hours: record.ttl_hours,
        });
        self.content = record.content;
        self.state = NoteState::Saved;
    }

    /// Replaces the text immediately and (re)starts the debounce window.
    pub fn update_content(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.state = NoteState::Dirty;
        if !self.shut_down {
            self.debounce.schedule(self.clock.now_ms());
        }
    }

    /// Runs due timers. Hosts call this from their event loop.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.shut_down {
            return outcome;
        }

        let now = self.clock.now_ms();
        if self.debounce.take_due(now) {
            self.commit(now);
            outcome.committed = true;
        }

        if self.countdown.take_due(now) {
            if self.config.live_expiry && self.expire_if_due(now) {
                outcome.expired = true;
            }
            self.refresh_time_remaining(now);
            outcome.countdown_refreshed = true;
        }

        outcome
    }

    /// Commits a pending write right away. Returns whether one was pending.
    pub fn flush(&mut self) -> bool {
        if !self.debounce.is_pending() {
            return false;
        }
        self.debounce.cancel();
        let now = self.clock.now_ms();
        self.commit(now);
        true
    }

    /// Drops any pending commit, deletes the stored note and empties the
    /// buffer. Safe to call repeatedly.
    pub fn clear_notes(&mut self) {
        self.debounce.cancel();
        match self.store.delete(&self.config.note_key) {
            Ok(()) => {
                self.storage_notice = None;
                info!("event=note_clear module={LOG_MODULE} status=ok");
            }
            Err(err) => {
                warn!("event=note_clear module={LOG_MODULE} status=error error={err}");
                self.storage_notice = Some(format!("Saved notes could not be removed: {err}"));
            }
        }
        self.content.clear();
        self.saved = None;
        self.state = NoteState::Cleared;
        self.time_remaining.clear();
    }

    /// Cancels both timers. No write happens after this call unless the
    /// host explicitly calls `flush` or `clear_notes`.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        let dropped_pending = self.debounce.is_pending();
        self.debounce.cancel();
        self.countdown.cancel();
        self.shut_down = true;
        info!(
            "event=scratchpad_shutdown module={LOG_MODULE} status=ok dropped_pending={dropped_pending}"
        );
    }

    fn commit(&mut self, now: i64) {
        let record = NoteRecord::new(self.content.as_str(), now, self.config.ttl_hours);
        match write_record(&self.store, &self.config.note_key, &record) {
            Ok(()) => {
                debug!(
                    "event=note_commit module={LOG_MODULE} status=ok chars={} saved_at={now}",
                    record.content.chars().count()
                );
                self.saved = Some(SaveStamp {
                    saved_at: now,
                    ttl_hours: record.ttl_hours,
                });
                self.state = NoteState::Saved;
                self.storage_notice = None;
                self.refresh_time_remaining(now);
            }
            Err(err) => {
                warn!("event=note_commit module={LOG_MODULE} status=error error={err}");
                self.storage_notice = Some(format!("Notes could not be saved: {err}"));
                // Keep the text owed to the store so the next tick or flush retries.
                self.debounce.schedule(now);
            }
        }
    }

    fn expire_if_due(&mut self, now: i64) -> bool {
        let Some(stamp) = self.saved else {
            return false;
        };
        // Unsaved edits are newer than the stamp; their commit renews the TTL.
        if self.debounce.is_pending() || !expiry::is_expired(stamp.saved_at, stamp.ttl_hours, now)
        {
            return false;
        }

        info!(
            "event=note_expire module={LOG_MODULE} status=ok saved_at={}",
            stamp.saved_at
        );
        delete_quietly(&self.store, &self.config.note_key, LOG_MODULE);
        self.content.clear();
        self.saved = None;
        self.state = NoteState::Expired;
        true
    }

    fn refresh_time_remaining(&mut self, now: i64) {
        self.time_remaining = match self.saved {
            Some(stamp) => expiry::remaining(stamp.saved_at, stamp.ttl_hours, now),
            None if self.state == NoteState::Expired => EXPIRED_LABEL.to_string(),
            None => String::new(),
        };
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    /// Epoch ms of the last successful save, if the current session has one.
    pub fn saved_at(&self) -> Option<i64> {
        self.saved.map(|stamp| stamp.saved_at)
    }

    /// Epoch ms at which the saved content expires.
    pub fn expires_at(&self) -> Option<i64> {
        self.saved
            .map(|stamp| expiry::expires_at(stamp.saved_at, stamp.ttl_hours))
    }

    /// Label as of the last commit/countdown refresh; empty when nothing is saved.
    pub fn time_remaining(&self) -> &str {
        &self.time_remaining
    }

    pub fn stats(&self) -> TextStats {
        TextStats::of(&self.content)
    }

    pub fn has_pending_commit(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Earliest instant at which `tick` has work to do.
    pub fn next_deadline(&self) -> Option<i64> {
        match (self.debounce.deadline(), self.countdown.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Non-fatal message describing the last storage failure, if any.
    pub fn storage_notice(&self) -> Option<&str> {
        self.storage_notice.as_deref()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn config(&self) -> &ScratchpadConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
