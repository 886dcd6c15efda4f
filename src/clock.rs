use crate::GenesisInfos;
use chrono::{SecondsFormat, TimeZone, Utc};

/// The simulated time of the ledger.
/// All three counters only ever move forward.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LedgerClock {
    // POSIX time in milliseconds.
    time: u64,
    slot: u64,
    block_height: u64,
    slot_length_ms: u64,
}

impl LedgerClock {
    pub fn at_genesis(genesis_infos: &GenesisInfos) -> Self {
        Self {
            time: genesis_infos.system_start_ms,
            slot: genesis_infos.start_slot,
            block_height: 0,
            slot_length_ms: genesis_infos.slot_length_ms,
        }
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn slot(&self) -> u64 {
        self.slot
    }

    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    /// Moves to the next block, one slot later.
    pub fn tick(&mut self) {
        self.advance(1);
    }

    /// Moves forward by `blocks` blocks at once, one slot per block.
    pub fn advance(&mut self, blocks: u64) {
        self.block_height = self.block_height.saturating_add(blocks);
        self.slot = self.slot.saturating_add(blocks);
        self.time = self
            .time
            .saturating_add(blocks.saturating_mul(self.slot_length_ms));
    }

    /// The time as an ISO-8601 string, or the raw milliseconds if it is out of range.
    pub fn time_iso(&self) -> String {
        match i64::try_from(self.time)
            .ok()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        {
            Some(time) => time.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => format!("{}ms", self.time),
        }
    }
}
