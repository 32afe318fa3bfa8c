//! In-process `Store` implementation, used by the test suites and the reference server binary
//! when no external database is configured.

use crate::{
    model::{Direction, LogEntry, Mdn, MdnStatus, Message, MessageStatus},
    Store,
};

use as2_core::prelude::*;

use std::{collections::HashMap, sync::RwLock};

#[derive(Default)]
pub struct MemoryStore {
    messages:   RwLock<HashMap<String, Message>>,
    mdns:       RwLock<HashMap<String, Mdn>>,
    logs:       RwLock<HashMap<String, Vec<LogEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn create_message(&self, message: Message) -> Outcome<()> {
        let key = message.composite_key();
        let mut guard = res!(self.messages.write());
        guard.insert(key, message);
        Ok(())
    }

    fn update_message(&self, message: Message) -> Outcome<()> {
        self.create_message(message)
    }

    fn find_by_composite_key(&self, composite_key: &str) -> Outcome<Option<Message>> {
        let guard = res!(self.messages.read());
        Ok(guard.get(composite_key).cloned())
    }

    fn find_by_message_id(&self, message_id: &str) -> Outcome<Option<Message>> {
        let guard = res!(self.messages.read());
        Ok(guard.values().find(|m| m.message_id == message_id).cloned())
    }

    fn pending_outbound_async(&self) -> Outcome<Vec<Message>> {
        let guard = res!(self.messages.read());
        Ok(guard.values()
            .filter(|m| m.direction == Direction::Out && m.status == MessageStatus::PendingAsyncMdn)
            .cloned()
            .collect())
    }

    fn retryable_messages(&self) -> Outcome<Vec<Message>> {
        let guard = res!(self.messages.read());
        Ok(guard.values()
            .filter(|m| m.status == MessageStatus::Retry)
            .cloned()
            .collect())
    }

    fn create_mdn(&self, mdn: Mdn) -> Outcome<()> {
        let mut guard = res!(self.mdns.write());
        guard.insert(mdn.message_id.clone(), mdn);
        Ok(())
    }

    fn update_mdn(&self, mdn: Mdn) -> Outcome<()> {
        self.create_mdn(mdn)
    }

    fn find_mdn(&self, message_id: &str) -> Outcome<Option<Mdn>> {
        let guard = res!(self.mdns.read());
        Ok(guard.get(message_id).cloned())
    }

    fn pending_mdns(&self) -> Outcome<Vec<Mdn>> {
        let guard = res!(self.mdns.read());
        Ok(guard.values().filter(|m| m.status == MdnStatus::Pending).cloned().collect())
    }

    fn append_log(&self, entry: LogEntry) -> Outcome<()> {
        let mut guard = res!(self.logs.write());
        guard.entry(entry.message_id.clone()).or_insert_with(Vec::new).push(entry);
        Ok(())
    }

    fn logs_for(&self, message_id: &str) -> Outcome<Vec<LogEntry>> {
        let guard = res!(self.logs.read());
        Ok(guard.get(message_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LogStatus, Mdn};
    use std::time::SystemTime;

    fn sample_message(id: &str, direction: Direction) -> Message {
        Message::new(id, direction, "AcmeOrg", "BigCoPartner", "AcmeOrg", "BigCoPartner", SystemTime::now())
    }

    #[test]
    fn duplicate_composite_keys_overwrite_not_append() -> Outcome<()> {
        let store = MemoryStore::new();
        res!(store.create_message(sample_message("msg1", Direction::In)));
        let mut second = sample_message("msg1", Direction::In);
        second.fail("duplicate-document", "duplicate message-id");
        res!(store.create_message(second));
        let found = res!(store.find_by_composite_key(&sample_message("msg1", Direction::In).composite_key()));
        assert_eq!(found.unwrap().status, MessageStatus::Error);
        Ok(())
    }

    #[test]
    fn find_by_message_id_ignores_partner_pair() -> Outcome<()> {
        let store = MemoryStore::new();
        res!(store.create_message(sample_message("abc-123", Direction::Out)));
        let found = res!(store.find_by_message_id("abc-123"));
        assert!(found.is_some());
        Ok(())
    }

    #[test]
    fn pending_async_filters_direction_and_status() -> Outcome<()> {
        let store = MemoryStore::new();
        let mut pending = sample_message("p1", Direction::Out);
        pending.status = MessageStatus::PendingAsyncMdn;
        res!(store.create_message(pending));
        res!(store.create_message(sample_message("p2", Direction::In)));
        let found = res!(store.pending_outbound_async());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message_id, "p1");
        Ok(())
    }

    #[test]
    fn logs_accumulate_per_message() -> Outcome<()> {
        let store = MemoryStore::new();
        res!(store.append_log(LogEntry::new("msg1", SystemTime::now(), LogStatus::Success, "received")));
        res!(store.append_log(LogEntry::new("msg1", SystemTime::now(), LogStatus::Error, "mdn failed")));
        assert_eq!(res!(store.logs_for("msg1")).len(), 2);
        Ok(())
    }

    #[test]
    fn mdn_round_trips_by_message_id() -> Outcome<()> {
        let store = MemoryStore::new();
        res!(store.create_mdn(Mdn::new("msg1", "/store/mdn/sent/msg1.mdn", "Content-Type: multipart/report")));
        let found = res!(store.find_mdn("msg1"));
        assert!(found.is_some());
        Ok(())
    }
}
