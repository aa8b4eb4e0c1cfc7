//! Polling the RFID/NFC reader for route checkpoints.

use std::thread;
use std::time::Duration;

use log::{debug, info};
use serde_json::json;

use crate::integration::store::TaskStore;
use crate::route::Route;

/// One tag read: reader UID and the tag's custom id payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRead {
    pub uid: String,
    pub payload: String,
}

/// Non-blocking tag reader.
pub trait TagReader {
    fn read_tag(&mut self) -> Option<TagRead>;
}

/// Try the reader up to `attempts` times, sleeping `interval` between tries.
pub fn poll_tag<R: TagReader + ?Sized>(
    reader: &mut R,
    attempts: u32,
    interval: Duration,
) -> Option<TagRead> {
    for attempt in 0..attempts {
        if let Some(read) = reader.read_tag() {
            return Some(read);
        }
        debug!("no tag on try {}/{}", attempt + 1, attempts);
        if attempt + 1 < attempts {
            thread::sleep(interval);
        }
    }
    None
}

/// Store `read` as the last known tag if it is a checkpoint of `route`.
pub fn record_checkpoint<S: TaskStore + ?Sized>(store: &mut S, route: &Route, read: &TagRead) -> bool {
    if !route.expects_tag(&read.payload) {
        debug!("tag {} is not on the current route", read.payload);
        return false;
    }
    info!("passed checkpoint {}", read.payload);
    store.put_object(
        "tag",
        "last",
        json!({"uid": read.uid, "custom_id": read.payload}),
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::store::MemoryStore;

    struct Flaky {
        empty_reads: u32,
    }

    impl TagReader for Flaky {
        fn read_tag(&mut self) -> Option<TagRead> {
            if self.empty_reads > 0 {
                self.empty_reads -= 1;
                return None;
            }
            Some(TagRead {
                uid: "04:A2".into(),
                payload: "T-7".into(),
            })
        }
    }

    #[test]
    fn test_poll_retries() {
        let mut reader = Flaky { empty_reads: 2 };
        assert!(poll_tag(&mut reader, 2, Duration::ZERO).is_none());
        assert_eq!(poll_tag(&mut reader, 2, Duration::ZERO).unwrap().payload, "T-7");
    }

    #[test]
    fn test_record_checkpoint() {
        let route = Route {
            path: vec![],
            turns: vec![],
            tags: vec!["T-7".into()],
        };
        let mut store = MemoryStore::new();
        let read = TagRead {
            uid: "04:A2".into(),
            payload: "T-7".into(),
        };
        assert!(record_checkpoint(&mut store, &route, &read));
        assert_eq!(store.get_object("tag", "last").unwrap()["custom_id"], "T-7");

        let stray = TagRead {
            uid: "04:FF".into(),
            payload: "T-9".into(),
        };
        assert!(!record_checkpoint(&mut store, &route, &stray));
    }
}
