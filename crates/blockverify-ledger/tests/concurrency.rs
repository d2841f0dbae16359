//! Concurrent appends and reads against one shared ledger.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use blockverify_ledger::{Ledger, LedgerHandle};
use blockverify_ledger_testkit::fingerprint_payload;

const WRITERS: usize = 8;
const PER_WRITER: usize = 6;

fn assert_chain_is_sound(ledger: &Ledger, expected_appends: usize) {
    assert_eq!(ledger.length(), expected_appends as u64 + 1);
    assert!(ledger.validate());

    let records = ledger.export_all();
    let positions: HashSet<u64> = records.iter().map(|r| r.position).collect();
    assert_eq!(positions.len(), records.len(), "duplicate positions");

    let parents: HashSet<_> = records.iter().skip(1).map(|r| r.parent_hash).collect();
    assert_eq!(parents.len(), records.len() - 1, "two records share a parent");
}

#[test]
fn test_threaded_appends_serialize() {
    let ledger = Ledger::with_defaults().unwrap();

    thread::scope(|s| {
        for w in 0..WRITERS {
            let ledger = &ledger;
            s.spawn(move || {
                for i in 0..PER_WRITER {
                    ledger
                        .append(fingerprint_payload(&format!("w{w}-r{i}")))
                        .unwrap();
                }
            });
        }
    });

    assert_chain_is_sound(&ledger, WRITERS * PER_WRITER);
    for w in 0..WRITERS {
        for i in 0..PER_WRITER {
            assert!(ledger.find_by_fingerprint(&format!("w{w}-r{i}")).is_some());
        }
    }
}

#[test]
fn test_readers_see_consistent_prefixes() {
    let ledger = Ledger::with_defaults().unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..40 {
                ledger.append(fingerprint_payload(&format!("doc-{i}"))).unwrap();
            }
        });

        for _ in 0..3 {
            s.spawn(|| {
                let mut last_len = 0;
                for _ in 0..200 {
                    let len = ledger.length();
                    assert!(len >= last_len, "length went backwards");
                    last_len = len;

                    let tail = ledger.tail();
                    assert!(tail.has_valid_hash());
                    assert!(ledger.validate());
                }
            });
        }
    });

    assert_chain_is_sound(&ledger, 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_appends_from_blocking_tasks() {
    let ledger: LedgerHandle = Arc::new(Ledger::with_defaults().unwrap());

    let tasks: Vec<_> = (0..WRITERS)
        .map(|w| {
            let ledger = Arc::clone(&ledger);
            tokio::task::spawn_blocking(move || {
                (0..PER_WRITER)
                    .map(|i| {
                        ledger
                            .append(fingerprint_payload(&format!("task{w}-{i}")))
                            .unwrap()
                            .position
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut positions = Vec::new();
    for task in tasks {
        let mine = task.await.unwrap();
        // Each writer's own appends land in increasing order.
        assert!(mine.windows(2).all(|w| w[0] < w[1]));
        positions.extend(mine);
    }

    positions.sort_unstable();
    let expected: Vec<u64> = (1..=(WRITERS * PER_WRITER) as u64).collect();
    assert_eq!(positions, expected);
    assert_chain_is_sound(&ledger, WRITERS * PER_WRITER);
}
