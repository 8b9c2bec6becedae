//! Tests for reporting sinks

use std::thread;

use dungeon_queue::core::{
    ChannelReportSink, InMemoryReportSink, InstancePool, ReportSink, RunEvent, StateSnapshot,
    Supply, SupplyLedger, TracingReportSink,
};

fn snapshot() -> StateSnapshot {
    let ledger = SupplyLedger::new(Supply::new(1, 1, 3), Supply::standard_party()).unwrap();
    StateSnapshot::capture(&ledger, &InstancePool::new(2))
}

#[test]
fn test_in_memory_sink_keeps_order() {
    let sink = InMemoryReportSink::new(10);
    sink.report(&RunEvent::Started(snapshot()));
    sink.report(&RunEvent::GroupFormed {
        instance: 0,
        snapshot: snapshot(),
    });
    let events = sink.events();
    assert!(matches!(events[0], RunEvent::Started(_)));
    assert!(matches!(events[1], RunEvent::GroupFormed { instance: 0, .. }));
}

#[test]
fn test_channel_sink_consumed_on_other_thread() {
    let (sink, rx) = ChannelReportSink::new();
    let consumer = thread::spawn(move || rx.iter().count());
    for instance in 0..5 {
        sink.report(&RunEvent::GroupFormed {
            instance,
            snapshot: snapshot(),
        });
    }
    drop(sink);
    assert_eq!(consumer.join().unwrap(), 5);
}

#[test]
fn test_tracing_sink_accepts_all_events() {
    let sink = TracingReportSink;
    sink.report(&RunEvent::Started(snapshot()));
    sink.report(&RunEvent::GroupCompleted {
        instance: 1,
        duration: 2,
        snapshot: snapshot(),
    });
}
