//! End-to-end engine scenarios against the simulated pin bus
//!
//! Timings are shrunk through the config so the probe deadline and scan
//! settle delays elapse in milliseconds of real time.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use loomcheck::core::{ResultStore, TestConfig};
use loomcheck::engine::{OperatorPrompt, TestOrchestrator};
use loomcheck::hardware::sim::SimulatedBus;
use loomcheck::hardware::ExpanderPin;
use loomcheck::schedule::{ConnectionGraph, IoMap};

const SENSE: ExpanderPin = ExpanderPin {
    address: 0x26,
    pin: 0,
};

/// Prompt stub that records the collaborator calls it receives.
#[derive(Default)]
struct RecordingPrompt {
    events: Mutex<Vec<String>>,
}

impl RecordingPrompt {
    fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl OperatorPrompt for RecordingPrompt {
    async fn present(&self, title: &str, message: &str, _countdown: Duration) -> Result<()> {
        self.events.lock().push(format!("present: {title} | {message}"));
        Ok(())
    }

    async fn update_state(&self, passed: bool, pending: bool) -> Result<()> {
        self.events
            .lock()
            .push(format!("state: passed={passed} pending={pending}"));
        Ok(())
    }

    async fn dismiss(&self) -> Result<()> {
        self.events.lock().push("dismiss".to_string());
        Ok(())
    }
}

fn fast_config() -> TestConfig {
    TestConfig {
        expander_addresses: vec![0x21, 0x22, 0x23],
        sense_pin: SENSE,
        probe_timeout_ms: 20,
        poll_interval_ms: 2,
        scan_settle_ms: 1,
        terminal_pause_ms: 1,
        confirm_timeout_ms: 50,
    }
}

fn scenario_graph() -> ConnectionGraph {
    serde_json::from_str(
        r#"{
            "10CON1": [
                {"from_terminal": 5, "to_part": "-X1", "to_mark": "21C1", "to_terminal": 2}
            ]
        }"#,
    )
    .unwrap()
}

fn scenario_iomap() -> IoMap {
    serde_json::from_str(
        r#"{
            "10CON1": [
                {"connector": "10CON1", "connector_pin": 5,
                 "expander_address": 33, "expander_pin": 3}
            ],
            "21C1": [
                {"connector": "C9", "connector_pin": 4,
                 "expander_address": 35, "expander_pin": 9}
            ]
        }"#,
    )
    .unwrap()
}

fn unique_results_path(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "loomcheck_{name}_{}_{n}.json",
        std::process::id()
    ))
}

#[tokio::test]
async fn scenario_a_expected_line_passes() -> Result<()> {
    let graph = scenario_graph();
    let iomap = scenario_iomap();
    let config = fast_config();
    let results_path = unique_results_path("scenario_a");

    let bus = SimulatedBus::new(SENSE);
    bus.wire(ExpanderPin::new(0x21, 3));

    let prompt = RecordingPrompt::default();
    let mut store = ResultStore::empty("Cabinet S25", vec!["10CON1".to_string()]);
    let orchestrator = TestOrchestrator::new(&bus, &prompt, &config);
    let summary = orchestrator
        .run_mark("10CON1", &graph, &iomap, &mut store, &results_path)
        .await?;

    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 0);

    let results = store.results_for("10CON1");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].terminal, "5");
    assert!(results[0].passed);
    assert!(results[0].answer.contains("21C1"));
    assert!(results[0].answer.contains('2'));

    // Prompt lifecycle: present, pass state, dismiss.
    let events = prompt.events();
    assert!(events[0].starts_with("present: Terminal 5"));
    assert!(events.contains(&"state: passed=true pending=false".to_string()));
    assert_eq!(events.last().unwrap(), "dismiss");

    std::fs::remove_file(&results_path)?;
    Ok(())
}

#[tokio::test]
async fn scenario_b_fallback_scan_names_the_miswire() -> Result<()> {
    let graph = scenario_graph();
    let iomap = scenario_iomap();
    let config = fast_config();
    let results_path = unique_results_path("scenario_b");

    // Expected line dead; the cable actually lands on (0x23, 9), which the
    // I/O map knows as connector C9 pin 4.
    let bus = SimulatedBus::new(SENSE);
    bus.wire(ExpanderPin::new(0x23, 9));

    let prompt = RecordingPrompt::default();
    let mut store = ResultStore::empty("Cabinet S25", vec!["10CON1".to_string()]);
    let orchestrator = TestOrchestrator::new(&bus, &prompt, &config);
    let summary = orchestrator
        .run_mark("10CON1", &graph, &iomap, &mut store, &results_path)
        .await?;

    assert_eq!(summary.failed, 1);

    let results = store.results_for("10CON1");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].terminal, "5");
    assert!(!results[0].passed);
    assert!(results[0].answer.contains("C9"));
    assert!(results[0].answer.contains('4'));

    // Scanning state was reported between timeout and the final verdict.
    let events = prompt.events();
    assert!(events.contains(&"state: passed=false pending=true".to_string()));
    assert!(events.contains(&"state: passed=false pending=false".to_string()));

    std::fs::remove_file(&results_path)?;
    Ok(())
}

#[tokio::test]
async fn scenario_b_exhausted_scan_keeps_expected_answer() -> Result<()> {
    let graph = scenario_graph();
    let iomap = scenario_iomap();
    let config = fast_config();
    let results_path = unique_results_path("scan_exhausted");

    // Nothing wired anywhere: probe times out and the scan comes up dry.
    let bus = SimulatedBus::new(SENSE);

    let prompt = RecordingPrompt::default();
    let mut store = ResultStore::empty("Cabinet S25", vec!["10CON1".to_string()]);
    let orchestrator = TestOrchestrator::new(&bus, &prompt, &config);
    let summary = orchestrator
        .run_mark("10CON1", &graph, &iomap, &mut store, &results_path)
        .await?;

    assert_eq!(summary.failed, 1);
    let results = store.results_for("10CON1");
    assert!(!results[0].passed);
    assert!(results[0].answer.contains("Should go to mark: 21C1"));

    std::fs::remove_file(&results_path)?;
    Ok(())
}

#[tokio::test]
async fn scenario_c_no_target_records_nothing() -> Result<()> {
    let graph: ConnectionGraph = serde_json::from_str(
        r#"{
            "10CON1": [
                {"from_terminal": 5, "to_part": null, "to_mark": null, "to_terminal": null}
            ]
        }"#,
    )
    .unwrap();
    let iomap = scenario_iomap();
    let config = fast_config();
    let results_path = unique_results_path("scenario_c");

    let bus = SimulatedBus::new(SENSE);
    bus.wire(ExpanderPin::new(0x21, 3));

    let prompt = RecordingPrompt::default();
    let mut store = ResultStore::empty("Cabinet S25", vec!["10CON1".to_string()]);
    let orchestrator = TestOrchestrator::new(&bus, &prompt, &config);
    let summary = orchestrator
        .run_mark("10CON1", &graph, &iomap, &mut store, &results_path)
        .await?;

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.probed, 0);
    assert!(store.results_for("10CON1").is_empty());
    // No probe means no hardware access and no prompt.
    assert!(bus.journal().is_empty());
    assert!(prompt.events().is_empty());

    std::fs::remove_file(&results_path)?;
    Ok(())
}

#[tokio::test]
async fn already_passed_terminals_never_touch_hardware() -> Result<()> {
    let graph = scenario_graph();
    let iomap = scenario_iomap();
    let config = fast_config();
    let results_path = unique_results_path("skip_invariant");

    let bus = SimulatedBus::new(SENSE);
    bus.wire(ExpanderPin::new(0x21, 3));

    let prompt = RecordingPrompt::default();
    let mut store = ResultStore::empty("Cabinet S25", vec!["10CON1".to_string()]);
    let orchestrator = TestOrchestrator::new(&bus, &prompt, &config);

    // First run passes the terminal.
    orchestrator
        .run_mark("10CON1", &graph, &iomap, &mut store, &results_path)
        .await?;
    let ops_after_first = bus.journal().len();
    assert!(ops_after_first > 0);

    // Re-run: the passed terminal is skipped without any bus traffic.
    let summary = orchestrator
        .run_mark("10CON1", &graph, &iomap, &mut store, &results_path)
        .await?;
    assert_eq!(summary.skipped, 1);
    assert_eq!(bus.journal().len(), ops_after_first);
    assert_eq!(store.results_for("10CON1").len(), 1);

    std::fs::remove_file(&results_path)?;
    Ok(())
}

#[tokio::test]
async fn unknown_mark_is_a_no_op() -> Result<()> {
    let graph = scenario_graph();
    let iomap = scenario_iomap();
    let config = fast_config();
    let results_path = unique_results_path("unknown_mark");

    let bus = SimulatedBus::new(SENSE);
    let prompt = RecordingPrompt::default();
    let mut store = ResultStore::empty("Cabinet S25", Vec::new());
    let orchestrator = TestOrchestrator::new(&bus, &prompt, &config);

    let summary = orchestrator
        .run_mark("99CON9", &graph, &iomap, &mut store, &results_path)
        .await?;
    assert_eq!(summary, Default::default());
    assert!(bus.journal().is_empty());
    // Nothing to test also means no write-back.
    assert!(!results_path.exists());
    Ok(())
}

#[tokio::test]
async fn run_writes_the_store_back_once_per_mark() -> Result<()> {
    let graph = scenario_graph();
    let iomap = scenario_iomap();
    let config = fast_config();
    let results_path = unique_results_path("write_back");

    let bus = SimulatedBus::new(SENSE);
    bus.wire(ExpanderPin::new(0x21, 3));

    let prompt = RecordingPrompt::default();
    let mut store = ResultStore::empty("Cabinet S25", vec!["10CON1".to_string()]);
    let orchestrator = TestOrchestrator::new(&bus, &prompt, &config);
    orchestrator
        .run_mark("10CON1", &graph, &iomap, &mut store, &results_path)
        .await?;

    let reloaded = ResultStore::load(&results_path)?;
    assert_eq!(reloaded, store);

    std::fs::remove_file(&results_path)?;
    Ok(())
}

#[test]
fn missing_result_store_is_fatal() {
    let err = ResultStore::load(&unique_results_path("missing")).unwrap_err();
    assert!(err.to_string().contains("Result store not found"));
}
