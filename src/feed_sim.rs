use chrono::Utc;
use futures::StreamExt;
use plv_core::operation::ItemKind;
use plv_core::record::{Address, RecordId, Tag};
use plv_core::tags;
use plv_feed::{MemoryLedger, PageDriver, Query, TagSelector};
use plv_reconciler::{ReconcileOutcome, Reconciler, ReconcilerConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

const AUTHORITY: &str = "fairground-authority";

/// Statistics collected during a marketplace simulation
#[derive(Clone, Debug)]
pub struct SimStats {
    pub creators: usize,
    pub records_published: usize,
    pub superseded: usize,
    pub revoked: usize,
    pub visible: usize,
    pub expected_visible: usize,
    pub total_time: Duration,
}

impl SimStats {
    pub fn print(&self) {
        let verdict = if self.visible == self.expected_visible {
            "MATCH"
        } else {
            "MISMATCH"
        };
        println!("\n╔════════════════════════════════════════════════════════════╗");
        println!("║              Marketplace Simulation Statistics             ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║  Creators:                  {:>30} ║", self.creators);
        println!("║  Records Published:         {:>30} ║", self.records_published);
        println!("║  Superseded Versions:       {:>30} ║", self.superseded);
        println!("║  Revoked Items:             {:>30} ║", self.revoked);
        println!("║  Visible After Reconcile:   {:>30} ║", self.visible);
        println!("║  Expected Visible:          {:>30} ║", self.expected_visible);
        println!("║  Reconcile Verdict:         {:>30} ║", verdict);
        println!(
            "║  Total Time:                {:>29}s ║",
            format!("{:.3}", self.total_time.as_secs_f64())
        );
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

fn protocol_tags() -> Vec<Tag> {
    vec![
        Tag::new(tags::PROTOCOL_NAME, tags::DEFAULT_PROTOCOL_NAME),
        Tag::new(tags::PROTOCOL_VERSION, tags::DEFAULT_PROTOCOL_VERSION),
        Tag::new(tags::UNIX_TIME, Utc::now().timestamp().to_string()),
    ]
}

fn publish_solution(
    ledger: &MemoryLedger,
    owner: &Address,
    name: &str,
    previous: &[RecordId],
) -> RecordId {
    let mut wire = protocol_tags();
    wire.push(Tag::new(
        tags::OPERATION_NAME,
        ItemKind::SOLUTION.creation.tag_value(),
    ));
    wire.push(Tag::new(tags::SOLUTION_NAME, name));
    if !previous.is_empty() {
        let ids: Vec<&str> = previous.iter().map(|id| id.as_str()).collect();
        wire.push(Tag::new(
            tags::PREVIOUS_VERSIONS,
            serde_json::to_string(&ids).expect("ids encode as JSON"),
        ));
    }
    ledger.publish(owner.clone(), wire)
}

fn revoke_solution(ledger: &MemoryLedger, owner: &Address, target: &RecordId) {
    let mut wire = protocol_tags();
    wire.push(Tag::new(
        tags::OPERATION_NAME,
        ItemKind::SOLUTION.revocation.tag_value(),
    ));
    wire.push(Tag::new(ItemKind::SOLUTION.target_tag, target.as_str()));
    ledger.publish(owner.clone(), wire);
}

/// Simulate a marketplace: creators publish solutions, push version
/// updates, and occasionally delete; the authority takes down a few more.
/// Then reconcile and compare against the expected visible set.
pub async fn sim_marketplace(
    creators: usize,
    solutions_per_creator: usize,
    update_rounds: usize,
    deletion_rate: f64,
) -> SimStats {
    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║        Marketplace Simulation                              ║");
    println!(
        "║  Creators: {} | Solutions/Creator: {} | Update Rounds: {} ║",
        creators, solutions_per_creator, update_rounds
    );
    println!("╚════════════════════════════════════════════════════════════╝");

    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(7);
    let ledger = Arc::new(MemoryLedger::new());

    // Phase 1: initial publications.
    println!("\n[Phase 1/3] Publishing solutions...");
    let mut heads: Vec<(Address, Vec<RecordId>, RecordId)> = Vec::new();
    for c in 0..creators {
        let owner = Address::new(format!("creator-{c}"));
        for s in 0..solutions_per_creator {
            let id = publish_solution(&ledger, &owner, &format!("solution-{c}-{s}"), &[]);
            heads.push((owner.clone(), Vec::new(), id));
        }
    }

    // Phase 2: version updates; each update supersedes the whole chain.
    println!("[Phase 2/3] Publishing version updates...");
    let mut superseded = 0;
    for _ in 0..update_rounds {
        for (owner, chain, head) in heads.iter_mut() {
            if rng.gen_bool(0.5) {
                chain.push(head.clone());
                superseded += 1;
                *head = publish_solution(
                    &ledger,
                    owner,
                    &format!("update-{}", chain.len()),
                    chain,
                );
            }
        }
    }

    // Phase 3: deletions by creators, a few takedowns by the authority.
    println!("[Phase 3/3] Publishing deletions...");
    let authority = Address::new(AUTHORITY);
    let mut revoked: BTreeSet<RecordId> = BTreeSet::new();
    for (owner, _, head) in &heads {
        if rng.gen_bool(deletion_rate) {
            revoke_solution(&ledger, owner, head);
            revoked.insert(head.clone());
        } else if rng.gen_bool(0.05) {
            revoke_solution(&ledger, &authority, head);
            revoked.insert(head.clone());
        }
    }

    let expected_visible = heads
        .iter()
        .filter(|(_, _, head)| !revoked.contains(head))
        .count();

    let reconciler = Reconciler::new(
        ledger.clone(),
        ReconcilerConfig::new(Address::new(AUTHORITY)),
    );
    let visible = match reconciler
        .reconcile_feed(&ItemKind::SOLUTION)
        .await
        .expect("in-memory feed does not fail")
    {
        ReconcileOutcome::Complete(records) => records.len(),
        ReconcileOutcome::Superseded => 0,
    };

    SimStats {
        creators,
        records_published: ledger.len(),
        superseded,
        revoked: revoked.len(),
        visible,
        expected_visible,
        total_time: start.elapsed(),
    }
}

/// Simulate a browsing consumer: page through the creation feed with a
/// [`PageDriver`] (one fetch in flight, like a scroll sentinel) and
/// reconcile the accumulated records after every page.
pub async fn sim_paged_browse(total_solutions: usize, page_size: usize) -> SimStats {
    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║        Paged Browse Simulation                             ║");
    println!(
        "║  Solutions: {} | Page Size: {}                         ║",
        total_solutions, page_size
    );
    println!("╚════════════════════════════════════════════════════════════╝");

    let start = Instant::now();
    let ledger = Arc::new(MemoryLedger::new());
    let owner = Address::new("creator-0");
    for s in 0..total_solutions {
        publish_solution(&ledger, &owner, &format!("solution-{s}"), &[]);
    }

    let query = Query::tagged(vec![
        TagSelector::eq(tags::PROTOCOL_NAME, tags::DEFAULT_PROTOCOL_NAME),
        TagSelector::eq(tags::PROTOCOL_VERSION, tags::DEFAULT_PROTOCOL_VERSION),
        TagSelector::eq(
            tags::OPERATION_NAME,
            ItemKind::SOLUTION.creation.tag_value(),
        ),
    ])
    .first(page_size);

    let reconciler = Reconciler::new(
        ledger.clone(),
        ReconcilerConfig::new(Address::new(AUTHORITY)),
    );

    let mut driver = PageDriver::new(ledger.clone(), query.clone());
    let mut pages = 0;
    let mut visible = 0;
    while driver.has_next_page() {
        driver
            .request_more()
            .await
            .expect("in-memory feed does not fail");
        pages += 1;
        let outcome = reconciler
            .reconcile(&ItemKind::SOLUTION, driver.records().to_vec())
            .await
            .expect("in-memory feed does not fail");
        if let ReconcileOutcome::Complete(records) = outcome {
            visible = records.len();
        }
        println!(
            "  Page {:>3}: {:>5} records accumulated, {:>5} visible",
            pages,
            driver.records().len(),
            visible
        );
    }

    // Cross-check: a full stream drain sees the same records.
    let streamed = plv_feed::stream::records(ledger.clone(), query)
        .map(|record| record.expect("in-memory feed does not fail"))
        .count()
        .await;
    assert_eq!(streamed, driver.records().len());

    SimStats {
        creators: 1,
        records_published: ledger.len(),
        superseded: 0,
        revoked: 0,
        visible,
        expected_visible: total_solutions,
        total_time: start.elapsed(),
    }
}

/// Scaling sweep: reconcile progressively larger marketplaces and report
/// pass latency per size.
pub async fn sim_scaling(max_creators: usize, step: usize) {
    println!("\n  {:>10} {:>12} {:>12} {:>14}", "creators", "records", "visible", "pass time");
    let mut creators = step;
    while creators <= max_creators {
        let stats = sim_marketplace(creators, 3, 2, 0.2).await;
        println!(
            "  {:>10} {:>12} {:>12} {:>12}ms",
            stats.creators,
            stats.records_published,
            stats.visible,
            stats.total_time.as_millis()
        );
        creators += step;
    }
}
