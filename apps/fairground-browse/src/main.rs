//! # Fairground Browse
//!
//! A standalone CLI marketplace browser over an in-memory Fairground
//! ledger. Creators publish solutions and version updates, operators
//! register to serve them, and deletions/cancellations take items down;
//! the reconciler resolves what a visitor actually sees.
//!
//! ## Visibility model
//!
//! ```text
//! raw feed  ─▶  drop superseded versions (Previous-Versions chains)
//!           ─▶  collapse repeats to the newest per item
//!           ─▶  drop records revoked by their creator or the authority
//!           ─▶  canonical listing
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::*;
use plv_core::operation::ItemKind;
use plv_core::record::{Address, Record, RecordId, Tag};
use plv_core::tags;
use plv_feed::MemoryLedger;
use plv_reconciler::{ReconcileOutcome, Reconciler, ReconcilerConfig};

const AUTHORITY: &str = "fairground-authority";

// ─── CLI ───────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "fairground-browse")]
#[command(about = "Marketplace feed browser over an in-memory Fairground ledger")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lifecycle walkthrough: publish, update, delete, takedown
    Demo,
    /// List the reconciled solution catalog of a seeded marketplace
    Solutions,
    /// List the reconciled operator registrations of a seeded marketplace
    Registrations,
    /// Interactive REPL for manual experimentation
    Interactive,
}

// ─── Marketplace: a ledger plus the reconciler that reads it ───────────────

/// Owns the in-memory ledger and a reconciler configured with the demo
/// authority address. All publishing helpers stamp the protocol tags.
struct Marketplace {
    ledger: Arc<MemoryLedger>,
    reconciler: Reconciler<MemoryLedger>,
}

impl Marketplace {
    fn new() -> Self {
        let ledger = Arc::new(MemoryLedger::new());
        let reconciler = Reconciler::new(
            ledger.clone(),
            ReconcilerConfig::new(Address::new(AUTHORITY)),
        );
        Self { ledger, reconciler }
    }

    fn base_tags(operation: &str) -> Vec<Tag> {
        vec![
            Tag::new(tags::PROTOCOL_NAME, tags::DEFAULT_PROTOCOL_NAME),
            Tag::new(tags::PROTOCOL_VERSION, tags::DEFAULT_PROTOCOL_VERSION),
            Tag::new(tags::OPERATION_NAME, operation),
        ]
    }

    fn publish_solution(&self, creator: &str, name: &str, previous: &[RecordId]) -> RecordId {
        let mut wire = Self::base_tags(ItemKind::SOLUTION.creation.tag_value());
        wire.push(Tag::new(tags::SOLUTION_NAME, name));
        if !previous.is_empty() {
            let ids: Vec<&str> = previous.iter().map(|id| id.as_str()).collect();
            wire.push(Tag::new(
                tags::PREVIOUS_VERSIONS,
                serde_json::to_string(&ids).expect("ids encode as JSON"),
            ));
        }
        self.ledger.publish(Address::new(creator), wire)
    }

    fn delete_solution(&self, owner: &str, target: &RecordId) {
        let mut wire = Self::base_tags(ItemKind::SOLUTION.revocation.tag_value());
        wire.push(Tag::new(ItemKind::SOLUTION.target_tag, target.as_str()));
        self.ledger.publish(Address::new(owner), wire);
    }

    fn register_operator(&self, operator: &str, name: &str, fee: &str) -> RecordId {
        let mut wire = Self::base_tags(ItemKind::REGISTRATION.creation.tag_value());
        wire.push(Tag::new(tags::OPERATOR_NAME, name));
        wire.push(Tag::new(tags::OPERATOR_FEE, fee));
        self.ledger.publish(Address::new(operator), wire)
    }

    fn cancel_registration(&self, operator: &str, target: &RecordId) {
        let mut wire = Self::base_tags(ItemKind::REGISTRATION.revocation.tag_value());
        wire.push(Tag::new(ItemKind::REGISTRATION.target_tag, target.as_str()));
        self.ledger.publish(Address::new(operator), wire);
    }

    async fn visible(&self, kind: &ItemKind) -> Vec<Record> {
        match self
            .reconciler
            .reconcile_feed(kind)
            .await
            .expect("in-memory feed does not fail")
        {
            ReconcileOutcome::Complete(records) => records,
            ReconcileOutcome::Superseded => Vec::new(),
        }
    }
}

// ─── Pretty printing ──────────────────────────────────────────────────────

fn header(text: &str) {
    let bar = "═".repeat(60);
    println!("\n{}", bar.bright_cyan());
    println!("  {}", text.bold().bright_white());
    println!("{}", bar.bright_cyan());
}

fn section(text: &str) {
    println!("\n{} {}", "▸".bright_yellow(), text.bold());
}

fn step(text: &str) {
    println!("  {} {}", "•".bright_green(), text);
}

fn short(id: &RecordId) -> String {
    let s = id.as_str();
    if s.len() > 10 {
        format!("{}…", &s[..10])
    } else {
        s.to_string()
    }
}

fn show_listing(title: &str, records: &[Record], name_tag: &str) {
    let border = "─".repeat(52);
    println!("  ┌{}┐", border);
    println!(
        "  │ {:^50} │",
        title.bright_yellow().to_string()
    );
    println!("  ├{}┤", border);
    if records.is_empty() {
        println!("  │ {:^50} │", "(nothing visible)".dimmed().to_string());
    } else {
        for record in records {
            let name = record.tag(name_tag).unwrap_or("(unnamed)");
            let line = format!(
                "  {:<20} {:<14} {}",
                name,
                record.owner().as_str(),
                short(record.id())
            );
            println!("  │ {:<50} │", line);
        }
    }
    println!("  └{}┘", border);
}

// ─── Demo ──────────────────────────────────────────────────────────────────

async fn run_demo() {
    header("DEMO — Solution Lifecycle & Canonical Visibility");
    let market = Marketplace::new();

    section("Phase 1: Two creators publish solutions");
    let summarizer = market.publish_solution("alice", "summarizer", &[]);
    step("alice publishes 'summarizer'");
    let classifier = market.publish_solution("bob", "classifier", &[]);
    step("bob publishes 'classifier'");
    show_listing(
        "Visible Solutions",
        &market.visible(&ItemKind::SOLUTION).await,
        tags::SOLUTION_NAME,
    );

    section("Phase 2: alice ships v2, superseding v1");
    let summarizer_v2 =
        market.publish_solution("alice", "summarizer v2", &[summarizer.clone()]);
    step(&format!(
        "'summarizer v2' lists {} in its previous versions",
        short(&summarizer)
    ));
    show_listing(
        "Visible Solutions",
        &market.visible(&ItemKind::SOLUTION).await,
        tags::SOLUTION_NAME,
    );

    section("Phase 3: mallory tries to delete bob's solution");
    market.delete_solution("mallory", &classifier);
    step("deletion by a stranger is not honoured");
    show_listing(
        "Visible Solutions",
        &market.visible(&ItemKind::SOLUTION).await,
        tags::SOLUTION_NAME,
    );

    section("Phase 4: bob deletes his own solution");
    market.delete_solution("bob", &classifier);
    step("deletion by the creator is honoured");
    show_listing(
        "Visible Solutions",
        &market.visible(&ItemKind::SOLUTION).await,
        tags::SOLUTION_NAME,
    );

    section("Phase 5: the marketplace authority takes down alice's v2");
    market.delete_solution(AUTHORITY, &summarizer_v2);
    step("authority takedowns apply regardless of creator");
    show_listing(
        "Visible Solutions",
        &market.visible(&ItemKind::SOLUTION).await,
        tags::SOLUTION_NAME,
    );

    println!(
        "\n  {} {}",
        "✓".bright_green().bold(),
        "Canonical view tracked every lifecycle change".bright_green()
    );
}

// ─── Seeded listings ───────────────────────────────────────────────────────

fn seed_marketplace(market: &Marketplace) {
    let s1 = market.publish_solution("alice", "summarizer", &[]);
    let _s2 = market.publish_solution("alice", "summarizer v2", &[s1]);
    let _s3 = market.publish_solution("bob", "classifier", &[]);
    let s4 = market.publish_solution("carol", "translator", &[]);
    market.delete_solution("carol", &s4);

    let _r1 = market.register_operator("op-east", "fast-inference", "10");
    let r2 = market.register_operator("op-west", "cheap-inference", "2");
    let _r3 = market.register_operator("op-south", "bulk-inference", "5");
    market.cancel_registration("op-west", &r2);
}

async fn run_solutions() {
    header("SOLUTIONS — Reconciled Catalog");
    let market = Marketplace::new();
    seed_marketplace(&market);

    step("seeded: 4 solution records, 1 version update, 1 deletion");
    show_listing(
        "Visible Solutions",
        &market.visible(&ItemKind::SOLUTION).await,
        tags::SOLUTION_NAME,
    );
}

async fn run_registrations() {
    header("REGISTRATIONS — Reconciled Operator List");
    let market = Marketplace::new();
    seed_marketplace(&market);

    step("seeded: 3 registrations, 1 cancellation");
    show_listing(
        "Active Operators",
        &market.visible(&ItemKind::REGISTRATION).await,
        tags::OPERATOR_NAME,
    );
}

// ─── Interactive REPL ──────────────────────────────────────────────────────

/// Resolve a user-typed id prefix against the ledger's visible records.
fn resolve_prefix(records: &[Record], prefix: &str) -> Option<RecordId> {
    let mut matches = records
        .iter()
        .filter(|r| r.id().as_str().starts_with(prefix))
        .map(|r| r.id().clone());
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

async fn run_interactive() {
    header("INTERACTIVE REPL — Fairground Marketplace");
    let market = Marketplace::new();

    println!();
    println!("  {}", "Commands:".bold().underline());
    println!(
        "    {} <creator> <name>            Publish a solution",
        "publish".bright_cyan()
    );
    println!(
        "    {} <creator> <name> <id…>       Publish a new version superseding <id…>",
        "update".bright_cyan()
    );
    println!(
        "    {} <owner> <id…>               Delete a solution (creator or authority)",
        "delete".bright_cyan()
    );
    println!(
        "    {} <operator> <name> <fee>    Register an operator",
        "register".bright_cyan()
    );
    println!(
        "    {} <operator> <id…>            Cancel a registration",
        "cancel".bright_cyan()
    );
    println!(
        "    {}                        List visible solutions",
        "solutions".bright_cyan()
    );
    println!(
        "    {}                    List active registrations",
        "registrations".bright_cyan()
    );
    println!(
        "    {}                           Ledger record count",
        "ledger".bright_cyan()
    );
    println!(
        "    {}                             Exit",
        "quit".bright_cyan()
    );
    println!(
        "\n  The authority address is '{}'.",
        AUTHORITY.bright_magenta()
    );
    println!("  Id arguments accept unique prefixes.");
    println!();

    loop {
        print!("{}", "fairground> ".bright_cyan().bold());
        io::stdout().flush().unwrap();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() || input.is_empty() {
            break;
        }
        let parts: Vec<&str> = input.trim().split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "publish" | "p" => {
                if parts.len() < 3 {
                    println!("  {} Usage: publish <creator> <name>", "!".bright_red());
                    continue;
                }
                let id = market.publish_solution(parts[1], parts[2], &[]);
                step(&format!("{} published '{}' as {}", parts[1], parts[2], short(&id)));
            }

            "update" | "u" => {
                if parts.len() < 4 {
                    println!(
                        "  {} Usage: update <creator> <name> <id-prefix>",
                        "!".bright_red()
                    );
                    continue;
                }
                let visible = market.visible(&ItemKind::SOLUTION).await;
                match resolve_prefix(&visible, parts[3]) {
                    Some(target) => {
                        let id = market.publish_solution(parts[1], parts[2], &[target.clone()]);
                        step(&format!(
                            "{} superseded {} with '{}' ({})",
                            parts[1],
                            short(&target),
                            parts[2],
                            short(&id)
                        ));
                    }
                    None => println!(
                        "  {} No unique visible solution matches '{}'",
                        "!".bright_red(),
                        parts[3]
                    ),
                }
            }

            "delete" | "d" => {
                if parts.len() < 3 {
                    println!("  {} Usage: delete <owner> <id-prefix>", "!".bright_red());
                    continue;
                }
                let visible = market.visible(&ItemKind::SOLUTION).await;
                match resolve_prefix(&visible, parts[2]) {
                    Some(target) => {
                        market.delete_solution(parts[1], &target);
                        step(&format!(
                            "{} published a deletion targeting {}",
                            parts[1],
                            short(&target)
                        ));
                    }
                    None => println!(
                        "  {} No unique visible solution matches '{}'",
                        "!".bright_red(),
                        parts[2]
                    ),
                }
            }

            "register" | "r" => {
                if parts.len() < 4 {
                    println!(
                        "  {} Usage: register <operator> <name> <fee>",
                        "!".bright_red()
                    );
                    continue;
                }
                let id = market.register_operator(parts[1], parts[2], parts[3]);
                step(&format!(
                    "{} registered '{}' (fee {}) as {}",
                    parts[1],
                    parts[2],
                    parts[3],
                    short(&id)
                ));
            }

            "cancel" | "c" => {
                if parts.len() < 3 {
                    println!("  {} Usage: cancel <operator> <id-prefix>", "!".bright_red());
                    continue;
                }
                let visible = market.visible(&ItemKind::REGISTRATION).await;
                match resolve_prefix(&visible, parts[2]) {
                    Some(target) => {
                        market.cancel_registration(parts[1], &target);
                        step(&format!(
                            "{} published a cancellation targeting {}",
                            parts[1],
                            short(&target)
                        ));
                    }
                    None => println!(
                        "  {} No unique active registration matches '{}'",
                        "!".bright_red(),
                        parts[2]
                    ),
                }
            }

            "solutions" | "s" | "list" | "ls" => {
                show_listing(
                    "Visible Solutions",
                    &market.visible(&ItemKind::SOLUTION).await,
                    tags::SOLUTION_NAME,
                );
            }

            "registrations" | "regs" => {
                show_listing(
                    "Active Operators",
                    &market.visible(&ItemKind::REGISTRATION).await,
                    tags::OPERATOR_NAME,
                );
            }

            "ledger" => {
                step(&format!(
                    "{} records on the ledger (visibility is derived, nothing is ever removed)",
                    market.ledger.len()
                ));
            }

            "quit" | "exit" | "q" => {
                println!("  {}", "Goodbye!".dimmed());
                break;
            }

            "help" | "h" | "?" => {
                println!("  publish <c> <name> | update <c> <name> <id> | delete <o> <id>");
                println!("  register <o> <name> <fee> | cancel <o> <id>");
                println!("  solutions | registrations | ledger | quit");
            }

            other => {
                println!(
                    "  {} Unknown command '{}' — type 'help'",
                    "?".bright_yellow(),
                    other
                );
            }
        }
    }
}

// ─── Entry point ───────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => run_demo().await,
        Commands::Solutions => run_solutions().await,
        Commands::Registrations => run_registrations().await,
        Commands::Interactive => run_interactive().await,
    }
}
