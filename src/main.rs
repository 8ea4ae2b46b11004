use feed_sim::{sim_marketplace, sim_paged_browse, sim_scaling};
pub mod feed_sim;

fn main() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async_main());
}

async fn async_main() {
    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║            MARKETPLACE FEED SIMULATIONS                     ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    // Test 1: small marketplace, light churn
    let stats = sim_marketplace(4, 3, 2, 0.2).await;
    stats.print();

    // Test 2: medium marketplace, heavier churn
    let stats = sim_marketplace(10, 5, 4, 0.3).await;
    stats.print();

    // Test 3: paged browsing with incremental reconciliation
    let stats = sim_paged_browse(120, 10).await;
    stats.print();

    // Test 4: scaling analysis
    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║          SCALING ANALYSIS (reconcile pass)                 ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    sim_scaling(20, 5).await;

    println!("\n✓ All simulations completed successfully!");
}
