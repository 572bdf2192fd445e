use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use orderly::batch::{BatchEvent, Dispatcher};
use orderly::config::Config;
use orderly::order::{process_order, sample_orders, Order};
use orderly::sync::WaitGroup;
use orderly::{log, olog, Result};

/// Orderly - concurrent order processing demo with a counting barrier
#[derive(Parser, Debug)]
#[command(name = "orderly")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    ORDERLY_DEBUG=1    Enable debug logging (alternative to --debug)"
)]
pub struct Cli {
    /// Compress demo delays to hundredths of real time
    #[arg(short = 'f', long)]
    pub fast: bool,

    /// Enable debug logging (writes to ~/.orderly/orderly.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Demo scenarios
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Process the sample batch one order at a time
    Sequential,

    /// Process the sample batch concurrently behind the completion barrier
    Concurrent,

    /// Ad-hoc rush and VIP orders registered directly on a wait group
    Rush,

    /// Runtime introspection while a batch is in flight
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    log::init_with_debug(cli.debug);
    olog!("orderly starting, command={:?}", cli.command);

    let config = Config::load()?;
    let scale = if cli.fast {
        config.time_scale * 0.01
    } else {
        config.time_scale
    };

    match cli.command {
        Some(Command::Sequential) => run_sequential(scale, config.queue_depth).await,
        Some(Command::Concurrent) => run_concurrent(scale, config.queue_depth).await,
        Some(Command::Rush) => run_rush(scale).await,
        Some(Command::Info) => run_info(scale).await,
        None => run_tour(scale, config.queue_depth).await,
    }

    olog!("orderly done");
    Ok(())
}

/// Run every scenario in sequence, like a guided tour.
async fn run_tour(scale: f64, queue_depth: usize) {
    println!("==========================================");
    println!("🏪 Orderly: Concurrent Order Processing");
    println!("==========================================");

    println!("\n=== 1. SEQUENTIAL BASELINE ===\n");
    run_sequential(scale, queue_depth).await;

    println!("\n=== 2. CONCURRENT WITH COMPLETION BARRIER ===\n");
    run_concurrent(scale, queue_depth).await;

    println!("\n=== 3. AD-HOC TASKS ON A SHARED WAIT GROUP ===\n");
    run_rush(scale).await;

    println!("\n=== 4. RUNTIME INTROSPECTION ===\n");
    run_info(scale).await;

    println!("\n📝 Takeaways:");
    println!("✅ Register with the wait group before spawning, never from inside the task");
    println!("✅ Move each order into its task by value to dodge the shared-capture bug");
    println!("✅ Let the permit signal completion on drop so no exit path is missed");
    println!("✅ A concurrent batch takes ~max(prep times), not their sum");
}

async fn run_sequential(scale: f64, queue_depth: usize) {
    let (dispatcher, printer) = printing_dispatcher(queue_depth);
    let report = dispatcher.process_sequential(sample_orders(scale)).await;
    drop(dispatcher);
    let _ = printer.await;

    println!(
        "\n⏱️  Sequential total: {:?} for {} orders (sum of prep times)",
        report.elapsed, report.completed
    );
}

async fn run_concurrent(scale: f64, queue_depth: usize) {
    let (dispatcher, printer) = printing_dispatcher(queue_depth);
    let report = dispatcher.process_batch(sample_orders(scale)).await;
    drop(dispatcher);
    let _ = printer.await;

    println!(
        "\n🚀 Concurrent total: {:?} for {} orders (max of prep times)",
        report.elapsed, report.completed
    );
}

/// Two hand-rolled tasks sharing one wait group, without the dispatcher.
async fn run_rush(scale: f64) {
    let wg = WaitGroup::new();

    let rush = Order::new(1, scaled(2.0, scale));
    let permit = wg.register();
    tokio::spawn(async move {
        let _permit = permit;
        println!("🔥 Rush order {}: processing immediately!", rush.id);
        process_order(rush).await;
        println!("✅ Rush order {}: ready for pickup!", rush.id);
    });

    let customer = "Alice";
    let vip = Order::new(2, scaled(1.0, scale));
    let permit = wg.register();
    tokio::spawn(async move {
        let _permit = permit;
        println!("👤 VIP order {} for {}: started processing", vip.id, customer);
        process_order(vip).await;
        println!(
            "✅ VIP order {} for {}: ready for pickup! (priority service)",
            vip.id, customer
        );
    });

    wg.wait().await;
    println!("\n🎯 Both ad-hoc orders done");
}

/// Report runtime counters around a batch, the way the original material
/// prints goroutine counts. Read-only and purely illustrative.
async fn run_info(scale: f64) {
    let metrics = tokio::runtime::Handle::current().metrics();
    println!(
        "📊 Runtime: {} worker threads, {} alive tasks before dispatch",
        metrics.num_workers(),
        metrics.num_alive_tasks()
    );

    let wg = WaitGroup::new();
    for order in sample_orders(scale) {
        let permit = wg.register();
        tokio::spawn(async move {
            let _permit = permit;
            process_order(order).await;
        });
    }

    println!(
        "📈 After dispatch: {} orders outstanding, {} alive tasks (snapshots, may be stale)",
        wg.pending(),
        metrics.num_alive_tasks()
    );

    wg.wait().await;
    println!(
        "📉 After wait: {} orders outstanding, {} alive tasks",
        wg.pending(),
        metrics.num_alive_tasks()
    );
}

/// A dispatcher wired to a task that prints order lifecycle events.
///
/// The printer drains the channel until the dispatcher (and with it the
/// sender) is dropped; await the returned handle to flush the output.
fn printing_dispatcher(queue_depth: usize) -> (Dispatcher, tokio::task::JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(queue_depth);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                BatchEvent::OrderStarted { id } => {
                    println!("📝 Order {}: started processing", id);
                }
                BatchEvent::OrderReady { id, prep_time } => {
                    println!("✅ Order {}: ready for pickup! Prep time: {:?}", id, prep_time);
                }
                BatchEvent::BatchComplete { .. } => {}
            }
        }
    });
    (Dispatcher::with_events(tx), printer)
}

fn scaled(secs: f64, scale: f64) -> Duration {
    Duration::from_secs_f64(secs * scale)
}
