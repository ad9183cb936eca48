//! Demo gateway.
//!
//! Boots the logger from a config file, then runs a number of concurrent
//! flows through a three-call chain. Every line of one flow carries the same
//! log id.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use flowlog::lifecycle::initialize_global_or_exit;
use flowlog::{debug, error, fatal, info, warn, FlowContext};

#[derive(Parser)]
#[command(name = "flowlog")]
#[command(about = "Run concurrent demo flows through the logger", long_about = None)]
struct Args {
    /// Logging configuration (JSON or TOML)
    #[arg(short, long, default_value = "conf/flowlog_dev.json")]
    config: PathBuf,

    /// Number of concurrent flows
    #[arg(short, long, default_value_t = 10)]
    flows: usize,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match flowlog::load_config(&args.config) {
        Ok(config) => config,
        Err(e) => fatal!(
            &FlowContext::system(),
            "load config {}: {}",
            args.config.display(),
            e
        ),
    };
    let system = initialize_global_or_exit(&config);
    info!(&system, "starting {} flows", args.flows);

    let handles: Vec<_> = (0..args.flows).map(|_| tokio::spawn(gateway())).collect();
    for handle in handles {
        if let Err(e) = handle.await {
            error!(&system, "flow task failed: {}", e);
        }
    }

    info!(&system, "all flows finished");
    flowlog::global::current().flush();
}

/// Entry point of one request.
async fn gateway() {
    let ctx = FlowContext::new_flow();
    let resp = call1(&ctx).await;
    info!(&ctx, "resp: {}", resp);
}

async fn call1(ctx: &FlowContext) -> String {
    info!(ctx, "a log in call1: {}", "call1");
    debug!(ctx, "debug in call1: {}", "call1");
    tokio::time::sleep(Duration::from_millis(5)).await;
    call2(&ctx.clone().with_log_id()).await
}

async fn call2(ctx: &FlowContext) -> String {
    info!(ctx, "a log in call2: {}", "call2");
    warn!(ctx, "warning in call2: {}", "call2");
    tokio::time::sleep(Duration::from_millis(5)).await;
    call3(&ctx.clone().with_log_id()).await
}

async fn call3(ctx: &FlowContext) -> String {
    error!(ctx, "a error in call3: {}", "call3");
    "Success in call3".to_string()
}
