use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::Result;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

mod proxies;
mod transport;

use proxies::TraceProxies;
use transport::{EndpointConfig, HttpTransport};
use viz_core::{run_fetch_cycle, seed_scene, CycleOutcome, SessionState, Transport};
use viz_proto::SessionConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Boxyard warehouse visualization client", long_about = None)]
struct Cli {
    /// Base URL of the warehouse simulation server.
    #[arg(long, default_value = "http://127.0.0.1:8585")]
    url: String,
    /// Path of the session init endpoint.
    #[arg(long, default_value = "/init")]
    init_path: String,
    /// Path of the liveness/update endpoint.
    #[arg(long, default_value = "/update")]
    update_path: String,
    /// Path of the robot snapshot endpoint.
    #[arg(long, default_value = "/getRobots")]
    robots_path: String,
    /// Path of the box snapshot endpoint.
    #[arg(long, default_value = "/getBoxes")]
    boxes_path: String,
    /// Path of the objective endpoint.
    #[arg(long, default_value = "/getObj")]
    objective_path: String,
    /// Number of robots in the session, fixed for its lifetime.
    #[arg(long, default_value_t = 5)]
    num_agents: usize,
    /// Seconds between poll cycles.
    #[arg(long, default_value_t = 1.0)]
    update_delay: f32,
    /// Grid width sent with the init request.
    #[arg(long, default_value_t = 10)]
    width: u32,
    /// Grid height sent with the init request.
    #[arg(long, default_value_t = 10)]
    height: u32,
    /// Initial box density sent with the init request.
    #[arg(long, default_value_t = 0.3)]
    density: f32,
    /// Interpolation frames per second.
    #[arg(long, default_value_t = 60.0)]
    frame_rate: f32,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();

    let cli = Cli::parse();
    let config = SessionConfig {
        num_agents: cli.num_agents,
        width: cli.width,
        height: cli.height,
        density: cli.density,
    };
    let transport = HttpTransport::new(EndpointConfig {
        base: cli.url.clone(),
        init: cli.init_path,
        update: cli.update_path,
        robots: cli.robots_path,
        boxes: cli.boxes_path,
        objective: cli.objective_path,
    })?;
    let mut session = SessionState::new(config.clone(), cli.update_delay)?;
    let mut proxies = TraceProxies::default();

    info!("Configuring session at {}", cli.url);
    loop {
        match transport.send_config(&config).await {
            Ok(()) => break,
            Err(err) => {
                warn!("Session init failed: {}. Retrying in 2 seconds...", err);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
    info!("Configuration upload complete");

    seed_scene(&mut session, &transport, &mut proxies).await?;
    info!("Polling every {:.2}s. Press Ctrl+C to exit.", cli.update_delay);

    let frame_budget = Duration::from_secs_f32(1.0 / cli.frame_rate.max(1.0));
    let mut frames = tokio::time::interval(frame_budget);
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_frame = Instant::now();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            _ = frames.tick() => {
                let dt = last_frame.elapsed().as_secs_f32();
                last_frame = Instant::now();
                if session.frame(dt, &mut proxies) {
                    let outcome = run_fetch_cycle(&mut session, &transport, &mut proxies).await?;
                    match outcome {
                        CycleOutcome::Completed => {
                            debug!(boxes = proxies.live_boxes(), "cycle complete")
                        }
                        CycleOutcome::Aborted(stage) => debug!(?stage, "cycle aborted"),
                        CycleOutcome::Deferred => debug!("cycle deferred"),
                    }
                    // Fetch latency must not count against the next period.
                    last_frame = Instant::now();
                }
            }
        }
    }

    Ok(())
}
