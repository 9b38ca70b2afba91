//! Realtime canvas worker.
//!
//! Serves one stripe of the shared pixel canvas over WebSocket. The
//! instance number selects the owned columns; the worker count comes from
//! the configured list of worker addresses.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin worker -- -n 0 --listen 127.0.0.1:8001
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use canvas_app_rs::{
    common::{config::AppConfig, logger::setup_logger, time::SystemClock},
    domain::{CanvasMatrix, Palette},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::RedisSessionRepository,
        seeder::draw_initial_image,
    },
    ui::{OriginPolicy, Server},
    usecase::{ConnectClientUseCase, SetPixelUseCase},
};
use clap::Parser;
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "worker")]
#[command(about = "Realtime pixel canvas worker", long_about = None)]
struct Args {
    /// Instance number: which canvas stripe this worker owns
    #[arg(short = 'n', long)]
    instance_number: usize,

    /// Address to listen on (host:port)
    #[arg(short, long)]
    listen: String,

    /// Path to the configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Configuration
    // 2. Palette and seeded matrix
    // 3. Session repository (Redis)
    // 4. MessagePusher
    // 5. UseCases
    // 6. Server

    // 1. Load configuration and validate the instance number against the
    //    configured worker fleet
    let config = match AppConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("cannot load {}: {}", args.config.display(), e);
            std::process::exit(1);
        }
    };
    let total_instances = config.total_instances();
    if args.instance_number >= total_instances {
        tracing::error!(
            "instance number must satisfy 0 <= n < {} (number of WebSocketAppAddresses), got {}",
            total_instances,
            args.instance_number
        );
        std::process::exit(1);
    }

    // 2. Resolve the palette and paint the initial image onto the owned
    //    stripe; an unseeded worker must not serve
    let palette = match Palette::from_names(&config.palette_colors) {
        Ok(palette) => Arc::new(palette),
        Err(e) => {
            tracing::error!("cannot build palette: {}", e);
            std::process::exit(1);
        }
    };
    let mut matrix = CanvasMatrix::new(
        config.canvas_cols,
        config.canvas_rows,
        args.instance_number,
        total_instances,
    );
    if let Err(e) = draw_initial_image(&config.initial_image, &mut matrix, &palette) {
        tracing::error!("cannot draw initial image: {}", e);
        std::process::exit(1);
    }
    tracing::info!(
        "seeded stripe {}/{} of a {}x{} canvas",
        args.instance_number,
        total_instances,
        config.canvas_cols,
        config.canvas_rows
    );
    let matrix = Arc::new(Mutex::new(matrix));

    // 3. Connect to Redis (session info and cooldowns live there)
    let clock = Arc::new(SystemClock);
    let repository = match RedisSessionRepository::connect(&config, clock).await {
        Ok(repository) => Arc::new(repository),
        Err(e) => {
            tracing::error!("cannot connect to redis at {}: {}", config.redis_address, e);
            std::process::exit(1);
        }
    };
    tracing::info!("connected to redis at {}", config.redis_address);

    // 4. Create MessagePusher (connection registry + fan-out)
    let pusher = Arc::new(WebSocketMessagePusher::new());

    // 5. Create UseCases
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        matrix.clone(),
        repository.clone(),
        pusher.clone(),
    ));
    let set_pixel_usecase = Arc::new(SetPixelUseCase::new(
        matrix,
        palette,
        repository.clone(),
        pusher.clone(),
    ));

    // 6. Compile the origin policy and run the server
    let origin_policy = match OriginPolicy::from_pattern(config.allowed_origins.as_deref()) {
        Ok(policy) => policy,
        Err(e) => {
            tracing::error!("invalid AllowedOrigins pattern: {}", e);
            std::process::exit(1);
        }
    };

    let server = Server::new(
        connect_client_usecase,
        set_pixel_usecase,
        repository,
        pusher,
        origin_policy,
    );
    if let Err(e) = server.run(&args.listen).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
