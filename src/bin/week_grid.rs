use std::error::Error;

use clap::Parser;
use lib::week_view::{
    helpers::load_config,
    models::{Args, Config},
    publisher::{FilePublisher, GridPublisher, StdoutPublisher},
    run_tool::{run, watch},
    schedule_getter::ApiClient,
};
use log::{debug, info};
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    sync::mpsc,
};

/* every line typed on stdin asks for a re-fetch */
fn spawn_stdin_reload() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(8);
    tokio::spawn(async move {
        let mut lines = BufReader::new(io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            if tx.send(()).await.is_err() {
                break;
            }
        }
        debug!("stdin closed, no more manual reloads");
    });
    rx
}

async fn serve<GP: GridPublisher>(
    args: &Args,
    config: &Config,
    api: ApiClient,
    publisher: &mut GP,
) -> Result<(), Box<dyn Error>> {
    if args.watch {
        let reload = spawn_stdin_reload();
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        watch(api, publisher, args, config, reload, shutdown).await
    } else {
        run(api, publisher, args).await
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    /* Setup logging */
    env_logger::builder()
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    /* Get all the required resources */
    let args = Args::parse();
    let config = load_config(&args.config_json_path)?;
    let api = ApiClient::new(reqwest::Client::new(), &config);
    info!("Using scheduling API at {}", config.api_base_url);

    match &args.output {
        Some(path) => {
            let mut publisher = FilePublisher { path: path.clone() };
            serve(&args, &config, api, &mut publisher).await
        }
        None => serve(&args, &config, api, &mut StdoutPublisher).await,
    }
}
