use anyhow::{bail, Context, Result};
use braillai::api::{ApiWorker, DashboardApi, HttpApi, MemoryApi};
use braillai::orchestrator::{Backends, Orchestrator};
use braillai::protocol::{ChannelMessage, ChannelSink, DisconnectedSink, WsTransport};
use braillai::settings::Settings;
use braillai::speech::{CommandSpeech, LogSpeech, SpeechFeedback, UnsupportedCapture};
use braillai::storage::JsonFileStore;
use braillai::ui::BraillApp;
use crossbeam_channel::Receiver;
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Args {
    config: Option<PathBuf>,
    offline: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        offline: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--offline" => args.offline = true,
            other => bail!("Unknown argument: {}", other),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "braillai=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args()?;
    let mut settings = Settings::discover(args.config)?;
    if args.offline {
        settings = settings.offline();
    }
    info!("Starting BraillAI (offline: {})", settings.offline);

    let store = Arc::new(JsonFileStore::open(settings.store_dir())?);

    let (channel, inbound): (Box<dyn ChannelSink>, Receiver<ChannelMessage>) =
        if settings.offline {
            (Box::new(DisconnectedSink), crossbeam_channel::never())
        } else {
            let transport = WsTransport::spawn(&settings.socket_url, settings.reconnect_policy())?;
            (Box::new(transport.sink), transport.inbound)
        };

    let api: Arc<dyn DashboardApi> = if settings.offline {
        Arc::new(MemoryApi::new())
    } else {
        Arc::new(HttpApi::new(&settings.server_url, settings.request_timeout()))
    };
    let worker = ApiWorker::spawn(api)?;

    let speech: Box<dyn SpeechFeedback> = match &settings.speech_command {
        Some(program) => Box::new(CommandSpeech::new(program, settings.speech_args.clone())),
        None => Box::new(LogSpeech),
    };

    let (orchestrator, handle) = Orchestrator::new(Backends {
        store,
        channel,
        inbound,
        api_requests: worker.requests,
        api_responses: worker.responses,
        speech,
        capture: Box::new(UnsupportedCapture),
    });
    orchestrator.start()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([480.0, 400.0])
            .with_title("BraillAI"),
        ..Default::default()
    };

    eframe::run_native(
        "BraillAI",
        options,
        Box::new(|cc| Ok(Box::new(BraillApp::new(cc, handle)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
