use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use translator_app::runtime::logging::{self, LogDestination};
use translator_app::runtime::{
    render_status, render_transcript, Driver, FileSettingsStore, SystemClock,
};
use translator_core::{NodeId, ObserverTimings, ProviderId, Settings};
use translator_engine::{
    EngineHandle, MemorySettingsStore, ProviderFactory, ProviderSettings, SettingsStore,
    SnapshotPage, TranslationService,
};
use translator_logging::tl_info;

#[derive(Parser, Debug)]
#[clap(about, version)]
/// Translates the messages of a saved chat page and prints the result.
struct Args {
    /// Saved HTML of the chat page
    snapshot: PathBuf,
    /// Location the page was saved from; part of the chat identity
    #[clap(long, default_value = "https://web.telegram.org/a/")]
    url: String,
    /// RON settings file; defaults are used when omitted
    #[clap(short, long)]
    settings: Option<PathBuf>,
    /// Switch provider (google_translate, gemini_pro, gemini_flash, mistral)
    #[clap(long)]
    provider: Option<String>,
    /// Switch target language (ISO code)
    #[clap(long)]
    target_language: Option<String>,
    /// Click every "Translate with" button once the page has been scanned
    #[clap(long)]
    activate: bool,
    /// How long to wait for the page to settle and replies to arrive
    #[clap(long, default_value_t = 30)]
    wait_secs: u64,
    /// Per-request provider timeout; no timeout when omitted
    #[clap(long)]
    timeout_secs: Option<u64>,
    #[clap(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,
    #[clap(short, long)]
    verbose: bool,
}

fn build_store(args: &Args) -> Result<Arc<dyn SettingsStore>> {
    let provider = match args.provider.as_deref() {
        Some(key) => match ProviderId::from_key(key) {
            Some(provider) => Some(provider),
            None => bail!("unknown provider {key:?}"),
        },
        None => None,
    };

    let apply = |mut settings: Settings| {
        if let Some(provider) = provider {
            settings = settings.with_provider(provider);
        }
        if let Some(language) = &args.target_language {
            settings = settings.with_target_language(language.clone());
        }
        settings
    };

    match &args.settings {
        Some(path) => {
            let store = FileSettingsStore::new(path);
            if provider.is_some() || args.target_language.is_some() {
                let settings = apply(store.load());
                store
                    .save(&settings)
                    .with_context(|| format!("writing settings to {}", path.display()))?;
            }
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemorySettingsStore::new(apply(Settings::default())))),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::initialize(args.log, args.verbose);

    let html = fs::read_to_string(&args.snapshot)
        .with_context(|| format!("reading {}", args.snapshot.display()))?;
    let page = SnapshotPage::parse(args.url.clone(), &html);
    let store = build_store(&args)?;

    let factory = ProviderFactory::new(ProviderSettings {
        request_timeout: args.timeout_secs.map(Duration::from_secs),
        ..ProviderSettings::default()
    })?;
    let service = TranslationService::new(store.clone(), factory);
    let mut driver = Driver::new(
        page,
        store,
        SystemClock,
        ObserverTimings::default(),
        |sink| EngineHandle::spawn(service, sink),
    );

    let budget = Duration::from_secs(args.wait_secs);
    driver.start();
    driver.run_until_idle(budget);

    if args.activate {
        let buttons: Vec<NodeId> = driver
            .page()
            .elements()
            .filter(|(_, element)| element.affordance.is_some())
            .map(|(node, _)| node)
            .collect();
        tl_info!("Activating {} translate buttons", buttons.len());
        for node in buttons {
            driver.activate_affordance(node);
        }
        driver.run_until_idle(budget);
    }

    print!("{}", render_transcript(driver.page()));
    println!("{}", render_status(&driver.view()));
    driver.unload();
    Ok(())
}
