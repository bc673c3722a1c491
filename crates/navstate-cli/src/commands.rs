use std::fs;

use anyhow::{Context, Result, bail};
use tracing::info;

use navstate_cli::script::{ScriptRunner, Step, StepReport, parse_script, resume_location};
use navstate_core::{
    BackTarget, FileStorage, MemoryStorage, NavigationContext, SessionStorage, config_to_toml,
};
use navstate_model::{Location, NavigationConfig, PersistedBlob, RoutePath};

use crate::cli::{InspectArgs, ReplayArgs, ResolveArgs};

pub fn run_replay(args: &ReplayArgs, config: NavigationConfig) -> Result<Vec<StepReport>> {
    let content = fs::read_to_string(&args.script)
        .with_context(|| format!("read script {}", args.script.display()))?;
    let steps = parse_script(&content)
        .with_context(|| format!("parse script {}", args.script.display()))?;
    info!(steps = steps.len(), "replaying navigation script");

    match &args.session {
        Some(path) => {
            let storage = FileStorage::open(path)
                .with_context(|| format!("open session {}", path.display()))?;
            Ok(replay(storage, config, args.start.as_deref(), &steps))
        }
        None => Ok(replay(
            MemoryStorage::new(),
            config,
            args.start.as_deref(),
            &steps,
        )),
    }
}

fn replay<S: SessionStorage>(
    storage: S,
    config: NavigationConfig,
    start: Option<&str>,
    steps: &[Step],
) -> Vec<StepReport> {
    let initial = match start {
        Some(href) => Location::parse(href),
        None => resume_location(&storage, &config),
    };
    let mut runner = ScriptRunner::new(NavigationContext::start(storage, config, initial));
    runner.run(steps)
}

pub fn run_resolve(
    args: &ResolveArgs,
    config: NavigationConfig,
) -> (RoutePath, BackTarget, Vec<RoutePath>) {
    let mut visited = args.history.iter().map(String::as_str);
    let initial = visited.next().unwrap_or(args.path.as_str());
    let mut context =
        NavigationContext::start(MemoryStorage::new(), config, Location::parse(initial));
    for path in visited {
        context.navigate(Location::parse(path));
    }
    context.navigate(Location::parse(&args.path));

    if let Some(source) = &args.source {
        context.set_navigation_source(source.as_str());
    }
    if let Some(id) = &args.source_id {
        context.set_source_client_id(id.as_str());
    }

    let target = context.resolve_back_target(None);
    (
        context.location().path.clone(),
        target,
        context.history().entries().to_vec(),
    )
}

pub fn run_inspect(
    args: &InspectArgs,
    config: &NavigationConfig,
) -> Result<(PersistedBlob, Option<String>)> {
    if !args.session.exists() {
        bail!("session file {} does not exist", args.session.display());
    }
    let storage = FileStorage::open(&args.session)
        .with_context(|| format!("open session {}", args.session.display()))?;
    let blob = match storage.get_item(&config.storage_key)? {
        Some(raw) => PersistedBlob::from_json(&raw).with_context(|| {
            format!("parse navigation state in {}", args.session.display())
        })?,
        None => PersistedBlob::default(),
    };
    let source_id = storage.get_item(&config.source_id_key)?;
    Ok((blob, source_id))
}

pub fn run_config(config: &NavigationConfig) -> Result<String> {
    config_to_toml(config).context("render config as TOML")
}
