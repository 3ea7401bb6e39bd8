mod report;
mod script;

use std::path::PathBuf;
use std::process;

use clap::Parser;

use sandcastle_session::{
    BuildSession, InMemoryDecorations, Outcome, SessionConfig, SessionError, SessionNotice,
};
use sandcastle_shapes::ShapeRegistry;

use script::{Script, Translator};

#[derive(Parser, Debug)]
#[command(name = "sandcastle", about = "Replay a sandcastle build script headlessly")]
struct Args {
    /// Session settings (TOML). Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Shape table overrides (TOML).
    #[arg(long)]
    shapes: Option<PathBuf>,
    /// Steps to replay (TOML).
    #[arg(long)]
    script: PathBuf,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log.as_str()))
        .init();

    let config = match &args.config {
        Some(path) => SessionConfig::from_path(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config {}: {}", path.display(), e);
            process::exit(1);
        }),
        None => SessionConfig::default(),
    };
    let registry = match &args.shapes {
        Some(path) => ShapeRegistry::from_path(path).unwrap_or_else(|e| {
            eprintln!("Failed to load shapes {}: {}", path.display(), e);
            process::exit(1);
        }),
        None => ShapeRegistry::builtin(),
    };
    let script = Script::from_path(&args.script).unwrap_or_else(|e| {
        eprintln!("Failed to load script {}: {}", args.script.display(), e);
        process::exit(1);
    });

    let mut session = BuildSession::new(config, registry, InMemoryDecorations::new());
    if let Err(e) = replay(&mut session, &script) {
        eprintln!("Replay aborted: {}", e);
        process::exit(2);
    }

    print!("{}", report::height_map(session.grid()));
    print!(
        "{}",
        report::summary(
            session.grid(),
            session.history().stats(),
            session.decorations().built().count()
        )
    );
}

fn replay(
    session: &mut BuildSession<InMemoryDecorations>,
    script: &Script,
) -> Result<(), SessionError> {
    let mut translator = Translator::default();
    for (tick, step) in script.steps.iter().enumerate() {
        session.advance(script.tick_secs);
        match translator.event(step) {
            Some(event) => {
                log::debug!(target: "events", "[tick {}] {:?}", tick, event);
                if let Outcome::Ignored(reason) = session.handle(event)? {
                    log::info!(target: "events", "[tick {}] ignored: {}", tick, reason);
                }
            }
            None => {
                if let script::Step::Wait { secs } = step {
                    session.advance(*secs);
                }
            }
        }
        for notice in session.drain_notices() {
            log_notice(tick, &notice);
        }
    }
    Ok(())
}

fn log_notice(tick: usize, notice: &SessionNotice) {
    match notice {
        SessionNotice::CandidateChanged { valid, transform } => {
            log::trace!(target: "events", "[tick {}] CandidateChanged valid={} at {:?}",
                tick, valid, transform.map(|t| t.position));
        }
        SessionNotice::VoxelsCommitted { stamp, kind, shape, voxels, .. } => {
            log::info!(target: "events", "[tick {}] VoxelsCommitted #{} {:?} {} ({} voxels)",
                tick, stamp, kind, shape, voxels.len());
        }
        SessionNotice::VoxelsReverted { stamp, kind, voxels } => {
            log::info!(target: "events", "[tick {}] VoxelsReverted #{} {:?} ({} voxels)",
                tick, stamp, kind, voxels.len());
        }
        SessionNotice::DecorationCommitted { handle, transform } => {
            log::info!(target: "events", "[tick {}] DecorationCommitted {} at {:?}",
                tick, handle, transform.position);
        }
        SessionNotice::GridCleared => {
            log::info!(target: "events", "[tick {}] GridCleared", tick);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandcastle_grid::Cell;

    #[test]
    fn bundled_assets_load() {
        let cfg = SessionConfig::from_toml_str(include_str!("../assets/sandcastle.toml")).unwrap();
        assert_eq!(cfg, SessionConfig::default());
        ShapeRegistry::from_toml_str(include_str!("../assets/shapes.toml")).unwrap();
    }

    #[test]
    fn demo_castle_replays() {
        let script = Script::from_toml_str(include_str!("../demos/castle.toml")).unwrap();
        let mut session = BuildSession::new(
            SessionConfig::default(),
            ShapeRegistry::builtin(),
            InMemoryDecorations::new(),
        );
        replay(&mut session, &script).unwrap();

        let grid = session.grid();
        assert_eq!(grid.occupied_count(), 15);
        assert_eq!(grid.height_at(Cell::new(5, 5)).unwrap(), 3);
        assert!(!grid.occupied_at(Cell::new(5, 5), 1).unwrap());
        assert_eq!(grid.height_at(Cell::new(1, 7)).unwrap(), 1);
        assert_eq!(grid.height_at(Cell::new(1, 6)).unwrap(), 0);
        assert_eq!(session.decorations().built().count(), 1);

        let stats = session.history().stats();
        assert_eq!((stats.done, stats.undone, stats.committed_total), (6, 0, 7));
        assert!(report::height_map(grid).lines().nth(5).unwrap().starts_with("....131"));
    }
}
