//! Admin console commands for the starmap.
//!
//! Commands are parsed from a text line, validated, and executed
//! synchronously against a [`GalaxyEngine`]. Validation failures are returned
//! as [`CommandError`]s before anything is mutated.

mod messages;

pub use messages::*;

use crate::collaborators::ConsoleSink;
use crate::components::MapId;
use crate::engine::GalaxyEngine;
use crate::error::CommandError;
use crate::starmap::{HyperlaneAddOutcome, HyperlaneBlockOutcome};

/// A parsed admin command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    /// `starmap_list`
    StarmapList,
    /// `regenhyperline`
    RegenHyperline,
    /// `hyperline <mapA> <mapB>`
    Hyperline { a: MapId, b: MapId },
    /// `unhyperline <mapA> <mapB>`
    Unhyperline { a: MapId, b: MapId },
}

impl AdminCommand {
    pub const NAMES: [&'static str; 4] = ["starmap_list", "regenhyperline", "hyperline", "unhyperline"];

    /// Parse a whitespace separated command line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        Self::from_args(name, &args)
    }

    pub fn from_args(name: &str, args: &[&str]) -> Result<Self, CommandError> {
        match name {
            "starmap_list" => {
                expect_args(args, 0)?;
                Ok(Self::StarmapList)
            }
            "regenhyperline" => {
                expect_args(args, 0)?;
                Ok(Self::RegenHyperline)
            }
            "hyperline" => {
                let (a, b) = parse_pair(args)?;
                Ok(Self::Hyperline { a, b })
            }
            "unhyperline" => {
                let (a, b) = parse_pair(args)?;
                Ok(Self::Unhyperline { a, b })
            }
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::StarmapList => "starmap_list",
            Self::RegenHyperline => "regenhyperline",
            Self::Hyperline { .. } => "hyperline",
            Self::Unhyperline { .. } => "unhyperline",
        }
    }

    pub fn description_key(&self) -> &'static str {
        match self {
            Self::StarmapList => "cmd-starmap-list-desc",
            Self::RegenHyperline => "cmd-regenhyperline-desc",
            Self::Hyperline { .. } => "cmd-hypeline-desc",
            Self::Unhyperline { .. } => "cmd-unhyperline-desc",
        }
    }

    pub fn help_key(&self) -> &'static str {
        match self {
            Self::StarmapList => "cmd-starmap-list-help",
            Self::RegenHyperline => "cmd-regenhyperline-help",
            Self::Hyperline { .. } => "cmd-hypeline-help",
            Self::Unhyperline { .. } => "cmd-unhyperline-help",
        }
    }
}

fn expect_args(args: &[&str], expected: usize) -> Result<(), CommandError> {
    if args.len() != expected {
        return Err(CommandError::WrongArgumentCount {
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

fn parse_pair(args: &[&str]) -> Result<(MapId, MapId), CommandError> {
    expect_args(args, 2)?;
    Ok((parse_map_id(args[0])?, parse_map_id(args[1])?))
}

fn parse_map_id(raw: &str) -> Result<MapId, CommandError> {
    raw.parse::<i32>()
        .map(MapId)
        .map_err(|_| CommandError::InvalidMapId(raw.to_string()))
}

/// Execute a command against the engine.
///
/// `hyperline` reports `cmd-hypeline-added` or `cmd-hypeline-exists`, plus
/// `cmd-hypeline-blocked` when an `unhyperline` block on the pair is still in
/// place. `unhyperline` reports `cmd-unhyperline-removed`, or
/// `cmd-unhyperline-blocked-only` when there was no open lane to remove.
pub fn execute<S: ConsoleSink>(
    engine: &mut GalaxyEngine<S>,
    command: &AdminCommand,
) -> Result<Vec<ConsoleMessage>, CommandError> {
    match *command {
        AdminCommand::StarmapList => Ok(starmap_list(engine)),
        AdminCommand::RegenHyperline => Ok(regen_hyperline(engine)),
        AdminCommand::Hyperline { a, b } => {
            ensure_stars_exist(engine, a, b)?;
            let outcome = engine.registry.add_hyperlane(a, b);
            let key = match outcome {
                HyperlaneAddOutcome::Added => "cmd-hypeline-added",
                HyperlaneAddOutcome::AlreadyExists => "cmd-hypeline-exists",
                HyperlaneAddOutcome::Blocked => "cmd-hypeline-blocked",
                HyperlaneAddOutcome::SelfLoop => return Err(CommandError::SameStar { map: a }),
            };
            Ok(vec![pair_message(key, a, b)])
        }
        AdminCommand::Unhyperline { a, b } => {
            ensure_stars_exist(engine, a, b)?;
            if a == b {
                return Err(CommandError::SameStar { map: a });
            }
            let key = match engine.registry.block_hyperlane(a, b) {
                HyperlaneBlockOutcome::Removed => "cmd-unhyperline-removed",
                HyperlaneBlockOutcome::BlockedOnly => "cmd-unhyperline-blocked-only",
            };
            Ok(vec![pair_message(key, a, b)])
        }
    }
}

/// Parse and execute one line, turning failures into error messages
pub fn run_line<S: ConsoleSink>(engine: &mut GalaxyEngine<S>, line: &str) -> Vec<ConsoleMessage> {
    if line.trim().is_empty() {
        return Vec::new();
    }
    let result = AdminCommand::parse(line).and_then(|command| {
        log::info!("admin command: {}", line.trim());
        execute(engine, &command)
    });
    match result {
        Ok(messages) => messages,
        Err(err) => {
            log::debug!("admin command rejected: {}", err);
            vec![ConsoleMessage::from(&err)]
        }
    }
}

fn starmap_list<S: ConsoleSink>(engine: &mut GalaxyEngine<S>) -> Vec<ConsoleMessage> {
    let stars = engine.collect_stars_fresh(true);
    if stars.is_empty() {
        return vec![ConsoleMessage::line("cmd-starmap-list-no-stars")];
    }
    stars
        .iter()
        .enumerate()
        .map(|(index, star)| {
            ConsoleMessage::line("cmd-starmap-list-line")
                .with("index", index)
                .with("mapId", star.map)
                .with("name", &star.name)
                .with("position", star.position)
        })
        .collect()
}

fn regen_hyperline<S: ConsoleSink>(engine: &mut GalaxyEngine<S>) -> Vec<ConsoleMessage> {
    engine.registry.clear_hyperlane_overrides(false);
    if let Err(err) = engine.force_regeneration() {
        log::warn!("forced starmap regeneration failed, continuing: {}", err);
    }
    engine.collect_stars_fresh(true);
    engine.refresh_consoles();
    vec![ConsoleMessage::line("cmd-regenhyperline-done")]
}

fn ensure_stars_exist<S: ConsoleSink>(
    engine: &GalaxyEngine<S>,
    a: MapId,
    b: MapId,
) -> Result<(), CommandError> {
    let stars = engine.collect_stars();
    let has = |map: MapId| stars.iter().any(|s| s.map == map);
    if has(a) && has(b) {
        Ok(())
    } else {
        Err(CommandError::StarNotFound { map_a: a, map_b: b })
    }
}

fn pair_message(key: &'static str, a: MapId, b: MapId) -> ConsoleMessage {
    ConsoleMessage::line(key).with("mapA", a).with("mapB", b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{NoRegeneration, StarmapRegenerator};
    use crate::components::{Sector, Vec2};
    use crate::config::StarmapConfig;
    use crate::error::CollaboratorError;
    use crate::starmap::EdgeOverride;
    use hecs::World;

    /// Two stars far enough apart that no natural hyperlane joins them
    fn engine_with_two_stars() -> GalaxyEngine {
        let mut engine = GalaxyEngine::new(StarmapConfig::default());
        engine.world.spawn((Sector::new(MapId(1), "Alpha", Vec2::new(10.0, 10.0))
            .with_global_position(Vec2::new(100.0, 100.0)),));
        engine.world.spawn((Sector::new(MapId(2), "Beta", Vec2::new(90.0, 10.0))
            .with_global_position(Vec2::new(9000.0, 100.0)),));
        engine.collect_stars_fresh(true);
        engine
    }

    #[test]
    fn test_parse() {
        assert_eq!(AdminCommand::parse("starmap_list"), Ok(AdminCommand::StarmapList));
        assert_eq!(
            AdminCommand::parse("  hyperline 1   2 "),
            Ok(AdminCommand::Hyperline { a: MapId(1), b: MapId(2) })
        );
        assert_eq!(
            AdminCommand::parse("unhyperline 1"),
            Err(CommandError::WrongArgumentCount { expected: 2, found: 1 })
        );
        assert_eq!(
            AdminCommand::parse("hyperline 1 two"),
            Err(CommandError::InvalidMapId("two".to_string()))
        );
        assert_eq!(
            AdminCommand::parse("regenhyperline now"),
            Err(CommandError::WrongArgumentCount { expected: 0, found: 1 })
        );
        assert_eq!(
            AdminCommand::parse("warp 1"),
            Err(CommandError::UnknownCommand("warp".to_string()))
        );
    }

    #[test]
    fn test_command_metadata() {
        for name in AdminCommand::NAMES {
            let line = match name {
                "hyperline" | "unhyperline" => format!("{} 1 2", name),
                _ => name.to_string(),
            };
            let command = AdminCommand::parse(&line).unwrap();
            assert_eq!(command.name(), name);
            assert!(command.description_key().ends_with("-desc"));
            assert!(command.help_key().ends_with("-help"));
        }
    }

    #[test]
    fn test_hyperline_scenario() {
        let mut engine = engine_with_two_stars();
        assert!(engine.registry.edges().is_empty());

        let out = run_line(&mut engine, "hyperline 1 2");
        assert_eq!(out[0].key, "cmd-hypeline-added");
        assert_eq!(
            engine.registry.hyperlane_state(MapId(1), MapId(2)),
            Some(EdgeOverride::ForcedOpen)
        );

        let out = run_line(&mut engine, "hyperline 1 2");
        assert_eq!(out[0].key, "cmd-hypeline-exists");
        assert_eq!(engine.registry.hyperlanes().records().len(), 1);

        let out = run_line(&mut engine, "unhyperline 1 2");
        assert_eq!(out[0].key, "cmd-unhyperline-removed");
        assert_eq!(
            engine.registry.hyperlane_state(MapId(1), MapId(2)),
            Some(EdgeOverride::ForcedBlocked)
        );

        let out = run_line(&mut engine, "hyperline 2 1");
        assert_eq!(out[0].key, "cmd-hypeline-blocked");

        let refreshes = engine.consoles().refreshes;
        let out = run_line(&mut engine, "regenhyperline");
        assert_eq!(out[0].key, "cmd-regenhyperline-done");
        assert_eq!(engine.registry.hyperlanes().override_count(), 0);
        assert_eq!(engine.consoles().refreshes, refreshes + 1);
    }

    #[test]
    fn test_unhyperline_without_edge_blocks_only() {
        let mut engine = engine_with_two_stars();
        let out = run_line(&mut engine, "unhyperline 2 1");
        assert_eq!(out[0].key, "cmd-unhyperline-blocked-only");
        assert!(!out[0].is_error);
        assert_eq!(
            engine.registry.hyperlane_state(MapId(1), MapId(2)),
            Some(EdgeOverride::ForcedBlocked)
        );
    }

    #[test]
    fn test_missing_star_rejected_without_mutation() {
        let mut engine = engine_with_two_stars();
        let err = execute(&mut engine, &AdminCommand::Hyperline { a: MapId(1), b: MapId(7) });
        assert_eq!(err, Err(CommandError::StarNotFound { map_a: MapId(1), map_b: MapId(7) }));
        assert!(engine.registry.hyperlanes().records().is_empty());

        let out = run_line(&mut engine, "unhyperline 7 1");
        assert!(out[0].is_error);
        assert_eq!(engine.registry.hyperlanes().override_count(), 0);
    }

    #[test]
    fn test_same_star_rejected() {
        let mut engine = engine_with_two_stars();
        let out = run_line(&mut engine, "hyperline 1 1");
        assert_eq!(out[0].key, "cmd-hypeline-same-star");
        let out = run_line(&mut engine, "unhyperline 2 2");
        assert_eq!(out[0].key, "cmd-hypeline-same-star");
        assert_eq!(engine.registry.hyperlanes().override_count(), 0);
    }

    #[test]
    fn test_malformed_lines_report_errors() {
        let mut engine = engine_with_two_stars();
        assert!(run_line(&mut engine, "   ").is_empty());
        let out = run_line(&mut engine, "hyperline 1 x");
        assert_eq!(out[0].key, "shell-invalid-map-id");
        let out = run_line(&mut engine, "hyperline");
        assert_eq!(out[0].key, "shell-wrong-arguments-number");
    }

    #[test]
    fn test_starmap_list() {
        let mut engine = GalaxyEngine::default();
        let out = run_line(&mut engine, "starmap_list");
        assert_eq!(out[0].key, "cmd-starmap-list-no-stars");

        engine
            .world
            .spawn((Sector::new(MapId(3), "Gamma", Vec2::new(2.0, 3.0)),));
        let out = run_line(&mut engine, "starmap_list");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].arg("index"), Some("0"));
        assert_eq!(out[0].arg("mapId"), Some("3"));
        assert_eq!(out[0].arg("name"), Some("Gamma"));
        // Fresh collect replaced the cache
        assert_eq!(engine.star_count(), 1);
    }

    struct FailingRegenerator;

    impl StarmapRegenerator for FailingRegenerator {
        fn regenerate(&mut self, _world: &mut World) -> Result<(), CollaboratorError> {
            Err(CollaboratorError::Failed {
                collaborator: "test",
                reason: "boom".to_string(),
            })
        }
    }

    #[test]
    fn test_regen_tolerates_regenerator_failure() {
        for regenerator in [
            Box::new(FailingRegenerator) as Box<dyn StarmapRegenerator>,
            Box::new(NoRegeneration) as Box<dyn StarmapRegenerator>,
        ] {
            let mut engine = engine_with_two_stars().with_regenerator(regenerator);
            engine.registry.try_add_hyperlane(MapId(1), MapId(2));
            engine
                .world
                .spawn((Sector::new(MapId(3), "Gamma", Vec2::new(2.0, 3.0)),));

            let out = run_line(&mut engine, "regenhyperline");
            assert_eq!(out[0].key, "cmd-regenhyperline-done");
            assert_eq!(engine.star_count(), 3);
            assert!(engine.registry.edges().is_empty());
        }
    }
}
