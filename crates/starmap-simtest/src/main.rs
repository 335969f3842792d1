//! Starmap Headless Simulation Harness
//!
//! Validates galaxy generation, hyperlanes, capture and ownership logic
//! in-process, with no game server and no rendering.
//!
//! Usage:
//!   cargo run -p starmap-simtest
//!   cargo run -p starmap-simtest -- --verbose
//!   cargo run -p starmap-simtest -- --console < commands.txt

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::{self, BufRead};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use starmap_core::prelude::*;
use starmap_core::query::{EcsQuery, SectorQuery};

// ── Sample config (same JSON a deployment would point STARMAP_CONFIG_PATH at) ──
const CONFIG_JSON: &str = include_str!("../../../data/starmap_config.json");

/// Simulated seconds between admin commands in console mode
const CONSOLE_TICK_SECONDS: f32 = 1.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    if std::env::args().any(|a| a == "--console") {
        run_console();
        return;
    }

    println!("=== Starmap Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Config parsing & validation
    results.extend(validate_config(verbose));

    // 2. Galaxy generation
    results.extend(validate_generation(verbose));

    // 3. Hyperlane graph & admin commands
    results.extend(validate_hyperlanes(verbose));

    // 4. Capture & ownership sweep
    results.extend(validate_ownership(verbose));

    // 5. Console refresh cadence
    results.extend(validate_console_refresh(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn sample_config() -> StarmapConfig {
    match StarmapConfig::from_json_str(CONFIG_JSON) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("bundled config rejected, using defaults: {}", e);
            StarmapConfig::default()
        }
    }
}

fn generated_engine(config: StarmapConfig) -> GalaxyEngine {
    let mut rng = StdRng::seed_from_u64(config.galaxy.seed);
    let mut engine = GalaxyEngine::new(config);
    engine.generate(&mut rng);
    engine
}

// ── Console mode ────────────────────────────────────────────────────────

/// Read admin commands from stdin, one per line, ticking the simulation
/// between commands.
fn run_console() {
    let config = match StarmapConfig::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let mut engine = generated_engine(config);
    println!(
        "starmap console: {} stars, {} hyperlanes. Commands: {}",
        engine.star_count(),
        engine.registry.edges().len(),
        AdminCommand::NAMES.join(", ")
    );

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::warn!("stopped reading commands: {}", e);
                break;
            }
        };
        for message in run_line(&mut engine, &line) {
            if message.is_error {
                eprintln!("{}", message.fallback_text());
            } else {
                println!("{}", message.fallback_text());
            }
        }
        engine.update(CONSOLE_TICK_SECONDS);
    }

    log::info!(
        "console closed after {:.0}s simulated, {} console refreshes",
        engine.sim_time(),
        engine.consoles().refreshes
    );
}

// ── 1. Config ───────────────────────────────────────────────────────────

fn validate_config(verbose: bool) -> Vec<TestResult> {
    println!("--- Config ---");
    let mut results = Vec::new();

    let config = match StarmapConfig::from_json_str(CONFIG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "config_parse".into(),
                passed: false,
                detail: format!("config error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "config_parse".into(),
        passed: true,
        detail: format!(
            "{} stars, seed {}, {} special sectors",
            config.galaxy.star_count,
            config.galaxy.seed,
            config.special_sectors.len()
        ),
    });

    // Partial JSON falls back to defaults field by field
    let partial = StarmapConfig::from_json_str(r#"{ "hyperlane_neighbors": 5 }"#);
    let defaults = StarmapConfig::default();
    results.push(TestResult {
        name: "config_partial_defaults".into(),
        passed: partial.as_ref().is_ok_and(|c| {
            c.hyperlane_neighbors == 5
                && c.hyperlane_max_distance == defaults.hyperlane_max_distance
                && c.control_grid_id == defaults.control_grid_id
        }),
        detail: "missing fields keep their defaults".into(),
    });

    // Invalid values are rejected
    let bad = [
        r#"{ "ownership_recompute_interval": 0.0 }"#,
        r#"{ "star_distance_min": 20.0, "star_distance_max": 10.0 }"#,
        r#"{ "control_grid_id": "  " }"#,
        r#"{ "hyperlane_neighbors": "three" }"#,
    ];
    let rejected = bad
        .iter()
        .filter(|json| StarmapConfig::from_json_str(json).is_err())
        .count();
    results.push(TestResult {
        name: "config_rejects_invalid".into(),
        passed: rejected == bad.len(),
        detail: format!("{}/{} invalid configs rejected", rejected, bad.len()),
    });

    if verbose {
        println!(
            "  lanes: k={} within {:.0}, recompute every {:.0}s, control grid '{}'",
            config.hyperlane_neighbors,
            config.hyperlane_max_distance,
            config.ownership_recompute_interval,
            config.control_grid_id
        );
    }

    results
}

// ── 2. Galaxy Generation ────────────────────────────────────────────────

fn validate_generation(verbose: bool) -> Vec<TestResult> {
    println!("--- Galaxy Generation ---");
    let mut results = Vec::new();

    let config = sample_config();
    let expected = config.galaxy.star_count as usize;
    let engine = generated_engine(config.clone());
    let stars = engine.collect_stars();

    results.push(TestResult {
        name: "generation_star_count".into(),
        passed: stars.len() == expected,
        detail: format!("{} stars (expected {})", stars.len(), expected),
    });

    let names: HashSet<&str> = stars.iter().map(|s| s.name.as_str()).collect();
    results.push(TestResult {
        name: "generation_unique_names".into(),
        passed: names.len() == stars.len(),
        detail: format!("{} distinct names", names.len()),
    });

    let maps: BTreeSet<MapId> = stars.iter().map(|s| s.map).collect();
    results.push(TestResult {
        name: "generation_unique_maps".into(),
        passed: maps.len() == stars.len() && !maps.contains(&MapId::NULLSPACE),
        detail: "every star has its own non-nullspace map".into(),
    });

    let unplaced: Vec<_> = stars.iter().filter(|s| !s.is_placed()).collect();
    results.push(TestResult {
        name: "generation_all_placed".into(),
        passed: unplaced.is_empty(),
        detail: format!("{} stars without a galaxy position", unplaced.len()),
    });

    // Special sectors land on their pinned positions
    let mut pinned_ok = true;
    for special in &config.special_sectors {
        let star = stars.iter().find(|s| s.name == special.id);
        if star.map(|s| s.global_position) != Some(special.position) {
            pinned_ok = false;
        }
    }
    results.push(TestResult {
        name: "generation_special_pinned".into(),
        passed: pinned_ok,
        detail: format!("{} special sectors pinned", config.special_sectors.len()),
    });

    let without_grid: Vec<MapId> = maps
        .iter()
        .copied()
        .filter(|map| engine.control_grid(*map).is_none())
        .collect();
    results.push(TestResult {
        name: "generation_control_grids".into(),
        passed: without_grid.is_empty(),
        detail: format!("{} systems without a control grid", without_grid.len()),
    });

    // Same seed, same galaxy
    let again = generated_engine(config);
    results.push(TestResult {
        name: "generation_deterministic".into(),
        passed: again.collect_stars() == stars,
        detail: "same seed reproduces the star list".into(),
    });

    if verbose {
        for star in stars.iter() {
            println!(
                "  {:>3} {:<20} {}",
                star.map, star.name, star.global_position
            );
        }
    }

    results
}

// ── 3. Hyperlanes ───────────────────────────────────────────────────────

fn validate_hyperlanes(verbose: bool) -> Vec<TestResult> {
    println!("--- Hyperlanes ---");
    let mut results = Vec::new();

    let config = sample_config();
    let max_distance = config.hyperlane_max_distance;
    let mut engine = generated_engine(config);
    let edges = engine.registry.edges();

    results.push(TestResult {
        name: "hyperlane_natural_exist".into(),
        passed: !edges.is_empty(),
        detail: format!("{} natural hyperlanes", edges.len()),
    });

    let too_long: Vec<_> = edges
        .iter()
        .filter(|e| {
            match (engine.registry.star(e.a), engine.registry.star(e.b)) {
                (Some(a), Some(b)) => a.global_position.distance(&b.global_position) > max_distance,
                _ => true,
            }
        })
        .collect();
    results.push(TestResult {
        name: "hyperlane_max_distance".into(),
        passed: too_long.is_empty(),
        detail: format!("{} lanes longer than {:.0}", too_long.len(), max_distance),
    });

    let self_loops = edges.iter().filter(|e| e.a == e.b).count();
    let symmetric = edges
        .iter()
        .all(|e| engine.registry.hyperlanes().is_connected(e.b, e.a));
    results.push(TestResult {
        name: "hyperlane_undirected".into(),
        passed: self_loops == 0 && symmetric,
        detail: "no self loops, every lane reads both ways".into(),
    });

    // Pick two stars with no lane between them
    let stars = engine.collect_stars();
    let unlinked = stars.iter().flat_map(|a| stars.iter().map(move |b| (a.map, b.map))).find(
        |(a, b)| a < b && engine.registry.hyperlane_state(*a, *b).is_none(),
    );

    match unlinked {
        Some((a, b)) => {
            let add = run_line(&mut engine, &format!("hyperline {} {}", a, b));
            let again = run_line(&mut engine, &format!("hyperline {} {}", b, a));
            results.push(TestResult {
                name: "hyperlane_admin_add".into(),
                passed: keys(&add) == ["cmd-hypeline-added"]
                    && keys(&again) == ["cmd-hypeline-exists"]
                    && engine.registry.hyperlane_state(a, b) == Some(EdgeOverride::ForcedOpen),
                detail: format!("{} <-> {} forced open once", a, b),
            });

            let remove = run_line(&mut engine, &format!("unhyperline {} {}", a, b));
            let readd = run_line(&mut engine, &format!("hyperline {} {}", a, b));
            results.push(TestResult {
                name: "hyperlane_admin_block".into(),
                passed: keys(&remove) == ["cmd-unhyperline-removed"]
                    && keys(&readd) == ["cmd-hypeline-blocked"]
                    && !engine.registry.hyperlanes().is_connected(a, b),
                detail: format!("{} <-> {} blocked until regenerated", a, b),
            });

            let regen = run_line(&mut engine, "regenhyperline");
            results.push(TestResult {
                name: "hyperlane_admin_regen".into(),
                passed: keys(&regen) == ["cmd-regenhyperline-done"]
                    && engine.registry.hyperlanes().override_count() == 0
                    && engine.registry.hyperlane_state(a, b).is_none(),
                detail: "regenhyperline clears every override".into(),
            });
        }
        None => results.push(TestResult {
            name: "hyperlane_admin_add".into(),
            passed: false,
            detail: "galaxy is fully connected, no pair to test".into(),
        }),
    }

    // Validation failures leave the graph alone
    let before = engine.registry.hyperlanes().override_count();
    let rejected = [
        ("hyperline 1", "shell-wrong-arguments-number"),
        ("hyperline one 2", "shell-invalid-map-id"),
        ("hyperline 1 9999", "cmd-hypeline-star-not-found"),
        ("unhyperline 2 2", "cmd-hypeline-same-star"),
        ("warp 1 2", "shell-unknown-command"),
    ];
    let all_rejected = rejected.iter().all(|(line, key)| {
        let out = run_line(&mut engine, line);
        out.len() == 1 && out[0].is_error && out[0].key == *key
    });
    results.push(TestResult {
        name: "hyperlane_admin_validation".into(),
        passed: all_rejected && engine.registry.hyperlanes().override_count() == before,
        detail: format!("{} malformed commands rejected", rejected.len()),
    });

    if verbose {
        let mut degree: BTreeMap<MapId, usize> = BTreeMap::new();
        for edge in engine.registry.edges() {
            *degree.entry(edge.a).or_default() += 1;
            *degree.entry(edge.b).or_default() += 1;
        }
        println!("  Lane degree per system:");
        for (map, count) in &degree {
            println!("    {:>3}: {}", map, count);
        }
    }

    results
}

fn keys(messages: &[ConsoleMessage]) -> Vec<&'static str> {
    messages.iter().map(|m| m.key).collect()
}

// ── 4. Capture & Ownership ──────────────────────────────────────────────

const FACTIONS: [(&str, &str); 3] = [
    ("Syndicate", "#FF0000"),
    ("Concord", "#00FFFF"),
    ("Drifters", "#D0D020"),
];

fn validate_ownership(verbose: bool) -> Vec<TestResult> {
    println!("--- Capture & Ownership ---");
    let mut results = Vec::new();

    let config = sample_config();
    let seed = config.galaxy.seed;
    let interval = config.ownership_recompute_interval;
    let mut engine = generated_engine(config);
    let maps: Vec<MapId> = engine.collect_stars().iter().map(|s| s.map).collect();
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));

    // One capture marker per system, toggled at random
    let markers: Vec<_> = maps
        .iter()
        .filter_map(|map| engine.start_capture(*map, None))
        .collect();

    let mut capture_mismatches = 0;
    let mut foreign_owners = 0;
    let mut capture_color_flips = 0;
    let mut ticks = 0;
    let mut active: Vec<bool> = vec![true; markers.len()];

    for step in 0..600 {
        // Occasionally plant or pull a banner
        if rng.gen_bool(0.05) {
            let map = maps[rng.gen_range(0..maps.len())];
            let (faction, color) = FACTIONS[rng.gen_range(0..FACTIONS.len())];
            let color = if rng.gen_bool(0.2) { None } else { Some(color) };
            engine.plant_banner(map, faction, color);
        }
        if rng.gen_bool(0.02) {
            let banner = engine
                .world
                .query::<&SectorBanner>()
                .iter()
                .map(|(entity, _)| entity)
                .next();
            if let Some(banner) = banner {
                engine.remove_banner(banner);
            }
        }
        for (idx, marker) in markers.iter().enumerate() {
            if rng.gen_bool(0.1) {
                active[idx] = !active[idx];
                engine.set_capturing(*marker, active[idx]);
            }
        }

        let colors_before: BTreeMap<MapId, String> = engine.ownership.color_overrides().clone();
        let capturing_before = engine.ownership.capturing_maps().clone();
        let dt = if step % 50 == 0 { interval } else { rng.gen_range(0.1..3.0) };
        engine.update(dt);
        ticks += 1;

        let expected: BTreeSet<MapId> = maps
            .iter()
            .zip(&active)
            .filter(|(_, on)| **on)
            .map(|(map, _)| *map)
            .collect();
        if engine.ownership.capturing_maps() != &expected {
            capture_mismatches += 1;
        }

        if engine
            .ownership
            .owner_by_map()
            .keys()
            .any(|map| !maps.contains(map))
        {
            foreign_owners += 1;
        }

        // A system captured on both sides of the tick keeps its color
        for map in capturing_before.intersection(engine.ownership.capturing_maps()) {
            if colors_before.get(map) != engine.ownership.color_overrides().get(map) {
                capture_color_flips += 1;
            }
        }
    }

    results.push(TestResult {
        name: "ownership_capturing_set".into(),
        passed: capture_mismatches == 0,
        detail: format!("{} mismatched ticks out of {}", capture_mismatches, ticks),
    });
    results.push(TestResult {
        name: "ownership_known_systems".into(),
        passed: foreign_owners == 0,
        detail: "owners only name collected stars".into(),
    });
    results.push(TestResult {
        name: "ownership_sticky_colors".into(),
        passed: capture_color_flips == 0,
        detail: format!("{} color changes during ongoing captures", capture_color_flips),
    });

    // A full recompute from the same world reproduces the owners
    let owners_before = engine.ownership.owner_by_map().clone();
    engine.recompute_ownership();
    let query = EcsQuery::new(&engine.world, &engine.config().control_grid_id);
    let from_world: BTreeMap<MapId, String> = maps
        .iter()
        .filter_map(|map| query.resolve_claim(*map).map(|claim| (*map, claim.faction)))
        .collect();
    results.push(TestResult {
        name: "ownership_matches_world".into(),
        passed: engine.ownership.owner_by_map() == &from_world,
        detail: format!(
            "{} owned systems ({} before final recompute)",
            from_world.len(),
            owners_before.len()
        ),
    });

    if verbose {
        println!("  Final ownership:");
        for (map, owner) in engine.ownership.owner_by_map() {
            println!(
                "    {:>3}: {:<10} {}",
                map,
                owner,
                engine.ownership.color_of(*map).unwrap_or("-")
            );
        }
    }

    results
}

// ── 5. Console Refresh ──────────────────────────────────────────────────

fn validate_console_refresh(_verbose: bool) -> Vec<TestResult> {
    println!("--- Console Refresh ---");
    let mut results = Vec::new();

    let mut engine = generated_engine(sample_config());
    let baseline = engine.consoles().refreshes;

    // Quiet ticks push nothing
    for _ in 0..10 {
        engine.update(0.5);
    }
    results.push(TestResult {
        name: "refresh_quiet_ticks".into(),
        passed: engine.consoles().refreshes == baseline,
        detail: "no changes, no pushes".into(),
    });

    // A capture start pushes exactly once
    let map = engine.collect_stars()[0].map;
    engine.start_capture(map, Some("#123456"));
    engine.update(0.5);
    engine.update(0.5);
    results.push(TestResult {
        name: "refresh_on_capture".into(),
        passed: engine.consoles().refreshes == baseline + 1,
        detail: "capture start pushes one update".into(),
    });

    let view_ok = engine.consoles().last_view.as_ref().is_some_and(|view| {
        view.overlay.capturing_maps == vec![map]
            && view.overlay.color_override_by_map.get(&map).map(String::as_str) == Some("#123456")
    });
    results.push(TestResult {
        name: "refresh_view_overlay".into(),
        passed: view_ok,
        detail: "pushed view carries the capture overlay".into(),
    });

    // The view serializes for clients
    let json = engine
        .consoles()
        .last_view
        .as_ref()
        .and_then(|view| serde_json::to_string(view).ok());
    results.push(TestResult {
        name: "refresh_view_json".into(),
        passed: json.as_deref().is_some_and(|j| j.contains("\"stars\"")),
        detail: format!("{} bytes of JSON", json.map_or(0, |j| j.len())),
    });

    results
}
