mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::Vec2;
use selement_core::{
    AssetBundle, GameContainer, Player, PlayerAction, PlayerInput, Room, World,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Number of frames to simulate
    #[arg(long, default_value = "3600")]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value = "0.016666668")]
    dt: f32,

    /// RON config file (default: ./selement.ron if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as RON and exit
    #[arg(long)]
    print_config: bool,

    /// Fight the boss in the arena instead of exploring the open world
    #[arg(long)]
    room: bool,

    /// Walk direction as dx,dy (Y grows downward)
    #[arg(long, default_value = "1,0", value_parser = parse_direction, allow_hyphen_values = true)]
    walk: Vec2,
}

fn parse_direction(text: &str) -> Result<Vec2, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected dx,dy, got {text:?}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid component {part:?}: {e}"))
    };
    Ok(Vec2::new(parse(x)?, parse(y)?))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.dt.is_nan() || args.dt <= 0.0 {
        bail!("--dt must be positive, got {}", args.dt);
    }

    let config = config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if args.print_config {
        let text = config
            .to_ron_string()
            .context("Failed to serialize configuration")?;
        println!("{text}");
        return Ok(());
    }
    let assets = Arc::new(AssetBundle::with_placeholder_sprites());

    let mut container: Box<dyn GameContainer> = if args.room {
        let player = Player::new(Vec2::ZERO, &config.player);
        let mut room = Room::new(args.seed, config, assets, player);
        room.start_boss();
        Box::new(room)
    } else {
        Box::new(World::new(args.seed, config, assets))
    };

    log::info!(
        "Simulating {} frames of {:.4}s ({} mode, seed {})",
        args.frames,
        args.dt,
        if args.room { "room" } else { "world" },
        args.seed
    );

    let mut next_report = 1.0;
    let mut elapsed = 0.0;
    for frame in 0..args.frames {
        let input = autopilot(container.as_ref(), args.walk);
        container.update(args.dt, &input);
        elapsed += args.dt;

        if elapsed >= next_report {
            report(container.as_ref(), elapsed);
            next_report += 1.0;
        }

        if !container.player().is_alive() {
            log::info!("Player died after {} frames ({elapsed:.1}s)", frame + 1);
            break;
        }
        if args.room && !container.is_boss_alive() {
            log::info!("Boss defeated after {} frames ({elapsed:.1}s)", frame + 1);
            break;
        }
    }

    report(container.as_ref(), elapsed);
    Ok(())
}

/// Scripted input: walk, shoot the nearest mob in range, charge when out of fire
fn autopilot(container: &dyn GameContainer, walk: Vec2) -> PlayerInput {
    let player = container.player();
    let target = container
        .mobs()
        .iter()
        .filter(|mob| mob.is_alive())
        .map(|mob| (mob.position, mob.position.distance(player.position)))
        .filter(|(_, distance)| *distance <= Player::FIRE_BALL_RANGE)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match target {
        Some(_) if player.elements.fire < Player::FIRE_BALL_COST => PlayerInput::charging(),
        Some((position, _)) => {
            let delta = position - player.position;
            let aim = delta.y.atan2(delta.x).to_degrees();
            PlayerInput::moving(walk).with_action(PlayerAction::FireBall, aim)
        }
        None => PlayerInput::moving(walk),
    }
}

fn report(container: &dyn GameContainer, elapsed: f32) {
    let player = container.player();
    let combat = container.combat();
    log::info!(
        "t={elapsed:.1}s pos=({:.0}, {:.0}) biome={:?} chunks={} mobs={} mob_attacks={} player_attacks={} hp={:.0} fire={}",
        player.position.x,
        player.position.y,
        container.player_biome(),
        container.loaded_chunks(),
        container.mob_count(),
        combat.mob_attacks().len(),
        combat.player_attacks().len(),
        player.health.current(),
        player.elements.fire,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("1,0").unwrap(), Vec2::new(1.0, 0.0));
        assert_eq!(parse_direction(" -0.5 , 2 ").unwrap(), Vec2::new(-0.5, 2.0));
        assert!(parse_direction("1").is_err());
        assert!(parse_direction("a,b").is_err());
    }

    #[test]
    fn test_print_config_flag() {
        let args = Args::try_parse_from(["selement", "--print-config", "--seed", "9"]).unwrap();
        assert!(args.print_config);
        assert_eq!(args.seed, 9);
        assert!(!Args::try_parse_from(["selement"]).unwrap().print_config);
    }

    #[test]
    fn test_autopilot_walks_without_targets() {
        let config = selement_core::SimConfig::default();
        let world = World::new(1, config, Arc::new(AssetBundle::new()));
        let input = autopilot(&world, Vec2::X);
        assert_eq!(input, PlayerInput::moving(Vec2::X));
    }

    #[test]
    fn test_autopilot_charges_when_out_of_fire() {
        let config = selement_core::SimConfig::default();
        let player = Player::new(Vec2::ZERO, &config.player);
        let room = Room::new(1, config, Arc::new(AssetBundle::new()), player);
        // Boss at the origin, player at the entrance 400 px away
        assert_eq!(autopilot(&room, Vec2::X), PlayerInput::charging());
    }
}
