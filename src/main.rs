//! Marble Maze native entry point
//!
//! There is no native renderer; this validates the bundled levels and plays a
//! short scripted session against the headless host so the core can be
//! exercised from a terminal.

use glam::{Vec2, Vec3};

use marble_maze::consts::SIM_DT;
use marble_maze::platform::HeadlessHost;
use marble_maze::sim::{
    BundledLevels, EntityKind, GamePhase, LevelError, LevelId, PointerGravity, TiltGravity,
    load_level,
};
use marble_maze::{MazeScene, Tuning};

fn main() {
    env_logger::init();
    log::info!("Marble Maze (native) starting...");

    let tuning = Tuning::load("tuning.json");
    if let Err(e) = run(tuning) {
        // Level data ships with the game; a bad level is a broken build
        log::error!("{e}");
        eprintln!("fatal: {e}");
        std::process::exit(1);
    }
}

fn run(tuning: Tuning) -> Result<(), LevelError> {
    for id in BundledLevels::ids() {
        let level = load_level(&BundledLevels, id, tuning.cell_size)?;
        println!(
            "✓ {id}: {} walls, {} vortices, {} stars, {} teleporters, {} exits",
            level.count(EntityKind::Wall),
            level.count(EntityKind::Vortex),
            level.count(EntityKind::Star),
            level.count(EntityKind::TeleportEntrance),
            level.count(EntityKind::TeleportExit),
        );
    }

    let seed = 0x6d61_7a65;
    let mut scene = MazeScene::start(HeadlessHost::default(), BundledLevels, LevelId(1), seed, tuning)?;
    let mut tilt = TiltGravity::new(scene.tuning().tilt_scale);
    tilt.set_reading(Vec3::new(-0.3, 0.1, -0.9));
    scene.update(SIM_DT, &tilt)?;
    println!("Gravity from tilt: {}", scene.gravity());

    let mut pointer = PointerGravity::new(scene.tuning().pointer_divisor);
    pointer.pointer_moved(scene.state().player.pos + Vec2::new(200.0, 0.0));
    scene.update(SIM_DT, &pointer)?;
    println!("Gravity from pointer: {}", scene.gravity());

    // Touch each kind of pickup/hazard once, as the physics host would report it
    for kind in [EntityKind::Star, EntityKind::Vortex, EntityKind::Finish] {
        let Some(target) = scene
            .state()
            .level
            .entities
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.id)
        else {
            continue;
        };
        let player = scene.state().player.id;
        scene.contact_began(player, target);
        println!("Touched {kind:?}: phase {:?}, {}", scene.state().phase, scene.state().score_label());

        let mut frames = 0;
        while scene.state().phase != GamePhase::Playing && frames < 1000 {
            scene.update(SIM_DT, &tilt)?;
            frames += 1;
        }
        println!("  back to play after {frames} frames on {}", scene.state().level.id);
    }

    println!(
        "Session done: {}, {} proxies live, {} host commands",
        scene.state().score_label(),
        scene.host().entity_count(),
        scene.host().commands().len()
    );
    Ok(())
}
