use crate::config::SessionConfig;
use crate::script::{ScriptCommand, ScriptPlayer};
use crate::vitals::Vitals;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use serde_json::json;
use std::path::PathBuf;
use terra2d_core::{world_rng, BlockKind, RngStream, SimTick};
use terra2d_physics::{Body, PhysicsConfig};
use terra2d_testkit::{EventRecord, JsonlSink, MetricsReportBuilder, MetricsSink, SessionMetrics};
use terra2d_world::{
    follow_camera, visible_columns, BreakOutcome, EditError, GeneratedWorld, Inventory,
    WorldGenerator,
};
use tracing::{debug, info, warn};

pub struct HeadlessConfig {
    pub session: SessionConfig,
    pub script: Option<PathBuf>,
    pub max_ticks: Option<u64>,
}

/// One actor in one generated world, advanced a tick at a time.
pub struct Session {
    world: GeneratedWorld,
    physics: PhysicsConfig,
    view_width: f32,
    body: Body,
    inventory: Inventory,
    vitals: Vitals,
    actor_rng: StdRng,
    tick: SimTick,
    metrics: SessionMetrics,
    events: Vec<EventRecord>,
}

impl Session {
    pub fn new(cfg: &SessionConfig) -> Self {
        let mut world = WorldGenerator::new(cfg.world.clone()).generate();
        world.grid.take_dirty();

        let physics = cfg.physics;
        let column = cfg
            .session
            .spawn_column
            .unwrap_or(world.grid.width() / 2);
        let (x, y) = world.spawn_point(column, physics.tile_size, physics.actor_height);
        let body = Body::new(x, y, &physics);
        info!(seed = cfg.world.seed, column, x, y, "actor spawned");

        let mut session = Self {
            world,
            physics,
            view_width: cfg.session.view_width,
            body,
            inventory: Inventory::new(),
            vitals: Vitals::new(),
            actor_rng: world_rng(cfg.world.seed, RngStream::Actor),
            tick: SimTick::ZERO,
            metrics: SessionMetrics::default(),
            events: Vec::new(),
        };
        session.record("spawn", json!({ "column": column, "x": x, "y": y }));
        session
    }

    pub fn tick(&self) -> SimTick {
        self.tick
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn world(&self) -> &GeneratedWorld {
        &self.world
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn metrics(&self) -> SessionMetrics {
        SessionMetrics {
            ticks: self.tick.0,
            final_position: self.body.position().to_array(),
            final_health: self.vitals.health,
            final_hunger: self.vitals.hunger,
            ..self.metrics.clone()
        }
    }

    fn record(&mut self, kind: &str, payload: serde_json::Value) {
        self.events
            .push(EventRecord::new(self.tick, kind, payload.to_string()));
    }

    fn target(&self, dx: i32, dy: i32) -> (i32, i32) {
        let (x, y) = self.body.tile(self.physics.tile_size);
        (x + dx, y + dy)
    }

    fn break_at(&mut self, dx: i32, dy: i32) {
        let (x, y) = self.target(dx, dy);
        match self.inventory.apply_break(&mut self.world.grid, x, y) {
            Ok(BreakOutcome::Broken(kind)) => {
                self.metrics.blocks_broken += 1;
                self.record("break", json!({ "x": x, "y": y, "broken": kind.name() }));
            }
            Ok(BreakOutcome::Damaged { remaining }) => {
                self.record("hit", json!({ "x": x, "y": y, "remaining": remaining }));
            }
            Ok(BreakOutcome::Unbreakable) => {
                self.record("hit", json!({ "x": x, "y": y, "unbreakable": true }));
            }
            Err(err) => self.reject("break_rejected", x, y, err),
        }
    }

    fn place_at(&mut self, dx: i32, dy: i32, kind: BlockKind) {
        let (x, y) = self.target(dx, dy);
        if self.body.overlaps_tile(x, y, self.physics.tile_size) {
            self.record(
                "place_rejected",
                json!({ "x": x, "y": y, "reason": "cell overlaps the actor" }),
            );
            return;
        }
        match self.inventory.place_kind(&mut self.world.grid, x, y, kind) {
            Ok(()) => {
                self.metrics.blocks_placed += 1;
                self.record("place", json!({ "x": x, "y": y, "kind": kind.name() }));
            }
            Err(err) => self.reject("place_rejected", x, y, err),
        }
    }

    fn reject(&mut self, kind: &str, x: i32, y: i32, err: EditError) {
        debug!(kind, x, y, %err, "edit rejected");
        self.record(kind, json!({ "x": x, "y": y, "reason": err.to_string() }));
    }

    /// Apply one scripted command and advance physics by one tick.
    pub fn step(&mut self, command: ScriptCommand) {
        match command {
            ScriptCommand::Break { dx, dy } => self.break_at(dx, dy),
            ScriptCommand::Place { dx, dy, kind } => self.place_at(dx, dy, kind),
            ScriptCommand::Select(kind) => match self.inventory.select(kind) {
                Ok(()) => self.record("select", json!({ "kind": kind.name() })),
                Err(err) => self.record("select_rejected", json!({ "reason": err.to_string() })),
            },
            ScriptCommand::Idle
            | ScriptCommand::Left
            | ScriptCommand::Right
            | ScriptCommand::Jump => {}
        }
        if self.world.grid.take_dirty() {
            debug!(tick = self.tick.0, "world changed");
        }

        let was_on_ground = self.body.on_ground;
        let res = self.body.step(command.intent(), &self.world.grid, &self.physics);
        if res.landed_on_ground && !was_on_ground {
            self.metrics.landings += 1;
            self.record("landed", json!({ "x": res.x, "y": res.y }));
        }
        if self.vitals.tick(&mut self.actor_rng) {
            self.record("hunger", json!({ "hunger": self.vitals.hunger }));
        }

        self.tick = self.tick.advance(1);
    }

    /// ASCII view of the columns around the actor; the actor is drawn as `@`.
    pub fn frame(&self) -> String {
        let ts = self.physics.tile_size;
        let grid = &self.world.grid;
        let world_pixel_width = grid.width() as f32 * ts;
        let camera_x = follow_camera(self.body.center().x, self.view_width, world_pixel_width);
        let columns = visible_columns(camera_x, self.view_width, ts, grid.width());

        let mut out = String::with_capacity((columns.len() + 1) * grid.height());
        for y in 0..grid.height() as i32 {
            for x in columns.clone() {
                let x = x as i32;
                if self.body.overlaps_tile(x, y, ts) {
                    out.push('@');
                } else {
                    out.push(grid.kind(x, y).map_or(' ', |kind| kind.glyph()));
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Run a full headless session and write its event log and metrics.
pub fn run(cfg: HeadlessConfig) -> Result<Session> {
    let mut script = cfg
        .script
        .as_deref()
        .map(ScriptPlayer::from_path)
        .transpose()?;
    let ticks = cfg
        .max_ticks
        .or_else(|| script.as_ref().map(ScriptPlayer::len_ticks))
        .unwrap_or(cfg.session.session.ticks);

    let mut session = Session::new(&cfg.session);
    for _ in 0..ticks {
        let command = script
            .as_mut()
            .and_then(|s| s.command_for(session.tick()))
            .unwrap_or(ScriptCommand::Idle);
        session.step(command);
    }
    if script.as_ref().is_some_and(|s| !s.is_finished()) {
        warn!(ticks, "session ended before the script finished");
    }
    info!(
        ticks,
        events = session.events().len(),
        "headless session finished"
    );

    if let Some(path) = &cfg.session.session.events_path {
        let mut sink = JsonlSink::create(path)
            .with_context(|| format!("failed to create event log {}", path.display()))?;
        for event in session.events() {
            sink.write(event)?;
        }
        sink.flush()?;
    }

    if let Some(path) = &cfg.session.session.metrics_path {
        let report = MetricsReportBuilder::new("headless_session")
            .session(session.metrics())
            .build();
        MetricsSink::create(path)
            .and_then(|sink| sink.write(&report))
            .with_context(|| format!("failed to write metrics {}", path.display()))?;
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra2d_core::Cell;
    use terra2d_testkit::read_events;
    use terra2d_world::{HeightMap, WorldGrid};

    const WIDTH: usize = 40;
    const HEIGHT: usize = 30;

    fn small_config() -> SessionConfig {
        let mut cfg = SessionConfig::default();
        cfg.world = cfg.world.with_seed(7).with_size(WIDTH, HEIGHT);
        cfg.world.vegetation.tree_chance = 0.0;
        cfg
    }

    /// Dirt on row 20, stone below; the actor stands on column 20.
    fn flat_session() -> Session {
        let mut session = Session::new(&small_config());
        let mut grid = WorldGrid::new(WIDTH, HEIGHT);
        for x in 0..WIDTH as i32 {
            grid.set(x, 20, Cell::new(BlockKind::Dirt)).unwrap();
            for y in 21..HEIGHT as i32 {
                grid.set(x, y, Cell::new(BlockKind::Stone)).unwrap();
            }
        }
        session.world.grid = grid;
        session.world.height_map = HeightMap::flat(WIDTH, 19);
        session.world.trees.clear();
        let (x, y) = session.world.spawn_point(20, 32.0, 64.0);
        session.body = Body::new(x, y, &session.physics);
        session
    }

    /// Most recent break/place/select event.
    fn last_edit(session: &Session) -> &EventRecord {
        session
            .events()
            .iter()
            .rev()
            .find(|e| !matches!(e.kind.as_str(), "hunger" | "landed"))
            .unwrap()
    }

    #[test]
    fn generated_session_settles_on_ground() {
        let mut session = Session::new(&small_config());
        for _ in 0..30 {
            session.step(ScriptCommand::Idle);
        }
        assert!(session.body().on_ground);
        assert_eq!(session.events()[0].kind, "spawn");
        assert_eq!(session.metrics().ticks, 30);
    }

    #[test]
    fn first_landing_is_recorded_once() {
        let mut session = flat_session();
        for _ in 0..5 {
            session.step(ScriptCommand::Idle);
        }
        assert_eq!(session.body().position().y, 576.0);
        let metrics = session.metrics();
        assert_eq!(metrics.landings, 1);
        assert_eq!(metrics.final_health, 100);
        assert!(metrics.final_hunger <= 100);
        assert_eq!(metrics.final_position, [640.0, 576.0]);
        let landed: Vec<_> = session
            .events()
            .iter()
            .filter(|e| e.kind == "landed")
            .collect();
        assert_eq!(landed.len(), 1);
        assert_eq!(landed[0].tick, SimTick(0));
    }

    #[test]
    fn broken_block_can_be_placed_back() {
        let mut session = flat_session();
        session.step(ScriptCommand::Idle);
        session.step(ScriptCommand::Break { dx: 0, dy: 1 });
        assert_eq!(session.world().grid.kind(20, 20).unwrap(), BlockKind::Air);
        assert_eq!(session.inventory().count(BlockKind::Dirt), 1);

        session.step(ScriptCommand::Place {
            dx: 1,
            dy: 0,
            kind: BlockKind::Dirt,
        });
        assert_eq!(session.world().grid.kind(21, 19).unwrap(), BlockKind::Dirt);
        assert_eq!(session.inventory().count(BlockKind::Dirt), 0);

        let metrics = session.metrics();
        assert_eq!(metrics.blocks_broken, 1);
        assert_eq!(metrics.blocks_placed, 1);
    }

    #[test]
    fn stone_takes_several_hits() {
        let mut session = flat_session();
        session.step(ScriptCommand::Idle);
        session.step(ScriptCommand::Break { dx: 1, dy: 2 });
        assert_eq!(session.world().grid.kind(21, 21).unwrap(), BlockKind::Stone);
        let last = last_edit(&session);
        assert_eq!(last.kind, "hit");
        assert!(last.payload.contains("\"remaining\":2"));
    }

    #[test]
    fn placing_requires_inventory_and_free_cell() {
        let mut session = flat_session();
        session.step(ScriptCommand::Idle);

        session.step(ScriptCommand::Place {
            dx: 1,
            dy: 0,
            kind: BlockKind::Dirt,
        });
        let last = last_edit(&session);
        assert_eq!(last.kind, "place_rejected");
        assert!(last.payload.contains("no dirt left to place"));

        session.step(ScriptCommand::Break { dx: 1, dy: 1 });
        session.step(ScriptCommand::Place {
            dx: 0,
            dy: 0,
            kind: BlockKind::Dirt,
        });
        let last = last_edit(&session);
        assert_eq!(last.kind, "place_rejected");
        assert!(last.payload.contains("overlaps the actor"));
        assert_eq!(session.inventory().count(BlockKind::Dirt), 1);
    }

    #[test]
    fn rejected_place_keeps_selection() {
        let mut session = flat_session();
        session.step(ScriptCommand::Idle);
        session.step(ScriptCommand::Select(BlockKind::Stone));
        session.step(ScriptCommand::Break { dx: 1, dy: 1 });

        // Overlaps the actor.
        session.step(ScriptCommand::Place {
            dx: 0,
            dy: 0,
            kind: BlockKind::Dirt,
        });
        // Nothing of this kind in the inventory.
        session.step(ScriptCommand::Place {
            dx: 1,
            dy: 0,
            kind: BlockKind::Sand,
        });
        assert_eq!(session.inventory().selected(), BlockKind::Stone);

        session.step(ScriptCommand::Place {
            dx: 1,
            dy: 0,
            kind: BlockKind::Dirt,
        });
        assert_eq!(session.inventory().selected(), BlockKind::Dirt);
        assert_eq!(session.world().grid.kind(21, 19).unwrap(), BlockKind::Dirt);
    }

    #[test]
    fn frame_draws_actor_over_world() {
        let session = flat_session();
        let frame = session.frame();
        let rows: Vec<&str> = frame.lines().collect();
        assert_eq!(rows.len(), HEIGHT);
        assert!(rows.iter().all(|row| row.chars().count() == WIDTH));
        assert_eq!(frame.matches('@').count(), 2);
        assert_eq!(rows[18].chars().nth(20), Some('@'));
        assert_eq!(rows[20].chars().nth(20), Some(BlockKind::Dirt.glyph()));
    }

    #[test]
    fn hunger_events_track_vitals() {
        let mut session = flat_session();
        for _ in 0..5000 {
            session.step(ScriptCommand::Idle);
        }
        let drops = session
            .events()
            .iter()
            .filter(|e| e.kind == "hunger")
            .count() as u32;
        assert_eq!(session.vitals().hunger, 100 - drops);
        assert_eq!(session.metrics().final_hunger, session.vitals().hunger);
        assert_eq!(session.vitals().health, 100);
    }

    #[test]
    fn run_writes_events_and_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("walk.txt");
        std::fs::write(&script, "# walk right\n10*right\n5*idle\n").unwrap();

        let mut session_cfg = small_config();
        session_cfg.session.events_path = Some(dir.path().join("events.jsonl"));
        session_cfg.session.metrics_path = Some(dir.path().join("metrics.json"));

        let session = run(HeadlessConfig {
            session: session_cfg,
            script: Some(script),
            max_ticks: None,
        })
        .unwrap();
        assert_eq!(session.tick(), SimTick(15));

        let events = read_events(&dir.path().join("events.jsonl")).unwrap();
        assert_eq!(events, session.events());
        assert!(dir.path().join("metrics.json").exists());
    }
}
