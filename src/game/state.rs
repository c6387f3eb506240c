//! Phase state management - row growth, win/loss rules, reset.
//!
//! Win: the cumulative popped-bubble count reaches the configured
//! threshold. Lose: any settled bubble reaches the loss line, whether
//! from a landing or from the periodic row advance. GameOver and Win
//! freeze all gameplay mutation until an explicit reset.

use bevy::prelude::*;

use super::{
    aim::AimVector,
    bubble::Bubble,
    config::GameConfig,
    grid::Grid,
    popper::BubblesPruned,
    projectile::Projectile,
    spawner::{random_color, spawn_row, LoadedColor, NextColor},
};
use crate::AppSystems;

pub(super) fn plugin(app: &mut App) {
    app.init_state::<GamePhase>();
    app.init_resource::<PopCount>();
    app.init_resource::<RowTimer>();
    app.register_type::<PopCount>();
    app.add_message::<EnterPlay>();
    app.add_message::<ResetGame>();

    app.add_systems(
        Update,
        advance_rows.in_set(AppSystems::TickTimers).run_if(playing),
    );
    app.add_systems(
        Update,
        (
            enter_play.run_if(in_state(GamePhase::Loading)),
            reset_game,
        )
            .chain()
            .in_set(AppSystems::RecordInput),
    );
    app.add_systems(
        Update,
        (tally_pruned, check_loss).chain().in_set(RuleSystems).run_if(playing),
    );
}

/// System set for the win/loss rules. Runs after every other grid
/// mutation a frame can produce; the loss check is deliberately last,
/// so a simultaneous breach outranks a win.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleSystems;

/// The gameplay phases.
///
/// `Loading → Aiming ⇄ Shot → {Aiming | GameOver | Win}`; the terminal
/// phases return to Aiming only through [`ResetGame`].
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum GamePhase {
    #[default]
    Loading,
    Aiming,
    Shot,
    GameOver,
    Win,
}

/// Run condition: gameplay is live (aiming or shooting).
pub fn playing(phase: Res<State<GamePhase>>) -> bool {
    matches!(phase.get(), GamePhase::Aiming | GamePhase::Shot)
}

/// Signal from the loading collaborator that play may begin.
/// Only honored while in the Loading phase.
#[derive(Message, Debug, Clone)]
pub struct EnterPlay;

/// Command to restart. Valid from any phase; drops the projectile and
/// any in-flight pops, rebuilds a one-row grid, and returns to Aiming.
#[derive(Message, Debug, Clone)]
pub struct ResetGame;

/// Cumulative count of popped bubbles. Only ever increases, and only
/// by a whole matched set at a time.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct PopCount {
    pub popped: u32,
}

/// Timer driving the periodic grid advance.
#[derive(Resource, Debug)]
pub struct RowTimer(pub Timer);

impl FromWorld for RowTimer {
    fn from_world(world: &mut World) -> Self {
        let interval = world.resource::<GameConfig>().row_interval_secs;
        Self(Timer::from_seconds(interval, TimerMode::Repeating))
    }
}

/// Turn the external enter-play signal into a fresh game.
fn enter_play(mut enters: MessageReader<EnterPlay>, mut resets: MessageWriter<ResetGame>) {
    if !enters.is_empty() {
        enters.clear();
        resets.write(ResetGame);
    }
}

/// Reinitialize the whole simulation: one fresh row, fresh colors,
/// cleared counters and aim, phase back to Aiming.
fn reset_game(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut grid: ResMut<Grid>,
    mut pop_count: ResMut<PopCount>,
    mut aim: ResMut<AimVector>,
    mut timer: ResMut<RowTimer>,
    mut loaded: ResMut<LoadedColor>,
    mut next_color: ResMut<NextColor>,
    entities: Query<Entity, Or<(With<Bubble>, With<Projectile>)>>,
    mut resets: MessageReader<ResetGame>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    if resets.is_empty() {
        return;
    }
    resets.clear();

    for entity in &entities {
        commands.entity(entity).despawn();
    }
    grid.clear();
    pop_count.popped = 0;
    aim.0 = None;
    timer.0 = Timer::from_seconds(config.row_interval_secs, TimerMode::Repeating);
    loaded.0 = random_color(&config.palette);
    next_color.0 = random_color(&config.palette);

    spawn_row(&mut commands, &mut grid, &config);
    next_phase.set(GamePhase::Aiming);

    info!("game reset: fresh row of {} bubbles", config.columns());
}

/// Periodically advance the grid one row toward the loss line.
///
/// Every settled bubble shifts down a cell, then a fresh full-width row
/// fills the top. The loss check later this frame sees the result
/// immediately, so a breaching advance ends the game even mid-Shot.
fn advance_rows(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut grid: ResMut<Grid>,
    mut timer: ResMut<RowTimer>,
    mut bubbles: Query<(&mut Bubble, &mut Transform)>,
) {
    timer.0.tick(time.delta());
    if !timer.0.just_finished() {
        return;
    }

    grid.shift_down();
    for (mut bubble, mut transform) in &mut bubbles {
        bubble.cell.row += 1;
        transform.translation.y += config.cell_size;
    }
    spawn_row(&mut commands, &mut grid, &config);

    info!("grid advanced, lowest row now {:?}", grid.lowest_row());
}

/// Fold pruned sets into the pop counter and check the win rule
/// immediately after each increment.
fn tally_pruned(
    config: Res<GameConfig>,
    mut pop_count: ResMut<PopCount>,
    mut pruned_events: MessageReader<BubblesPruned>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    for event in pruned_events.read() {
        pop_count.popped += event.count;
        info!("popped {} bubbles ({} total)", event.count, pop_count.popped);

        if pop_count.popped >= config.win_threshold {
            info!("WIN! {} bubbles popped", pop_count.popped);
            next_phase.set(GamePhase::Win);
        }
    }
}

/// End the game when any settled bubble reaches the loss line.
fn check_loss(
    config: Res<GameConfig>,
    grid: Res<Grid>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    if grid.breaches_line(&config) {
        info!("GAME OVER! grid reached the loss line");
        next_phase.set(GamePhase::GameOver);
    }
}
