// imu_bridge_sim/src/simulation/core/simulation_setup.rs

use avian3d::prelude::Gravity;

use crate::prelude::*;

pub struct SimulationSetupPlugin;

impl Plugin for SimulationSetupPlugin {
    fn build(&self, app: &mut App) {
        // The scenario is normally inserted by the binary before the plugin is added.
        let config = app
            .world()
            .get_resource::<ScenarioConfig>()
            .cloned()
            .unwrap_or_else(|| {
                warn!("No ScenarioConfig resource found, using defaults");
                ScenarioConfig::default()
            });

        // --- Fixed timestep: the IMU samples once per step ---
        app.insert_resource(Time::<Fixed>::from_hz(config.simulation.physics_rate_hz))
            .insert_resource(Gravity(Vec3::from_array(config.simulation.gravity)))
            .insert_resource(config);

        // --- Scene construction ---
        app.configure_sets(
            OnEnter(AppState::Loading),
            (
                SceneBuildSet::Body,
                SceneBuildSet::Sensors,
                SceneBuildSet::Finalize,
            )
                .chain(),
        )
        .add_systems(
            OnEnter(AppState::Loading),
            transition_to_running.in_set(SceneBuildSet::Finalize),
        );

        // --- Runtime schedule ---
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Actuation,
                SimulationSet::Sensors,
                SimulationSet::Output,
            )
                .chain()
                .run_if(in_state(AppState::Running)),
        )
        .add_systems(
            Update,
            finish_after_duration.run_if(in_state(AppState::Running)),
        )
        .add_systems(OnEnter(AppState::Finished), exit_app);
    }
}

fn transition_to_running(mut next_state: ResMut<NextState<AppState>>) {
    info!("Scene built. Transitioning to Running state.");
    next_state.set(AppState::Running);
}

/// Ends the run once the configured amount of simulated time has passed.
fn finish_after_duration(
    config: Res<ScenarioConfig>,
    time: Res<Time<Fixed>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(duration) = config.simulation.duration_seconds else {
        return;
    };
    if time.elapsed_secs_f64() >= duration {
        info!("Simulated {:.2} s, finishing.", time.elapsed_secs_f64());
        next_state.set(AppState::Finished);
    }
}

fn exit_app(mut exit: EventWriter<AppExit>) {
    exit.write(AppExit::Success);
}
