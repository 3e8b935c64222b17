use super::kinematics::SimulationState;

/// Time until the surface is reached under gravity alone.
pub fn time_to_impact(altitude: f64, velocity: f64, gravity: f64) -> f64 {
    let discriminant = (velocity * velocity + 2.0 * altitude * gravity).max(0.0);
    (discriminant.sqrt() - velocity) / gravity
}

/// Finishes the descent once propellant is gone. Acceleration is constant,
/// so the touchdown is solved in closed form. Returns the step taken.
pub fn solve(state: &mut SimulationState) -> f64 {
    let step = time_to_impact(state.altitude, state.velocity, state.gravity);
    state.velocity += state.gravity * step;
    state.elapsed_time += step;
    state.altitude = 0.0;
    step
}
