//! Agent input rendering.

use crate::game::agent::AgentId;
use crate::game::sample::Sample;
use crate::game::state::World;

const HIDDEN_SAMPLE_DATA: &str = "0 -1 -1 -1 -1 -1 -1";

/// Lines sent once, ahead of the first turn: project count, then one cost
/// line per project.
#[must_use]
pub fn setup_lines(world: &World) -> Vec<String> {
    let mut lines = Vec::with_capacity(world.projects.len() + 1);
    lines.push(world.projects.len().to_string());
    lines.extend(world.projects.iter().map(|p| p.cost.to_line()));
    lines
}

fn sample_line(sample: &Sample, carrier: i32, viewer: AgentId) -> String {
    if sample.visible_to(viewer) {
        format!(
            "{} {carrier} {} {} {} {}",
            sample.id,
            sample.rank,
            sample.reward_code(),
            sample.health,
            sample.cost.to_line()
        )
    } else {
        format!("{} {carrier} {} {HIDDEN_SAMPLE_DATA}", sample.id, sample.rank)
    }
}

/// The per-turn input for `viewer`.
///
/// One line per robot with the viewer first, the bank, then a count and
/// the visible samples: viewer's tray, other trays, shared storage.
#[must_use]
pub fn agent_input(world: &World, viewer: AgentId) -> Vec<String> {
    let order = std::iter::once(viewer).chain((0..world.agents.len()).filter(|&i| i != viewer));

    let mut lines = Vec::new();
    let mut samples = Vec::new();
    for index in order {
        let agent = &world.agents[index];
        lines.push(format!(
            "{} {} {} {} {}",
            agent.target,
            agent.eta,
            agent.score,
            agent.storage.to_line(),
            agent.expertise.to_line()
        ));
        let carrier = if index == viewer { 0 } else { 1 };
        samples.extend(agent.tray.iter().map(|s| sample_line(s, carrier, viewer)));
    }
    samples.extend(world.stored.iter().map(|s| sample_line(s, -1, viewer)));

    lines.push(world.bank.to_line());
    lines.push(samples.len().to_string());
    lines.extend(samples);
    lines
}
