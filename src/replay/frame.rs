//! Frame payloads for the viewer.

use crate::game::World;

/// Name announced in the first frame.
pub const GAME_NAME: &str = "Roche";

/// Static match data carried by frame 0. The first line counts the lines of
/// the payload, itself included.
#[must_use]
pub fn init_view_data(world: &World) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", world.rules.project_bonus, world.rules.league),
        world.projects.len().to_string(),
    ];
    lines.extend(world.projects.iter().map(|p| p.cost.to_line()));
    lines.push(world.stored.len().to_string());
    for sample in &world.stored {
        lines.push(format!(
            "{} {} {} {} {}",
            sample.id,
            sample.cost.to_line(),
            sample.rank.saturating_sub(1),
            sample.health,
            sample.reward_code()
        ));
    }
    lines.insert(0, (lines.len() + 1).to_string());
    lines
}

/// Per-frame world snapshot: one line per robot, the bank, then the events
/// of the last commit.
#[must_use]
pub fn frame_data(world: &World) -> Vec<String> {
    let mut lines = Vec::with_capacity(world.agents.len() + world.events.len() + 2);
    for agent in &world.agents {
        let path = world.rules.distances.between(agent.from, agent.target);
        lines.push(format!(
            "{} {} {} {} {} {} {} {} {} ;{}",
            agent.target,
            agent.from,
            agent.eta,
            u8::from(agent.moved),
            path,
            agent.storage.to_line(),
            agent.expertise.to_line(),
            agent.score,
            u8::from(!agent.is_alive()),
            agent.annotation.as_deref().unwrap_or_default()
        ));
    }
    lines.push(world.bank.to_line());
    lines.push(world.events.len().to_string());
    lines.extend(world.events.iter().map(crate::game::Event::to_line));
    lines
}
