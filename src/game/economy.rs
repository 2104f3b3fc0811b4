//! Round commit: the only place shared state changes.
//!
//! # Commit order
//!
//! 1. Robots in transit advance one step.
//! 2. Staged intents apply in submission order.
//! 3. Staged diagnoses apply.
//! 4. Science projects are scored against every live agent; completed
//!    projects are removed after the scan.
//! 5. Agents eliminated since the last commit are counted out.

use tracing::info;

use crate::game::agent::AgentId;
use crate::game::intent::ProjectCompletion;
use crate::game::state::World;

/// What a commit changed that the scheduler cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReport {
    /// Agents counted out by this commit.
    pub eliminated: Vec<AgentId>,
    /// Projects completed by this commit.
    pub completions: usize,
}

/// Advance every live robot that is still travelling.
pub fn advance_travel(world: &mut World) {
    for agent in world.agents.iter_mut().filter(|a| a.is_alive()) {
        if agent.eta > 0 {
            agent.eta -= 1;
            agent.moved = true;
        }
    }
}

/// Apply staged intents and diagnoses (steps 2 and 3).
///
/// Applied intents are appended to `world.committed` so summaries can be
/// built after the fact.
pub fn apply_staged(world: &mut World) {
    let mut intents = std::mem::take(&mut world.pending);
    for intent in &mut intents {
        intent.apply(world);
    }
    world.committed.extend(intents);

    let diagnoses = std::mem::take(&mut world.pending_diagnoses);
    for diagnosis in &diagnoses {
        diagnosis.apply(world);
    }
    world.diagnoses.extend(diagnoses);
}

/// Award every project an agent's expertise now covers. Returns the number
/// of completions.
pub fn score_projects(world: &mut World) -> usize {
    let bonus = world.rules.project_bonus;
    let mut completions = Vec::new();
    for agent in world.agents.iter_mut().filter(|a| a.is_alive()) {
        for project in &world.projects {
            if project.is_met_by(&agent.expertise) {
                agent.score += bonus;
                completions.push(ProjectCompletion {
                    agent: agent.id,
                    project: *project,
                    bonus,
                });
            }
        }
    }

    world
        .projects
        .retain(|p| !completions.iter().any(|c| c.project.index == p.index));
    for completion in &completions {
        world.notify(
            completion.agent,
            format!("${} completes a science project!", completion.agent),
            true,
        );
    }
    let count = completions.len();
    world.completions.extend(completions);
    count
}

/// Count out agents eliminated since the previous sweep.
pub fn sweep_eliminations(world: &mut World) -> Vec<AgentId> {
    let mut newly = Vec::new();
    for agent in &mut world.agents {
        if !agent.is_alive() && !agent.elimination_swept {
            agent.elimination_swept = true;
            newly.push(agent.id);
        }
    }
    world.alive = world.alive.saturating_sub(newly.len());
    for id in &newly {
        info!(agent = id, round = world.round, "agent eliminated");
    }
    newly
}

/// Run the full round commit.
pub fn commit_round(world: &mut World) -> RoundReport {
    advance_travel(world);
    apply_staged(world);
    let completions = score_projects(world);
    let eliminated = sweep_eliminations(world);

    #[cfg(debug_assertions)]
    crate::game::invariants::assert_invariants(world);

    RoundReport {
        eliminated,
        completions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Failure;
    use crate::game::event::Event;
    use crate::game::intent::PendingIntent;
    use crate::game::invariants::check_invariants;
    use crate::game::location::Location;
    use crate::game::molecule::{Molecule, Molecules};
    use crate::game::project::ScienceProject;
    use crate::game::rules::{Payment, Rules};

    fn world() -> World {
        World::new(Rules::default(), 2, 11)
    }

    fn round(world: &mut World, lines: [&str; 2]) -> RoundReport {
        let next = world.round + 1;
        world.begin_round(next);
        for (agent, line) in lines.iter().enumerate() {
            if world.agents[agent].is_alive() {
                if let Err(failure) = world.stage(agent, line) {
                    world.eliminate(agent, &failure);
                }
            }
        }
        commit_round(world)
    }

    fn park(world: &mut World, agent: AgentId, at: Location) {
        world.agents[agent].target = at;
        world.agents[agent].eta = 0;
    }

    #[test]
    fn test_wait_changes_nothing() {
        let mut w = world();
        let bank = w.bank;
        let report = round(&mut w, ["WAIT", "WAIT"]);
        assert_eq!(report, RoundReport::default());
        assert!(w.events.is_empty());
        assert_eq!(w.bank, bank);
        assert_eq!(w.next_sample_id(), 0);
    }

    #[test]
    fn test_travel_takes_distance_rounds() {
        let mut w = world();
        round(&mut w, ["GOTO MOLECULES", "WAIT"]);
        assert_eq!(w.agents[0].eta, 1);
        assert!(w.agents[0].moved);

        round(&mut w, ["CONNECT A", "WAIT"]);
        assert_eq!(w.agents[0].eta, 0);
        assert_eq!(w.agents[0].storage, Molecules::ZERO);
        assert!(w.agents[0].is_alive());

        round(&mut w, ["CONNECT A", "WAIT"]);
        assert_eq!(w.agents[0].storage[Molecule::A], 1);
        assert_eq!(w.bank[Molecule::A], 4);
    }

    #[test]
    fn test_pickup_order_and_exhaustion() {
        let mut w = world();
        park(&mut w, 0, Location::Molecules);
        park(&mut w, 1, Location::Molecules);
        w.bank[Molecule::C] = 1;
        round(&mut w, ["CONNECT C", "CONNECT C"]);
        assert_eq!(w.agents[0].storage[Molecule::C], 1);
        assert_eq!(w.agents[1].storage[Molecule::C], 0);
        assert!(w.agents[1].is_alive());
        assert_eq!(w.bank[Molecule::C], 0);
        assert!(w.notices.iter().any(|n| n.agent == 1 && !n.success));
    }

    #[test]
    fn test_empty_bank_eliminates() {
        let mut w = world();
        park(&mut w, 0, Location::Molecules);
        w.bank[Molecule::E] = 0;
        let bank = w.bank;
        let report = round(&mut w, ["CONNECT E", "WAIT"]);
        assert_eq!(report.eliminated, vec![0]);
        assert_eq!(w.bank, bank);
        assert_eq!(
            w.agents[0].elimination.as_ref().unwrap().code,
            Failure::NotEnoughMolecules(Molecule::E).code()
        );
        assert_eq!(w.alive, 1);
    }

    #[test]
    fn test_draw_mints_increasing_ids() {
        let mut w = world();
        park(&mut w, 0, Location::Samples);
        park(&mut w, 1, Location::Samples);
        let len = w.pools.rank(2).unwrap().len();
        round(&mut w, ["CONNECT 2", "CONNECT 2"]);
        assert_eq!(w.agents[0].tray[0].id, 0);
        assert_eq!(w.agents[1].tray[0].id, 1);
        assert_eq!(w.pools.rank(2).unwrap().len(), len);
        assert!(!w.agents[0].tray[0].visible_to(0));
    }

    #[test]
    fn test_tray_full_eliminates_without_change() {
        let mut w = world();
        park(&mut w, 0, Location::Samples);
        for _ in 0..3 {
            round(&mut w, ["CONNECT 1", "WAIT"]);
        }
        let tray = w.agents[0].tray.clone();
        let report = round(&mut w, ["CONNECT 1", "WAIT"]);
        assert_eq!(report.eliminated, vec![0]);
        assert_eq!(w.agents[0].tray, tray);
        assert_eq!(w.agents[0].elimination.as_ref().unwrap().code, "TRAY_FULL");
    }

    #[test]
    fn test_diagnose_then_store() {
        let mut w = world();
        park(&mut w, 0, Location::Samples);
        round(&mut w, ["CONNECT 3", "WAIT"]);
        park(&mut w, 0, Location::Diagnosis);
        round(&mut w, ["CONNECT 0", "WAIT"]);
        let sample = &w.agents[0].tray[0];
        assert!(sample.discovered);
        assert!(sample.visible_to(0));
        assert!(!sample.visible_to(1));
        assert_eq!(w.diagnoses.len(), 1);

        round(&mut w, ["CONNECT 0", "WAIT"]);
        assert!(w.agents[0].tray.is_empty());
        assert_eq!(w.stored.len(), 1);
        assert!(w.stored[0].visible_to(1));
    }

    #[test]
    fn test_production_pays_and_scores() {
        let mut w = world();
        park(&mut w, 0, Location::Samples);
        round(&mut w, ["CONNECT 1", "WAIT"]);
        let sample = w.agents[0].tray[0].clone();
        w.agents[0].storage = sample.cost;
        w.agents[0].expertise = Molecules([1, 1, 1, 1, 1]);
        let before = w.molecules_in_circulation();
        park(&mut w, 0, Location::Laboratory);
        round(&mut w, ["CONNECT 0", "WAIT"]);

        let paid = sample.cost.saturating_sub(&Molecules([1, 1, 1, 1, 1]));
        assert_eq!(w.molecules_in_circulation(), before - paid.total());
        assert_eq!(w.agents[0].score, sample.health);
        assert!(w.agents[0].tray.is_empty());
        let gain = sample.reward.unwrap();
        assert_eq!(w.agents[0].expertise[gain], 2);
    }

    #[test]
    fn test_production_can_return_payment() {
        let rules = Rules::default().with_payment(Payment::ReturnedToBank);
        let mut w = World::new(rules, 2, 11);
        park(&mut w, 0, Location::Samples);
        round(&mut w, ["CONNECT 1", "WAIT"]);
        let cost = w.agents[0].tray[0].cost;
        w.agents[0].storage = cost;
        w.bank = w.bank.saturating_sub(&cost);
        let before = w.molecules_in_circulation();
        park(&mut w, 0, Location::Laboratory);
        round(&mut w, ["CONNECT 0", "WAIT"]);
        assert_eq!(w.molecules_in_circulation(), before);
    }

    #[test]
    fn test_projects_retire_together() {
        let mut w = world();
        w.projects = vec![
            ScienceProject {
                index: 0,
                cost: Molecules([1, 0, 0, 0, 0]),
            },
            ScienceProject {
                index: 1,
                cost: Molecules([0, 1, 0, 0, 0]),
            },
            ScienceProject {
                index: 2,
                cost: Molecules([0, 0, 9, 0, 0]),
            },
        ];
        w.agents[0].expertise = Molecules([1, 0, 0, 0, 0]);
        w.agents[1].expertise = Molecules([1, 1, 0, 0, 0]);
        let report = round(&mut w, ["WAIT", "WAIT"]);
        assert_eq!(report.completions, 3);
        assert_eq!(w.agents[0].score, 50);
        assert_eq!(w.agents[1].score, 100);
        assert_eq!(w.projects.len(), 1);
        assert_eq!(w.projects[0].index, 2);

        let report = round(&mut w, ["WAIT", "WAIT"]);
        assert_eq!(report.completions, 0);
        assert_eq!(w.agents[1].score, 100);
    }

    #[test]
    fn test_retrieve_from_storage() {
        let mut w = World::new(Rules::for_league(0).unwrap(), 2, 3);
        park(&mut w, 0, Location::Diagnosis);
        park(&mut w, 1, Location::Diagnosis);
        round(&mut w, ["CONNECT 4", "CONNECT 4"]);
        assert_eq!(w.agents[0].tray[0].id, 4);
        assert_eq!(w.agents[1].tray.len(), 1);
        let (won, copy) = (&w.agents[0].tray[0], &w.agents[1].tray[0]);
        assert_eq!(copy.id, 50);
        assert_eq!(copy.template(), won.template());
        assert_eq!(copy.rank, won.rank);
        assert!(copy.discovered && copy.visible_to(1));
        assert_eq!(w.stored.len(), 49);
        assert_eq!(w.next_sample_id(), 51);
        assert_eq!(w.events.len(), 3);
        assert_eq!(w.events[0], Event::SampleTaken { sample: 4, agent: 0 });
        assert!(matches!(w.events[1], Event::SampleCloned { card } if card.id == 50));
        assert_eq!(w.events[2], Event::SampleTaken { sample: 50, agent: 1 });
        assert!(matches!(
            w.committed[1],
            PendingIntent::RetrieveClone { agent: 1, source: 4, clone: Some(50), .. }
        ));
        assert!(check_invariants(&w).is_empty());
    }

    #[test]
    fn test_discoverer_displacement_still_clones() {
        let mut w = World::new(Rules::for_league(0).unwrap(), 2, 3);
        w.stored[7].discovered_by = Some(1);
        park(&mut w, 0, Location::Diagnosis);
        park(&mut w, 1, Location::Diagnosis);
        round(&mut w, ["CONNECT 7", "CONNECT 7"]);
        assert_eq!(w.agents[1].tray[0].id, 7);
        assert_eq!(w.agents[0].tray[0].id, 50);
        assert_eq!(w.agents[0].tray[0].cost, w.agents[1].tray[0].cost);
        assert_eq!(w.stored.len(), 49);
    }
}
