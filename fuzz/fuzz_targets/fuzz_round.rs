#![no_main]

use arbitrary::Arbitrary;
use labref::game::{Rules, World, check_invariants, commit_round};
use libfuzzer_sys::fuzz_target;

/// A short match driven by arbitrary command lines.
#[derive(Arbitrary, Debug)]
struct RoundInput {
    league: u8,
    seed: u64,
    agents: u8,
    /// One line per agent per round, taken in order.
    lines: Vec<String>,
}

fuzz_target!(|input: RoundInput| {
    let Some(rules) = Rules::for_league(input.league % 4) else {
        return;
    };
    let agents = 2 + usize::from(input.agents % 3);
    let mut world = World::new(rules, agents, input.seed);
    let circulating = world.molecules_in_circulation();

    for (round, chunk) in input.lines.chunks(agents).take(200).enumerate() {
        world.begin_round(round as u32);
        for (agent, line) in chunk.iter().enumerate() {
            if !world.agents[agent].is_alive() {
                continue;
            }
            if let Err(failure) = world.stage(agent, line) {
                world.eliminate(agent, &failure);
            }
        }
        commit_round(&mut world);

        let violations = check_invariants(&world);
        assert!(violations.is_empty(), "round {round}: {violations:?}");
        assert!(world.molecules_in_circulation() <= circulating);
    }
});
