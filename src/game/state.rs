//! The world aggregate and command staging.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::error::Failure;
use crate::game::agent::{Agent, AgentId};
use crate::game::command::{Command, ConnectArg, parse_command};
use crate::game::event::Event;
use crate::game::intent::{Diagnosis, PendingIntent, ProjectCompletion};
use crate::game::location::Location;
use crate::game::molecule::{Molecule, Molecules};
use crate::game::project::{self, ScienceProject};
use crate::game::rules::{ContestPolicy, MAX_STORAGE, MAX_TRAY, RANK_COUNT, Rules};
use crate::game::sample::{Sample, SampleId, SamplePools, SampleTemplate};
use crate::replay::Tooltip;

/// Everything the referee knows about a match in progress.
///
/// Shared resources (bank, pools, storage) change only inside a commit; the
/// staging methods only read them and queue intents.
#[derive(Debug, Clone)]
pub struct World {
    /// Rule table for the league being played.
    pub rules: Rules,
    /// Robots by seat index.
    pub agents: Vec<Agent>,
    /// Molecules available for pickup.
    pub bank: Molecules,
    /// Undrawn sample templates.
    pub pools: SamplePools,
    /// Shared storage at the diagnosis module.
    pub stored: Vec<Sample>,
    /// Open science projects.
    pub projects: Vec<ScienceProject>,
    /// Intents staged this round, in submission order.
    pub pending: Vec<PendingIntent>,
    /// Diagnoses staged this round.
    pub pending_diagnoses: Vec<Diagnosis>,
    /// Intents applied this round, with commit-time fields filled in.
    pub committed: Vec<PendingIntent>,
    /// Diagnoses applied this round.
    pub diagnoses: Vec<Diagnosis>,
    /// Projects completed this round.
    pub completions: Vec<ProjectCompletion>,
    /// Events generated this round.
    pub events: Vec<Event>,
    /// Tooltips waiting to be emitted.
    pub notices: Vec<Tooltip>,
    /// Current round index.
    pub round: u32,
    /// Agents still counted as in play by the last commit.
    pub alive: usize,
    next_sample_id: SampleId,
}

impl World {
    /// Deal a new match. All randomness happens here.
    #[must_use]
    pub fn new(rules: Rules, agent_count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let pools = SamplePools::from_catalogue(&mut rng);
        let projects = project::deal(rules.project_count, &mut rng);

        let mut world = Self {
            bank: Molecules::splat(rules.molecules_per_type),
            agents: (0..agent_count).map(Agent::new).collect(),
            pools,
            stored: Vec::new(),
            projects,
            pending: Vec::new(),
            pending_diagnoses: Vec::new(),
            committed: Vec::new(),
            diagnoses: Vec::new(),
            completions: Vec::new(),
            events: Vec::new(),
            notices: Vec::new(),
            round: 0,
            alive: agent_count,
            next_sample_id: 0,
            rules,
        };
        world.stock_storage();
        world
    }

    fn stock_storage(&mut self) {
        for _ in 0..self.rules.initial_stored_samples {
            let Some(template) = self.pools.draw(1) else {
                return;
            };
            let id = self.mint_id();
            let mut sample = Sample::from_template(id, 1, &template);
            sample.discovered = true;
            sample.public = true;
            if !self.rules.sample_rewards {
                sample.reward = None;
            }
            self.stored.push(sample);
        }
    }

    /// Allocate the next sample id.
    pub fn mint_id(&mut self) -> SampleId {
        let id = self.next_sample_id;
        self.next_sample_id += 1;
        id
    }

    /// The id the next minted sample will get.
    #[must_use]
    pub fn next_sample_id(&self) -> SampleId {
        self.next_sample_id
    }

    /// Queue a tooltip for `agent`.
    pub fn notify(&mut self, agent: AgentId, text: String, success: bool) {
        self.notices.push(Tooltip {
            agent,
            text,
            success,
        });
    }

    /// Clear everything that lives for a single round.
    pub fn begin_round(&mut self, round: u32) {
        self.round = round;
        self.pending.clear();
        self.pending_diagnoses.clear();
        self.committed.clear();
        self.diagnoses.clear();
        self.completions.clear();
        self.events.clear();
        for agent in &mut self.agents {
            agent.reset_round();
        }
    }

    /// Sum of bank and every agent's storage.
    #[must_use]
    pub fn molecules_in_circulation(&self) -> u32 {
        self.bank.total() + self.agents.iter().map(|a| a.storage.total()).sum::<u32>()
    }

    /// Remove an agent from play.
    pub fn eliminate(&mut self, agent: AgentId, failure: &Failure) {
        let round = self.round;
        let Some(target) = self.agents.get_mut(agent) else {
            return;
        };
        target.eliminate(round, failure.code(), failure.to_string());
        self.notify(agent, failure.tooltip().to_string(), false);
    }

    fn invalid_input(&self, line: &str) -> Failure {
        Failure::InvalidInput {
            expected: self.rules.expected_commands().to_string(),
            found: line.to_string(),
        }
    }

    /// Validate one output line from `agent` and stage its effect.
    ///
    /// Travel and annotations apply immediately since they touch only the
    /// agent itself. Anything touching shared state is queued.
    ///
    /// # Errors
    ///
    /// Returns the [`Failure`] that should eliminate the agent. Nothing is
    /// staged in that case. A seat with no robot is
    /// [`Failure::UnknownAgent`].
    pub fn stage(&mut self, agent: AgentId, line: &str) -> Result<(), Failure> {
        let line = line.trim_end_matches(['\r', '\n']);
        let robot = self
            .agents
            .get_mut(agent)
            .ok_or(Failure::UnknownAgent(agent))?;
        if robot.is_moving() {
            robot.set_annotation(Some(line));
            return Ok(());
        }

        let command = parse_command(line).ok_or_else(|| self.invalid_input(line))?;
        debug!(agent, round = self.round, ?command, "staging command");
        match &command {
            Command::Goto { target, .. } => {
                if *target == Location::Samples && !self.rules.samples_module_open {
                    return Err(self.invalid_input(line));
                }
                let distances = self.rules.distances;
                let robot = &mut self.agents[agent];
                if robot.target != *target {
                    robot.from = robot.target;
                    robot.target = *target;
                    robot.eta = distances.between(robot.from, robot.target);
                }
            }
            Command::Connect { arg, .. } => {
                self.agents[agent].attempted_connect = true;
                self.stage_connect(agent, arg.as_ref(), line)?;
            }
            Command::Wait { .. } => {}
        }

        let robot = &mut self.agents[agent];
        robot.set_annotation(command.annotation());
        robot.acted = true;
        Ok(())
    }

    fn stage_connect(
        &mut self,
        agent: AgentId,
        arg: Option<&ConnectArg>,
        line: &str,
    ) -> Result<(), Failure> {
        match self.agents[agent].target {
            Location::StartPos => Err(Failure::ConnectToNothing),
            Location::Samples => self.stage_draw(agent, arg),
            Location::Molecules => self.stage_pickup(agent, arg),
            Location::Diagnosis => {
                let id = self.sample_id_arg(arg, line)?;
                self.stage_diagnosis_module(agent, id)
            }
            Location::Laboratory => {
                let id = self.sample_id_arg(arg, line)?;
                self.stage_production(agent, id)
            }
        }
    }

    fn sample_id_arg(&self, arg: Option<&ConnectArg>, line: &str) -> Result<i64, Failure> {
        let arg = arg.ok_or(Failure::NullSample)?;
        arg.integer().ok_or_else(|| self.invalid_input(line))
    }

    fn stage_draw(&mut self, agent: AgentId, arg: Option<&ConnectArg>) -> Result<(), Failure> {
        let raw = arg.map_or("null", ConnectArg::as_str);
        let requested = arg
            .and_then(ConnectArg::integer)
            .ok_or_else(|| Failure::BadSampleRank(raw.to_string()))?;
        if self.agents[agent].tray.len() >= MAX_TRAY {
            return Err(Failure::TrayFull);
        }
        let rank = u8::try_from(requested)
            .ok()
            .filter(|r| (1..=RANK_COUNT).contains(r))
            .ok_or_else(|| Failure::BadSampleRank(raw.to_string()))?;
        self.pending.push(PendingIntent::DrawSample {
            agent,
            rank,
            drawn: None,
        });
        Ok(())
    }

    fn stage_pickup(&mut self, agent: AgentId, arg: Option<&ConnectArg>) -> Result<(), Failure> {
        let molecule: Molecule = arg.and_then(ConnectArg::molecule).ok_or_else(|| {
            Failure::UnknownMolecule(arg.map_or_else(String::new, |a| a.as_str().to_string()))
        })?;
        if self.bank[molecule] == 0 {
            return Err(Failure::NotEnoughMolecules(molecule));
        }
        if self.agents[agent].storage.total() >= MAX_STORAGE {
            return Err(Failure::StorageFull);
        }
        self.pending.push(PendingIntent::TakeMolecule {
            agent,
            molecule,
            granted: false,
        });
        Ok(())
    }

    fn stage_diagnosis_module(&mut self, agent: AgentId, id: i64) -> Result<(), Failure> {
        let carried = SampleId::try_from(id)
            .ok()
            .and_then(|sid| self.agents[agent].tray_sample(sid))
            .map(|s| (s.id, s.discovered));
        if let Some((sample, discovered)) = carried {
            if discovered {
                self.pending.push(PendingIntent::StoreSample { agent, sample });
            } else {
                self.pending_diagnoses.push(Diagnosis { agent, sample });
            }
            return Ok(());
        }

        let stored = SampleId::try_from(id)
            .ok()
            .and_then(|sid| self.stored.iter().find(|s| s.id == sid))
            .ok_or(Failure::SampleNotFound(id))?;
        let source = (stored.id, stored.rank, stored.template());
        let discoverer = stored.discovered_by;
        if self.agents[agent].tray.len() >= MAX_TRAY {
            return Err(Failure::TrayFull);
        }
        self.stage_retrieval(agent, source, discoverer);
        Ok(())
    }

    /// First requester wins unless the discoverer asks too. Whoever loses is
    /// settled by the league's contest policy. Clones copy `source` as it
    /// stands now.
    fn stage_retrieval(
        &mut self,
        agent: AgentId,
        source: (SampleId, u8, SampleTemplate),
        discoverer: Option<AgentId>,
    ) {
        let (sample, rank, template) = source;
        let clone_for = |loser: AgentId| PendingIntent::RetrieveClone {
            agent: loser,
            source: sample,
            rank,
            template,
            clone: None,
        };
        let holder = self
            .pending
            .iter()
            .position(|i| matches!(i, PendingIntent::RetrieveSample { sample: s, .. } if *s == sample));

        match holder {
            None => self.pending.push(PendingIntent::RetrieveSample { agent, sample }),
            Some(pos) if discoverer == Some(agent) => {
                let displaced = self.pending[pos].agent();
                match self.rules.contest {
                    ContestPolicy::Clone => self.pending[pos] = clone_for(displaced),
                    ContestPolicy::Deny => {
                        self.pending.remove(pos);
                    }
                }
                self.pending.push(PendingIntent::RetrieveSample { agent, sample });
            }
            Some(_) => {
                if self.rules.contest == ContestPolicy::Clone {
                    self.pending.push(clone_for(agent));
                } else {
                    debug!(agent, sample, "stored sample already claimed, request denied");
                }
            }
        }
    }

    fn stage_production(&mut self, agent: AgentId, id: i64) -> Result<(), Failure> {
        let robot = &self.agents[agent];
        let sample = SampleId::try_from(id)
            .ok()
            .and_then(|sid| robot.tray_sample(sid))
            .ok_or(Failure::SampleNotInTray(id))?;
        if !robot.can_afford(&sample.cost) {
            return Err(Failure::CannotAfford(sample.id));
        }
        let sample = sample.id;
        self.pending.push(PendingIntent::Produce {
            agent,
            sample,
            paid: Molecules::ZERO,
            health: 0,
            reward: None,
        });
        Ok(())
    }
}
