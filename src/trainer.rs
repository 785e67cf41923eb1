//! # Training Orchestrator
//!
//! [`Trainer`] runs the Deep Q-Learning loop: it plays episodes with an
//! epsilon-greedy policy, stores every transition in the replay buffer,
//! takes one gradient step per environment step once the buffer holds
//! `min_replay_memory_size` transitions, and refreshes the target network
//! every `update_target_every` terminal transitions.
//!
//! ## Step order
//!
//! 1. select an action for the current state
//! 2. step the environment
//! 3. push the transition into the replay buffer
//! 4. if the buffer is filled enough, sample a minibatch, build the Bellman
//!    targets from the target network and fit the approximator
//! 5. on a terminal transition, advance the synchronization counter and
//!    synchronize the target network when it reaches `update_target_every`
//!
//! An episode ends on a terminal transition or when `max_episode_steps` is
//! reached. A capped episode is booked like any other, but its last
//! transition keeps `terminal = false` and so still bootstraps.
//!
//! Training is organised in `cycles`; each cycle restarts epsilon from
//! `epsilon_start` while keeping the buffer, both networks and the statistics.
//!
//! ```rust,no_run
//! use deepq::config::TrainingConfig;
//! use deepq::environment::MountainCar;
//! use deepq::trainer::Trainer;
//!
//! let config = TrainingConfig::from_file("configurations.json").unwrap();
//! let mut trainer = Trainer::from_config(config, MountainCar::new()).unwrap();
//! let statistics = trainer.train().unwrap();
//! println!("win rate: {}", statistics.win_rate());
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::approximator::{QNetwork, ValueApproximator};
use crate::config::TrainingConfig;
use crate::environment::{check_approximator, check_state, check_step, Environment};
use crate::episode::{Episode, EpisodeEnd};
use crate::error::Result;
use crate::exploration::EpsilonGreedy;
use crate::logging::RunContext;
use crate::metrics::{EpisodeRecord, RunStatistics};
use crate::persistence::Experiment;
use crate::replay_buffer::ReplayBuffer;
use crate::target::TargetNetwork;
use crate::targets::{compute_targets, TrainingBatch};
use crate::types::Transition;

pub struct Trainer<E, A> {
    config: TrainingConfig,
    environment: E,
    approximator: A,
    target: TargetNetwork<A>,
    buffer: ReplayBuffer,
    policy: EpsilonGreedy,
    statistics: RunStatistics,
    context: RunContext,
    rng: StdRng,
    terminal_counter: usize,
    cycle: usize,
    next_episode: usize,
}

impl<E: Environment> Trainer<E, QNetwork> {
    /// Build a trainer with a freshly initialised [`QNetwork`] sized for `environment`.
    pub fn from_config(config: TrainingConfig, environment: E) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let approximator = QNetwork::builder()
            .state_dimension(environment.state_dimension())
            .action_count(environment.action_count())
            .hidden_layer_width(config.hidden_layer_width)
            .hidden_layers(config.hidden_layers)
            .activation(config.activation)
            .optimizer(config.optimizer)
            .learning_rate(config.learning_rate)
            .build(&mut rng)?;
        Self::with_rng(config, environment, approximator, rng)
    }
}

impl<E: Environment, A: ValueApproximator + Clone> Trainer<E, A> {
    /// Build a trainer around an existing approximator.
    ///
    /// The configuration is validated and the approximator's dimensions are
    /// checked against the environment before anything runs.
    pub fn new(config: TrainingConfig, environment: E, approximator: A) -> Result<Self> {
        let rng = seeded_rng(config.seed);
        Self::with_rng(config, environment, approximator, rng)
    }

    fn with_rng(config: TrainingConfig, environment: E, approximator: A, mut rng: StdRng) -> Result<Self> {
        config.validate()?;
        check_approximator(&environment, &approximator)?;

        let policy = EpsilonGreedy::new(
            environment.action_count(),
            config.epsilon_start,
            config.epsilon_min,
            config.epsilon_decay,
            StdRng::seed_from_u64(rng.gen()),
        )?;
        let buffer = ReplayBuffer::new(config.replay_memory_size)?;
        let target = TargetNetwork::new(&approximator);
        let context = RunContext::new("dqn", config.show_every());

        Ok(Trainer {
            config,
            environment,
            approximator,
            target,
            buffer,
            policy,
            statistics: RunStatistics::new(),
            context,
            rng,
            terminal_counter: 0,
            cycle: 0,
            next_episode: 0,
        })
    }

    /// Run every remaining episode of every cycle.
    pub fn train(&mut self) -> Result<&RunStatistics> {
        self.train_until(|_| false)
    }

    /// Run episodes until the run is complete or `stop` returns `true` for a
    /// just-finished episode.
    ///
    /// Episode boundaries are the only stopping points; calling again resumes
    /// with the next episode.
    pub fn train_until<F>(&mut self, mut stop: F) -> Result<&RunStatistics>
    where
        F: FnMut(&EpisodeRecord) -> bool,
    {
        let span = self.context.span().clone();
        let _entered = span.enter();

        if self.cycle == 0 && self.next_episode == 0 {
            info!(
                cycles = self.config.cycles,
                episodes = self.config.episodes,
                "training started"
            );
        }

        while self.cycle < self.config.cycles {
            if self.next_episode == 0 {
                self.policy.reset();
                debug!(cycle = self.cycle, epsilon = self.policy.epsilon(), "cycle started");
            }

            while self.next_episode < self.config.episodes {
                let record = self.run_episode()?;
                self.next_episode += 1;
                if stop(&record) {
                    info!(cycle = self.cycle, episode = record.episode, "training stopped early");
                    return Ok(&self.statistics);
                }
            }

            self.next_episode = 0;
            self.cycle += 1;
        }

        let window = self.context.show_every();
        info!(
            episodes = self.statistics.episode_count(),
            wins = self.statistics.wins(),
            final_moving_average = ?self.statistics.moving_average(window).last().copied(),
            synchronizations = self.statistics.synchronizations,
            elapsed_secs = self.context.elapsed().as_secs_f32(),
            "training finished"
        );
        Ok(&self.statistics)
    }

    /// Play one episode with learning enabled and record it.
    pub fn run_episode(&mut self) -> Result<EpisodeRecord> {
        let starting_state = self.environment.reset()?;
        check_state(&starting_state, self.environment.state_dimension())?;

        let mut episode = Episode::new(starting_state);
        let epsilon = self.policy.epsilon();
        let mut loss_sum = 0.0;
        let mut loss_count = 0usize;
        let mut synchronized = false;

        loop {
            let state = episode.current_state().clone();
            let approximator = &self.approximator;
            let action = self.policy.select_action(state.view(), |s| approximator.evaluate(s))?;

            let step = self.environment.step(action)?;
            check_step(&step, self.environment.state_dimension())?;
            let terminal = step.terminal;

            let transition = Transition::new(state, action, step.reward, step.next_state, terminal);
            self.buffer.push(transition.clone());
            episode.push(transition);

            if let Some(loss) = self.training_step()? {
                loss_sum += loss;
                loss_count += 1;
            }

            if terminal {
                synchronized |= self.count_terminal();
                episode.finish(EpisodeEnd::Terminal);
                break;
            }
            if episode.len() >= self.config.max_episode_steps {
                episode.finish(EpisodeEnd::Truncated);
                break;
            }
        }

        self.policy.decay();

        let record = EpisodeRecord {
            cycle: self.cycle,
            episode: self.next_episode,
            total_reward: episode.total_reward(),
            steps: episode.len(),
            win: self.environment.goal_reached(episode.current_state()),
            truncated: episode.is_truncated(),
            epsilon,
            mean_loss: (loss_count > 0).then(|| loss_sum / loss_count as f32),
            synchronized,
        };
        debug!(
            cycle = record.cycle,
            episode = record.episode,
            reward = record.total_reward,
            steps = record.steps,
            win = record.win,
            truncated = record.truncated,
            "episode finished"
        );

        self.statistics.record_episode(record.clone());
        if self.context.report_due(self.statistics.episode_count()) {
            self.context.report_progress(&self.statistics, self.cycle, self.next_episode, self.policy.epsilon());
        }
        Ok(record)
    }

    /// One gradient step on a sampled minibatch, or `None` while the buffer
    /// holds fewer than `min_replay_memory_size` transitions.
    pub fn training_step(&mut self) -> Result<Option<f32>> {
        if self.buffer.len() < self.config.min_replay_memory_size {
            return Ok(None);
        }

        let batch = self.buffer.sample(self.config.batch_size, &mut self.rng)?;
        let TrainingBatch { states, targets } =
            compute_targets(
                &batch,
                &self.approximator,
                &self.target,
                self.config.discount,
                self.config.double_q_learning,
            )?;
        let loss = self.approximator.fit(states.view(), targets.view())?;
        self.statistics.gradient_steps += 1;
        Ok(Some(loss))
    }

    /// Advance the terminal-transition counter; returns whether the target
    /// network was synchronized.
    fn count_terminal(&mut self) -> bool {
        self.terminal_counter += 1;
        if self.terminal_counter % self.config.update_target_every != 0 {
            return false;
        }
        self.target.synchronize(&self.approximator);
        self.terminal_counter = 0;
        self.statistics.synchronizations = self.target.synchronizations();
        debug!(synchronizations = self.statistics.synchronizations, "target network synchronized");
        true
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn approximator(&self) -> &A {
        &self.approximator
    }

    pub fn target(&self) -> &TargetNetwork<A> {
        &self.target
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    pub fn policy(&self) -> &EpsilonGreedy {
        &self.policy
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// Terminal transitions counted since the last synchronization.
    pub fn terminal_counter(&self) -> usize {
        self.terminal_counter
    }

    /// Whether every episode of every cycle has been played.
    pub fn is_finished(&self) -> bool {
        self.cycle >= self.config.cycles
    }
}

impl<E: Environment, A: ValueApproximator + Clone + Serialize> Trainer<E, A> {
    /// Write the configuration, the trained approximator and the run
    /// statistics into `experiment`.
    pub fn save_experiment(&self, experiment: &Experiment) -> Result<()> {
        let _entered = self.context.span().enter();
        experiment.save_config(&self.config)?;
        experiment.save_model(&self.approximator)?;
        experiment.save_statistics(&self.statistics)?;
        info!(dir = %experiment.dir().display(), "experiment saved");
        Ok(())
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
