use tracing::info;

use crate::approximator::ValueApproximator;
use crate::environment::{check_approximator, check_state, check_step, Environment};
use crate::episode::{Episode, EpisodeEnd};
use crate::error::Result;
use crate::exploration::EpsilonGreedy;
use crate::types::{State, Transition};

/// Result of one greedy playback.
#[derive(Debug, Clone)]
pub struct EvaluationEpisode {
    pub episode: Episode,
    pub win: bool,
}

impl EvaluationEpisode {
    pub fn starting_state(&self) -> &State {
        self.episode.starting_state()
    }

    pub fn total_reward(&self) -> f32 {
        self.episode.total_reward()
    }

    pub fn steps(&self) -> usize {
        self.episode.len()
    }
}

/// Outcome of a batch of evaluation episodes.
#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    pub episodes: Vec<EvaluationEpisode>,
}

impl EvaluationReport {
    pub fn wins(&self) -> usize {
        self.episodes.iter().filter(|e| e.win).count()
    }

    /// Fraction of evaluated episodes that were won; zero when none were played.
    pub fn win_rate(&self) -> f32 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.wins() as f32 / self.episodes.len() as f32
    }
}

/// Plays episodes greedily with a trained approximator.
///
/// Evaluation never writes to a replay buffer, never fits and never touches
/// a target network; the approximator is only read.
#[derive(Debug, Clone)]
pub struct Evaluator {
    max_episode_steps: usize,
}

impl Evaluator {
    pub fn new(max_episode_steps: usize) -> Self {
        Evaluator { max_episode_steps: max_episode_steps.max(1) }
    }

    /// Play one episode, always taking the highest-valued action.
    ///
    /// An approximator sized for a different environment is rejected before
    /// the first step.
    pub fn play_episode<E, A>(&self, environment: &mut E, approximator: &A) -> Result<EvaluationEpisode>
    where
        E: Environment + ?Sized,
        A: ValueApproximator + ?Sized,
    {
        check_approximator(environment, approximator)?;
        let state_dimension = environment.state_dimension();

        let mut policy = EpsilonGreedy::greedy(environment.action_count());
        let starting_state = environment.reset()?;
        check_state(&starting_state, state_dimension)?;
        let mut episode = Episode::new(starting_state);

        loop {
            let state = episode.current_state().clone();
            let action = policy.select_action(state.view(), |s| approximator.evaluate(s))?;
            let step = environment.step(action)?;
            check_step(&step, state_dimension)?;
            let terminal = step.terminal;
            episode.push(Transition::new(state, action, step.reward, step.next_state, terminal));

            if terminal {
                episode.finish(EpisodeEnd::Terminal);
                break;
            }
            if episode.len() >= self.max_episode_steps {
                episode.finish(EpisodeEnd::Truncated);
                break;
            }
        }

        let win = environment.goal_reached(episode.current_state());
        Ok(EvaluationEpisode { episode, win })
    }

    /// Play `episodes` greedy episodes and aggregate their outcomes.
    pub fn evaluate<E, A>(&self, environment: &mut E, approximator: &A, episodes: usize) -> Result<EvaluationReport>
    where
        E: Environment + ?Sized,
        A: ValueApproximator + ?Sized,
    {
        let mut report = EvaluationReport::default();
        for index in 0..episodes {
            let played = self.play_episode(environment, approximator)?;
            info!(
                episode = index,
                starting_state = %played.starting_state(),
                win = played.win,
                steps = played.steps(),
                "evaluation episode"
            );
            report.episodes.push(played);
        }
        info!(
            episodes,
            wins = report.wins(),
            win_rate = report.win_rate(),
            "evaluation finished"
        );
        Ok(report)
    }
}
