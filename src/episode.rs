use crate::types::{State, Transition};

/// How an episode came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// The environment reported a terminal transition.
    Terminal,
    /// The step cap was reached first.
    Truncated,
}

/// One continuous play-through, from reset to its terminal transition or step cap.
#[derive(Debug, Clone)]
pub struct Episode {
    starting_state: State,
    transitions: Vec<Transition>,
    total_reward: f32,
    end: Option<EpisodeEnd>,
}

impl Episode {
    pub fn new(starting_state: State) -> Self {
        Episode {
            starting_state,
            transitions: Vec::new(),
            total_reward: 0.0,
            end: None,
        }
    }

    pub fn push(&mut self, transition: Transition) {
        debug_assert!(self.end.is_none(), "episode already finished");
        self.total_reward += transition.reward;
        self.transitions.push(transition);
    }

    pub fn finish(&mut self, end: EpisodeEnd) {
        self.end = Some(end);
    }

    pub fn starting_state(&self) -> &State {
        &self.starting_state
    }

    /// The latest state reached, or the starting state before any step.
    pub fn current_state(&self) -> &State {
        self.transitions
            .last()
            .map(|t| &t.next_state)
            .unwrap_or(&self.starting_state)
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn total_reward(&self) -> f32 {
        self.total_reward
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn end(&self) -> Option<EpisodeEnd> {
        self.end
    }

    pub fn is_truncated(&self) -> bool {
        self.end == Some(EpisodeEnd::Truncated)
    }
}
