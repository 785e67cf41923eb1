use ndarray::array;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::types::{Action, State};
use super::{Environment, Step};

/// Grid world where the player moves one cell per step toward a goal cell.
///
/// Actions are `0 = up`, `1 = right`, `2 = down`, `3 = left`; moves into a
/// wall leave the player in place. The state is
/// `[player_x, player_y, goal_x, goal_y]`. Reaching the goal yields
/// `goal_reward` and ends the episode; every other move yields `move_reward`.
#[derive(Debug, Clone)]
pub struct MoveToGoal {
    board_x: usize,
    board_y: usize,
    goal_reward: f32,
    move_reward: f32,
    player_start: Option<(usize, usize)>,
    goal_start: Option<(usize, usize)>,
    player: (usize, usize),
    goal: (usize, usize),
    rng: StdRng,
}

impl MoveToGoal {
    pub const ACTIONS: usize = 4;

    pub fn new(board_x: usize, board_y: usize, goal_reward: f32, move_reward: f32) -> Result<Self> {
        if board_x == 0 || board_y == 0 || board_x * board_y < 2 {
            return Err(Error::config(
                "board_size".to_string(),
                format!("board must hold at least two cells, got {}x{}", board_x, board_y),
            ));
        }
        Ok(MoveToGoal {
            board_x,
            board_y,
            goal_reward,
            move_reward,
            player_start: None,
            goal_start: None,
            player: (0, 0),
            goal: (board_x - 1, board_y - 1),
            rng: StdRng::from_entropy(),
        })
    }

    /// Always start the player at `position` instead of a random cell.
    pub fn with_player_start(mut self, position: (usize, usize)) -> Result<Self> {
        self.check_cell("player_start", position)?;
        self.player_start = Some(position);
        self.check_starts()?;
        Ok(self)
    }

    /// Always place the goal at `position` instead of a random cell.
    pub fn with_goal_start(mut self, position: (usize, usize)) -> Result<Self> {
        self.check_cell("goal_start", position)?;
        self.goal_start = Some(position);
        self.check_starts()?;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn player(&self) -> (usize, usize) {
        self.player
    }

    pub fn goal(&self) -> (usize, usize) {
        self.goal
    }

    fn check_cell(&self, name: &str, (x, y): (usize, usize)) -> Result<()> {
        if x >= self.board_x || y >= self.board_y {
            return Err(Error::config(
                name.to_string(),
                format!("({}, {}) is outside the {}x{} board", x, y, self.board_x, self.board_y),
            ));
        }
        Ok(())
    }

    fn check_starts(&self) -> Result<()> {
        if self.player_start.is_some() && self.player_start == self.goal_start {
            return Err(Error::config(
                "player_start".to_string(),
                "player and goal cannot start on the same cell".to_string(),
            ));
        }
        Ok(())
    }

    fn random_cell(&mut self) -> (usize, usize) {
        (self.rng.gen_range(0..self.board_x), self.rng.gen_range(0..self.board_y))
    }

    fn state(&self) -> State {
        array![
            self.player.0 as f32,
            self.player.1 as f32,
            self.goal.0 as f32,
            self.goal.1 as f32
        ]
    }
}

impl Environment for MoveToGoal {
    fn reset(&mut self) -> Result<State> {
        self.player = match self.player_start {
            Some(position) => position,
            None => self.random_cell(),
        };
        self.goal = match self.goal_start {
            Some(position) => position,
            None => self.random_cell(),
        };
        while self.goal == self.player {
            if self.goal_start.is_none() {
                self.goal = self.random_cell();
            } else {
                self.player = self.random_cell();
            }
        }
        Ok(self.state())
    }

    fn step(&mut self, action: Action) -> Result<Step> {
        let (mut x, mut y) = self.player;
        match action {
            0 => {
                if y + 1 < self.board_y {
                    y += 1;
                }
            }
            1 => {
                if x + 1 < self.board_x {
                    x += 1;
                }
            }
            2 => y = y.saturating_sub(1),
            3 => x = x.saturating_sub(1),
            _ => return Err(Error::InvalidAction { action, action_count: Self::ACTIONS }),
        }
        self.player = (x, y);

        let terminal = self.player == self.goal;
        let reward = if terminal { self.goal_reward } else { self.move_reward };

        Ok(Step { next_state: self.state(), reward, terminal })
    }

    fn action_count(&self) -> usize {
        Self::ACTIONS
    }

    fn state_dimension(&self) -> usize {
        4
    }

    fn goal_reached(&self, state: &State) -> bool {
        state.len() == 4 && state[0] == state[2] && state[1] == state[3]
    }
}
