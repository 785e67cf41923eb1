//! # deepq - Deep Q-Learning trainer
//!
//! deepq trains a neural value function to act in an environment with a
//! finite action set, using temporal-difference learning with experience
//! replay and a periodically synchronized target network.
//!
//! ## Key Features
//!
//! - **Replay buffer**: fixed-capacity ring buffer with FIFO eviction and
//!   uniform sampling without replacement
//! - **Target network**: frozen copy of the Q-network, refreshed on a
//!   schedule counted in terminal transitions
//! - **Exploration**: epsilon-greedy with a linear, floored decay schedule
//! - **Environment agnostic**: anything implementing [`environment::Environment`]
//! - **Reproducible**: a single seed drives weight initialisation, exploration
//!   and minibatch sampling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deepq::config::TrainingConfig;
//! use deepq::environment::MoveToGoal;
//! use deepq::evaluator::Evaluator;
//! use deepq::persistence::Experiment;
//! use deepq::trainer::Trainer;
//!
//! deepq::logging::init("info").unwrap();
//!
//! let config = TrainingConfig::from_file("configurations.json").unwrap();
//! let environment = MoveToGoal::new(7, 10, 1.0, -1.0).unwrap();
//! let mut trainer = Trainer::from_config(config, environment).unwrap();
//! trainer.train().unwrap();
//!
//! let experiment = Experiment::create("runs/move_to_goal").unwrap();
//! trainer.save_experiment(&experiment).unwrap();
//!
//! let mut environment = MoveToGoal::new(7, 10, 1.0, -1.0).unwrap();
//! let report = Evaluator::new(200)
//!     .evaluate(&mut environment, trainer.approximator(), 100)
//!     .unwrap();
//! println!("win rate: {:.1}%", report.win_rate() * 100.0);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions for dense layers
//! - [`approximator`] - The value-approximator trait and the Q-network
//! - [`config`] - Training configuration
//! - [`environment`] - Environment trait and reference environments
//! - [`episode`] - Episode bookkeeping
//! - [`error`] - Error types and result handling
//! - [`evaluator`] - Greedy evaluation
//! - [`exploration`] - Epsilon-greedy action selection
//! - [`layers`] - Dense layers and weight initialisation
//! - [`logging`] - Run-scoped logging context
//! - [`loss`] - Loss functions for training
//! - [`metrics`] - Run statistics
//! - [`network`] - Feed-forward neural network
//! - [`optimizer`] - SGD and Adam
//! - [`persistence`] - Model and experiment files
//! - [`replay_buffer`] - Experience replay
//! - [`target`] - Target network
//! - [`targets`] - Bellman backups
//! - [`trainer`] - The training loop
//! - [`types`] - States, actions and transitions

pub mod activations;
pub mod approximator;
pub mod config;
pub mod environment;
pub mod episode;
pub mod error;
pub mod evaluator;
pub mod exploration;
pub mod layers;
pub mod logging;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod persistence;
pub mod replay_buffer;
pub mod target;
pub mod targets;
pub mod trainer;
pub mod types;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
