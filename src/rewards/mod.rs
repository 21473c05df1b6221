pub mod distributor;
pub mod types;

pub use distributor::{cycle_reward_pool, distribute_rewards};
pub use types::{RewardReport, ValidatorFailure, ValidatorPayout};
