//! Host and agent strategies for rollouts.
//!
//! - `host`: `HostPolicy` with random, all-coordinate and network hosts
//! - `agent`: `AgentPolicy` with random, choose-first and network agents

pub mod agent;
pub mod host;

pub use agent::{AgentPolicy, ChooseFirstAgent, PolicyAgent, RandomAgent};
pub use host::{AllCoordHost, HostPolicy, PolicyHost, RandomHost};

/// Look up a scripted host by name (`"random"` or `"all_coord"`).
pub fn host_by_name(name: &str) -> Option<Box<dyn HostPolicy>> {
    match name {
        "random" => Some(Box::new(RandomHost)),
        "all_coord" => Some(Box::new(AllCoordHost)),
        _ => None,
    }
}

/// Look up a scripted agent by name (`"random"` or `"choose_first"`).
pub fn agent_by_name(name: &str) -> Option<Box<dyn AgentPolicy>> {
    match name {
        "random" => Some(Box::new(RandomAgent)),
        "choose_first" => Some(Box::new(ChooseFirstAgent)),
        _ => None,
    }
}
