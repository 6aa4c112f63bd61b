pub mod executor;
pub mod policy;
pub mod registry;

pub use executor::{AgentExecutor, TaskInvocation};
pub use registry::{AgentRole, RoleId, ROLES};
