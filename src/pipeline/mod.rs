pub mod context;
pub mod events;
pub mod orchestrator;
pub mod stage;
pub mod state;

pub use events::PipelineEvent;
pub use orchestrator::{PipelineExecutor, PipelineOptions};
pub use stage::{StageDescriptor, StageGraph};
