mod base;
mod component;
pub mod payload;
mod pipeline;
mod team;

#[cfg(test)]
mod testing;

pub use base::BaseService;
pub use component::ComponentService;
pub use pipeline::PipelineService;
pub use team::TeamService;
