mod snapshot;
mod trajectory;

pub use snapshot::Snapshot;
pub use trajectory::{Trajectory, TrajectoryFormat};
