mod stubs;

pub use stubs::{CountingRng, DrawCountHandle};
