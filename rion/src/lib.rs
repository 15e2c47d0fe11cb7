pub use rion_core::{ClientConfig, Error, Result};

pub mod model {
    pub use rion_core::model::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use rion_client::*;
}
