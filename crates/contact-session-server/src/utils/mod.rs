pub mod body;
pub mod error;
pub mod sanitise;

pub use body::RequestBody;
pub use sanitise::sanitise;
