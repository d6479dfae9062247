pub mod health;
pub mod orders;
pub mod payments;
pub mod webhooks;

pub use health::*;
pub use orders::*;
pub use payments::*;
pub use webhooks::*;
