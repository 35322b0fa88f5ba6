pub mod health;
pub mod home;
pub mod recommendations;

pub use health::health_check;
pub use home::index;
pub use recommendations::{list_recommendations, recommend};
