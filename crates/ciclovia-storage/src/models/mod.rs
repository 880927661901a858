pub mod bike;
pub mod card;
pub mod fine;
pub mod maintenance;
pub mod rental;
pub mod review;
pub mod station;
pub mod user;

pub use bike::Bike;
pub use card::Card;
pub use fine::Fine;
pub use maintenance::MaintenanceTicket;
pub use rental::Rental;
pub use review::{BikeReview, StationReview};
pub use station::Station;
pub use user::User;
