//! Feed services built on the database seams.

pub mod home_activities;

pub use home_activities::{fetch_home_activities, HomeActivitiesError};
