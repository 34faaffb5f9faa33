pub mod category;
pub mod health;
pub mod offer;
pub mod product;
pub mod restaurant;
pub mod restaurant_admin;
pub mod shared;
