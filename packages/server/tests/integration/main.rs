mod category;
mod common;
mod health;
mod product;
mod restaurant_admin;
