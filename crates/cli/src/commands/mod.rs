pub mod check;
pub mod robots;
pub mod serve;
pub mod sitemap;
