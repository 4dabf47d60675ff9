pub mod zips;
