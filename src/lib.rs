pub mod aggregate;
pub mod city_id;
pub mod config;
pub mod feed;
pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod render;
