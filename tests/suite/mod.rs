mod config;
mod exploration;
