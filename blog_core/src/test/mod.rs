mod cache;
mod state;
