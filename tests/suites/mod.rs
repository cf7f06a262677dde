mod lifecycle;
mod render;
mod stores;
