
mod listing;
mod trash;
