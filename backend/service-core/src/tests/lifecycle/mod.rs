mod manager;
mod record;
