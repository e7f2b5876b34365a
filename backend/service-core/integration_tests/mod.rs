mod concurrency;
mod helpers;
mod lifecycle;
mod service;
