pub mod tracker;

#[cfg(test)]
mod tracker_test;
