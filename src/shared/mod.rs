pub mod files;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
