pub mod assets;
pub mod checksum;
pub mod config;
pub mod download_client;
pub mod error;
pub mod file_index;
pub mod http;
pub mod installer;
pub mod installer_file;
pub mod logging;
pub mod session;
pub mod settings;

#[cfg(test)]
pub mod test_helpers;
