pub mod mock_download_client;
pub mod mock_file_index;
