pub mod mock_record_store;
pub mod mock_verifier;
pub mod mock_wallet;
